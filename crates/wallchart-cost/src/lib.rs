// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Wallchart Cost
//!
//! **The rule engine: what a candidate pairing costs.**
//!
//! Pairing rules do not carry weights; they carry *priorities*. This crate
//! turns a candidate pairing into a lexicographic [`vector::CostVector`]
//! whose terms, most significant first, encode those priorities: bye
//! integrity, rematches, future-round feasibility, score equality, team
//! blocks, bye placement, interchanges and transpositions at descending
//! rating thresholds, color rules, and finally the cosmetic board-order
//! checks.
//!
//! * **`vector`**: The ordered terms and their comparator.
//! * **`allocate`**: Which color the upper player of a board receives.
//! * **`components`**: One pure cost function per rule.
//! * **`ratings`**: Median/lowest/highest rating scans per score group.
//! * **`feasibility`**: The bounded backtracking look-ahead over remaining
//!   rounds.
//! * **`eval`**: The evaluator that drives all of the above over a pairing
//!   vector and records warn codes.

pub mod allocate;
pub mod components;
pub mod eval;
pub mod feasibility;
pub mod ratings;
pub mod vector;

/// Out-of-band diagnostic for conditions that indicate caller bugs but must
/// not abort a pairing run.
pub(crate) fn diagnostic(args: std::fmt::Arguments<'_>) {
    println!("wallchart-cost: {}", args);
}
