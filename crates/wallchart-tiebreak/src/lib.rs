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

//! # Wallchart Tiebreak
//!
//! **Standings order when the scores tie.**
//!
//! Given every player's per-round opponents, colors, and result letters,
//! this crate computes the ranked tiebreak tuple for each player: Modified
//! Median, Solkoff, cumulative, basic median, head-to-head, total blacks,
//! Kashdan, round-robin Sonneborn–Berger, opposition cumulative and
//! performance, average opposition rating, wins, first-loss round, and the
//! coin flip. The coin flip draws from a caller-supplied RNG with
//! rejection sampling, so runs are reproducible under a seeded generator.

pub mod compute;
pub mod result;

pub use compute::{tiebreak_calculation, PlayerResultMap, TiebreakError};
pub use result::{GameResult, PlayerResult};
