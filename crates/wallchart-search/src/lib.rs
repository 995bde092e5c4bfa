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

//! # Wallchart Search
//!
//! **Greedy descent over pairing vectors.**
//!
//! The pairing problem is a global minimization over all assignments of
//! players to boards and colors, driven by the lexicographic cost vector.
//! This crate supplies the search machinery:
//!
//! * **`hint`**: Turns the caller's board hints into an initial pairing.
//! * **`first`**: The upper-half-vs-lower-half heuristic that replaces the
//!   hint for fresh rounds.
//! * **`boards`**: The insertion sort that keeps boards in priority order
//!   after every move.
//! * **`rotate`**: The rotation primitives the richer moves are built on.
//! * **`moves`**: The eight-move neighborhood (swap, rotations, score-group
//!   rotations, color rotations).
//! * **`optimizer`**: First-improvement descent over `2d`-tuples of slots,
//!   focused on the players the cost function actually touched.
//! * **`stats`**: Run statistics.

pub mod boards;
pub mod first;
pub mod hint;
pub mod moves;
pub mod optimizer;
pub mod rotate;
pub mod stats;
