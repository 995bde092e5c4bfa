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

//! # Wallchart Robin
//!
//! **Crenshaw–Berger round-robin pairings.**
//!
//! Small round-robin sections bypass the Swiss optimizer entirely: the
//! classical Crenshaw–Berger tables fix every seat's opponent and color
//! for every round, and a companion table reverses colors when a player
//! withdraws in the first half of the event. The tables are compiled in as
//! tab-separated literals for even section sizes 4, 6, 8, and 10; odd
//! sections add a virtual bye seat.

pub mod lookup;
mod tables;

pub use lookup::{crenshaw_berger_lookup, RoundRobinError, SeatAssignment};
