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

//! # Wallchart Model
//!
//! **The Core Domain Model for the Wallchart Pairing Engine.**
//!
//! This crate defines the data structures shared by the cost system, the
//! local search, the round-robin tables, and the solver facade:
//!
//! * **`index`**: The strongly-typed [`index::PlayerIndex`] into the
//!   canonical roster.
//! * **`color`**: Board colors, per-round history marks, and the due-color
//!   preference derived from them.
//! * **`player`**: One competitor's state at the moment of pairing, plus the
//!   canonical total order over players.
//! * **`roster`**: The canonical roster — sorted players, exactly one bye
//!   sentinel at the end, ranks and rank mirrors resolved.
//! * **`pairing`**: The even-length pairing vector mapping boards to pairs
//!   of roster positions.
//! * **`warning`**: Warn-code letters, the evaluation-order code ladder, and
//!   the per-session letter-to-description catalog.
//!
//! ## Design Philosophy
//!
//! 1.  **Value types at the seams**: Opponents are `OpponentKey` values, not
//!     encoded strings; due colors are a three-variant enum, not a string of
//!     repeated letters.
//! 2.  **One canonical order**: Every sort in the engine goes through
//!     [`player::Player::canonical_cmp`], which is total because the per
//!     player random tiebreaker is required to be unique.
//! 3.  **No global state**: The warn-code catalog is owned by the pairing
//!     session and passed explicitly wherever codes are recorded.

pub mod color;
pub mod index;
pub mod pairing;
pub mod player;
pub mod roster;
pub mod warning;
