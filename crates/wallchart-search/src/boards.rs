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

//! Board ordering.
//!
//! Every move the optimizer makes is followed by this insertion sort, which
//! restores the board priority order: boards awaiting pairings first, byes
//! and bye requests last, then by the scores and ratings of both halves.
//! Moves therefore only decide *who* plays *whom*; *where* the board lands
//! is always recomputed.

use std::cmp::Ordering;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

/// Whether the board starting at slot `y` may stay behind the board
/// starting at slot `y - 2`.
fn board_in_order(roster: &Roster, pair: &PairVector, y: usize) -> bool {
    let prev_upper = roster.player(pair[y - 2]);
    let prev_lower = roster.player(pair[y - 1]);
    let upper = roster.player(pair[y]);
    let lower = roster.player(pair[y + 1]);
    let ordering = prev_upper
        .paired
        .cmp(&upper.paired)
        .then(prev_lower.is_bye().cmp(&lower.is_bye()))
        // When the top players tie, the bottom players decide before the
        // canonical pairing-number order does.
        .then(prev_upper.bye_request.cmp(&upper.bye_request))
        .then(upper.score.total_cmp(&prev_upper.score))
        .then(lower.score.total_cmp(&prev_lower.score))
        .then(upper.rating.cmp(&prev_upper.rating))
        .then(lower.rating.cmp(&prev_lower.rating))
        .then_with(|| prev_upper.canonical_cmp(upper));
    ordering != Ordering::Greater
}

/// Insertion sort of boards into priority order. Active, still-unpaired
/// boards come first so that board numbers follow strength.
pub fn sort_boards(roster: &Roster, pair: &mut PairVector) {
    debug_assert!(roster.players().last().is_some_and(|p| p.is_bye()));
    debug_assert!(pair.len() % 2 == 0);
    for x in (0..pair.len()).step_by(2) {
        debug_assert!(pair[x].get() < roster.len() && pair[x + 1].get() < roster.len());
        let mut y = x;
        while y > 0 {
            debug_assert!(
                pair[y + 1] != pair[y]
                    && pair[y + 1] != pair[y - 2]
                    && pair[y] != pair[y - 1]
                    && pair[y] != pair[y - 2]
                    && pair[y - 1] != pair[y - 2],
                "called `sort_boards` with a duplicated slot near board {}",
                y / 2
            );
            debug_assert!(
                pair[y + 1] != pair[y - 1]
                    || (roster.player(pair[y + 1]).is_bye() && roster.player(pair[y - 1]).is_bye())
            );
            if board_in_order(roster, pair, y) {
                break;
            }
            debug_assert!(
                !roster.player(pair[y]).is_bye() && !roster.player(pair[y - 2]).is_bye()
            );
            pair.swap(y, y - 2);
            pair.swap(y + 1, y - 1);
            y -= 2;
        }
    }
}
