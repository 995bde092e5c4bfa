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

//! First pairings: upper half against lower half within each score group.
//!
//! Ignoring prior opponents, teammates, and colors, the textbook pairing
//! for a score group of `2k` players puts seed `i` against seed `i + k`.
//! That is exactly right for round one and close to right whenever the
//! section is large and lightly constrained, which makes it a better
//! starting point for the descent than a stale hint. Odd groups drop their
//! last player down a group, or onto the bye when no group follows.

use wallchart_model::color::Color;
use wallchart_model::index::PlayerIndex;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

/// Overwrites the first `players` slots of the pairing vector with the
/// per-score-group upper-vs-lower-half assignment. `players` counts the
/// active entries (no byes, no bye requests, no locked pairs), which
/// occupy roster positions `0..players`.
pub fn first_pairings(
    roster: &Roster,
    pair: &mut PairVector,
    players: usize,
    total_rounds: i16,
) {
    debug_assert!(players <= pair.len());
    debug_assert!((0..players).all(|x| !roster.player(pair[x]).is_bye()));

    // Push byes behind the active players; this alone is the naive
    // 1-vs-2 pairing.
    let mut active: Vec<PlayerIndex> = (0..players).map(|x| pair[x]).collect();
    active.sort_unstable();
    for (slot, player) in active.into_iter().enumerate() {
        pair[slot] = player;
    }
    debug_assert!(
        players % 2 == 0 || (players < pair.len() && roster.player(pair[players]).is_bye())
    );

    // Census of group sizes and due colors, indexed by doubled score, for
    // the color look-ahead.
    let top_score = roster.players()[0].score.max(0.0);
    let groups = (2.0 * top_score) as usize + 1;
    let mut group_sizes = vec![0usize; groups];
    let mut color_census = vec![[0usize; 3]; groups];

    let mut x = 0;
    while x < players {
        debug_assert!(x % 2 == 0);
        let group_score = roster.players()[x].score;
        let group = (2.0 * group_score) as usize;
        let mut y = x + 1;
        loop {
            group_sizes[group] += 1;
            let census_slot = match roster.players()[y - 1].due_color.color() {
                Some(Color::White) => 0,
                Some(Color::Black) => 1,
                None => 2,
            };
            color_census[group][census_slot] += 1;
            if y < players && roster.players()[y].score == group_score {
                y += 1;
                continue;
            }
            // End of the score group: assign upper half against lower.
            let size = group_sizes[group];
            debug_assert!(size == y - x);
            let mut z = 0;
            while z + 1 < size {
                pair[x + z] = PlayerIndex::new(x + z / 2);
                pair[x + z + 1] = PlayerIndex::new(x + size / 2 + z / 2);
                z += 2;
            }
            if size % 2 == 0 {
                x = y;
            } else if y < players {
                // Odd player drops down onto the top of the next group.
                pair[y - 1] = PlayerIndex::new(y - 1);
                pair[y] = PlayerIndex::new(y);
                x = y + 1;
            } else {
                // No group follows: the odd player takes the bye.
                pair[y - 1] = PlayerIndex::new(y - 1);
                debug_assert!(y < roster.len());
                debug_assert!(roster.player(pair[y]).is_bye());
                x = y;
            }
            break;
        }
    }

    color_lookahead(roster, pair, players, total_rounds, &group_sizes, &color_census);
}

/// Hook for pre-rotating colors from the group census before the search
/// runs.
fn color_lookahead(
    _roster: &Roster,
    _pair: &mut PairVector,
    _players: usize,
    _total_rounds: i16,
    group_sizes: &[usize],
    color_census: &[[usize; 3]],
) {
    let all_neutral = group_sizes
        .iter()
        .zip(color_census)
        .all(|(&size, census)| size == census[2]);
    if all_neutral {
        return; // nothing to change
    }
    // TODO: rebalance colors across score groups from this census; today
    // the optimizer rediscovers the same information one color rotation at
    // a time.
}
