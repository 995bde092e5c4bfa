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

//! Hint pairings: the caller's board hints as the search's starting point.
//!
//! The input board numbers are a hint that might land the descent in a
//! better local minimum, and they carry the locked (manually paired)
//! boards, which must survive untouched. Two adjacent hint entries with the
//! same board number and the same locked flag form a board; everything else
//! is an orphan that pairs a bye until the optimizer finds it a partner.

use crate::boards::sort_boards;
use wallchart_model::index::PlayerIndex;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

/// Builds the initial pairing vector from the roster's board hints.
///
/// With `collapse_byes` orphans are gathered and paired among themselves
/// (plus one bye if their count is odd); without it every orphan keeps a
/// bye board of its own. Locked boards and granted bye requests are
/// appended after the open pairings, and `sort_boards` settles the final
/// board order.
pub fn hint_pairings(roster: &Roster, pair: &mut PairVector, collapse_byes: bool) {
    debug_assert!(!roster.is_empty() && roster.players().last().is_some_and(|p| p.is_bye()));
    debug_assert!(roster
        .players()
        .iter()
        .enumerate()
        .all(|(position, p)| p.rank == position));

    let bye_index = roster.len() - 1;
    // Stable sort keeps rank order within one board number, so the upper
    // half of a hinted board comes out first.
    let mut hinted: Vec<(i32, usize)> = roster.players()[..bye_index]
        .iter()
        .enumerate()
        .filter(|(_, p)| p.board_num != -1)
        .map(|(rank, p)| (p.board_num, rank))
        .collect();
    hinted.sort_by_key(|&(board, _)| board);

    pair.clear();
    let mut single: Vec<usize> = Vec::new(); // orphans that need pairing
    let mut other: Vec<usize> = Vec::new(); // locked boards and kept byes

    let mut serve_orphan = |rank: usize, single: &mut Vec<usize>, other: &mut Vec<usize>| {
        let player = &roster.players()[rank];
        if player.paired || player.bye_request || !collapse_byes {
            other.push(rank);
            other.push(bye_index);
        } else {
            single.push(rank);
        }
    };

    let mut i = 0;
    while i < hinted.len() {
        let (board1, rank1) = hinted[i];
        let p1 = &roster.players()[rank1];
        match hinted.get(i + 1) {
            None => {
                // Last hinted board, originally scheduled for a bye.
                serve_orphan(rank1, &mut single, &mut other);
                i += 1;
            }
            Some(&(board2, rank2)) => {
                let p2 = &roster.players()[rank2];
                if board2 != board1
                    || p2.paired != p1.paired
                    || (!p1.paired && (p1.bye_request || p2.bye_request))
                {
                    // Serve only the first player, leaving the second for
                    // the next iteration.
                    serve_orphan(rank1, &mut single, &mut other);
                    i += 1;
                } else if p1.paired {
                    other.push(rank1);
                    other.push(rank2);
                    i += 2;
                } else {
                    pair.push(PlayerIndex::new(rank1));
                    pair.push(PlayerIndex::new(rank2));
                    i += 2;
                }
            }
        }
    }
    // Players with no hint at all join the orphans.
    for rank in 0..bye_index {
        if roster.players()[rank].board_num == -1 {
            serve_orphan(rank, &mut single, &mut other);
        }
    }

    // Merge: open pairs, then orphans (bye-padded to even), then the rest.
    pair.extend(single.into_iter().map(PlayerIndex::new));
    if pair.len() % 2 != 0 {
        pair.push(PlayerIndex::new(bye_index));
    }
    pair.extend(other.into_iter().map(PlayerIndex::new));

    // Upper half first on every board, then settle board order.
    for x in (0..pair.len()).step_by(2) {
        if roster.player(pair[x]).rank > roster.player(pair[x + 1]).rank {
            pair.swap(x, x + 1);
        }
    }
    sort_boards(roster, pair);
}
