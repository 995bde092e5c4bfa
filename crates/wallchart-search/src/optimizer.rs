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

//! The pairing optimizer: first-improvement greedy descent.
//!
//! The search enumerates `2d`-tuples of slots with an odometer cursor,
//! tries every move class on each tuple, and commits the first candidate
//! that strictly lowers the lexicographic cost. Enumeration is focused on
//! the players the current cost actually touches, which keeps the tuple
//! space tractable; depth `d` grows only after a full pass at the current
//! depth finds nothing.
//!
//! The multi-round look-ahead dominates evaluation time, so the descent
//! first runs without it; if the look-ahead then disagrees with the final
//! cost, the whole descent re-runs with it enabled. The last evaluation
//! always runs fully coded to leave stable warn codes behind.
//!
//! The descent guarantees monotone improvement, not a global optimum: warn
//! codes on the output are the operator's cue to re-run with a different
//! hint.

use crate::boards::sort_boards;
use crate::moves::{self, Move};
use crate::stats::SearchStatistics;
use wallchart_cost::eval::CostEvaluator;
use wallchart_cost::vector::CostVector;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;
use wallchart_model::warning::Warnings;

/// Advances the odometer cursor to the next tuple, skipping slot values
/// that sit past the window or point at a bye. Returns `false` once the
/// cursor wraps around.
fn advance_cursor(
    cursor: &mut [usize],
    roster: &Roster,
    best_pair: &PairVector,
    p_begin: usize,
    p_end: usize,
) -> bool {
    let mut j = 0;
    while j < cursor.len() {
        cursor[j] += 1;
        if cursor[j] >= p_end || roster.player(best_pair[cursor[j]]).is_bye() {
            cursor[j] = p_begin;
            j += 1;
        } else {
            break;
        }
    }
    !cursor.iter().all(|&slot| slot == p_begin)
}

/// Minimizes the pairing cost over the window `p_begin..p_end` by greedy
/// descent with up to `depth` simultaneous slot swaps, mutating `pair`
/// into the best pairing found and returning its fully-coded cost.
///
/// Depth one finishes in seconds; depth two takes a minute on a small
/// section; anything beyond that is patience research.
#[allow(clippy::too_many_arguments)]
pub fn minimize_pairing_cost(
    roster: &Roster,
    pair: &mut PairVector,
    remaining_rounds: usize,
    depth: usize,
    p_begin: usize,
    p_end: usize,
    use_pairable_cost: bool,
    evaluator: &CostEvaluator,
    warnings: &mut Warnings,
    stats: &mut SearchStatistics,
) -> CostVector {
    // A window ending on the odd slot of a bye board swallows the bye.
    let mut p_end = p_end;
    let has_bye = p_end % 2 != 0;
    if has_bye && p_end < pair.len() && roster.player(pair[p_end]).is_bye() {
        p_end += 1;
    }
    debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
    debug_assert!(p_begin <= p_end && p_end <= pair.len());

    let mut best_pair = pair.clone();
    let evaluation = evaluator.evaluate(
        roster,
        &best_pair,
        remaining_rounds,
        p_begin,
        p_end,
        false,
        use_pairable_cost,
        warnings,
    );
    stats.on_cost_evaluation();
    let mut best_cost = evaluation.cost;
    let mut best_cost_players = evaluation.cost_players;

    let mut d = 1usize;
    while p_begin < p_end && d <= depth {
        let mut cursor = vec![p_begin; 2 * d];
        let mut found_better = false;

        'tuples: while !best_cost.is_zero() {
            if !advance_cursor(&mut cursor, roster, &best_pair, p_begin, p_end) {
                break;
            }
            // Skip mirrored and unfocused tuples. At depth one the pairs
            // must be strictly increasing; deeper searches allow repeats
            // so a tuple can degenerate to fewer distinct swaps.
            for j in (0..cursor.len()).step_by(2) {
                let out_of_order = (j > 0
                    && (if d <= 1 {
                        cursor[j] <= cursor[j - 2]
                    } else {
                        cursor[j] < cursor[j - 2]
                    }))
                    || (if d <= 1 {
                        cursor[j + 1] <= cursor[j]
                    } else {
                        cursor[j + 1] < cursor[j]
                    });
                if out_of_order {
                    continue 'tuples;
                }
                if !best_cost_players.contains(best_pair[cursor[j]].get())
                    && !best_cost_players.contains(best_pair[cursor[j + 1]].get())
                {
                    continue 'tuples;
                }
            }

            let mut max_change = 0usize;
            for j in (0..cursor.len()).step_by(2) {
                debug_assert!(if d <= 1 {
                    cursor[j + 1] > cursor[j]
                } else {
                    cursor[j + 1] >= cursor[j]
                });
                max_change = max_change.max(cursor[j + 1] - cursor[j]);
            }
            // Adjacent slots cannot rotate anywhere a swap would not reach.
            let all_moves: &[Move] = &Move::ALL;
            let move_classes = if max_change <= 2 {
                &all_moves[..1]
            } else {
                all_moves
            };

            'classes: for &mv in move_classes {
                let mut test_pair = best_pair.clone();
                for j in (0..cursor.len()).step_by(2) {
                    let (x, y) = (cursor[j], cursor[j + 1]);
                    if x >= y {
                        debug_assert!(d >= 2 && x == y);
                        continue;
                    }
                    if !moves::apply(mv, roster, &mut test_pair, x, y, p_begin, p_end, has_bye) {
                        continue 'classes;
                    }
                }
                // Repair slot order: the upper half holds the better rank.
                for slot in (0..test_pair.len()).step_by(2) {
                    if test_pair[slot] >= test_pair[slot + 1] {
                        test_pair.swap(slot, slot + 1);
                    }
                }
                sort_boards(roster, &mut test_pair);
                stats.on_move_tried(mv);
                let test = evaluator.evaluate(
                    roster,
                    &test_pair,
                    remaining_rounds,
                    p_begin,
                    p_end,
                    false,
                    use_pairable_cost,
                    warnings,
                );
                stats.on_cost_evaluation();
                if test.cost < best_cost {
                    stats.on_move_accepted(mv);
                    best_pair = test_pair;
                    best_cost = test.cost;
                    best_cost_players = test.cost_players;
                    found_better = true;
                }
            }
        }

        if !found_better {
            d += 1;
        }
        // On improvement the same depth restarts from the new basin.
    }

    *pair = best_pair;

    if !use_pairable_cost {
        // The descent ran without the expensive look-ahead; check whether
        // it bypassed an infeasibility and redo with it enabled if so.
        let check = evaluator.evaluate(
            roster,
            pair,
            remaining_rounds,
            p_begin,
            p_end,
            false,
            true,
            warnings,
        );
        stats.on_cost_evaluation();
        if check.cost != best_cost {
            return minimize_pairing_cost(
                roster,
                pair,
                remaining_rounds,
                depth,
                p_begin,
                p_end,
                true,
                evaluator,
                warnings,
                stats,
            );
        }
    }

    // Same cost as the descent's best, but with warn codes rebuilt.
    let finale = evaluator.evaluate(
        roster,
        pair,
        remaining_rounds,
        p_begin,
        p_end,
        true,
        true,
        warnings,
    );
    stats.on_cost_evaluation();
    finale.cost
}
