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

//! The cost evaluator.
//!
//! Walks a window of the pairing vector board by board, runs every cost
//! component from both players' perspectives, and accumulates the
//! lexicographic cost vector. Warn-code letters advance in lockstep with
//! the components, so the letter attached to a violation identifies the
//! rule in the session catalog.
//!
//! The evaluator also collects the set of players any nonzero component
//! touched. The optimizer narrows its move enumeration to that set, which
//! is what makes depth-two searches affordable on full sections.

use crate::allocate::allocate_color;
use crate::components;
use crate::feasibility::pairable_cost;
use crate::ratings::{highest_rating, median_rating, unrated_rating};
use crate::vector::{CostTerm, CostVector};
use fixedbitset::FixedBitSet;
use wallchart_core::num::CostValue;
use wallchart_model::index::PlayerIndex;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;
use wallchart_model::warning::{CodeLadder, WarnCode, Warnings};

const DESC_BYE_CHOICE: &str = "Bye request mismatch (22C,28M1,29K)";
const DESC_BYE_AGAIN: &str = "Bye ineligible (28L3)";
const DESC_IDENTICAL_MATCH: &str = "IdenticalMatch";
const DESC_MEET_TWICE: &str = "Players meet twice (27A1,28S1,28S2,29C2)";
const DESC_CANT_PAIR: &str = "Can't pair future rounds (27A1)";
const DESC_CANT_PAIR_TEAMS: &str = "Can't pair future rounds with team block (28N,U)";
const DESC_TEAM_BLOCKS2: &str = "Team block violated, not plus-two (28N,U)";
const DESC_UNEQUAL_SCORES: &str = "Unequal scores (27A2,29A,29B)";
const DESC_TEAM_BLOCKS: &str = "Team block violated (28N,U)";
const DESC_BYE_AFTER_HALF: &str = "Bye after half (28L4)";
const DESC_LOWEST_SCORE_BYE: &str = "Bye player is not from the lowest score group (28L2)";
const DESC_LOWEST_RATED_BYE: &str =
    "Bye player unrated and (if cost=2) may have too few games (28L2)";
const DESC_ODD_UNRATED: &str = "Odd player unrated (29D1)";
const DESC_ODD_MULTIPLE_GROUPS: &str = "Odd player across multiple groups (29D2)";
const DESC_COLOR_IMBALANCE: &str = "Color not balanced (27A4)";
const DESC_COLOR_REPEAT3: &str = "Color 3+ in a row (29E5f)";
const DESC_COLOR_ALTERNATE: &str = "Color not alternating (27A5)";
const DESC_PAIRING_CARD: &str = "Transposed/Interchanged pair number (28A,28B,29A)";
const DESC_REVERSED_COLORS: &str = "Colors reversed for pair (28J;29E2,4)";
const DESC_BOARD_OVERLAP: &str = "Board number overlap (28J)";
const DESC_BOARD_ORDER: &str = "Board number order (28J)";

fn interchange_description(threshold: usize) -> &'static str {
    if threshold >= 200 {
        "Interchange above 200 (27A3;29E5b,e,g)"
    } else if threshold >= 80 {
        "Interchange above 80 (27A3;29E5b,e,g)"
    } else {
        "Interchange above 0 (27A5)"
    }
}

fn transpose_description(threshold: usize) -> &'static str {
    if threshold >= 200 {
        "Transpose above 200 (29C1,29E5b,g)"
    } else if threshold >= 80 {
        "Transpose above 80 (29C1,29E5b,g)"
    } else {
        "Transpose above 0 (29C1)"
    }
}

/// The result of one evaluation: the cost vector plus the players any
/// nonzero component touched.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub cost: CostVector,
    pub cost_players: FixedBitSet,
}

/// Configuration for cost evaluation.
///
/// The default follows USCF variation 28N3 at its lowest threshold: team
/// blocks are costed but do not get the pre-score split term or the
/// team-constrained look-ahead, so blocks in small sections cannot push
/// around the top boards.
#[derive(Clone, Copy, Debug, Default)]
pub struct CostEvaluator {
    /// Enables the `TeamBlocks2` term and the team-constrained pairability
    /// look-ahead (`CantPairTeams`).
    pub use_team_pairability: bool,
}

impl CostEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the window `p_begin..p_end` of the pairing vector.
    ///
    /// With `do_codes` the per-player warn codes in `warnings` are rebuilt
    /// and the cosmetic board terms are included; without it the evaluator
    /// is the fast inner-loop scoring function. `use_pairable_cost` runs
    /// the multi-round look-ahead, which dominates the runtime and is
    /// deferred by the optimizer until a candidate survives without it.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        roster: &Roster,
        pair: &PairVector,
        remaining_rounds: usize,
        p_begin: usize,
        p_end: usize,
        do_codes: bool,
        use_pairable_cost: bool,
        warnings: &mut Warnings,
    ) -> Evaluation {
        debug_assert!(pair.len() % 2 == 0);
        debug_assert!(!roster.is_empty() && roster.players().last().is_some_and(|p| p.is_bye()));
        debug_assert!(
            roster
                .players()
                .windows(2)
                .all(|w| w[0].canonical_cmp(&w[1]) == std::cmp::Ordering::Less),
            "called `CostEvaluator::evaluate` with a roster out of canonical order"
        );
        debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
        debug_assert!(p_begin <= p_end && p_end <= pair.len());

        // Granted bye requests are not this round's problem; trim them off
        // the evaluated window.
        let mut p_end = p_end;
        while p_begin < p_end
            && roster.player(pair[p_end - 1]).is_bye()
            && (roster.player(pair[p_end - 2]).bye_request
                || roster.player(pair[p_end - 2]).bye_house)
        {
            p_end -= 2;
        }

        let players = roster.len();
        let mut cost = CostVector::zero(players - 1);
        let mut cost_players = FixedBitSet::with_capacity(players);

        if do_codes {
            for x in p_begin..p_end {
                warnings.clear_player(pair[x]);
            }
        }

        let mut lowest_score = if pair.is_empty() {
            0.0
        } else {
            roster.player(pair[0]).score
        };
        for x in (p_begin..p_end).step_by(2) {
            lowest_score = lowest_score
                .min(roster.player(pair[x]).score)
                .min(roster.player(pair[x + 1]).score);
        }

        let mut is_house_player = false;
        let mut last_score = -1.0_f32;
        let mut last_median = 0;
        let mut last_unrated = 0;
        let mut last_highest = 0;
        // Defaults matter when the window is empty: the post-loop passes
        // still need their letters.
        let mut wcode_bye_choice = WarnCode::from_char('A').expect("letter");
        let mut wcode_players = WarnCode::from_char('A').expect("letter");
        let mut wcode_teams = WarnCode::from_char('B').expect("letter");
        let mut wcode_pair_card = WarnCode::from_char('C').expect("letter");

        for x in (p_begin..p_end).step_by(2) {
            let last_cost = cost.clone();
            let mut ladder = CodeLadder::new();
            let ix = pair[x];
            let iy = pair[x + 1];
            let px = roster.player(ix);
            let py = roster.player(iy);
            if px.bye_house || py.bye_house {
                is_house_player = true;
            }
            let x_color = allocate_color(px, py, (x / 2) % 2 == 0);
            let y_color = x_color.flip();

            // Rating scans are per score group; reuse the previous board's
            // results whenever the group has not changed.
            let mx = if px.score == last_score {
                last_median
            } else {
                median_rating(roster, pair, px.score, p_begin, p_end)
            };
            let my = if py.score == last_score {
                last_median
            } else if py.score == px.score {
                mx
            } else {
                median_rating(roster, pair, py.score, p_begin, p_end)
            };
            let ux = if px.score == last_score {
                last_unrated
            } else {
                unrated_rating(roster, pair, px.score, p_begin, p_end)
            };
            let uy = if py.score == last_score {
                last_unrated
            } else if py.score == px.score {
                ux
            } else {
                unrated_rating(roster, pair, py.score, p_begin, p_end)
            };
            let hx = if px.score == last_score {
                last_highest
            } else {
                highest_rating(roster, pair, px.score, p_begin, p_end)
            };
            let hy = if py.score == last_score {
                last_highest
            } else if py.score == px.score {
                hx
            } else {
                highest_rating(roster, pair, py.score, p_begin, p_end)
            };
            if last_score != px.score {
                last_score = px.score;
                last_median = mx;
                last_unrated = ux;
                last_highest = hx;
            }

            let note = |warnings: &mut Warnings,
                            player: PlayerIndex,
                            code: WarnCode,
                            description: &'static str,
                            value: CostValue| {
                if do_codes && value != 0 {
                    warnings.record(player, code, description);
                }
            };

            {
                let code = ladder.bump();
                wcode_bye_choice = code;
                let vx = components::bye_choice(px, py);
                let vy = components::bye_choice(py, px);
                note(warnings, ix, code, DESC_BYE_CHOICE, vx);
                note(warnings, iy, code, DESC_BYE_CHOICE, vy);
                cost.add(CostTerm::ByeChoice, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::bye_again(px, py, players);
                let vy = components::bye_again(py, px, players);
                note(warnings, ix, code, DESC_BYE_AGAIN, vx);
                note(warnings, iy, code, DESC_BYE_AGAIN, vy);
                cost.add(CostTerm::ByeAgain, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::identical_match(px, py, players, x_color);
                let vy = components::identical_match(py, px, players, y_color);
                note(warnings, ix, code, DESC_IDENTICAL_MATCH, vx);
                note(warnings, iy, code, DESC_IDENTICAL_MATCH, vy);
                cost.add(CostTerm::PlayersMeetTwice, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::players_meet_twice(px, py, players);
                let vy = components::players_meet_twice(py, px, players);
                note(warnings, ix, code, DESC_MEET_TWICE, vx);
                note(warnings, iy, code, DESC_MEET_TWICE, vy);
                cost.add(CostTerm::PlayersMeetTwice, vx.saturating_add(vy));
            }
            wcode_players = ladder.bump();
            if self.use_team_pairability {
                let code = ladder.bump();
                let vx = components::team_blocks2(px, py, players);
                let vy = components::team_blocks2(py, px, players);
                note(warnings, ix, code, DESC_TEAM_BLOCKS2, vx);
                note(warnings, iy, code, DESC_TEAM_BLOCKS2, vy);
                cost.add(CostTerm::TeamBlocks2, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::unequal_scores(px, py);
                let vy = components::unequal_scores(py, px);
                note(warnings, ix, code, DESC_UNEQUAL_SCORES, vx);
                note(warnings, iy, code, DESC_UNEQUAL_SCORES, vy);
                cost.add(CostTerm::UnequalScores, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::team_blocks(px, py, players);
                let vy = components::team_blocks(py, px, players);
                note(warnings, ix, code, DESC_TEAM_BLOCKS, vx);
                note(warnings, iy, code, DESC_TEAM_BLOCKS, vy);
                cost.add(CostTerm::TeamBlocks, vx.saturating_add(vy));
            }
            if self.use_team_pairability {
                wcode_teams = ladder.bump();
            }
            {
                let code = ladder.bump();
                let vx = components::bye_after_half(px, py, players);
                let vy = components::bye_after_half(py, px, players);
                note(warnings, ix, code, DESC_BYE_AFTER_HALF, vx);
                note(warnings, iy, code, DESC_BYE_AFTER_HALF, vy);
                cost.add(CostTerm::ByeAfterHalf, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::lowest_score_bye(px, py, players, lowest_score);
                let vy = components::lowest_score_bye(py, px, players, lowest_score);
                note(warnings, ix, code, DESC_LOWEST_SCORE_BYE, vx);
                note(warnings, iy, code, DESC_LOWEST_SCORE_BYE, vy);
                cost.add(CostTerm::LowestScoreBye, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::lowest_rated_bye(px, py, remaining_rounds);
                let vy = components::lowest_rated_bye(py, px, remaining_rounds);
                note(warnings, ix, code, DESC_LOWEST_RATED_BYE, vx);
                note(warnings, iy, code, DESC_LOWEST_RATED_BYE, vy);
                cost.add(CostTerm::LowestRatedBye, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::odd_player_unrated(px, py);
                let vy = components::odd_player_unrated(py, px);
                note(warnings, ix, code, DESC_ODD_UNRATED, vx);
                note(warnings, iy, code, DESC_ODD_UNRATED, vy);
                cost.add(CostTerm::OddPlayerUnrated, vx.saturating_add(vy));
            }
            {
                let code = ladder.bump();
                let vx = components::odd_player_multiple_groups(px, py, players);
                let vy = components::odd_player_multiple_groups(py, px, players);
                note(warnings, ix, code, DESC_ODD_MULTIPLE_GROUPS, vx);
                note(warnings, iy, code, DESC_ODD_MULTIPLE_GROUPS, vy);
                cost.add(CostTerm::OddPlayerMultipleGroups, vx.saturating_add(vy));
            }
            for (term_i, term_t, threshold) in [
                (CostTerm::Interchange200, CostTerm::Transpose200, 200usize),
                (CostTerm::Interchange80, CostTerm::Transpose80, 80),
                (CostTerm::Interchange0, CostTerm::Transpose0, 0),
            ] {
                {
                    let code = ladder.bump();
                    let vx = components::interchange(px, py, players, mx, hx, ux, threshold);
                    let vy = components::interchange(py, px, players, my, hy, uy, threshold);
                    note(warnings, ix, code, interchange_description(threshold), vx);
                    note(warnings, iy, code, interchange_description(threshold), vy);
                    cost.add(term_i, vx.saturating_add(vy));
                }
                {
                    let code = ladder.bump();
                    let vx =
                        components::transpose(roster, pair, x, x + 1, ux, threshold, p_begin, p_end);
                    let vy =
                        components::transpose(roster, pair, x + 1, x, uy, threshold, p_begin, p_end);
                    note(warnings, ix, code, transpose_description(threshold), vx);
                    note(warnings, iy, code, transpose_description(threshold), vy);
                    cost.add(term_t, vx.saturating_add(vy));
                }
                // The color terms interleave with the thresholds: strong
                // rules between 200 and 80, weak alternation between 80
                // and 0. Even multiround series swap colors internally and
                // skip the color terms entirely.
                if px.multiround % 2 == 1 {
                    if threshold == 200 {
                        {
                            let code = ladder.bump();
                            let vx = components::color_imbalance(px, py, x_color);
                            let vy = components::color_imbalance(py, px, y_color);
                            note(warnings, ix, code, DESC_COLOR_IMBALANCE, vx);
                            note(warnings, iy, code, DESC_COLOR_IMBALANCE, vy);
                            cost.add(CostTerm::ColorImbalance, vx.saturating_add(vy));
                        }
                        {
                            let code = ladder.bump();
                            let vx = components::color_repeat3(px, py, x_color);
                            let vy = components::color_repeat3(py, px, y_color);
                            note(warnings, ix, code, DESC_COLOR_REPEAT3, vx);
                            note(warnings, iy, code, DESC_COLOR_REPEAT3, vy);
                            cost.add(CostTerm::ColorRepeat3, vx.saturating_add(vy));
                        }
                    } else if threshold == 80 {
                        let code = ladder.bump();
                        let vx = components::color_alternate(px, py, x_color);
                        let vy = components::color_alternate(py, px, y_color);
                        note(warnings, ix, code, DESC_COLOR_ALTERNATE, vx);
                        note(warnings, iy, code, DESC_COLOR_ALTERNATE, vy);
                        cost.add(CostTerm::ColorAlternate, vx.saturating_add(vy));
                    }
                }
            }
            wcode_pair_card = ladder.bump();
            if do_codes {
                {
                    let code = ladder.bump();
                    let vx = components::reversed_colors(px, x_color);
                    let vy = components::reversed_colors(py, y_color);
                    note(warnings, ix, code, DESC_REVERSED_COLORS, vx);
                    note(warnings, iy, code, DESC_REVERSED_COLORS, vy);
                    cost.add(CostTerm::ReversedColors, vx.saturating_add(vy));
                }
                {
                    let code = ladder.bump();
                    let vx = components::board_overlap(roster, pair, px, py);
                    let vy = components::board_overlap(roster, pair, py, px);
                    note(warnings, ix, code, DESC_BOARD_OVERLAP, vx);
                    note(warnings, iy, code, DESC_BOARD_OVERLAP, vy);
                    cost.add(CostTerm::BoardOverlap, vx.saturating_add(vy));
                }
                {
                    let code = ladder.bump();
                    let vx =
                        components::board_order(roster, pair, px, py, x, x + 1, p_begin, p_end);
                    let vy =
                        components::board_order(roster, pair, py, px, x + 1, x, p_begin, p_end);
                    note(warnings, ix, code, DESC_BOARD_ORDER, vx);
                    note(warnings, iy, code, DESC_BOARD_ORDER, vy);
                    cost.add(CostTerm::BoardOrder, vx.saturating_add(vy));
                }
            }

            if cost != last_cost {
                cost_players.insert(ix.get());
                if x + 1 < p_end {
                    cost_players.insert(iy.get());
                }
            }
        }

        // An odd section must hand out one bye; without this credit the
        // zero vector would be unreachable and the search could never stop
        // early. The credited bye is no violation, so its code comes off
        // the player as well.
        if !is_house_player
            && p_end >= 2
            && roster.player(pair[p_end - 1]).is_bye()
            && !roster.player(pair[p_end - 2]).bye_request
        {
            cost.add(CostTerm::ByeChoice, -1);
            if do_codes {
                warnings.remove(pair[p_end - 2], wcode_bye_choice);
            }
        }

        if use_pairable_cost {
            let infeasible = pairable_cost(roster, pair, remaining_rounds, false);
            cost.set(CostTerm::CantPairPlayers, infeasible);
            if do_codes && infeasible != 0 {
                warnings.record(PlayerIndex::new(0), wcode_players, DESC_CANT_PAIR);
            }
            if self.use_team_pairability && infeasible == 0 {
                let team_infeasible = pairable_cost(roster, pair, remaining_rounds, true);
                cost.set(CostTerm::CantPairTeams, team_infeasible);
                if do_codes && team_infeasible != 0 {
                    warnings.record(PlayerIndex::new(0), wcode_teams, DESC_CANT_PAIR_TEAMS);
                }
            }
        }

        let card = self.pairing_card(
            roster,
            pair,
            wcode_pair_card,
            do_codes,
            &mut cost_players,
            warnings,
        );
        cost.set(CostTerm::PairingCard, card);

        Evaluation { cost, cost_players }
    }

    /// Pair-number ordering violations: transposed upper halves, transposed
    /// lower halves, interchanges against the top board, and mis-ordered
    /// drop-downs, smoothed by the roster distance between the offenders.
    fn pairing_card(
        &self,
        roster: &Roster,
        pair: &PairVector,
        code: WarnCode,
        do_codes: bool,
        cost_players: &mut FixedBitSet,
        warnings: &mut Warnings,
    ) -> CostValue {
        let mut num: CostValue = 0;
        let hit = |warnings: &mut Warnings,
                       cost_players: &mut FixedBitSet,
                       num: &mut CostValue,
                       a: PlayerIndex,
                       b: PlayerIndex| {
            *num = num.saturating_add(a.get().abs_diff(b.get()) as CostValue);
            if do_codes {
                warnings.record(a, code, DESC_PAIRING_CARD);
            }
            cost_players.insert(a.get());
            cost_players.insert(b.get());
        };
        for x in (0..pair.len()).step_by(2) {
            for y in ((x + 2)..pair.len()).step_by(2) {
                // Transposed upper half.
                let a = roster.player(pair[x]);
                let b = roster.player(pair[y]);
                if a.paired == b.paired
                    && a.score == b.score
                    && (a.rating == b.rating || a.rating == 0)
                    && !a.is_bye()
                    && !b.is_bye()
                    && a.rand > b.rand
                {
                    hit(warnings, cost_players, &mut num, pair[x], pair[y]);
                }
                // Transposed lower half.
                let a = roster.player(pair[x + 1]);
                let b = roster.player(pair[y + 1]);
                if a.paired == b.paired
                    && a.score == b.score
                    && (a.rating == b.rating || a.rating == 0)
                    && !a.is_bye()
                    && !b.is_bye()
                    && a.rand > b.rand
                {
                    hit(warnings, cost_players, &mut num, pair[x + 1], pair[y + 1]);
                }
            }
            let upper = roster.player(pair[x]);
            let lower = roster.player(pair[x + 1]);
            debug_assert!(upper.score >= lower.score || lower.is_bye());
            let is_drop_down = upper.score != lower.score || lower.is_bye();
            // Interchanged against the top board's lower half.
            if !is_drop_down && pair.len() > 1 {
                let top_lower = roster.player(pair[1]);
                if upper.paired == top_lower.paired
                    && upper.score == top_lower.score
                    && upper.rating == top_lower.rating
                    && !upper.is_bye()
                    && !top_lower.is_bye()
                    && upper.rand > top_lower.rand
                {
                    hit(warnings, cost_players, &mut num, pair[x], pair[1]);
                }
            }
            // Mis-ordered drop-down: the wrong card dropped.
            if is_drop_down && x > 0 {
                let previous = roster.player(pair[x - 1]);
                if upper.paired == previous.paired
                    && upper.score == previous.score
                    && upper.rating == previous.rating
                    && !upper.is_bye()
                    && !previous.is_bye()
                    && upper.rand < previous.rand
                {
                    hit(warnings, cost_players, &mut num, pair[x], pair[x - 1]);
                }
            }
        }
        num
    }
}
