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

//! Multi-round pairability: can the remaining rounds still be completed?
//!
//! A pairing that looks fine this round can paint a small section into a
//! corner where some later round has no rematch-free completion. The check
//! here is a bounded backtracking search over round-robin-like completions
//! of the remaining schedule: the grid's lower triangle holds everything
//! already unavailable (past meetings, team blocks, the currently proposed
//! boards) and the upper triangle holds the tentative assignments of the
//! round being completed. Invented completions need not match any published
//! round-robin table; they only need to exist.
//!
//! Cost-wise this sits right after the rematch term, so the optimizer
//! prefers near-term correctness first and future-round safety second.

use crate::diagnostic;
use fixedbitset::FixedBitSet;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;
use wallchart_core::num::CostValue;

/// Marks the diagonal of a fresh grid.
const SELF_MARK: i32 = -11;
/// Marks pairs that are unavailable in every remaining round.
const BLOCKED: i32 = -1;

/// The symmetric availability grid. Negative cells are permanently blocked
/// pairs, positive cells in the upper triangle are tentative assignments of
/// the round currently being completed.
#[derive(Clone, Debug)]
pub struct PairGrid {
    n: usize,
    cells: Vec<i32>,
}

impl PairGrid {
    /// A fresh grid for `n` players with only the diagonal marked.
    pub fn new(n: usize) -> Self {
        let mut grid = Self {
            n,
            cells: vec![0; n * n],
        };
        for x in 0..n {
            grid.set(x, x, SELF_MARK);
        }
        grid
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.cells[row * self.n + col] = value;
    }

    /// Blocks the unordered pair `(a, b)` in the lower triangle.
    #[inline]
    pub fn block(&mut self, a: usize, b: usize) {
        debug_assert!(a != b, "called `PairGrid::block` with a self pair {a}");
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.set(high, low, BLOCKED);
    }
}

/// Per-player bye rounds over the remaining schedule. Bit `r` of a player's
/// row means the player sits out the round that is `r` rounds from the end.
#[derive(Clone, Debug)]
pub struct ByeGrid {
    rows: Vec<FixedBitSet>,
}

impl ByeGrid {
    pub fn new(players: usize, remaining_rounds: usize) -> Self {
        Self {
            rows: vec![FixedBitSet::with_capacity(remaining_rounds); players],
        }
    }

    #[inline]
    pub fn set(&mut self, player: usize, round_from_end: usize) {
        self.rows[player].insert(round_from_end);
    }

    #[inline]
    pub fn on_bye(&self, player: usize, round_from_end: usize) -> bool {
        self.rows[player].contains(round_from_end)
    }
}

/// Whether the remaining `rounds` can all be completed. Entry point of the
/// recursion: computes the first round's row window from the bye count and
/// descends.
pub fn pairable(grid: &mut PairGrid, rounds: usize, bye: &ByeGrid) -> bool {
    if rounds == 0 {
        return true;
    }
    let players = grid.len();
    let byes = (0..players).filter(|&x| bye.on_bye(x, rounds - 1)).count();
    let end = players + 1 - (players - byes) / 2;
    pairable_window(grid, rounds, bye, 0, end)
}

/// Tries to place the remaining boards of the current round using rows
/// `begin..end`, recursing into the next round once the round is full.
///
/// `begin` tracks how many boards are already placed, `end` how many may
/// still be placed; the window narrows the branching the way the fixed
/// column order of a round-robin table would.
fn pairable_window(
    grid: &mut PairGrid,
    rounds: usize,
    bye: &ByeGrid,
    begin: usize,
    end: usize,
) -> bool {
    let players = grid.len();
    if players <= 1 {
        return true;
    }
    if players < end {
        diagnostic(format_args!(
            "pairable window end {} exceeds {} players",
            end, players
        ));
    }
    for row in begin..end.min(players) {
        if bye.on_bye(row, rounds - 1) {
            continue;
        }
        'col: for col in row + 1..players {
            if bye.on_bye(col, rounds - 1) {
                continue;
            }
            if grid.get(row, col) != 0 || grid.get(col, row) != 0 {
                continue;
            }
            for z in 0..row {
                if grid.get(z, col) != 0 || grid.get(z, row) != 0 {
                    // One of the two is already on a board this round.
                    continue 'col;
                }
            }
            grid.set(row, col, rounds as i32);
            if end >= players {
                // The round is complete.
                if rounds <= 1 {
                    return true;
                }
                // Commit this round into the lower triangle and recurse.
                let mut next = grid.clone();
                for x in 0..players - 1 {
                    for y in x + 1..players {
                        if grid.get(x, y) != 0 {
                            next.set(y, x, rounds as i32);
                        }
                        next.set(x, y, 0);
                    }
                }
                if pairable(&mut next, rounds - 1, bye) {
                    *grid = next;
                    return true;
                }
            } else if pairable_window(grid, rounds, bye, row + 1, end + 1) {
                return true;
            }
            grid.set(row, col, 0);
        }
    }
    false
}

/// Whether a single team holds at least half the section. The exhaustive
/// team-constrained search degenerates in that case, and the majority would
/// force rematches anyway, so the check treats it as infeasible outright.
pub fn is_one_team_majority(roster: &Roster) -> bool {
    debug_assert!(!roster.is_empty() && roster.players().last().is_some_and(|p| p.is_bye()));
    let mut teams: Vec<i32> = roster
        .players()
        .iter()
        .filter(|p| !p.is_bye())
        .map(|p| p.team_id)
        .collect();
    teams.sort_unstable();
    let mut mode = 0;
    let mut mode_count = 0usize;
    let mut current = 0;
    let mut current_count = 0usize;
    for &team in &teams {
        if team == current {
            current_count += 1;
        } else {
            current = team;
            current_count = 1;
        }
        if current_count > mode_count {
            mode = current;
            mode_count = current_count;
        }
    }
    // At least half, not just a strict majority: sections split exactly in
    // half already blow up the search.
    mode != 0 && 2 * mode_count >= teams.len()
}

/// Returns 1 when the remaining rounds cannot be completed from this
/// pairing, 0 when they can. With `is_team` the team blocks join the prior
/// meetings as unavailable pairs.
pub fn pairable_cost(
    roster: &Roster,
    pair: &PairVector,
    remaining_rounds: usize,
    is_team: bool,
) -> CostValue {
    if remaining_rounds == 0 {
        return 0;
    }
    if is_team && is_one_team_majority(roster) {
        return 1;
    }
    let rounds = roster.players()[0].round.max(0) as usize + remaining_rounds;
    let num = roster.len() - 1;
    let mut bye = ByeGrid::new(num, remaining_rounds);
    let mut grid = PairGrid::new(num);
    for y in 0..num {
        let player = &roster.players()[y];
        let r1 = player.rank;
        if r1 >= num {
            diagnostic(format_args!(
                "pairability inputs look wrong: rank {} outside {} players",
                r1, num
            ));
            continue;
        }
        for &bye_round in &player.bye_rounds {
            let bye_round = bye_round.max(0) as usize;
            if bye_round > rounds {
                diagnostic(format_args!(
                    "invalid bye round {} for player rank {}",
                    bye_round, r1
                ));
            } else if rounds - bye_round < remaining_rounds {
                bye.set(r1, rounds - bye_round);
            }
        }
        for &r2 in &player.opponent_ranks {
            if r2 < num {
                grid.block(r1, r2);
            }
        }
        if is_team {
            for &r2 in &player.teammate_ranks {
                if r2 < num {
                    grid.block(r1, r2);
                }
            }
        }
    }
    // The proposed boards of this round are just as unavailable as history.
    debug_assert!(pair.len() % 2 == 0);
    for x in (0..pair.len()).step_by(2) {
        let (upper, lower) = pair.board(x / 2);
        debug_assert!(upper != lower);
        if !roster.player(upper).is_bye() && !roster.player(lower).is_bye() {
            grid.block(upper.get(), lower.get());
        }
    }
    CostValue::from(!pairable(&mut grid, remaining_rounds, &bye))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::index::PlayerIndex;
    use wallchart_model::player::Player;

    fn roster_of(count: usize) -> Roster {
        let players: Vec<Player> = (0..count)
            .map(|i| Player::new(i as i32 + 1, 1500 - i as i32, 0.01 * (i as f64 + 1.0)))
            .collect();
        Roster::canonicalize(players).unwrap()
    }

    fn straight_pair(roster: &Roster) -> PairVector {
        (0..roster.len() - roster.len() % 2)
            .map(PlayerIndex::new)
            .collect()
    }

    #[test]
    fn test_fresh_roster_is_always_pairable() {
        // With no history, any section can complete up to players-1 rounds.
        for count in [4usize, 6, 8] {
            let roster = roster_of(count);
            let pair = straight_pair(&roster);
            for remaining in 0..count - 1 {
                assert_eq!(
                    pairable_cost(&roster, &pair, remaining, false),
                    0,
                    "{count} players, {remaining} rounds remaining"
                );
            }
        }
    }

    #[test]
    fn test_exhausted_section_is_infeasible() {
        // Four players who have all met each other cannot play another
        // round without a rematch.
        let mut players: Vec<Player> = (0..4)
            .map(|i| Player::new(i + 1, 1500 - i, 0.01 * (i as f64 + 1.0)))
            .collect();
        for p in players.iter_mut() {
            p.round = 4;
        }
        for i in 0..4usize {
            for j in 0..4usize {
                if i != j {
                    players[i]
                        .opponents
                        .push(wallchart_model::player::OpponentKey::new(j as i32 + 1, 0));
                    players[i]
                        .played_colors
                        .push(wallchart_model::color::Color::White);
                }
            }
        }
        let roster = Roster::canonicalize(players).unwrap();
        let pair = PairVector::new();
        assert_eq!(pairable_cost(&roster, &pair, 1, false), 1);
    }

    #[test]
    fn test_current_boards_count_as_meetings() {
        // Four fresh players, two rounds to go after this one. Proposing
        // 1-2 and 3-4 still leaves two completable rounds; but with all
        // pairs either proposed or played except one matching, a third
        // remaining round must fail.
        let roster = roster_of(4);
        let pair = straight_pair(&roster);
        assert_eq!(pairable_cost(&roster, &pair, 2, false), 0);
        assert_eq!(pairable_cost(&roster, &pair, 3, false), 1);
    }

    #[test]
    fn test_team_majority_short_circuits() {
        let mut players: Vec<Player> = (0..4)
            .map(|i| Player::new(i + 1, 1500 - i, 0.01 * (i as f64 + 1.0)))
            .collect();
        players[0].team_id = 7;
        players[1].team_id = 7;
        // Teamless players do not form a "team"; with half the section
        // unaffiliated no team holds the floor.
        let unaffiliated = Roster::canonicalize(players.clone()).unwrap();
        assert!(!is_one_team_majority(&unaffiliated));
        players[2].team_id = 8;
        players[3].team_id = 9;
        // Exactly half the section on one team already counts: the
        // team-constrained search blows up well before a strict majority.
        let half_team = Roster::canonicalize(players.clone()).unwrap();
        assert!(is_one_team_majority(&half_team));
        players[3].team_id = 8;
        // Two teams of two: the first team found at the threshold wins.
        let split = Roster::canonicalize(players).unwrap();
        assert!(is_one_team_majority(&split));
        let pair = straight_pair(&half_team);
        assert_eq!(pairable_cost(&half_team, &pair, 1, true), 1);
    }

    #[test]
    fn test_bye_rounds_shrink_the_schedule() {
        // Three real players, one of whom sits out the only remaining
        // round: the other two can meet, so it stays feasible.
        let mut players: Vec<Player> = (0..3)
            .map(|i| Player::new(i + 1, 1500 - i, 0.01 * (i as f64 + 1.0)))
            .collect();
        players[2].bye_rounds.push(2);
        for p in players.iter_mut() {
            p.round = 1;
        }
        let roster = Roster::canonicalize(players).unwrap();
        assert_eq!(pairable_cost(&roster, &PairVector::new(), 1, false), 0);
    }
}
