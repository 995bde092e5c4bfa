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

//! Pairing one section for one round.
//!
//! The flow: request a bye for an odd house player, canonicalize the
//! roster, short-circuit round robins through the fixed tables, build the
//! hint pairing, optionally overwrite it with the first-pairings
//! heuristic, descend, and finally hand out board numbers and colors.
//! Everything the host needs lands back on the players themselves.

use wallchart_cost::eval::CostEvaluator;
use wallchart_cost::vector::CostVector;
use wallchart_model::color::Color;
use wallchart_model::pairing::PairVector;
use wallchart_model::player::Player;
use wallchart_model::roster::{Roster, RosterError};
use wallchart_model::warning::Warnings;
use wallchart_robin::{crenshaw_berger_lookup, RoundRobinError};
use wallchart_search::first::first_pairings;
use wallchart_search::hint::hint_pairings;
use wallchart_search::optimizer::minimize_pairing_cost;
use wallchart_search::stats::SearchStatistics;

/// Failure to pair a section. Rule violations are never errors; they come
/// back as warn codes on an otherwise successful pairing.
#[derive(Debug)]
pub enum PairingError {
    /// The roster failed validation.
    Roster(RosterError),
    /// A round-robin seat could not be resolved against the tables.
    RoundRobin(RoundRobinError),
    /// A round-robin section whose player count does not match its
    /// scheduled rounds.
    RoundRobinSize {
        entries: usize,
        total_rounds: i16,
    },
}

impl std::fmt::Display for PairingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingError::Roster(e) => write!(f, "roster validation failed: {}", e),
            PairingError::RoundRobin(e) => write!(f, "round-robin lookup failed: {}", e),
            PairingError::RoundRobinSize {
                entries,
                total_rounds,
            } => write!(
                f,
                "round robin of {} entries cannot play {} rounds",
                entries, total_rounds
            ),
        }
    }
}

impl std::error::Error for PairingError {}

impl From<RosterError> for PairingError {
    fn from(e: RosterError) -> Self {
        PairingError::Roster(e)
    }
}

impl From<RoundRobinError> for PairingError {
    fn from(e: RoundRobinError) -> Self {
        PairingError::RoundRobin(e)
    }
}

/// Computes board numbers and colors for one section and one round.
///
/// Mutates `players` in place: the list comes back in canonical order with
/// one bye sentinel appended, and with `rank`, `board_num`, `board_color`,
/// `due_color`, and `warn_codes` assigned. A house player may have
/// `bye_request` switched on. The returned cost vector is the final cost
/// of the pairing; the caller can log it or compare alternative hints.
///
/// `depth` bounds the simultaneous swaps per descent step: one finishes in
/// seconds, two takes a minute on a small section, more takes long.
/// `first_board_num` of zero infers the top board from the lowest hint.
/// `skip_optimize` scores the hint as-is, which is how an operator
/// inspects a hand-built pairing.
///
/// # Errors
///
/// Returns a [`PairingError`] for invalid rosters and unsupported round
/// robins; the player list is left empty in that case. An imperfect
/// pairing is not an error.
pub fn find_pairings(
    players: &mut Vec<Player>,
    total_rounds: i16,
    first_board_num: i32,
    depth: usize,
    use_first_pairings: bool,
    skip_optimize: bool,
    section_name: &str,
) -> Result<CostVector, PairingError> {
    find_pairings_detailed(
        players,
        total_rounds,
        first_board_num,
        depth,
        use_first_pairings,
        skip_optimize,
        section_name,
    )
    .map(|(cost, _)| cost)
}

/// Like [`find_pairings`], but also returns the session's warn-code
/// catalog so the host can show the operator what each letter on the
/// output means.
#[allow(clippy::too_many_arguments)]
pub fn find_pairings_detailed(
    players: &mut Vec<Player>,
    total_rounds: i16,
    first_board_num: i32,
    depth: usize,
    use_first_pairings: bool,
    skip_optimize: bool,
    section_name: &str,
) -> Result<(CostVector, Warnings), PairingError> {
    if players.len() <= 1 {
        println!("WARNING: nobody active to pair in {}", section_name);
    } else if players[0].multiround != 1 {
        let multiround = players[0].multiround.max(1) as usize;
        for player in players.iter() {
            debug_assert!(player.multiround as usize == multiround);
            for series in player.opponents.chunks(multiround) {
                if series.iter().any(|o| *o != series[0]) {
                    println!(
                        "ERROR: not same opponents across multiround for {} in {}",
                        player.key(),
                        section_name
                    );
                    break;
                }
            }
        }
    }

    // An odd section with a designated house player grants that player the
    // bye up front.
    let mut active = 0usize;
    let mut house_player: Option<usize> = None;
    for (at, player) in players.iter().enumerate() {
        if !player.bye_request && !player.paired && !player.is_bye() {
            active += 1;
            if player.bye_house {
                house_player = Some(at);
            }
        }
    }
    if active % 2 == 0 {
        house_player = None;
    }
    if let Some(at) = house_player {
        println!(
            "INFO: requesting bye for house player, {}",
            players[at].name
        );
        players[at].bye_request = true;
        active -= 1;
    }

    let mut roster = Roster::canonicalize(std::mem::take(players))?;

    if roster.players()[0].tournament_type.is_round_robin() {
        let warnings = Warnings::new(roster.len());
        let result = round_robin_pairings(&mut roster, total_rounds, first_board_num);
        *players = roster.into_players();
        return result.map(|cost| (cost, warnings));
    }

    // Infer the top board number from the lowest hint.
    let mut first_board_num = first_board_num;
    if first_board_num == 0 {
        let low_board = roster
            .players()
            .iter()
            .filter(|p| !p.is_bye())
            .map(|p| p.board_num)
            .min()
            .unwrap_or(1);
        first_board_num = low_board.max(1);
    }

    let mut pair = PairVector::with_capacity(roster.len() + 1);
    hint_pairings(&roster, &mut pair, true);
    debug_assert!(active == 0 || {
        let edge = roster.player(pair[active - 1]);
        !edge.bye_request && !edge.paired
    });
    debug_assert!(
        active >= pair.len() || roster.player(pair[active]).is_bye() || {
            let edge = roster.player(pair[active]);
            edge.bye_request || edge.paired
        }
    );

    if use_first_pairings {
        first_pairings(&roster, &mut pair, active, total_rounds);
    }

    let remaining_rounds = (total_rounds - roster.players()[0].round).max(0) as usize;
    let evaluator = CostEvaluator::new();
    let mut warnings = Warnings::new(roster.len());
    let mut stats = SearchStatistics::new();
    let start_time = std::time::Instant::now();
    let cost = if skip_optimize {
        evaluator
            .evaluate(
                &roster,
                &pair,
                remaining_rounds,
                0,
                (active + 1) / 2 * 2,
                true,
                true,
                &mut warnings,
            )
            .cost
    } else {
        minimize_pairing_cost(
            &roster,
            &mut pair,
            remaining_rounds,
            depth,
            0,
            active,
            false,
            &evaluator,
            &mut warnings,
            &mut stats,
        )
    };
    stats.set_total_time(start_time.elapsed());

    assign_boards_and_colors(&mut roster, &mut pair, first_board_num);
    warnings.apply(&mut roster);
    *players = roster.into_players();
    Ok((cost, warnings))
}

/// Round-robin sections skip the optimizer: seats come from the drawn
/// lots, boards and colors from the Crenshaw–Berger tables.
fn round_robin_pairings(
    roster: &mut Roster,
    total_rounds: i16,
    first_board_num: i32,
) -> Result<CostVector, PairingError> {
    roster.sort_for_round_robin();
    let multiround = roster.players()[0].multiround.max(1);
    let total_rounds = total_rounds / multiround;
    if roster.len() != total_rounds as usize + 1 {
        return Err(PairingError::RoundRobinSize {
            entries: roster.len(),
            total_rounds,
        });
    }

    // A first-half withdrawal triggers the color-reversal rows.
    let mut withdrawn_player = 0usize;
    for (at, player) in roster.players().iter().enumerate() {
        debug_assert!(!player.is_bye() || at == roster.len() - 1);
        if let Some(&first_bye) = player.bye_rounds.first() {
            if first_bye <= (total_rounds + 1) / 2 {
                debug_assert!(
                    withdrawn_player == 0,
                    "more than one first-half withdrawal in a round robin"
                );
                withdrawn_player = at + 1;
            }
        }
    }

    let competitors = roster.len();
    for at in 0..competitors {
        let player = &mut roster.players_mut()[at];
        let round = (player.round.max(1) as usize - 1) / multiround as usize + 1;
        let seat = crenshaw_berger_lookup(competitors, round, at + 1, withdrawn_player)?;
        player.board_num = seat.board as i32 + first_board_num - 1;
        player.board_color = Some(seat.color);
    }

    // The player on the bye board takes White; the bye shows Black.
    let bye_at = competitors - 1;
    if roster.players()[bye_at].is_bye() {
        let bye_board = roster.players()[bye_at].board_num;
        for at in 0..bye_at {
            if roster.players()[at].board_num == bye_board {
                roster.players_mut()[at].board_color = Some(Color::White);
                roster.players_mut()[bye_at].board_color = Some(Color::Black);
                break;
            }
        }
        debug_assert!(roster.players()[bye_at].board_color == Some(Color::Black));
    }
    Ok(CostVector::zero(competitors - 1))
}

/// Final board sort (byes last, then canonical order of the better half),
/// board numbering from `first_board_num`, and color allocation.
fn assign_boards_and_colors(roster: &mut Roster, pair: &mut PairVector, first_board_num: i32) {
    debug_assert!(pair.len() % 2 == 0);
    for x in (2..pair.len()).step_by(2) {
        let mut y = x;
        while y > 0 {
            let prev_best = if roster
                .player(pair[y - 2])
                .canonical_cmp(roster.player(pair[y - 1]))
                == std::cmp::Ordering::Less
            {
                y - 2
            } else {
                y - 1
            };
            let best = if roster
                .player(pair[y])
                .canonical_cmp(roster.player(pair[y + 1]))
                == std::cmp::Ordering::Less
            {
                y
            } else {
                y + 1
            };
            let prev_has_bye =
                roster.player(pair[y - 2]).is_bye() || roster.player(pair[y - 1]).is_bye();
            let has_bye = roster.player(pair[y]).is_bye() || roster.player(pair[y + 1]).is_bye();
            if prev_has_bye < has_bye
                || (prev_has_bye == has_bye
                    && roster
                        .player(pair[prev_best])
                        .canonical_cmp(roster.player(pair[best]))
                        == std::cmp::Ordering::Less)
            {
                break;
            }
            pair.swap(y, y - 2);
            pair.swap(y + 1, y - 1);
            y -= 2;
        }
    }

    for x in (0..pair.len()).step_by(2) {
        let (upper, lower) = (pair[x], pair[x + 1]);
        debug_assert!(!roster.player(upper).is_bye());
        let board = first_board_num + (x as i32) / 2;
        // Colors are allocated from the lower seat's perspective; the
        // upper seat takes the flip.
        let lower_color =
            wallchart_cost::allocate::allocate_color(
                roster.player(lower),
                roster.player(upper),
                (x / 2) % 2 == 0,
            );
        roster.player_mut(upper).board_num = board;
        roster.player_mut(lower).board_num = board;
        roster.player_mut(lower).board_color = Some(lower_color);
        roster.player_mut(upper).board_color = Some(lower_color.flip());
    }

    let bye_index = roster.bye_index();
    roster.player_mut(bye_index).board_num = -1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::color::ColorMark;
    use wallchart_model::player::{OpponentKey, TournamentType, BYE_ID};

    fn player(play_id: i32, rating: i32, rand: f64) -> Player {
        Player::new(play_id, rating, rand)
    }

    /// The feasibility look-ahead is honest: a section can only promise as
    /// many rounds as it has opponents, so each test passes a round count
    /// its roster can actually deliver.
    fn pair_rounds(players: &mut Vec<Player>, total_rounds: i16) -> CostVector {
        find_pairings(players, total_rounds, 1, 2, true, false, "Open").expect("pairing failed")
    }

    fn by_id(players: &[Player], play_id: i32) -> &Player {
        players
            .iter()
            .find(|p| p.play_id == play_id)
            .expect("player missing")
    }

    #[test]
    fn test_two_players_round_one() {
        let mut players = vec![player(1, 1800, 0.1), player(2, 1500, 0.2)];
        let cost = pair_rounds(&mut players, 1);
        assert!(cost.is_zero(), "cost: {cost}");
        let a = by_id(&players, 1);
        let b = by_id(&players, 2);
        assert_eq!(a.board_num, 1);
        assert_eq!(b.board_num, 1);
        assert_eq!(a.board_color, Some(Color::White));
        assert_eq!(b.board_color, Some(Color::Black));
    }

    #[test]
    fn test_three_players_round_one() {
        let mut players = vec![
            player(1, 1800, 0.1),
            player(2, 1500, 0.2),
            player(3, 1200, 0.3),
        ];
        pair_rounds(&mut players, 2);
        let a = by_id(&players, 1);
        let b = by_id(&players, 2);
        let c = by_id(&players, 3);
        assert_eq!((a.board_num, b.board_num), (1, 1));
        assert_eq!(c.board_num, 2);
        assert_eq!(c.board_color, Some(Color::White));
        // The lowest player takes the bye without a bye-choice complaint.
        assert!(!c.warn_codes.contains('A'), "codes: {}", c.warn_codes);
    }

    #[test]
    fn test_round_two_avoids_rematch_and_alternates_colors() {
        // Round 1: 1 beat 2 with White, 3 beat 4 with White.
        let mut players = vec![
            player(1, 1800, 0.1),
            player(2, 1700, 0.2),
            player(3, 1600, 0.3),
            player(4, 1500, 0.4),
        ];
        for &(winner, loser) in &[(0usize, 1usize), (2, 3)] {
            let winner_id = winner as i32 + 1;
            let loser_id = loser as i32 + 1;
            players[winner].opponents.push(OpponentKey::new(loser_id, 0));
            players[winner].played_colors.push(Color::White);
            players[winner].color_history.push(ColorMark::White);
            players[winner].score = 1.0;
            players[loser].opponents.push(OpponentKey::new(winner_id, 0));
            players[loser].played_colors.push(Color::Black);
            players[loser].color_history.push(ColorMark::Black);
        }
        for p in players.iter_mut() {
            p.round = 2;
        }
        let cost = pair_rounds(&mut players, 3);
        // Both winners are due Black, so one color complaint per board is
        // unavoidable; what matters is that nobody is paired twice.
        assert_eq!(
            cost.get(wallchart_cost::vector::CostTerm::PlayersMeetTwice),
            0,
            "cost: {cost}"
        );
        let a = by_id(&players, 1);
        let c = by_id(&players, 3);
        // Winners meet on board one, losers on board two.
        assert_eq!(a.board_num, 1);
        assert_eq!(c.board_num, 1);
        assert_eq!(a.board_color, Some(Color::Black));
        assert_eq!(c.board_color, Some(Color::White));
        let b = by_id(&players, 2);
        let d = by_id(&players, 4);
        assert_eq!(b.board_num, 2);
        assert_eq!(d.board_num, 2);
        // Nobody repeats an opponent.
        for p in players.iter().filter(|p| !p.is_bye()) {
            let partner = players
                .iter()
                .find(|q| q.play_id != p.play_id && q.board_num == p.board_num)
                .unwrap();
            assert!(
                !p.opponents.iter().any(|o| o.play_id == partner.play_id),
                "{} repeats {}",
                p.play_id,
                partner.play_id
            );
        }
    }

    #[test]
    fn test_team_block_is_avoided() {
        let mut players = vec![
            player(1, 1800, 0.1),
            player(2, 1700, 0.2),
            player(3, 1600, 0.3),
            player(4, 1500, 0.4),
        ];
        players[0].team_id = 7;
        players[1].team_id = 7;
        players[0].teammates.push(2);
        players[1].teammates.push(1);
        let cost = pair_rounds(&mut players, 3);
        assert_eq!(
            cost.get(wallchart_cost::vector::CostTerm::TeamBlocks),
            0,
            "cost: {cost}"
        );
        let a = by_id(&players, 1);
        let b = by_id(&players, 2);
        assert_ne!(a.board_num, b.board_num, "teammates share a board");
    }

    #[test]
    fn test_bye_request_is_granted() {
        let mut players = vec![
            player(1, 1800, 0.1),
            player(2, 1700, 0.2),
            player(3, 1600, 0.3),
            player(4, 1500, 0.4),
            player(5, 1400, 0.5),
        ];
        players[4].bye_request = true;
        let cost = pair_rounds(&mut players, 4);
        assert_eq!(cost.get(wallchart_cost::vector::CostTerm::ByeChoice), 0);
        let e = by_id(&players, 5);
        let bye = by_id(&players, BYE_ID);
        assert_eq!(e.board_num, 3);
        assert_eq!(e.board_color, Some(Color::White));
        assert_eq!(bye.board_num, -1);
    }

    #[test]
    fn test_every_player_lands_on_exactly_one_board() {
        let mut players: Vec<Player> = (0..9)
            .map(|i| player(i + 1, 2000 - 60 * i, 0.01 * (i as f64 + 1.0)))
            .collect();
        pair_rounds(&mut players, 4);
        let mut boards: Vec<i32> = players
            .iter()
            .filter(|p| !p.is_bye())
            .map(|p| p.board_num)
            .collect();
        boards.sort_unstable();
        for chunk in boards.chunks(2) {
            if chunk.len() == 2 {
                assert_eq!(chunk[0], chunk[1], "boards: {boards:?}");
            }
        }
        for p in players.iter().filter(|p| !p.is_bye()) {
            assert!(p.board_num >= 1, "player {} off the chart", p.play_id);
            let on_board = players
                .iter()
                .filter(|q| !q.is_bye() && q.board_num == p.board_num)
                .count();
            assert!(on_board <= 2, "board {} overloaded", p.board_num);
        }
    }

    #[test]
    fn test_round_robin_section_uses_the_tables() {
        // Five players, round 3 of a five-round robin; seats come from the
        // drawn lots (rand order).
        let mut players: Vec<Player> = (0..5)
            .map(|i| {
                let mut p = player(i + 1, 1500, 0.1 * (i as f64 + 1.0));
                p.tournament_type = TournamentType::RoundRobin;
                p.round = 3;
                p
            })
            .collect();
        let cost = find_pairings(&mut players, 5, 1, 1, false, false, "Quads").unwrap();
        assert!(cost.is_zero());
        // Row 6 3: boards 6-5, 1-3, 4-2. Seat 6 is the bye, so seat 5
        // plays the bye board.
        let seat = |n: usize| &players[n - 1];
        assert_eq!(seat(5).board_num, 1);
        assert_eq!(seat(5).board_color, Some(Color::White));
        assert_eq!(seat(1).board_num, 2);
        assert_eq!(seat(1).board_color, Some(Color::White));
        assert_eq!(seat(3).board_num, 2);
        assert_eq!(seat(3).board_color, Some(Color::Black));
        assert_eq!(seat(4).board_num, 3);
        assert_eq!(seat(4).board_color, Some(Color::White));
        assert_eq!(seat(2).board_num, 3);
        assert_eq!(seat(2).board_color, Some(Color::Black));
    }

    #[test]
    fn test_house_player_absorbs_the_odd_bye() {
        let mut players = vec![
            player(1, 1800, 0.1),
            player(2, 1700, 0.2),
            player(3, 1600, 0.3),
        ];
        players[2].bye_house = true;
        pair_rounds(&mut players, 2);
        let house = by_id(&players, 3);
        assert!(house.bye_request, "house player was not granted the bye");
        assert_eq!(house.board_color, Some(Color::White));
        assert_eq!(by_id(&players, 1).board_num, 1);
        assert_eq!(by_id(&players, 2).board_num, 1);
    }

    #[test]
    fn test_warn_code_meanings_are_reported() {
        // Two players who already met must meet again; the pairing
        // succeeds but carries the rematch letter, and the session
        // catalog explains it.
        let mut a = player(1, 1800, 0.1);
        let mut b = player(2, 1500, 0.2);
        a.round = 2;
        b.round = 2;
        a.opponents.push(OpponentKey::new(2, 0));
        a.played_colors.push(Color::White);
        a.color_history.push(ColorMark::White);
        b.opponents.push(OpponentKey::new(1, 0));
        b.played_colors.push(Color::Black);
        b.color_history.push(ColorMark::Black);
        let mut players = vec![a, b];
        let (cost, warnings) =
            find_pairings_detailed(&mut players, 2, 1, 1, true, false, "Open").unwrap();
        assert!(
            cost.get(wallchart_cost::vector::CostTerm::PlayersMeetTwice) > 0,
            "cost: {cost}"
        );
        let rematch = by_id(&players, 1)
            .warn_codes
            .chars()
            .next()
            .expect("a code must fire");
        let code = wallchart_model::warning::WarnCode::from_char(rematch).unwrap();
        assert!(
            warnings
                .description(code)
                .is_some_and(|text| text.contains("meet twice")),
            "unexpected description for {rematch}"
        );
    }

    #[test]
    fn test_duplicate_players_are_rejected() {
        let mut players = vec![player(1, 1800, 0.1), player(1, 1500, 0.2)];
        let result = find_pairings(&mut players, 4, 1, 1, true, false, "Open");
        assert!(matches!(result, Err(PairingError::Roster(_))));
    }
}
