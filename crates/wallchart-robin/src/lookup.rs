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

//! Seat lookup against the Crenshaw–Berger tables.

use crate::tables::{ROUND_ROBIN_PAIRINGS, ROUND_ROBIN_REVERSALS};
use wallchart_model::color::Color;

/// The board and color one seat receives in one round.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SeatAssignment {
    /// Board number, 1-based within the section.
    pub board: u32,
    /// The seat's color, after any withdrawal reversal.
    pub color: Color,
    /// The opposing seat number (possibly the virtual bye seat `N + 1` of
    /// an odd section).
    pub opponent: usize,
}

/// Failure to resolve a seat against the tables. These indicate input that
/// does not describe a supported round robin, not an imperfect pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundRobinError {
    /// No table row covers this section size and round.
    SeatNotFound {
        competitors: usize,
        round: usize,
        player: usize,
    },
    /// A withdrawal was reported for an odd section, which already uses
    /// the virtual bye seat.
    WithdrawalInOddSection { competitors: usize },
    /// A compiled-in table row failed to parse.
    MalformedTable { row: &'static str },
}

impl std::fmt::Display for RoundRobinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundRobinError::SeatNotFound {
                competitors,
                round,
                player,
            } => write!(
                f,
                "no round-robin row pairs seat {} of {} in round {}",
                player, competitors, round
            ),
            RoundRobinError::WithdrawalInOddSection { competitors } => write!(
                f,
                "withdrawal reported for an odd section of {}",
                competitors
            ),
            RoundRobinError::MalformedTable { row } => {
                write!(f, "malformed round-robin table row '{}'", row)
            }
        }
    }
}

impl std::error::Error for RoundRobinError {}

fn parse_number(row: &'static str, token: Option<&str>) -> Result<usize, RoundRobinError> {
    token
        .and_then(|t| t.trim().parse().ok())
        .ok_or(RoundRobinError::MalformedTable { row })
}

fn parse_seat_pair(
    row: &'static str,
    token: &str,
) -> Result<(usize, usize), RoundRobinError> {
    let (first, second) = token
        .split_once('-')
        .ok_or(RoundRobinError::MalformedTable { row })?;
    Ok((
        parse_number(row, Some(first))?,
        parse_number(row, Some(second))?,
    ))
}

/// Resolves the board and color for one seat of a Crenshaw–Berger round
/// robin.
///
/// `player` is the seat number `1..=N` after lots are drawn. Odd sections
/// pass their real size; a virtual bye seat `N + 1` completes the table.
/// `withdrawn_player` names the seat (1-based) that withdrew during the
/// first half of the event, or zero for none; the reversal table then
/// flips the colors of the affected later-round pairings so no player
/// faces a lopsided color run.
pub fn crenshaw_berger_lookup(
    competitors: usize,
    round: usize,
    player: usize,
    withdrawn_player: usize,
) -> Result<SeatAssignment, RoundRobinError> {
    let mut competitors = competitors;
    let mut is_bye_section = false;
    if competitors % 2 == 1 {
        if withdrawn_player != 0 {
            return Err(RoundRobinError::WithdrawalInOddSection { competitors });
        }
        is_bye_section = true;
        competitors += 1;
    }
    let withdrawn = if withdrawn_player == 0 {
        // The tables carry an explicit empty reversal row for "the last
        // seat withdrew", which doubles as the no-withdrawal case.
        competitors
    } else {
        withdrawn_player
    };

    let mut assignment: Option<SeatAssignment> = None;
    for &row in ROUND_ROBIN_PAIRINGS {
        let mut fields = row.split('\t');
        let size = parse_number(row, fields.next())?;
        if size != competitors {
            continue;
        }
        let table_round = parse_number(row, fields.next())?;
        if table_round != round {
            continue;
        }
        let pairings = fields.next().ok_or(RoundRobinError::MalformedTable { row })?;
        for (board, token) in pairings.split(' ').enumerate() {
            let (first, second) = parse_seat_pair(row, token)?;
            let found = if first == player {
                Some((second, Color::White))
            } else if second == player {
                Some((first, Color::Black))
            } else {
                None
            };
            if let Some((opponent, color)) = found {
                debug_assert!(
                    assignment.is_none(),
                    "seat {} paired twice in round {} of a {}-seat table",
                    player,
                    round,
                    competitors
                );
                assignment = Some(SeatAssignment {
                    board: board as u32 + 1,
                    color,
                    opponent,
                });
            }
        }
    }
    let Some(mut assignment) = assignment else {
        return Err(RoundRobinError::SeatNotFound {
            competitors,
            round,
            player,
        });
    };
    debug_assert!(
        (1..=competitors).contains(&assignment.opponent) && assignment.opponent != player
    );
    debug_assert!((1..=competitors as u32 / 2).contains(&assignment.board));

    let mut is_reversed = false;
    for &row in ROUND_ROBIN_REVERSALS {
        let mut fields = row.split('\t');
        let size = parse_number(row, fields.next())?;
        if size != competitors {
            continue;
        }
        let reversal_round = parse_number(row, fields.next())?;
        let withdraw = parse_number(row, fields.next())?;
        if withdraw != withdrawn {
            continue;
        }
        let reversals = fields.next().unwrap_or("");
        for token in reversals.split(' ').filter(|t| !t.is_empty()) {
            let (first, second) = parse_seat_pair(row, token)?;
            let reverses_to = if first == player && second == assignment.opponent {
                Some(Color::White)
            } else if second == player && first == assignment.opponent {
                Some(Color::Black)
            } else {
                None
            };
            if let Some(color) = reverses_to {
                debug_assert!(!is_bye_section && withdrawn != competitors);
                debug_assert!(round >= reversal_round);
                debug_assert!(!is_reversed);
                assignment.color = color;
                is_reversed = true;
            }
        }
    }
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_player_round_three() {
        // Table row: 6 3 -> 6-5 1-3 4-2.
        let six = crenshaw_berger_lookup(6, 3, 6, 0).unwrap();
        assert_eq!(six.board, 1);
        assert_eq!(six.color, Color::White);
        assert_eq!(six.opponent, 5);
        let one = crenshaw_berger_lookup(6, 3, 1, 0).unwrap();
        assert_eq!(one.board, 2);
        assert_eq!(one.color, Color::White);
        assert_eq!(one.opponent, 3);
        let two = crenshaw_berger_lookup(6, 3, 2, 0).unwrap();
        assert_eq!(two.board, 3);
        assert_eq!(two.color, Color::Black);
        assert_eq!(two.opponent, 4);
    }

    #[test]
    fn test_every_pair_meets_exactly_once() {
        for competitors in [4usize, 6, 8, 10] {
            let mut meetings = vec![vec![0usize; competitors + 1]; competitors + 1];
            for round in 1..competitors {
                for player in 1..=competitors {
                    let seat = crenshaw_berger_lookup(competitors, round, player, 0).unwrap();
                    meetings[player][seat.opponent] += 1;
                }
            }
            for a in 1..=competitors {
                for b in 1..=competitors {
                    if a != b {
                        assert_eq!(
                            meetings[a][b], 1,
                            "{a} met {b} {} times in a {competitors}-seat robin",
                            meetings[a][b]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_colors_are_consistent_across_the_board() {
        for competitors in [4usize, 6, 8, 10] {
            for round in 1..competitors {
                for player in 1..=competitors {
                    let seat = crenshaw_berger_lookup(competitors, round, player, 0).unwrap();
                    let opponent =
                        crenshaw_berger_lookup(competitors, round, seat.opponent, 0).unwrap();
                    assert_eq!(opponent.opponent, player);
                    assert_eq!(opponent.board, seat.board);
                    assert_eq!(opponent.color, seat.color.flip());
                }
            }
        }
    }

    #[test]
    fn test_odd_section_uses_virtual_bye_seat() {
        // Five players play a six-seat schedule; seat 3 opens against the
        // virtual seat 6.
        let seat = crenshaw_berger_lookup(5, 1, 3, 0).unwrap();
        assert_eq!(seat.opponent, 6);
        assert_eq!(seat.color, Color::White);
    }

    #[test]
    fn test_withdrawal_reverses_colors() {
        // Four seats, seat 2 withdrew: round 3 plays 1-2 3-4 with the 4-3
        // colors reversed.
        let without = crenshaw_berger_lookup(4, 3, 4, 0).unwrap();
        assert_eq!(without.color, Color::Black);
        let with = crenshaw_berger_lookup(4, 3, 4, 2).unwrap();
        assert_eq!(with.color, Color::White);
        assert_eq!(with.opponent, 3);
        let other_side = crenshaw_berger_lookup(4, 3, 3, 2).unwrap();
        assert_eq!(other_side.color, Color::Black);
    }

    #[test]
    fn test_unsupported_size_is_an_error() {
        assert!(matches!(
            crenshaw_berger_lookup(12, 1, 1, 0),
            Err(RoundRobinError::SeatNotFound { .. })
        ));
        assert!(matches!(
            crenshaw_berger_lookup(5, 1, 1, 2),
            Err(RoundRobinError::WithdrawalInOddSection { .. })
        ));
    }
}
