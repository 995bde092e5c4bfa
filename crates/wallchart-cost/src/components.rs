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

//! The individual cost components, one per prioritized pairing rule.
//!
//! Each component judges one ordered pair `(x, y)` of a board (the
//! evaluator calls every component twice, once per perspective) and returns
//! a non-negative [`CostValue`]. Components are pure; the evaluator records
//! the warn code for `x` whenever a component fires.
//!
//! Counted violations grow through [`multiple`], so a second rematch is
//! categorically worse than a first one no matter how many minor rules the
//! alternative breaks.

use wallchart_core::num::{multiple, CostValue};
use wallchart_model::color::Color;
use wallchart_model::pairing::PairVector;
use wallchart_model::player::{Player, MAX_RATING};
use wallchart_model::roster::Roster;

/// Bye assignment contradicts the player's bye intent: a requested bye not
/// granted, or an unrequested bye handed out.
pub fn bye_choice(x: &Player, y: &Player) -> CostValue {
    let mismatch = if x.bye_request {
        // A forfeit loss would also deprive the opponent of a game.
        !y.is_bye()
    } else {
        y.is_bye()
    };
    CostValue::from(!x.is_bye() && !x.bye_house && mismatch)
}

/// A full-point bye for a player who already had one.
pub fn bye_again(x: &Player, y: &Player, players: usize) -> CostValue {
    if x.is_bye() || !y.is_bye() {
        return 0;
    }
    let prior = x
        .color_history
        .iter()
        .filter(|m| matches!(m, wallchart_model::color::ColorMark::FullBye))
        .count();
    multiple(prior, players)
}

/// A rematch with the same colors as a previous meeting.
pub fn identical_match(x: &Player, y: &Player, players: usize, x_color: Color) -> CostValue {
    let rematch_x = x
        .opponents
        .iter()
        .zip(x.played_colors.iter())
        .filter(|(key, color)| **key == y.key() && **color == x_color)
        .count();
    let rematch_y = y
        .opponents
        .iter()
        .zip(y.played_colors.iter())
        .filter(|(key, color)| **key == x.key() && **color == x_color.flip())
        .count();
    multiple(rematch_x.max(rematch_y), players)
}

/// The same two people paired again, reentries collapsed.
pub fn players_meet_twice(x: &Player, y: &Player, players: usize) -> CostValue {
    let rematch_x = x
        .opponents
        .iter()
        .filter(|key| key.play_id == y.play_id)
        .count();
    let rematch_y = y
        .opponents
        .iter()
        .filter(|key| key.play_id == x.play_id)
        .count();
    multiple(rematch_x.max(rematch_y), players)
}

/// Team block broken where either player is short of a plus-two score.
/// Only consulted when the evaluator runs with team pairability enabled.
pub fn team_blocks2(x: &Player, y: &Player, players: usize) -> CostValue {
    let plus = |p: &Player| p.score - p.round as f32 / 2.0;
    if x.rank < y.rank && (plus(x) < 2.0 || plus(y) < 2.0) {
        let blocks = x.teammates.iter().filter(|&&id| id == y.play_id).count();
        multiple(blocks, players)
    } else {
        0
    }
}

/// Players of different scores paired together. Severity grows with the
/// score gap (geometric in the round number) and with the height of the
/// score group the drop lands in.
pub fn unequal_scores(x: &Player, y: &Player) -> CostValue {
    if x.score == y.score || x.rank >= y.rank {
        return 0;
    }
    let gap = 2.0 * (x.score - y.score).abs();
    let top = 2.0 * x.score.max(y.score);
    multiple(gap, x.round.max(0) as usize)
        .saturating_mul(CostValue::from(x.round.max(0)))
        .saturating_add(top.round() as CostValue)
}

/// Team block broken, regardless of score.
pub fn team_blocks(x: &Player, y: &Player, players: usize) -> CostValue {
    // Counted from one rank direction only so each block costs once.
    if x.rank < y.rank {
        let blocks = x.teammates.iter().filter(|&&id| id == y.play_id).count();
        multiple(blocks, players)
    } else {
        0
    }
}

/// An unrequested bye for a player with prior half byes or forfeit wins.
pub fn bye_after_half(x: &Player, y: &Player, players: usize) -> CostValue {
    if !x.is_bye() && y.is_bye() && !x.bye_request {
        multiple(x.half_bye_count.max(0), players)
    } else {
        0
    }
}

/// A forced bye outside the lowest score group.
pub fn lowest_score_bye(
    x: &Player,
    y: &Player,
    players: usize,
    lowest_score: f32,
) -> CostValue {
    if !x.is_bye() && y.is_bye() && !x.bye_request && x.score - lowest_score > 0.25 {
        multiple(2.0 * (x.score - lowest_score), players)
    } else {
        0
    }
}

/// A forced bye for an unrated player; worse when the player would end the
/// tournament with too few rated games for even a provisional rating.
pub fn lowest_rated_bye(x: &Player, y: &Player, remaining_rounds: usize) -> CostValue {
    if !x.is_bye() && y.is_bye() && !x.bye_request && x.counts_unrated() {
        let games_after = x.provisional as i32 + x.round as i32 + remaining_rounds as i32
            - x.unplayed_count as i32
            - 1;
        if games_after < 4 {
            2
        } else {
            1
        }
    } else {
        0
    }
}

/// Odd player resolved against an unrated player.
pub fn odd_player_unrated(x: &Player, y: &Player) -> CostValue {
    CostValue::from(!x.is_bye() && !y.is_bye() && x.score != y.score && x.counts_unrated())
}

/// Odd player dropped further than one score group.
pub fn odd_player_multiple_groups(x: &Player, y: &Player, players: usize) -> CostValue {
    if !x.is_bye() && !y.is_bye() && x.score - y.score > 0.75 {
        multiple(2.0 * (x.score - y.score - 0.5), players)
    } else {
        0
    }
}

/// Strong (equalizing) due color denied.
pub fn color_imbalance(x: &Player, y: &Player, x_color: Color) -> CostValue {
    let denied = x.due_color.is_equalizing() && x.due_color.color() != Some(x_color);
    CostValue::from(denied && !x.is_bye() && !y.is_bye())
}

/// The same color three or more times in a row, counting this round.
pub fn color_repeat3(x: &Player, y: &Player, x_color: Color) -> CostValue {
    if x.is_bye() || y.is_bye() {
        return 0;
    }
    let mut run = 1;
    for mark in x.color_history.iter().rev() {
        match mark.color() {
            Some(color) if color == x_color => run += 1,
            Some(_) => break,
            // Byes neither extend nor break the run.
            None => {}
        }
    }
    CostValue::from(run >= 3)
}

/// Weak alternation denied: the player repeats the most recently played
/// color while not receiving the due color.
pub fn color_alternate(x: &Player, y: &Player, x_color: Color) -> CostValue {
    if x.is_bye() || y.is_bye() || x.due_color.color() == Some(x_color) {
        return 0;
    }
    for mark in x.color_history.iter().rev() {
        if let Some(color) = mark.color() {
            return CostValue::from(color == x_color);
        }
    }
    0
}

/// Interchange detection at a given rating threshold: a pairing that pulls
/// the wrong side of the median across halves. The value packs the
/// violation count scale (`players * MAX_RATING`) with the offending rating
/// distance so closer alternatives still compare smaller.
// TODO: decide whether an unrated player should count as MAX_RATING rather
// than the group's lowest rated player when a nonzero threshold applies.
pub fn interchange(
    x: &Player,
    y: &Player,
    players: usize,
    median_rating: i32,
    _highest_rating: i32,
    unrated_rating: i32,
    threshold: usize,
) -> CostValue {
    let dl = threshold as i32;
    let r0 = x.rating;
    let r1 = if x.counts_unrated() {
        unrated_rating
    } else {
        x.rating
    };
    let r2 = y.rating;
    let rm = median_rating;
    let scale = players as CostValue * MAX_RATING as CostValue;
    if x.is_bye() {
        0
    } else if y.is_bye() {
        // The bye should not land above the median.
        if rm + dl < r1 {
            scale + CostValue::from(r1 - rm)
        } else {
            0
        }
    } else if x.score == y.score && x.rank > y.rank && rm + dl < r0.min(r2) {
        // Both players above the median of their group.
        scale + CostValue::from(r0.min(r2) - rm)
    } else if x.score < y.score && r0 + dl < rm {
        // Player pulled up is below the median.
        scale + CostValue::from(rm - r0)
    } else if x.score > y.score && rm + dl < r0 {
        // Player dropped down is above the median.
        scale + CostValue::from(r0 - rm)
    } else {
        0
    }
}

/// Transposition detection at a given rating threshold: some later board of
/// the same score group holds a rating-closer partner for this board's
/// lower-half player. Cumulative over all such boards.
pub fn transpose(
    roster: &Roster,
    pair: &PairVector,
    x: usize,
    y: usize,
    unrated_rating: i32,
    threshold: usize,
    p_begin: usize,
    p_end: usize,
) -> CostValue {
    debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
    debug_assert!(p_begin < p_end && p_end <= pair.len());
    debug_assert!(p_begin <= x && x < p_end && p_begin <= y && y < p_end);
    let players = roster.len();
    let px = roster.player(pair[x]);
    let py = roster.player(pair[y]);
    if px.is_bye() || py.is_bye() {
        return 0;
    }
    debug_assert!(if x % 2 == 0 { y == x + 1 } else { y == x - 1 });
    // Only the lower-half perspective scans downward; upper halves are
    // covered when later boards compare up.
    if px.rank < py.rank {
        return 0;
    }
    debug_assert!(x % 2 == 1);
    let effective = |p: &Player| if p.counts_unrated() { unrated_rating } else { p.rating };
    let sx = px.score;
    let sy = py.score;
    let rx = effective(px);
    let ry = effective(py);
    let kx = px.rank;
    let dl = threshold as i32;
    let scale = players as CostValue * MAX_RATING as CostValue;
    let mut cv: CostValue = 0;
    let mut z = x + 1;
    while z < p_end {
        debug_assert!(z % 2 == 0);
        let p1 = roster.player(pair[z]);
        let p2 = roster.player(pair[z + 1]);
        debug_assert!(p1.rank < p2.rank);
        let s1 = p1.score;
        let s2 = p2.score;
        let r1 = effective(p1);
        let r2 = effective(p2);
        // Within one score group compare the tighter of the two candidate
        // swaps; across groups only the direct one applies.
        let d2 = if sy == sx && s1 == s2 {
            (r2 - rx).min(ry - r1)
        } else {
            r2 - rx
        };
        let k2 = p2.rank;
        if s1 == sx
            && dl < r1 - rx
            && (sx < sy            // x is a pull-up: check both halves
                || s1 > s2         // the candidate board is a drop-down
                || p2.is_bye())
        {
            cv = cv.saturating_add(scale + CostValue::from(r1 - rx));
        }
        if s2 == sx && dl < d2 && !p2.is_bye() && (sx < sy || k2 < kx) {
            cv = cv.saturating_add(scale + CostValue::from(d2));
        }
        z += 2;
    }
    cv
}

/// Allocated color disagrees with the input color hint.
pub fn reversed_colors(x: &Player, x_color: Color) -> CostValue {
    CostValue::from(x.board_color != Some(x_color) && x_color == Color::White)
}

/// Output board number collides with another board's number.
pub fn board_overlap(roster: &Roster, pair: &PairVector, x: &Player, y: &Player) -> CostValue {
    if x.rank >= y.rank {
        return 0;
    }
    let mut cv = 0;
    for z in (0..pair.len()).step_by(2) {
        let upper = roster.player(pair[z]);
        let lower = roster.player(pair[z + 1]);
        if lower.is_bye() {
            continue;
        }
        if x.key() == upper.key() || x.key() == lower.key() {
            continue;
        }
        if x.board_num == upper.board_num {
            cv += 1;
        }
    }
    cv
}

/// Board numbers out of order: a preceding board carries a larger input
/// number than this one.
#[allow(clippy::too_many_arguments)]
pub fn board_order(
    roster: &Roster,
    pair: &PairVector,
    px: &Player,
    py: &Player,
    x: usize,
    y: usize,
    p_begin: usize,
    p_end: usize,
) -> CostValue {
    debug_assert!(x.abs_diff(y) == 1);
    let w = x.min(y);
    if px.canonical_cmp(py) != std::cmp::Ordering::Less
        || px.is_bye()
        || py.is_bye()
        || w < p_begin + 2
        || w >= p_end
    {
        return 0;
    }
    let pz2 = roster.player(pair[w - 2]);
    let pz1 = roster.player(pair[w - 1]);
    let board = px.board_num.min(py.board_num);
    let out_of_order = pz2.board_num > board
        && pz1.board_num > board
        && pz1.paired == py.paired
        && pz2.paired == py.paired
        && !pz1.is_bye()
        && !pz2.is_bye();
    CostValue::from(out_of_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::color::ColorMark;
    use wallchart_model::player::OpponentKey;

    fn player(play_id: i32, rating: i32, rand: f64) -> Player {
        Player::new(play_id, rating, rand)
    }

    fn bye() -> Player {
        Player::bye_sentinel(1, 1)
    }

    #[test]
    fn test_bye_choice_fires_on_denied_request() {
        let mut x = player(1, 1500, 0.1);
        x.bye_request = true;
        let y = player(2, 1400, 0.2);
        assert_eq!(bye_choice(&x, &y), 1);
        assert_eq!(bye_choice(&x, &bye()), 0);
    }

    #[test]
    fn test_bye_choice_fires_on_unwanted_bye() {
        let x = player(1, 1500, 0.1);
        assert_eq!(bye_choice(&x, &bye()), 1);
        let mut house = player(1, 1500, 0.1);
        house.bye_house = true;
        assert_eq!(bye_choice(&house, &bye()), 0);
    }

    #[test]
    fn test_bye_again_counts_prior_full_byes() {
        let mut x = player(1, 1500, 0.1);
        x.color_history.push(ColorMark::FullBye);
        x.color_history.push(ColorMark::White);
        x.color_history.push(ColorMark::FullBye);
        assert_eq!(bye_again(&x, &bye(), 10), multiple(2, 10));
        assert_eq!(bye_again(&x, &player(2, 1400, 0.2), 10), 0);
    }

    #[test]
    fn test_players_meet_twice_collapses_reentries() {
        let mut x = player(1, 1500, 0.1);
        x.opponents.push(OpponentKey::new(2, 0));
        x.opponents.push(OpponentKey::new(2, 1));
        x.played_colors.push(Color::White);
        x.played_colors.push(Color::Black);
        let y = player(2, 1400, 0.2);
        assert_eq!(players_meet_twice(&x, &y, 10), multiple(2, 10));
    }

    #[test]
    fn test_identical_match_requires_same_color() {
        let mut x = player(1, 1500, 0.1);
        x.opponents.push(OpponentKey::new(2, 0));
        x.played_colors.push(Color::White);
        let y = player(2, 1400, 0.2);
        assert_eq!(identical_match(&x, &y, 10, Color::White), multiple(1, 10));
        assert_eq!(identical_match(&x, &y, 10, Color::Black), 0);
    }

    #[test]
    fn test_unequal_scores_zero_within_group() {
        let mut x = player(1, 1500, 0.1);
        let mut y = player(2, 1400, 0.2);
        x.rank = 0;
        y.rank = 1;
        x.score = 1.0;
        y.score = 1.0;
        assert_eq!(unequal_scores(&x, &y), 0);
    }

    #[test]
    fn test_unequal_scores_grows_with_gap() {
        let mut x = player(1, 1500, 0.1);
        let mut y = player(2, 1400, 0.2);
        x.rank = 0;
        y.rank = 1;
        x.round = 3;
        y.round = 3;
        x.score = 2.0;
        y.score = 1.5;
        let half_point = unequal_scores(&x, &y);
        y.score = 1.0;
        let full_point = unequal_scores(&x, &y);
        assert!(half_point > 0);
        assert!(full_point > half_point);
        // Only the upper-ranked perspective charges.
        assert_eq!(unequal_scores(&y, &x), 0);
    }

    #[test]
    fn test_team_blocks_counts_from_upper_rank_only() {
        let mut x = player(1, 1500, 0.1);
        let mut y = player(2, 1400, 0.2);
        x.rank = 0;
        y.rank = 1;
        x.teammates.push(2);
        y.teammates.push(1);
        assert_eq!(team_blocks(&x, &y, 10), multiple(1, 10));
        assert_eq!(team_blocks(&y, &x, 10), 0);
    }

    #[test]
    fn test_lowest_score_bye_tolerates_quarter_point() {
        let mut x = player(1, 1500, 0.1);
        x.score = 1.0;
        assert_eq!(lowest_score_bye(&x, &bye(), 10, 1.0), 0);
        assert!(lowest_score_bye(&x, &bye(), 10, 0.0) > 0);
        assert_eq!(lowest_score_bye(&x, &player(2, 1400, 0.2), 10, 0.0), 0);
    }

    #[test]
    fn test_lowest_rated_bye_grades_by_needed_games() {
        let mut x = player(1, 0, 0.1);
        x.is_unrated = true;
        x.round = 1;
        x.provisional = 0;
        // One round left: finishes with too few games.
        assert_eq!(lowest_rated_bye(&x, &bye(), 1), 2);
        x.provisional = 10;
        assert_eq!(lowest_rated_bye(&x, &bye(), 1), 1);
        x.use_rating = String::from("none");
        assert_eq!(lowest_rated_bye(&x, &bye(), 1), 0);
    }

    #[test]
    fn test_odd_player_multiple_groups_tolerates_single_drop() {
        let mut x = player(1, 1500, 0.1);
        let mut y = player(2, 1400, 0.2);
        x.score = 1.5;
        y.score = 1.0;
        assert_eq!(odd_player_multiple_groups(&x, &y, 10), 0);
        y.score = 0.5;
        assert!(odd_player_multiple_groups(&x, &y, 10) > 0);
    }

    #[test]
    fn test_color_repeat3_counts_current_round() {
        let mut x = player(1, 1500, 0.1);
        x.color_history.push(ColorMark::White);
        x.color_history.push(ColorMark::White);
        let y = player(2, 1400, 0.2);
        assert_eq!(color_repeat3(&x, &y, Color::White), 1);
        assert_eq!(color_repeat3(&x, &y, Color::Black), 0);
        // A bye between the repeats does not break the run.
        x.color_history.insert(1, ColorMark::HalfBye);
        assert_eq!(color_repeat3(&x, &y, Color::White), 1);
    }

    #[test]
    fn test_color_alternate_fires_on_repeat_against_preference() {
        let mut x = player(1, 1500, 0.1);
        x.color_history.push(ColorMark::White);
        x.due_color = wallchart_model::color::DueColor::Equalize {
            color: Color::Black,
            magnitude: 1,
        };
        let y = player(2, 1400, 0.2);
        assert_eq!(color_alternate(&x, &y, Color::White), 1);
        assert_eq!(color_alternate(&x, &y, Color::Black), 0);
    }

    #[test]
    fn test_interchange_bye_above_median() {
        let mut x = player(1, 1900, 0.1);
        x.rank = 0;
        let scale = 5 * MAX_RATING as CostValue;
        assert_eq!(interchange(&x, &bye(), 5, 1500, 1900, 0, 200), scale + 400);
        // Within the threshold no interchange fires.
        assert_eq!(interchange(&x, &bye(), 5, 1750, 1900, 0, 200), 0);
    }

    #[test]
    fn test_interchange_pull_up_below_median() {
        let mut x = player(1, 1000, 0.1);
        let mut y = player(2, 1600, 0.2);
        x.score = 1.0;
        y.score = 1.5;
        x.rank = 3;
        y.rank = 0;
        let scale = 5 * MAX_RATING as CostValue;
        assert_eq!(interchange(&x, &y, 5, 1500, 1600, 0, 80), scale + 500);
    }

    #[test]
    fn test_reversed_colors_only_charges_white() {
        let mut x = player(1, 1500, 0.1);
        x.board_color = Some(Color::Black);
        assert_eq!(reversed_colors(&x, Color::White), 1);
        assert_eq!(reversed_colors(&x, Color::Black), 0);
        x.board_color = Some(Color::White);
        assert_eq!(reversed_colors(&x, Color::White), 0);
    }
}
