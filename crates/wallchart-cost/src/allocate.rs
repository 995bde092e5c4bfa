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

//! Color allocation for one board.
//!
//! Given the two players of a board, decides which color the first one
//! receives. The clauses run in strict priority order and the first match
//! wins:
//!
//! 1. A bye opponent concedes White to the real player.
//! 2. With no history on either side, the round-one pattern applies: the
//!    top board's upper player takes the section's first color and the
//!    pattern alternates by board and half.
//! 3. A head-to-head color imbalance from earlier meetings is equalized.
//! 4. A player with no preference concedes the other player's due color.
//! 5. Opposite preferences are both honored.
//! 6. Equalization outranks alternation; among equalizers the larger
//!    imbalance wins.
//! 7. The most recent round where the two histories differ is reversed.
//! 8. Rank order decides.

use wallchart_model::color::{Color, DueColor};
use wallchart_model::player::Player;

/// Returns the color the first player of the ordered pair `(x, y)` receives
/// on a board; `is_odd_board` is true for the first, third, fifth... board
/// of the section.
pub fn allocate_color(x: &Player, y: &Player, is_odd_board: bool) -> Color {
    // A bye never holds White.
    if y.is_bye() {
        return Color::White;
    }
    if x.is_bye() {
        return Color::Black;
    }

    // Neither side due any color: round-one pattern from the section's
    // first color, alternating by board and by half.
    let is_upper = x.canonical_cmp(y) == std::cmp::Ordering::Less;
    if x.due_color == DueColor::None && y.due_color == DueColor::None {
        return if is_upper == is_odd_board {
            x.first_color
        } else {
            x.first_color.flip()
        };
    }

    // Prior meetings against this opponent: equalize the head-to-head
    // color balance.
    let mut whites = 0usize;
    let mut blacks = 0usize;
    for (opponent, color) in x.opponents.iter().zip(x.played_colors.iter()) {
        if *opponent == y.key() {
            match color {
                Color::White => whites += 1,
                Color::Black => blacks += 1,
            }
        }
    }
    if whites < blacks {
        return Color::White;
    }
    if blacks < whites {
        return Color::Black;
    }

    // One side with no preference concedes; opposite preferences are both
    // honored.
    match (x.due_color.color(), y.due_color.color()) {
        (Some(due_x), None) => return due_x,
        (None, Some(due_y)) => return due_y.flip(),
        (Some(due_x), Some(due_y)) if due_x != due_y => return due_x,
        _ => {}
    }

    // Both want the same color: equalization dominates alternation, then
    // the larger imbalance wins.
    let due_x = x.due_color;
    let due_y = y.due_color;
    if due_x.is_equalizing() && (!due_y.is_equalizing() || due_x.magnitude() > due_y.magnitude()) {
        return due_x.color().expect("equalizing due color has a color");
    }
    if due_y.is_equalizing() && (!due_x.is_equalizing() || due_y.magnitude() > due_x.magnitude()) {
        return due_y.color().expect("equalizing due color has a color").flip();
    }

    // Most recent round where the histories differ breaks the tie.
    debug_assert!(
        x.color_history.len() == y.color_history.len(),
        "called `allocate_color` with histories of different lengths: {} and {}",
        x.color_history.len(),
        y.color_history.len()
    );
    for (mark_x, mark_y) in x
        .color_history
        .iter()
        .rev()
        .zip(y.color_history.iter().rev())
    {
        let (color_x, color_y) = (mark_x.color(), mark_y.color());
        if color_x != color_y {
            return match color_x {
                None => color_y.expect("one side played this round"),
                Some(color) => color.flip(),
            };
        }
    }

    // Finally, rank order.
    if x.rank < y.rank {
        due_x.color().expect("due color checked above")
    } else {
        due_y.color().expect("due color checked above").flip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::color::ColorMark;
    use wallchart_model::player::OpponentKey;

    fn player(play_id: i32, rating: i32, rand: f64) -> Player {
        Player::new(play_id, rating, rand)
    }

    fn with_history(mut p: Player, marks: &str) -> Player {
        p.color_history = marks
            .chars()
            .map(|c| ColorMark::from_char(c).unwrap())
            .collect();
        p.due_color = DueColor::derive(&p.color_history, 1);
        p
    }

    #[test]
    fn test_bye_always_gets_black() {
        let a = player(1, 1800, 0.1);
        let bye = Player::bye_sentinel(1, 1);
        assert_eq!(allocate_color(&a, &bye, true), Color::White);
        assert_eq!(allocate_color(&bye, &a, true), Color::Black);
    }

    #[test]
    fn test_round_one_pattern_alternates_by_board() {
        let a = player(1, 1800, 0.1);
        let b = player(2, 1500, 0.2);
        // Upper player on an odd board gets the first color (White here).
        assert_eq!(allocate_color(&a, &b, true), Color::White);
        // Same pair on an even board flips.
        assert_eq!(allocate_color(&a, &b, false), Color::Black);
        // Lower player's perspective mirrors.
        assert_eq!(allocate_color(&b, &a, true), Color::Black);
    }

    #[test]
    fn test_head_to_head_balance_wins_over_due_color() {
        // x already had White against y, so a rematch gives x Black even
        // though x is otherwise due White.
        let mut x = with_history(player(1, 1800, 0.1), "WB");
        let y = with_history(player(2, 1500, 0.2), "WB");
        x.opponents.push(OpponentKey::new(2, 0));
        x.played_colors.push(Color::White);
        x.due_color = DueColor::Equalize {
            color: Color::White,
            magnitude: 1,
        };
        assert_eq!(allocate_color(&x, &y, true), Color::Black);
    }

    #[test]
    fn test_no_preference_concedes_due_color() {
        let x = with_history(player(1, 1800, 0.1), "f");
        let y = with_history(player(2, 1500, 0.2), "W");
        // y is due Black, x has no preference.
        assert_eq!(allocate_color(&x, &y, true), Color::White);
        assert_eq!(allocate_color(&y, &x, true), Color::Black);
    }

    #[test]
    fn test_opposite_preferences_both_honored() {
        let x = with_history(player(1, 1800, 0.1), "B");
        let y = with_history(player(2, 1500, 0.2), "W");
        assert_eq!(allocate_color(&x, &y, true), Color::White);
    }

    #[test]
    fn test_equalization_beats_alternation() {
        // x alternates toward White; y equalizes toward White; y wins.
        let x = with_history(player(1, 1800, 0.1), "WB");
        let y = with_history(player(2, 1500, 0.2), "BB");
        assert_eq!(x.due_color.color(), Some(Color::White));
        assert!(!x.due_color.is_equalizing());
        assert!(y.due_color.is_equalizing());
        assert_eq!(allocate_color(&x, &y, true), Color::Black);
    }

    #[test]
    fn test_larger_imbalance_beats_smaller() {
        let x = with_history(player(1, 1800, 0.1), "fBB");
        let y = with_history(player(2, 1500, 0.2), "BBB");
        assert_eq!(allocate_color(&x, &y, true), Color::Black);
    }

    #[test]
    fn test_recent_history_difference_breaks_ties() {
        // Same due color and strength; most recent differing round is the
        // second, where x had White: x now gets Black.
        let mut x = with_history(player(1, 1800, 0.1), "BWB");
        let mut y = with_history(player(2, 1500, 0.2), "WBB");
        x.rank = 0;
        y.rank = 1;
        assert_eq!(x.due_color, y.due_color);
        assert_eq!(allocate_color(&x, &y, true), Color::Black);
    }

    #[test]
    fn test_rank_breaks_identical_histories() {
        let mut x = with_history(player(1, 1800, 0.1), "WB");
        let mut y = with_history(player(2, 1500, 0.2), "WB");
        x.rank = 0;
        y.rank = 1;
        assert_eq!(allocate_color(&x, &y, true), Color::White);
        assert_eq!(allocate_color(&y, &x, true), Color::Black);
    }
}
