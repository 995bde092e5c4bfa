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

//! The neighborhood: eight move classes over a pair of slots.
//!
//! A plain swap handles adjacent repairs; the rotations redistribute a
//! whole chain of players while keeping slot parity; the score-group
//! variants confine the chain to one score group with odd pull-up and
//! drop-down extensions; the color rotation hunts for a minimal cycle that
//! fixes one board's due colors; and the color-aware rotations thread the
//! chain through the slots whose allocated color disagrees with the
//! round's opening color, flipping colors as they go.

use crate::rotate::{rotate_color, rotate_pair_down, rotate_pair_up};
use fixedbitset::FixedBitSet;
use wallchart_cost::allocate::allocate_color;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

/// One move class of the local search neighborhood.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(usize)]
pub enum Move {
    /// Exchange the two slots.
    Swap,
    /// Rotate the spanned slots one board toward the end.
    RotateDown,
    /// Rotate the spanned slots one board toward the start.
    RotateUp,
    /// Rotate within the surrounding score group, toward the end.
    GroupRotateDown,
    /// Rotate within the surrounding score group, toward the start.
    GroupRotateUp,
    /// Minimal cyclic rotation that repairs one board's due colors.
    ColorRotate,
    /// Color-aware rotation toward the end.
    ColorShiftDown,
    /// Color-aware rotation toward the start.
    ColorShiftUp,
}

impl Move {
    /// Number of move classes.
    pub const COUNT: usize = 8;

    /// Every move class, in exploration order.
    pub const ALL: [Move; Move::COUNT] = [
        Move::Swap,
        Move::RotateDown,
        Move::RotateUp,
        Move::GroupRotateDown,
        Move::GroupRotateUp,
        Move::ColorRotate,
        Move::ColorShiftDown,
        Move::ColorShiftUp,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Move::Swap => "swap",
            Move::RotateDown => "rotate-down",
            Move::RotateUp => "rotate-up",
            Move::GroupRotateDown => "group-rotate-down",
            Move::GroupRotateUp => "group-rotate-up",
            Move::ColorRotate => "color-rotate",
            Move::ColorShiftDown => "color-shift-down",
            Move::ColorShiftUp => "color-shift-up",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Applies one move to the slots `x < y` of the pairing vector.
///
/// Returns `false` when the move does not apply to this span (wrong score
/// group, or no color cycle exists); the caller abandons the whole tuple
/// for this move class, as a partial application would leave the vector
/// half-rotated.
#[allow(clippy::too_many_arguments)]
pub fn apply(
    mv: Move,
    roster: &Roster,
    pair: &mut PairVector,
    x: usize,
    y: usize,
    p_begin: usize,
    p_end: usize,
    has_bye: bool,
) -> bool {
    // A span that touches the bye board rotates through it; otherwise the
    // bye board is fenced off.
    let has_bye2 = has_bye && (x >= p_end - 2 || y >= p_end - 2);
    let p_end2 = if has_bye && !has_bye2 {
        p_end - 2
    } else {
        p_end
    };
    let no_shift = FixedBitSet::with_capacity(p_end2);
    match mv {
        Move::Swap => {
            pair.swap(x, y);
            true
        }
        Move::RotateDown => {
            debug_assert!(!roster.player(pair[y]).is_bye());
            rotate_pair_down(pair, x, y, p_begin, p_end2, has_bye2, false, &no_shift);
            true
        }
        Move::RotateUp => {
            debug_assert!(!roster.player(pair[y]).is_bye());
            rotate_pair_up(pair, x, y, p_begin, p_end2, has_bye2, false, &no_shift);
            true
        }
        Move::GroupRotateDown | Move::GroupRotateUp | Move::ColorRotate => {
            // Find the score group around the span, including the odd
            // pull-up and drop-down slots at its edges.
            let score = roster.player(pair[x]).score;
            if roster.player(pair[y]).score != score {
                return false;
            }
            let mut s_begin = x / 2 * 2;
            while s_begin > p_begin
                && roster.player(pair[s_begin - 2]).score == score
                && roster.player(pair[s_begin - 1]).score == score
            {
                s_begin -= 2;
            }
            let odd_pull_up = x == s_begin + 1 && roster.player(pair[s_begin]).score > score;
            let mut s_end = y / 2 * 2 + 2;
            while s_end < p_end2
                && roster.player(pair[s_end]).score == score
                && roster.player(pair[s_end + 1]).score == score
            {
                s_end += 2;
            }
            let odd_drop_down = y == s_end - 2
                && (roster.player(pair[s_end - 1]).score < score
                    || roster.player(pair[s_end - 1]).is_bye());
            debug_assert!(
                p_begin <= s_begin && s_begin <= x && x < y && y <= s_end && s_end <= p_end2
            );
            debug_assert!(!has_bye2 || s_end == p_end2);
            match mv {
                Move::GroupRotateDown => {
                    rotate_pair_down(
                        pair,
                        x,
                        y,
                        s_begin,
                        s_end,
                        odd_drop_down,
                        odd_pull_up,
                        &no_shift,
                    );
                    true
                }
                Move::GroupRotateUp => {
                    rotate_pair_up(
                        pair,
                        x,
                        y,
                        s_begin,
                        s_end,
                        odd_drop_down,
                        odd_pull_up,
                        &no_shift,
                    );
                    true
                }
                _ => rotate_color(
                    roster,
                    pair,
                    x,
                    y,
                    s_begin,
                    s_end,
                    odd_drop_down,
                    odd_pull_up,
                ),
            }
        }
        Move::ColorShiftDown | Move::ColorShiftUp => {
            debug_assert!(!roster.player(pair[y]).is_bye());
            // Tag the boards whose allocated color disagrees with the
            // round's opening board.
            let mut shift = FixedBitSet::with_capacity(p_end2);
            let partner = if p_begin % 2 == 0 {
                p_begin + 1
            } else {
                p_begin - 1
            };
            let start_color = allocate_color(
                roster.player(pair[p_begin]),
                roster.player(pair[partner]),
                (p_begin / 2) % 2 == 0,
            );
            let mut c = p_begin / 2 * 2 + 2;
            while c < p_end2 {
                let board_color = allocate_color(
                    roster.player(pair[c]),
                    roster.player(pair[c + 1]),
                    (c / 2) % 2 == 0,
                );
                if start_color != board_color {
                    shift.insert(c);
                }
                c += 2;
            }
            if mv == Move::ColorShiftDown {
                rotate_pair_down(pair, x, y, p_begin, p_end2, has_bye2, false, &shift);
            } else {
                rotate_pair_up(pair, x, y, p_begin, p_end2, has_bye2, false, &shift);
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::index::PlayerIndex;
    use wallchart_model::player::Player;

    fn roster_with_scores(scores: &[f32]) -> Roster {
        let players: Vec<Player> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let mut p =
                    Player::new(i as i32 + 1, 2000 - 100 * i as i32, 0.01 * (i as f64 + 1.0));
                p.score = score;
                p
            })
            .collect();
        Roster::canonicalize(players).unwrap()
    }

    fn straight_pair(len: usize) -> PairVector {
        (0..len).map(PlayerIndex::new).collect()
    }

    #[test]
    fn test_swap_is_a_transposition() {
        let roster = roster_with_scores(&[0.0; 4]);
        let mut pair = straight_pair(4);
        assert!(apply(Move::Swap, &roster, &mut pair, 1, 2, 0, 4, false));
        let expected: PairVector = [0usize, 2, 1, 3].iter().map(|&v| PlayerIndex::new(v)).collect();
        assert_eq!(pair, expected);
    }

    #[test]
    fn test_group_rotate_rejects_cross_group_spans() {
        let roster = roster_with_scores(&[1.0, 1.0, 0.0, 0.0]);
        let mut pair = straight_pair(4);
        let before = pair.clone();
        assert!(!apply(
            Move::GroupRotateDown,
            &roster,
            &mut pair,
            0,
            3,
            0,
            4,
            false
        ));
        assert_eq!(pair, before);
    }

    #[test]
    fn test_moves_preserve_the_player_set() {
        let roster = roster_with_scores(&[0.0; 8]);
        for mv in [Move::Swap, Move::RotateDown, Move::RotateUp] {
            let mut pair = straight_pair(8);
            assert!(apply(mv, &roster, &mut pair, 0, 6, 0, 8, false), "{mv}");
            let mut seen: Vec<usize> = pair.iter().map(|p| p.get()).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..8).collect::<Vec<_>>(), "{mv}");
        }
    }

    #[test]
    fn test_color_shift_moves_apply_cleanly() {
        let roster = roster_with_scores(&[0.0; 6]);
        for mv in [Move::ColorShiftDown, Move::ColorShiftUp] {
            let mut pair = straight_pair(6);
            assert!(apply(mv, &roster, &mut pair, 0, 4, 0, 6, false), "{mv}");
            let mut seen: Vec<usize> = pair.iter().map(|p| p.get()).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..6).collect::<Vec<_>>(), "{mv}");
        }
    }
}
