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

//! Board colors, per-round color history, and the due-color preference.
//!
//! A player's color history records one mark per prior round: the color
//! actually played, or which kind of bye was taken. The due color derived
//! from that history is what the pairing rules would prefer the player to
//! receive next: a **strong** (equalizing) preference when the counts of
//! White and Black games differ, a **weak** (alternating) preference when
//! they are equal, and none at all before the first played game.

use smallvec::SmallVec;

/// A board color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the upper-case letter form (`W` or `B`).
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    /// Parses `W`/`B` in either case. Anything else is no color.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'W' | 'w' => Some(Color::White),
            'B' | 'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One entry of a player's per-round color history.
///
/// The letter forms match the interchange format: `W`/`B` for played games,
/// `f`/`h`/`z` for full-, half-, and zero-point byes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ColorMark {
    White,
    Black,
    FullBye,
    HalfBye,
    ZeroBye,
}

impl ColorMark {
    /// Returns the played color, if this round was played.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            ColorMark::White => Some(Color::White),
            ColorMark::Black => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns `true` if the round was not played (any kind of bye).
    #[inline]
    pub const fn is_unplayed(self) -> bool {
        self.color().is_none()
    }

    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            ColorMark::White => 'W',
            ColorMark::Black => 'B',
            ColorMark::FullBye => 'f',
            ColorMark::HalfBye => 'h',
            ColorMark::ZeroBye => 'z',
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'W' => Some(ColorMark::White),
            'B' => Some(ColorMark::Black),
            'f' => Some(ColorMark::FullBye),
            'h' => Some(ColorMark::HalfBye),
            'z' => Some(ColorMark::ZeroBye),
            _ => None,
        }
    }
}

/// The color the pairing rules prefer a player to receive next.
///
/// Equalization (`Equalize`) dominates alternation (`Alternate`); the
/// magnitude of an equalizing preference is the size of the White/Black
/// imbalance and breaks ties between two equalizing players.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DueColor {
    /// No played games yet; no preference.
    #[default]
    None,
    /// Equal counts of White and Black: weakly prefer the opposite of the
    /// most recently played color.
    Alternate { color: Color },
    /// Unequal counts: strongly prefer the under-represented color.
    /// `magnitude` is the size of the imbalance.
    Equalize { color: Color, magnitude: usize },
}

impl DueColor {
    /// The preferred color, if any.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            DueColor::None => None,
            DueColor::Alternate { color } => Some(color),
            DueColor::Equalize { color, .. } => Some(color),
        }
    }

    /// Whether this is a strong (equalizing) preference.
    #[inline]
    pub const fn is_equalizing(self) -> bool {
        matches!(self, DueColor::Equalize { .. })
    }

    /// The strength of the preference: 0 for none, 1 for alternation, the
    /// imbalance for equalization.
    #[inline]
    pub const fn magnitude(self) -> usize {
        match self {
            DueColor::None => 0,
            DueColor::Alternate { .. } => 1,
            DueColor::Equalize { magnitude, .. } => magnitude,
        }
    }

    /// Derives the due color from a color history.
    ///
    /// When `multiround > 1` (several games per round against the same
    /// opponent) only the first mark of each series counts. With more Whites
    /// than Blacks the player is due Black with the imbalance as magnitude,
    /// and vice versa. With equal counts the preference is the opposite of
    /// the most recently played color, weakly. A history with no played
    /// games yields no preference.
    pub fn derive(history: &[ColorMark], multiround: i16) -> DueColor {
        let compressed: SmallVec<[ColorMark; 16]> = if multiround != 1 && !history.is_empty() {
            debug_assert!(
                multiround > 0 && history.len() % multiround as usize == 0,
                "called `DueColor::derive` with history length {} not a multiple of multiround {}",
                history.len(),
                multiround
            );
            history
                .iter()
                .step_by(multiround.max(1) as usize)
                .copied()
                .collect()
        } else {
            history.iter().copied().collect()
        };

        let unplayed = compressed.iter().filter(|m| m.is_unplayed()).count();
        if unplayed == compressed.len() {
            return DueColor::None;
        }
        let whites = compressed
            .iter()
            .filter(|m| m.color() == Some(Color::White))
            .count();
        let blacks = compressed
            .iter()
            .filter(|m| m.color() == Some(Color::Black))
            .count();
        debug_assert!(whites + blacks + unplayed == compressed.len());
        if whites > blacks {
            return DueColor::Equalize {
                color: Color::Black,
                magnitude: whites - blacks,
            };
        }
        if blacks > whites {
            return DueColor::Equalize {
                color: Color::White,
                magnitude: blacks - whites,
            };
        }
        for mark in compressed.iter().rev() {
            if let Some(color) = mark.color() {
                return DueColor::Alternate {
                    color: color.flip(),
                };
            }
        }
        DueColor::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(s: &str) -> Vec<ColorMark> {
        s.chars()
            .map(|c| ColorMark::from_char(c).expect("bad mark in test history"))
            .collect()
    }

    #[test]
    fn test_derive_empty_history_has_no_preference() {
        assert_eq!(DueColor::derive(&[], 1), DueColor::None);
    }

    #[test]
    fn test_derive_all_byes_has_no_preference() {
        assert_eq!(DueColor::derive(&history("fhz"), 1), DueColor::None);
    }

    #[test]
    fn test_derive_equalization_dominates() {
        assert_eq!(
            DueColor::derive(&history("WW"), 1),
            DueColor::Equalize {
                color: Color::Black,
                magnitude: 2
            }
        );
        assert_eq!(
            DueColor::derive(&history("WBB"), 1),
            DueColor::Equalize {
                color: Color::White,
                magnitude: 1
            }
        );
    }

    #[test]
    fn test_derive_alternation_on_balanced_history() {
        assert_eq!(
            DueColor::derive(&history("WB"), 1),
            DueColor::Alternate {
                color: Color::White
            }
        );
        assert_eq!(
            DueColor::derive(&history("BW"), 1),
            DueColor::Alternate {
                color: Color::Black
            }
        );
    }

    #[test]
    fn test_derive_byes_do_not_disturb_balance() {
        // Played W then sat out: still due Black, weakly.
        assert_eq!(
            DueColor::derive(&history("Wh"), 1),
            DueColor::Equalize {
                color: Color::Black,
                magnitude: 1
            }
        );
        assert_eq!(
            DueColor::derive(&history("WBf"), 1),
            DueColor::Alternate {
                color: Color::White
            }
        );
    }

    #[test]
    fn test_derive_multiround_uses_first_of_each_series() {
        // Two games per round: WB WB reads as W, W.
        assert_eq!(
            DueColor::derive(&history("WBWB"), 2),
            DueColor::Equalize {
                color: Color::Black,
                magnitude: 2
            }
        );
    }

    #[test]
    fn test_derive_rebalances_toward_equality() {
        // Appending the due color moves the counts one step toward equal.
        let marks = history("WWB");
        let due = DueColor::derive(&marks, 1);
        let DueColor::Equalize { color, .. } = due else {
            panic!("expected equalizing preference");
        };
        let mut extended = marks.clone();
        extended.push(match color {
            Color::White => ColorMark::White,
            Color::Black => ColorMark::Black,
        });
        assert_eq!(
            DueColor::derive(&extended, 1),
            DueColor::Alternate {
                color: Color::White
            }
        );
    }

    #[test]
    fn test_mark_letter_round_trip() {
        for c in ['W', 'B', 'f', 'h', 'z'] {
            assert_eq!(ColorMark::from_char(c).map(ColorMark::as_char), Some(c));
        }
        assert_eq!(ColorMark::from_char('q'), None);
    }
}
