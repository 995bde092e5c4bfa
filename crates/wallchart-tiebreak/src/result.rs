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

//! Per-round result letters and the per-player tiebreak record.

use wallchart_model::color::Color;
use wallchart_model::player::OpponentKey;

/// One round's result letter on the wall chart.
///
/// The multi-game letters cover `multiround` series scored as one entry:
/// a swept series, a split won 1.5–0.5, and a drawn series. The second
/// letter of each regular pair marks the unrated variant and scores
/// identically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameResult {
    /// `$`: both games of a series won.
    DoubleWin,
    /// `#`: series won with a win and a draw.
    WinAndDraw,
    /// `%`: series drawn.
    DoubleDraw,
    /// `W`
    Win,
    /// `N`
    UnratedWin,
    /// `D`
    Draw,
    /// `R`
    UnratedDraw,
    /// `L`
    Loss,
    /// `S`
    UnratedLoss,
    /// `B`: full-point bye.
    FullBye,
    /// `X`: forfeit win.
    ForfeitWin,
    /// `H`: half-point bye.
    HalfBye,
    /// `Z`: half-point bye, assigned.
    AssignedHalfBye,
    /// `U`: unplayed game.
    Unplayed,
    /// `F`: forfeit loss.
    Forfeit,
    /// `*`: result unknown.
    Unknown,
}

impl GameResult {
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(GameResult::DoubleWin),
            '#' => Some(GameResult::WinAndDraw),
            '%' => Some(GameResult::DoubleDraw),
            'W' => Some(GameResult::Win),
            'N' => Some(GameResult::UnratedWin),
            'D' => Some(GameResult::Draw),
            'R' => Some(GameResult::UnratedDraw),
            'L' => Some(GameResult::Loss),
            'S' => Some(GameResult::UnratedLoss),
            'B' => Some(GameResult::FullBye),
            'X' => Some(GameResult::ForfeitWin),
            'H' => Some(GameResult::HalfBye),
            'Z' => Some(GameResult::AssignedHalfBye),
            'U' => Some(GameResult::Unplayed),
            'F' => Some(GameResult::Forfeit),
            '*' => Some(GameResult::Unknown),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            GameResult::DoubleWin => '$',
            GameResult::WinAndDraw => '#',
            GameResult::DoubleDraw => '%',
            GameResult::Win => 'W',
            GameResult::UnratedWin => 'N',
            GameResult::Draw => 'D',
            GameResult::UnratedDraw => 'R',
            GameResult::Loss => 'L',
            GameResult::UnratedLoss => 'S',
            GameResult::FullBye => 'B',
            GameResult::ForfeitWin => 'X',
            GameResult::HalfBye => 'H',
            GameResult::AssignedHalfBye => 'Z',
            GameResult::Unplayed => 'U',
            GameResult::Forfeit => 'F',
            GameResult::Unknown => '*',
        }
    }

    /// Whether the round was actually played over the board. Byes,
    /// forfeits, and unknown results are not played.
    #[inline]
    pub const fn is_played(self) -> bool {
        !matches!(
            self,
            GameResult::FullBye
                | GameResult::ForfeitWin
                | GameResult::HalfBye
                | GameResult::AssignedHalfBye
                | GameResult::Unplayed
                | GameResult::Forfeit
                | GameResult::Unknown
        )
    }
}

/// One player's input record and computed tiebreaks.
///
/// The three per-round vectors must share one length: players do not all
/// play the same number of rounds (cross-section standings), and withdrawn
/// players carry `U` entries so the lengths match their section.
#[derive(Clone, Debug)]
pub struct PlayerResult {
    /// The key this record is indexed by.
    pub player: OpponentKey,
    pub rating: i32,
    /// Opponent key for each round, in order.
    pub opponents: Vec<OpponentKey>,
    /// Played color for each round; byes carry no color.
    pub colors: Vec<Option<Color>>,
    /// Result letter for each round.
    pub results: Vec<GameResult>,

    // Accumulators, rebuilt by the calculation.
    pub(crate) raw_score: f32,
    pub(crate) adj_score: f32,
    pub(crate) cum_score: f32,
    pub(crate) bye_score: f32,
    pub(crate) head2head: f32,
    pub(crate) bye_count: i16,
    pub(crate) black_count: i16,
    pub(crate) kashdan: i16,
    pub(crate) win_count: i16,
    pub(crate) first_loss_round: usize,
    pub(crate) performance_rating: f64,
    pub(crate) coin_flip: f64,

    /// Tiebreak letters, in ranked order.
    pub tiebreak_code: Vec<char>,
    /// Tiebreak values, parallel to `tiebreak_code`.
    pub tiebreak_value: Vec<f64>,
}

impl PlayerResult {
    /// Creates an input record; the calculation fills everything else.
    pub fn new(
        player: OpponentKey,
        rating: i32,
        opponents: Vec<OpponentKey>,
        colors: Vec<Option<Color>>,
        results: Vec<GameResult>,
    ) -> Self {
        Self {
            player,
            rating,
            opponents,
            colors,
            results,
            raw_score: 0.0,
            adj_score: 0.0,
            cum_score: 0.0,
            bye_score: 0.0,
            head2head: 0.0,
            bye_count: 0,
            black_count: 0,
            kashdan: 0,
            win_count: 0,
            first_loss_round: 0,
            performance_rating: 0.0,
            coin_flip: -1.0,
            tiebreak_code: Vec::new(),
            tiebreak_value: Vec::new(),
        }
    }

    /// Total score over the recorded rounds.
    #[inline]
    pub fn raw_score(&self) -> f32 {
        self.raw_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_round_trip() {
        for c in [
            '$', '#', '%', 'W', 'N', 'D', 'R', 'L', 'S', 'B', 'X', 'H', 'Z', 'U', 'F', '*',
        ] {
            assert_eq!(GameResult::from_char(c).map(GameResult::as_char), Some(c));
        }
        assert_eq!(GameResult::from_char('q'), None);
    }

    #[test]
    fn test_played_excludes_byes_and_forfeits() {
        assert!(GameResult::Win.is_played());
        assert!(GameResult::DoubleDraw.is_played());
        assert!(!GameResult::FullBye.is_played());
        assert!(!GameResult::ForfeitWin.is_played());
        assert!(!GameResult::Unknown.is_played());
    }
}
