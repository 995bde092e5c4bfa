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

//! The lexicographic cost vector.
//!
//! One term per prioritized pairing rule, compared term by term in priority
//! order: an earlier term dominates everything after it, so the optimizer
//! will trade any number of color complaints for one avoided rematch. The
//! section size rides along for display (the interchange and transpose
//! terms pack a count and a rating delta into one scalar) but never takes
//! part in comparison.

use wallchart_core::num::CostValue;
use wallchart_model::player::MAX_RATING;

/// The prioritized cost terms, most significant first.
///
/// The discriminant is the term's position in the vector, so iterating
/// [`CostTerm::ALL`] walks the vector in comparison order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(usize)]
pub enum CostTerm {
    /// Bye assignment contradicts a bye request or house-player intent.
    ByeChoice,
    /// A repeated full-point bye.
    ByeAgain,
    /// The same two players paired again.
    PlayersMeetTwice,
    /// Remaining rounds cannot be completed without a rematch.
    CantPairPlayers,
    /// Team block broken for players short of a plus-two score.
    TeamBlocks2,
    /// Players of different scores paired together.
    UnequalScores,
    /// Team block broken.
    TeamBlocks,
    /// Remaining rounds cannot be completed without breaking a team block.
    CantPairTeams,
    /// Bye given to a player with prior half byes or forfeit wins.
    ByeAfterHalf,
    /// Bye given outside the lowest score group.
    LowestScoreBye,
    /// Bye given to an unrated player who still needs rated games.
    LowestRatedBye,
    /// Odd player resolved with an unrated player.
    OddPlayerUnrated,
    /// Odd player dropped across more than one score group.
    OddPlayerMultipleGroups,
    /// Interchange with a rating swing above 200 points.
    Interchange200,
    /// Transposition above 200 points.
    Transpose200,
    /// Strong (equalizing) due color denied.
    ColorImbalance,
    /// The same color three or more times in a row.
    ColorRepeat3,
    /// Interchange above 80 points.
    Interchange80,
    /// Transposition above 80 points.
    Transpose80,
    /// Weak (alternating) due color denied.
    ColorAlternate,
    /// Any interchange at all.
    Interchange0,
    /// Any transposition at all.
    Transpose0,
    /// Pair-number ordering violations on the pairing cards.
    PairingCard,
    /// Allocated color disagrees with the input color hint.
    ReversedColors,
    /// Output board number collides with another board's hint.
    BoardOverlap,
    /// Board numbers out of order relative to the hint.
    BoardOrder,
}

impl CostTerm {
    /// Number of terms in the vector.
    pub const COUNT: usize = 26;

    /// Every term, in comparison order.
    pub const ALL: [CostTerm; CostTerm::COUNT] = [
        CostTerm::ByeChoice,
        CostTerm::ByeAgain,
        CostTerm::PlayersMeetTwice,
        CostTerm::CantPairPlayers,
        CostTerm::TeamBlocks2,
        CostTerm::UnequalScores,
        CostTerm::TeamBlocks,
        CostTerm::CantPairTeams,
        CostTerm::ByeAfterHalf,
        CostTerm::LowestScoreBye,
        CostTerm::LowestRatedBye,
        CostTerm::OddPlayerUnrated,
        CostTerm::OddPlayerMultipleGroups,
        CostTerm::Interchange200,
        CostTerm::Transpose200,
        CostTerm::ColorImbalance,
        CostTerm::ColorRepeat3,
        CostTerm::Interchange80,
        CostTerm::Transpose80,
        CostTerm::ColorAlternate,
        CostTerm::Interchange0,
        CostTerm::Transpose0,
        CostTerm::PairingCard,
        CostTerm::ReversedColors,
        CostTerm::BoardOverlap,
        CostTerm::BoardOrder,
    ];

    /// The term's name as written in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            CostTerm::ByeChoice => "byeChoice",
            CostTerm::ByeAgain => "byeAgain",
            CostTerm::PlayersMeetTwice => "playersMeetTwice",
            CostTerm::CantPairPlayers => "cantPairPlayers",
            CostTerm::TeamBlocks2 => "teamBlocks2",
            CostTerm::UnequalScores => "unequalScores",
            CostTerm::TeamBlocks => "teamBlocks",
            CostTerm::CantPairTeams => "cantPairTeams",
            CostTerm::ByeAfterHalf => "byeAfterHalf",
            CostTerm::LowestScoreBye => "lowestScoreBye",
            CostTerm::LowestRatedBye => "lowestRatedBye",
            CostTerm::OddPlayerUnrated => "oddPlayerUnrated",
            CostTerm::OddPlayerMultipleGroups => "oddPlayerMultipleGroups",
            CostTerm::Interchange200 => "interchange200",
            CostTerm::Transpose200 => "transpose200",
            CostTerm::ColorImbalance => "colorImbalance",
            CostTerm::ColorRepeat3 => "colorRepeat3",
            CostTerm::Interchange80 => "interchange80",
            CostTerm::Transpose80 => "transpose80",
            CostTerm::ColorAlternate => "colorAlternate",
            CostTerm::Interchange0 => "interchange0",
            CostTerm::Transpose0 => "transpose0",
            CostTerm::PairingCard => "pairingCard",
            CostTerm::ReversedColors => "reversedColors",
            CostTerm::BoardOverlap => "boardOverlap",
            CostTerm::BoardOrder => "boardOrder",
        }
    }

    /// Whether the term packs `count * MAX_RATING + delta` and is displayed
    /// split into its two parts.
    const fn is_rating_packed(self) -> bool {
        matches!(
            self,
            CostTerm::Interchange200
                | CostTerm::Transpose200
                | CostTerm::Interchange80
                | CostTerm::Transpose80
                | CostTerm::Interchange0
                | CostTerm::Transpose0
        )
    }
}

/// The full cost of one candidate pairing, ordered lexicographically.
#[derive(Clone, Debug)]
pub struct CostVector {
    terms: [CostValue; CostTerm::COUNT],
    /// Section size (bye excluded); display only, never compared.
    players: usize,
}

impl CostVector {
    /// The zero vector for a section of `players` (bye excluded).
    #[inline]
    pub fn zero(players: usize) -> Self {
        Self {
            terms: [0; CostTerm::COUNT],
            players,
        }
    }

    #[inline]
    pub fn get(&self, term: CostTerm) -> CostValue {
        self.terms[term as usize]
    }

    #[inline]
    pub fn set(&mut self, term: CostTerm, value: CostValue) {
        self.terms[term as usize] = value;
    }

    /// Adds `value` to a term, saturating.
    #[inline]
    pub fn add(&mut self, term: CostTerm, value: CostValue) {
        let slot = &mut self.terms[term as usize];
        *slot = slot.saturating_add(value);
    }

    /// Whether every term is zero (the pairing violates no rule).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.iter().all(|&v| v == 0)
    }

    #[inline]
    pub fn players(&self) -> usize {
        self.players
    }
}

impl PartialEq for CostVector {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for CostVector {}

impl PartialOrd for CostVector {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostVector {
    /// Lexicographic comparison, earlier terms dominating.
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.terms.cmp(&other.terms)
    }
}

impl std::fmt::Display for CostVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut found = false;
        for (position, term) in CostTerm::ALL.iter().enumerate() {
            let value = self.get(*term);
            if value == 0 {
                continue;
            }
            if found {
                write!(f, " ")?;
            }
            if term.is_rating_packed() && self.players > 0 {
                let unit = MAX_RATING as CostValue * self.players as CostValue;
                write!(
                    f,
                    "{}){}={},{}",
                    position + 1,
                    term.name(),
                    value / unit,
                    value % unit
                )?;
            } else {
                write!(f, "{}){}={}", position + 1, term.name(), value)?;
            }
            found = true;
        }
        if found {
            write!(f, "; players={}", self.players)
        } else {
            write!(f, "zero; players={}", self.players)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_is_zero() {
        assert!(CostVector::zero(8).is_zero());
    }

    #[test]
    fn test_earlier_term_dominates_later() {
        let mut rematch = CostVector::zero(8);
        rematch.add(CostTerm::PlayersMeetTwice, 1);
        let mut colors = CostVector::zero(8);
        colors.add(CostTerm::ColorAlternate, 1_000_000);
        assert!(rematch > colors);
    }

    #[test]
    fn test_equal_terms_compare_equal_across_player_counts() {
        let a = CostVector::zero(8);
        let b = CostVector::zero(12);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_add_saturates() {
        let mut cost = CostVector::zero(4);
        cost.add(CostTerm::ByeChoice, CostValue::MAX);
        cost.add(CostTerm::ByeChoice, 5);
        assert_eq!(cost.get(CostTerm::ByeChoice), CostValue::MAX);
    }

    #[test]
    fn test_display_names_nonzero_terms() {
        let mut cost = CostVector::zero(4);
        cost.add(CostTerm::UnequalScores, 3);
        let text = cost.to_string();
        assert!(text.contains("unequalScores=3"), "got {text}");
        assert_eq!(CostVector::zero(4).to_string(), "zero; players=4");
    }

    #[test]
    fn test_term_enumeration_matches_discriminants() {
        for (position, term) in CostTerm::ALL.iter().enumerate() {
            assert_eq!(*term as usize, position);
        }
    }
}
