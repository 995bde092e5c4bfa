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

//! The pairing vector: the genotype of the local search.
//!
//! An even-length sequence of roster positions. Slots `2k` and `2k + 1` are
//! the two players on board `k`; the even slot holds the higher-ranked
//! (upper-half) player. The bye sentinel, when present on a board, occupies
//! the odd slot only.

use crate::index::PlayerIndex;

/// An even-length ordered sequence of roster positions, two per board.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PairVector {
    slots: Vec<PlayerIndex>,
}

impl PairVector {
    #[inline]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots (twice the number of boards).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of boards.
    #[inline]
    pub fn num_boards(&self) -> usize {
        debug_assert!(self.slots.len() % 2 == 0);
        self.slots.len() / 2
    }

    #[inline]
    pub fn push(&mut self, player: PlayerIndex) {
        self.slots.push(player);
    }

    #[inline]
    pub fn extend<I>(&mut self, players: I)
    where
        I: IntoIterator<Item = PlayerIndex>,
    {
        self.slots.extend(players);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// The two slots of board `k`: `(upper, lower)`.
    #[inline]
    pub fn board(&self, k: usize) -> (PlayerIndex, PlayerIndex) {
        (self.slots[2 * k], self.slots[2 * k + 1])
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    #[inline]
    pub fn as_slice(&self) -> &[PlayerIndex] {
        &self.slots
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PlayerIndex> {
        self.slots.iter()
    }
}

impl std::ops::Index<usize> for PairVector {
    type Output = PlayerIndex;

    #[inline]
    fn index(&self, slot: usize) -> &PlayerIndex {
        &self.slots[slot]
    }
}

impl std::ops::IndexMut<usize> for PairVector {
    #[inline]
    fn index_mut(&mut self, slot: usize) -> &mut PlayerIndex {
        &mut self.slots[slot]
    }
}

impl FromIterator<PlayerIndex> for PairVector {
    fn from_iter<I: IntoIterator<Item = PlayerIndex>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for PairVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (slot, player) in self.slots.iter().enumerate() {
            write!(
                f,
                "{}{}",
                if slot == 0 { "{" } else { "," },
                player.get()
            )?;
        }
        if !self.slots.is_empty() {
            write!(f, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_of(values: &[usize]) -> PairVector {
        values.iter().map(|&v| PlayerIndex::new(v)).collect()
    }

    #[test]
    fn test_boards_are_slot_pairs() {
        let pair = pair_of(&[0, 2, 1, 3]);
        assert_eq!(pair.num_boards(), 2);
        assert_eq!(pair.board(0), (PlayerIndex::new(0), PlayerIndex::new(2)));
        assert_eq!(pair.board(1), (PlayerIndex::new(1), PlayerIndex::new(3)));
    }

    #[test]
    fn test_swap_moves_players_between_slots() {
        let mut pair = pair_of(&[0, 1, 2, 3]);
        pair.swap(1, 2);
        assert_eq!(pair.as_slice(), pair_of(&[0, 2, 1, 3]).as_slice());
    }

    #[test]
    fn test_display_matches_brace_format() {
        assert_eq!(pair_of(&[0, 1]).to_string(), "{0,1}");
        assert_eq!(PairVector::new().to_string(), "");
    }
}
