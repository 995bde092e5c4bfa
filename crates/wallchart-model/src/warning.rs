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

//! Warn codes: the letters that mark rule violations on the output.
//!
//! Each cost component that fires attaches a one-letter code to the player
//! it concerns. Letters are assigned `A..Z` then `a..z`, in the order the
//! components run during evaluation, so a letter's meaning is stable within
//! a session. The letter-to-description catalog is owned by the pairing
//! session and written at most once per letter; nothing here is global.

use crate::index::PlayerIndex;

/// Number of assignable warn-code letters (`A..Z` plus `a..z`).
const NUM_CODES: usize = 52;

/// A single warn-code letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WarnCode(u8);

impl WarnCode {
    /// Wraps a letter; anything outside `A..Z`/`a..z` is rejected.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(WarnCode(c as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// Dense catalog slot: `A..Z` map to `0..26`, `a..z` to `26..52`.
    #[inline]
    const fn slot(self) -> usize {
        if self.0 <= b'Z' {
            (self.0 - b'A') as usize
        } else {
            26 + (self.0 - b'a') as usize
        }
    }
}

/// Hands out warn-code letters in evaluation order: `A..Z`, then `a..z`.
#[derive(Clone, Debug)]
pub struct CodeLadder(u8);

impl CodeLadder {
    /// A fresh ladder, positioned before `A`.
    #[inline]
    pub fn new() -> Self {
        CodeLadder(b'A' - 1)
    }

    /// Advances to and returns the next letter.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if more than 52 letters are requested.
    #[inline]
    pub fn bump(&mut self) -> WarnCode {
        self.0 = if self.0 == b'Z' { b'a' } else { self.0 + 1 };
        debug_assert!(
            self.0.is_ascii_alphabetic(),
            "called `CodeLadder::bump` past the last assignable letter"
        );
        WarnCode(self.0)
    }
}

impl Default for CodeLadder {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-owned warn-code state: the letter-to-description catalog plus the
/// per-player code strings being accumulated.
#[derive(Clone, Debug)]
pub struct Warnings {
    descriptions: [Option<&'static str>; NUM_CODES],
    codes: Vec<String>,
}

impl Warnings {
    /// Creates the warning state for a roster of `num_players` entries
    /// (bye sentinel included).
    pub fn new(num_players: usize) -> Self {
        Self {
            descriptions: [None; NUM_CODES],
            codes: vec![String::new(); num_players],
        }
    }

    /// Forgets the codes recorded for one player. Descriptions persist.
    #[inline]
    pub fn clear_player(&mut self, player: PlayerIndex) {
        self.codes[player.get()].clear();
    }

    /// Attaches `code` to `player` and registers its description. The first
    /// description registered for a letter wins; per-player codes stay
    /// sorted and deduplicated.
    pub fn record(&mut self, player: PlayerIndex, code: WarnCode, description: &'static str) {
        let slot = code.slot();
        if self.descriptions[slot].is_none() {
            self.descriptions[slot] = Some(description);
        }
        let codes = &mut self.codes[player.get()];
        let c = code.as_char();
        match codes.chars().position(|existing| existing >= c) {
            Some(at) if codes.as_bytes()[at] == c as u8 => {}
            Some(at) => codes.insert(at, c),
            None => codes.push(c),
        }
    }

    /// Withdraws a code from one player, as when a charge is later
    /// credited back. The catalog keeps the description.
    pub fn remove(&mut self, player: PlayerIndex, code: WarnCode) {
        let codes = &mut self.codes[player.get()];
        if let Some(at) = codes.find(code.as_char()) {
            codes.remove(at);
        }
    }

    /// The codes recorded for one player, in letter order.
    #[inline]
    pub fn codes(&self, player: PlayerIndex) -> &str {
        &self.codes[player.get()]
    }

    /// The human-readable rule text for a letter, if any component using it
    /// has fired this session.
    #[inline]
    pub fn description(&self, code: WarnCode) -> Option<&'static str> {
        self.descriptions[code.slot()]
    }

    /// Copies the accumulated codes into the players' `warn_codes` fields.
    pub fn apply(&self, roster: &mut crate::roster::Roster) {
        for (position, codes) in self.codes.iter().enumerate() {
            roster.players_mut()[position].warn_codes = codes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_walks_upper_then_lower_case() {
        let mut ladder = CodeLadder::new();
        assert_eq!(ladder.bump().as_char(), 'A');
        assert_eq!(ladder.bump().as_char(), 'B');
        let mut ladder = CodeLadder::new();
        for _ in 0..26 {
            ladder.bump();
        }
        assert_eq!(ladder.bump().as_char(), 'a');
    }

    #[test]
    fn test_record_keeps_codes_sorted_and_unique() {
        let mut warnings = Warnings::new(2);
        let player = PlayerIndex::new(0);
        let b = WarnCode::from_char('B').unwrap();
        let a = WarnCode::from_char('A').unwrap();
        warnings.record(player, b, "second rule");
        warnings.record(player, a, "first rule");
        warnings.record(player, b, "second rule");
        assert_eq!(warnings.codes(player), "AB");
        assert_eq!(warnings.codes(PlayerIndex::new(1)), "");
    }

    #[test]
    fn test_remove_withdraws_a_single_code() {
        let mut warnings = Warnings::new(1);
        let player = PlayerIndex::new(0);
        let a = WarnCode::from_char('A').unwrap();
        let b = WarnCode::from_char('B').unwrap();
        warnings.record(player, a, "first");
        warnings.record(player, b, "second");
        warnings.remove(player, a);
        assert_eq!(warnings.codes(player), "B");
        // Removing an absent code is harmless.
        warnings.remove(player, a);
        assert_eq!(warnings.codes(player), "B");
    }

    #[test]
    fn test_first_description_wins() {
        let mut warnings = Warnings::new(1);
        let code = WarnCode::from_char('C').unwrap();
        warnings.record(PlayerIndex::new(0), code, "original");
        warnings.record(PlayerIndex::new(0), code, "imposter");
        assert_eq!(warnings.description(code), Some("original"));
    }

    #[test]
    fn test_lower_case_codes_have_distinct_slots() {
        let mut warnings = Warnings::new(1);
        let upper = WarnCode::from_char('A').unwrap();
        let lower = WarnCode::from_char('a').unwrap();
        warnings.record(PlayerIndex::new(0), upper, "upper");
        warnings.record(PlayerIndex::new(0), lower, "lower");
        assert_eq!(warnings.description(upper), Some("upper"));
        assert_eq!(warnings.description(lower), Some("lower"));
        assert_eq!(warnings.codes(PlayerIndex::new(0)), "Aa");
    }
}
