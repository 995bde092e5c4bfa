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

//! The canonical roster.
//!
//! Canonicalization appends exactly one bye sentinel, sorts every player by
//! the canonical order, assigns ranks, derives due colors, and resolves the
//! opponent/teammate id lists into rank mirrors. After it runs, the roster
//! upholds the invariants the rest of the engine assumes: the sentinel sits
//! at the last position, ranks equal positions, and every rank mirror points
//! at a player still present in the section.

use crate::color::DueColor;
use crate::index::PlayerIndex;
use crate::player::{OpponentKey, Player};
use std::collections::HashMap;

/// Validation failure while building the canonical roster. These indicate a
/// caller bug, not an imperfect pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// No real players were supplied.
    Empty,
    /// Two entries share the same `(play_id, reentry)` identity.
    DuplicatePlayer(OpponentKey),
    /// More than one bye sentinel was supplied.
    DuplicateBye,
    /// A player's opponent list and played-color list differ in length.
    MismatchedHistory(OpponentKey),
    /// Two players share the same random tiebreaker, so the canonical order
    /// would not be total.
    DuplicateRand(OpponentKey, OpponentKey),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Empty => write!(f, "no players to pair"),
            RosterError::DuplicatePlayer(key) => {
                write!(f, "player {} appears more than once", key)
            }
            RosterError::DuplicateBye => write!(f, "more than one bye sentinel supplied"),
            RosterError::MismatchedHistory(key) => write!(
                f,
                "player {} has opponents and played colors of different lengths",
                key
            ),
            RosterError::DuplicateRand(a, b) => {
                write!(f, "players {} and {} share the same random tiebreaker", a, b)
            }
        }
    }
}

impl std::error::Error for RosterError {}

/// The canonical roster: all players of one section sorted by the canonical
/// order, with exactly one bye sentinel at the last position.
#[derive(Clone, Debug)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds the canonical roster from the caller's player list.
    ///
    /// Appends a bye sentinel if none is present, sorts, assigns
    /// `rank = position`, derives due colors, and resolves the rank mirrors.
    /// Entries in `opponents`/`teammates` that no longer exist in the
    /// section are dropped from the mirrors.
    pub fn canonicalize(mut players: Vec<Player>) -> Result<Roster, RosterError> {
        let real = players.iter().filter(|p| !p.is_bye()).count();
        if real == 0 {
            return Err(RosterError::Empty);
        }
        if players.len() - real > 1 {
            return Err(RosterError::DuplicateBye);
        }
        for player in &players {
            if player.opponents.len() != player.played_colors.len() {
                return Err(RosterError::MismatchedHistory(player.key()));
            }
        }
        if players.iter().all(|p| !p.is_bye()) {
            let first = &players[0];
            players.push(Player::bye_sentinel(first.round, first.multiround));
        }

        // Totality checks the sort itself relies on.
        let mut identities: Vec<(OpponentKey, f64)> = players
            .iter()
            .filter(|p| !p.is_bye())
            .map(|p| (p.key(), p.rand))
            .collect();
        identities.sort_by(|a, b| a.0.cmp(&b.0));
        for window in identities.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(RosterError::DuplicatePlayer(window[0].0));
            }
        }
        identities.sort_by(|a, b| a.1.total_cmp(&b.1));
        for window in identities.windows(2) {
            if window[0].1 == window[1].1 {
                return Err(RosterError::DuplicateRand(window[0].0, window[1].0));
            }
        }

        players.sort_by(|a, b| a.canonical_cmp(b));

        let mut roster = Roster { players };
        roster.set_ranks();
        debug_assert!(roster.players.last().is_some_and(Player::is_bye));
        Ok(roster)
    }

    /// Re-assigns ranks, due colors, and the rank mirrors from the current
    /// ordering. The first entry of a duplicated `play_id` wins the rank
    /// mapping, matching the external convention that teammates are listed
    /// by player id alone.
    pub fn set_ranks(&mut self) {
        let mut rank_map: HashMap<i32, usize> = HashMap::with_capacity(self.players.len());
        for (rank, player) in self.players.iter_mut().enumerate() {
            player.rank = rank;
            rank_map.entry(player.play_id).or_insert(rank);
            player.due_color = DueColor::derive(&player.color_history, player.multiround);
        }
        for x in 0..self.players.len() {
            let opponent_ranks = self.players[x]
                .opponents
                .iter()
                .filter_map(|key| rank_map.get(&key.play_id).copied())
                .collect();
            let teammate_ranks = self.players[x]
                .teammates
                .iter()
                .filter_map(|id| rank_map.get(id).copied())
                .collect();
            self.players[x].opponent_ranks = opponent_ranks;
            self.players[x].teammate_ranks = teammate_ranks;
        }
    }

    /// Re-orders the roster for a round-robin section: bye last, then by the
    /// pre-drawn lots (`rand`). Ranks are not reassigned; round-robin seats
    /// are positional.
    pub fn sort_for_round_robin(&mut self) {
        self.players.sort_by(|a, b| {
            a.is_bye()
                .cmp(&b.is_bye())
                .then(a.rand.total_cmp(&b.rand))
        });
    }

    /// Number of entries including the bye sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Position of the bye sentinel (the last slot).
    #[inline]
    pub fn bye_index(&self) -> PlayerIndex {
        debug_assert!(self.players.last().is_some_and(Player::is_bye));
        PlayerIndex::new(self.players.len() - 1)
    }

    #[inline]
    pub fn player(&self, index: PlayerIndex) -> &Player {
        &self.players[index.get()]
    }

    #[inline]
    pub fn player_mut(&mut self, index: PlayerIndex) -> &mut Player {
        &mut self.players[index.get()]
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Consumes the roster, returning the players (bye sentinel included).
    #[inline]
    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMark;
    use crate::player::BYE_ID;

    fn sample(play_id: i32, rating: i32, rand: f64) -> Player {
        Player::new(play_id, rating, rand)
    }

    #[test]
    fn test_canonicalize_appends_single_bye() {
        let roster =
            Roster::canonicalize(vec![sample(1, 1800, 0.1), sample(2, 1500, 0.2)]).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.player(roster.bye_index()).play_id, BYE_ID);
        assert_eq!(
            roster.players().iter().filter(|p| p.is_bye()).count(),
            1,
            "exactly one bye sentinel"
        );
    }

    #[test]
    fn test_canonicalize_ranks_follow_positions() {
        let roster = Roster::canonicalize(vec![
            sample(3, 1200, 0.3),
            sample(1, 1800, 0.1),
            sample(2, 1500, 0.2),
        ])
        .unwrap();
        for (position, player) in roster.players().iter().enumerate() {
            assert_eq!(player.rank, position);
        }
        assert_eq!(roster.players()[0].play_id, 1);
        assert_eq!(roster.players()[1].play_id, 2);
        assert_eq!(roster.players()[2].play_id, 3);
    }

    #[test]
    fn test_canonicalize_rejects_duplicates() {
        let result = Roster::canonicalize(vec![sample(1, 1800, 0.1), sample(1, 1500, 0.2)]);
        assert_eq!(
            result.unwrap_err(),
            RosterError::DuplicatePlayer(OpponentKey::new(1, 0))
        );
    }

    #[test]
    fn test_canonicalize_rejects_duplicate_rand() {
        let result = Roster::canonicalize(vec![sample(1, 1500, 0.5), sample(2, 1500, 0.5)]);
        assert!(matches!(result, Err(RosterError::DuplicateRand(_, _))));
    }

    #[test]
    fn test_canonicalize_rejects_empty() {
        assert_eq!(Roster::canonicalize(vec![]).unwrap_err(), RosterError::Empty);
    }

    #[test]
    fn test_rank_mirrors_drop_missing_players() {
        let mut a = sample(1, 1800, 0.1);
        a.opponents.push(OpponentKey::new(2, 0));
        a.opponents.push(OpponentKey::new(99, 0)); // withdrew from section
        a.played_colors.push(crate::color::Color::White);
        a.played_colors.push(crate::color::Color::Black);
        let b = sample(2, 1500, 0.2);
        let roster = Roster::canonicalize(vec![a, b]).unwrap();
        assert_eq!(roster.players()[0].opponent_ranks.as_slice(), &[1]);
    }

    #[test]
    fn test_canonicalize_derives_due_colors() {
        let mut a = sample(1, 1800, 0.1);
        a.round = 2;
        a.color_history.push(ColorMark::White);
        let mut b = sample(2, 1500, 0.2);
        b.round = 2;
        b.color_history.push(ColorMark::Black);
        let roster = Roster::canonicalize(vec![a, b]).unwrap();
        assert!(roster.players()[0].due_color.is_equalizing());
        assert_eq!(
            roster.players()[0].due_color.color(),
            Some(crate::color::Color::Black)
        );
        assert_eq!(
            roster.players()[1].due_color.color(),
            Some(crate::color::Color::White)
        );
    }

    #[test]
    fn test_round_robin_order_uses_lots() {
        let mut roster = Roster::canonicalize(vec![
            sample(1, 1800, 0.9),
            sample(2, 1500, 0.1),
            sample(3, 1200, 0.5),
        ])
        .unwrap();
        roster.sort_for_round_robin();
        let ids: Vec<i32> = roster.players().iter().map(|p| p.play_id).collect();
        assert_eq!(ids, vec![2, 3, 1, BYE_ID]);
    }
}
