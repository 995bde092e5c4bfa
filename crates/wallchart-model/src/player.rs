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

//! One competitor's state at the moment of pairing.
//!
//! The `Player` carries everything the cost system needs to judge a proposed
//! pairing: prior opponents and colors, score, rating, bye bookkeeping, and
//! the team non-pairing requests. The canonical total order defined here is
//! the single ordering used by every sort in the engine; it is total because
//! the per-player `rand` tiebreaker is required to be unique across the
//! section.

use crate::color::{Color, ColorMark, DueColor};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::str::FromStr;

/// Reserved player id of the synthetic bye opponent. Never a real player.
pub const BYE_ID: i32 = 0;

/// One more than the maximum representable rating.
pub const MAX_RATING: i32 = 30_000 + 1;

/// Identifies one tournament entry of one person: the same person
/// re-registering mid-tournament gets a fresh `reentry` number.
///
/// The `"<play_id>_<reentry>"` string form exists only at the external
/// boundary via `Display`/`FromStr`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OpponentKey {
    pub play_id: i32,
    pub reentry: i16,
}

impl OpponentKey {
    #[inline]
    pub const fn new(play_id: i32, reentry: i16) -> Self {
        Self { play_id, reentry }
    }
}

impl std::fmt::Display for OpponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.play_id, self.reentry)
    }
}

/// Error returned when an opponent key string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOpponentKeyError {
    pub input: String,
}

impl std::fmt::Display for ParseOpponentKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid opponent key '{}'", self.input)
    }
}

impl std::error::Error for ParseOpponentKeyError {}

impl FromStr for OpponentKey {
    type Err = ParseOpponentKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseOpponentKeyError {
            input: s.to_string(),
        };
        let (id, reentry) = s.split_once('_').ok_or_else(err)?;
        Ok(OpponentKey {
            play_id: id.parse().map_err(|_| err())?,
            reentry: reentry.parse().map_err(|_| err())?,
        })
    }
}

/// The kind of tournament a section is played under.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TournamentType {
    #[default]
    Swiss,
    Match,
    RoundRobin,
    DoubleRoundRobin,
    DoubleSwiss,
}

impl TournamentType {
    /// Round-robin sections bypass the optimizer and use the fixed tables.
    #[inline]
    pub const fn is_round_robin(self) -> bool {
        matches!(
            self,
            TournamentType::RoundRobin | TournamentType::DoubleRoundRobin
        )
    }

    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(TournamentType::Swiss),
            'M' => Some(TournamentType::Match),
            'R' => Some(TournamentType::RoundRobin),
            'D' => Some(TournamentType::DoubleRoundRobin),
            '2' => Some(TournamentType::DoubleSwiss),
            _ => None,
        }
    }
}

/// One competitor's state entering the round being paired.
///
/// The pairing core mutates only `rank`, `board_num`, `board_color`,
/// `due_color`, `warn_codes`, the rank mirrors, and (for house players)
/// `bye_request`; everything else is caller input.
#[derive(Clone, Debug)]
pub struct Player {
    /// Section-unique player id. Zero is reserved for the bye sentinel.
    pub play_id: i32,
    /// Distinguishes multiple tournament entries by the same person.
    pub reentry: i16,
    /// Display name; used only in diagnostics.
    pub name: String,
    /// Tournament type of the section.
    pub tournament_type: TournamentType,
    /// Current round, 1-based.
    pub round: i16,
    /// Input board hint; output final board placement.
    pub board_num: i32,
    /// Input color hint; output final color.
    pub board_color: Option<Color>,

    /// Primary team id for non-pairing requests; zero means no team.
    pub team_id: i32,
    /// Player ids this player should not be paired against.
    pub teammates: SmallVec<[i32; 4]>,
    /// Opponents already played, in round order, byes excluded.
    pub opponents: SmallVec<[OpponentKey; 8]>,
    /// Colors of the played games, parallel to `opponents`.
    pub played_colors: SmallVec<[Color; 8]>,

    /// Total points from prior rounds.
    pub score: f32,
    /// Rating; zero permitted for unrated players.
    pub rating: i32,
    /// Whether the player is unrated.
    pub is_unrated: bool,
    /// Rating system of the section; `"none"` marks an unrated section.
    pub use_rating: String,
    /// Rated games played before this tournament.
    pub provisional: i16,
    /// Deterministic tiebreaker; must be unique across the section.
    pub rand: f64,

    /// Designated house player who should absorb an odd-player bye.
    pub bye_house: bool,
    /// Bye requested for this round.
    pub bye_request: bool,
    /// Total unplayed games over all rounds, past and committed.
    pub unplayed_count: i16,
    /// Half byes and forfeit wins over all rounds, taken or committed.
    pub half_bye_count: i16,
    /// All rounds with requested byes, past and future.
    pub bye_rounds: SmallVec<[i16; 4]>,

    /// Derived color preference for this round.
    pub due_color: DueColor,
    /// One mark per prior round.
    pub color_history: SmallVec<[ColorMark; 8]>,
    /// Color of the top player on the top board in round one.
    pub first_color: Color,
    /// Games per round against the same opponent; usually one.
    pub multiround: i16,

    /// Locked by a manual pairing; the board may still be renumbered.
    pub paired: bool,
    /// Output warn-code letters.
    pub warn_codes: String,
    /// Position in the canonical roster.
    pub rank: usize,
    /// Roster positions of `teammates` still present in the section.
    pub teammate_ranks: SmallVec<[usize; 4]>,
    /// Roster positions of `opponents` still present in the section.
    pub opponent_ranks: SmallVec<[usize; 8]>,
}

impl Player {
    /// Creates a player with the given identity and neutral defaults.
    pub fn new(play_id: i32, rating: i32, rand: f64) -> Self {
        Self {
            play_id,
            reentry: 0,
            name: String::new(),
            tournament_type: TournamentType::Swiss,
            round: 1,
            board_num: -1,
            board_color: None,
            team_id: 0,
            teammates: SmallVec::new(),
            opponents: SmallVec::new(),
            played_colors: SmallVec::new(),
            score: 0.0,
            rating,
            is_unrated: false,
            use_rating: String::from("uscf"),
            provisional: 0,
            rand,
            bye_house: false,
            bye_request: false,
            unplayed_count: 0,
            half_bye_count: 0,
            bye_rounds: SmallVec::new(),
            due_color: DueColor::None,
            color_history: SmallVec::new(),
            first_color: Color::White,
            multiround: 1,
            paired: false,
            warn_codes: String::new(),
            rank: 0,
            teammate_ranks: SmallVec::new(),
            opponent_ranks: SmallVec::new(),
        }
    }

    /// Creates the synthetic bye opponent, copying the round bookkeeping
    /// from a real player in the same section.
    pub fn bye_sentinel(round: i16, multiround: i16) -> Self {
        let mut bye = Player::new(BYE_ID, 0, f64::INFINITY);
        bye.round = round;
        bye.multiround = multiround;
        bye
    }

    /// Whether this is the synthetic bye opponent.
    #[inline]
    pub fn is_bye(&self) -> bool {
        self.play_id == BYE_ID
    }

    /// The external identity of this entry.
    #[inline]
    pub fn key(&self) -> OpponentKey {
        OpponentKey::new(self.play_id, self.reentry)
    }

    /// Whether the player counts as unrated for pairing purposes. In an
    /// unrated section nobody does.
    #[inline]
    pub fn counts_unrated(&self) -> bool {
        self.is_unrated && self.use_rating != "none"
    }

    /// The canonical total order over players:
    /// `(is_bye, bye_request, paired, -score, -rating, rand, play_id,
    /// reentry)`. Bye sentinels sort last; players wanting a pairing sort
    /// first.
    pub fn canonical_cmp(&self, other: &Player) -> Ordering {
        debug_assert!(
            self.rand != other.rand
                || self.is_bye()
                || other.is_bye()
                || self.key() == other.key(),
            "called `Player::canonical_cmp` with duplicate rand {} for players {} and {}",
            self.rand,
            self.key(),
            other.key()
        );
        self.is_bye()
            .cmp(&other.is_bye())
            .then(self.bye_request.cmp(&other.bye_request))
            .then(self.paired.cmp(&other.paired))
            .then(other.score.total_cmp(&self.score))
            .then(other.rating.cmp(&self.rating))
            .then(self.rand.total_cmp(&other.rand))
            .then(self.play_id.cmp(&other.play_id))
            .then(self.reentry.cmp(&other.reentry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_key_string_round_trip() {
        let key = OpponentKey::new(4821, 1);
        assert_eq!(key.to_string(), "4821_1");
        assert_eq!("4821_1".parse::<OpponentKey>().unwrap(), key);
        assert!("4821".parse::<OpponentKey>().is_err());
        assert!("a_b".parse::<OpponentKey>().is_err());
    }

    #[test]
    fn test_canonical_order_score_before_rating() {
        let mut a = Player::new(1, 1200, 0.1);
        a.score = 2.0;
        let mut b = Player::new(2, 2000, 0.2);
        b.score = 1.5;
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_canonical_order_rating_breaks_equal_scores() {
        let a = Player::new(1, 1800, 0.1);
        let b = Player::new(2, 1500, 0.2);
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);
        assert_eq!(b.canonical_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn test_canonical_order_rand_breaks_equal_ratings() {
        let a = Player::new(1, 1500, 0.7);
        let b = Player::new(2, 1500, 0.3);
        assert_eq!(b.canonical_cmp(&a), Ordering::Less);
    }

    #[test]
    fn test_bye_sentinel_sorts_last() {
        let bye = Player::bye_sentinel(3, 1);
        let mut player = Player::new(9, 0, 0.5);
        player.bye_request = true;
        player.paired = true;
        assert_eq!(player.canonical_cmp(&bye), Ordering::Less);
        assert!(bye.is_bye());
    }

    #[test]
    fn test_bye_requests_sort_after_active_players() {
        let mut requesting = Player::new(1, 2200, 0.1);
        requesting.bye_request = true;
        let active = Player::new(2, 100, 0.2);
        assert_eq!(active.canonical_cmp(&requesting), Ordering::Less);
    }

    #[test]
    fn test_counts_unrated_respects_unrated_section() {
        let mut p = Player::new(1, 0, 0.1);
        p.is_unrated = true;
        assert!(p.counts_unrated());
        p.use_rating = String::from("none");
        assert!(!p.counts_unrated());
    }
}
