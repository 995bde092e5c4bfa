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

//! Per-score-group rating scans used by the interchange and transposition
//! checks. All three scan a window of the pairing vector; the median falls
//! back from the score group to every pairable player when the group has no
//! complete boards.

use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

/// The median rating of the score group, taking the lower of the two middle
/// values for even sizes. Falls back to the median over all non-bye players
/// without bye requests, then to zero.
pub fn median_rating(
    roster: &Roster,
    pair: &PairVector,
    score: f32,
    p_begin: usize,
    p_end: usize,
) -> i32 {
    debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
    debug_assert!(p_begin < p_end && p_end <= pair.len());
    let mut group: Vec<i32> = Vec::new();
    let mut everyone: Vec<i32> = Vec::new();
    for x in (p_begin..p_end).step_by(2) {
        let px = roster.player(pair[x]);
        let py = roster.player(pair[x + 1]);
        if px.score == score && py.score == score && !px.is_bye() && !py.is_bye() {
            group.push(px.rating);
            group.push(py.rating);
        }
        if !px.is_bye() && !px.bye_request {
            everyone.push(px.rating);
        }
        if !py.is_bye() && !py.bye_request {
            everyone.push(py.rating);
        }
    }
    for candidates in [group, everyone] {
        if candidates.is_empty() {
            continue;
        }
        let mut candidates = candidates;
        candidates.sort_unstable();
        let mid = candidates.len() / 2;
        return if candidates.len() % 2 == 1 {
            candidates[mid]
        } else {
            candidates[mid].min(candidates[mid - 1])
        };
    }
    0
}

/// The lowest rating any rated player in the score group holds; an unrated
/// player counts as that rating during interchange checks. Zero when the
/// group has no rated players.
pub fn unrated_rating(
    roster: &Roster,
    pair: &PairVector,
    score: f32,
    p_begin: usize,
    p_end: usize,
) -> i32 {
    debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
    debug_assert!(p_begin < p_end && p_end <= pair.len());
    let mut rating: Option<i32> = None;
    for x in p_begin..p_end {
        let px = roster.player(pair[x]);
        if !px.is_bye()
            && !px.bye_request
            && px.score == score
            && (!px.is_unrated || px.use_rating == "none")
            && rating.map_or(true, |r| px.rating < r)
        {
            rating = Some(px.rating);
        }
    }
    rating.unwrap_or(0)
}

/// The highest rating in the score group; zero for an empty group.
pub fn highest_rating(
    roster: &Roster,
    pair: &PairVector,
    score: f32,
    p_begin: usize,
    p_end: usize,
) -> i32 {
    debug_assert!(p_begin % 2 == 0 && p_end % 2 == 0);
    debug_assert!(p_begin < p_end && p_end <= pair.len());
    let mut rating = 0;
    for x in p_begin..p_end {
        let px = roster.player(pair[x]);
        if !px.is_bye() && !px.bye_request && px.score == score && px.rating > rating {
            rating = px.rating;
        }
    }
    rating
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallchart_model::index::PlayerIndex;
    use wallchart_model::player::Player;

    fn setup(ratings: &[i32]) -> (Roster, PairVector) {
        let players: Vec<Player> = ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| Player::new(i as i32 + 1, r, 0.01 * (i as f64 + 1.0)))
            .collect();
        let roster = Roster::canonicalize(players).unwrap();
        let pair: PairVector = (0..roster.len() - roster.len() % 2)
            .map(PlayerIndex::new)
            .collect();
        (roster, pair)
    }

    #[test]
    fn test_median_of_even_group_takes_lower_middle() {
        let (roster, pair) = setup(&[2000, 1800, 1600, 1400]);
        assert_eq!(median_rating(&roster, &pair, 0.0, 0, 4), 1600);
    }

    #[test]
    fn test_median_falls_back_past_incomplete_groups() {
        // Three players: the odd one pairs the bye, so no board has two
        // same-score non-bye players in the 2.0 group.
        let (roster, pair) = setup(&[2000, 1800, 1600]);
        assert_eq!(median_rating(&roster, &pair, 2.0, 0, 4), 1800);
    }

    #[test]
    fn test_unrated_rating_is_lowest_rated_player() {
        let (mut roster, pair) = setup(&[2000, 1800, 1600, 1400]);
        roster.players_mut()[3].is_unrated = true;
        assert_eq!(unrated_rating(&roster, &pair, 0.0, 0, 4), 1600);
    }

    #[test]
    fn test_highest_rating_scans_score_group() {
        let (roster, pair) = setup(&[2000, 1800, 1600, 1400]);
        assert_eq!(highest_rating(&roster, &pair, 0.0, 0, 4), 2000);
        assert_eq!(highest_rating(&roster, &pair, 1.0, 0, 4), 0);
    }
}
