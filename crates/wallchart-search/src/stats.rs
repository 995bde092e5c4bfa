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

//! Statistics reporting for pairing search runs.
//!
//! Tracks cost evaluations and per-move-class tried/accepted counts with
//! saturating updates, cheap enough for the inner loop. The acceptance
//! profile shows which move classes actually earn their keep on a given
//! section shape.

use crate::moves::Move;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Number of cost evaluations performed.
    pub cost_evaluations: u64,

    /// Moves attempted, by move class.
    pub moves_tried: [u64; Move::COUNT],

    /// Moves accepted (strict improvements), by move class.
    pub moves_accepted: [u64; Move::COUNT],

    /// Total time taken by the search.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for each cost evaluation.
    #[inline]
    pub fn on_cost_evaluation(&mut self) {
        self.cost_evaluations = self.cost_evaluations.saturating_add(1);
    }

    /// Called for each attempted move.
    #[inline]
    pub fn on_move_tried(&mut self, mv: Move) {
        let slot = &mut self.moves_tried[mv.index()];
        *slot = slot.saturating_add(1);
    }

    /// Called for each accepted move.
    #[inline]
    pub fn on_move_accepted(&mut self, mv: Move) {
        let slot = &mut self.moves_accepted[mv.index()];
        *slot = slot.saturating_add(1);
    }

    /// Sets the total time taken by the search.
    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Total moves attempted across all classes.
    #[inline]
    pub fn total_tried(&self) -> u64 {
        self.moves_tried.iter().fold(0, |a, &b| a.saturating_add(b))
    }

    /// Total moves accepted across all classes.
    #[inline]
    pub fn total_accepted(&self) -> u64 {
        self.moves_accepted
            .iter()
            .fold(0, |a, &b| a.saturating_add(b))
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wallchart Search Statistics:")?;
        writeln!(f, "   Cost Evaluations:  {}", self.cost_evaluations)?;
        writeln!(f, "   Moves Tried:       {}", self.total_tried())?;
        writeln!(f, "   Moves Accepted:    {}", self.total_accepted())?;
        for mv in Move::ALL {
            writeln!(
                f,
                "   {:<20} {} / {}",
                mv.name(),
                self.moves_accepted[mv.index()],
                self.moves_tried[mv.index()]
            )?;
        }
        writeln!(f, "   Total Time:        {:?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_per_move() {
        let mut stats = SearchStatistics::new();
        stats.on_move_tried(Move::Swap);
        stats.on_move_tried(Move::Swap);
        stats.on_move_tried(Move::RotateDown);
        stats.on_move_accepted(Move::Swap);
        assert_eq!(stats.moves_tried[Move::Swap.index()], 2);
        assert_eq!(stats.total_tried(), 3);
        assert_eq!(stats.total_accepted(), 1);
    }

    #[test]
    fn test_saturating_updates_do_not_wrap() {
        let mut stats = SearchStatistics::new();
        stats.cost_evaluations = u64::MAX;
        stats.on_cost_evaluation();
        assert_eq!(stats.cost_evaluations, u64::MAX);
    }
}
