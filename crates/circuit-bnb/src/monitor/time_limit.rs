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

use crate::{
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::PartialSolution,
    pivot::Pivot,
    stats::BnbSolverStatistics,
};
use circuit_core::num::{SolverNumeric, ops::SaturatingAddVal};
use circuit_model::{matrix::DistanceMatrix, tour::Tour};
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` nodes to minimize overhead.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor<T> {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Creates a new `TimeLimitMonitor` with the specified duration and check interval.
    /// `check_interval` is the number of nodes between two clock reads; a
    /// higher value lowers overhead but may overshoot the limit slightly.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new `TimeLimitMonitor` that reads the clock every 256 nodes.
    ///
    /// Nodes of Little's search carry a full matrix each, so they are far
    /// slower than a plain tree step and a small interval is enough.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 256)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &DistanceMatrix<T>, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _node: &PartialSolution<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add_val(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() > self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {:.3} seconds exceeded",
                    self.time_limit.as_secs_f64()
                ));
            }
        }

        SearchCommand::Continue
    }

    fn on_step(&mut self, _node: &PartialSolution<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_prune(
        &mut self,
        _node: &PartialSolution<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_branch(
        &mut self,
        _node: &PartialSolution<T>,
        _pivot: Pivot<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_solution_found(&mut self, _tour: &Tour<T>, _statistics: &BnbSolverStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> (DistanceMatrix<i64>, PartialSolution<i64>) {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1, 2], [1, 0, 3], [2, 3, 0]]);
        let root = PartialSolution::root(&matrix);
        (matrix, root)
    }

    #[test]
    fn test_expired_limit_terminates_on_check() {
        let (matrix, node) = root();
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::ZERO, 3);
        monitor.on_enter_search(&matrix, &stats);
        std::thread::sleep(Duration::from_millis(2));

        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        assert!(matches!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_limit_continues() {
        let (matrix, node) = root();
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::from_secs(3600), 1);
        monitor.on_enter_search(&matrix, &stats);
        for _ in 0..10 {
            assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        }
    }

    #[test]
    fn test_inactive_outside_search() {
        let (_, node) = root();
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::ZERO, 1);
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
    }
}
