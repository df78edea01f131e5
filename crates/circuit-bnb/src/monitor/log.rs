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

//! Periodic progress reporting
//!
//! `LogTreeSearchMonitor` writes a table of search progress through the
//! `log` facade at `info` level. The clock is only read on nodes whose
//! explored count matches `clock_check_mask`, so the hot loop stays cheap.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::PartialSolution,
    pivot::Pivot,
    stats::BnbSolverStatistics,
};
use ::log::info;
use circuit_core::num::SolverNumeric;
use circuit_model::{matrix::DistanceMatrix, tour::Tour};
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 86;

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_cost: None,
        }
    }

    /// Returns the cost of the best tour reported so far.
    #[inline]
    pub fn best_cost(&self) -> Option<T> {
        self.best_cost
    }

    #[inline(always)]
    fn log_header(&self) {
        info!(
            "{:<9} | {:<12} | {:<7} | {:<12} | {:<12} | {:<9} | {:<9}",
            "Elapsed", "Nodes", "Forced", "Best Tour", "Lower Bound", "Queue", "Pruned"
        );
        info!("{}", "-".repeat(RULE_WIDTH));
    }

    #[inline(always)]
    fn log_line(&mut self, node: &PartialSolution<T>, stats: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best = match self.best_cost {
            Some(cost) => cost.to_string(),
            None => "Inf".to_string(),
        };

        info!(
            "{:<9} | {:<12} | {:<7} | {:<12} | {:<12} | {:<9} | {:<9}",
            format!("{:.1}s", elapsed),
            stats.nodes_explored,
            node.num_forced(),
            best,
            node.lower_bound(),
            stats.max_queue_len,
            stats.prunings_total()
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, matrix: &DistanceMatrix<T>, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = None;
        info!(
            "Solving {} nodes, brute force would examine {} tours",
            matrix.num_nodes(),
            matrix.complexity()
        );
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        info!("{}", "-".repeat(RULE_WIDTH));
        info!(
            "Search finished after {} nodes in {:.3}s.",
            statistics.nodes_explored,
            self.start_time.elapsed().as_secs_f64()
        );
    }

    fn on_step(&mut self, node: &PartialSolution<T>, statistics: &BnbSolverStatistics<T>) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, statistics);
        }
    }

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

    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        self.best_cost = Some(tour.cost());
        info!(
            "New best tour with cost {} after {} nodes",
            tour.cost(),
            statistics.nodes_explored
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::index::NodeIndex;

    #[test]
    fn test_tracks_best_cost_and_resets_on_enter() {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 3], [4, 0]]);
        let stats = BnbSolverStatistics::default();
        let mut monitor = LogTreeSearchMonitor::<i64>::default();

        monitor.on_enter_search(&matrix, &stats);
        assert_eq!(monitor.best_cost(), None);

        let tour = Tour::new(7i64, vec![NodeIndex::new(0), NodeIndex::new(1)]);
        monitor.on_solution_found(&tour, &stats);
        assert_eq!(monitor.best_cost(), Some(7));

        monitor.on_enter_search(&matrix, &stats);
        assert_eq!(monitor.best_cost(), None);
    }

    #[test]
    fn test_display_shows_configuration() {
        let monitor = LogTreeSearchMonitor::<i64>::new(Duration::from_secs(2), 1023);
        assert_eq!(
            monitor.to_string(),
            "LogTreeSearchMonitor(log_interval: 2s, clock_check_mask: 1023)"
        );
    }
}
