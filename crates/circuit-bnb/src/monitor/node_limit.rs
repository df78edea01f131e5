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
use circuit_core::num::SolverNumeric;
use circuit_model::{matrix::DistanceMatrix, tour::Tour};
use std::marker::PhantomData;

/// Terminates the search once `limit` nodes have been taken from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor<T> {
    limit: u64,
    _marker: PhantomData<T>,
}

impl<T> NodeLimitMonitor<T> {
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<T> TreeSearchMonitor<T> for NodeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &DistanceMatrix<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(
        &mut self,
        _node: &PartialSolution<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if statistics.nodes_explored > self.limit {
            return SearchCommand::Terminate(format!("Node limit of {} reached", self.limit));
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

    #[test]
    fn test_terminates_past_limit() {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1], [1, 0]]);
        let node = PartialSolution::root(&matrix);
        let mut monitor = NodeLimitMonitor::<i64>::new(2);
        let mut stats = BnbSolverStatistics::default();

        stats.nodes_explored = 2;
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        stats.nodes_explored = 3;
        assert_eq!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate("Node limit of 2 reached".to_string())
        );
    }
}
