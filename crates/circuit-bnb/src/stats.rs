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

use circuit_core::num::{constants::Zero, ops::SaturatingAddVal};
use std::time::Duration;

/// Statistics collected during the execution of the Circuit-BnB solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics<T> {
    /// Total nodes taken from the queue.
    pub nodes_explored: u64,
    /// Nodes that were split into two children.
    pub nodes_expanded: u64,
    /// Children derived from expanded nodes, pushed or not.
    pub children_generated: u64,
    /// Nodes or children dropped because no tour satisfies their constraints.
    pub prunings_infeasible: u64,
    /// Nodes or children dropped because their bound cannot beat the incumbent.
    pub prunings_bound: u64,
    /// Nodes dropped because no undecided zero cell was left to branch on.
    pub prunings_no_pivot: u64,
    /// Total improving tours found during the search.
    pub solutions_found: u64,
    /// The largest number of nodes waiting in the queue at once.
    pub max_queue_len: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
    /// The lower bound at the root node. Used to calculate the "Optimality Gap".
    pub root_lower_bound: T,
}

impl<T> Default for BnbSolverStatistics<T>
where
    T: Zero,
{
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            nodes_expanded: 0,
            children_generated: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            prunings_no_pivot: 0,
            solutions_found: 0,
            max_queue_len: 0,
            time_total: Duration::ZERO,
            root_lower_bound: T::ZERO,
        }
    }
}

impl<T> BnbSolverStatistics<T> {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add_val(1);
    }

    #[inline]
    pub fn on_child_generated(&mut self) {
        self.children_generated = self.children_generated.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add_val(1);
    }

    /// Records a pruning event caused by the incumbent bound, either when a
    /// node is popped or when a child is about to be pushed.
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_no_pivot(&mut self) {
        self.prunings_no_pivot = self.prunings_no_pivot.saturating_add_val(1);
    }

    #[inline]
    pub fn on_queue_len(&mut self, len: usize) {
        self.max_queue_len = self.max_queue_len.max(len as u64);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: T) {
        self.root_lower_bound = bound;
    }

    /// Returns the total number of prunings of any kind.
    #[inline]
    pub fn prunings_total(&self) -> u64 {
        self.prunings_infeasible
            .saturating_add_val(self.prunings_bound)
            .saturating_add_val(self.prunings_no_pivot)
    }
}

impl<T> std::fmt::Display for BnbSolverStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Circuit-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Nodes expanded:       {}", self.nodes_expanded)?;
        writeln!(f, "  Children generated:   {}", self.children_generated)?;
        writeln!(f, "  Max queue length:     {}", self.max_queue_len)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (no pivot):  {}", self.prunings_no_pivot)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
