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

//! Best-first branch-and-bound solver for the directed TSP.
//!
//! This module implements the search engine of Little's algorithm. The
//! `BnbSolver` owns the reusable work queue; every call to one of the
//! `solve*` methods opens a search session that holds the per-run state
//! (incumbent, statistics, timing) and drives the loop until the queue
//! empties or a monitor asks it to stop.
//!
//! Each step takes the node with the smallest lower bound. Complete nodes
//! become the new incumbent when they are strictly cheaper; other nodes are
//! dropped when infeasible or dominated, and are otherwise split on the edge
//! chosen by the `PivotRule` into a "with edge" and a "without edge" child.
//! Children that are infeasible or cannot beat the incumbent never enter the
//! queue. Because bounds are admissible and ties are broken by insertion
//! order, the last tour reported is optimal and every run is reproducible.

use crate::{
    incumbent::Incumbent,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::PartialSolution,
    pivot::{PivotRule, regret::RegretPivotRule},
    queue::SearchQueue,
    result::{BnbSolverOutcome, TerminationReason},
    stats::BnbSolverStatistics,
};
use circuit_core::num::SolverNumeric;
use circuit_model::matrix::DistanceMatrix;

/// An exact solver for the directed travelling salesman problem.
///
/// The solver itself only holds the work queue so that repeated solves can
/// reuse its allocation. Which edge to branch on is decided by a
/// `PivotRule`, observation and early termination by a `TreeSearchMonitor`.
pub struct BnbSolver<T>
where
    T: SolverNumeric,
{
    queue: SearchQueue<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSolver").field("queue", &self.queue).finish()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    /// Create a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            queue: SearchQueue::new(),
        }
    }

    /// Create a new solver instance whose queue can hold `capacity` nodes
    /// before reallocating.
    ///
    /// # Note
    ///
    /// This only moves the cost of the allocation to the construction of
    /// the solver. The queue still grows as needed during the search.
    #[inline]
    pub fn preallocated(capacity: usize) -> Self {
        Self {
            queue: SearchQueue::with_capacity(capacity),
        }
    }

    /// Solve `matrix` with the default `RegretPivotRule`.
    #[inline]
    pub fn solve<S>(&mut self, matrix: &DistanceMatrix<T>, monitor: S) -> BnbSolverOutcome<T>
    where
        S: TreeSearchMonitor<T>,
    {
        let mut rule = RegretPivotRule::preallocated(matrix.num_nodes());
        self.solve_internal(matrix, &mut rule, monitor, Incumbent::new())
    }

    /// Solve `matrix` branching on the edges chosen by `rule`.
    #[inline]
    pub fn solve_with_rule<R, S>(
        &mut self,
        matrix: &DistanceMatrix<T>,
        rule: &mut R,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        R: PivotRule<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(matrix, rule, monitor, Incumbent::new())
    }

    /// Solve `matrix` knowing that a tour of cost `upper_bound` exists.
    ///
    /// Nodes are pruned against `upper_bound` from the start, and only tours
    /// strictly cheaper than it are reported. If the search proves that no
    /// such tour exists, the outcome is `Infeasible`.
    #[inline]
    pub fn solve_with_upper_bound<R, S>(
        &mut self,
        matrix: &DistanceMatrix<T>,
        rule: &mut R,
        monitor: S,
        upper_bound: T,
    ) -> BnbSolverOutcome<T>
    where
        R: PivotRule<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(matrix, rule, monitor, Incumbent::with_upper_bound(upper_bound))
    }

    #[inline(always)]
    fn solve_internal<R, S>(
        &mut self,
        matrix: &DistanceMatrix<T>,
        rule: &mut R,
        mut monitor: S,
        incumbent: Incumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        R: PivotRule<T>,
        S: TreeSearchMonitor<T>,
    {
        let session = BnbSolverSearchSession::new(self, matrix, rule, &mut monitor, incumbent);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Drops all pending nodes while keeping the queue's allocation.
    #[inline]
    fn reset(&mut self) {
        self.queue.reset();
    }
}

/// A search session for the branch-and-bound solver.
/// This struct encapsulates the state and logic
/// of a single search run.
struct BnbSolverSearchSession<'a, T, R, S>
where
    T: SolverNumeric,
{
    solver: &'a mut BnbSolver<T>,
    matrix: &'a DistanceMatrix<T>,
    rule: &'a mut R,
    monitor: &'a mut S,
    incumbent: Incumbent<T>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, R, S> std::fmt::Debug for BnbSolverSearchSession<'a, T, R, S>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("matrix", &self.matrix)
            .field("incumbent", &self.incumbent)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, R, S> BnbSolverSearchSession<'a, T, R, S>
where
    T: SolverNumeric,
    R: PivotRule<T>,
    S: TreeSearchMonitor<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        matrix: &'a DistanceMatrix<T>,
        rule: &'a mut R,
        monitor: &'a mut S,
        incumbent: Incumbent<T>,
    ) -> Self {
        Self {
            solver,
            matrix,
            rule,
            monitor,
            incumbent,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Run the search session.
    fn run(mut self) -> BnbSolverOutcome<T> {
        let root = PartialSolution::root(self.matrix);
        self.stats.set_root_lower_bound(root.lower_bound());
        self.monitor.on_enter_search(self.matrix, &self.stats);

        self.solver.queue.push(root);
        self.stats.on_queue_len(self.solver.queue.len());

        let termination_reason = loop {
            let Some(node) = self.solver.queue.pop() else {
                break if self.incumbent.tour().is_some() {
                    TerminationReason::OptimalityProven
                } else {
                    TerminationReason::InfeasibilityProven
                };
            };

            self.stats.on_node_explored();
            self.monitor.on_step(&node, &self.stats);

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&node, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            if node.is_complete() {
                self.handle_complete_solution(&node);
            } else if node.is_infeasible() {
                self.prune(&node, PruneReason::Infeasible);
            } else if self.incumbent.dominates(node.lower_bound()) {
                self.prune(&node, PruneReason::BoundDominated);
            } else {
                self.expand(&node);
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Finalize the solver result based on the best tour found
    /// and the termination reason.
    ///
    /// # Note
    ///
    /// This consumes self.
    #[inline]
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        let tour = self.incumbent.into_tour();
        match (reason, tour) {
            (TerminationReason::OptimalityProven, Some(tour)) => {
                BnbSolverOutcome::optimal(tour, self.stats)
            }
            (TerminationReason::Aborted(msg), tour) => {
                BnbSolverOutcome::aborted(tour, msg, self.stats)
            }
            _ => BnbSolverOutcome::infeasible(self.stats),
        }
    }

    /// Install the tour of a complete node if it beats the incumbent.
    #[inline(always)]
    fn handle_complete_solution(&mut self, node: &PartialSolution<T>) {
        if !self.incumbent.improves(node.cost()) {
            self.prune(node, PruneReason::BoundDominated);
            return;
        }

        match node.to_tour() {
            Ok(tour) => {
                self.stats.on_solution_found();
                if let Some(installed) = self.incumbent.try_install(tour) {
                    self.monitor.on_solution_found(installed, &self.stats);
                }
            }
            Err(_) => self.prune(node, PruneReason::Infeasible),
        }
    }

    /// Split `node` on its pivot edge and queue the surviving children.
    #[inline(always)]
    fn expand(&mut self, node: &PartialSolution<T>) {
        let Some(pivot) = self.rule.select(node) else {
            self.prune(node, PruneReason::NoPivot);
            return;
        };

        self.stats.on_node_expanded();
        self.monitor.on_branch(node, pivot, &self.stats);

        let with = node.with_edge(self.matrix, pivot.from(), pivot.to());
        self.push_child(with);
        let without = node.without_edge(pivot.from(), pivot.to());
        self.push_child(without);

        self.stats.on_queue_len(self.solver.queue.len());
    }

    #[inline(always)]
    fn push_child(&mut self, child: PartialSolution<T>) {
        self.stats.on_child_generated();
        if child.is_infeasible() {
            self.prune(&child, PruneReason::Infeasible);
        } else if self.incumbent.dominates(child.lower_bound()) {
            self.prune(&child, PruneReason::BoundDominated);
        } else {
            self.solver.queue.push(child);
        }
    }

    #[inline(always)]
    fn prune(&mut self, node: &PartialSolution<T>, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
            PruneReason::NoPivot => self.stats.on_pruning_no_pivot(),
        }
        self.monitor.on_prune(node, reason, &self.stats);
    }
}
