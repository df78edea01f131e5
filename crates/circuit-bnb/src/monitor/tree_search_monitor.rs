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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. Callbacks track the solver lifecycle, and a
//! monitor can influence execution via `SearchCommand` (default: Continue).
//!
//! Lifecycle highlights
//! - enter → {step → command → prune | branch | solution}* → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Design notes
//! - Methods take `&mut self`; monitors are assumed single-threaded.
//! - Keep callbacks lightweight; avoid blocking I/O in hot paths.

use crate::{node::PartialSolution, pivot::Pivot, stats::BnbSolverStatistics};
use circuit_core::num::SolverNumeric;
use circuit_model::{matrix::DistanceMatrix, tour::Tour};

/// Reasons for discarding a search node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PruneReason {
    /// No tour satisfies the node's constraints.
    Infeasible,
    /// The node's lower bound cannot beat the incumbent.
    BoundDominated,
    /// The node has no undecided zero cell to branch on.
    NoPivot,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::NoPivot => write!(f, "NoPivot"),
        }
    }
}

/// Command returned by a monitor to control the search process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    /// Keep searching.
    #[default]
    Continue,
    /// Stop the search; the string explains why.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, matrix: &DistanceMatrix<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>);
    /// Called after a node is taken from the queue to determine the next
    /// action of the search.
    fn search_command(
        &mut self,
        _node: &PartialSolution<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every node taken from the queue.
    fn on_step(&mut self, node: &PartialSolution<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when a node or a freshly derived child is discarded.
    fn on_prune(
        &mut self,
        node: &PartialSolution<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when a node is split on `pivot`.
    fn on_branch(
        &mut self,
        node: &PartialSolution<T>,
        pivot: Pivot<T>,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when a new best tour is found.
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>);
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: SolverNumeric,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, matrix: &DistanceMatrix<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_enter_search(matrix, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        node: &PartialSolution<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        (**self).search_command(node, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, node: &PartialSolution<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_step(node, statistics)
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        node: &PartialSolution<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_prune(node, reason, statistics)
    }

    #[inline(always)]
    fn on_branch(
        &mut self,
        node: &PartialSolution<T>,
        pivot: Pivot<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_branch(node, pivot, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_solution_found(tour, statistics)
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
