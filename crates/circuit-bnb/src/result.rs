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

//! Solver outcomes.
//!
//! `BnbSolverOutcome<T>` pairs what the search produced (`SolverResult`) with
//! why it stopped (`TerminationReason`) and the statistics of the run. The
//! combinations the solver emits are:
//!
//! - `Optimal` + `OptimalityProven`: the queue emptied after a tour was found.
//! - `Infeasible` + `InfeasibilityProven`: the queue emptied without a tour
//!   (below the supplied upper bound, if any).
//! - `Feasible` + `Aborted`: a monitor stopped the search after a tour was found.
//! - `Unknown` + `Aborted`: a monitor stopped the search before any tour.

use crate::stats::BnbSolverStatistics;
use circuit_core::num::SolverNumeric;
use circuit_model::tour::Tour;

/// What the search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T>
where
    T: SolverNumeric,
{
    /// We have proven that no (improving) tour exists.
    Infeasible,
    /// We have found a tour and proven its optimality.
    Optimal(Tour<T>),
    /// We have found a tour, but not proven its optimality.
    Feasible(Tour<T>),
    /// The solver terminated without finding a tour and
    /// without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: SolverNumeric,
{
    /// Returns the tour, if one was found.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        match self {
            SolverResult::Optimal(tour) | SolverResult::Feasible(tour) => Some(tour),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(tour) => write!(f, "Optimal(cost={})", tour.cost()),
            SolverResult::Feasible(tour) => write!(f, "Feasible(cost={})", tour.cost()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a tour.
    OptimalityProven,
    /// The solver proved that no (improving) tour exists.
    InfeasibilityProven,
    /// The solver aborted due to a search limit (time, nodes, etc.).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn optimal(tour: Tour<T>, statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Optimal(tour),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(tour: Option<Tour<T>>, reason: R, statistics: BnbSolverStatistics<T>) -> Self
    where
        R: Into<String>,
    {
        let result = match tour {
            Some(tour) => SolverResult::Feasible(tour),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
        &self.statistics
    }

    /// Returns the best tour found, optimal or not.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        self.result.tour()
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_tour(&self) -> bool {
        self.tour().is_some()
    }

    /// Consumes the outcome and returns its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, BnbSolverStatistics<T>) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.result, self.termination_reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::index::NodeIndex;

    type I = i64;

    fn stats() -> BnbSolverStatistics<I> {
        BnbSolverStatistics::default()
    }

    fn tour(cost: I) -> Tour<I> {
        Tour::new(cost, [0, 2, 1].map(NodeIndex::new).to_vec())
    }

    #[test]
    fn test_optimal_outcome() {
        let outcome = BnbSolverOutcome::optimal(tour(12), stats());
        assert!(outcome.is_optimal());
        assert!(outcome.has_tour());
        assert_eq!(outcome.tour().map(|t| t.cost()), Some(12));
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert_eq!(outcome.to_string(), "Optimal(cost=12) (Optimality Proven)");
    }

    #[test]
    fn test_aborted_with_tour_is_feasible() {
        let outcome = BnbSolverOutcome::aborted(Some(tour(40)), "node limit", stats());
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));
        match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "node limit"),
            _ => panic!("expected Aborted termination reason"),
        }
    }

    #[test]
    fn test_aborted_without_tour_is_unknown() {
        let outcome = BnbSolverOutcome::<I>::aborted::<&str>(None, "time limit", stats());
        assert!(matches!(outcome.result(), SolverResult::Unknown));
        assert!(!outcome.has_tour());
        assert!(!outcome.is_infeasible());
    }

    #[test]
    fn test_infeasible_outcome() {
        let outcome = BnbSolverOutcome::<I>::infeasible(stats());
        assert!(outcome.is_infeasible());
        let (result, reason, _) = outcome.into_parts();
        assert_eq!(result, SolverResult::Infeasible);
        assert_eq!(reason, TerminationReason::InfeasibilityProven);
    }
}
