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

//! Incumbent bookkeeping for branch-and-bound
//!
//! `Incumbent<T>` holds the best known upper bound and the tour that
//! achieved it. The bound may start below infinity when the caller already
//! knows a tour (warm start); in that case `tour()` stays `None` until the
//! search finds something strictly cheaper.

use circuit_core::num::SolverNumeric;
use circuit_model::tour::Tour;

/// The best known tour of a search session.
#[derive(Debug, Clone)]
pub(crate) struct Incumbent<T>
where
    T: SolverNumeric,
{
    upper_bound: T,
    tour: Option<Tour<T>>,
}

impl<T> Incumbent<T>
where
    T: SolverNumeric,
{
    /// Creates an empty incumbent with an infinite upper bound.
    #[inline]
    pub fn new() -> Self {
        Self::with_upper_bound(T::INFINITY)
    }

    /// Creates an empty incumbent that only accepts tours strictly cheaper
    /// than `upper_bound`.
    #[inline]
    pub fn with_upper_bound(upper_bound: T) -> Self {
        Self {
            upper_bound,
            tour: None,
        }
    }

    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        self.tour.as_ref()
    }

    /// Returns `true` if a tour of cost `cost` would improve the incumbent.
    #[inline]
    pub fn improves(&self, cost: T) -> bool {
        cost < self.upper_bound
    }

    /// Returns `true` if a node with `lower_bound` cannot contain an
    /// improving tour.
    #[inline]
    pub fn dominates(&self, lower_bound: T) -> bool {
        lower_bound >= self.upper_bound
    }

    /// Installs `tour` if it improves the incumbent. Returns the installed
    /// tour.
    #[inline]
    pub fn try_install(&mut self, tour: Tour<T>) -> Option<&Tour<T>> {
        if !self.improves(tour.cost()) {
            return None;
        }
        self.upper_bound = tour.cost();
        self.tour = Some(tour);
        self.tour.as_ref()
    }

    #[inline]
    pub fn into_tour(self) -> Option<Tour<T>> {
        self.tour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::index::NodeIndex;

    type IntegerType = i64;

    fn tour(cost: IntegerType) -> Tour<IntegerType> {
        Tour::new(cost, [0, 1, 2].map(NodeIndex::new).to_vec())
    }

    #[test]
    fn test_new_incumbent_is_unbounded() {
        let inc = Incumbent::<IntegerType>::new();
        assert_eq!(inc.upper_bound(), IntegerType::MAX);
        assert!(inc.tour().is_none());
        assert!(inc.improves(IntegerType::MAX - 1));
        assert!(!inc.dominates(1_000_000));
    }

    #[test]
    fn test_install_only_strict_improvements() {
        let mut inc = Incumbent::new();
        assert!(inc.try_install(tour(50)).is_some());
        assert_eq!(inc.upper_bound(), 50);
        assert!(inc.try_install(tour(50)).is_none());
        assert!(inc.try_install(tour(70)).is_none());
        assert!(inc.try_install(tour(42)).is_some());
        assert_eq!(inc.into_tour().map(|t| t.cost()), Some(42));
    }

    #[test]
    fn test_warm_start_bound_prunes_without_tour() {
        let mut inc = Incumbent::with_upper_bound(30);
        assert!(inc.dominates(30));
        assert!(!inc.dominates(29));
        assert!(inc.try_install(tour(30)).is_none());
        assert!(inc.tour().is_none());
        assert!(inc.try_install(tour(29)).is_some());
    }
}
