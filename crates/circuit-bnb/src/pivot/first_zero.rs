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

//! First-zero pivot rule.
//!
//! Branches on the first undecided zero cell in row-major order. The bound
//! is unaffected by the choice of pivot, so the search stays exact; only
//! the size of the tree changes. The reported regret is still computed for
//! the chosen cell so monitors see comparable numbers.

use crate::{
    node::PartialSolution,
    pivot::{Pivot, PivotRule},
    reduction::Axis,
};
use circuit_core::num::SolverNumeric;
use circuit_model::index::NodeIndex;

/// Picks the first undecided zero cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstZeroPivotRule;

impl FirstZeroPivotRule {
    /// Creates a new `FirstZeroPivotRule`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> PivotRule<T> for FirstZeroPivotRule
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "FirstZeroPivotRule"
    }

    fn select(&mut self, node: &PartialSolution<T>) -> Option<Pivot<T>> {
        let n = node.num_nodes();
        let (i, j) = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .find(|&(i, j)| node.is_candidate(i, j))?;

        let reduced = node.reduced();
        let regret = reduced
            .line_minima(Axis::Row, i)
            .excluding(j)
            .saturating_add_val(reduced.line_minima(Axis::Column, j).excluding(i));
        Some(Pivot::new(NodeIndex::new(i), NodeIndex::new(j), regret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::matrix::DistanceMatrix;

    #[test]
    fn test_picks_first_zero_in_row_major_order() {
        let matrix = DistanceMatrix::from_rows(&[
            [0i64, 10, 15, 20],
            [5, 0, 9, 10],
            [6, 13, 0, 12],
            [8, 8, 9, 0],
        ]);
        let root = PartialSolution::root(&matrix);
        let pivot = FirstZeroPivotRule::new().select(&root).expect("pivot");
        // row 0 reduces to [inf, 0, 4, 5]
        assert_eq!((pivot.from().get(), pivot.to().get()), (0, 1));
        assert_eq!(pivot.regret(), 4);
    }

    #[test]
    fn test_skips_decided_zeros() {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1, 1], [1, 0, 1], [1, 1, 0]]);
        let root = PartialSolution::root(&matrix);
        let child = root.without_edge(NodeIndex::new(0), NodeIndex::new(1));
        let pivot = FirstZeroPivotRule.select(&child).expect("pivot");
        assert_eq!((pivot.from().get(), pivot.to().get()), (0, 2));
    }
}
