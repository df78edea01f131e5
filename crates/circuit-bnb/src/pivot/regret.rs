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

//! Little's regret rule.
//!
//! Excluding an edge `i -> j` with reduced cost zero forces the tour to
//! leave `i` and enter `j` some other way; the reduction of row `i` and
//! column `j` then raises the bound by at least
//!
//! ```text
//! regret(i, j) = min_{k != j} R[i][k] + min_{k != i} R[k][j]
//! ```
//!
//! Branching on the zero with the largest regret makes the "exclude" child
//! as expensive as possible, which is what lets it be pruned early. The row
//! and column minima are computed once per node (smallest and second
//! smallest per line), so a selection costs `O(n^2)`.

use crate::{
    node::PartialSolution,
    pivot::{Pivot, PivotRule},
    reduction::{Axis, LineMinima},
};
use circuit_core::num::SolverNumeric;
use circuit_model::index::NodeIndex;

/// The regret pivot rule.
///
/// Ties keep the first maximum in row-major order. The running best starts
/// empty rather than at zero, so a node whose only candidates have regret
/// `0` still gets a pivot.
#[derive(Debug, Clone, Default)]
pub struct RegretPivotRule<T> {
    row_minima: Vec<LineMinima<T>>,
    column_minima: Vec<LineMinima<T>>,
}

impl<T> RegretPivotRule<T> {
    /// Creates a new `RegretPivotRule`.
    #[inline]
    pub fn new() -> Self {
        Self {
            row_minima: Vec::new(),
            column_minima: Vec::new(),
        }
    }

    /// Creates a new `RegretPivotRule` with scratch space for `num_nodes`.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            row_minima: Vec::with_capacity(num_nodes),
            column_minima: Vec::with_capacity(num_nodes),
        }
    }
}

impl<T> PivotRule<T> for RegretPivotRule<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "RegretPivotRule"
    }

    fn select(&mut self, node: &PartialSolution<T>) -> Option<Pivot<T>> {
        let n = node.num_nodes();
        let reduced = node.reduced();

        self.row_minima.clear();
        self.column_minima.clear();
        self.row_minima
            .extend((0..n).map(|i| reduced.line_minima(Axis::Row, i)));
        self.column_minima
            .extend((0..n).map(|j| reduced.line_minima(Axis::Column, j)));

        let mut best: Option<Pivot<T>> = None;
        for i in 0..n {
            for j in 0..n {
                if !node.is_candidate(i, j) {
                    continue;
                }

                let regret = self.row_minima[i]
                    .excluding(j)
                    .saturating_add_val(self.column_minima[j].excluding(i));

                if best.is_none_or(|b| regret > b.regret()) {
                    best = Some(Pivot::new(NodeIndex::new(i), NodeIndex::new(j), regret));
                }
            }
        }
        best
    }
}
