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

//! Cost matrix reduction.
//!
//! `ReducedCostMatrix<T>` is a square table stored in one row-major buffer.
//! Reducing a line subtracts its smallest finite entry from every finite
//! entry of that line, leaving at least one zero behind. The subtracted
//! amount is a lower bound on the cost of the single edge the tour must use
//! in that line, so the sum over all reductions bounds the whole tour.
//!
//! Infinite cells are never touched; a line without any finite cell reports
//! `LineReduction::Forbidden` and contributes nothing. Whether such a line
//! makes a node infeasible depends on the constraint state and is decided
//! by the caller.

use circuit_core::num::SolverNumeric;

/// The direction of a line in the matrix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "Row"),
            Axis::Column => write!(f, "Column"),
        }
    }
}

/// Outcome of reducing a single line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineReduction<T> {
    /// The line had a finite minimum, which was subtracted.
    Reduced(T),
    /// Every cell of the line is infinite.
    Forbidden,
}

impl<T> LineReduction<T>
where
    T: SolverNumeric,
{
    /// Returns the amount subtracted, `0` for a forbidden line.
    #[inline]
    pub fn amount(self) -> T {
        match self {
            LineReduction::Reduced(v) => v,
            LineReduction::Forbidden => T::ZERO,
        }
    }

    /// Returns `true` if the line had no finite cell.
    #[inline]
    pub fn is_forbidden(self) -> bool {
        matches!(self, LineReduction::Forbidden)
    }
}

/// The smallest and second smallest finite entries of a line.
///
/// `second` counts duplicates, so a line with two zeros has
/// `first == second == 0`. Missing values are `T::INFINITY`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineMinima<T> {
    pub first: T,
    pub first_at: Option<usize>,
    pub second: T,
}

impl<T> LineMinima<T>
where
    T: SolverNumeric,
{
    /// Returns the smallest entry of the line when position `k` is skipped.
    #[inline]
    pub fn excluding(&self, k: usize) -> T {
        if self.first_at == Some(k) {
            self.second
        } else {
            self.first
        }
    }
}

/// A square cost matrix that can be reduced in place.
#[derive(Clone, PartialEq, Eq)]
pub struct ReducedCostMatrix<T> {
    num_nodes: usize,
    cells: Vec<T>,
}

impl<T> ReducedCostMatrix<T>
where
    T: SolverNumeric,
{
    /// Creates a matrix from a row-major buffer of `num_nodes * num_nodes`
    /// cells.
    ///
    /// # Panics
    ///
    /// Panics if the buffer has the wrong length.
    pub fn from_cells(num_nodes: usize, cells: Vec<T>) -> Self {
        assert_eq!(
            cells.len(),
            num_nodes * num_nodes,
            "called `ReducedCostMatrix::from_cells` with a buffer of the wrong size"
        );
        Self { num_nodes, cells }
    }

    /// Returns the number of rows (and columns).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline(always)]
    fn offset(&self, row: usize, column: usize) -> usize {
        debug_assert!(
            row < self.num_nodes,
            "called `ReducedCostMatrix::offset` with row index out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            row
        );
        debug_assert!(
            column < self.num_nodes,
            "called `ReducedCostMatrix::offset` with column index out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            column
        );
        row * self.num_nodes + column
    }

    /// Returns the reduced cost of cell `(row, column)`.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> T {
        self.cells[self.offset(row, column)]
    }

    /// Overwrites cell `(row, column)`.
    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: T) {
        let offset = self.offset(row, column);
        self.cells[offset] = value;
    }

    /// Marks cell `(row, column)` as unusable.
    #[inline]
    pub fn forbid(&mut self, row: usize, column: usize) {
        self.set(row, column, T::INFINITY);
    }

    /// Returns row `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.cells[start..start + self.num_nodes]
    }

    /// Returns the flat offsets of the cells of a line.
    #[inline]
    fn line_offsets(&self, axis: Axis, index: usize) -> impl Iterator<Item = usize> + use<T> {
        let n = self.num_nodes;
        let (start, stride) = match axis {
            Axis::Row => (index * n, 1),
            Axis::Column => (index, n),
        };
        (0..n).map(move |k| start + k * stride)
    }

    /// Returns the smallest finite entry of a line, or `T::INFINITY`.
    #[inline]
    pub fn line_min(&self, axis: Axis, index: usize) -> T {
        self.line_offsets(axis, index)
            .map(|o| self.cells[o])
            .min()
            .unwrap_or(T::INFINITY)
    }

    /// Returns the two smallest entries of a line and where the smallest sits.
    pub fn line_minima(&self, axis: Axis, index: usize) -> LineMinima<T> {
        let mut minima = LineMinima {
            first: T::INFINITY,
            first_at: None,
            second: T::INFINITY,
        };
        for (k, o) in self.line_offsets(axis, index).enumerate() {
            let v = self.cells[o];
            if v == T::INFINITY {
                continue;
            }
            if v < minima.first {
                minima.second = minima.first;
                minima.first = v;
                minima.first_at = Some(k);
            } else if v < minima.second {
                minima.second = v;
            }
        }
        minima
    }

    /// Reduces one line in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_bnb::reduction::{Axis, LineReduction, ReducedCostMatrix};
    ///
    /// let inf = i64::MAX;
    /// let mut m = ReducedCostMatrix::from_cells(2, vec![inf, 7, 4, inf]);
    /// assert_eq!(m.reduce_line(Axis::Row, 0), LineReduction::Reduced(7));
    /// assert_eq!(m.get(0, 1), 0);
    /// assert_eq!(m.get(0, 0), inf);
    /// ```
    pub fn reduce_line(&mut self, axis: Axis, index: usize) -> LineReduction<T> {
        let min = self.line_min(axis, index);
        if min == T::INFINITY {
            return LineReduction::Forbidden;
        }
        if min > T::ZERO {
            for o in self.line_offsets(axis, index) {
                let v = self.cells[o];
                if v != T::INFINITY {
                    self.cells[o] = v.saturating_sub_val(min);
                }
            }
        }
        LineReduction::Reduced(min)
    }

    /// Reduces every row, then every column, once each, and returns the
    /// total subtracted. `on_forbidden` is called for every line that has
    /// no finite cell.
    pub fn reduce_all<F>(&mut self, mut on_forbidden: F) -> T
    where
        F: FnMut(Axis, usize),
    {
        let mut total = T::ZERO;
        for axis in [Axis::Row, Axis::Column] {
            for index in 0..self.num_nodes {
                match self.reduce_line(axis, index) {
                    LineReduction::Reduced(v) => total = total.saturating_add_val(v),
                    LineReduction::Forbidden => on_forbidden(axis, index),
                }
            }
        }
        total
    }
}

impl<T> std::fmt::Debug for ReducedCostMatrix<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducedCostMatrix")
            .field("num_nodes", &self.num_nodes)
            .field("cells", &self.cells)
            .finish()
    }
}

impl<T> std::fmt::Display for ReducedCostMatrix<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.num_nodes {
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if *v == T::INFINITY {
                    write!(f, "{:>6}", "inf")?;
                } else {
                    write!(f, "{:>6}", v)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: i64 = i64::MAX;

    fn classic() -> ReducedCostMatrix<i64> {
        ReducedCostMatrix::from_cells(
            4,
            vec![
                INF, 10, 15, 20, //
                5, INF, 9, 10, //
                6, 13, INF, 12, //
                8, 8, 9, INF,
            ],
        )
    }

    #[test]
    fn test_reduce_all_on_classic_instance() {
        let mut m = classic();
        let mut forbidden = Vec::new();
        let total = m.reduce_all(|axis, i| forbidden.push((axis, i)));
        // rows: 10 + 5 + 6 + 8 = 29, columns afterwards: 0 + 0 + 1 + 5 = 6
        assert_eq!(total, 35);
        assert!(forbidden.is_empty());
        for i in 0..4 {
            assert_eq!(m.line_min(Axis::Row, i), 0);
            assert_eq!(m.line_min(Axis::Column, i), 0);
        }
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let mut m = classic();
        m.reduce_all(|_, _| {});
        let snapshot = m.clone();
        let again = m.reduce_all(|_, _| {});
        assert_eq!(again, 0);
        assert_eq!(m, snapshot);
        for i in 0..4 {
            assert_eq!(m.reduce_line(Axis::Row, i), LineReduction::Reduced(0));
            assert_eq!(m.reduce_line(Axis::Column, i), LineReduction::Reduced(0));
        }
        assert_eq!(m, snapshot);
    }

    #[test]
    fn test_forbidden_line_is_reported_and_untouched() {
        let mut m = ReducedCostMatrix::from_cells(2, vec![INF, INF, 3, INF]);
        assert_eq!(m.reduce_line(Axis::Row, 0), LineReduction::Forbidden);
        assert_eq!(m.reduce_line(Axis::Row, 0).amount(), 0);

        let mut forbidden = Vec::new();
        let total = m.reduce_all(|axis, i| forbidden.push((axis, i)));
        assert_eq!(total, 3);
        assert_eq!(forbidden, vec![(Axis::Row, 0), (Axis::Column, 1)]);
        assert_eq!(m.get(0, 0), INF);
    }

    #[test]
    fn test_column_reduction_uses_stride() {
        let mut m = ReducedCostMatrix::from_cells(3, vec![INF, 4, 1, 2, INF, 5, 9, 6, INF]);
        assert_eq!(m.reduce_line(Axis::Column, 1), LineReduction::Reduced(4));
        assert_eq!(m.get(0, 1), 0);
        assert_eq!(m.get(2, 1), 2);
        assert_eq!(m.get(1, 1), INF);
        // untouched neighbours
        assert_eq!(m.get(0, 2), 1);
    }

    #[test]
    fn test_line_minima_tracks_duplicates() {
        let m = ReducedCostMatrix::from_cells(3, vec![INF, 0, 0, 4, INF, 2, 7, 1, INF]);
        let row0 = m.line_minima(Axis::Row, 0);
        assert_eq!((row0.first, row0.second), (0, 0));
        assert_eq!(row0.excluding(1), 0);

        let col1 = m.line_minima(Axis::Column, 1);
        assert_eq!(col1.first_at, Some(0));
        assert_eq!(col1.excluding(0), 1);
        assert_eq!(col1.excluding(2), 0);

        let single = ReducedCostMatrix::from_cells(2, vec![INF, 5, INF, INF]);
        let row0 = single.line_minima(Axis::Row, 0);
        assert_eq!(row0.excluding(1), INF);
    }
}
