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

//! Distance matrix of a directed TSP instance.
//!
//! `DistanceMatrix<T>` is an immutable, row-major `n x n` table of
//! non-negative costs. A cell holding `T::INFINITY` is a missing edge; the
//! diagonal is always missing because self-loops are never part of a tour.
//! The table is stored in one flat buffer sized to the instance, and
//! `MAX_NODES` caps the instance size that the loader and the builder accept.
//!
//! Construction goes through `DistanceMatrixBuilder`, which starts from a
//! fully disconnected graph (every cell missing) so that a forgotten entry
//! can never turn into a silent zero-cost edge.

use crate::index::NodeIndex;
use circuit_core::num::SolverNumeric;

/// The largest number of nodes an instance may have.
pub const MAX_NODES: usize = 50;

/// Returns the largest finite edge cost an instance may hold.
///
/// A tour sums at most `MAX_NODES` edges, so keeping every edge at or below
/// `T::INFINITY / (MAX_NODES + 1)` keeps every tour cost strictly below the
/// infinity sentinel.
///
/// # Examples
///
/// ```rust
/// # use circuit_model::matrix::{max_edge_cost, MAX_NODES};
///
/// let limit = max_edge_cost::<i64>();
/// assert!(limit.checked_mul(MAX_NODES as i64).is_some_and(|sum| sum < i64::MAX));
/// ```
#[inline]
pub fn max_edge_cost<T>() -> T
where
    T: SolverNumeric,
{
    match T::from_usize(MAX_NODES + 1) {
        Some(divisor) => T::INFINITY / divisor,
        None => T::ZERO,
    }
}

#[inline(always)]
fn flatten_index(num_nodes: usize, from: NodeIndex, to: NodeIndex) -> usize {
    from.get() * num_nodes + to.get()
}

/// Size of the tour space of an instance, kept in log10 space.
///
/// With the start fixed at node `0`, a complete directed graph on `n`
/// nodes has `(n - 1)!` distinct tours, which overflows every integer type
/// long before `MAX_NODES`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log_val: f64,
}

impl Complexity {
    /// Calculates the complexity of an instance with `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        let log_val = (2..num_nodes).map(|k| (k as f64).log10()).sum();
        Complexity { log_val }
    }

    /// Returns the share of the tour space, in percent, that `nodes_explored`
    /// search nodes correspond to. Spaces beyond `10^15` report `0.0`.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return Some(0.0);
        }

        let total_size = 10.0_f64.powf(self.log_val);
        if total_size == 0.0 {
            return None;
        }

        Some((nodes_explored as f64 / total_size) * 100.0)
    }

    /// Returns the order of magnitude, e.g. `3` for `5040 = 5.04 × 10^3`.
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the coefficient in front of the power of ten.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let fractional_part = self.log_val - self.log_val.floor();
        10.0_f64.powf(fractional_part)
    }

    /// Returns the raw log10 value.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log10={:.4})", self.log_val)
    }
}

/// The immutable cost table of an instance.
///
/// `distances[from * num_nodes + to]` is the cost of the directed edge
/// `from -> to`, or `T::INFINITY` if the edge does not exist.
#[derive(Clone, PartialEq, Eq)]
pub struct DistanceMatrix<T> {
    num_nodes: usize,
    distances: Vec<T>,
}

impl<T> DistanceMatrix<T>
where
    T: SolverNumeric,
{
    /// Builds a matrix from a square table of rows. Diagonal entries are
    /// ignored and stored as missing.
    ///
    /// # Panics
    ///
    /// Panics if the table is not square, exceeds `MAX_NODES`, or contains a
    /// negative cost off the diagonal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_model::matrix::DistanceMatrix;
    /// # use circuit_model::index::NodeIndex;
    /// # use circuit_core::num::constants::Infinity;
    ///
    /// let matrix = DistanceMatrix::from_rows(&[[0i64, 4], [7, 0]]);
    /// assert_eq!(matrix.num_nodes(), 2);
    /// assert_eq!(matrix.distance(NodeIndex::new(1), NodeIndex::new(0)), 7);
    /// assert!(matrix.distance(NodeIndex::new(0), NodeIndex::new(0)).is_infinite());
    /// ```
    pub fn from_rows<R>(rows: &[R]) -> Self
    where
        R: AsRef<[T]>,
    {
        let num_nodes = rows.len();
        let mut builder = DistanceMatrixBuilder::new(num_nodes);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                num_nodes,
                "called `DistanceMatrix::from_rows` with a non-square table: row {} has {} entries but {} were expected",
                i,
                row.len(),
                num_nodes
            );
            for (j, &cost) in row.iter().enumerate() {
                if i != j {
                    builder.set_distance(NodeIndex::new(i), NodeIndex::new(j), cost);
                }
            }
        }
        builder.build()
    }

    /// Returns the number of nodes of the instance.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the cost of the directed edge `from -> to`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> T {
        debug_assert!(
            from.get() < self.num_nodes,
            "called `DistanceMatrix::distance` with `from` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_nodes,
            "called `DistanceMatrix::distance` with `to` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            to.get()
        );

        self.distances[flatten_index(self.num_nodes, from, to)]
    }

    /// Returns the outgoing costs of `from` as a slice indexed by target node.
    #[inline]
    pub fn row(&self, from: NodeIndex) -> &[T] {
        let start = from.get() * self.num_nodes;
        &self.distances[start..start + self.num_nodes]
    }

    /// Returns the whole table in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.distances
    }

    /// Returns `true` if the directed edge `from -> to` exists.
    #[inline]
    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.distance(from, to) != T::INFINITY
    }

    /// Returns the size of the tour space of this instance.
    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.num_nodes)
    }
}

impl<T> std::fmt::Debug for DistanceMatrix<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrix")
            .field("num_nodes", &self.num_nodes)
            .field("distances", &self.distances)
            .finish()
    }
}

impl<T> std::fmt::Display for DistanceMatrix<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.num_nodes {
            let row = self.row(NodeIndex::new(i));
            for (j, cost) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if *cost == T::INFINITY {
                    write!(f, "{:>6}", "inf")?;
                } else {
                    write!(f, "{:>6}", cost)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Incremental construction of a `DistanceMatrix`.
///
/// The builder starts with **no edges**: every cell is `T::INFINITY` until
/// `set_distance` connects it.
#[derive(Clone)]
pub struct DistanceMatrixBuilder<T> {
    num_nodes: usize,
    distances: Vec<T>,
}

impl<T> DistanceMatrixBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates a builder for `num_nodes` nodes with every edge missing.
    ///
    /// # Panics
    ///
    /// Panics if `num_nodes` exceeds `MAX_NODES`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_model::matrix::DistanceMatrixBuilder;
    /// # use circuit_model::index::NodeIndex;
    ///
    /// let mut builder = DistanceMatrixBuilder::<i64>::new(3);
    /// builder.set_distance(NodeIndex::new(0), NodeIndex::new(1), 5);
    /// let matrix = builder.build();
    /// assert!(matrix.has_edge(NodeIndex::new(0), NodeIndex::new(1)));
    /// assert!(!matrix.has_edge(NodeIndex::new(1), NodeIndex::new(0)));
    /// ```
    pub fn new(num_nodes: usize) -> Self {
        assert!(
            num_nodes <= MAX_NODES,
            "called `DistanceMatrixBuilder::new` with {} nodes but the capacity is {}",
            num_nodes,
            MAX_NODES
        );

        Self {
            num_nodes,
            distances: vec![T::INFINITY; num_nodes * num_nodes],
        }
    }

    /// Returns the number of nodes of the matrix under construction.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Sets the cost of the directed edge `from -> to`. Passing
    /// `T::INFINITY` removes the edge again. Self-loops are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `cost` is negative or a finite cost above
    /// `max_edge_cost()`, or (in debug builds) if an index is out of bounds.
    #[inline]
    pub fn set_distance(&mut self, from: NodeIndex, to: NodeIndex, cost: T) -> &mut Self {
        debug_assert!(
            from.get() < self.num_nodes,
            "called `DistanceMatrixBuilder::set_distance` with `from` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_nodes,
            "called `DistanceMatrixBuilder::set_distance` with `to` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            to.get()
        );
        assert!(
            cost >= T::zero(),
            "called `DistanceMatrixBuilder::set_distance` with a negative cost: {}",
            cost
        );
        assert!(
            cost == T::INFINITY || cost <= max_edge_cost::<T>(),
            "called `DistanceMatrixBuilder::set_distance` with a cost above the limit of {}: {}",
            max_edge_cost::<T>(),
            cost
        );

        if from != to {
            self.distances[flatten_index(self.num_nodes, from, to)] = cost;
        }
        self
    }

    /// Builds the immutable `DistanceMatrix`.
    pub fn build(self) -> DistanceMatrix<T> {
        DistanceMatrix {
            num_nodes: self.num_nodes,
            distances: self.distances,
        }
    }
}

impl<T> std::fmt::Display for DistanceMatrixBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DistanceMatrixBuilder(num_nodes: {})", self.num_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_core::num::constants::Infinity;

    fn ni(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_builder_starts_disconnected() {
        let matrix = DistanceMatrixBuilder::<i64>::new(4).build();
        for i in 0..4 {
            for j in 0..4 {
                assert!(!matrix.has_edge(ni(i), ni(j)));
            }
        }
    }

    #[test]
    fn test_builder_ignores_self_loops() {
        let mut builder = DistanceMatrixBuilder::<i64>::new(2);
        builder.set_distance(ni(1), ni(1), 3);
        let matrix = builder.build();
        assert!(matrix.distance(ni(1), ni(1)).is_infinite());
    }

    #[test]
    #[should_panic(expected = "with a negative cost")]
    fn test_builder_rejects_negative_cost() {
        let mut builder = DistanceMatrixBuilder::<i64>::new(2);
        builder.set_distance(ni(0), ni(1), -1);
    }

    #[test]
    #[should_panic(expected = "with a cost above the limit")]
    fn test_builder_rejects_cost_that_could_overflow_a_tour() {
        let mut builder = DistanceMatrixBuilder::<i64>::new(2);
        builder.set_distance(ni(0), ni(1), max_edge_cost::<i64>() + 1);
    }

    #[test]
    fn test_builder_accepts_largest_edge_cost_and_infinity() {
        let limit = max_edge_cost::<i64>();
        let mut builder = DistanceMatrixBuilder::<i64>::new(2);
        builder
            .set_distance(ni(0), ni(1), limit)
            .set_distance(ni(1), ni(0), i64::INFINITY);
        let matrix = builder.build();
        assert_eq!(matrix.distance(ni(0), ni(1)), limit);
        assert!(!matrix.has_edge(ni(1), ni(0)));
    }

    #[test]
    fn test_max_edge_cost_keeps_full_tours_finite() {
        assert_eq!(max_edge_cost::<i8>(), 2);
        let tour_cost = (max_edge_cost::<i32>() as i64) * (MAX_NODES as i64);
        assert!(tour_cost < i32::INFINITY as i64);
    }

    #[test]
    #[should_panic(expected = "but the capacity is 50")]
    fn test_builder_rejects_oversized_instance() {
        let _ = DistanceMatrixBuilder::<i64>::new(MAX_NODES + 1);
    }

    #[test]
    fn test_from_rows_overrides_diagonal() {
        let matrix = DistanceMatrix::from_rows(&[[0i32, 10, 15], [5, 0, 9], [6, 13, 0]]);
        assert_eq!(matrix.num_nodes(), 3);
        assert_eq!(matrix.distance(ni(0), ni(2)), 15);
        assert_eq!(matrix.distance(ni(2), ni(1)), 13);
        for i in 0..3 {
            assert_eq!(matrix.distance(ni(i), ni(i)), i32::INFINITY);
        }
    }

    #[test]
    fn test_row_slices_follow_row_major_layout() {
        let matrix = DistanceMatrix::from_rows(&[vec![0i64, 1, 2], vec![3, 0, 4], vec![5, 6, 0]]);
        assert_eq!(matrix.row(ni(1)), &[3, i64::INFINITY, 4]);
        assert_eq!(matrix.as_slice().len(), 9);
    }

    #[test]
    #[should_panic(expected = "non-square table")]
    fn test_from_rows_rejects_ragged_input() {
        let _ = DistanceMatrix::from_rows(&[vec![0i64, 1], vec![2]]);
    }

    #[test]
    fn test_complexity_counts_directed_tours() {
        // 5 nodes: 4! = 24 tours.
        let c = Complexity::new(5);
        assert!((c.raw() - 24f64.log10()).abs() < 1e-9);
        assert_eq!(c.exponent(), 1);
        assert!((c.mantissa() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_of_trivial_instances_is_one_tour() {
        assert_eq!(Complexity::new(1).raw(), 0.0);
        assert_eq!(Complexity::new(2).raw(), 0.0);
    }

    #[test]
    fn test_coverage_saturates_for_huge_spaces() {
        assert_eq!(Complexity::new(40).coverage(1_000_000), Some(0.0));
        let c = Complexity::new(4); // 3! = 6
        let coverage = c.coverage(3).unwrap();
        assert!((coverage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_marks_missing_edges() {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1], [2, 0]]);
        let text = format!("{}", matrix);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("inf"));
    }
}
