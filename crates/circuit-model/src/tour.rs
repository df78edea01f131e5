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

//! A closed Hamiltonian cycle together with its cost.
//!
//! The order always starts at node `0` and lists every node exactly once;
//! the closing edge back to `0` is implicit. `Display` renders the cycle in
//! the solver's output format, `cost: <v> [0->a->b->...->0]`.

use crate::{index::NodeIndex, matrix::DistanceMatrix};
use circuit_core::num::SolverNumeric;

/// A tour through all nodes of an instance, starting and ending at node `0`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Tour<T> {
    cost: T,
    order: Vec<NodeIndex>,
}

impl<T> Tour<T>
where
    T: SolverNumeric,
{
    /// Creates a new tour visiting `order` and closing back to its first node.
    ///
    /// # Panics
    ///
    /// Panics if `order` is empty, does not start at node `0`, or visits a
    /// node twice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_model::tour::Tour;
    /// # use circuit_model::index::NodeIndex;
    ///
    /// let order = [0, 2, 1].map(NodeIndex::new).to_vec();
    /// let tour = Tour::new(17i64, order);
    /// assert_eq!(tour.to_string(), "cost: 17 [0->2->1->0]");
    /// ```
    pub fn new(cost: T, order: Vec<NodeIndex>) -> Self {
        assert!(
            order.first().is_some_and(|start| start.is_zero()),
            "called `Tour::new` with an order that does not start at node 0: {:?}",
            order
        );
        assert!(
            Self::is_permutation(&order),
            "called `Tour::new` with an order that is not a permutation: {:?}",
            order
        );

        Self { cost, order }
    }

    fn is_permutation(order: &[NodeIndex]) -> bool {
        let mut seen = vec![false; order.len()];
        for node in order {
            let i = node.get();
            if i >= order.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }

    /// Returns the total cost of the tour.
    #[inline]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the visiting order, starting at node `0`, without the
    /// closing return.
    #[inline]
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Returns the number of nodes the tour visits.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.order.len()
    }

    /// Returns the directed edges of the cycle, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        let n = self.order.len();
        (0..n).map(move |k| (self.order[k], self.order[(k + 1) % n]))
    }

    /// Evaluates the cycle against `matrix`. Returns `T::INFINITY` if the
    /// cycle uses a missing edge.
    ///
    /// # Panics
    ///
    /// Panics if the tour and the matrix disagree on the number of nodes.
    pub fn cost_in(&self, matrix: &DistanceMatrix<T>) -> T {
        assert_eq!(
            self.order.len(),
            matrix.num_nodes(),
            "called `Tour::cost_in` with a matrix of the wrong size"
        );
        if self.order.len() < 2 {
            return T::ZERO;
        }
        self.edges()
            .fold(T::ZERO, |acc, (from, to)| {
                acc.saturating_add_val(matrix.distance(from, to))
            })
    }

    /// Consumes the tour and returns its parts.
    #[inline]
    pub fn into_inner(self) -> (T, Vec<NodeIndex>) {
        (self.cost, self.order)
    }
}

impl<T> std::fmt::Debug for Tour<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("cost", &self.cost)
            .field("order", &self.order)
            .finish()
    }
}

impl<T> std::fmt::Display for Tour<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cost: {} [", self.cost)?;
        for node in &self.order {
            write!(f, "{}->", node.get())?;
        }
        match self.order.first() {
            Some(start) => write!(f, "{}]", start.get()),
            None => write!(f, "]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_core::num::constants::Infinity;

    fn order(nodes: &[usize]) -> Vec<NodeIndex> {
        nodes.iter().copied().map(NodeIndex::new).collect()
    }

    #[test]
    fn test_display_closes_the_cycle() {
        let tour = Tour::new(35i64, order(&[0, 2, 3, 1]));
        assert_eq!(tour.to_string(), "cost: 35 [0->2->3->1->0]");
    }

    #[test]
    fn test_single_node_tour() {
        let tour = Tour::new(0i64, order(&[0]));
        assert_eq!(tour.to_string(), "cost: 0 [0->0]");
        assert_eq!(tour.edges().count(), 1);
    }

    #[test]
    fn test_edges_include_closing_edge() {
        let tour = Tour::new(0i64, order(&[0, 1, 2]));
        let edges: Vec<_> = tour.edges().map(|(a, b)| (a.get(), b.get())).collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_cost_in_matches_matrix() {
        let matrix = DistanceMatrix::from_rows(&[
            [0i64, 10, 15, 20],
            [5, 0, 9, 10],
            [6, 13, 0, 12],
            [8, 8, 9, 0],
        ]);
        let tour = Tour::new(35, order(&[0, 1, 3, 2]));
        assert_eq!(tour.cost_in(&matrix), 10 + 10 + 9 + 6);
    }

    #[test]
    fn test_cost_in_saturates_on_missing_edge() {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1, i64::INFINITY], [1, 0, 1], [1, 1, 0]]);
        let tour = Tour::new(0, order(&[0, 1, 2]));
        assert_eq!(tour.cost_in(&matrix), 3);
        let tour = Tour::new(0, order(&[0, 2, 1]));
        assert!(tour.cost_in(&matrix).is_infinite());
    }

    #[test]
    #[should_panic(expected = "does not start at node 0")]
    fn test_new_rejects_wrong_start() {
        let _ = Tour::new(0i64, order(&[1, 0]));
    }

    #[test]
    #[should_panic(expected = "not a permutation")]
    fn test_new_rejects_repeated_node() {
        let _ = Tour::new(0i64, order(&[0, 1, 1]));
    }
}
