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

//! Exhaustive reference solver for tests.
//!
//! Enumerates every ordering of nodes `1..n` behind the fixed start node 0
//! with Heap's algorithm. Only usable for small instances.

use circuit_core::num::SolverNumeric;
use circuit_model::{index::NodeIndex, matrix::DistanceMatrix};

/// Returns the cost of the cheapest tour, or `T::INFINITY` if every
/// ordering uses a missing edge.
pub(crate) fn cheapest_tour_cost<T>(matrix: &DistanceMatrix<T>) -> T
where
    T: SolverNumeric,
{
    let n = matrix.num_nodes();
    if n == 1 {
        return T::ZERO;
    }

    let mut order: Vec<usize> = (1..n).collect();
    let mut best = tour_cost(matrix, &order);

    // Iterative Heap's algorithm over `order`.
    let k = order.len();
    let mut counters = vec![0usize; k];
    let mut i = 1;
    while i < k {
        if counters[i] < i {
            if i % 2 == 0 {
                order.swap(0, i);
            } else {
                order.swap(counters[i], i);
            }
            best = best.min(tour_cost(matrix, &order));
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    best
}

fn tour_cost<T>(matrix: &DistanceMatrix<T>, order: &[usize]) -> T
where
    T: SolverNumeric,
{
    let mut cost = T::ZERO;
    let mut previous = 0;
    for &next in order.iter().chain(std::iter::once(&0)) {
        let d = matrix.distance(NodeIndex::new(previous), NodeIndex::new(next));
        if d == T::INFINITY {
            return T::INFINITY;
        }
        cost = cost.saturating_add_val(d);
        previous = next;
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_instance() {
        let matrix = DistanceMatrix::from_rows(&[
            [0i64, 10, 15, 20],
            [5, 0, 9, 10],
            [6, 13, 0, 12],
            [8, 8, 9, 0],
        ]);
        assert_eq!(cheapest_tour_cost(&matrix), 35);
    }

    #[test]
    fn test_tiny_instances() {
        let single = DistanceMatrix::from_rows(&[[0i64]]);
        assert_eq!(cheapest_tour_cost(&single), 0);

        let pair = DistanceMatrix::from_rows(&[[0i64, 3], [4, 0]]);
        assert_eq!(cheapest_tour_cost(&pair), 7);
    }

    #[test]
    fn test_missing_edges_make_instance_infeasible() {
        let mut builder = circuit_model::matrix::DistanceMatrixBuilder::<i64>::new(3);
        builder.set_distance(NodeIndex::new(0), NodeIndex::new(1), 1);
        builder.set_distance(NodeIndex::new(1), NodeIndex::new(2), 1);
        let matrix = builder.build();
        assert_eq!(cheapest_tour_cost(&matrix), i64::MAX);
    }
}
