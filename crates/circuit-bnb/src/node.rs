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

//! Search-tree nodes of Little's algorithm.
//!
//! A `PartialSolution<T>` is one node of the branch-and-bound tree. It owns
//! a reduced copy of the distance matrix, a tri-state constraint per ordered
//! pair of nodes, and the chains of edges forced so far. Children are derived
//! by `with_edge` (the tour must use `from -> to`) and `without_edge` (the
//! tour must avoid it); both return a fresh deep copy and leave the parent
//! untouched.
//!
//! Bound bookkeeping
//! - `lower_bound` is the sum of everything subtracted by reductions plus the
//!   reduced costs of the forced edges. For every tour consistent with the
//!   constraints, `tour cost = lower_bound + sum of the reduced costs of its
//!   unforced edges`, so the bound is admissible and never decreases.
//! - `cost` is the true cost of the forced edges. Once all `n` edges are
//!   forced the two values agree.
//!
//! Consumed rows and columns are all-infinite by construction. A row or
//! column that still needs an edge but has no finite cell left makes the
//! node infeasible, which is recorded explicitly.

use crate::reduction::{Axis, LineReduction, ReducedCostMatrix};
use circuit_core::num::SolverNumeric;
use circuit_model::{index::NodeIndex, matrix::DistanceMatrix, tour::Tour};
use fixedbitset::FixedBitSet;

/// The decision state of a single directed edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Constraint {
    /// The edge may or may not be part of the tour.
    #[default]
    Undecided,
    /// The edge is part of every tour below this node.
    Forced,
    /// The edge is part of no tour below this node.
    Forbidden,
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Undecided => write!(f, "Undecided"),
            Constraint::Forced => write!(f, "Forced"),
            Constraint::Forbidden => write!(f, "Forbidden"),
        }
    }
}

/// Returned when a tour is requested from a node whose forced edges do not
/// form a Hamiltonian cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("partial solution with {num_forced} of {num_nodes} forced edges is not a complete tour")]
pub struct IncompleteTourError {
    /// The number of edges forced in the offending node.
    pub num_forced: usize,
    /// The number of nodes of the instance, i.e. the edges a tour needs.
    pub num_nodes: usize,
}

/// A node of the branch-and-bound tree.
#[derive(Clone)]
pub struct PartialSolution<T> {
    num_nodes: usize,
    cost: T,
    lower_bound: T,
    reduced: ReducedCostMatrix<T>,
    constraints: Vec<Constraint>,
    successor: Vec<Option<NodeIndex>>,
    predecessor: Vec<Option<NodeIndex>>,
    num_forced: usize,
    infeasible: bool,
}

impl<T> PartialSolution<T>
where
    T: SolverNumeric,
{
    /// Builds the root node: no decisions taken, the matrix fully reduced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_bnb::node::PartialSolution;
    /// # use circuit_model::matrix::DistanceMatrix;
    ///
    /// let matrix = DistanceMatrix::from_rows(&[
    ///     [0i64, 10, 15, 20],
    ///     [5, 0, 9, 10],
    ///     [6, 13, 0, 12],
    ///     [8, 8, 9, 0],
    /// ]);
    /// let root = PartialSolution::root(&matrix);
    /// assert_eq!(root.lower_bound(), 35);
    /// assert_eq!(root.cost(), 0);
    /// assert!(!root.is_complete());
    /// ```
    pub fn root(matrix: &DistanceMatrix<T>) -> Self {
        let n = matrix.num_nodes();
        let cells = matrix.as_slice().to_vec();
        let constraints = cells
            .iter()
            .map(|&d| {
                if d == T::INFINITY {
                    Constraint::Forbidden
                } else {
                    Constraint::Undecided
                }
            })
            .collect();

        let mut node = Self {
            num_nodes: n,
            cost: T::ZERO,
            lower_bound: T::ZERO,
            reduced: ReducedCostMatrix::from_cells(n, cells),
            constraints,
            successor: vec![None; n],
            predecessor: vec![None; n],
            num_forced: 0,
            infeasible: false,
        };

        if n > 1 {
            let reduction = node.reduce_all();
            node.lower_bound = reduction;
        }
        node
    }

    /// Returns the number of nodes of the instance.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the true cost of the forced edges.
    #[inline]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the admissible lower bound of this node.
    #[inline]
    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    /// Returns the reduced cost matrix.
    #[inline]
    pub fn reduced(&self) -> &ReducedCostMatrix<T> {
        &self.reduced
    }

    /// Returns the number of forced edges.
    #[inline]
    pub fn num_forced(&self) -> usize {
        self.num_forced
    }

    /// Returns `true` if no tour is consistent with the constraints.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        self.infeasible
    }

    #[inline(always)]
    fn cell(&self, from: usize, to: usize) -> usize {
        debug_assert!(
            from < self.num_nodes,
            "called `PartialSolution::cell` with `from` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            from
        );
        debug_assert!(
            to < self.num_nodes,
            "called `PartialSolution::cell` with `to` out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            to
        );
        from * self.num_nodes + to
    }

    /// Returns the decision state of edge `from -> to`.
    #[inline]
    pub fn constraint(&self, from: NodeIndex, to: NodeIndex) -> Constraint {
        self.constraints[self.cell(from.get(), to.get())]
    }

    /// Returns the forced successor of `node`, if any.
    #[inline]
    pub fn successor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.successor[node.get()]
    }

    /// Returns the forced predecessor of `node`, if any.
    #[inline]
    pub fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.predecessor[node.get()]
    }

    /// Returns `true` if row `from` still needs an outgoing edge.
    #[inline]
    fn is_row_open(&self, from: usize) -> bool {
        self.successor[from].is_none()
    }

    /// Returns `true` if column `to` still needs an incoming edge.
    #[inline]
    fn is_column_open(&self, to: usize) -> bool {
        self.predecessor[to].is_none()
    }

    /// Returns `true` if `from -> to` is undecided and has reduced cost zero.
    #[inline]
    pub(crate) fn is_candidate(&self, from: usize, to: usize) -> bool {
        self.constraints[self.cell(from, to)] == Constraint::Undecided
            && self.reduced.get(from, to) == T::ZERO
    }

    /// Returns the child in which every tour uses `from -> to`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the edge is not undecided.
    pub fn with_edge(&self, matrix: &DistanceMatrix<T>, from: NodeIndex, to: NodeIndex) -> Self {
        debug_assert_eq!(
            self.constraint(from, to),
            Constraint::Undecided,
            "called `PartialSolution::with_edge` on an edge that is already decided"
        );

        let mut child = self.clone();
        child.commit_edge(from.get(), to.get(), matrix.distance(from, to));

        if let Some((end, start)) = child.wrap_edge(from.get(), to.get())
            && child.constraints[child.cell(end, start)] == Constraint::Undecided
        {
            child.forbid(end, start);
        }

        let reduction = child.reduce_all();
        child.lower_bound = child.lower_bound.saturating_add_val(reduction);
        child
    }

    /// Returns the child in which no tour uses `from -> to`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the edge is not undecided.
    pub fn without_edge(&self, from: NodeIndex, to: NodeIndex) -> Self {
        debug_assert_eq!(
            self.constraint(from, to),
            Constraint::Undecided,
            "called `PartialSolution::without_edge` on an edge that is already decided"
        );

        let (i, j) = (from.get(), to.get());
        let mut child = self.clone();
        child.forbid(i, j);

        for (axis, index) in [(Axis::Row, i), (Axis::Column, j)] {
            match child.reduced.reduce_line(axis, index) {
                LineReduction::Reduced(v) => {
                    child.lower_bound = child.lower_bound.saturating_add_val(v);
                }
                LineReduction::Forbidden => {
                    let open = match axis {
                        Axis::Row => child.is_row_open(index),
                        Axis::Column => child.is_column_open(index),
                    };
                    child.infeasible |= open;
                }
            }
        }
        child
    }

    /// Forces `from -> to` and closes row `from` and column `to`.
    fn commit_edge(&mut self, from: usize, to: usize, distance: T) {
        self.cost = self.cost.saturating_add_val(distance);
        self.lower_bound = self
            .lower_bound
            .saturating_add_val(self.reduced.get(from, to));

        for k in 0..self.num_nodes {
            if k != to {
                self.forbid(from, k);
            }
            if k != from {
                self.forbid(k, to);
            }
        }
        self.reduced.forbid(from, to);
        let cell = self.cell(from, to);
        self.constraints[cell] = Constraint::Forced;

        self.successor[from] = Some(NodeIndex::new(to));
        self.predecessor[to] = Some(NodeIndex::new(from));
        self.num_forced += 1;
    }

    #[inline]
    fn forbid(&mut self, from: usize, to: usize) {
        let cell = self.cell(from, to);
        self.constraints[cell] = Constraint::Forbidden;
        self.reduced.forbid(from, to);
    }

    /// Traces the chain through the freshly forced `from -> to` and returns
    /// the edge from its last node back to its first one, if taking it would
    /// close a cycle shorter than `n`. A chain that already closed a short
    /// cycle marks the node infeasible.
    fn wrap_edge(&mut self, from: usize, to: usize) -> Option<(usize, usize)> {
        let mut span = 2;

        let mut end = to;
        while let Some(next) = self.successor[end] {
            let next = next.get();
            if next == to {
                // The chain closed on itself.
                self.infeasible |= span - 1 < self.num_nodes;
                return None;
            }
            end = next;
            span += 1;
        }

        let mut start = from;
        while let Some(prev) = self.predecessor[start] {
            start = prev.get();
            span += 1;
        }

        (span < self.num_nodes).then_some((end, start))
    }

    /// Reduces the whole matrix, flagging open lines without a finite cell.
    fn reduce_all(&mut self) -> T {
        let successor = &self.successor;
        let predecessor = &self.predecessor;
        let mut dead_end = false;
        let reduction = self.reduced.reduce_all(|axis, index| {
            let open = match axis {
                Axis::Row => successor[index].is_none(),
                Axis::Column => predecessor[index].is_none(),
            };
            dead_end |= open;
        });
        self.infeasible |= dead_end;
        reduction
    }

    /// Returns `true` if the forced edges form a single cycle through all
    /// nodes. A single-node instance is complete from the start.
    pub fn is_complete(&self) -> bool {
        let n = self.num_nodes;
        if n == 1 {
            return true;
        }
        if self.num_forced != n {
            return false;
        }

        let mut visited = FixedBitSet::with_capacity(n);
        let mut current = 0;
        for _ in 0..n {
            if visited.put(current) {
                return false;
            }
            match self.successor[current] {
                Some(next) => current = next.get(),
                None => return false,
            }
        }
        current == 0 && visited.count_ones(..) == n
    }

    /// Returns the tour traced by the forced edges.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteTourError` if the node is not complete.
    pub fn to_tour(&self) -> Result<Tour<T>, IncompleteTourError> {
        if !self.is_complete() {
            return Err(IncompleteTourError {
                num_forced: self.num_forced,
                num_nodes: self.num_nodes,
            });
        }

        let mut order = Vec::with_capacity(self.num_nodes);
        let mut current = NodeIndex::new(0);
        for _ in 0..self.num_nodes {
            order.push(current);
            current = self.successor[current.get()].unwrap_or(current);
        }
        Ok(Tour::new(self.cost, order))
    }
}

impl<T> TryFrom<&PartialSolution<T>> for Tour<T>
where
    T: SolverNumeric,
{
    type Error = IncompleteTourError;

    fn try_from(node: &PartialSolution<T>) -> Result<Self, Self::Error> {
        node.to_tour()
    }
}

impl<T> std::fmt::Debug for PartialSolution<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialSolution")
            .field("num_nodes", &self.num_nodes)
            .field("cost", &self.cost)
            .field("lower_bound", &self.lower_bound)
            .field("num_forced", &self.num_forced)
            .field("infeasible", &self.infeasible)
            .field("successor", &self.successor)
            .finish()
    }
}

impl<T> std::fmt::Display for PartialSolution<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartialSolution(cost: {}, lower_bound: {}, forced: {}/{}{})",
            self.cost,
            self.lower_bound,
            self.num_forced,
            self.num_nodes,
            if self.infeasible { ", infeasible" } else { "" }
        )
    }
}
