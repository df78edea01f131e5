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

//! Best-first work queue.
//!
//! A min-queue on `(lower_bound, sequence)`. The sequence number is handed
//! out on every push, so nodes with equal bounds are expanded first-in,
//! first-out and a run is fully reproducible. The queue owns every pending
//! node and tracks its peak length for statistics.

use crate::node::PartialSolution;
use circuit_core::num::SolverNumeric;
use std::{cmp::Ordering, collections::BinaryHeap};

/// A pending node with its ordering key.
struct QueuedNode<T> {
    lower_bound: T,
    sequence: u64,
    node: PartialSolution<T>,
}

impl<T> PartialEq for QueuedNode<T>
where
    T: SolverNumeric,
{
    fn eq(&self, other: &Self) -> bool {
        self.lower_bound == other.lower_bound && self.sequence == other.sequence
    }
}

impl<T> Eq for QueuedNode<T> where T: SolverNumeric {}

impl<T> Ord for QueuedNode<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // `BinaryHeap` is a max-heap: smallest bound, then oldest, on top.
        other
            .lower_bound
            .cmp(&self.lower_bound)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for QueuedNode<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of open search nodes.
pub(crate) struct SearchQueue<T> {
    heap: BinaryHeap<QueuedNode<T>>,
    next_sequence: u64,
    max_len: usize,
}

impl<T> SearchQueue<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
            max_len: 0,
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
            max_len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, node: PartialSolution<T>) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueuedNode {
            lower_bound: node.lower_bound(),
            sequence,
            node,
        });
        self.max_len = self.max_len.max(self.heap.len());
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PartialSolution<T>> {
        self.heap.pop().map(|entry| entry.node)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Drops all pending nodes, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
        self.max_len = 0;
    }
}

impl<T> std::fmt::Debug for SearchQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchQueue")
            .field("len", &self.heap.len())
            .field("next_sequence", &self.next_sequence)
            .field("max_len", &self.max_len)
            .finish()
    }
}
