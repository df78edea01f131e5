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

//! Circuit-BnB: exact directed TSP by Little's branch-and-bound
//!
//! Best-first branch-and-bound over reduced cost matrices. Every search node
//! owns a reduced copy of the distance matrix whose subtracted row and column
//! minima form an admissible lower bound. Branching picks one undecided edge
//! and splits into "tour uses the edge" and "tour avoids the edge".
//!
//! Core flow
//! - Provide a `circuit_model::matrix::DistanceMatrix<T>`.
//! - Choose a `pivot::PivotRule` (default: `RegretPivotRule`).
//! - Optionally attach monitors and a known upper bound.
//! - Run `bnb::BnbSolver`.
//!
//! Assumptions and guarantees
//! - Costs are non-negative; `T::INFINITY` marks a missing edge.
//! - Lower bounds never overestimate, so the last reported tour is optimal.
//! - Deterministic: equal bounds are expanded in insertion order.
//!
//! Module map
//! - `reduction`: row/column normalization of a cost matrix.
//! - `node`: the partial solution with its constraint state.
//! - `pivot`: pivot-edge selection rules.
//! - `bnb`: the solver engine and session orchestration.
//! - `monitor`: tree-search monitors (log, composite, limits, writers).
//! - `result`: solver outcomes with termination reasons.
//! - `stats`: lightweight counters/timing.

pub mod bnb;
#[cfg(test)]
mod bruteforce;
mod incumbent;
pub mod monitor;
pub mod node;
pub mod pivot;
mod queue;
pub mod reduction;
pub mod result;
pub mod stats;
