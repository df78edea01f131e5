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

//! Pivot-edge selection
//!
//! A pivot rule looks at a node's reduced matrix and names the undecided
//! edge to branch on. Only cells with reduced cost zero are candidates: they
//! are the edges the current bound already assumes to be free.
//!
//! Provided rules:
//! - `regret`: Little's rule. Picks the zero whose exclusion raises the bound
//!   the most (row minimum plus column minimum without the cell).
//! - `first_zero`: the first undecided zero in row-major order. Still exact,
//!   usually with a larger tree; useful to cross-check the default rule.
//!
//! Rules are deterministic: ties go to the lower row, then the lower column.

pub mod first_zero;
pub mod regret;

use crate::node::PartialSolution;
use circuit_core::num::SolverNumeric;
use circuit_model::index::NodeIndex;

/// The edge chosen for branching, together with the bound increase that
/// excluding it would cause.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pivot<T> {
    from: NodeIndex,
    to: NodeIndex,
    regret: T,
}

impl<T> Pivot<T>
where
    T: SolverNumeric,
{
    /// Creates a new `Pivot`.
    #[inline]
    pub fn new(from: NodeIndex, to: NodeIndex, regret: T) -> Self {
        Self { from, to, regret }
    }

    /// Returns the tail of the edge.
    #[inline]
    pub fn from(&self) -> NodeIndex {
        self.from
    }

    /// Returns the head of the edge.
    #[inline]
    pub fn to(&self) -> NodeIndex {
        self.to
    }

    /// Returns the bound increase of excluding the edge, `T::INFINITY` if
    /// the edge is the only option of its row or column.
    #[inline]
    pub fn regret(&self) -> T {
        self.regret
    }
}

impl<T> std::fmt::Display for Pivot<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.regret == T::INFINITY {
            write!(f, "Pivot({} -> {}, regret: inf)", self.from.get(), self.to.get())
        } else {
            write!(
                f,
                "Pivot({} -> {}, regret: {})",
                self.from.get(),
                self.to.get(),
                self.regret
            )
        }
    }
}

/// Chooses the edge to branch on.
pub trait PivotRule<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the rule.
    fn name(&self) -> &str;

    /// Returns the pivot for `node`, or `None` if no undecided zero cell
    /// exists.
    fn select(&mut self, node: &PartialSolution<T>) -> Option<Pivot<T>>;
}

impl<T> std::fmt::Debug for dyn PivotRule<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PivotRule({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn PivotRule<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PivotRule({})", self.name())
    }
}

impl<T, R> PivotRule<T> for &mut R
where
    T: SolverNumeric,
    R: PivotRule<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn select(&mut self, node: &PartialSolution<T>) -> Option<Pivot<T>> {
        (**self).select(node)
    }
}
