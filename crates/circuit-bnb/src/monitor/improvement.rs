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

//! Streaming of improving tours
//!
//! `ImprovementWriter` prints one line per improving tour to any
//! `io::Write`, in the order the search finds them. The last line written
//! is the best tour of the run. Write failures never interrupt the search:
//! the first error is kept and handed back by `into_inner`.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::PartialSolution,
    pivot::Pivot,
    stats::BnbSolverStatistics,
};
use circuit_core::num::SolverNumeric;
use circuit_model::{matrix::DistanceMatrix, tour::Tour};
use std::{io, marker::PhantomData};

/// Writes every improving tour as `cost: C [0->a->...->0]`.
#[derive(Debug)]
pub struct ImprovementWriter<T, W>
where
    W: io::Write,
{
    writer: W,
    lines_written: u64,
    error: Option<io::Error>,
    _marker: PhantomData<T>,
}

impl<T, W> ImprovementWriter<T, W>
where
    W: io::Write,
{
    #[inline]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
            error: None,
            _marker: PhantomData,
        }
    }

    /// Number of tours written successfully.
    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Returns the writer, or the first error hit while writing to it.
    pub fn into_inner(self) -> Result<W, io::Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writer),
        }
    }
}

impl<T, W> TreeSearchMonitor<T> for ImprovementWriter<T, W>
where
    T: SolverNumeric,
    W: io::Write,
{
    fn name(&self) -> &str {
        "ImprovementWriter"
    }

    fn on_enter_search(&mut self, _matrix: &DistanceMatrix<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        if self.error.is_none()
            && let Err(err) = self.writer.flush()
        {
            log::warn!("failed to flush improving tours: {}", err);
            self.error = Some(err);
        }
    }

    fn on_step(&mut self, _node: &PartialSolution<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_prune(
        &mut self,
        _node: &PartialSolution<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_branch(
        &mut self,
        _node: &PartialSolution<T>,
        _pivot: Pivot<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_solution_found(&mut self, tour: &Tour<T>, _statistics: &BnbSolverStatistics<T>) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.writer, "{}", tour) {
            Ok(()) => self.lines_written += 1,
            Err(err) => {
                log::warn!("failed to write improving tour: {}", err);
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::index::NodeIndex;

    fn tour(cost: i64, order: &[usize]) -> Tour<i64> {
        Tour::new(cost, order.iter().copied().map(NodeIndex::new).collect())
    }

    /// A writer that fails on every call.
    #[derive(Debug)]
    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
    }

    #[test]
    fn test_writes_one_line_per_tour() {
        let stats = BnbSolverStatistics::default();
        let mut writer = ImprovementWriter::<i64, _>::new(Vec::new());
        writer.on_solution_found(&tour(40, &[0, 2, 1]), &stats);
        writer.on_solution_found(&tour(35, &[0, 1, 2]), &stats);
        writer.on_exit_search(&stats);
        assert_eq!(writer.lines_written(), 2);

        let bytes = writer.into_inner().expect("vec writes cannot fail");
        let text = String::from_utf8(bytes).expect("tours are ascii");
        assert_eq!(text, "cost: 40 [0->2->1->0]\ncost: 35 [0->1->2->0]\n");
    }

    #[test]
    fn test_first_error_is_kept() {
        let stats = BnbSolverStatistics::default();
        let mut writer = ImprovementWriter::<i64, _>::new(Broken);
        writer.on_solution_found(&tour(1, &[0, 1]), &stats);
        writer.on_solution_found(&tour(0, &[0, 1]), &stats);
        writer.on_exit_search(&stats);
        assert_eq!(writer.lines_written(), 0);
        let err = writer.into_inner().expect_err("broken writer must fail");
        assert_eq!(err.to_string(), "closed");
    }
}
