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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets you mix logging, tour output and
//! early stopping without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::PartialSolution,
    pivot::Pivot,
    stats::BnbSolverStatistics,
};
use circuit_core::num::SolverNumeric;
use circuit_model::{matrix::DistanceMatrix, tour::Tour};

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity`
    /// monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns a slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    /// Returns the number of monitors contained in the composite monitor.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, matrix: &DistanceMatrix<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(matrix, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        node: &PartialSolution<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(node, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, node: &PartialSolution<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_step(node, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        node: &PartialSolution<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(node, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_branch(
        &mut self,
        node: &PartialSolution<T>,
        pivot: Pivot<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_branch(node, pivot, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(tour, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_model::index::NodeIndex;
    use std::{cell::RefCell, rc::Rc};

    type I = i64;

    /// Records the name of every callback into a shared log.
    struct Recorder {
        id: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        stop: bool,
    }

    impl TreeSearchMonitor<I> for Recorder {
        fn name(&self) -> &str {
            self.id
        }
        fn on_enter_search(&mut self, _: &DistanceMatrix<I>, _: &BnbSolverStatistics<I>) {
            self.log.borrow_mut().push(format!("{}:enter", self.id));
        }
        fn on_exit_search(&mut self, _: &BnbSolverStatistics<I>) {
            self.log.borrow_mut().push(format!("{}:exit", self.id));
        }
        fn search_command(
            &mut self,
            _: &PartialSolution<I>,
            _: &BnbSolverStatistics<I>,
        ) -> SearchCommand {
            self.log.borrow_mut().push(format!("{}:command", self.id));
            if self.stop {
                SearchCommand::Terminate(self.id.to_string())
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _: &PartialSolution<I>, _: &BnbSolverStatistics<I>) {}
        fn on_prune(&mut self, _: &PartialSolution<I>, r: PruneReason, _: &BnbSolverStatistics<I>) {
            self.log.borrow_mut().push(format!("{}:prune:{}", self.id, r));
        }
        fn on_branch(&mut self, _: &PartialSolution<I>, _: Pivot<I>, _: &BnbSolverStatistics<I>) {}
        fn on_solution_found(&mut self, t: &Tour<I>, _: &BnbSolverStatistics<I>) {
            self.log.borrow_mut().push(format!("{}:solution:{}", self.id, t.cost()));
        }
    }

    fn fixture() -> (DistanceMatrix<I>, PartialSolution<I>) {
        let matrix = DistanceMatrix::from_rows(&[[0i64, 1], [1, 0]]);
        let root = PartialSolution::root(&matrix);
        (matrix, root)
    }

    #[test]
    fn test_events_fan_out_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
        for id in ["a", "b"] {
            composite.add_monitor(Recorder {
                id,
                log: Rc::clone(&log),
                stop: false,
            });
        }
        assert_eq!(composite.len(), 2);

        let (matrix, root) = fixture();
        let stats = BnbSolverStatistics::default();
        let tour = Tour::new(2, vec![NodeIndex::new(0), NodeIndex::new(1)]);
        composite.on_enter_search(&matrix, &stats);
        composite.on_prune(&root, PruneReason::NoPivot, &stats);
        composite.on_solution_found(&tour, &stats);
        composite.on_exit_search(&stats);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:enter",
                "b:enter",
                "a:prune:NoPivot",
                "b:prune:NoPivot",
                "a:solution:2",
                "b:solution:2",
                "a:exit",
                "b:exit"
            ]
        );
    }

    #[test]
    fn test_search_command_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let monitors: Vec<Box<dyn TreeSearchMonitor<I>>> = vec![
            Box::new(Recorder {
                id: "first",
                log: Rc::clone(&log),
                stop: true,
            }),
            Box::new(Recorder {
                id: "second",
                log: Rc::clone(&log),
                stop: true,
            }),
        ];
        let mut composite: CompositeTreeSearchMonitor<'_, I> = monitors.into_iter().collect();

        let (_, root) = fixture();
        let cmd = composite.search_command(&root, &BnbSolverStatistics::default());
        assert_eq!(cmd, SearchCommand::Terminate("first".to_string()));
        assert_eq!(*log.borrow(), vec!["first:command"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<I>::new();
        assert!(composite.is_empty());
        let (_, root) = fixture();
        assert_eq!(
            composite.search_command(&root, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
