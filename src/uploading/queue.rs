//! Priority-ordered composite of upload strategies.

use super::options::UploadOptions;
use super::state::OperationOutcome;
use super::target::UploadTarget;
use super::UploadStrategy;
use crate::core::{Error, Result, UploadedFile};

/// Runs attached strategies by descending priority.
///
/// The run stops after the first strategy whose state carries
/// [`StrategyState::BREAK`](super::StrategyState::BREAK). The queue reports
/// the outcome of the last strategy it actually executed.
///
/// Attaching or detaching requires `&mut self`, so the queue cannot change
/// shape while [`invoke`](UploadStrategy::invoke) runs. Wrap it in a `Mutex`
/// to share it between threads.
#[derive(Debug, Default)]
pub struct StrategiesQueue {
    /// Attached strategies, in insertion order.
    strategies: Vec<(i64, Box<dyn UploadStrategy>)>,
    options: Option<UploadOptions>,
    /// Priorities in execution order, rebuilt lazily after attach/detach.
    sorted: Option<Vec<i64>>,
    last_executed: Option<i64>,
}

impl StrategiesQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from strategies whose priorities are known to be distinct.
    pub(super) fn from_distinct(strategies: Vec<(i64, Box<dyn UploadStrategy>)>) -> Self {
        Self {
            strategies,
            ..Self::default()
        }
    }

    /// Attach `strategy` with `priority`; higher priorities run first.
    ///
    /// When the queue already has options and the strategy has none, the
    /// queue's options are handed to it.
    pub fn attach<S: UploadStrategy + 'static>(
        &mut self,
        strategy: S,
        priority: i64,
    ) -> Result<&mut Self> {
        self.attach_boxed(Box::new(strategy), priority)
    }

    pub fn attach_boxed(
        &mut self,
        mut strategy: Box<dyn UploadStrategy>,
        priority: i64,
    ) -> Result<&mut Self> {
        if self.contains(priority) {
            return Err(Error::DuplicatePriority(priority));
        }
        if let Some(options) = &self.options {
            if strategy.options().is_none() {
                strategy.set_options(options.clone())?;
            }
        }
        tracing::debug!(priority, "upload strategy attached");
        self.strategies.push((priority, strategy));
        self.invalidate();
        Ok(self)
    }

    /// Detach the strategy with `priority`.
    pub fn detach(&mut self, priority: i64) -> Option<Box<dyn UploadStrategy>> {
        let index = self.strategies.iter().position(|(p, _)| *p == priority)?;
        let (_, strategy) = self.strategies.remove(index);
        self.invalidate();
        Some(strategy)
    }

    #[inline]
    pub fn contains(&self, priority: i64) -> bool {
        self.strategies.iter().any(|(p, _)| *p == priority)
    }

    pub fn get(&self, priority: i64) -> Option<&dyn UploadStrategy> {
        self.strategies
            .iter()
            .find(|(p, _)| *p == priority)
            .map(|(_, strategy)| strategy.as_ref())
    }

    pub fn get_mut(&mut self, priority: i64) -> Option<&mut (dyn UploadStrategy + 'static)> {
        self.strategies
            .iter_mut()
            .find(|(p, _)| *p == priority)
            .map(|(_, strategy)| strategy.as_mut())
    }

    /// Attached strategies with their priorities, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &dyn UploadStrategy)> {
        self.strategies
            .iter()
            .map(|(priority, strategy)| (*priority, strategy.as_ref()))
    }

    /// Priorities in insertion order.
    pub fn priorities(&self) -> Vec<i64> {
        self.strategies.iter().map(|(priority, _)| *priority).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Priority of the strategy the last run ended on.
    #[inline]
    pub fn last_executed(&self) -> Option<i64> {
        self.last_executed
    }

    fn invalidate(&mut self) {
        self.sorted = None;
        self.last_executed = None;
    }

    fn execution_order(&mut self) -> Vec<i64> {
        self.sorted
            .get_or_insert_with(|| {
                let mut priorities: Vec<i64> =
                    self.strategies.iter().map(|(priority, _)| *priority).collect();
                priorities.sort_unstable_by(|a, b| b.cmp(a));
                priorities
            })
            .clone()
    }
}

impl UploadStrategy for StrategiesQueue {
    /// Store `options` and hand them to every strategy that has none yet.
    fn set_options(&mut self, options: UploadOptions) -> Result<()> {
        for (_, strategy) in &mut self.strategies {
            if strategy.options().is_none() {
                strategy.set_options(options.clone())?;
            }
        }
        self.options = Some(options);
        Ok(())
    }

    fn options(&self) -> Option<&UploadOptions> {
        self.options.as_ref()
    }

    fn invoke(&mut self, file: &UploadedFile, target: &UploadTarget) -> Result<()> {
        self.last_executed = None;

        for priority in self.execution_order() {
            let Some(strategy) = self
                .strategies
                .iter_mut()
                .find(|(p, _)| *p == priority)
                .map(|(_, strategy)| strategy)
            else {
                continue;
            };

            self.last_executed = Some(priority);
            strategy.invoke(file, target)?;

            let state = strategy.state();
            tracing::debug!(
                priority,
                state = ?state,
                error = strategy.operation_error().map(|code| code.as_str()),
                "upload strategy executed"
            );
            if state.is_some_and(|state| state.is_break()) {
                break;
            }
        }
        Ok(())
    }

    fn outcome(&self) -> Option<&OperationOutcome> {
        let priority = self.last_executed?;
        self.get(priority)?.outcome()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::uploading::testing::{Decision, FakeStrategy, COZ, FOO};
    use crate::uploading::{ErrorCode, StrategyState};
    use serde_json::json;

    fn file() -> UploadedFile {
        UploadedFile::builder().build().unwrap()
    }

    fn target() -> UploadTarget {
        UploadTarget::new("foo").unwrap()
    }

    fn options(value: serde_json::Value) -> UploadOptions {
        UploadOptions::try_from(value).unwrap()
    }

    #[test]
    fn test_attach_rejects_duplicate_priority() {
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::detached(Decision::Success), 100)
            .unwrap();
        let err = queue
            .attach(FakeStrategy::detached(Decision::Success), 100)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicatePriority(100)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_kept() -> Result<()> {
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::detached(Decision::Success), 100)?
            .attach(FakeStrategy::detached(Decision::Success), 300)?
            .attach(FakeStrategy::detached(Decision::Success), 200)?;
        assert_eq!(queue.priorities(), vec![100, 300, 200]);
        assert_eq!(queue.iter().count(), 3);
        Ok(())
    }

    #[test]
    fn test_detach() {
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::detached(Decision::Success), 100)
            .unwrap();
        assert!(queue.detach(200).is_none());
        assert!(queue.detach(100).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_runs_by_descending_priority_until_break() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::new("low", Decision::Success, journal.clone()), 100)
            .unwrap();
        queue
            .attach(FakeStrategy::new("high", Decision::Success, journal.clone()), 300)
            .unwrap();
        queue
            .attach(FakeStrategy::new("mid", Decision::Fail(COZ), journal.clone()), 200)
            .unwrap();

        queue.invoke(&file(), &target()).unwrap();

        assert_eq!(*journal.lock().unwrap(), vec!["high", "mid"]);
        assert_eq!(queue.last_executed(), Some(200));
        assert_eq!(queue.operation_error(), Some(COZ));
        assert_eq!(queue.operation_error_description(), Some("con"));
        assert_eq!(
            queue.state(),
            Some(StrategyState::FAILURE | StrategyState::BREAK)
        );
        assert!(queue.has_operation_error());
    }

    #[test]
    fn test_reports_last_strategy_after_full_run() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::new("first", Decision::Success, journal.clone()), 2)
            .unwrap();
        queue
            .attach(FakeStrategy::new("last", Decision::Nothing, journal.clone()), 1)
            .unwrap();

        queue.invoke(&file(), &target()).unwrap();

        assert_eq!(*journal.lock().unwrap(), vec!["first", "last"]);
        assert_eq!(queue.last_executed(), Some(1));
        // the last strategy never decided
        assert_eq!(queue.state(), None);
        assert!(!queue.has_operation_error());
    }

    #[test]
    fn test_unknown_error_code_is_propagated() {
        let mut queue = StrategiesQueue::new();
        queue
            .attach(
                FakeStrategy::detached(Decision::Fail(ErrorCode::new("unspecified_error"))),
                1,
            )
            .unwrap();
        assert!(matches!(
            queue.invoke(&file(), &target()),
            Err(Error::UnexpectedErrorCode("unspecified_error"))
        ));
    }

    #[test]
    fn test_state_is_reset_by_attach() {
        let mut queue = StrategiesQueue::new();
        queue
            .attach(FakeStrategy::detached(Decision::Fail(FOO)), 1)
            .unwrap();
        queue.invoke(&file(), &target()).unwrap();
        assert_eq!(queue.operation_error(), Some(FOO));

        queue
            .attach(FakeStrategy::detached(Decision::Success), 2)
            .unwrap();
        assert_eq!(queue.state(), None);
        assert_eq!(queue.operation_error(), None);
    }

    #[test]
    fn test_empty_queue_reports_nothing() {
        let mut queue = StrategiesQueue::new();
        queue.invoke(&file(), &target()).unwrap();
        assert_eq!(queue.state(), None);
        assert_eq!(queue.operation_error_description(), None);
    }

    #[test]
    fn test_set_options_propagates_to_strategies_without_options() {
        let own = options(json!({"foo": "own"}));
        let shared = options(json!({"foo": "shared"}));

        let mut configured = FakeStrategy::detached(Decision::Success);
        configured.set_options(own.clone()).unwrap();

        let mut queue = StrategiesQueue::new();
        queue.attach(configured, 1).unwrap();
        queue
            .attach(FakeStrategy::detached(Decision::Success), 2)
            .unwrap();
        queue.set_options(shared.clone()).unwrap();

        assert_eq!(queue.options(), Some(&shared));
        assert_eq!(queue.get(1).unwrap().options(), Some(&own));
        assert_eq!(queue.get(2).unwrap().options(), Some(&shared));
    }

    #[test]
    fn test_attach_back_propagates_options() {
        let shared = options(json!({"foo": "shared"}));
        let own = options(json!({"foo": "own"}));

        let mut queue = StrategiesQueue::new();
        queue.set_options(shared.clone()).unwrap();
        queue
            .attach(FakeStrategy::detached(Decision::Success), 1)
            .unwrap();

        let mut configured = FakeStrategy::detached(Decision::Success);
        configured.set_options(own.clone()).unwrap();
        queue.attach(configured, 2).unwrap();

        assert_eq!(queue.get(1).unwrap().options(), Some(&shared));
        assert_eq!(queue.get(2).unwrap().options(), Some(&own));
    }

    #[test]
    fn test_nested_queue() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut inner = StrategiesQueue::new();
        inner
            .attach(FakeStrategy::new("inner", Decision::Fail(FOO), journal.clone()), 1)
            .unwrap();

        let mut outer = StrategiesQueue::new();
        outer.attach(inner, 2).unwrap();
        outer
            .attach(FakeStrategy::new("after", Decision::Success, journal.clone()), 1)
            .unwrap();

        outer.invoke(&file(), &target()).unwrap();
        assert_eq!(*journal.lock().unwrap(), vec!["inner"]);
        assert_eq!(outer.operation_error(), Some(FOO));
    }
}
