//! Download task registry and orchestration loop.
//!
//! The registry owns the id-to-task map and is the only place task state is
//! mutated. It enforces at most one in-flight download per resource id while
//! letting unrelated ids download concurrently, and runs the permission,
//! strategy-fallback, and delivery phases for each task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::download::progress::{AttemptProgress, ProgressReporter};
use crate::download::strategy::{DownloadStrategy, StrategyOutcome};
use crate::download::task::{DownloadRequest, DownloadTask};
use crate::platform::delivery::DeliverySink;
use crate::platform::permission::{PermissionGate, PermissionStatus};

type TaskHandle = Arc<Mutex<DownloadTask>>;

/// Orchestrates downloads: one task per resource id, strategies tried in
/// order, a single terminal notification per task.
pub struct DownloadRegistry {
    tasks: Mutex<HashMap<String, TaskHandle>>,
    strategies: Vec<Arc<dyn DownloadStrategy>>,
    gate: Arc<dyn PermissionGate>,
    sink: Arc<dyn DeliverySink>,
    reporter: Arc<dyn ProgressReporter>,
}

impl DownloadRegistry {
    pub fn new(
        strategies: Vec<Arc<dyn DownloadStrategy>>,
        gate: Arc<dyn PermissionGate>,
        sink: Arc<dyn DeliverySink>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            strategies,
            gate,
            sink,
            reporter,
        }
    }

    /// Start a download for `id`.
    ///
    /// Returns `false` immediately, with no state change, when a task for
    /// `id` is already in flight. Otherwise runs the task to a terminal state
    /// and returns `true`; the outcome itself is reported through the
    /// [`ProgressReporter`] as exactly one `on_complete` or `on_failed`.
    pub async fn start(&self, id: &str, source_url: &str, suggested_name: Option<&str>) -> bool {
        let handle = {
            let mut tasks = self.tasks.lock().await;
            if tasks.contains_key(id) {
                tracing::debug!(id, "download already in progress, rejecting start");
                return false;
            }

            match DownloadTask::new(id, source_url, suggested_name) {
                Ok(task) => {
                    let handle = Arc::new(Mutex::new(task));
                    tasks.insert(id.to_string(), handle.clone());
                    handle
                }
                Err(e) => {
                    drop(tasks);
                    // Nothing was registered; still a terminal outcome for
                    // the caller.
                    self.reporter.on_failed(id, &e.to_string()).await;
                    return true;
                }
            }
        };

        self.run(id, handle).await;
        true
    }

    /// Last known progress percentage for an active task.
    ///
    /// Prefer the reporter channel; this is for polling callers. Terminal
    /// tasks are dropped from the registry and yield `None`.
    pub async fn progress(&self, id: &str) -> Option<u8> {
        let handle = { self.tasks.lock().await.get(id).cloned() }?;
        let task = handle.lock().await;
        Some(task.progress_percent)
    }

    async fn run(&self, id: &str, handle: TaskHandle) {
        {
            handle.lock().await.begin_permission();
        }

        // Permission failures block every strategy equally, so they never
        // trigger fallback.
        match self.resolve_permission().await {
            PermissionStatus::Granted => {}
            PermissionStatus::Blocked => {
                self.finish_failed(
                    id,
                    &handle,
                    "storage access is blocked; enable it in your system settings",
                )
                .await;
                return;
            }
            PermissionStatus::Denied => {
                self.finish_failed(id, &handle, "storage permission was denied")
                    .await;
                return;
            }
        }

        let request = { handle.lock().await.request() };

        for (index, strategy) in self.strategies.iter().enumerate() {
            let had_progress = { handle.lock().await.begin_attempt(index) };
            if had_progress {
                // Observers saw progress from the failed attempt; reset them
                self.reporter.on_progress(id, 0).await;
            }

            tracing::debug!(id, strategy = strategy.name(), "attempting download");
            let progress =
                AttemptProgress::new(id.to_string(), handle.clone(), self.reporter.clone());

            match strategy.attempt(&request, &progress).await {
                Ok(outcome) => {
                    self.deliver(id, &handle, &request, outcome).await;
                    return;
                }
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!(
                        id,
                        strategy = strategy.name(),
                        error = %reason,
                        "download strategy failed"
                    );
                    handle.lock().await.record_strategy_error(reason);
                }
            }
        }

        let reason = {
            let mut task = handle.lock().await;
            task.exhaust(self.strategies.len());
            task.last_error
                .clone()
                .unwrap_or_else(|| "no download strategies available".to_string())
        };
        self.finish_failed(id, &handle, &reason).await;
    }

    async fn resolve_permission(&self) -> PermissionStatus {
        match self.gate.check().await {
            PermissionStatus::Denied => self.gate.request().await,
            status => status,
        }
    }

    /// Delivery phase: sink success, not strategy completion, completes the
    /// task. A sink failure is terminal even though the bytes were retrieved.
    async fn deliver(
        &self,
        id: &str,
        handle: &TaskHandle,
        request: &DownloadRequest,
        outcome: StrategyOutcome,
    ) {
        {
            handle.lock().await.begin_delivery();
        }

        match outcome {
            StrategyOutcome::Delegated => {
                // The external handler owns the download now; there is
                // nothing local to hand to the sink.
                self.finish_completed(id, handle).await;
            }
            StrategyOutcome::Fetched(path) => {
                match self
                    .sink
                    .deliver(&path, &request.file_name, request.mime_type)
                    .await
                {
                    Ok(dest) => {
                        tracing::info!(id, path = %dest.display(), "download delivered");
                        self.finish_completed(id, handle).await;
                    }
                    Err(e) => {
                        self.finish_failed(
                            id,
                            handle,
                            &format!("downloaded but could not be delivered: {}", e),
                        )
                        .await;
                    }
                }
            }
        }
    }

    async fn finish_completed(&self, id: &str, handle: &TaskHandle) {
        {
            handle.lock().await.complete();
        }
        self.tasks.lock().await.remove(id);
        self.reporter.on_complete(id).await;
    }

    async fn finish_failed(&self, id: &str, handle: &TaskHandle, reason: &str) {
        {
            handle.lock().await.fail(reason.to_string());
        }
        self.tasks.lock().await.remove(id);
        self.reporter.on_failed(id, reason).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::strategy::StrategyError;
    use crate::platform::delivery::DeliveryError;

    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Progress(String, u8),
        Complete(String),
        Failed(String, String),
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: std::sync::Mutex<Vec<Event>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn events_for(&self, id: &str) -> Vec<Event> {
            self.events()
                .into_iter()
                .filter(|e| match e {
                    Event::Progress(i, _) | Event::Complete(i) | Event::Failed(i, _) => i == id,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ProgressReporter for RecordingReporter {
        async fn on_progress(&self, id: &str, percent: u8) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Progress(id.to_string(), percent));
        }

        async fn on_complete(&self, id: &str) {
            self.events.lock().unwrap().push(Event::Complete(id.to_string()));
        }

        async fn on_failed(&self, id: &str, reason: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Failed(id.to_string(), reason.to_string()));
        }
    }

    enum Behavior {
        Fail(&'static str),
        ProgressThenFail(Vec<u8>, &'static str),
        Succeed(Vec<u8>),
        Delegate,
        WaitThenSucceed(Arc<Notify>),
    }

    struct ScriptedStrategy {
        label: &'static str,
        behavior: Behavior,
        attempts: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    fn strategy_error(message: &str) -> StrategyError {
        StrategyError::Filesystem(std::io::Error::new(std::io::ErrorKind::Other, message))
    }

    #[async_trait]
    impl DownloadStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn attempt(
            &self,
            _request: &DownloadRequest,
            progress: &AttemptProgress,
        ) -> Result<StrategyOutcome, StrategyError> {
            self.attempts.lock().unwrap().push(self.label);
            match &self.behavior {
                Behavior::Fail(message) => Err(strategy_error(message)),
                Behavior::ProgressThenFail(percents, message) => {
                    for percent in percents {
                        progress.update(*percent).await;
                    }
                    Err(strategy_error(message))
                }
                Behavior::Succeed(percents) => {
                    for percent in percents {
                        progress.update(*percent).await;
                    }
                    Ok(StrategyOutcome::Fetched(PathBuf::from("/staged/artifact")))
                }
                Behavior::Delegate => Ok(StrategyOutcome::Delegated),
                Behavior::WaitThenSucceed(release) => {
                    release.notified().await;
                    Ok(StrategyOutcome::Fetched(PathBuf::from("/staged/artifact")))
                }
            }
        }
    }

    struct StaticGate {
        check: PermissionStatus,
        request: PermissionStatus,
    }

    #[async_trait]
    impl PermissionGate for StaticGate {
        async fn check(&self) -> PermissionStatus {
            self.check
        }

        async fn request(&self) -> PermissionStatus {
            self.request
        }
    }

    fn granted_gate() -> Arc<StaticGate> {
        Arc::new(StaticGate {
            check: PermissionStatus::Granted,
            request: PermissionStatus::Granted,
        })
    }

    #[derive(Default)]
    struct CountingSink {
        delivered: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DeliverySink for CountingSink {
        async fn deliver(
            &self,
            artifact: &Path,
            _file_name: &str,
            _mime_type: &str,
        ) -> Result<PathBuf, DeliveryError> {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DeliveryError::NoDestination(
                    "no application can receive the file".to_string(),
                ))
            } else {
                Ok(artifact.to_path_buf())
            }
        }
    }

    struct Fixture {
        registry: Arc<DownloadRegistry>,
        reporter: Arc<RecordingReporter>,
        sink: Arc<CountingSink>,
        attempts: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl Fixture {
        fn attempts(&self) -> Vec<&'static str> {
            self.attempts.lock().unwrap().clone()
        }
    }

    fn fixture_with(
        behaviors: Vec<(&'static str, Behavior)>,
        gate: Arc<dyn PermissionGate>,
        sink_fails: bool,
    ) -> Fixture {
        let attempts = Arc::new(std::sync::Mutex::new(Vec::new()));
        let strategies: Vec<Arc<dyn DownloadStrategy>> = behaviors
            .into_iter()
            .map(|(label, behavior)| {
                Arc::new(ScriptedStrategy {
                    label,
                    behavior,
                    attempts: attempts.clone(),
                }) as Arc<dyn DownloadStrategy>
            })
            .collect();

        let reporter = Arc::new(RecordingReporter::default());
        let sink = Arc::new(CountingSink {
            delivered: AtomicUsize::new(0),
            fail: sink_fails,
        });

        let registry = Arc::new(DownloadRegistry::new(
            strategies,
            gate,
            sink.clone(),
            reporter.clone(),
        ));

        Fixture {
            registry,
            reporter,
            sink,
            attempts,
        }
    }

    fn fixture(behaviors: Vec<(&'static str, Behavior)>) -> Fixture {
        fixture_with(behaviors, granted_gate(), false)
    }

    const URL: &str = "https://cdn.example.com/books/guide.pdf";

    #[tokio::test]
    async fn test_single_strategy_success_event_sequence() {
        let f = fixture(vec![("s0", Behavior::Succeed(vec![10, 55, 100]))]);

        assert!(f.registry.start("res-1", URL, None).await);

        assert_eq!(
            f.reporter.events(),
            vec![
                Event::Progress("res-1".to_string(), 10),
                Event::Progress("res-1".to_string(), 55),
                Event::Progress("res-1".to_string(), 100),
                Event::Complete("res-1".to_string()),
            ]
        );
        assert_eq!(f.sink.delivered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_order_first_fails_second_succeeds() {
        let f = fixture(vec![
            ("s0", Behavior::Fail("network error")),
            ("s1", Behavior::Succeed(vec![10, 55, 100])),
            ("s2", Behavior::Fail("unreachable")),
        ]);

        assert!(f.registry.start("res-1", URL, None).await);

        // Strategies tried strictly in order, third never reached
        assert_eq!(f.attempts(), vec!["s0", "s1"]);

        // First attempt emitted no progress, so the observed sequence has no
        // leading reset
        assert_eq!(
            f.reporter.events(),
            vec![
                Event::Progress("res-1".to_string(), 10),
                Event::Progress("res-1".to_string(), 55),
                Event::Progress("res-1".to_string(), 100),
                Event::Complete("res-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_resets_observed_progress_to_zero() {
        let f = fixture(vec![
            ("s0", Behavior::ProgressThenFail(vec![40], "stream cut")),
            ("s1", Behavior::Succeed(vec![100])),
        ]);

        assert!(f.registry.start("res-1", URL, None).await);

        assert_eq!(
            f.reporter.events(),
            vec![
                Event::Progress("res-1".to_string(), 40),
                Event::Progress("res-1".to_string(), 0),
                Event::Progress("res-1".to_string(), 100),
                Event::Complete("res-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_fails_with_last_error() {
        let f = fixture(vec![
            ("s0", Behavior::Fail("first error")),
            ("s1", Behavior::Fail("second error")),
            ("s2", Behavior::Fail("final error")),
        ]);

        assert!(f.registry.start("res-1", URL, None).await);

        assert_eq!(f.attempts(), vec!["s0", "s1", "s2"]);
        let events = f.reporter.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Failed(id, reason) => {
                assert_eq!(id, "res-1");
                assert!(reason.contains("final error"));
            }
            other => panic!("expected failure event, got {:?}", other),
        }

        // Terminal tasks are dropped from the registry
        assert_eq!(f.registry.progress("res-1").await, None);
    }

    #[tokio::test]
    async fn test_blocked_permission_short_circuits() {
        let gate = Arc::new(StaticGate {
            check: PermissionStatus::Blocked,
            request: PermissionStatus::Granted,
        });
        let f = fixture_with(
            vec![("s0", Behavior::Succeed(vec![100]))],
            gate,
            false,
        );

        assert!(f.registry.start("res-1", URL, None).await);

        // No strategy ran
        assert!(f.attempts().is_empty());
        let events = f.reporter.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::Failed(id, _) if id == "res-1"));
    }

    #[tokio::test]
    async fn test_denied_then_granted_proceeds() {
        let gate = Arc::new(StaticGate {
            check: PermissionStatus::Denied,
            request: PermissionStatus::Granted,
        });
        let f = fixture_with(vec![("s0", Behavior::Succeed(vec![100]))], gate, false);

        assert!(f.registry.start("res-1", URL, None).await);
        assert_eq!(f.attempts(), vec!["s0"]);
        assert!(f
            .reporter
            .events()
            .contains(&Event::Complete("res-1".to_string())));
    }

    #[tokio::test]
    async fn test_denied_twice_fails_without_strategies() {
        let gate = Arc::new(StaticGate {
            check: PermissionStatus::Denied,
            request: PermissionStatus::Denied,
        });
        let f = fixture_with(vec![("s0", Behavior::Succeed(vec![100]))], gate, false);

        assert!(f.registry.start("res-1", URL, None).await);
        assert!(f.attempts().is_empty());
        assert!(matches!(
            f.reporter.events().as_slice(),
            [Event::Failed(id, _)] if id == "res-1"
        ));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_terminal_failure() {
        let f = fixture_with(
            vec![
                ("s0", Behavior::Succeed(vec![100])),
                ("s1", Behavior::Succeed(vec![100])),
            ],
            granted_gate(),
            true,
        );

        assert!(f.registry.start("res-1", URL, None).await);

        // Fetch succeeded, delivery failed: no fallback, task failed
        assert_eq!(f.attempts(), vec!["s0"]);
        assert_eq!(f.sink.delivered.load(Ordering::SeqCst), 1);
        let events = f.reporter.events();
        match events.last() {
            Some(Event::Failed(id, reason)) => {
                assert_eq!(id, "res-1");
                assert!(reason.contains("could not be delivered"));
            }
            other => panic!("expected failure event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delegated_outcome_skips_sink() {
        // Sink is configured to fail; a delegated handoff must not touch it
        let f = fixture_with(vec![("s0", Behavior::Delegate)], granted_gate(), true);

        assert!(f.registry.start("res-1", URL, None).await);

        assert_eq!(f.sink.delivered.load(Ordering::SeqCst), 0);
        assert_eq!(
            f.reporter.events(),
            vec![Event::Complete("res-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_duplicate_start_rejected_while_active() {
        let release = Arc::new(Notify::new());
        let f = fixture(vec![("s0", Behavior::WaitThenSucceed(release.clone()))]);

        let registry = f.registry.clone();
        let first = tokio::spawn(async move { registry.start("res-1", URL, None).await });

        // Wait until the first task is registered
        while f.registry.progress("res-1").await.is_none() {
            tokio::task::yield_now().await;
        }

        // Second start for the same id is rejected without state change
        assert!(!f.registry.start("res-1", URL, None).await);

        release.notify_one();
        assert!(first.await.unwrap());

        // Exactly one terminal event
        assert_eq!(
            f.reporter.events_for("res-1"),
            vec![Event::Complete("res-1".to_string())]
        );

        // After the terminal state the id may be started again
        while f.registry.progress("res-1").await.is_some() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_invalid_request_reports_failure() {
        let f = fixture(vec![("s0", Behavior::Succeed(vec![100]))]);

        // Terminal state is still reached, via the failure channel
        assert!(f.registry.start("res-1", "not a url", None).await);
        assert!(f.attempts().is_empty());
        assert!(matches!(
            f.reporter.events().as_slice(),
            [Event::Failed(id, _)] if id == "res-1"
        ));
    }

    #[tokio::test]
    async fn test_concurrent_ids_report_independently() {
        let f = fixture(vec![("s0", Behavior::Succeed(vec![10, 55, 100]))]);

        let (registry_a, registry_b) = (f.registry.clone(), f.registry.clone());
        let a = tokio::spawn(async move {
            registry_a
                .start("res-a", "https://cdn.example.com/a.pdf", None)
                .await
        });
        let b = tokio::spawn(async move {
            registry_b
                .start("res-b", "https://cdn.example.com/b.mp3", None)
                .await
        });

        assert!(a.await.unwrap());
        assert!(b.await.unwrap());

        for id in ["res-a", "res-b"] {
            assert_eq!(
                f.reporter.events_for(id),
                vec![
                    Event::Progress(id.to_string(), 10),
                    Event::Progress(id.to_string(), 55),
                    Event::Progress(id.to_string(), 100),
                    Event::Complete(id.to_string()),
                ],
                "unexpected event sequence for {}",
                id
            );
        }
    }
}
