//! Event dispatcher: delivers events to plugins in registration order and
//! reduces their verdicts to one outcome.
//!
//! For session events:
//! - Plugins are called in registration order against one snapshot.
//! - The first `SkipRemaining` or `TerminateSession` ends delivery and
//!   becomes the outcome.
//! - A fault (error or panic) is recorded and, under
//!   [`FaultPolicy::Isolate`], counts as `Continue`.
//!
//! For lifecycle broadcasts (init/destroy):
//! - Every plugin is called regardless of individual results.
//! - All faults are collected and returned after the sweep.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use ftplet_core::config::FaultPolicy;

use super::definitions::{EventKind, SessionEvent, Verdict};
use crate::api::context::PluginContext;
use crate::diagnostics::FaultReport;
use crate::error::PluginFault;
use crate::registry::{PluginRegistry, Registration};
use crate::traits::Plugin;

/// Aggregated result of dispatching one session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// The single verdict for the event.
    pub verdict: Verdict,
    /// Plugin whose verdict (or fault, under fail-fast) ended the chain.
    pub decided_by: Option<String>,
    /// Faults recorded while delivering the event.
    pub faults: Vec<FaultReport>,
}

impl DispatchResult {
    fn unanimous_continue(faults: Vec<FaultReport>) -> Self {
        Self {
            verdict: Verdict::Continue,
            decided_by: None,
            faults,
        }
    }
}

/// Dispatches events to the plugins of one registry.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    /// Owning container name, for log fields and fault reports.
    container: String,
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
    /// Treatment of faults in session events.
    policy: FaultPolicy,
}

impl EventDispatcher {
    /// Creates a new dispatcher over `registry`.
    pub fn new(container: &str, registry: Arc<PluginRegistry>, policy: FaultPolicy) -> Self {
        Self {
            container: container.to_string(),
            registry,
            policy,
        }
    }

    /// Dispatches a session event against a fresh registry snapshot.
    pub async fn dispatch(&self, event: SessionEvent<'_>) -> DispatchResult {
        let snapshot = self.registry.snapshot().await;
        self.dispatch_to(&snapshot, event).await
    }

    /// Dispatches a session event to `entries` in order.
    pub async fn dispatch_to(
        &self,
        entries: &[Registration],
        event: SessionEvent<'_>,
    ) -> DispatchResult {
        let kind = event.kind();

        if entries.is_empty() {
            return DispatchResult::unanimous_continue(Vec::new());
        }

        debug!(
            container = %self.container,
            event = %kind,
            session = %event.session().id,
            plugin_count = entries.len(),
            "Dispatching event"
        );

        let mut faults = Vec::new();

        for entry in entries {
            let outcome = match catch_panic(Plugin::deliver(entry.plugin.as_ref(), event)).await {
                Ok(delivery) => {
                    // Already judged by the nested container's own policy.
                    faults.extend(delivery.nested_faults);
                    delivery.outcome
                }
                Err(fault) => Err(fault),
            };

            let verdict = match outcome {
                Ok(verdict) => verdict,
                Err(fault) => {
                    let report = FaultReport::new(&self.container, &entry.name, kind, &fault);
                    warn!(
                        container = %self.container,
                        plugin = %entry.name,
                        event = %kind,
                        policy = %self.policy,
                        error = %fault,
                        "Plugin fault"
                    );
                    faults.push(report);

                    match self.policy {
                        FaultPolicy::Isolate => Verdict::Continue,
                        FaultPolicy::FailFast => Verdict::TerminateSession,
                    }
                }
            };

            if verdict.stops_chain() {
                info!(
                    container = %self.container,
                    plugin = %entry.name,
                    event = %kind,
                    verdict = %verdict,
                    "Plugin ended event delivery"
                );
                return DispatchResult {
                    verdict,
                    decided_by: Some(entry.name.clone()),
                    faults,
                };
            }
        }

        DispatchResult::unanimous_continue(faults)
    }

    /// Calls `init` on every plugin in the current snapshot.
    pub async fn broadcast_init(&self, context: &PluginContext) -> Vec<FaultReport> {
        let snapshot = self.registry.snapshot().await;
        let mut faults = Vec::new();

        for entry in snapshot.iter() {
            let result = guarded(entry.plugin.init(context)).await;
            self.record_lifecycle(entry, EventKind::Init, result, &mut faults);
        }

        faults
    }

    /// Calls `destroy` on every plugin in the current snapshot.
    pub async fn broadcast_destroy(&self) -> Vec<FaultReport> {
        let snapshot = self.registry.snapshot().await;
        self.destroy_entries(&snapshot).await
    }

    /// Calls `destroy` on each of `entries` in order.
    pub async fn destroy_entries(&self, entries: &[Registration]) -> Vec<FaultReport> {
        let mut faults = Vec::new();

        for entry in entries {
            let result = guarded(entry.plugin.destroy()).await;
            self.record_lifecycle(entry, EventKind::Destroy, result, &mut faults);
        }

        faults
    }

    fn record_lifecycle(
        &self,
        entry: &Registration,
        kind: EventKind,
        result: Result<(), PluginFault>,
        faults: &mut Vec<FaultReport>,
    ) {
        match result {
            Ok(()) => {
                debug!(container = %self.container, plugin = %entry.name, event = %kind, "Plugin lifecycle ok");
            }
            Err(fault) => {
                error!(
                    container = %self.container,
                    plugin = %entry.name,
                    event = %kind,
                    error = %fault,
                    "Plugin lifecycle fault"
                );
                faults.push(FaultReport::new(&self.container, &entry.name, kind, &fault));
            }
        }
    }

    /// Returns the fault policy.
    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }

    /// Returns a reference to the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}

/// Runs a plugin future, turning a panic into a [`PluginFault`].
async fn catch_panic<T, F>(operation: F) -> Result<T, PluginFault>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(operation)
        .catch_unwind()
        .await
        .map_err(|payload| PluginFault::Panicked(panic_message(payload.as_ref())))
}

/// Like [`catch_panic`] for operations that can fail on their own.
async fn guarded<T, F>(operation: F) -> Result<T, PluginFault>
where
    F: Future<Output = Result<T, PluginFault>>,
{
    catch_panic(operation).await.and_then(|result| result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ftplet_core::types::{CommandRequest, Session};

    use super::*;
    use crate::hooks::definitions::PluginOutcome;

    /// Answers a fixed verdict (or fault) and counts its invocations.
    #[derive(Debug)]
    struct Scripted {
        answer: Answer,
        calls: AtomicUsize,
    }

    #[derive(Debug, Clone, Copy)]
    enum Answer {
        Vote(Verdict),
        Fail,
        Panic,
    }

    impl Scripted {
        fn new(answer: Answer) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer(&self) -> PluginOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Vote(verdict) => Ok(verdict),
                Answer::Fail => Err(PluginFault::new("scripted failure")),
                Answer::Panic => panic!("scripted panic"),
            }
        }
    }

    #[async_trait]
    impl Plugin for Scripted {
        async fn destroy(&self) -> Result<(), PluginFault> {
            self.answer().map(|_| ())
        }

        async fn before_command(&self, _session: &Session, _request: &CommandRequest) -> PluginOutcome {
            self.answer()
        }
    }

    async fn dispatcher_with(
        policy: FaultPolicy,
        plugins: &[(&str, Arc<Scripted>)],
    ) -> EventDispatcher {
        let registry = Arc::new(PluginRegistry::new());
        for (name, plugin) in plugins {
            registry
                .add(name, plugin.clone() as Arc<dyn Plugin>)
                .await
                .expect("add");
        }
        EventDispatcher::new("test", registry, policy)
    }

    fn session() -> Session {
        Session::new("192.0.2.10:40000".parse().expect("addr"))
    }

    async fn before_stor(dispatcher: &EventDispatcher) -> DispatchResult {
        let session = session();
        let request = CommandRequest::new("STOR", Some("upload.bin"));
        dispatcher
            .dispatch(SessionEvent::BeforeCommand {
                session: &session,
                request: &request,
            })
            .await
    }

    #[tokio::test]
    async fn test_empty_registry_continues() {
        let dispatcher = dispatcher_with(FaultPolicy::Isolate, &[]).await;
        let result = before_stor(&dispatcher).await;
        assert_eq!(result.verdict, Verdict::Continue);
        assert!(result.decided_by.is_none());
        assert!(result.faults.is_empty());
    }

    #[tokio::test]
    async fn test_full_pass_invokes_each_once() {
        let a = Scripted::new(Answer::Vote(Verdict::Continue));
        let b = Scripted::new(Answer::Vote(Verdict::Continue));
        let dispatcher =
            dispatcher_with(FaultPolicy::Isolate, &[("a", a.clone()), ("b", b.clone())]).await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::Continue);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_circuit_on_skip_remaining() {
        let a = Scripted::new(Answer::Vote(Verdict::Continue));
        let b = Scripted::new(Answer::Vote(Verdict::SkipRemaining));
        let c = Scripted::new(Answer::Vote(Verdict::TerminateSession));
        let dispatcher = dispatcher_with(
            FaultPolicy::Isolate,
            &[("a", a.clone()), ("b", b.clone()), ("c", c.clone())],
        )
        .await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::SkipRemaining);
        assert_eq!(result.decided_by.as_deref(), Some("b"));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 0);
    }

    #[tokio::test]
    async fn test_terminate_wins_when_first() {
        let a = Scripted::new(Answer::Vote(Verdict::TerminateSession));
        let b = Scripted::new(Answer::Vote(Verdict::SkipRemaining));
        let dispatcher =
            dispatcher_with(FaultPolicy::Isolate, &[("a", a.clone()), ("b", b.clone())]).await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::TerminateSession);
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn test_fault_is_isolated() {
        let a = Scripted::new(Answer::Fail);
        let b = Scripted::new(Answer::Vote(Verdict::Continue));
        let dispatcher =
            dispatcher_with(FaultPolicy::Isolate, &[("a", a.clone()), ("b", b.clone())]).await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::Continue);
        assert_eq!(b.calls(), 1);
        assert_eq!(result.faults.len(), 1);
        assert_eq!(result.faults[0].plugin, "a");
        assert_eq!(result.faults[0].event, EventKind::BeforeCommand);
        assert!(!result.faults[0].panicked);
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let a = Scripted::new(Answer::Panic);
        let b = Scripted::new(Answer::Vote(Verdict::SkipRemaining));
        let dispatcher =
            dispatcher_with(FaultPolicy::Isolate, &[("a", a.clone()), ("b", b.clone())]).await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::SkipRemaining);
        assert_eq!(b.calls(), 1);
        assert_eq!(result.faults.len(), 1);
        assert!(result.faults[0].panicked);
        assert!(result.faults[0].message.contains("scripted panic"));
    }

    #[tokio::test]
    async fn test_fail_fast_terminates_at_fault() {
        let a = Scripted::new(Answer::Fail);
        let b = Scripted::new(Answer::Vote(Verdict::Continue));
        let dispatcher =
            dispatcher_with(FaultPolicy::FailFast, &[("a", a.clone()), ("b", b.clone())]).await;

        let result = before_stor(&dispatcher).await;

        assert_eq!(result.verdict, Verdict::TerminateSession);
        assert_eq!(result.decided_by.as_deref(), Some("a"));
        assert_eq!(b.calls(), 0);
        assert_eq!(result.faults.len(), 1);
    }

    #[tokio::test]
    async fn test_destroy_broadcast_sweeps_past_faults() {
        let a = Scripted::new(Answer::Fail);
        let b = Scripted::new(Answer::Panic);
        let c = Scripted::new(Answer::Vote(Verdict::TerminateSession));
        // Broadcasts ignore the fault policy.
        let dispatcher = dispatcher_with(
            FaultPolicy::FailFast,
            &[("a", a.clone()), ("b", b.clone()), ("c", c.clone())],
        )
        .await;

        let faults = dispatcher.broadcast_destroy().await;

        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 1);
        let faulted: Vec<_> = faults.iter().map(|f| f.plugin.as_str()).collect();
        assert_eq!(faulted, vec!["a", "b"]);
        assert!(faults.iter().all(|f| f.event == EventKind::Destroy));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u32), "non-string panic payload");
    }
}
