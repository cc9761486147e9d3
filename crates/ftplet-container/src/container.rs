//! Plugin container: owns a registry and a dispatcher and presents the
//! plugin capability set to the protocol engine.
//!
//! The container implements [`Plugin`] itself, so it can be registered
//! inside another container.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use ftplet_core::config::FaultPolicy;
use ftplet_core::config::container::ContainerConfig;
use ftplet_core::types::{CommandRequest, Reply, Session};

use crate::api::context::PluginContext;
use crate::diagnostics::{Diagnostics, FaultReport};
use crate::error::{PluginError, PluginFault};
use crate::hooks::definitions::{Delivery, PluginOutcome, SessionEvent, Verdict};
use crate::hooks::dispatcher::{DispatchResult, EventDispatcher};
use crate::registry::{PluginRegistry, Registration};
use crate::traits::Plugin;

/// Ordered set of named plugins with event forwarding.
#[derive(Debug)]
pub struct PluginContainer {
    /// Container name.
    name: String,
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
    /// Event dispatcher over `registry`.
    dispatcher: EventDispatcher,
    /// Fault report channel.
    diagnostics: Diagnostics,
    /// Set once `shutdown` has run.
    shut_down: AtomicBool,
}

impl PluginContainer {
    /// Creates an empty container that isolates plugin faults.
    pub fn new(name: &str) -> Self {
        Self::with_policy(name, FaultPolicy::Isolate)
    }

    /// Creates an empty container with the given fault policy.
    pub fn with_policy(name: &str, policy: FaultPolicy) -> Self {
        Self::build(name, policy, Diagnostics::default())
    }

    /// Creates an empty container from configuration.
    pub fn from_config(config: &ContainerConfig) -> Self {
        Self::build(
            &config.name,
            config.fault_policy,
            Diagnostics::new(config.diagnostics_capacity),
        )
    }

    fn build(name: &str, policy: FaultPolicy, diagnostics: Diagnostics) -> Self {
        let registry = Arc::new(PluginRegistry::new());
        let dispatcher = EventDispatcher::new(name, registry.clone(), policy);

        Self {
            name: name.to_string(),
            registry,
            dispatcher,
            diagnostics,
            shut_down: AtomicBool::new(false),
        }
    }

    // ── Management ──

    /// Registers a plugin at the end of the dispatch order.
    pub async fn add(&self, name: &str, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        self.registry.add(name, plugin).await
    }

    /// Removes a plugin, returning it if it was registered.
    ///
    /// The removed plugin is not destroyed; see
    /// [`remove_and_destroy`](Self::remove_and_destroy).
    pub async fn remove(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.registry.remove(name).await
    }

    /// Removes a plugin and calls its `destroy`.
    ///
    /// Returns `None` if nothing was registered under `name`, otherwise the
    /// destroy faults (empty on success). Other mutations wait until the
    /// destroy has finished.
    pub async fn remove_and_destroy(&self, name: &str) -> Option<Vec<FaultReport>> {
        let writer = self.registry.writer().await;
        let plugin = writer.remove(name).await?;
        let faults = self
            .dispatcher
            .destroy_entries(&[Registration::new(name, plugin)])
            .await;
        drop(writer);

        self.diagnostics.publish(&faults);
        Some(faults)
    }

    /// Gets a plugin by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.registry.get(name).await
    }

    /// Lists all registrations in dispatch order.
    pub async fn list(&self) -> Vec<Registration> {
        self.registry.list().await
    }

    /// Replaces the whole plugin set.
    ///
    /// The new set is validated first; on a duplicate name nothing is
    /// discarded, destroyed or installed. Otherwise the previous plugins are
    /// discarded, destroyed in their old order, and only then is the new set
    /// installed. Dispatches running meanwhile see either the old set, no
    /// plugins, or the new set. Other mutations wait for the whole sequence,
    /// so a `destroy` must not mutate this container.
    pub async fn replace_all<I>(&self, plugins: I) -> Result<Vec<FaultReport>, PluginError>
    where
        I: IntoIterator<Item = (String, Arc<dyn Plugin>)>,
    {
        let next = PluginRegistry::validate(plugins)?;
        let installed = next.len();

        let writer = self.registry.writer().await;
        let previous = writer.install(Vec::new()).await;
        let faults = self.dispatcher.destroy_entries(&previous).await;
        writer.install(next).await;
        drop(writer);

        self.diagnostics.publish(&faults);

        info!(
            container = %self.name,
            destroyed = previous.len(),
            installed = installed,
            faults = faults.len(),
            "Plugin set replaced"
        );

        Ok(faults)
    }

    // ── Engine-facing events ──

    /// Forwards a new connection.
    pub async fn notify_connect(&self, session: &Session) -> Verdict {
        self.forward(SessionEvent::Connect { session }).await
    }

    /// Forwards a disconnection.
    pub async fn notify_disconnect(&self, session: &Session) -> Verdict {
        self.forward(SessionEvent::Disconnect { session }).await
    }

    /// Forwards a command before execution.
    pub async fn before_command(&self, session: &Session, request: &CommandRequest) -> Verdict {
        self.forward(SessionEvent::BeforeCommand { session, request })
            .await
    }

    /// Forwards a command after execution.
    pub async fn after_command(
        &self,
        session: &Session,
        request: &CommandRequest,
        reply: &Reply,
    ) -> Verdict {
        self.forward(SessionEvent::AfterCommand {
            session,
            request,
            reply,
        })
        .await
    }

    /// Dispatches an event and returns the full result, faults included.
    ///
    /// Faults are also published on the diagnostics channel.
    pub async fn dispatch(&self, event: SessionEvent<'_>) -> DispatchResult {
        let result = self.dispatcher.dispatch(event).await;
        self.diagnostics.publish(&result.faults);
        result
    }

    async fn forward(&self, event: SessionEvent<'_>) -> Verdict {
        self.dispatch(event).await.verdict
    }

    /// Initializes every registered plugin. Returns all faults.
    pub async fn initialize(&self, context: &PluginContext) -> Vec<FaultReport> {
        let faults = self.dispatcher.broadcast_init(context).await;
        self.diagnostics.publish(&faults);
        let plugin_count = self.registry.len().await;

        info!(
            container = %self.name,
            plugins = plugin_count,
            faults = faults.len(),
            "Plugin container initialized"
        );

        faults
    }

    /// Destroys every registered plugin. Returns all faults.
    ///
    /// Plugins stay registered; the container is expected to be dropped
    /// afterwards.
    pub async fn shutdown(&self) -> Vec<FaultReport> {
        let faults = self.dispatcher.broadcast_destroy().await;
        self.diagnostics.publish(&faults);
        self.shut_down.store(true, Ordering::SeqCst);

        info!(
            container = %self.name,
            faults = faults.len(),
            "Plugin container shut down"
        );

        faults
    }

    // ── Accessors ──

    /// Subscribes to fault reports published from now on.
    pub fn subscribe_faults(&self) -> broadcast::Receiver<FaultReport> {
        self.diagnostics.subscribe()
    }

    /// Returns the container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fault policy.
    pub fn policy(&self) -> FaultPolicy {
        self.dispatcher.policy()
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    fn nested_fault(&self, faults: Vec<FaultReport>) -> Result<(), PluginFault> {
        if faults.is_empty() {
            return Ok(());
        }

        let summary = faults
            .iter()
            .map(|f| format!("{}: {}", f.plugin, f.message))
            .collect::<Vec<_>>()
            .join("; ");

        Err(PluginFault::Nested {
            container: self.name.clone(),
            count: faults.len(),
            summary,
        })
    }
}

#[async_trait]
impl Plugin for PluginContainer {
    async fn init(&self, context: &PluginContext) -> Result<(), PluginFault> {
        let faults = self.initialize(context).await;
        self.nested_fault(faults)
    }

    async fn destroy(&self) -> Result<(), PluginFault> {
        let faults = self.shutdown().await;
        self.nested_fault(faults)
    }

    async fn on_connect(&self, session: &Session) -> PluginOutcome {
        Ok(self.notify_connect(session).await)
    }

    async fn on_disconnect(&self, session: &Session) -> PluginOutcome {
        Ok(self.notify_disconnect(session).await)
    }

    async fn before_command(&self, session: &Session, request: &CommandRequest) -> PluginOutcome {
        Ok(PluginContainer::before_command(self, session, request).await)
    }

    async fn after_command(
        &self,
        session: &Session,
        request: &CommandRequest,
        reply: &Reply,
    ) -> PluginOutcome {
        Ok(PluginContainer::after_command(self, session, request, reply).await)
    }

    async fn deliver(&self, event: SessionEvent<'_>) -> Delivery {
        let result = self.dispatch(event).await;
        Delivery {
            outcome: Ok(result.verdict),
            nested_faults: result.faults,
        }
    }
}

impl Drop for PluginContainer {
    fn drop(&mut self) {
        if self.shut_down.load(Ordering::SeqCst) {
            return;
        }

        match self.registry.try_len() {
            Some(0) => {}
            Some(count) => {
                warn!(
                    container = %self.name,
                    plugins = count,
                    "Plugin container dropped without shutdown; plugins were not destroyed"
                );
            }
            None => {
                debug!(container = %self.name, "Plugin container dropped during a registry write");
            }
        }
    }
}
