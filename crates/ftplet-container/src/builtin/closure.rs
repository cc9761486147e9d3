//! Closure-backed plugin for small inline policies.

use std::sync::Arc;

use async_trait::async_trait;

use ftplet_core::types::{CommandRequest, Reply, Session};

use crate::hooks::definitions::{PluginOutcome, Verdict};
use crate::traits::Plugin;

type SessionFn = Arc<dyn Fn(&Session) -> PluginOutcome + Send + Sync>;
type BeforeFn = Arc<dyn Fn(&Session, &CommandRequest) -> PluginOutcome + Send + Sync>;
type AfterFn = Arc<dyn Fn(&Session, &CommandRequest, &Reply) -> PluginOutcome + Send + Sync>;

/// A plugin assembled from closures.
///
/// Events without a closure answer [`Verdict::Continue`].
///
/// ```ignore
/// let deny_dele = FnPlugin::new("no-dele").with_before_command(|_, req| {
///     Ok(if req.is("DELE") { Verdict::SkipRemaining } else { Verdict::Continue })
/// });
/// ```
#[derive(Clone, Default)]
pub struct FnPlugin {
    /// Label used in debug output.
    label: String,
    on_connect: Option<SessionFn>,
    on_disconnect: Option<SessionFn>,
    before_command: Option<BeforeFn>,
    after_command: Option<AfterFn>,
}

impl std::fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPlugin")
            .field("label", &self.label)
            .field("on_connect", &self.on_connect.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .field("before_command", &self.before_command.is_some())
            .field("after_command", &self.after_command.is_some())
            .finish()
    }
}

impl FnPlugin {
    /// Creates a plugin with no handlers.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    /// Sets the connect handler.
    pub fn with_connect<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Session) -> PluginOutcome + Send + Sync + 'static,
    {
        self.on_connect = Some(Arc::new(handler));
        self
    }

    /// Sets the disconnect handler.
    pub fn with_disconnect<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Session) -> PluginOutcome + Send + Sync + 'static,
    {
        self.on_disconnect = Some(Arc::new(handler));
        self
    }

    /// Sets the before-command handler.
    pub fn with_before_command<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Session, &CommandRequest) -> PluginOutcome + Send + Sync + 'static,
    {
        self.before_command = Some(Arc::new(handler));
        self
    }

    /// Sets the after-command handler.
    pub fn with_after_command<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Session, &CommandRequest, &Reply) -> PluginOutcome + Send + Sync + 'static,
    {
        self.after_command = Some(Arc::new(handler));
        self
    }

    /// Wraps the plugin for registration.
    pub fn into_plugin(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl Plugin for FnPlugin {
    async fn on_connect(&self, session: &Session) -> PluginOutcome {
        match &self.on_connect {
            Some(handler) => handler(session),
            None => Ok(Verdict::Continue),
        }
    }

    async fn on_disconnect(&self, session: &Session) -> PluginOutcome {
        match &self.on_disconnect {
            Some(handler) => handler(session),
            None => Ok(Verdict::Continue),
        }
    }

    async fn before_command(&self, session: &Session, request: &CommandRequest) -> PluginOutcome {
        match &self.before_command {
            Some(handler) => handler(session, request),
            None => Ok(Verdict::Continue),
        }
    }

    async fn after_command(
        &self,
        session: &Session,
        request: &CommandRequest,
        reply: &Reply,
    ) -> PluginOutcome {
        match &self.after_command {
            Some(handler) => handler(session, request, reply),
            None => Ok(Verdict::Continue),
        }
    }
}
