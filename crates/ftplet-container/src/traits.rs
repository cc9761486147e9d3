//! The plugin capability contract.

use async_trait::async_trait;

use ftplet_core::types::{CommandRequest, Reply, Session};

use crate::api::context::PluginContext;
use crate::error::PluginFault;
use crate::hooks::definitions::{Delivery, PluginOutcome, SessionEvent, Verdict};

/// Trait that every plugin implements, and that
/// [`PluginContainer`](crate::container::PluginContainer) implements too so
/// containers nest.
///
/// Every handler has a default that does nothing and answers
/// [`Verdict::Continue`], so plugins only override the events they care
/// about. Returning `Err` (or panicking) is a fault: the container records
/// it and carries on with the next plugin.
#[async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Called once when the hosting container is initialized.
    async fn init(&self, _context: &PluginContext) -> Result<(), PluginFault> {
        Ok(())
    }

    /// Called when the plugin is shut down, either at container shutdown or
    /// when it is displaced by a full replacement.
    async fn destroy(&self) -> Result<(), PluginFault> {
        Ok(())
    }

    /// Called when a client connects.
    async fn on_connect(&self, _session: &Session) -> PluginOutcome {
        Ok(Verdict::Continue)
    }

    /// Called when a client disconnects.
    async fn on_disconnect(&self, _session: &Session) -> PluginOutcome {
        Ok(Verdict::Continue)
    }

    /// Called before the engine executes a command.
    async fn before_command(&self, _session: &Session, _request: &CommandRequest) -> PluginOutcome {
        Ok(Verdict::Continue)
    }

    /// Called after the engine executed a command and sent its reply.
    async fn after_command(
        &self,
        _session: &Session,
        _request: &CommandRequest,
        _reply: &Reply,
    ) -> PluginOutcome {
        Ok(Verdict::Continue)
    }

    /// Routes a session event to the matching handler above.
    ///
    /// Containers override this to pass their inner faults up to the
    /// parent dispatch. Other plugins keep the default.
    async fn deliver(&self, event: SessionEvent<'_>) -> Delivery {
        let outcome = match event {
            SessionEvent::Connect { session } => self.on_connect(session).await,
            SessionEvent::Disconnect { session } => self.on_disconnect(session).await,
            SessionEvent::BeforeCommand { session, request } => {
                self.before_command(session, request).await
            }
            SessionEvent::AfterCommand {
                session,
                request,
                reply,
            } => self.after_command(session, request, reply).await,
        };
        Delivery::from(outcome)
    }
}
