//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ftplet_container::prelude::*;

/// Shared, ordered record of plugin calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.0.lock().expect("journal lock").push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }

    pub fn clear(&self) {
        self.0.lock().expect("journal lock").clear();
    }
}

/// What a [`Recorder`] does when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Answer(Verdict),
    Fail,
    Panic,
}

/// Plugin that journals `"<tag>:<event>"` and then behaves as configured.
#[derive(Debug)]
pub struct Recorder {
    tag: String,
    behavior: Behavior,
    lifecycle: Behavior,
    journal: Journal,
}

impl Recorder {
    pub fn answering(tag: &str, verdict: Verdict, journal: &Journal) -> Arc<dyn Plugin> {
        Self::build(tag, Behavior::Answer(verdict), Behavior::Answer(Verdict::Continue), journal)
    }

    pub fn failing(tag: &str, journal: &Journal) -> Arc<dyn Plugin> {
        Self::build(tag, Behavior::Fail, Behavior::Answer(Verdict::Continue), journal)
    }

    pub fn panicking(tag: &str, journal: &Journal) -> Arc<dyn Plugin> {
        Self::build(tag, Behavior::Panic, Behavior::Answer(Verdict::Continue), journal)
    }

    /// Session events continue, but `init` and `destroy` behave as given.
    pub fn lifecycle(tag: &str, lifecycle: Behavior, journal: &Journal) -> Arc<dyn Plugin> {
        Self::build(tag, Behavior::Answer(Verdict::Continue), lifecycle, journal)
    }

    fn build(tag: &str, behavior: Behavior, lifecycle: Behavior, journal: &Journal) -> Arc<dyn Plugin> {
        Arc::new(Self {
            tag: tag.to_string(),
            behavior,
            lifecycle,
            journal: journal.clone(),
        })
    }

    fn act(&self, event: &str, behavior: Behavior) -> PluginOutcome {
        self.journal.push(format!("{}:{event}", self.tag));
        match behavior {
            Behavior::Answer(verdict) => Ok(verdict),
            Behavior::Fail => Err(PluginFault::new(format!("{} refused {event}", self.tag))),
            Behavior::Panic => panic!("{} blew up during {event}", self.tag),
        }
    }
}

#[async_trait]
impl Plugin for Recorder {
    async fn init(&self, _context: &PluginContext) -> Result<(), PluginFault> {
        self.act("init", self.lifecycle).map(|_| ())
    }

    async fn destroy(&self) -> Result<(), PluginFault> {
        self.act("destroy", self.lifecycle).map(|_| ())
    }

    async fn on_connect(&self, _session: &Session) -> PluginOutcome {
        self.act("connect", self.behavior)
    }

    async fn on_disconnect(&self, _session: &Session) -> PluginOutcome {
        self.act("disconnect", self.behavior)
    }

    async fn before_command(&self, _session: &Session, _request: &CommandRequest) -> PluginOutcome {
        self.act("before", self.behavior)
    }

    async fn after_command(
        &self,
        _session: &Session,
        _request: &CommandRequest,
        _reply: &Reply,
    ) -> PluginOutcome {
        self.act("after", self.behavior)
    }
}

/// A session from a documentation-range address.
pub fn session(port: u16) -> Session {
    Session::new(format!("192.0.2.1:{port}").parse().expect("socket addr"))
}

/// Registers `plugins` in order.
pub async fn populate(container: &PluginContainer, plugins: Vec<(&str, Arc<dyn Plugin>)>) {
    for (name, plugin) in plugins {
        container.add(name, plugin).await.expect("register plugin");
    }
}
