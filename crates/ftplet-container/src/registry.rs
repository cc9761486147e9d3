//! Plugin registry: ordered, name-keyed plugin entries.
//!
//! Entries live in an `Arc<Vec<_>>` that is replaced copy-on-write on every
//! mutation. Readers clone the `Arc` under a brief read lock, so a snapshot
//! is always one complete registry state and stays valid however the
//! registry changes afterwards.
//!
//! Mutations are serialized by a separate writer lock that readers never
//! touch. A [`RegistryWriter`] holds it across several steps, so a caller
//! can run plugin code between two installs without another mutation
//! interleaving.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;

use crate::error::PluginError;
use crate::traits::Plugin;

/// One named plugin in registration order.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Registration name, unique within one registry.
    pub name: String,
    /// The plugin instance.
    pub plugin: Arc<dyn Plugin>,
}

impl Registration {
    /// Creates a registration entry.
    pub fn new(name: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            name: name.into(),
            plugin,
        }
    }
}

/// Immutable, ordered view of the registry at one instant.
pub type Snapshot = Arc<Vec<Registration>>;

/// Registry of named plugins in insertion order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Current entries. Only a [`RegistryWriter`] publishes a new vector.
    entries: RwLock<Snapshot>,
    /// Serializes mutations.
    writer: Mutex<()>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the writer lock. Waits for any mutation in progress.
    pub async fn writer(&self) -> RegistryWriter<'_> {
        RegistryWriter {
            registry: self,
            _guard: self.writer.lock().await,
        }
    }

    /// Registers a plugin at the end of the order.
    pub async fn add(&self, name: &str, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        self.writer().await.add(name, plugin).await
    }

    /// Removes a plugin by name, returning it if it was registered.
    pub async fn remove(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.writer().await.remove(name).await
    }

    /// Gets a plugin by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.plugin.clone())
    }

    /// Lists all registrations in order.
    pub async fn list(&self) -> Vec<Registration> {
        self.snapshot().await.as_ref().clone()
    }

    /// Returns the current ordered snapshot without copying entries.
    pub async fn snapshot(&self) -> Snapshot {
        self.entries.read().await.clone()
    }

    /// Checks a replacement set for repeated names and keeps its order.
    pub fn validate<I>(plugins: I) -> Result<Vec<Registration>, PluginError>
    where
        I: IntoIterator<Item = (String, Arc<dyn Plugin>)>,
    {
        let mut seen = HashSet::new();
        let mut next = Vec::new();

        for (name, plugin) in plugins {
            if !seen.insert(name.clone()) {
                return Err(PluginError::DuplicateName { name });
            }
            next.push(Registration::new(name, plugin));
        }

        Ok(next)
    }

    /// Atomically replaces every registration with `plugins`, in the input's
    /// iteration order.
    ///
    /// Fails without touching the registry if `plugins` repeats a name.
    /// Returns the displaced registrations in their old order; they are not
    /// destroyed.
    pub async fn replace_all<I>(&self, plugins: I) -> Result<Vec<Registration>, PluginError>
    where
        I: IntoIterator<Item = (String, Arc<dyn Plugin>)>,
    {
        let next = Self::validate(plugins)?;
        Ok(self.writer().await.install(next).await)
    }

    /// Returns the registration names in order.
    pub async fn names(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Checks whether a plugin is registered under `name`.
    pub async fn contains(&self, name: &str) -> bool {
        let entries = self.entries.read().await;
        entries.iter().any(|e| e.name == name)
    }

    /// Returns the number of registrations.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Non-blocking length check, `None` while a writer holds the lock.
    pub fn try_len(&self) -> Option<usize> {
        self.entries.try_read().ok().map(|entries| entries.len())
    }
}

/// Exclusive mutation access to a [`PluginRegistry`].
///
/// Readers and dispatches are never blocked by a held writer; they keep
/// seeing the last published snapshot.
#[derive(Debug)]
pub struct RegistryWriter<'a> {
    registry: &'a PluginRegistry,
    _guard: MutexGuard<'a, ()>,
}

impl RegistryWriter<'_> {
    /// Registers a plugin at the end of the order.
    pub async fn add(&self, name: &str, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let mut entries = self.registry.entries.write().await;

        if entries.iter().any(|e| e.name == name) {
            return Err(PluginError::DuplicateName {
                name: name.to_string(),
            });
        }

        // Clones only when a dispatch still holds the current snapshot.
        Arc::make_mut(&mut *entries).push(Registration::new(name, plugin));

        info!(plugin = %name, position = entries.len(), "Plugin registered");

        Ok(())
    }

    /// Removes a plugin by name, returning it if it was registered.
    pub async fn remove(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        let mut entries = self.registry.entries.write().await;

        let index = entries.iter().position(|e| e.name == name)?;
        let removed = Arc::make_mut(&mut *entries).remove(index);

        info!(plugin = %name, "Plugin unregistered");

        Some(removed.plugin)
    }

    /// Publishes `next` as the whole registry and returns the previous
    /// entries in their old order.
    pub async fn install(&self, next: Vec<Registration>) -> Vec<Registration> {
        let installed = next.len();
        let previous = {
            let mut entries = self.registry.entries.write().await;
            std::mem::replace(&mut *entries, Arc::new(next))
        };

        info!(
            replaced = previous.len(),
            installed = installed,
            "Plugin set replaced"
        );

        Arc::try_unwrap(previous).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    /// Current entries as seen by this writer.
    pub async fn snapshot(&self) -> Snapshot {
        self.registry.snapshot().await
    }
}
