//! A thread-safe in-memory storage for the currently active configuration snapshot.
//! [`ConfigurationStore`] provides concurrent access for readers (flag evaluation) and writers
//! (manual sync or the background poller).
use std::sync::{Arc, RwLock};

use crate::Configuration;

/// `ConfigurationStore` provides a thread-safe (`Sync`) storage for the configuration snapshot
/// that allows concurrent access for readers and writers.
///
/// `Configuration` itself is always immutable and can only be replaced completely. Readers that
/// hold a snapshot are unaffected by a concurrent swap, so one evaluation always sees either the
/// entirely-old or entirely-new snapshot. The lock is held only for the duration of the swap or
/// clone, never while evaluating.
#[derive(Default)]
pub struct ConfigurationStore {
    configuration: RwLock<Option<Arc<Configuration>>>,
}

impl ConfigurationStore {
    /// Create a new empty configuration store.
    pub fn new() -> Self {
        ConfigurationStore::default()
    }

    /// Get the currently-active configuration. Returns None if configuration hasn't been
    /// fetched/stored yet.
    pub fn get_configuration(&self) -> Option<Arc<Configuration>> {
        // self.configuration.read() should always return Ok(). Err() is possible only if the lock
        // is poisoned (writer panicked while holding the lock), which should never happen.
        let configuration = self
            .configuration
            .read()
            .expect("thread holding configuration lock should not panic");

        configuration.clone()
    }

    /// Set a new configuration snapshot, replacing the previous one wholesale. Concurrent writers
    /// are last-writer-wins.
    pub fn set_configuration(&self, config: Arc<Configuration>) {
        let mut configuration_slot = self
            .configuration
            .write()
            .expect("thread holding configuration lock should not panic");

        *configuration_slot = Some(config);
    }
}
