use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::flags::Config;

/// A full snapshot of a project's flag configurations, indexed by configuration key.
///
/// Snapshots are immutable: a fresh sync builds a new `Configuration` and replaces the previous
/// one wholesale. There is no partial merge and no eviction; flag manifests are small.
#[derive(Debug)]
pub struct Configuration {
    /// Timestamp when the snapshot was fetched by the SDK.
    pub fetched_at: DateTime<Utc>,
    configs: HashMap<String, Config>,
}

impl Configuration {
    /// Create a new snapshot from the server's manifest response.
    ///
    /// Rules are re-sorted by ascending priority here so evaluation can rely on the ordering
    /// invariant no matter how the wire payload was ordered.
    pub fn from_server_response(configs: Vec<Config>) -> Configuration {
        let now = Utc::now();

        let configs = configs
            .into_iter()
            .map(|mut config| {
                config.rules.sort_by_key(|rule| rule.priority);
                (config.key.clone(), config)
            })
            .collect();

        Configuration {
            fetched_at: now,
            configs,
        }
    }

    /// Returns the configuration for the given key, if present in the snapshot.
    pub fn get(&self, key: &str) -> Option<&Config> {
        self.configs.get(key)
    }

    /// Get a set of all configuration keys in the snapshot. Note that this includes inactive
    /// configurations.
    pub fn config_keys(&self) -> HashSet<String> {
        self.configs.keys().cloned().collect()
    }
}
