//! `switchboard_core` is the core library behind Switchboard SDKs: remote feature flags and
//! dynamic configuration with deterministic percentage rollouts.
//!
//! # Overview
//!
//! `switchboard_core` is organized as a set of building blocks. The same blocks back the
//! server-authoritative evaluation endpoint and the offline client SDK, so both sides of the wire
//! agree bit-for-bit on every decision, including rollout bucketing.
//!
//! [`Configuration`] is an immutable snapshot of all flag configurations for a project, indexed
//! by configuration key. It is replaced wholesale on every successful sync.
//!
//! [`ConfigurationStore`](configuration_store::ConfigurationStore) is a thread-safe multi-reader
//! multi-writer in-memory manager for [`Configuration`]. Whenever configuration changes, it is
//! replaced completely. When a reader gets a configuration, it receives a *snapshot* that is not
//! affected by further writes, so one evaluation always sees a consistent manifest.
//!
//! [`ConfigurationFetcher`](configuration_fetcher::ConfigurationFetcher) is an HTTP client that
//! knows how to fetch [`Configuration`] manifests from the server. It's best to save and reuse
//! the same instance, so it can reuse the connection.
//!
//! [`PollerThread`](poller_thread::PollerThread) launches a background thread that periodically
//! fetches a new `Configuration` (using `ConfigurationFetcher`) and updates
//! `ConfigurationStore`. This is the simplest way to keep the snapshot up-to-date.
//!
//! [`eval`] module contains the pure evaluation functions: the per-configuration rule waterfall
//! ([`eval::evaluate_config`]) and the batch evaluator ([`eval::evaluate_batch`]). They perform
//! no I/O and never fail; degraded inputs produce ordinary fallback results. Because pure
//! functions are a bit tedious to call directly, [`Evaluator`](eval::Evaluator) binds them to a
//! `ConfigurationStore`.
//!
//! [`sharder`] holds the deterministic rollout hash. Its output is an interoperability contract:
//! every runtime evaluating the same identifier and rule must compute the same bucket.
//!
//! Most embeddings are built from a `ConfigurationStore`, a way to fill it (manual sync or a
//! `PollerThread`), and an `Evaluator`.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod configuration_fetcher;
pub mod configuration_store;
pub mod eval;
pub mod flags;
pub mod poller_thread;
pub mod sharder;

mod configuration;
mod error;
mod filters;

pub use configuration::Configuration;
pub use error::{Error, Result};
pub use filters::{FilterValue, Filters};
