//! The Rust SDK for Switchboard, a remote feature-flag and dynamic-configuration service.
//!
//! # Overview
//!
//! The SDK revolves around a [`Client`] that holds a synchronized snapshot of a project's flag
//! configurations and evaluates [`EvaluateRequest`]s against it locally. Each evaluation produces
//! one [`EvaluationResult`] per requested key: the value to serve, the id of the rule that
//! matched (or `"default"`/`"none"`), and the reason the value was chosen.
//!
//! Evaluation is synchronous and offline: once a snapshot is synced, no network calls are made.
//! Percentage rollouts are deterministic per identifier, and the local evaluator is the same code
//! the server runs, so a cached client and the server agree on every decision.
//!
//! ```no_run
//! # use switchboard::{ClientConfig, EvaluateRequest};
//! let client = ClientConfig::new("https://flags.example.com", "api-token").to_client();
//! client.sync("my-project")?;
//!
//! let results = client.evaluate(&EvaluateRequest {
//!     filters: [
//!         ("tier".to_owned(), "vip".into()),
//!         ("country".to_owned(), "CO".into()),
//!     ].into_iter().collect(),
//!     keys: vec!["checkout_v2".to_owned()],
//!     identifier: Some("user-42".to_owned()),
//! });
//! println!("{:?}", results["checkout_v2"].value);
//! # Ok::<(), switchboard::Error>(())
//! ```
//!
//! # Keeping the snapshot fresh
//!
//! Call [`Client::sync`] whenever you want to refresh, or start a background
//! [`PollerThread`] with [`Client::start_poller_thread`] to refresh periodically. A failed sync
//! leaves the previous snapshot serving; the error is returned to you to decide on retries.
//!
//! # Remote evaluation
//!
//! [`EvaluationClient`] asks the server to evaluate instead of holding a local snapshot. Results
//! are identical; the trade-off is a network round-trip per call.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum and occur only while synchronizing. Evaluation
//! itself never fails: unknown keys, disabled configurations, malformed rule conditions and
//! invalid regular expressions all degrade to ordinary fallback results.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging
//! messages. Consider integrating a `log`-compatible logger implementation for better visibility
//! into SDK operations.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod config;
mod poller;
mod remote;

#[doc(inline)]
pub use switchboard_core::{
    eval::{ConfigurationLookup, RULE_ID_DEFAULT, RULE_ID_NONE},
    flags::{
        Condition, ConditionValue, Config, ConfigType, EvaluateRequest, EvaluationReason,
        EvaluationResult, Operator, Rule,
    },
    Configuration, Error, FilterValue, Filters, Result,
};

pub use client::Client;
pub use config::ClientConfig;
pub use poller::PollerThread;
pub use remote::{EvaluateResponse, EvaluationClient, ResponseMeta};
