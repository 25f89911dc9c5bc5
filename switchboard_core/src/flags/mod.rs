//! Flag configurations and targeting rules as served by the Switchboard manifest endpoint.
mod models;
mod rules;

pub use models::*;
