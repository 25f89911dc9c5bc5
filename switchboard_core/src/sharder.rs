//! Deterministic rollout bucketing.
//!
//! Percentage rollouts rely on every evaluator — server-side or offline — assigning the same
//! bucket to the same (identifier, rule) pair. Two evaluators disagreeing here would silently
//! serve different values to the same user, so the computation is fixed bit-for-bit: SHA-256 over
//! the UTF-8 bytes of `"{identifier}:{rule_id}"`, first 8 lowercase-hex characters of the digest
//! parsed as an unsigned 32-bit integer, modulo 100.
use sha2::{Digest, Sha256};

/// Number of rollout buckets. Buckets are in `0..TOTAL_BUCKETS`.
pub const TOTAL_BUCKETS: u32 = 100;

/// Maps an (identifier, rule id) pair to a rollout bucket.
pub trait Sharder {
    /// Returns the bucket for the given identifier and rule id, in `[0, TOTAL_BUCKETS)`.
    fn bucket(&self, identifier: &str, rule_id: &str) -> u32;
}

/// The default (and only) sharder.
pub struct Sha256Sharder;

impl Sharder for Sha256Sharder {
    fn bucket(&self, identifier: &str, rule_id: &str) -> u32 {
        let hash = Sha256::digest(format!("{identifier}:{rule_id}"));
        // First 4 digest bytes big-endian == first 8 hex characters parsed as u32.
        let value = u32::from_be_bytes(hash[0..4].try_into().expect("digest is 32 bytes"));
        value % TOTAL_BUCKETS
    }
}
