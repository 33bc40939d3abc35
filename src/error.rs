//! Error types for the ban engine.
//!
//! Nothing here is fatal to the host process: every condition is a value the
//! caller inspects, never control flow thrown across the store boundary.

use thiserror::Error;

/// Errors surfaced by [`BanStore`](crate::store::BanStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BanError {
    /// A live ban already covers this host. Benign; callers treat it as a
    /// no-op.
    #[error("duplicate ban for {user}@{host}")]
    Duplicate {
        /// User pattern of the rejected insert.
        user: String,
        /// Host pattern of the rejected insert.
        host: String,
    },

    /// The host pattern was empty. Rejected before touching the index tiers.
    #[error("empty host pattern")]
    EmptyHost,
}
