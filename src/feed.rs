//! Reputation feed membership.
//!
//! The engine only consumes a membership test over addresses; fetching and
//! parsing the on-disk list is the external loader's concern. `replace`
//! swaps the whole set at once, so a reader never observes a partially
//! refreshed feed. A failed refresh simply never calls `replace`, leaving
//! the previous set authoritative.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

/// Set of addresses known to be undesirable (e.g. anonymizing-relay exits).
#[derive(Default)]
pub struct ReputationFeed {
    addresses: RwLock<HashSet<String>>,
}

impl ReputationFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership test for a literal address.
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.read().contains(address)
    }

    /// Atomically replace the entire membership set.
    pub fn replace(&self, addresses: HashSet<String>) {
        let count = addresses.len();
        *self.addresses.write() = addresses;
        debug!(count, "reputation feed replaced");
    }

    /// Number of listed addresses.
    pub fn len(&self) -> usize {
        self.addresses.read().len()
    }

    /// Whether the feed currently lists nothing.
    pub fn is_empty(&self) -> bool {
        self.addresses.read().is_empty()
    }
}
