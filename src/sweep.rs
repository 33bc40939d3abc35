//! Periodic eviction of expired bans.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::store::{BanStore, unix_now};

/// Background sweeper removing expired entries on a fixed cadence.
///
/// The sweep itself is [`BanStore::sweep_expired`], which tests drive with
/// an explicit clock; this wrapper only owns the timer loop.
pub struct ExpirySweeper {
    store: Arc<BanStore>,
    interval: Duration,
}

impl ExpirySweeper {
    /// Create a sweeper over `store` running every `interval`.
    pub fn new(store: Arc<BanStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run forever; spawn with `tokio::spawn`.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        // The first tick completes immediately; skip it so startup is quiet
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = self.store.sweep_expired(unix_now());
            if removed > 0 {
                info!(removed, "expired bans swept");
            }
        }
    }
}
