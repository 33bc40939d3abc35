//! Reputation-driven enforcement.
//!
//! Translates a reputation-feed hit into a concrete action: install a ban
//! keyed on the address when one exists, otherwise kill the session
//! directly. The operator reason may carry sensitive context after the `|`
//! separator; the banned party only ever sees the public part, and direct
//! kills use the generic configured kill reason.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::BansheeConfig;
use crate::entry::split_reason;
use crate::error::BanError;
use crate::feed::ReputationFeed;
use crate::store::BanStore;

/// A connecting identity as observed by the host server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Nickname for notices and kills.
    pub nickname: String,
    /// Network address. Empty when the identity arrived through an
    /// address-hiding gateway or spoof path.
    pub address: String,
}

/// Side effects the policy needs from the host server.
#[async_trait]
pub trait EnforcementSink: Send + Sync {
    /// Announce a ban network-wide. `reason` is already the user-safe
    /// public part.
    async fn broadcast_ban(&self, user: &str, host: &str, duration: u64, reason: &str);

    /// Send a notice to an identity.
    async fn notice(&self, nickname: &str, text: &str);

    /// Sever an identity's session with the given reason.
    async fn kill_session(&self, nickname: &str, reason: &str);
}

/// Read-only view of currently connected identities.
pub trait IdentityDirectory: Send + Sync {
    /// Snapshot of all connected identities.
    fn connected(&self) -> Vec<Identity>;

    /// Resolve a nickname to its identity, if online.
    fn find_by_nick(&self, nickname: &str) -> Option<Identity>;
}

/// Decides, per observed identity, between ban-by-address and direct kill.
pub struct EnforcementPolicy {
    store: Arc<BanStore>,
    feed: Arc<ReputationFeed>,
    directory: Arc<dyn IdentityDirectory>,
    sink: Arc<dyn EnforcementSink>,
    config: BansheeConfig,
}

impl EnforcementPolicy {
    /// Wire the policy to its collaborators.
    pub fn new(
        store: Arc<BanStore>,
        feed: Arc<ReputationFeed>,
        directory: Arc<dyn IdentityDirectory>,
        sink: Arc<dyn EnforcementSink>,
        config: BansheeConfig,
    ) -> Self {
        Self {
            store,
            feed,
            directory,
            sink,
            config,
        }
    }

    /// Evaluate a freshly observed identity against the feed.
    ///
    /// Identities without an address cannot be checked here; they are only
    /// reachable through [`Self::enforce`] when an out-of-band check flags
    /// them.
    pub async fn handle_new_identity(&self, identity: &Identity) {
        if identity.address.is_empty() {
            return;
        }
        if !self.feed.contains(&identity.address) {
            return;
        }
        info!(
            address = %identity.address,
            nick = %identity.nickname,
            "banning listed address"
        );
        self.enforce(identity).await;
    }

    /// Apply the enforcement decision for an identity known to be listed.
    ///
    /// With an address: install a `("*", address)` ban and broadcast it.
    /// Without one there is nothing stable to key a ban on, so the session
    /// is killed directly; the identity sees only the public split of the
    /// reason and the generic kill reason, never the operator context.
    pub async fn enforce(&self, identity: &Identity) {
        if identity.address.is_empty() {
            self.kill_direct(identity).await;
        } else {
            self.ban_address(identity).await;
        }
    }

    /// Re-evaluate every connected identity after the feed set is replaced.
    ///
    /// Already-banned addresses are left alone, so repeated refreshes are
    /// idempotent.
    pub async fn handle_feed_refresh(&self) {
        for identity in self.directory.connected() {
            self.handle_new_identity(&identity).await;
        }
    }

    /// Report whether a nickname or literal address is currently listed.
    ///
    /// A query containing a `.` is treated as a literal address; anything
    /// else is resolved as a nickname through the directory. Returns `None`
    /// when the nickname is not online. Read-only, no side effects.
    pub fn check_membership(&self, query: &str) -> Option<bool> {
        if query.contains('.') {
            return Some(self.feed.contains(query));
        }
        self.directory
            .find_by_nick(query)
            .map(|identity| self.feed.contains(&identity.address))
    }

    async fn ban_address(&self, identity: &Identity) {
        if self.store.find("*", &identity.address).is_some() {
            return;
        }
        match self.store.insert(
            "*",
            &identity.address,
            &self.config.reputation_ban_reason,
            self.config.reputation_ban_duration,
        ) {
            Ok(entry) => {
                self.sink
                    .broadcast_ban(
                        &entry.user_pattern,
                        &entry.host_pattern,
                        entry.duration,
                        entry.public_reason(),
                    )
                    .await;
                info!(target = %entry.target(), "installed reputation ban");
            }
            // Lost a race with another insert path
            Err(BanError::Duplicate { .. }) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to install reputation ban");
            }
        }
    }

    async fn kill_direct(&self, identity: &Identity) {
        let (public, _) = split_reason(&self.config.reputation_ban_reason);
        self.sink.notice(&identity.nickname, public).await;
        self.sink
            .kill_session(&identity.nickname, &self.config.kill_reason)
            .await;
        info!(
            nick = %identity.nickname,
            "killed listed identity without a stable address"
        );
    }
}
