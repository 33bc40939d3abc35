//! Two-tier ban index.
//!
//! Hosts without wildcard characters live in an exact-match map probed in
//! O(1); masks containing `*`/`?` live in an insertion-ordered list scanned
//! linearly. Both tiers sit behind a single lock so insert, remove and sweep
//! each observe a consistent view, and an entry is always in exactly one
//! tier.
//!
//! Entries are immutable once stored. Lookups hand out clones, so callers
//! can never corrupt the index through a returned entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use crate::entry::BanEntry;
use crate::error::BanError;
use crate::events::BanEventBus;
use crate::wildmat::compile_mask;

/// Current unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// A wildcard-tier entry with its mask compiled once at insert.
struct WildcardBan {
    /// `None` only when the mask failed to compile; such a ban matches
    /// nothing but still occupies its exact-pair removal slot.
    matcher: Option<Regex>,
    entry: BanEntry,
}

impl WildcardBan {
    fn matches(&self, host: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(host))
    }
}

#[derive(Default)]
struct Tiers {
    /// Literal hosts, keyed lowercased.
    exact: HashMap<String, BanEntry>,
    /// Wildcard masks in insertion order.
    wildcard: Vec<WildcardBan>,
}

impl Tiers {
    fn find(&self, host: &str) -> Option<&BanEntry> {
        if let Some(entry) = self.exact.get(&host.to_ascii_lowercase()) {
            return Some(entry);
        }
        self.wildcard
            .iter()
            .find(|ban| ban.matches(host))
            .map(|ban| &ban.entry)
    }
}

/// The authoritative set of active bans.
pub struct BanStore {
    tiers: RwLock<Tiers>,
    events: Arc<BanEventBus>,
}

impl BanStore {
    /// Create an empty store publishing on `events`.
    pub fn new(events: Arc<BanEventBus>) -> Self {
        Self {
            tiers: RwLock::new(Tiers::default()),
            events,
        }
    }

    /// Find the live ban covering `host`, if any.
    ///
    /// The exact tier is probed first; on a miss the wildcard tier is
    /// scanned in insertion order and the first matching mask wins. The
    /// user field does not participate in matching, it only matters for
    /// exact-pair removal.
    pub fn find(&self, _user: &str, host: &str) -> Option<BanEntry> {
        self.tiers.read().find(host).cloned()
    }

    /// Install a new ban.
    ///
    /// A live ban already covering `host` makes this a benign duplicate:
    /// the store is left untouched and [`BanError::Duplicate`] is returned
    /// for the caller to ignore. On success the stored snapshot is returned
    /// and a ban-added event is published.
    pub fn insert(
        &self,
        user: &str,
        host: &str,
        reason: &str,
        duration: u64,
    ) -> Result<BanEntry, BanError> {
        self.insert_at(user, host, reason, duration, unix_now())
    }

    /// Insert with an explicit clock, shared by [`Self::insert`] and tests.
    pub(crate) fn insert_at(
        &self,
        user: &str,
        host: &str,
        reason: &str,
        duration: u64,
        now: i64,
    ) -> Result<BanEntry, BanError> {
        if host.is_empty() {
            return Err(BanError::EmptyHost);
        }

        let entry = {
            let mut tiers = self.tiers.write();
            // Dedup check under the same lock as the insert
            if tiers.find(host).is_some() {
                return Err(BanError::Duplicate {
                    user: user.to_string(),
                    host: host.to_string(),
                });
            }
            let entry = BanEntry::new(user, host, reason, duration, now);
            if entry.is_wildcard() {
                tiers.wildcard.push(WildcardBan {
                    matcher: compile_mask(host),
                    entry: entry.clone(),
                });
            } else {
                tiers.exact.insert(host.to_ascii_lowercase(), entry.clone());
            }
            entry
        };

        // Publish outside the lock; observers may call back into the store
        self.events.publish_added(&entry);
        Ok(entry)
    }

    /// Remove bans matching `user`/`host`.
    ///
    /// The exact tier is keyed by host alone, so `user` is ignored there;
    /// wildcard entries are removed only when both patterns match
    /// case-insensitively. Returns whether anything was removed.
    pub fn remove(&self, user: &str, host: &str) -> bool {
        let mut tiers = self.tiers.write();

        let mut removed = tiers.exact.remove(&host.to_ascii_lowercase()).is_some();

        let before = tiers.wildcard.len();
        tiers.wildcard.retain(|ban| {
            let matches = ban.entry.user_pattern.eq_ignore_ascii_case(user)
                && ban.entry.host_pattern.eq_ignore_ascii_case(host);
            if matches {
                debug!(target = %ban.entry.target(), "removing ban");
            }
            !matches
        });
        removed |= tiers.wildcard.len() != before;

        removed
    }

    /// Evict entries past their expiry at `now`.
    ///
    /// Retain-based, so every entry is visited exactly once per sweep and
    /// the relative order of survivors is preserved. Returns the eviction
    /// count.
    pub fn sweep_expired(&self, now: i64) -> usize {
        let mut tiers = self.tiers.write();
        let mut removed = 0;

        tiers.exact.retain(|_, entry| {
            if entry.is_expired(now) {
                debug!(target = %entry.target(), "expiring ban");
                removed += 1;
                false
            } else {
                true
            }
        });

        tiers.wildcard.retain(|ban| {
            if ban.entry.is_expired(now) {
                debug!(target = %ban.entry.target(), "expiring ban");
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    /// Total number of live entries across both tiers.
    pub fn len(&self) -> usize {
        let tiers = self.tiers.read();
        tiers.exact.len() + tiers.wildcard.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BanStore {
        BanStore::new(Arc::new(BanEventBus::new()))
    }

    #[test]
    fn test_tier_exclusivity() {
        let s = store();
        s.insert("*", "203.0.113.9", "literal", 0).unwrap();
        s.insert("*", "10.0.0.*", "masked", 0).unwrap();

        let tiers = s.tiers.read();
        assert_eq!(tiers.exact.len(), 1);
        assert_eq!(tiers.wildcard.len(), 1);
        assert!(tiers.exact.contains_key("203.0.113.9"));
        assert_eq!(tiers.wildcard[0].entry.host_pattern, "10.0.0.*");
        assert!(tiers.wildcard[0].matcher.is_some());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let s = store();
        s.insert("*", "203.0.113.9", "first", 600).unwrap();
        let err = s.insert("*", "203.0.113.9", "second", 600).unwrap_err();
        assert!(matches!(err, BanError::Duplicate { .. }));
        assert_eq!(s.len(), 1);
        assert_eq!(s.find("*", "203.0.113.9").unwrap().reason, "first");
    }

    #[test]
    fn test_duplicate_covered_by_wildcard() {
        let s = store();
        s.insert("*", "10.0.0.*", "subnet", 0).unwrap();
        // The literal host is already covered by the mask
        let err = s.insert("*", "10.0.0.5", "literal", 0).unwrap_err();
        assert!(matches!(err, BanError::Duplicate { .. }));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_wildcard_match_correctness() {
        let s = store();
        s.insert("*", "10.0.0.*", "subnet", 0).unwrap();
        assert!(s.find("x", "10.0.0.5").is_some());
        assert!(s.find("x", "10.0.1.5").is_none());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let s = store();
        s.insert("*", "Gateway.Example.COM", "host", 0).unwrap();
        assert!(s.find("x", "gateway.example.com").is_some());
        assert!(s.find("x", "GATEWAY.EXAMPLE.COM").is_some());
    }

    #[test]
    fn test_wildcard_scan_in_insertion_order() {
        let s = store();
        // Both masks cover 10.0.0.5, neither glob-matches the other
        s.insert("*", "10.0.0.*", "first", 0).unwrap();
        s.insert("a", "10.?.0.5", "second", 0).unwrap();
        // First inserted mask wins
        assert_eq!(s.find("x", "10.0.0.5").unwrap().reason, "first");
    }

    #[test]
    fn test_empty_host_rejected() {
        let s = store();
        assert_eq!(s.insert("*", "", "r", 0).unwrap_err(), BanError::EmptyHost);
        assert!(s.is_empty());
    }

    #[test]
    fn test_remove_exact_ignores_user() {
        let s = store();
        s.insert("someuser", "203.0.113.9", "r", 0).unwrap();
        // Exact-tier removal is keyed by host alone
        assert!(s.remove("completely-different", "203.0.113.9"));
        assert!(s.find("x", "203.0.113.9").is_none());
    }

    #[test]
    fn test_remove_wildcard_requires_both_patterns() {
        let s = store();
        s.insert("baduser", "10.0.0.*", "r", 0).unwrap();
        assert!(!s.remove("otheruser", "10.0.0.*"));
        assert_eq!(s.len(), 1);
        // Case-insensitive pair match
        assert!(s.remove("BADUSER", "10.0.0.*"));
        assert!(s.is_empty());
    }

    #[test]
    fn test_remove_missing_returns_false() {
        let s = store();
        assert!(!s.remove("*", "203.0.113.9"));
    }

    #[test]
    fn test_expiry_sweep() {
        let s = store();
        let t = 1_000;
        s.insert_at("*", "203.0.113.9", "temp", 5, t).unwrap();
        s.insert_at("*", "10.0.0.*", "permanent", 0, t).unwrap();

        // Still present before expiry
        assert_eq!(s.sweep_expired(t + 4), 0);
        assert!(s.find("x", "203.0.113.9").is_some());

        // Gone after a sweep past expiry; duration 0 survives forever
        assert_eq!(s.sweep_expired(t + 6), 1);
        assert!(s.find("x", "203.0.113.9").is_none());
        assert!(s.find("x", "10.0.0.5").is_some());
        assert_eq!(s.sweep_expired(i64::MAX - 1), 0);
    }

    #[test]
    fn test_sweep_preserves_survivor_order() {
        let s = store();
        let t = 1_000;
        // 5 wildcard entries, 3 of which expire
        s.insert_at("*", "10.0.1.*", "keep", 0, t).unwrap();
        s.insert_at("*", "10.0.2.*", "drop", 5, t).unwrap();
        s.insert_at("*", "10.0.3.*", "drop", 5, t).unwrap();
        s.insert_at("*", "10.0.4.*", "keep", 9_999, t).unwrap();
        s.insert_at("*", "10.0.5.*", "drop", 5, t).unwrap();

        assert_eq!(s.sweep_expired(t + 10), 3);

        let tiers = s.tiers.read();
        let hosts: Vec<&str> = tiers
            .wildcard
            .iter()
            .map(|b| b.entry.host_pattern.as_str())
            .collect();
        assert_eq!(hosts, vec!["10.0.1.*", "10.0.4.*"]);
    }

    #[test]
    fn test_insert_publishes_event() {
        use crate::events::BanObserver;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct Counter {
            seen: AtomicUsize,
        }
        impl BanObserver for Counter {
            fn on_ban_added(&self, _entry: &BanEntry) {
                self.seen.fetch_add(1, Ordering::SeqCst);
            }
        }

        let bus = Arc::new(BanEventBus::new());
        let counter = Arc::new(Counter::default());
        bus.subscribe(counter.clone());

        let s = BanStore::new(bus);
        s.insert("*", "203.0.113.9", "r", 0).unwrap();
        // Duplicates do not fire
        let _ = s.insert("*", "203.0.113.9", "r", 0);
        assert_eq!(counter.seen.load(Ordering::SeqCst), 1);
    }
}
