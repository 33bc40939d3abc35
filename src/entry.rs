//! Ban entry records and the public/private reason split.
//!
//! A reason string may carry operator-only context after a `|` separator.
//! The full string stays on the entry for operator display; every surface
//! shown to the banned party goes through [`split_reason`] or
//! [`BanEntry::public_reason`] first.

use crate::wildmat::has_wildcards;

/// Separator between the user-visible reason and operator-only context.
pub const REASON_SEPARATOR: char = '|';

/// Split a ban reason into its user-visible part and the optional
/// operator-only remainder.
pub fn split_reason(reason: &str) -> (&str, Option<&str>) {
    match reason.split_once(REASON_SEPARATOR) {
        Some((public, private)) => (public, Some(private)),
        None => (reason, None),
    }
}

/// A single active ban. Immutable once stored; the store hands out clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanEntry {
    /// Wildcard pattern matched against the user-name field; `"*"` = any.
    pub user_pattern: String,
    /// Wildcard pattern matched against the host/address field. Presence of
    /// `*`/`?` here decides which index tier the entry lives in.
    pub host_pattern: String,
    /// Full reason as supplied by the setter (operator view).
    pub reason: String,
    /// Unix timestamp of creation.
    pub set_time: i64,
    /// Lifetime in seconds; 0 means the ban never expires.
    pub duration: u64,
    /// Unix timestamp after which the ban is stale. Meaningless when
    /// `duration` is 0.
    pub expires: i64,
}

impl BanEntry {
    pub(crate) fn new(user: &str, host: &str, reason: &str, duration: u64, now: i64) -> Self {
        Self {
            user_pattern: user.to_string(),
            host_pattern: host.to_string(),
            reason: reason.to_string(),
            set_time: now,
            duration,
            // Saturate so an enormous duration cannot wrap expiry negative
            expires: now.saturating_add(i64::try_from(duration).unwrap_or(i64::MAX)),
        }
    }

    /// The part of the reason safe to show to the banned party.
    pub fn public_reason(&self) -> &str {
        split_reason(&self.reason).0
    }

    /// Whether the host pattern needs the wildcard tier.
    pub fn is_wildcard(&self) -> bool {
        has_wildcards(&self.host_pattern)
    }

    /// Whether the ban is past its expiry at `now`. Duration 0 never expires.
    pub fn is_expired(&self, now: i64) -> bool {
        self.duration != 0 && self.expires <= now
    }

    /// `user@host` summary for log lines.
    pub fn target(&self) -> String {
        format!("{}@{}", self.user_pattern, self.host_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_split() {
        let (public, private) = split_reason("spam bot|see ticket #42");
        assert_eq!(public, "spam bot");
        assert_eq!(private, Some("see ticket #42"));

        let (public, private) = split_reason("plain reason");
        assert_eq!(public, "plain reason");
        assert_eq!(private, None);
    }

    #[test]
    fn test_public_reason_keeps_full_string() {
        let entry = BanEntry::new("*", "203.0.113.9", "abuse|internal note", 600, 1000);
        assert_eq!(entry.public_reason(), "abuse");
        // Operator view retains the whole string
        assert_eq!(entry.reason, "abuse|internal note");
    }

    #[test]
    fn test_expiry() {
        let entry = BanEntry::new("*", "203.0.113.9", "test", 5, 1000);
        assert_eq!(entry.expires, 1005);
        assert!(!entry.is_expired(1004));
        assert!(entry.is_expired(1005));
        assert!(entry.is_expired(1006));

        // Permanent ban
        let permanent = BanEntry::new("*", "203.0.113.9", "test", 0, 1000);
        assert!(!permanent.is_expired(i64::MAX));
    }

    #[test]
    fn test_huge_duration_saturates() {
        let entry = BanEntry::new("*", "203.0.113.9", "test", u64::MAX, 1000);
        assert_eq!(entry.expires, i64::MAX);
        assert!(entry.expires >= entry.set_time);
        // Must not be born expired
        assert!(!entry.is_expired(1001));
    }

    #[test]
    fn test_tier_selection() {
        assert!(BanEntry::new("*", "10.0.0.*", "r", 0, 0).is_wildcard());
        assert!(!BanEntry::new("*", "10.0.0.5", "r", 0, 0).is_wildcard());
    }

    #[test]
    fn test_target_summary() {
        let entry = BanEntry::new("*", "10.0.0.*", "r", 0, 0);
        assert_eq!(entry.target(), "*@10.0.0.*");
    }
}
