//! banshee - network ban management engine with reputation-feed enforcement.
//!
//! Maintains the authoritative set of active bans in a two-tier index (an
//! exact host map plus a wildcard mask list), expires them on a schedule,
//! and turns reputation-feed hits into enforcement actions: a ban keyed on
//! the address when one exists, a direct session kill when it does not.
//!
//! The host server supplies the glue: a protocol dispatcher feeding
//! [`commands`], a loader feeding [`ReputationFeed::replace`], and an
//! [`EnforcementSink`] that actually announces bans and severs sessions.

pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod events;
pub mod feed;
pub mod policy;
pub mod store;
pub mod sweep;
pub mod wildmat;

pub use config::{BansheeConfig, ConfigError};
pub use entry::{BanEntry, REASON_SEPARATOR, split_reason};
pub use error::BanError;
pub use events::{BanEventBus, BanObserver};
pub use feed::ReputationFeed;
pub use policy::{EnforcementPolicy, EnforcementSink, Identity, IdentityDirectory};
pub use store::BanStore;
pub use sweep::ExpirySweeper;
pub use wildmat::wildcard_match;
