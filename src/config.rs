//! Engine configuration.
//!
//! Values arrive from the host's config loader as TOML. Every knob has a
//! serde default so an empty table is a valid configuration.

use serde::Deserialize;
use thiserror::Error;

/// Configuration for the ban engine and enforcement policy.
#[derive(Debug, Clone, Deserialize)]
pub struct BansheeConfig {
    /// Generic termination reason for direct kills on the no-address path.
    /// The detailed ban reason is never used here.
    #[serde(default = "default_kill_reason")]
    pub kill_reason: String,
    /// Reason template for feed-triggered bans. Text after `|` is
    /// operator-only context.
    #[serde(default = "default_reputation_ban_reason")]
    pub reputation_ban_reason: String,
    /// Lifetime of feed-triggered bans, in seconds. Must be at least 1.
    #[serde(default = "default_reputation_ban_duration")]
    pub reputation_ban_duration: u64,
    /// Cadence of the expiry sweep, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Cadence of reputation feed refresh, in seconds. Consumed by the
    /// external feed loader.
    #[serde(default = "default_feed_refresh_secs")]
    pub feed_refresh_secs: u64,
}

impl Default for BansheeConfig {
    fn default() -> Self {
        Self {
            kill_reason: default_kill_reason(),
            reputation_ban_reason: default_reputation_ban_reason(),
            reputation_ban_duration: default_reputation_ban_duration(),
            sweep_interval_secs: default_sweep_interval_secs(),
            feed_refresh_secs: default_feed_refresh_secs(),
        }
    }
}

impl BansheeConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn load_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reputation_ban_duration < 1 {
            return Err(ConfigError::ZeroBanDuration);
        }
        if self.sweep_interval_secs < 1 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        if !self.reputation_ban_reason.contains('|') {
            tracing::warn!(
                "reputation_ban_reason carries no '|' separator; the full text will be user-visible"
            );
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or type error.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `reputation_ban_duration` was 0.
    #[error("reputation_ban_duration must be at least 1 second")]
    ZeroBanDuration,

    /// `sweep_interval_secs` was 0.
    #[error("sweep_interval_secs must be at least 1 second")]
    ZeroSweepInterval,
}

fn default_kill_reason() -> String {
    "Banned".to_string()
}

fn default_reputation_ban_reason() -> String {
    "Anonymizing relay exits may not connect to this network|reputation feed hit".to_string()
}

fn default_reputation_ban_duration() -> u64 {
    24 * 3600
}

fn default_sweep_interval_secs() -> u64 {
    120
}

fn default_feed_refresh_secs() -> u64 {
    120
}
