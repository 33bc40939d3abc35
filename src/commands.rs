//! Administrative ban commands.
//!
//! Arguments arrive already parsed from the host protocol dispatcher. This
//! layer owns input clamping, so the store never sees a malformed duration.

use tracing::{debug, info};

use crate::error::BanError;
use crate::store::BanStore;

/// Install a ban from an ADD-BAN command.
///
/// `duration` is the raw string argument; anything that does not parse as
/// an unsigned number counts as 0, a permanent ban. Returns whether a new
/// ban was installed. A duplicate is a benign no-op.
pub fn add_ban(store: &BanStore, duration: &str, user: &str, host: &str, reason: &str) -> bool {
    let duration = duration.parse::<u64>().unwrap_or(0);
    match store.insert(user, host, reason, duration) {
        Ok(entry) => {
            info!(target = %entry.target(), reason = %entry.reason, "ban added");
            true
        }
        Err(BanError::Duplicate { user, host }) => {
            debug!(user = %user, host = %host, "duplicate ban ignored");
            false
        }
        Err(err) => {
            debug!(error = %err, "ban rejected");
            false
        }
    }
}

/// Remove a ban from a REMOVE-BAN command. Returns whether anything matched.
pub fn remove_ban(store: &BanStore, user: &str, host: &str) -> bool {
    let removed = store.remove(user, host);
    if removed {
        info!(user = %user, host = %host, "ban removed");
    }
    removed
}
