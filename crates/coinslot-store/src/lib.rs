//! Ledger persistence for the coinslot settlement core.
//!
//! This crate owns all durable kiosk state: three flat collections
//! (sessions, festival cards, PIN wallets), each persisted as a whole-file
//! JSON snapshot that is rewritten atomically on every mutation.
//!
//! # Storage Layout
//!
//! ```text
//! <data-dir>/
//! ├── sessions.json            # cash-acceptance sessions
//! ├── festival-cards.json      # prepaid card ledger
//! └── pin-wallets.json         # single-claim PIN wallets
//! ```
//!
//! # Consistency Model
//!
//! Each collection is loaded once at open and guarded by its own mutex.
//! Mutations go through [`JsonCollection::update`]: the closure runs under
//! the lock against a copy of the record, and the change is committed (in
//! memory and on disk) only if the closure succeeds and the snapshot write
//! succeeds. A failed write loses the current mutation but never corrupts
//! previously committed state.
//!
//! The lock is never held by this crate across anything slower than the
//! snapshot write; orchestrators release it between the "mark as settling"
//! mutation and any external network call.
//!
//! # Trait-Based Design
//!
//! The collections are defined as traits ([`SessionStore`], [`CardStore`],
//! [`WalletStore`]) so tests or future deployments can substitute another
//! engine; the contracts in `coinslot-types` are storage-agnostic.

pub mod collection;
pub mod error;
pub mod ledger;
pub mod traits;

// Re-export error types
pub use error::{Result, StoreError};

// Re-export traits
pub use traits::{CardStore, SessionStore, WalletStore};

// Re-export implementations
pub use collection::{JsonCollection, Record};
pub use ledger::{LedgerStore, StoreConfig};

use std::path::PathBuf;

/// Get the default data directory for the kiosk ledger.
///
/// Priority:
/// 1. `COINSLOT_DATA_DIR` environment variable (if set)
/// 2. Platform-specific data directory
/// 3. Fallback to `$HOME/.coinslot`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COINSLOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("io", "coinslot", "coinslot")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".coinslot")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_overrides_data_dir() {
        std::env::set_var("COINSLOT_DATA_DIR", "/tmp/coinslot-test-data");
        assert_eq!(default_data_dir(), PathBuf::from("/tmp/coinslot-test-data"));
        std::env::remove_var("COINSLOT_DATA_DIR");
    }
}
