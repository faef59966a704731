//! Trait definitions for the ledger collections.
//!
//! Orchestrators program against these interfaces; the default
//! implementation is the JSON snapshot store, but an in-memory store (or a
//! real embedded database) can satisfy the same contracts. All methods take
//! `&self`; implementations use interior locking so each call is atomic
//! with respect to concurrent callers.

use coinslot_types::{FestivalCard, PinWallet, Session};

use crate::error::{Result, StoreError};

/// Storage for cash-acceptance sessions.
pub trait SessionStore {
    /// Insert a new session; fails on a duplicate id.
    fn insert(&self, session: Session) -> Result<()>;

    /// Get a session by id.
    fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Read-modify-write a session atomically; an `Err` from the closure
    /// leaves the record untouched.
    fn update<R, E, F>(&self, id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Session) -> std::result::Result<R, E>,
        E: From<StoreError>;

    /// Clone out all sessions.
    fn list(&self) -> Result<Vec<Session>>;
}

/// Storage for festival prepaid cards.
pub trait CardStore {
    /// Insert unless the id exists; returns the stored card and whether
    /// this call created it. Never mutates an existing card.
    fn get_or_insert(&self, card: FestivalCard) -> Result<(FestivalCard, bool)>;

    /// Get a card by wallet id.
    fn get(&self, wallet_id: &str) -> Result<Option<FestivalCard>>;

    /// True when a card with the id exists.
    fn contains(&self, wallet_id: &str) -> Result<bool>;

    /// Read-modify-write a card atomically; an `Err` from the closure
    /// leaves the record untouched.
    fn update<R, E, F>(&self, wallet_id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut FestivalCard) -> std::result::Result<R, E>,
        E: From<StoreError>;

    /// Clone out all cards. Cards are never deleted, so this enumerates
    /// every card ever created.
    fn list(&self) -> Result<Vec<FestivalCard>>;

    /// Number of cards.
    fn count(&self) -> Result<usize>;
}

/// Storage for PIN wallets.
pub trait WalletStore {
    /// Insert a new wallet; fails on a duplicate id.
    fn insert(&self, wallet: PinWallet) -> Result<()>;

    /// Get a wallet by id.
    fn get(&self, id: &str) -> Result<Option<PinWallet>>;

    /// Read-modify-write a wallet atomically; an `Err` from the closure
    /// leaves the record untouched.
    fn update<R, E, F>(&self, id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut PinWallet) -> std::result::Result<R, E>,
        E: From<StoreError>;

    /// Clone out all wallets.
    fn list(&self) -> Result<Vec<PinWallet>>;
}
