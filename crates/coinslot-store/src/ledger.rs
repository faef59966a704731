//! Typed ledger collections and the composed [`LedgerStore`].

use std::path::{Path, PathBuf};

use coinslot_types::{FestivalCard, PinWallet, Session};

use crate::collection::{JsonCollection, Record};
use crate::error::{Result, StoreError};
use crate::traits::{CardStore, SessionStore, WalletStore};

impl Record for Session {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for FestivalCard {
    fn key(&self) -> &str {
        &self.wallet_id
    }
}

impl Record for PinWallet {
    fn key(&self) -> &str {
        &self.id
    }
}

impl SessionStore for JsonCollection<Session> {
    fn insert(&self, session: Session) -> Result<()> {
        JsonCollection::insert(self, session)
    }

    fn get(&self, id: &str) -> Result<Option<Session>> {
        JsonCollection::get(self, id)
    }

    fn update<R, E, F>(&self, id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Session) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        JsonCollection::update(self, id, f)
    }

    fn list(&self) -> Result<Vec<Session>> {
        JsonCollection::list(self)
    }
}

impl CardStore for JsonCollection<FestivalCard> {
    fn get_or_insert(&self, card: FestivalCard) -> Result<(FestivalCard, bool)> {
        JsonCollection::get_or_insert(self, card)
    }

    fn get(&self, wallet_id: &str) -> Result<Option<FestivalCard>> {
        JsonCollection::get(self, wallet_id)
    }

    fn contains(&self, wallet_id: &str) -> Result<bool> {
        JsonCollection::contains(self, wallet_id)
    }

    fn update<R, E, F>(&self, wallet_id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut FestivalCard) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        JsonCollection::update(self, wallet_id, f)
    }

    fn list(&self) -> Result<Vec<FestivalCard>> {
        JsonCollection::list(self)
    }

    fn count(&self) -> Result<usize> {
        JsonCollection::count(self)
    }
}

impl WalletStore for JsonCollection<PinWallet> {
    fn insert(&self, wallet: PinWallet) -> Result<()> {
        JsonCollection::insert(self, wallet)
    }

    fn get(&self, id: &str) -> Result<Option<PinWallet>> {
        JsonCollection::get(self, id)
    }

    fn update<R, E, F>(&self, id: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut PinWallet) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        JsonCollection::update(self, id, f)
    }

    fn list(&self) -> Result<Vec<PinWallet>> {
        JsonCollection::list(self)
    }
}

/// Configuration for [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base directory for all ledger files.
    pub base_dir: PathBuf,
    /// Sessions file (default: base_dir/sessions.json).
    pub sessions_path: Option<PathBuf>,
    /// Festival cards file (default: base_dir/festival-cards.json).
    pub cards_path: Option<PathBuf>,
    /// PIN wallets file (default: base_dir/pin-wallets.json).
    pub wallets_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Create a new configuration with the given base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            sessions_path: None,
            cards_path: None,
            wallets_path: None,
        }
    }

    /// Get the sessions file path.
    pub fn sessions_path(&self) -> PathBuf {
        self.sessions_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join("sessions.json"))
    }

    /// Get the festival cards file path.
    pub fn cards_path(&self) -> PathBuf {
        self.cards_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join("festival-cards.json"))
    }

    /// Get the PIN wallets file path.
    pub fn wallets_path(&self) -> PathBuf {
        self.wallets_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join("pin-wallets.json"))
    }
}

/// The complete kiosk ledger: sessions, festival cards, and PIN wallets.
///
/// This is the single owner of all ledger state. It is constructed once at
/// process start and passed by reference into every orchestrator; there is
/// no module-level cache. Each collection locks independently, so requests
/// against different record kinds never contend.
pub struct LedgerStore {
    /// Cash-acceptance sessions.
    pub sessions: JsonCollection<Session>,
    /// Festival prepaid cards.
    pub cards: JsonCollection<FestivalCard>,
    /// PIN wallets.
    pub wallets: JsonCollection<PinWallet>,
}

impl LedgerStore {
    /// Open the ledger, creating the base directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.base_dir)?;
        tracing::info!(base_dir = %config.base_dir.display(), "Opening kiosk ledger");
        Ok(Self {
            sessions: JsonCollection::open(config.sessions_path())?,
            cards: JsonCollection::open(config.cards_path())?,
            wallets: JsonCollection::open(config.wallets_path())?,
        })
    }
}
