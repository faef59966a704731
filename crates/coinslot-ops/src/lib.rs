//! Settlement orchestrators for the coinslot kiosk.
//!
//! This crate drives the kiosk's money movement: it owns no state of its
//! own, composing the injected ledger store with the three external rail
//! clients behind [`KioskOperations`].
//!
//! # Flows
//!
//! - **Sessions** ([`session`]): cash acceptance, channel mirroring, and
//!   settlement via the bridge or conversion into a PIN wallet.
//! - **Festival cards** ([`cards`]): the prepaid card ledger with
//!   top-up/deduct and the no-overdraft guard.
//! - **Payments** ([`payment`]): card-to-merchant spending over the
//!   gateway rail, with refund-while-reversible compensation.
//! - **Claims** ([`claim`]): PIN wallet to on-chain payout with
//!   unbounded caller-driven retry.
//! - **Events** ([`events`]): hardware event fan-out with consumer-side
//!   deduplication.
//!
//! # Locking discipline
//!
//! Ledger mutations are atomic per record and never span a rail call: a
//! flow persists its pre-call transition, awaits the external service with
//! no lock held, then re-acquires the ledger to record the outcome. No
//! flow supports mid-flight cancellation; once a bridge or gateway call is
//! issued the orchestrator waits for its result before touching the
//! ledger again, so a later retry can never double-process.

pub mod cards;
pub mod claim;
pub mod config;
pub mod error;
pub mod events;
pub mod kiosk_ops;
pub mod merchants;
pub mod payment;
pub mod session;

// Re-export the operation surface
pub use cards::{BalanceResult, CardCreateResult, CardSummary, DeductResult, TopUpResult};
pub use claim::{ClaimResult, LookupResult, WalletSummary};
pub use config::KioskConfig;
pub use error::{OpsError, OpsResult};
pub use events::{CoinEvent, EventBus, HardwareEvent, NfcTapEvent, SeenEvents};
pub use kiosk_ops::{current_timestamp, KioskOperations};
pub use merchants::MerchantConfig;
pub use payment::PaymentResult;
pub use session::{
    SessionDepositResult, SessionEndResult, SessionPinResult, SessionStartResult, SessionSummary,
};
