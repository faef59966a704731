//! Data structures for the coinslot settlement core.
//!
//! This crate provides all data types shared across the kiosk ledger and
//! its orchestrators. It contains no business logic, only type definitions
//! with serialization support.
//!
//! # Module Organization
//!
//! - [`amount`] - Fixed-precision money type (micro-unit scaled integer)
//! - [`fee`] - Fee breakdown attached to settlements
//! - [`id`] - Identifier and PIN generation
//! - [`pin`] - PIN hashing and verification
//! - [`session`] - Cash-acceptance session records
//! - [`card`] - Festival prepaid card records
//! - [`wallet`] - PIN wallet records
//! - [`constants`] - Alphabets, lengths, and precision constants
//!
//! # Example
//!
//! ```
//! use coinslot_types::{Amount, FestivalCard, CardStatus};
//!
//! let card = FestivalCard::new("A1B2C3", 1_700_000_000_000);
//! assert_eq!(card.status, CardStatus::Active);
//! assert!(card.balance.is_zero());
//!
//! let five = Amount::parse("5.00").unwrap();
//! assert_eq!(five.to_string(), "5.000000");
//! ```
//!
//! # Type Conventions
//!
//! - Derive `Debug`, `Clone`, `PartialEq` everywhere; `Copy` for small types
//! - Derive `Serialize`, `Deserialize` for every persisted record
//! - Records use `#[serde(rename_all = "camelCase")]`, status enums use
//!   SCREAMING_SNAKE_CASE, matching the on-disk ledger files
//! - Monetary fields are always [`Amount`], never a float

pub mod amount;
pub mod card;
pub mod constants;
pub mod fee;
pub mod id;
pub mod pin;
pub mod session;
pub mod wallet;

// Re-export all public types at the crate root for convenience

pub use amount::{Amount, AmountError};
pub use card::{CardStatus, FestivalCard};
pub use constants::*;
pub use fee::FeeBreakdown;
pub use id::{generate_pin, generate_session_id, generate_wallet_id};
pub use pin::{hash_pin, verify_pin_hash};
pub use session::{Session, SessionStatus};
pub use wallet::{PinWallet, WalletStatus};

/// Millisecond UNIX timestamp.
///
/// This is the standard type for all time fields on ledger records.
pub type Timestamp = u64;
