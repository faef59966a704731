//! Economic calculations for the coinslot settlement core.
//!
//! A single concern lives here: the operator fee charged on every
//! settlement. The calculation is pure and deterministic, and it is the
//! only fee rule in the system: both session settlement and PIN wallet
//! claims go through [`calculate_fee`], so the `net` they bridge is always
//! derived with the same rounding.
//!
//! # Example
//!
//! ```
//! use coinslot_econ::calculate_fee;
//! use coinslot_types::Amount;
//!
//! let breakdown = calculate_fee(Amount::parse("100").unwrap());
//! assert_eq!(breakdown.fee.to_string(), "0.001000");
//! assert_eq!(breakdown.net_amount.to_string(), "99.999000");
//! ```

pub mod fees;

pub use fees::{calculate_fee, FEE_PERCENTAGE_LABEL, FEE_RATE_DENOMINATOR, FEE_RATE_NUMERATOR};
