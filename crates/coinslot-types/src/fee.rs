//! Fee breakdown attached to settlements.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// The gross/fee/net split for a single settlement.
///
/// Produced by `coinslot_econ::calculate_fee` and recorded on the session
/// that settled. `net` is the literal on-chain transfer amount; gross is
/// always `fee + net` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    /// Amount the user is settling, before fees.
    pub gross_amount: Amount,
    /// Operator fee withheld.
    pub fee: Amount,
    /// Amount delivered on-chain.
    pub net_amount: Amount,
    /// Human-readable rate label, e.g. `"0.001%"`.
    pub fee_percentage: String,
}
