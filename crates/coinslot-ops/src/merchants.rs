//! Merchant registry.
//!
//! Merchants are configured, not stored in the ledger: the festival
//! operator declares them at deploy time and payments resolve against the
//! configured list.

use serde::{Deserialize, Serialize};

use crate::config::KioskConfig;

/// A merchant that can receive festival card payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantConfig {
    /// Stable id used by payment requests, e.g. `"beers"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Payout address on the merchant's preferred chain.
    pub wallet_address: String,
    /// Chain key the merchant wants to be paid on.
    pub preferred_chain: String,
}

impl KioskConfig {
    /// Look up a configured merchant by id.
    pub fn merchant(&self, id: &str) -> Option<&MerchantConfig> {
        self.merchants.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_lookup() {
        let mut config = KioskConfig::default();
        config.merchants.push(MerchantConfig {
            id: "beers".into(),
            name: "Beers".into(),
            wallet_address: "0x00000000000000000000000000000000000000b1".into(),
            preferred_chain: "base_sepolia".into(),
        });

        assert_eq!(config.merchant("beers").unwrap().name, "Beers");
        assert!(config.merchant("food").is_none());
    }
}
