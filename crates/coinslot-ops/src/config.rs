//! Kiosk configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use coinslot_rails::chains;
use coinslot_types::Amount;

use crate::merchants::MerchantConfig;

/// Configuration for the kiosk orchestrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskConfig {
    /// Base directory for ledger files.
    pub data_dir: PathBuf,

    /// The kiosk operator's own address, used as the destination for
    /// channel resize/close bookkeeping.
    pub kiosk_address: String,

    /// Address receiving the operator fee on bridge settlements. When
    /// unset, the fee stays with the bridged funds.
    pub fee_recipient: Option<String>,

    /// Gas/fee headroom reserved on the gateway rail on top of each
    /// payment amount.
    pub gateway_buffer: Amount,

    /// Asset token for payment channels, e.g. `"ytest.usd"`.
    pub channel_token: String,

    /// Chain id the payment channels clear on.
    pub channel_chain_id: u64,

    /// Merchants accepting festival card payments.
    pub merchants: Vec<MerchantConfig>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            data_dir: coinslot_store::default_data_dir(),
            kiosk_address: "0x0000000000000000000000000000000000000000".to_string(),
            fee_recipient: None,
            gateway_buffer: Amount::from_micros(10_000), // 0.01
            channel_token: "ytest.usd".to_string(),
            channel_chain_id: 84_532,
            merchants: Vec::new(),
        }
    }
}

impl KioskConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !is_evm_address(&self.kiosk_address) {
            return Err(format!("invalid kiosk address: {}", self.kiosk_address));
        }
        if let Some(recipient) = &self.fee_recipient {
            if !is_evm_address(recipient) {
                return Err(format!("invalid fee recipient address: {recipient}"));
            }
        }
        for merchant in &self.merchants {
            if !is_evm_address(&merchant.wallet_address) {
                return Err(format!(
                    "merchant {}: invalid wallet address {}",
                    merchant.id, merchant.wallet_address
                ));
            }
            if !chains::is_supported(&merchant.preferred_chain) {
                return Err(format!(
                    "merchant {}: unsupported chain {}",
                    merchant.id, merchant.preferred_chain
                ));
            }
        }
        Ok(())
    }
}

/// Cheap shape check for `0x`-prefixed 20-byte hex addresses.
fn is_evm_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
