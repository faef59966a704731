//! Supported destination chain registry.
//!
//! The kiosk holds its float on the hub chain (Arc) and delivers to any of
//! the chains below via the bridge or gateway rails. Lookup is by the
//! stable `key`, which is what ledger records and API callers carry.

/// A destination chain reachable by the settlement rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    /// Stable lookup key, recorded on ledger entries.
    pub key: &'static str,
    /// Human-readable name for messages.
    pub name: &'static str,
    /// Gateway transfer domain id.
    pub domain_id: u32,
    /// EVM chain id.
    pub chain_id: u64,
    /// USDC token address on this chain.
    pub usdc_address: &'static str,
    /// Block explorer base URL.
    pub explorer_url: &'static str,
    /// Default RPC endpoint.
    pub rpc_url: &'static str,
}

impl ChainInfo {
    /// Explorer URL for a transaction hash on this chain.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Key of the hub chain the kiosk float lives on.
pub const HUB_CHAIN_KEY: &str = "arc";

/// All chains the rails can reach, hub first.
pub const SUPPORTED_CHAINS: &[ChainInfo] = &[
    ChainInfo {
        key: "arc",
        name: "Arc Testnet",
        domain_id: 26,
        chain_id: 5_042_002,
        usdc_address: "0x3600000000000000000000000000000000000000",
        explorer_url: "https://testnet.arcscan.app",
        rpc_url: "https://rpc.testnet.arc.network",
    },
    ChainInfo {
        key: "base_sepolia",
        name: "Base Sepolia",
        domain_id: 6,
        chain_id: 84_532,
        usdc_address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
        explorer_url: "https://sepolia.basescan.org",
        rpc_url: "https://sepolia.base.org",
    },
    ChainInfo {
        key: "ethereum_sepolia",
        name: "Ethereum Sepolia",
        domain_id: 0,
        chain_id: 11_155_111,
        usdc_address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238",
        explorer_url: "https://sepolia.etherscan.io",
        rpc_url: "https://rpc.sepolia.org",
    },
    ChainInfo {
        key: "avalanche_fuji",
        name: "Avalanche Fuji",
        domain_id: 1,
        chain_id: 43_113,
        usdc_address: "0x5425890298aed601595a70ab815c96711a31bc65",
        explorer_url: "https://testnet.snowtrace.io",
        rpc_url: "https://api.avax-test.network/ext/bc/C/rpc",
    },
    ChainInfo {
        key: "sonic_testnet",
        name: "Sonic Testnet",
        domain_id: 13,
        chain_id: 64_165,
        usdc_address: "0x0BA304580ee7c9a980CF72e55f5Ed2E9fd30Bc51",
        explorer_url: "https://testnet.sonicscan.org",
        rpc_url: "https://rpc.testnet.soniclabs.com",
    },
    ChainInfo {
        key: "sei_atlantic",
        name: "Sei Atlantic",
        domain_id: 16,
        chain_id: 1_328,
        usdc_address: "0x4fCF1784B31630811181f670Aea7A7bEF803eaED",
        explorer_url: "https://seistream.app",
        rpc_url: "https://evm-rpc-testnet.sei-apis.com",
    },
    ChainInfo {
        key: "hyperevm_testnet",
        name: "HyperEVM Testnet",
        domain_id: 19,
        chain_id: 998,
        usdc_address: "0x2B3370eE501B4a559b57D449569354196457D8Ab",
        explorer_url: "https://testnet.purrsec.com",
        rpc_url: "https://rpc.hyperliquid-testnet.xyz/evm",
    },
];

/// Look up a chain by key.
pub fn chain_by_key(key: &str) -> Option<&'static ChainInfo> {
    SUPPORTED_CHAINS.iter().find(|c| c.key == key)
}

/// The hub chain entry.
pub fn hub_chain() -> &'static ChainInfo {
    chain_by_key(HUB_CHAIN_KEY).expect("hub chain is always registered")
}

/// True when the key resolves to a supported chain.
pub fn is_supported(key: &str) -> bool {
    chain_by_key(key).is_some()
}
