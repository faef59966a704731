//! End-to-end kiosk flows using the mock rail clients.
//!
//! These tests exercise complete money-movement paths: cash to bridge,
//! cash to PIN wallet to claim, and card to merchant, including the
//! failure compensation on each.

use tempfile::TempDir;

use coinslot_ops::{KioskConfig, KioskOperations, MerchantConfig, OpsError};
use coinslot_store::{LedgerStore, StoreConfig};
use coinslot_test_utils::{BridgeMode, MockBridgeClient, MockChannelClient, MockGatewayClient};
use coinslot_types::{Amount, SessionStatus, WalletStatus};

type TestOps = KioskOperations<MockChannelClient, MockBridgeClient, MockGatewayClient>;

fn amt(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

fn test_config(dir: &TempDir) -> KioskConfig {
    let mut config = KioskConfig {
        data_dir: dir.path().to_path_buf(),
        ..KioskConfig::default()
    };
    config.fee_recipient = Some("0x00000000000000000000000000000000000000fe".into());
    config.merchants.push(MerchantConfig {
        id: "beers".into(),
        name: "Beers".into(),
        wallet_address: "0x00000000000000000000000000000000000000b1".into(),
        preferred_chain: "base_sepolia".into(),
    });
    config.validate().unwrap();
    config
}

fn create_test_ops() -> (TestOps, MockChannelClient, MockBridgeClient, MockGatewayClient, TempDir) {
    let dir = TempDir::new().unwrap();
    let channel = MockChannelClient::new();
    let bridge = MockBridgeClient::new();
    let gateway = MockGatewayClient::new();
    let store = LedgerStore::open(StoreConfig::new(dir.path())).unwrap();
    let ops = KioskOperations::new(
        store,
        test_config(&dir),
        channel.clone(),
        bridge.clone(),
        gateway.clone(),
    );
    (ops, channel, bridge, gateway, dir)
}

// =========================================================================
// Cash to bridge
// =========================================================================

#[tokio::test]
async fn test_cash_to_bridge_full_flow() {
    let (ops, channel, bridge, _gateway, _dir) = create_test_ops();

    let start = ops.start_session(Some("kiosk-7".into())).await.unwrap();
    assert!(start.channel_id.is_some());

    ops.deposit_to_session(&start.session_id, amt("1.00")).await.unwrap();
    ops.deposit_to_session(&start.session_id, amt("1.00")).await.unwrap();

    let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
    assert_eq!(session.total_deposited, amt("2.00"));
    // Each deposit mirrored the running balance into the channel.
    assert_eq!(channel.resizes().len(), 2);
    assert_eq!(channel.resizes()[1].1, amt("2.00"));

    let end = ops
        .end_session(&start.session_id, "0xdest", "base_sepolia")
        .await
        .unwrap();
    assert!(end.success);
    assert_eq!(end.settled_amount, amt("1.99998"));
    assert_eq!(end.fee.fee, amt("0.00002"));

    // Channel closed before the bridge ran; fee recipient forwarded.
    assert_eq!(channel.open_count(), 0);
    let transfers = bridge.transfers();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].net_amount, amt("1.99998"));
    assert_eq!(
        transfers[0].fee_recipient.as_deref(),
        Some("0x00000000000000000000000000000000000000fe")
    );

    let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Settled);
    assert_eq!(session.bridge_tx_hash, end.bridge_tx_hash);
}

#[tokio::test]
async fn test_forced_bridge_failure_scenario() {
    let (ops, _channel, bridge, _gateway, _dir) = create_test_ops();
    bridge.set_mode(BridgeMode::Fail("insufficient liquidity".into()));

    let start = ops.start_session(None).await.unwrap();
    ops.deposit_to_session(&start.session_id, amt("1.00")).await.unwrap();
    ops.deposit_to_session(&start.session_id, amt("1.00")).await.unwrap();

    let end = ops
        .end_session(&start.session_id, "0xdest", "base_sepolia")
        .await
        .unwrap();
    assert!(!end.success);
    assert_eq!(end.settled_amount, Amount::ZERO);

    let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Failed);
    assert_eq!(session.total_deposited, amt("2.00"));
}

// =========================================================================
// Cash to PIN wallet to claim
// =========================================================================

#[tokio::test]
async fn test_cash_to_pin_to_claim_flow() {
    let (ops, _channel, bridge, _gateway, _dir) = create_test_ops();

    let start = ops.start_session(None).await.unwrap();
    ops.deposit_to_session(&start.session_id, amt("3.00")).await.unwrap();

    let pin_result = ops.session_to_pin(&start.session_id).await.unwrap();
    assert_eq!(pin_result.pin.len(), 6);
    assert_eq!(pin_result.amount, amt("3.00"));

    // Wrong PIN reveals nothing.
    let err = ops.lookup_pin_wallet(&pin_result.wallet_id, "000000").unwrap_err();
    assert!(matches!(err, OpsError::InvalidPin));

    // Correct PIN shows the amount.
    let lookup = ops
        .lookup_pin_wallet(&pin_result.wallet_id, &pin_result.pin)
        .unwrap();
    assert_eq!(lookup.amount, amt("3.00"));

    // First claim attempt fails; the wallet survives untouched.
    bridge.set_mode(BridgeMode::Error("rpc unreachable".into()));
    let claim = ops
        .claim_pin_wallet(&pin_result.wallet_id, &pin_result.pin, "0xdest", "base_sepolia")
        .await
        .unwrap();
    assert!(!claim.success);

    let wallet = ops.store.wallets.get(&pin_result.wallet_id).unwrap().unwrap();
    assert_eq!(wallet.status, WalletStatus::PendingBridge);
    assert_eq!(wallet.amount, amt("3.00"));

    // Retry with the same PIN succeeds and is terminal.
    bridge.set_mode(BridgeMode::Succeed);
    let claim = ops
        .claim_pin_wallet(&pin_result.wallet_id, &pin_result.pin, "0xdest", "base_sepolia")
        .await
        .unwrap();
    assert!(claim.success);

    let wallet = ops.store.wallets.get(&pin_result.wallet_id).unwrap().unwrap();
    assert_eq!(wallet.status, WalletStatus::Settled);

    let err = ops
        .claim_pin_wallet(&pin_result.wallet_id, &pin_result.pin, "0xdest", "base_sepolia")
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::WalletNotFound(_)));
}

// =========================================================================
// Card to merchant
// =========================================================================

#[tokio::test]
async fn test_card_payment_flow_with_refund() {
    let (ops, _channel, _bridge, gateway, _dir) = create_test_ops();

    ops.create_card(Some("A1B2C3")).unwrap();
    ops.set_pin("A1B2C3", "4242").unwrap();
    ops.top_up("A1B2C3", amt("10.00")).unwrap();

    // Successful payment burns and mints through the gateway.
    let payment = ops
        .process_payment("A1B2C3", "4242", "beers", amt("4.00"))
        .await
        .unwrap();
    assert!(payment.success);
    assert_eq!(payment.new_balance, Some(amt("6.00")));
    assert_eq!(gateway.transfers().len(), 1);
    assert_eq!(gateway.mints().len(), 1);

    // A rejected burn refunds the card to net zero.
    gateway.set_fail_transfer(true);
    let payment = ops
        .process_payment("A1B2C3", "4242", "beers", amt("2.00"))
        .await
        .unwrap();
    assert!(!payment.success);
    assert!(payment.refunded);

    let card = ops.store.cards.get("A1B2C3").unwrap().unwrap();
    assert_eq!(card.balance, amt("6.00"));
    assert_eq!(card.total_loaded, amt("12.00"));
    assert_eq!(card.total_spent, amt("6.00"));
    assert_eq!(
        card.balance,
        card.total_loaded.checked_sub(card.total_spent).unwrap()
    );
}

// =========================================================================
// Persistence
// =========================================================================

#[tokio::test]
async fn test_ledger_survives_process_restart() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let wallet_id;
    let pin;
    {
        let store = LedgerStore::open(StoreConfig::new(dir.path())).unwrap();
        let ops = KioskOperations::new(
            store,
            config.clone(),
            MockChannelClient::new(),
            MockBridgeClient::new(),
            MockGatewayClient::new(),
        );
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("3.00")).await.unwrap();
        let result = ops.session_to_pin(&start.session_id).await.unwrap();
        wallet_id = result.wallet_id;
        pin = result.pin;

        ops.create_card(Some("CARD42")).unwrap();
        ops.top_up("CARD42", amt("7.50")).unwrap();
    }

    // A fresh process reopens the same files and picks up where it left off.
    let store = LedgerStore::open(StoreConfig::new(dir.path())).unwrap();
    let ops = KioskOperations::new(
        store,
        config,
        MockChannelClient::new(),
        MockBridgeClient::new(),
        MockGatewayClient::new(),
    );

    assert_eq!(ops.get_balance("CARD42").unwrap().balance, amt("7.50"));
    let lookup = ops.lookup_pin_wallet(&wallet_id, &pin).unwrap();
    assert_eq!(lookup.amount, amt("3.00"));

    let claim = ops
        .claim_pin_wallet(&wallet_id, &pin, "0xdest", "base_sepolia")
        .await
        .unwrap();
    assert!(claim.success);
}
