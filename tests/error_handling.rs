//! Error handling and edge case tests.

use wallet_state::{
    AccountInput, ConnectionStore, StateError, StateUpdate, MAX_SAFE_CHAIN_ID,
};

const A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

// --- Chain Id Errors ---

#[test]
fn test_negative_chain_id() {
    let store = ConnectionStore::default();
    let before = store.get_state();

    let result = store.update(StateUpdate::new().chain_id(-5), false);

    assert_eq!(result, Err(StateError::InvalidChainId("-5".to_string())));
    assert_eq!(store.get_state(), before);
}

#[test]
fn test_chain_id_bounds() {
    let store = ConnectionStore::default();

    assert!(store.update(StateUpdate::new().chain_id(0), false).is_err());
    assert!(store
        .update(StateUpdate::new().chain_id(MAX_SAFE_CHAIN_ID + 1), false)
        .is_err());

    let state = store
        .update(StateUpdate::new().chain_id(MAX_SAFE_CHAIN_ID), false)
        .unwrap();
    assert_eq!(state.chain_id, Some(MAX_SAFE_CHAIN_ID));
}

#[test]
fn test_invalid_chain_id_rejects_accounts_too() {
    let store = ConnectionStore::default();

    let result = store.update(StateUpdate::new().chain_id(0).accounts([A]), false);

    assert!(matches!(result, Err(StateError::InvalidChainId(_))));
    assert_eq!(store.get_state().accounts, None);
}

#[test]
fn test_skip_validation_accepts_out_of_range_chain() {
    let store = ConnectionStore::default();

    let state = store.update(StateUpdate::new().chain_id(0), true).unwrap();
    assert_eq!(state.chain_id, Some(0));
}

// --- Address Errors ---

#[test]
fn test_one_bad_address_rejects_list() {
    let store = ConnectionStore::default();
    store.update(StateUpdate::new().accounts([A]), false).unwrap();
    let before = store.snapshot();

    let result = store.update(
        StateUpdate::new().accounts([
            AccountInput::from(A),
            AccountInput::from(B),
            AccountInput::from("0x123"),
        ]),
        false,
    );

    match result {
        Err(StateError::InvalidAddress { address, .. }) => assert_eq!(address, "0x123"),
        other => panic!("Expected InvalidAddress, got {:?}", other),
    }
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_bad_checksum_rejected() {
    let store = ConnectionStore::default();

    let result = store.update(
        StateUpdate::new().accounts(["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"]),
        false,
    );

    assert!(matches!(result, Err(StateError::InvalidAddress { .. })));
}

#[test]
fn test_error_messages() {
    let err = StateError::InvalidChainId("-5".to_string());
    assert_eq!(err.to_string(), "Invalid chainId -5");

    let store = ConnectionStore::default();
    let err = store
        .update(StateUpdate::new().accounts(["0x123"]), false)
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid address 0x123"));
}

#[test]
fn test_skip_validation_stores_raw_addresses() {
    let store = ConnectionStore::default();

    let state = store
        .update(
            StateUpdate::new().accounts([AccountInput::Wallet {
                address: "not-hex".to_string(),
            }]),
            true,
        )
        .unwrap();
    assert_eq!(state.accounts, Some(vec!["not-hex".to_string()]));
}

// --- Edge Cases ---

#[test]
fn test_cancel_after_reset() {
    let store = ConnectionStore::default();
    let activation = store.start_activation();
    store.reset_state();

    let state = activation.cancel();
    assert!(!state.activating);
    assert_eq!(state.chain_id, None);
}

#[test]
fn test_empty_update_is_noop() {
    let store = ConnectionStore::default();
    store
        .update(StateUpdate::new().chain_id(1).accounts([A, B]).account_index(1), false)
        .unwrap();
    let before = store.get_state();

    let after = store.update(StateUpdate::new(), false).unwrap();
    assert_eq!(after, before);
}

#[test]
fn test_activating_false_explicitly_requested() {
    let store = ConnectionStore::default();
    let _activation = store.start_activation();

    let state = store.update(StateUpdate::new().activating(false), false).unwrap();
    assert!(!state.activating);
}
