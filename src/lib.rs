//! # Wallet State
//!
//! A connection-state store for wallet connectors: which chain a client is
//! on, which accounts are exposed, which one is selected, and whether a
//! connection, chain addition, chain switch or asset registration is in
//! flight.
//!
//! ## Core Concepts
//!
//! - **Snapshots**: immutable `ConnectionState` values, replaced wholesale on
//!   every transition
//! - **Updates**: presence-aware partial updates, validated before they apply
//! - **Activations**: tokens that abandon an in-flight connection attempt
//! - **Subscriptions**: bounded channels notified after each transition
//!
//! ## Example
//!
//! ```ignore
//! use wallet_state::{ConnectionStore, StateUpdate};
//!
//! let store = ConnectionStore::with_name("MetaMask");
//!
//! let activation = store.start_activation();
//! store.update(
//!     StateUpdate::new()
//!         .chain_id(1)
//!         .accounts(["0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"]),
//!     false,
//! )?;
//!
//! assert!(store.get_state().is_active());
//! # drop(activation);
//! ```

pub mod error;
pub mod priority;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod validation;

// Re-exports
pub use error::{Result, StateError};
pub use priority::priority_store;
pub use state::{apply_update, derive_account_index, validate_update, ValidatedUpdate};
pub use store::{Activation, ConnectionStore, StoreConfig};
pub use subscriptions::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
pub use validation::{
    checksum_address, parse_chain_id, validate_account, validate_accounts, validate_chain_id,
};
