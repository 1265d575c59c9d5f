//! Subscription system for live store updates.
//!
//! Every installed snapshot is offered to each subscriber whose filter
//! matches the fields that changed. Subscriptions use bounded buffers; a
//! subscriber that falls behind is dropped.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::fields(vec![StateField::ChainId]),
//!     ..Default::default()
//! });
//!
//! loop {
//!     match handle.recv() {
//!         Ok(StoreEvent::StateChanged { state, .. }) => println!("chain: {:?}", state.chain_id),
//!         Ok(StoreEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
