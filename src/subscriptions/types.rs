//! Subscription types for live store updates.

use crate::types::{ConnectionState, StateField, TransitionKind, Version};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
///
/// The default delivers every transition that changed at least one field.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only deliver transitions touching one of these fields (None = any field).
    pub fields: Option<Vec<StateField>>,

    /// Also deliver transitions that left the snapshot unchanged.
    pub include_unchanged: bool,
}

impl SubscriptionFilter {
    /// Every transition, including no-op ones.
    pub fn all() -> Self {
        Self {
            fields: None,
            include_unchanged: true,
        }
    }

    /// Transitions that changed any field.
    pub fn changes() -> Self {
        Self::default()
    }

    /// Transitions that changed one of `fields`.
    pub fn fields(fields: Vec<StateField>) -> Self {
        Self {
            fields: Some(fields),
            include_unchanged: false,
        }
    }

    pub(crate) fn matches(&self, changed: &[StateField]) -> bool {
        if changed.is_empty() {
            return self.include_unchanged;
        }
        match &self.fields {
            Some(fields) => changed.iter().any(|field| fields.contains(field)),
            None => true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A snapshot was installed.
    StateChanged {
        /// Name of the store (connector) that changed.
        store: String,
        version: Version,
        cause: TransitionKind,
        /// Fields that differ from the previous snapshot.
        changed: Vec<StateField>,
        state: Arc<ConnectionState>,
    },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_skips_unchanged() {
        let filter = SubscriptionFilter::default();
        assert!(!filter.matches(&[]));
        assert!(filter.matches(&[StateField::Activating]));
    }

    #[test]
    fn test_field_filter() {
        let filter = SubscriptionFilter::fields(vec![StateField::ChainId, StateField::Accounts]);
        assert!(filter.matches(&[StateField::Activating, StateField::ChainId]));
        assert!(!filter.matches(&[StateField::Activating]));
        assert!(!filter.matches(&[]));
    }

    #[test]
    fn test_all_filter() {
        let filter = SubscriptionFilter::all();
        assert!(filter.matches(&[]));
        assert!(filter.matches(&[StateField::WatchingAsset]));
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = StoreEvent::Dropped {
            reason: DropReason::Unsubscribed,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "dropped");
        assert_eq!(value["reason"], "unsubscribed");
    }
}
