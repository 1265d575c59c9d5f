//! Subscription manager for broadcasting store events.

use crate::types::{ConnectionState, StateField, TransitionKind, Version};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

use super::types::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    filter: SubscriptionFilter,
    sender: Sender<StoreEvent>,
}

impl Subscription {
    /// Try to send an event. `Err` carries the reason the subscriber must go.
    fn try_send(&self, event: StoreEvent) -> Result<(), DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        let subscription = Subscription {
            filter: config.filter,
            sender,
        };

        self.subscriptions.write().insert(id, subscription);

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Send dropped event (best effort)
            let _ = sub.sender.try_send(StoreEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Broadcast an installed snapshot to matching subscriptions.
    pub fn broadcast_transition(
        &self,
        store: &str,
        version: Version,
        cause: TransitionKind,
        changed: Vec<StateField>,
        state: Arc<ConnectionState>,
    ) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            let targets: Vec<_> = subs
                .iter()
                .filter(|(_, sub)| sub.filter.matches(&changed))
                .collect();
            if targets.is_empty() {
                return;
            }

            let event = StoreEvent::StateChanged {
                store: store.to_string(),
                version,
                cause,
                changed,
                state,
            };

            for (id, sub) in targets {
                if let Err(reason) = sub.try_send(event.clone()) {
                    to_remove.push((*id, reason));
                }
            }
        }

        // Remove dropped subscriptions
        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, reason) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    trace!(store, subscription = id.0, ?reason, "dropping subscriber");
                    // Try to notify about the drop (might fail, that's ok)
                    let _ = sub.sender.try_send(StoreEvent::Dropped { reason });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn broadcast(manager: &SubscriptionManager, version: u64, changed: Vec<StateField>) {
        manager.broadcast_transition(
            "test",
            Version(version),
            TransitionKind::Update,
            changed,
            Arc::new(ConnectionState::default()),
        );
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager = SubscriptionManager::new();

        let handle = manager.subscribe(SubscriptionConfig::default());
        assert_eq!(manager.subscription_count(), 1);

        manager.unsubscribe(handle.id);
        assert_eq!(manager.subscription_count(), 0);

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(
            event,
            StoreEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        ));
    }

    #[test]
    fn test_broadcast_to_matching() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::fields(vec![StateField::ChainId]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        broadcast(&manager, 1, vec![StateField::ChainId]);

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        match event {
            StoreEvent::StateChanged { store, version, changed, .. } => {
                assert_eq!(store, "test");
                assert_eq!(version, Version(1));
                assert_eq!(changed, vec![StateField::ChainId]);
            }
            _ => panic!("Expected StateChanged event, got {:?}", event),
        }
    }

    #[test]
    fn test_broadcast_filters_non_matching() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::fields(vec![StateField::Accounts]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        broadcast(&manager, 1, vec![StateField::Activating]);
        broadcast(&manager, 2, vec![]);

        let result = handle.recv_timeout(Duration::from_millis(50));
        assert!(result.is_err());
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let manager = SubscriptionManager::new();
        let config = SubscriptionConfig {
            buffer_size: 2,
            filter: SubscriptionFilter::all(),
        };
        let _handle = manager.subscribe(config);

        for i in 0..10 {
            broadcast(&manager, i, vec![StateField::Activating]);
        }

        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_drop_disconnected_subscriber() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig::default());
        drop(handle);

        broadcast(&manager, 1, vec![StateField::ChainId]);
        assert_eq!(manager.subscription_count(), 0);
    }
}
