//! The connection-state store.

use crate::error::Result;
use crate::state::{apply_update, validate_update, ValidatedUpdate};
use crate::subscriptions::{SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager};
use crate::types::{ConnectionState, StateUpdate, TransitionKind, Version};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Connector name, used in logs and events.
    pub name: String,

    /// Number of replaced snapshots kept for comparison (0 disables history).
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "Web3React".to_string(),
            history_limit: 16,
        }
    }
}

/// The installed snapshot and its position.
struct Installed {
    version: Version,
    state: Arc<ConnectionState>,
}

struct StoreInner {
    /// Store configuration.
    config: StoreConfig,

    /// Current snapshot. Swapped wholesale, never mutated.
    current: RwLock<Installed>,

    /// Replaced snapshots, oldest first.
    history: Mutex<VecDeque<(Version, Arc<ConnectionState>)>>,

    /// Subscription manager.
    subscriptions: SubscriptionManager,

    /// Serializes transitions so they apply in arrival order.
    write_lock: Mutex<()>,
}

/// Single source of truth for one connector's connection state.
///
/// Cloning yields another handle to the same store. Every transition
/// (`update`, `reset_state`, `start_activation`, `Activation::cancel`) is
/// applied under one lock and published to subscribers before the next one
/// begins.
#[derive(Clone)]
pub struct ConnectionStore {
    inner: Arc<StoreInner>,
}

impl ConnectionStore {
    /// Create a store holding the default snapshot.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                config,
                current: RwLock::new(Installed {
                    version: Version::default(),
                    state: Arc::new(ConnectionState::default()),
                }),
                history: Mutex::new(VecDeque::new()),
                subscriptions: SubscriptionManager::new(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Create a store with default settings under the given connector name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self::new(StoreConfig {
            name: name.into(),
            ..Default::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // --- Reads ---

    /// The current snapshot.
    pub fn get_state(&self) -> Arc<ConnectionState> {
        Arc::clone(&self.inner.current.read().state)
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> Version {
        self.inner.current.read().version
    }

    /// The current snapshot together with its version, read consistently.
    pub fn snapshot(&self) -> (Version, Arc<ConnectionState>) {
        let current = self.inner.current.read();
        (current.version, Arc::clone(&current.state))
    }

    /// Replaced snapshots, oldest first.
    pub fn history(&self) -> Vec<(Version, Arc<ConnectionState>)> {
        self.inner.history.lock().iter().cloned().collect()
    }

    // --- Transitions ---

    /// Apply a partial update and return the resulting snapshot.
    ///
    /// Chain id and accounts are validated before anything is applied; on
    /// error the store is left exactly as it was.
    pub fn update(&self, update: StateUpdate, skip_validation: bool) -> Result<Arc<ConnectionState>> {
        let validated = validate_update(update, skip_validation).map_err(|e| {
            warn!(store = %self.name(), error = %e, "rejected state update");
            e
        })?;

        Ok(self.commit(TransitionKind::Update, |existing| {
            apply_update(existing, validated)
        }))
    }

    /// Return to the default snapshot.
    pub fn reset_state(&self) -> Arc<ConnectionState> {
        self.commit(TransitionKind::Reset, |_| ConnectionState::default())
    }

    /// Mark a connection attempt as in flight.
    ///
    /// The returned token abandons the attempt when cancelled.
    pub fn start_activation(&self) -> Activation {
        self.commit(TransitionKind::ActivationStarted, |existing| {
            apply_update(existing, ValidatedUpdate::start_activation())
        });
        Activation {
            store: self.clone(),
        }
    }

    // --- Subscriptions ---

    /// Subscribe to installed snapshots.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.inner.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.subscription_count()
    }

    /// Install the snapshot computed from the current one.
    fn commit<F>(&self, kind: TransitionKind, next: F) -> Arc<ConnectionState>
    where
        F: FnOnce(&ConnectionState) -> ConnectionState,
    {
        let _lock = self.inner.write_lock.lock();

        let (previous_version, previous) = self.snapshot();
        let state = Arc::new(next(&*previous));
        let changed = previous.changed_fields(&state);
        let version = previous_version.next();

        *self.inner.current.write() = Installed {
            version,
            state: Arc::clone(&state),
        };

        let limit = self.inner.config.history_limit;
        if limit > 0 {
            let mut history = self.inner.history.lock();
            history.push_back((previous_version, previous));
            while history.len() > limit {
                history.pop_front();
            }
        }

        debug!(
            store = %self.name(),
            %version,
            %kind,
            ?changed,
            activating = state.activating,
            chain_id = ?state.chain_id,
            "installed snapshot"
        );

        // Still under the write lock: subscribers see transitions in apply order.
        self.inner
            .subscriptions
            .broadcast_transition(self.name(), version, kind, changed, Arc::clone(&state));

        state
    }
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for ConnectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (version, state) = self.snapshot();
        f.debug_struct("ConnectionStore")
            .field("name", &self.name())
            .field("version", &version)
            .field("state", &state)
            .finish()
    }
}

/// An in-flight activation started by [`ConnectionStore::start_activation`].
///
/// Dropping the token lets the activation settle; `cancel` abandons it.
#[must_use]
pub struct Activation {
    store: ConnectionStore,
}

impl Activation {
    /// Abandon the attempt: clears `activating`, `adding_chain` and
    /// `switching_chain`, leaving chain id and accounts untouched.
    ///
    /// Harmless if a later update already cleared those fields.
    pub fn cancel(self) -> Arc<ConnectionState> {
        self.store.commit(TransitionKind::ActivationCancelled, |existing| {
            apply_update(existing, ValidatedUpdate::cancel_activation())
        })
    }

    /// The store this activation belongs to.
    pub fn store(&self) -> &ConnectionStore {
        &self.store
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("store", &self.store.name())
            .finish()
    }
}
