//! Core types for the connection-state store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Network identifier as reported by a connector.
///
/// Signed: negative values from a backend must be representable to be rejected.
pub type ChainId = i64;

/// Upper bound accepted for a chain id.
///
/// `MAX_SAFE_CHAIN_ID = floor((2^53 - 39) / 2) = 4503599627370476`
pub const MAX_SAFE_CHAIN_ID: ChainId = 4_503_599_627_370_476;

/// Position of a snapshot in the store's transition order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account as delivered by a connector: either a bare address or an
/// object carrying an `address` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountInput {
    Address(String),
    Wallet { address: String },
}

impl AccountInput {
    /// The raw, unvalidated address string.
    pub fn address(&self) -> &str {
        match self {
            AccountInput::Address(address) => address,
            AccountInput::Wallet { address } => address,
        }
    }

    pub fn into_address(self) -> String {
        match self {
            AccountInput::Address(address) => address,
            AccountInput::Wallet { address } => address,
        }
    }
}

impl From<&str> for AccountInput {
    fn from(address: &str) -> Self {
        AccountInput::Address(address.to_string())
    }
}

impl From<String> for AccountInput {
    fn from(address: String) -> Self {
        AccountInput::Address(address)
    }
}

/// A network being added to the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddingChain {
    pub chain_id: ChainId,
}

/// A network switch in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchingChain {
    pub from_chain_id: ChainId,
    pub to_chain_id: ChainId,
}

/// An asset registration (EIP-747 `wallet_watchAsset`) in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchAsset {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_chain_id: Option<ChainId>,
}

/// Presence-aware field of a partial update.
///
/// `Keep` leaves the current value alone, `Clear` explicitly unsets it and
/// `Set` replaces it. In JSON an absent key is `Keep` and `null` is `Clear`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
    Clear,
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Resolve against the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current,
            Patch::Set(value) => Some(value),
            Patch::Clear => None,
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => serializer.serialize_some(value),
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// Names of the snapshot fields, used for change reporting and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    ChainId,
    Accounts,
    AccountIndex,
    Activating,
    AddingChain,
    SwitchingChain,
    WatchingAsset,
}

/// One immutable snapshot of connection state.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionState {
    pub chain_id: Option<ChainId>,
    pub accounts: Option<Vec<String>>,
    pub account_index: Option<usize>,
    pub activating: bool,
    pub adding_chain: Option<AddingChain>,
    pub switching_chain: Option<SwitchingChain>,
    pub watching_asset: Option<WatchAsset>,
}

impl ConnectionState {
    /// The selected account, if any.
    pub fn account(&self) -> Option<&str> {
        let accounts = self.accounts.as_ref()?;
        accounts.get(self.account_index?).map(String::as_str)
    }

    /// Connected: both chain and accounts are known and no attempt is in flight.
    pub fn is_active(&self) -> bool {
        self.chain_id.is_some() && self.accounts.is_some() && !self.activating
    }

    /// Fields whose values differ between `self` and `other`.
    pub fn changed_fields(&self, other: &ConnectionState) -> Vec<StateField> {
        let mut changed = Vec::new();
        if self.chain_id != other.chain_id {
            changed.push(StateField::ChainId);
        }
        if self.accounts != other.accounts {
            changed.push(StateField::Accounts);
        }
        if self.account_index != other.account_index {
            changed.push(StateField::AccountIndex);
        }
        if self.activating != other.activating {
            changed.push(StateField::Activating);
        }
        if self.adding_chain != other.adding_chain {
            changed.push(StateField::AddingChain);
        }
        if self.switching_chain != other.switching_chain {
            changed.push(StateField::SwitchingChain);
        }
        if self.watching_asset != other.watching_asset {
            changed.push(StateField::WatchingAsset);
        }
        changed
    }
}

/// A partial update pushed by a connector.
///
/// `chain_id`, `accounts` and `activating` treat "absent" and "unset" the
/// same way; the `Patch` fields distinguish an explicit clear from absence.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<AccountInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activating: Option<bool>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub account_index: Patch<usize>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub adding_chain: Patch<AddingChain>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub switching_chain: Patch<SwitchingChain>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub watching_asset: Patch<WatchAsset>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn accounts<I, A>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AccountInput>,
    {
        self.accounts = Some(accounts.into_iter().map(Into::into).collect());
        self
    }

    pub fn activating(mut self, activating: bool) -> Self {
        self.activating = Some(activating);
        self
    }

    /// Select an explicit account index.
    pub fn account_index(mut self, index: usize) -> Self {
        self.account_index = Patch::Set(index);
        self
    }

    pub fn clear_account_index(mut self) -> Self {
        self.account_index = Patch::Clear;
        self
    }

    pub fn adding_chain(mut self, adding_chain: AddingChain) -> Self {
        self.adding_chain = Patch::Set(adding_chain);
        self
    }

    pub fn clear_adding_chain(mut self) -> Self {
        self.adding_chain = Patch::Clear;
        self
    }

    pub fn switching_chain(mut self, switching_chain: SwitchingChain) -> Self {
        self.switching_chain = Patch::Set(switching_chain);
        self
    }

    pub fn clear_switching_chain(mut self) -> Self {
        self.switching_chain = Patch::Clear;
        self
    }

    pub fn watching_asset(mut self, watching_asset: WatchAsset) -> Self {
        self.watching_asset = Patch::Set(watching_asset);
        self
    }

    pub fn clear_watching_asset(mut self) -> Self {
        self.watching_asset = Patch::Clear;
        self
    }
}

/// What produced a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Update,
    Reset,
    ActivationStarted,
    ActivationCancelled,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionKind::Update => "update",
            TransitionKind::Reset => "reset",
            TransitionKind::ActivationStarted => "activation_started",
            TransitionKind::ActivationCancelled => "activation_cancelled",
        };
        f.write_str(name)
    }
}
