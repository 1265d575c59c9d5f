//! Reducing partial updates into snapshots.

use crate::error::Result;
use crate::state::index::{clamp_account_index, derive_account_index};
use crate::types::{
    AddingChain, ChainId, ConnectionState, Patch, StateUpdate, SwitchingChain, WatchAsset,
};
use crate::validation::{validate_accounts, validate_chain_id};

/// An update whose chain id and accounts have passed (or skipped) validation.
///
/// Applying it to a snapshot cannot fail.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ValidatedUpdate {
    pub(crate) chain_id: Option<ChainId>,
    pub(crate) accounts: Option<Vec<String>>,
    pub(crate) activating: Option<bool>,
    pub(crate) account_index: Patch<usize>,
    pub(crate) adding_chain: Patch<AddingChain>,
    pub(crate) switching_chain: Patch<SwitchingChain>,
    pub(crate) watching_asset: Patch<WatchAsset>,
}

impl ValidatedUpdate {
    /// Mark an activation attempt as in flight.
    pub fn start_activation() -> Self {
        Self {
            activating: Some(true),
            ..Default::default()
        }
    }

    /// Abandon an activation attempt. Chain id and accounts are untouched.
    pub fn cancel_activation() -> Self {
        Self {
            activating: Some(false),
            adding_chain: Patch::Clear,
            switching_chain: Patch::Clear,
            ..Default::default()
        }
    }
}

/// Validate an update independently of existing state.
///
/// With `skip_validation` the values are taken as given; account objects are
/// still unwrapped to their address.
pub fn validate_update(update: StateUpdate, skip_validation: bool) -> Result<ValidatedUpdate> {
    if let Some(chain_id) = update.chain_id {
        if !skip_validation {
            validate_chain_id(chain_id)?;
        }
    }

    let accounts = match update.accounts {
        Some(accounts) if !accounts.is_empty() && !skip_validation => {
            Some(validate_accounts(accounts)?)
        }
        Some(accounts) => Some(accounts.into_iter().map(|a| a.into_address()).collect()),
        None => None,
    };

    Ok(ValidatedUpdate {
        chain_id: update.chain_id,
        accounts,
        activating: update.activating,
        account_index: update.account_index,
        adding_chain: update.adding_chain,
        switching_chain: update.switching_chain,
        watching_asset: update.watching_asset,
    })
}

/// Compute the snapshot that follows `existing` under `update`.
pub fn apply_update(existing: &ConnectionState, update: ValidatedUpdate) -> ConnectionState {
    let chain_id = update.chain_id.or(existing.chain_id);
    let accounts = update.accounts.or_else(|| existing.accounts.clone());

    let account_index = match update.account_index {
        Patch::Keep => derive_account_index(
            existing.accounts.as_deref(),
            existing.account_index,
            accounts.as_deref(),
        ),
        Patch::Set(index) => Some(index),
        Patch::Clear => None,
    };
    let account_index = clamp_account_index(account_index, accounts.as_deref());

    // A completed connection always ends the activation.
    let mut activating = update.activating.unwrap_or(existing.activating);
    if activating && chain_id.is_some() && accounts.is_some() {
        activating = false;
    }

    ConnectionState {
        chain_id,
        accounts,
        account_index,
        activating,
        adding_chain: update.adding_chain.apply(existing.adding_chain.clone()),
        switching_chain: update.switching_chain.apply(existing.switching_chain.clone()),
        watching_asset: update.watching_asset.apply(existing.watching_asset.clone()),
    }
}
