//! Static validation of chain ids and account addresses.
//!
//! These checks only look at the incoming value, never at existing state.

use crate::error::{Result, StateError};
use crate::types::{AccountInput, ChainId, MAX_SAFE_CHAIN_ID};
use alloy_primitives::Address;

/// Length of an address body in hex digits.
const ADDRESS_HEX_LEN: usize = 40;

/// Reject chain ids outside `1..=MAX_SAFE_CHAIN_ID`.
pub fn validate_chain_id(chain_id: ChainId) -> Result<()> {
    if chain_id <= 0 || chain_id > MAX_SAFE_CHAIN_ID {
        return Err(StateError::InvalidChainId(chain_id.to_string()));
    }
    Ok(())
}

/// Parse a chain id as reported by a provider.
///
/// Accepts `0x`-prefixed hex (the `eth_chainId` / `chainChanged` form) or a
/// decimal string. The result is validated.
pub fn parse_chain_id(raw: &str) -> Result<ChainId> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => ChainId::from_str_radix(hex, 16),
        None => trimmed.parse::<ChainId>(),
    };

    let chain_id = parsed.map_err(|_| StateError::InvalidChainId(raw.to_string()))?;
    validate_chain_id(chain_id)?;
    Ok(chain_id)
}

/// Validate an account and return its EIP-55 checksummed form.
pub fn validate_account(account: &AccountInput) -> Result<String> {
    checksum_address(account.address())
}

/// Checksum a hex address.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase inputs are
/// accepted as-is; a mixed-case input must already carry a correct checksum.
pub fn checksum_address(raw: &str) -> Result<String> {
    let hex = raw.strip_prefix("0x").unwrap_or(raw);

    if hex.len() != ADDRESS_HEX_LEN {
        return Err(StateError::invalid_address(
            raw,
            format!("expected {ADDRESS_HEX_LEN} hex digits, got {}", hex.len()),
        ));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StateError::invalid_address(raw, "non-hex character"));
    }

    let address: Address = hex
        .parse()
        .map_err(|e| StateError::invalid_address(raw, format!("{e}")))?;
    let checksummed = address.to_checksum(None);

    let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase())
        && hex.bytes().any(|b| b.is_ascii_lowercase());
    if mixed_case && &checksummed[2..] != hex {
        return Err(StateError::invalid_address(raw, "bad address checksum"));
    }

    Ok(checksummed)
}

/// Validate and checksum every account, failing on the first bad one.
pub fn validate_accounts(accounts: Vec<AccountInput>) -> Result<Vec<String>> {
    accounts.iter().map(validate_account).collect()
}
