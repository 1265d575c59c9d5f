//! Pure state transitions.
//!
//! Updates are validated first, then reduced against the current snapshot.
//! Neither step touches the store, so both can be exercised in isolation.

mod index;
mod operations;

pub use index::{clamp_account_index, derive_account_index};
pub use operations::{apply_update, validate_update, ValidatedUpdate};
