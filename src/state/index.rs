//! Selected-account tracking across account list changes.

/// Derive the selected account index after the account list changes.
///
/// Handles a single append or a single removal; any other recomposition of
/// equal length keeps the previous index.
pub fn derive_account_index(
    previous: Option<&[String]>,
    previous_index: Option<usize>,
    next: Option<&[String]>,
) -> Option<usize> {
    let next = next?;

    let previous = match previous {
        Some(previous) if !previous.is_empty() => previous,
        _ => return if next.is_empty() { None } else { Some(0) },
    };

    if next.len() > previous.len() {
        // Appended: follow the newest account.
        let last = next.last()?;
        return next.iter().position(|account| account == last);
    }

    if next.len() < previous.len() {
        let Some(removed_index) = previous
            .iter()
            .position(|account| !next.contains(account))
        else {
            return previous_index;
        };

        if Some(removed_index) == previous_index {
            return if next.is_empty() { None } else { Some(0) };
        }

        let selected = previous_index.unwrap_or(0);
        if removed_index < selected {
            return Some(selected.saturating_sub(1));
        }
    }

    previous_index
}

/// Keep the index inside the account list, falling back to the first account.
///
/// Applied to explicitly requested indexes, and to derived ones since removing
/// several accounts at once can leave a derived index past the end.
pub fn clamp_account_index(index: Option<usize>, accounts: Option<&[String]>) -> Option<usize> {
    let len = accounts.map_or(0, <[String]>::len);
    if len == 0 {
        return None;
    }
    match index {
        Some(index) if index < len => Some(index),
        _ => Some(0),
    }
}
