//! Choosing one store among several connectors.

use crate::store::ConnectionStore;

/// The first active store in priority order, or the first store if none is
/// active.
pub fn priority_store(stores: &[ConnectionStore]) -> Option<&ConnectionStore> {
    stores
        .iter()
        .find(|store| store.get_state().is_active())
        .or_else(|| stores.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateUpdate;

    const A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_empty() {
        assert!(priority_store(&[]).is_none());
    }

    #[test]
    fn test_falls_back_to_first() {
        let stores = vec![
            ConnectionStore::with_name("metamask"),
            ConnectionStore::with_name("walletconnect"),
        ];
        assert_eq!(priority_store(&stores).unwrap().name(), "metamask");
    }

    #[test]
    fn test_prefers_first_active() {
        let stores = vec![
            ConnectionStore::with_name("metamask"),
            ConnectionStore::with_name("walletconnect"),
            ConnectionStore::with_name("network"),
        ];
        stores[1]
            .update(StateUpdate::new().chain_id(1).accounts([A]), false)
            .unwrap();
        stores[2]
            .update(StateUpdate::new().chain_id(1).accounts(Vec::<String>::new()), false)
            .unwrap();

        assert_eq!(priority_store(&stores).unwrap().name(), "walletconnect");
    }

    #[test]
    fn test_activating_store_is_not_active() {
        let stores = vec![
            ConnectionStore::with_name("metamask"),
            ConnectionStore::with_name("network"),
        ];
        let _activation = stores[0].start_activation();
        stores[1]
            .update(StateUpdate::new().chain_id(1).accounts(Vec::<String>::new()), false)
            .unwrap();

        assert_eq!(priority_store(&stores).unwrap().name(), "network");
    }
}
