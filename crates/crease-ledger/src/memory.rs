use std::collections::HashMap;
use std::sync::RwLock;

use crease_types::MatchId;

use crate::error::StoreError;
use crate::ledger::Ledger;
use crate::traits::LedgerStore;

/// In-memory ledger store for tests, local demos, and embedding.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<HashMap<MatchId, Ledger>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Io("store write lock poisoned".into()))?;
        inner.insert(ledger.match_id(), ledger.clone());
        Ok(())
    }

    fn load(&self, match_id: MatchId) -> Result<Option<Ledger>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Io("store read lock poisoned".into()))?;
        Ok(inner.get(&match_id).cloned())
    }

    fn matches(&self) -> Result<Vec<MatchId>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Io("store read lock poisoned".into()))?;
        let mut ids: Vec<_> = inner.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
