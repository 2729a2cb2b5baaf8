use crease_types::MatchId;

use crate::error::StoreError;
use crate::ledger::Ledger;

/// Durable storage boundary for ledgers.
///
/// All implementations must satisfy these invariants:
/// - A saved ledger loads back byte-for-byte equal (exactly-once visibility
///   to subsequent folds; the store never compacts or truncates).
/// - `save` replaces any previous ledger for the same match atomically.
/// - All I/O errors are propagated, never silently ignored.
pub trait LedgerStore: Send + Sync {
    /// Durably store the ledger, keyed by its match id.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;

    /// Load the ledger for a match. Returns `Ok(None)` if none was saved.
    fn load(&self, match_id: MatchId) -> Result<Option<Ledger>, StoreError>;

    /// All match ids with a stored ledger.
    fn matches(&self) -> Result<Vec<MatchId>, StoreError>;
}
