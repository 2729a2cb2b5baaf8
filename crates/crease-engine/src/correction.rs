use tracing::{debug, info};

use crease_ledger::{Ledger, LedgerError};
use crease_types::{DeliveryEdit, DeliveryId, MatchConfig};

use crate::error::CorrectionError;
use crate::reducer::Reducer;
use crate::state::MatchState;

/// Result of a committed correction: the corrected ledger and the state
/// obtained by replaying it from scratch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Correction {
    pub ledger: Ledger,
    pub state: MatchState,
}

/// Edit-by-id with full replay.
///
/// Cricket's over and strike-rotation rules are history-dependent: an edit
/// to ball 3 can change who is on strike for every later ball and where
/// each over ends. There is no incremental patching of totals here, ever —
/// the whole ledger is refolded from the empty state. The operation is
/// atomic: on any failure the caller's ledger and state are untouched.
pub struct CorrectionEngine;

impl CorrectionEngine {
    /// Apply a partial edit to the delivery with the given id and replay.
    ///
    /// Rejected outright once the match has completed.
    pub fn correct(
        config: &MatchConfig,
        ledger: &Ledger,
        id: DeliveryId,
        edit: &DeliveryEdit,
    ) -> Result<Correction, CorrectionError> {
        Self::ensure_live(config, ledger)?;

        let edited = ledger.edit(id, edit).map_err(|e| match e {
            LedgerError::NotFound(id) => CorrectionError::NotFound(id),
            LedgerError::Validation(v) => CorrectionError::InvalidEdit(v),
            LedgerError::Empty => CorrectionError::Empty,
        })?;

        let fold = Reducer::fold(config, &edited)?;
        info!(id = %id, "correction replayed");
        Ok(Correction {
            ledger: fold.ledger,
            state: fold.state,
        })
    }

    /// Remove the highest-ordered delivery and replay: undo as a
    /// degenerate correction.
    pub fn undo_last(
        config: &MatchConfig,
        ledger: &Ledger,
    ) -> Result<Correction, CorrectionError> {
        Self::ensure_live(config, ledger)?;

        let (shorter, removed) = ledger.remove_last().map_err(|e| match e {
            LedgerError::Empty => CorrectionError::Empty,
            LedgerError::NotFound(id) => CorrectionError::NotFound(id),
            LedgerError::Validation(v) => CorrectionError::InvalidEdit(v),
        })?;

        let fold = Reducer::fold(config, &shorter)?;
        debug!(id = %removed.id, "last delivery undone");
        Ok(Correction {
            ledger: fold.ledger,
            state: fold.state,
        })
    }

    /// Corrections are only valid while the match is live.
    fn ensure_live(config: &MatchConfig, ledger: &Ledger) -> Result<(), CorrectionError> {
        let current = Reducer::fold_state(config, ledger)?;
        if !current.status.is_live() {
            return Err(CorrectionError::MatchCompleted);
        }
        Ok(())
    }
}
