use crease_types::{DeliveryId, PlayerId};

use crease_ledger::ValidationError;

/// A well-formed delivery that is illegal given fold-time context.
///
/// The reducer is the authority that rejects these; it never skips a
/// delivery or patches one into shape. A fold either applies every entry
/// or fails on the first violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceViolation {
    #[error("delivery {id} submitted after the match completed")]
    MatchAlreadyCompleted { id: DeliveryId },

    #[error("delivery {id}: {found} is not on strike ({expected} is)")]
    StrikeMismatch {
        id: DeliveryId,
        expected: PlayerId,
        found: PlayerId,
    },

    #[error("delivery {id}: batters {found_striker}/{found_non_striker} do not match the pair at the crease")]
    BatterPairMismatch {
        id: DeliveryId,
        found_striker: PlayerId,
        found_non_striker: PlayerId,
    },

    #[error("delivery {id}: {player} was already dismissed and cannot bat again")]
    DismissedBatterReturned { id: DeliveryId, player: PlayerId },

    #[error("delivery {id}: {bowler} bowled the previous over and no change override is recorded")]
    AdjacentOverBowler { id: DeliveryId, bowler: PlayerId },

    #[error("delivery {id}: bowler changed mid-over from {expected} to {found} without an override")]
    MidOverBowlerChange {
        id: DeliveryId,
        expected: PlayerId,
        found: PlayerId,
    },

    #[error("delivery {id}: {player} is not in the {team} squad")]
    PlayerNotInSquad {
        id: DeliveryId,
        player: PlayerId,
        team: String,
    },
}

/// Failure modes of the correction/replay engine.
///
/// Every variant is terminal for the single operation that raised it, and
/// the caller's ledger and state are left exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrectionError {
    #[error("no delivery with id {0}")]
    NotFound(DeliveryId),

    #[error("edited delivery is malformed: {0}")]
    InvalidEdit(#[from] ValidationError),

    #[error("match is completed; its ledger can no longer be corrected")]
    MatchCompleted,

    #[error("ledger is empty; nothing to undo")]
    Empty,

    #[error("replay of the corrected ledger failed: {0}")]
    Replay(#[from] SequenceViolation),
}
