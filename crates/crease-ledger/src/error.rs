use crease_types::{DeliveryId, DismissalKind, Extra, PlayerId};

/// A malformed delivery, rejected before it touches the ledger.
///
/// These are field-level rules (the extras constraint table and structural
/// sanity); they never depend on fold-time context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a {extra} must carry at least one extra run")]
    MissingExtraRuns { extra: Extra },

    #[error("an ordinary delivery cannot carry extra runs (found {found})")]
    UnexpectedExtraRuns { found: u32 },

    #[error("runs off the bat are impossible on a {extra} (found {found})")]
    RunsOffBatForbidden { extra: Extra, found: u32 },

    #[error("striker and non-striker are the same player: {0}")]
    IdenticalBatters(PlayerId),

    #[error("bowler {0} cannot also be at the crease")]
    BowlerAtCrease(PlayerId),

    #[error("a batter cannot be {kind} on a {extra}")]
    DismissalImpossible { kind: DismissalKind, extra: Extra },

    #[error("dismissed player {0} is not one of the two batters on this delivery")]
    DismissedNotAtCrease(PlayerId),

    #[error("only the striker can be {kind}, but {player} is the non-striker")]
    StrikerOnlyDismissal { kind: DismissalKind, player: PlayerId },
}

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no delivery with id {0}")]
    NotFound(DeliveryId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("ledger is empty; nothing to remove")]
    Empty,
}

/// Errors produced by ledger store implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
