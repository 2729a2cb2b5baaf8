//! Deterministic scoring engine for crease.
//!
//! This crate is the heart of the system. It provides:
//! - [`MatchState`]: the derived state of one match, a pure fold output
//! - [`Reducer`]: `(config, ordered deliveries) -> MatchState`, with a
//!   single-step apply path for incremental appends
//! - [`CorrectionEngine`]: edit-by-id plus full replay from scratch, and
//!   undo-last as its degenerate case
//!
//! Nothing here performs I/O, reads a clock, or keeps hidden state: the
//! same ledger always folds to the same state.

pub mod correction;
pub mod error;
pub mod reducer;
pub mod state;

pub use correction::{Correction, CorrectionEngine};
pub use error::{CorrectionError, SequenceViolation};
pub use reducer::{Fold, Reducer};
pub use state::{
    BattingEntry, BowlingEntry, FirstInningsSummary, MatchState, MatchStatus,
};
