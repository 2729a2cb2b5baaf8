//! Snapshot projector for crease.
//!
//! The projector is the single point of truth for every derived figure:
//! run rates, scorecards, extras breakdowns, phase splits. No other
//! component — and no external consumer — recomputes these from raw
//! deliveries; history shows that divergent client-side recalculation is
//! how scoreboards drift.
//!
//! Everything here is a pure, read-only derivation over
//! `(config, state, ledger)`.

pub mod projector;
pub mod snapshot;

pub use projector::Projector;
pub use snapshot::{
    BattingLine, BowlingLine, DeliveryDigest, ExtrasBreakdown, InningsDigest, Phase,
    PhaseSummary, Snapshot,
};
