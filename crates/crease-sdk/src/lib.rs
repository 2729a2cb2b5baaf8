//! High-level embedding API for crease.
//!
//! Provides [`MatchSession`], the one-handle-per-match entry point for
//! applications embedding the scoring engine: append, correct, undo,
//! project, and fan snapshots out to subscribers. This is the seam the
//! transport layer sits on; nothing here speaks HTTP.

pub mod broadcast;
pub mod error;
pub mod session;

pub use broadcast::SnapshotBus;
pub use error::{SdkError, SdkResult};
pub use session::MatchSession;

// Re-export key types
pub use crease_engine::{MatchState, MatchStatus};
pub use crease_ledger::{Ledger, LedgerStore};
pub use crease_projection::Snapshot;
pub use crease_types::{DeliveryEdit, DeliveryId, DeliveryInput, MatchConfig, MatchId};
