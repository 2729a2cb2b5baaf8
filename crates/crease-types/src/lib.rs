//! Foundation types for the crease scoring engine.
//!
//! This crate provides the identifier, delivery, and configuration types used
//! throughout the crease system. Every other crease crate depends on
//! `crease-types`.
//!
//! # Key Types
//!
//! - [`DeliveryId`] — Stable, time-ordered identifier for one ball (UUID v7)
//! - [`PlayerId`] — Opaque player identifier
//! - [`Delivery`] — One legal-or-illegal ball as recorded in the ledger
//! - [`Extra`] — Exhaustive enumeration of extra kinds
//! - [`DismissalKind`] — Exhaustive enumeration of ways a batter gets out
//! - [`MatchConfig`] — Teams, overs limit, toss, and projection phase splits

pub mod config;
pub mod delivery;
pub mod dismissal;
pub mod extra;
pub mod ids;

pub use config::{MatchConfig, PhaseBoundaries, TeamConfig, TeamSide, Toss, TossDecision};
pub use delivery::{Delivery, DeliveryEdit, DeliveryInput, DismissalEdit};
pub use dismissal::{Dismissal, DismissalKind};
pub use extra::Extra;
pub use ids::{DeliveryId, MatchId, PlayerId};
