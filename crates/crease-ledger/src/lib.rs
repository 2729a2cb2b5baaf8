//! Append-only delivery ledger for one cricket match.
//!
//! The ledger is the system's source of truth. It provides:
//! - The [`Ledger`] value: ordered deliveries, appended through validation,
//!   edited by stable id into a *new* value (never in place)
//! - Field validation (the extras constraint table) applied before any
//!   delivery enters the ledger
//! - [`LedgerAuditor`]: integrity audit for ledgers loaded from storage
//! - [`LedgerStore`] trait boundary plus [`InMemoryLedgerStore`] for tests
//!   and embedding
//!
//! Cricket legality in context (wrong bowler, dead innings) is deliberately
//! *not* checked here: it depends on fold-time state and belongs to the
//! reducer in `crease-engine`.

pub mod audit;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod traits;
pub mod validation;

pub use audit::{AuditReport, LedgerAuditor, Violation, ViolationKind};
pub use error::{LedgerError, StoreError, ValidationError};
pub use ledger::Ledger;
pub use memory::InMemoryLedgerStore;
pub use traits::LedgerStore;
