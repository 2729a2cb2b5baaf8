use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crease_types::{DeliveryId, MatchId};

use crate::ledger::Ledger;
use crate::validation;

/// Result of a ledger integrity audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub match_id: MatchId,
    pub delivery_count: u64,
    pub ids_unique: bool,
    pub fields_valid: bool,
    pub timestamps_monotonic: bool,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// One-based position of the offending entry.
    pub seq: u64,
    pub id: DeliveryId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    DuplicateId,
    FieldRule,
    TimestampRegression,
}

/// Integrity auditor for ledgers that crossed a trust boundary
/// (loaded from persistence, received from a collaborator).
///
/// Appends through [`Ledger::append`] cannot produce any of these
/// violations; hand-assembled or corrupted files can.
pub struct LedgerAuditor;

impl LedgerAuditor {
    pub fn audit(ledger: &Ledger) -> AuditReport {
        let mut violations = Vec::new();
        let mut ids_unique = true;
        let mut fields_valid = true;
        let mut timestamps_monotonic = true;

        let mut seen_ids: HashSet<DeliveryId> = HashSet::new();
        let mut previous_at: Option<DateTime<Utc>> = None;

        for (index, delivery) in ledger.iter().enumerate() {
            let seq = (index + 1) as u64;

            if !seen_ids.insert(delivery.id) {
                ids_unique = false;
                violations.push(Violation {
                    seq,
                    id: delivery.id,
                    kind: ViolationKind::DuplicateId,
                    description: format!("delivery id {} appears more than once", delivery.id),
                });
            }

            if let Err(e) = validation::validate_delivery(delivery) {
                fields_valid = false;
                violations.push(Violation {
                    seq,
                    id: delivery.id,
                    kind: ViolationKind::FieldRule,
                    description: e.to_string(),
                });
            }

            if let Some(prev) = previous_at {
                if delivery.at < prev {
                    timestamps_monotonic = false;
                    violations.push(Violation {
                        seq,
                        id: delivery.id,
                        kind: ViolationKind::TimestampRegression,
                        description: "audit timestamp earlier than the preceding delivery".into(),
                    });
                }
            }
            previous_at = Some(delivery.at);
        }

        AuditReport {
            match_id: ledger.match_id(),
            delivery_count: ledger.len() as u64,
            ids_unique,
            fields_valid,
            timestamps_monotonic,
            violations,
        }
    }
}
