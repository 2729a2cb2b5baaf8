use serde::{Deserialize, Serialize};
use tracing::debug;

use crease_types::{Delivery, DeliveryEdit, DeliveryId, DeliveryInput, MatchId};

use crate::error::{LedgerError, ValidationError};
use crate::validation;

/// Ordered, append-only record of deliveries for one match.
///
/// A `Ledger` is a value. Append and edit return a *new* ledger; the caller
/// decides whether to commit it by swapping its handle. Entries are only
/// ever addressed by [`DeliveryId`] — positions shift under corrections,
/// ids never do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    match_id: MatchId,
    entries: Vec<Delivery>,
}

impl Ledger {
    /// An empty ledger, created at match start.
    pub fn new(match_id: MatchId) -> Self {
        Self {
            match_id,
            entries: Vec::new(),
        }
    }

    /// Rebuild a ledger from stored entries, e.g. on load from persistence.
    ///
    /// No validation is performed here; run [`crate::LedgerAuditor`] over
    /// anything that crossed a trust boundary.
    pub fn from_entries(match_id: MatchId, entries: Vec<Delivery>) -> Self {
        Self { match_id, entries }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Validate caller input and append it as a new delivery.
    ///
    /// Returns the new ledger and the materialized entry. Only field-level
    /// rules are enforced here; fold-context legality is the reducer's call.
    pub fn append(&self, input: DeliveryInput) -> Result<(Self, Delivery), ValidationError> {
        validation::validate_input(&input)?;
        let delivery = Delivery::from_input(DeliveryId::new(), input);
        debug!(id = %delivery.id, "delivery accepted into ledger");

        let mut entries = self.entries.clone();
        entries.push(delivery.clone());
        Ok((
            Self {
                match_id: self.match_id,
                entries,
            },
            delivery,
        ))
    }

    /// Apply a partial edit to the delivery with the given id, producing a
    /// new ledger. The original is untouched.
    pub fn edit(&self, id: DeliveryId, edit: &DeliveryEdit) -> Result<Self, LedgerError> {
        let index = self
            .entries
            .iter()
            .position(|d| d.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        let corrected = self.entries[index].with_edit(edit);
        validation::validate_delivery(&corrected)?;
        debug!(id = %id, "delivery edited");

        let mut entries = self.entries.clone();
        entries[index] = corrected;
        Ok(Self {
            match_id: self.match_id,
            entries,
        })
    }

    /// Remove the most recent delivery, producing a new ledger and the
    /// removed entry.
    pub fn remove_last(&self) -> Result<(Self, Delivery), LedgerError> {
        let mut entries = self.entries.clone();
        let removed = entries.pop().ok_or(LedgerError::Empty)?;
        debug!(id = %removed.id, "last delivery removed");
        Ok((
            Self {
                match_id: self.match_id,
                entries,
            },
            removed,
        ))
    }

    pub fn get(&self, id: DeliveryId) -> Option<&Delivery> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn last(&self) -> Option<&Delivery> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Delivery] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Delivery> {
        self.entries.iter()
    }
}
