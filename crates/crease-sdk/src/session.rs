use std::sync::Arc;

use tracing::{info, warn};

use crease_engine::{CorrectionEngine, MatchState, Reducer};
use crease_ledger::{Ledger, LedgerStore};
use crease_projection::{Projector, Snapshot};
use crease_types::{DeliveryEdit, DeliveryId, DeliveryInput, MatchConfig, MatchId};

use crate::broadcast::{SnapshotBus, SnapshotStream};
use crate::error::SdkResult;

/// One match, one mutable handle.
///
/// The session owns the config, the ledger, and the folded state, and swaps
/// them atomically after each successful mutation. Mutations take
/// `&mut self`, which is the serialization the core requires: at most one
/// in-flight append or correction per match. Reads (`snapshot`, `state`,
/// `ledger`) take `&self` and always see a committed value.
///
/// Persistence and broadcast run strictly after a successful fold; their
/// failures are logged and left to the collaborator to retry, and never
/// un-commit the ledger change.
pub struct MatchSession {
    config: MatchConfig,
    ledger: Ledger,
    state: MatchState,
    store: Option<Arc<dyn LedgerStore>>,
    bus: SnapshotBus,
}

impl MatchSession {
    /// A fresh match with an empty ledger.
    pub fn new(match_id: MatchId, config: MatchConfig) -> Self {
        Self {
            config,
            ledger: Ledger::new(match_id),
            state: MatchState::new(),
            store: None,
            bus: SnapshotBus::default(),
        }
    }

    /// Rebuild a session from a persisted ledger by folding it from
    /// scratch.
    pub fn resume(config: MatchConfig, ledger: Ledger) -> SdkResult<Self> {
        let fold = Reducer::fold(&config, &ledger)?;
        Ok(Self {
            config,
            ledger: fold.ledger,
            state: fold.state,
            store: None,
            bus: SnapshotBus::default(),
        })
    }

    /// Resume the match with the given id from a store, if it has one.
    pub fn load(
        config: MatchConfig,
        store: Arc<dyn LedgerStore>,
        match_id: MatchId,
    ) -> SdkResult<Option<Self>> {
        let Some(ledger) = store.load(match_id)? else {
            return Ok(None);
        };
        let mut session = Self::resume(config, ledger)?;
        session.store = Some(store);
        Ok(Some(session))
    }

    /// Attach a store; every committed mutation is saved through it.
    pub fn with_store(mut self, store: Arc<dyn LedgerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Score one delivery: validate, append, fold incrementally, commit.
    ///
    /// On any error the session is untouched — the ledger never holds a
    /// delivery the reducer rejected.
    pub fn append(&mut self, input: DeliveryInput) -> SdkResult<Snapshot> {
        let (_, delivery) = self.ledger.append(input)?;

        let mut state = self.state.clone();
        let mut annotated = delivery;
        Reducer::apply(&self.config, &mut state, &mut annotated)?;

        let mut entries = self.ledger.entries().to_vec();
        entries.push(annotated);
        self.ledger = Ledger::from_entries(self.ledger.match_id(), entries);
        self.state = state;
        Ok(self.commit_effects())
    }

    /// Correct a past delivery by id and replay the whole ledger.
    pub fn correct(&mut self, id: DeliveryId, edit: &DeliveryEdit) -> SdkResult<Snapshot> {
        let correction = CorrectionEngine::correct(&self.config, &self.ledger, id, edit)?;
        self.ledger = correction.ledger;
        self.state = correction.state;
        Ok(self.commit_effects())
    }

    /// Remove the most recent delivery and replay.
    pub fn undo_last(&mut self) -> SdkResult<Snapshot> {
        let correction = CorrectionEngine::undo_last(&self.config, &self.ledger)?;
        self.ledger = correction.ledger;
        self.state = correction.state;
        Ok(self.commit_effects())
    }

    /// Apply externally computed interruption inputs: a revised chase
    /// target and/or a revised overs limit. The whole ledger is refolded
    /// under the new configuration; on failure nothing changes.
    pub fn apply_interruption(
        &mut self,
        target: Option<u32>,
        revised_overs: Option<u32>,
    ) -> SdkResult<Snapshot> {
        let mut config = self.config.clone();
        if let Some(target) = target {
            config.target = Some(target);
        }
        if let Some(overs) = revised_overs {
            config.overs_limit = Some(overs);
        }

        let fold = Reducer::fold(&config, &self.ledger)?;
        info!(?target, ?revised_overs, "interruption inputs applied");
        self.config = config;
        self.ledger = fold.ledger;
        self.state = fold.state;
        Ok(self.commit_effects())
    }

    /// The authoritative snapshot, from the same projector path every push
    /// went through. Used for reconnect and pull fallback.
    pub fn snapshot(&self) -> Snapshot {
        Projector::project(&self.config, &self.state, &self.ledger)
    }

    /// Subscribe to snapshots committed after this call.
    pub fn subscribe(&self) -> SnapshotStream {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn match_id(&self) -> MatchId {
        self.ledger.match_id()
    }

    /// Project, persist, broadcast — in that order, after the fold has
    /// already committed. Store and bus failures are the collaborator's to
    /// retry; the returned snapshot reflects the committed ledger either way.
    fn commit_effects(&self) -> Snapshot {
        let snapshot = self.snapshot();
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.ledger) {
                warn!(error = %e, match_id = %self.match_id(), "ledger save failed after commit");
            }
        }
        self.bus.publish(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use crease_engine::{MatchStatus, SequenceViolation};
    use crease_ledger::InMemoryLedgerStore;
    use crease_types::{Dismissal, DismissalKind, Extra};

    use crate::error::SdkError;

    use super::*;

    fn session() -> MatchSession {
        MatchSession::new(MatchId::new(), MatchConfig::default())
    }

    #[test]
    fn appends_accumulate_and_project() {
        let mut session = session();
        let first = session.append(DeliveryInput::wide("a", "b", "x", 1)).unwrap();
        assert_eq!(first.total_runs, 1);
        assert_eq!(first.legal_balls_bowled, 0);

        let second = session.append(DeliveryInput::runs("a", "b", "x", 1)).unwrap();
        assert_eq!(second.total_runs, 2);
        assert_eq!(second.legal_balls_bowled, 1);
    }

    #[test]
    fn incremental_append_matches_a_full_refold() {
        let mut session = session();
        session.append(DeliveryInput::runs("a", "b", "x", 3)).unwrap();
        session.append(DeliveryInput::no_ball("b", "a", "x", 1, 1)).unwrap();
        session.append(DeliveryInput::bye("b", "a", "x", 2)).unwrap();

        let refolded = Reducer::fold(session.config(), session.ledger()).unwrap();
        assert_eq!(&refolded.state, session.state());
        assert_eq!(&refolded.ledger, session.ledger());
    }

    #[test]
    fn rejected_deliveries_leave_no_trace() {
        let mut session = session();
        session.append(DeliveryInput::runs("a", "b", "x", 0)).unwrap();

        // Malformed: wide with no runs.
        let err = session.append(DeliveryInput::wide("a", "b", "x", 0)).unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
        assert_eq!(session.ledger().len(), 1);

        // Well-formed but illegal: a stranger pair mid-innings.
        let err = session.append(DeliveryInput::runs("p", "q", "x", 0)).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Sequence(SequenceViolation::BatterPairMismatch { .. })
        ));
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.state().total_runs, 0);
    }

    #[test]
    fn the_scorebook_correction_scenario() {
        // [wide 1] + [legal 1], then the wide turns out to have been a
        // legal single.
        let mut session = session();
        session.append(DeliveryInput::wide("a", "b", "x", 1)).unwrap();
        session.append(DeliveryInput::runs("a", "b", "x", 1)).unwrap();
        let wide_id = session.ledger().entries()[0].id;

        let edit = DeliveryEdit {
            extra: Some(Extra::None),
            extra_runs: Some(0),
            runs_off_bat: Some(1),
            ..Default::default()
        };
        let snapshot = session.correct(wide_id, &edit).unwrap();

        assert_eq!(snapshot.total_runs, 2);
        assert_eq!(snapshot.legal_balls_bowled, 2);
        assert_eq!(snapshot.extras.wides, 0);
    }

    #[test]
    fn undo_after_a_correction_recovers_the_pre_append_totals() {
        let mut session = session();
        session.append(DeliveryInput::runs("a", "b", "x", 2)).unwrap();
        let before_append = session.snapshot();

        session.append(DeliveryInput::runs("a", "b", "x", 4)).unwrap();
        let four_id = session.ledger().last().unwrap().id;

        // Correct the four into a six, then think better of the whole ball.
        let edit = DeliveryEdit {
            runs_off_bat: Some(6),
            ..Default::default()
        };
        assert_eq!(session.correct(four_id, &edit).unwrap().total_runs, 8);

        let undone = session.undo_last().unwrap();
        assert_eq!(undone.total_runs, before_append.total_runs);
        assert_eq!(undone.legal_balls_bowled, before_append.legal_balls_bowled);
        assert_eq!(session.ledger().len(), 1);
        assert!(session.ledger().get(four_id).is_none());
    }

    #[test]
    fn subscribers_see_every_committed_mutation() {
        let mut session = session();
        let mut stream = session.subscribe();

        session.append(DeliveryInput::runs("a", "b", "x", 4)).unwrap();
        let pushed = stream.try_recv().unwrap();
        assert_eq!(pushed.total_runs, 4);

        // The pull path returns the same figures the push delivered.
        assert_eq!(session.snapshot(), pushed);
    }

    #[test]
    fn failed_mutations_publish_nothing() {
        let mut session = session();
        let mut stream = session.subscribe();

        session.append(DeliveryInput::wide("a", "b", "x", 0)).unwrap_err();
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn committed_ledgers_reach_the_store() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut session = session().with_store(store.clone());

        session.append(DeliveryInput::runs("a", "b", "x", 1)).unwrap();
        let saved = store.load(session.match_id()).unwrap().unwrap();
        assert_eq!(&saved, session.ledger());
    }

    #[test]
    fn load_resumes_exactly_where_the_session_left_off() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut session = session().with_store(store.clone());
        session.append(DeliveryInput::runs("a", "b", "x", 1)).unwrap();
        session.append(DeliveryInput::runs("b", "a", "x", 4)).unwrap();
        let match_id = session.match_id();

        let resumed =
            MatchSession::load(MatchConfig::default(), store.clone(), match_id)
                .unwrap()
                .unwrap();
        assert_eq!(resumed.state(), session.state());
        assert_eq!(resumed.snapshot(), session.snapshot());

        assert!(MatchSession::load(MatchConfig::default(), store, MatchId::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn interruption_inputs_reshape_the_chase() {
        let config = MatchConfig {
            home: crease_types::TeamConfig::new("Home").with_players(["a", "b", "c"]),
            away: crease_types::TeamConfig::new("Away").with_players(["x", "y", "z"]),
            overs_limit: Some(2),
            ..MatchConfig::default()
        };
        let mut session = MatchSession::new(MatchId::new(), config);

        // First innings: 4 runs, then all out.
        session.append(DeliveryInput::runs("a", "b", "x", 4)).unwrap();
        session
            .append(
                DeliveryInput::runs("a", "b", "x", 0)
                    .with_dismissal(Dismissal::new(DismissalKind::Bowled, "a")),
            )
            .unwrap();
        session
            .append(
                DeliveryInput::runs("c", "b", "x", 0)
                    .with_dismissal(Dismissal::new(DismissalKind::Bowled, "c")),
            )
            .unwrap();

        // Chase under way with the default target of 5.
        let snapshot = session.append(DeliveryInput::runs("x", "y", "a", 1)).unwrap();
        assert_eq!(snapshot.target, Some(5));

        // Rain: the external collaborator hands down a revised target.
        let revised = session.apply_interruption(Some(3), None).unwrap();
        assert_eq!(revised.target, Some(3));
        assert_eq!(revised.status, MatchStatus::InProgress);

        // Two more gets them home under the revised target.
        let done = session.append(DeliveryInput::runs("y", "x", "a", 2)).unwrap();
        assert_eq!(done.status, MatchStatus::Completed);
    }

    #[test]
    fn session_reads_are_consistent_between_mutations() {
        let mut session = session();
        session.append(DeliveryInput::runs("a", "b", "x", 4)).unwrap();

        let snapshot = session.snapshot();
        let again = session.snapshot();
        assert_eq!(snapshot, again);
        assert_eq!(snapshot.total_runs, session.state().total_runs);
    }
}
