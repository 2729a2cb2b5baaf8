use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dismissal::Dismissal;
use crate::extra::Extra;
use crate::ids::{DeliveryId, PlayerId};

/// One ball bowled, legal or not, as it sits in the ledger.
///
/// `over_number`, `ball_number`, and `inning` are ordering metadata assigned
/// by the reducer at fold time, and the striker/non-striker *order* is
/// likewise the fold's assignment (which two players are at the crease is
/// checked, which of them faces is derived). None of it is trusted from
/// input: a correction to an earlier ball can shift every position and
/// every strike assignment after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: DeliveryId,
    /// Innings this ball belongs to (1-based). Assigned at fold time.
    pub inning: u8,
    /// Zero-based over index within the innings. Assigned at fold time.
    pub over_number: u32,
    /// One-based position within the over. A wide and its re-bowl share the
    /// same position. Assigned at fold time.
    pub ball_number: u8,
    pub striker_id: PlayerId,
    pub non_striker_id: PlayerId,
    pub bowler_id: PlayerId,
    /// Runs credited to the striker.
    pub runs_off_bat: u32,
    pub extra: Extra,
    /// Penalty and other runs not credited to a batter.
    pub extra_runs: u32,
    pub dismissal: Option<Dismissal>,
    /// Records a deliberate bowler change so the adjacent-over restriction
    /// replays deterministically across corrections.
    pub bowler_change_override: bool,
    /// Free text; carries no semantic weight.
    pub commentary: Option<String>,
    /// Audit timestamp. Has no effect on the fold.
    pub at: DateTime<Utc>,
}

impl Delivery {
    /// Total runs attributed to the batting side for this ball.
    ///
    /// Always derived, never stored: `runs_off_bat + extra_runs` cannot
    /// drift from its parts.
    pub fn runs_scored(&self) -> u32 {
        self.runs_off_bat + self.extra_runs
    }

    pub fn is_wicket(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Display position, e.g. `12.4`.
    pub fn position(&self) -> String {
        format!("{}.{}", self.over_number, self.ball_number)
    }

    /// Materialize a ledger entry from caller input. Ordering metadata starts
    /// zeroed and is filled in by the reducer.
    pub fn from_input(id: DeliveryId, input: DeliveryInput) -> Self {
        Self {
            id,
            inning: 0,
            over_number: 0,
            ball_number: 0,
            striker_id: input.striker_id,
            non_striker_id: input.non_striker_id,
            bowler_id: input.bowler_id,
            runs_off_bat: input.runs_off_bat,
            extra: input.extra,
            extra_runs: input.extra_runs,
            dismissal: input.dismissal,
            bowler_change_override: input.bowler_change_override,
            commentary: input.commentary,
            at: input.at.unwrap_or_else(Utc::now),
        }
    }

    /// Apply a partial edit, producing the corrected delivery. The id and
    /// audit timestamp are not editable.
    pub fn with_edit(&self, edit: &DeliveryEdit) -> Self {
        let mut next = self.clone();
        if let Some(striker) = &edit.striker_id {
            next.striker_id = striker.clone();
        }
        if let Some(non_striker) = &edit.non_striker_id {
            next.non_striker_id = non_striker.clone();
        }
        if let Some(bowler) = &edit.bowler_id {
            next.bowler_id = bowler.clone();
        }
        if let Some(runs) = edit.runs_off_bat {
            next.runs_off_bat = runs;
        }
        if let Some(extra) = edit.extra {
            next.extra = extra;
        }
        if let Some(extra_runs) = edit.extra_runs {
            next.extra_runs = extra_runs;
        }
        match &edit.dismissal {
            Some(DismissalEdit::Clear) => next.dismissal = None,
            Some(DismissalEdit::Set(d)) => next.dismissal = Some(d.clone()),
            None => {}
        }
        if let Some(flag) = edit.bowler_change_override {
            next.bowler_change_override = flag;
        }
        if let Some(commentary) = &edit.commentary {
            next.commentary = Some(commentary.clone());
        }
        next
    }
}

/// Caller-supplied fields for a new delivery. The ledger assigns the id;
/// the reducer assigns positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInput {
    pub striker_id: PlayerId,
    pub non_striker_id: PlayerId,
    pub bowler_id: PlayerId,
    pub runs_off_bat: u32,
    pub extra: Extra,
    pub extra_runs: u32,
    pub dismissal: Option<Dismissal>,
    pub bowler_change_override: bool,
    pub commentary: Option<String>,
    /// Audit timestamp; defaults to now when omitted.
    pub at: Option<DateTime<Utc>>,
}

impl DeliveryInput {
    /// An ordinary delivery scoring `runs` off the bat.
    pub fn runs(
        striker: impl Into<PlayerId>,
        non_striker: impl Into<PlayerId>,
        bowler: impl Into<PlayerId>,
        runs: u32,
    ) -> Self {
        Self {
            striker_id: striker.into(),
            non_striker_id: non_striker.into(),
            bowler_id: bowler.into(),
            runs_off_bat: runs,
            extra: Extra::None,
            extra_runs: 0,
            dismissal: None,
            bowler_change_override: false,
            commentary: None,
            at: None,
        }
    }

    /// A wide conceding `extra_runs` in total (penalty included).
    pub fn wide(
        striker: impl Into<PlayerId>,
        non_striker: impl Into<PlayerId>,
        bowler: impl Into<PlayerId>,
        extra_runs: u32,
    ) -> Self {
        Self {
            extra: Extra::Wide,
            extra_runs,
            runs_off_bat: 0,
            ..Self::runs(striker, non_striker, bowler, 0)
        }
    }

    /// A no-ball: `penalty` extra runs plus whatever came off the bat.
    pub fn no_ball(
        striker: impl Into<PlayerId>,
        non_striker: impl Into<PlayerId>,
        bowler: impl Into<PlayerId>,
        penalty: u32,
        off_bat: u32,
    ) -> Self {
        Self {
            extra: Extra::NoBall,
            extra_runs: penalty,
            runs_off_bat: off_bat,
            ..Self::runs(striker, non_striker, bowler, 0)
        }
    }

    /// Byes run on a legal delivery.
    pub fn bye(
        striker: impl Into<PlayerId>,
        non_striker: impl Into<PlayerId>,
        bowler: impl Into<PlayerId>,
        extra_runs: u32,
    ) -> Self {
        Self {
            extra: Extra::Bye,
            extra_runs,
            runs_off_bat: 0,
            ..Self::runs(striker, non_striker, bowler, 0)
        }
    }

    /// Leg byes run on a legal delivery.
    pub fn leg_bye(
        striker: impl Into<PlayerId>,
        non_striker: impl Into<PlayerId>,
        bowler: impl Into<PlayerId>,
        extra_runs: u32,
    ) -> Self {
        Self {
            extra: Extra::LegBye,
            extra_runs,
            runs_off_bat: 0,
            ..Self::runs(striker, non_striker, bowler, 0)
        }
    }

    pub fn with_dismissal(mut self, dismissal: Dismissal) -> Self {
        self.dismissal = Some(dismissal);
        self
    }

    pub fn with_override(mut self) -> Self {
        self.bowler_change_override = true;
        self
    }

    pub fn with_commentary(mut self, text: impl Into<String>) -> Self {
        self.commentary = Some(text.into());
        self
    }

    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }
}

/// Partial edit to an existing delivery, applied by the correction engine.
///
/// `None` fields are left untouched. Dismissals need a three-way edit
/// (leave / clear / replace), hence [`DismissalEdit`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEdit {
    pub striker_id: Option<PlayerId>,
    pub non_striker_id: Option<PlayerId>,
    pub bowler_id: Option<PlayerId>,
    pub runs_off_bat: Option<u32>,
    pub extra: Option<Extra>,
    pub extra_runs: Option<u32>,
    pub dismissal: Option<DismissalEdit>,
    pub bowler_change_override: Option<bool>,
    pub commentary: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissalEdit {
    Clear,
    Set(Dismissal),
}

impl DeliveryEdit {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
