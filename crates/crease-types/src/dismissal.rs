use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extra::Extra;
use crate::ids::PlayerId;

/// Exhaustive closed set of dismissal kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    ObstructingField,
    Retired,
}

impl DismissalKind {
    /// Whether the wicket appears in the bowler's analysis.
    pub fn credits_bowler(self) -> bool {
        matches!(
            self,
            Self::Bowled | Self::Caught | Self::Lbw | Self::Stumped | Self::HitWicket
        )
    }

    /// Whether this dismissal can occur on a delivery with the given extra.
    ///
    /// Off a no-ball only run-outs, obstruction, and retirements stand; off a
    /// wide the ball never touched the bat, so bowled/caught/lbw are out too.
    pub fn possible_on(self, extra: Extra) -> bool {
        match extra {
            Extra::NoBall => matches!(self, Self::RunOut | Self::ObstructingField | Self::Retired),
            Extra::Wide => !matches!(self, Self::Bowled | Self::Caught | Self::Lbw),
            Extra::None | Extra::Bye | Extra::LegBye => true,
        }
    }

    /// Whether only the striker can be dismissed this way. Run-outs,
    /// obstruction, and retirements can claim either batter.
    pub fn striker_only(self) -> bool {
        !matches!(self, Self::RunOut | Self::ObstructingField | Self::Retired)
    }

    /// Scorebook label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught => "caught",
            Self::Lbw => "lbw",
            Self::RunOut => "run out",
            Self::Stumped => "stumped",
            Self::HitWicket => "hit wicket",
            Self::ObstructingField => "obstructing the field",
            Self::Retired => "retired",
        }
    }
}

impl fmt::Display for DismissalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A wicket as recorded on a delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    /// The batter who is out. For striker-only kinds this must be the striker.
    pub player_id: PlayerId,
    /// Catcher, thrower, or keeper, where one is involved.
    pub fielder_id: Option<PlayerId>,
}

impl Dismissal {
    pub fn new(kind: DismissalKind, player_id: impl Into<PlayerId>) -> Self {
        Self {
            kind,
            player_id: player_id.into(),
            fielder_id: None,
        }
    }

    pub fn with_fielder(mut self, fielder_id: impl Into<PlayerId>) -> Self {
        self.fielder_id = Some(fielder_id.into());
        self
    }

    /// Scorecard line for this dismissal, e.g. `c Smith b Khan` or `run out (Patel)`.
    pub fn summary(&self, bowler: &PlayerId) -> String {
        match self.kind {
            DismissalKind::Bowled => format!("b {bowler}"),
            DismissalKind::Lbw => format!("lbw b {bowler}"),
            DismissalKind::HitWicket => format!("hit wicket b {bowler}"),
            DismissalKind::Caught => match &self.fielder_id {
                Some(f) if f == bowler => format!("c & b {bowler}"),
                Some(f) => format!("c {f} b {bowler}"),
                None => format!("c ? b {bowler}"),
            },
            DismissalKind::Stumped => match &self.fielder_id {
                Some(f) => format!("st {f} b {bowler}"),
                None => format!("st ? b {bowler}"),
            },
            DismissalKind::RunOut => match &self.fielder_id {
                Some(f) => format!("run out ({f})"),
                None => "run out".to_string(),
            },
            DismissalKind::ObstructingField => "obstructing the field".to_string(),
            DismissalKind::Retired => "retired".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bowler_credit_split() {
        assert!(DismissalKind::Bowled.credits_bowler());
        assert!(DismissalKind::Stumped.credits_bowler());
        assert!(!DismissalKind::RunOut.credits_bowler());
        assert!(!DismissalKind::ObstructingField.credits_bowler());
        assert!(!DismissalKind::Retired.credits_bowler());
    }

    #[test]
    fn no_ball_blocks_bowler_credited_dismissals() {
        assert!(!DismissalKind::Bowled.possible_on(Extra::NoBall));
        assert!(!DismissalKind::Stumped.possible_on(Extra::NoBall));
        assert!(DismissalKind::RunOut.possible_on(Extra::NoBall));
        assert!(DismissalKind::ObstructingField.possible_on(Extra::NoBall));
    }

    #[test]
    fn wide_allows_stumping_but_not_bat_dismissals() {
        assert!(DismissalKind::Stumped.possible_on(Extra::Wide));
        assert!(DismissalKind::RunOut.possible_on(Extra::Wide));
        assert!(!DismissalKind::Caught.possible_on(Extra::Wide));
        assert!(!DismissalKind::Bowled.possible_on(Extra::Wide));
    }

    #[test]
    fn summary_formats() {
        let bowler = PlayerId::new("khan");
        let caught = Dismissal::new(DismissalKind::Caught, "smith").with_fielder("patel");
        assert_eq!(caught.summary(&bowler), "c patel b khan");

        let caught_and_bowled = Dismissal::new(DismissalKind::Caught, "smith").with_fielder("khan");
        assert_eq!(caught_and_bowled.summary(&bowler), "c & b khan");

        let run_out = Dismissal::new(DismissalKind::RunOut, "smith").with_fielder("patel");
        assert_eq!(run_out.summary(&bowler), "run out (patel)");

        let lbw = Dismissal::new(DismissalKind::Lbw, "smith");
        assert_eq!(lbw.summary(&bowler), "lbw b khan");
    }
}
