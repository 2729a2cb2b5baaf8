use std::fmt;

use serde::{Deserialize, Serialize};

/// Exhaustive classification of a delivery's extra.
///
/// There is deliberately no catch-all variant: every new kind of extra must
/// be handled at every match site, at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extra {
    /// An ordinary delivery; all runs are credited to the batter.
    None,
    /// Wide ball. Illegal delivery; runs are penalty runs, none off the bat.
    Wide,
    /// No-ball. Illegal delivery; carries a penalty run and the ball stays
    /// live, so runs off the bat are still possible.
    NoBall,
    /// Byes. Legal delivery the batter missed; runs to the team, not the batter.
    Bye,
    /// Leg byes. Legal delivery off the batter's body; runs to the team.
    LegBye,
}

impl Extra {
    /// Whether this delivery counts toward the over (wides and no-balls do not).
    pub fn is_legal(self) -> bool {
        matches!(self, Self::None | Self::Bye | Self::LegBye)
    }

    /// Whether the striker is charged a ball faced. Everything except a wide.
    pub fn counts_as_ball_faced(self) -> bool {
        !matches!(self, Self::Wide)
    }

    /// Whether the extra runs are charged against the bowler's analysis.
    /// Byes and leg byes are the fielding side's fault, not the bowler's.
    pub fn charged_to_bowler(self) -> bool {
        matches!(self, Self::Wide | Self::NoBall)
    }

    /// Scorebook label.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wide => "wide",
            Self::NoBall => "no-ball",
            Self::Bye => "bye",
            Self::LegBye => "leg-bye",
        }
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legality_split() {
        assert!(Extra::None.is_legal());
        assert!(Extra::Bye.is_legal());
        assert!(Extra::LegBye.is_legal());
        assert!(!Extra::Wide.is_legal());
        assert!(!Extra::NoBall.is_legal());
    }

    #[test]
    fn only_wides_skip_the_ball_faced() {
        assert!(!Extra::Wide.counts_as_ball_faced());
        assert!(Extra::NoBall.counts_as_ball_faced());
        assert!(Extra::None.counts_as_ball_faced());
    }

    #[test]
    fn byes_are_not_the_bowlers_fault() {
        assert!(Extra::Wide.charged_to_bowler());
        assert!(Extra::NoBall.charged_to_bowler());
        assert!(!Extra::Bye.charged_to_bowler());
        assert!(!Extra::LegBye.charged_to_bowler());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Extra::LegBye).unwrap();
        let parsed: Extra = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Extra::LegBye);
    }
}
