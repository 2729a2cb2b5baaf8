use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Which side of the fixture a team is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

/// One team: display name plus an ordered squad.
///
/// An empty squad disables membership checks in the reducer; scratch matches
/// and tests often name players ad hoc.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    pub players: Vec<PlayerId>,
}

impl TeamConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
        }
    }

    pub fn with_players<I, P>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        self.players = players.into_iter().map(Into::into).collect();
        self
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.contains(player)
    }
}

/// What the toss winner elected to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// Toss result, which fixes the batting order for both innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: TeamSide,
    pub decision: TossDecision,
}

impl Toss {
    /// The side batting in the given innings (1-based).
    pub fn batting_side(&self, inning: u8) -> TeamSide {
        let first = match self.decision {
            TossDecision::Bat => self.winner,
            TossDecision::Bowl => self.winner.other(),
        };
        if inning == 1 {
            first
        } else {
            first.other()
        }
    }
}

impl Default for Toss {
    fn default() -> Self {
        Self {
            winner: TeamSide::Home,
            decision: TossDecision::Bat,
        }
    }
}

/// Over splits used by the snapshot projector's phase breakdown.
///
/// The first `powerplay_overs` overs are the powerplay; the final
/// `death_overs` (when an overs limit exists) are the death; everything
/// between is the middle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    pub powerplay_overs: u32,
    pub death_overs: u32,
}

impl Default for PhaseBoundaries {
    fn default() -> Self {
        Self {
            powerplay_overs: 6,
            death_overs: 5,
        }
    }
}

/// Initial configuration of one match. An input to every fold; never
/// derived from the ledger.
///
/// Scalar fields come before the tables so the TOML form stays valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Overs per innings; `None` means no limit.
    pub overs_limit: Option<u32>,
    pub balls_per_over: u8,
    /// Chase target supplied by the external interruption collaborator.
    /// When absent, the second-innings target defaults to the first-innings
    /// total plus one. The engine performs no rain-rule computation itself.
    pub target: Option<u32>,
    pub home: TeamConfig,
    pub away: TeamConfig,
    pub toss: Toss,
    pub phases: PhaseBoundaries,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            overs_limit: Some(20),
            balls_per_over: 6,
            target: None,
            home: TeamConfig::new("Home"),
            away: TeamConfig::new("Away"),
            toss: Toss::default(),
            phases: PhaseBoundaries::default(),
        }
    }
}

impl MatchConfig {
    pub fn team(&self, side: TeamSide) -> &TeamConfig {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn batting_team(&self, inning: u8) -> &TeamConfig {
        self.team(self.toss.batting_side(inning))
    }

    pub fn bowling_team(&self, inning: u8) -> &TeamConfig {
        self.team(self.toss.batting_side(inning).other())
    }

    /// Legal balls available in one innings, if limited.
    pub fn balls_limit(&self) -> Option<u32> {
        self.overs_limit.map(|overs| overs * self.balls_per_over as u32)
    }

    /// Wickets that end the innings. One fewer than the squad, or the
    /// conventional ten when no squad is configured.
    pub fn wickets_limit(&self, inning: u8) -> u32 {
        let squad = self.batting_team(inning).players.len();
        if squad >= 2 {
            (squad - 1) as u32
        } else {
            10
        }
    }
}
