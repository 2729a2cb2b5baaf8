use serde::{Deserialize, Serialize};

use crease_engine::MatchStatus;
use crease_types::{DeliveryId, MatchId, PlayerId};

/// The consumer-facing view of a match: everything a scoreboard, push
/// subscriber, or analytics job needs, fully derived and flattened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub match_id: MatchId,
    pub status: MatchStatus,
    pub inning: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub legal_balls_bowled: u32,
    /// Display view of the over count, e.g. `12.4`.
    pub overs: String,
    /// Runs per over so far; `0.0` before the first legal ball.
    pub current_run_rate: f64,
    /// Runs per over still required; present only in a live chase.
    pub required_run_rate: Option<f64>,
    /// Legal balls left in the innings, when an overs limit exists.
    pub balls_remaining: Option<u32>,
    pub target: Option<u32>,
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    pub needs_new_batter: bool,
    pub needs_new_over: bool,
    pub batting_card: Vec<BattingLine>,
    pub bowling_card: Vec<BowlingLine>,
    pub extras: ExtrasBreakdown,
    pub phases: Vec<PhaseSummary>,
    pub first_innings: Option<InningsDigest>,
    /// Most recent deliveries, newest last.
    pub recent_deliveries: Vec<DeliveryDigest>,
}

/// One row of the batting card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Runs per hundred balls; `0.0` before the first ball faced.
    pub strike_rate: f64,
    /// Scorebook line, e.g. `c Smith b Khan`; `not out` otherwise.
    pub how_out: String,
}

/// One row of the bowling card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BowlingLine {
    pub player_id: PlayerId,
    /// Display overs, e.g. `4.0`.
    pub overs: String,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// Runs per over; `0.0` before the first legal ball.
    pub economy: f64,
    pub wides: u32,
    pub no_balls: u32,
}

/// Extras totals, recomputed from the ledger on every projection so a
/// correction can never leave a stale side counter behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasBreakdown {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub total: u32,
}

/// Innings phases for the phase breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}

/// Scoring summary for one phase of the current innings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub run_rate: f64,
}

/// Compact view of a closed innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsDigest {
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
}

/// One line of the recent-deliveries feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDigest {
    pub id: DeliveryId,
    /// Position within the innings, e.g. `12.4`.
    pub position: String,
    pub summary: String,
    pub runs: u32,
    pub is_wicket: bool,
}
