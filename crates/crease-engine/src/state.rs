use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crease_types::{MatchConfig, PlayerId};

/// Lifecycle of a match as the fold sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    InningsBreak,
    Completed,
}

impl MatchStatus {
    /// Whether the ledger still accepts mutations.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::InningsBreak => "innings break",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// One batter's line in the scorecard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    /// Scorebook dismissal line, e.g. `c Smith b Khan`. `None` while not out.
    pub dismissal: Option<String>,
}

impl BattingEntry {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            is_out: false,
            dismissal: None,
        }
    }
}

/// One bowler's line in the scorecard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingEntry {
    pub player_id: PlayerId,
    pub legal_balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub maidens: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingEntry {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            legal_balls: 0,
            runs_conceded: 0,
            wickets: 0,
            maidens: 0,
            wides: 0,
            no_balls: 0,
        }
    }
}

/// Chase context published when the first innings closes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstInningsSummary {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub batting_scorecard: Vec<BattingEntry>,
    pub bowling_scorecard: Vec<BowlingEntry>,
}

/// Derived state of one match: a pure fold over the ledger plus the
/// initial configuration.
///
/// Never hand-edited. Totals are per current innings; the first innings
/// survives in [`FirstInningsSummary`] once it closes. Scorecards keep
/// players in order of first appearance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub status: MatchStatus,
    /// 1-based innings number.
    pub current_inning: u8,
    pub total_runs: u32,
    pub total_wickets: u32,
    /// Source of truth for overs. `overs_completed`/`balls_this_over` are
    /// display views kept in lock-step by the fold.
    pub legal_balls_bowled: u32,
    pub overs_completed: u32,
    pub balls_this_over: u8,
    /// Batter slot cleared to `None` while a replacement is pending.
    pub striker_id: Option<PlayerId>,
    pub non_striker_id: Option<PlayerId>,
    pub bowler_id: Option<PlayerId>,
    pub previous_over_bowler: Option<PlayerId>,
    /// Chase target; set when the second innings opens, or earlier by the
    /// external interruption collaborator through the config.
    pub target: Option<u32>,
    pub needs_new_batter: bool,
    pub needs_new_over: bool,
    pub batting_scorecard: Vec<BattingEntry>,
    pub bowling_scorecard: Vec<BowlingEntry>,
    pub first_innings: Option<FirstInningsSummary>,
    /// Runs charged to the bowler in the over in progress; zero at the end
    /// of an over makes it a maiden.
    pub runs_this_over: u32,
    /// An override delivery was recorded in the over in progress.
    pub over_had_change: bool,
    /// An override delivery was recorded in the over just finished, which
    /// lifts the adjacent-over restriction once.
    pub previous_over_had_change: bool,
}

impl MatchState {
    /// State before any delivery: the fold's identity element.
    pub fn new() -> Self {
        Self {
            status: MatchStatus::NotStarted,
            current_inning: 1,
            total_runs: 0,
            total_wickets: 0,
            legal_balls_bowled: 0,
            overs_completed: 0,
            balls_this_over: 0,
            striker_id: None,
            non_striker_id: None,
            bowler_id: None,
            previous_over_bowler: None,
            target: None,
            needs_new_batter: false,
            needs_new_over: false,
            batting_scorecard: Vec::new(),
            bowling_scorecard: Vec::new(),
            first_innings: None,
            runs_this_over: 0,
            over_had_change: false,
            previous_over_had_change: false,
        }
    }

    /// Display view of the over count, e.g. `12.4`.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs_completed, self.balls_this_over)
    }

    pub fn batting_entry(&self, player: &PlayerId) -> Option<&BattingEntry> {
        self.batting_scorecard.iter().find(|e| &e.player_id == player)
    }

    pub fn bowling_entry(&self, player: &PlayerId) -> Option<&BowlingEntry> {
        self.bowling_scorecard.iter().find(|e| &e.player_id == player)
    }

    pub fn is_out(&self, player: &PlayerId) -> bool {
        self.batting_entry(player).is_some_and(|e| e.is_out)
    }

    /// Fetch-or-create the batting entry, appending in first-appearance order.
    pub(crate) fn batting_entry_mut(&mut self, player: &PlayerId) -> &mut BattingEntry {
        if let Some(index) = self
            .batting_scorecard
            .iter()
            .position(|e| &e.player_id == player)
        {
            &mut self.batting_scorecard[index]
        } else {
            self.batting_scorecard.push(BattingEntry::new(player.clone()));
            self.batting_scorecard.last_mut().expect("just pushed")
        }
    }

    /// Fetch-or-create the bowling entry, appending in first-appearance order.
    pub(crate) fn bowling_entry_mut(&mut self, player: &PlayerId) -> &mut BowlingEntry {
        if let Some(index) = self
            .bowling_scorecard
            .iter()
            .position(|e| &e.player_id == player)
        {
            &mut self.bowling_scorecard[index]
        } else {
            self.bowling_scorecard.push(BowlingEntry::new(player.clone()));
            self.bowling_scorecard.last_mut().expect("just pushed")
        }
    }

    pub(crate) fn swap_strike(&mut self) {
        mem::swap(&mut self.striker_id, &mut self.non_striker_id);
    }

    /// Close the first innings: stash the summary and empty the crease.
    pub(crate) fn close_first_innings(&mut self) {
        self.first_innings = Some(FirstInningsSummary {
            runs: self.total_runs,
            wickets: self.total_wickets,
            legal_balls: self.legal_balls_bowled,
            batting_scorecard: self.batting_scorecard.clone(),
            bowling_scorecard: self.bowling_scorecard.clone(),
        });
        self.status = MatchStatus::InningsBreak;
        self.striker_id = None;
        self.non_striker_id = None;
        self.bowler_id = None;
        self.previous_over_bowler = None;
        self.needs_new_batter = false;
        self.needs_new_over = false;
    }

    /// Reset counters for the chase. The target comes from the config when
    /// the interruption collaborator supplied one, else first-innings
    /// runs plus one.
    pub(crate) fn begin_second_innings(&mut self, config: &MatchConfig) {
        let first_runs = self.first_innings.as_ref().map(|s| s.runs).unwrap_or(0);
        self.current_inning = 2;
        self.status = MatchStatus::InProgress;
        self.total_runs = 0;
        self.total_wickets = 0;
        self.legal_balls_bowled = 0;
        self.overs_completed = 0;
        self.balls_this_over = 0;
        self.batting_scorecard.clear();
        self.bowling_scorecard.clear();
        self.runs_this_over = 0;
        self.over_had_change = false;
        self.previous_over_had_change = false;
        self.target = Some(config.target.unwrap_or(first_runs + 1));
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
