use crease_engine::{MatchState, MatchStatus};
use crease_ledger::Ledger;
use crease_types::{Delivery, Extra, MatchConfig};

use crate::snapshot::{
    BattingLine, BowlingLine, DeliveryDigest, ExtrasBreakdown, InningsDigest, Phase,
    PhaseSummary, Snapshot,
};

/// How many ledger entries the recent-deliveries feed carries by default.
const RECENT_DELIVERIES: usize = 6;

/// Pure, read-only snapshot builder.
pub struct Projector;

impl Projector {
    /// Project the authoritative consumer view of the match.
    pub fn project(config: &MatchConfig, state: &MatchState, ledger: &Ledger) -> Snapshot {
        Self::project_with_recent(config, state, ledger, RECENT_DELIVERIES)
    }

    /// As [`Projector::project`], with a caller-chosen recent-feed length.
    pub fn project_with_recent(
        config: &MatchConfig,
        state: &MatchState,
        ledger: &Ledger,
        recent: usize,
    ) -> Snapshot {
        let balls_per_over = config.balls_per_over as u32;
        let balls_remaining = config
            .balls_limit()
            .map(|limit| limit.saturating_sub(state.legal_balls_bowled));

        let in_live_chase = state.current_inning == 2 && state.status == MatchStatus::InProgress;
        let required_run_rate = match (in_live_chase, state.target, balls_remaining) {
            (true, Some(target), Some(remaining)) => {
                let needed = target.saturating_sub(state.total_runs);
                Some(run_rate(needed, remaining.max(1), balls_per_over))
            }
            _ => None,
        };

        Snapshot {
            match_id: ledger.match_id(),
            status: state.status,
            inning: state.current_inning,
            batting_team: config.batting_team(state.current_inning).name.clone(),
            bowling_team: config.bowling_team(state.current_inning).name.clone(),
            total_runs: state.total_runs,
            total_wickets: state.total_wickets,
            legal_balls_bowled: state.legal_balls_bowled,
            overs: overs_display(state.legal_balls_bowled, balls_per_over),
            current_run_rate: if state.legal_balls_bowled == 0 {
                0.0
            } else {
                run_rate(state.total_runs, state.legal_balls_bowled, balls_per_over)
            },
            required_run_rate,
            balls_remaining,
            target: state.target,
            striker: state.striker_id.clone(),
            non_striker: state.non_striker_id.clone(),
            bowler: state.bowler_id.clone(),
            needs_new_batter: state.needs_new_batter,
            needs_new_over: state.needs_new_over,
            batting_card: batting_card(state),
            bowling_card: bowling_card(state, balls_per_over),
            extras: extras_breakdown(ledger, state.current_inning),
            phases: phase_breakdown(config, ledger, state.current_inning),
            first_innings: state.first_innings.as_ref().map(|s| InningsDigest {
                runs: s.runs,
                wickets: s.wickets,
                overs: overs_display(s.legal_balls, balls_per_over),
            }),
            recent_deliveries: recent_feed(ledger, recent),
        }
    }
}

fn run_rate(runs: u32, balls: u32, balls_per_over: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 * balls_per_over as f64 / balls as f64
}

fn overs_display(legal_balls: u32, balls_per_over: u32) -> String {
    format!("{}.{}", legal_balls / balls_per_over, legal_balls % balls_per_over)
}

fn batting_card(state: &MatchState) -> Vec<BattingLine> {
    state
        .batting_scorecard
        .iter()
        .map(|entry| BattingLine {
            player_id: entry.player_id.clone(),
            runs: entry.runs,
            balls_faced: entry.balls_faced,
            fours: entry.fours,
            sixes: entry.sixes,
            strike_rate: if entry.balls_faced == 0 {
                0.0
            } else {
                entry.runs as f64 * 100.0 / entry.balls_faced as f64
            },
            how_out: entry
                .dismissal
                .clone()
                .unwrap_or_else(|| "not out".to_string()),
        })
        .collect()
}

fn bowling_card(state: &MatchState, balls_per_over: u32) -> Vec<BowlingLine> {
    state
        .bowling_scorecard
        .iter()
        .map(|entry| BowlingLine {
            player_id: entry.player_id.clone(),
            overs: overs_display(entry.legal_balls, balls_per_over),
            maidens: entry.maidens,
            runs_conceded: entry.runs_conceded,
            wickets: entry.wickets,
            economy: run_rate(entry.runs_conceded, entry.legal_balls, balls_per_over),
            wides: entry.wides,
            no_balls: entry.no_balls,
        })
        .collect()
}

/// Extras are summed from the ledger on every call; there is deliberately
/// no running counter anywhere that could drift under corrections.
fn extras_breakdown(ledger: &Ledger, inning: u8) -> ExtrasBreakdown {
    let mut extras = ExtrasBreakdown::default();
    for delivery in ledger.iter().filter(|d| d.inning == inning) {
        match delivery.extra {
            Extra::None => continue,
            Extra::Wide => extras.wides += delivery.extra_runs,
            Extra::NoBall => extras.no_balls += delivery.extra_runs,
            Extra::Bye => extras.byes += delivery.extra_runs,
            Extra::LegBye => extras.leg_byes += delivery.extra_runs,
        }
        extras.total += delivery.extra_runs;
    }
    extras
}

fn phase_of(config: &MatchConfig, over_number: u32) -> Phase {
    if over_number < config.phases.powerplay_overs {
        return Phase::Powerplay;
    }
    let in_death = config
        .overs_limit
        .is_some_and(|limit| over_number >= limit.saturating_sub(config.phases.death_overs));
    if in_death {
        Phase::Death
    } else {
        Phase::Middle
    }
}

/// Bucketed at projection time from each delivery's fold-assigned over
/// number; nothing phase-shaped is ever stored on `MatchState`.
fn phase_breakdown(config: &MatchConfig, ledger: &Ledger, inning: u8) -> Vec<PhaseSummary> {
    let defined: &[Phase] = if config.overs_limit.is_some() {
        &[Phase::Powerplay, Phase::Middle, Phase::Death]
    } else {
        &[Phase::Powerplay, Phase::Middle]
    };

    defined
        .iter()
        .map(|&phase| {
            let mut runs = 0;
            let mut wickets = 0;
            let mut legal_balls = 0;
            for delivery in ledger
                .iter()
                .filter(|d| d.inning == inning && phase_of(config, d.over_number) == phase)
            {
                runs += delivery.runs_scored();
                if delivery.is_wicket() {
                    wickets += 1;
                }
                if delivery.extra.is_legal() {
                    legal_balls += 1;
                }
            }
            PhaseSummary {
                phase,
                runs,
                wickets,
                legal_balls,
                run_rate: run_rate(runs, legal_balls, config.balls_per_over as u32),
            }
        })
        .collect()
}

fn recent_feed(ledger: &Ledger, recent: usize) -> Vec<DeliveryDigest> {
    let entries = ledger.entries();
    let start = entries.len().saturating_sub(recent);
    entries[start..]
        .iter()
        .map(|delivery| DeliveryDigest {
            id: delivery.id,
            position: delivery.position(),
            summary: describe(delivery),
            runs: delivery.runs_scored(),
            is_wicket: delivery.is_wicket(),
        })
        .collect()
}

fn describe(delivery: &Delivery) -> String {
    let header = format!("{} to {}", delivery.bowler_id, delivery.striker_id);
    if let Some(dismissal) = &delivery.dismissal {
        return format!(
            "{header}: WICKET, {}",
            dismissal.summary(&delivery.bowler_id)
        );
    }
    let event = match delivery.extra {
        Extra::Wide => format!("{} wide", delivery.extra_runs),
        Extra::NoBall if delivery.runs_off_bat > 0 => {
            format!("no-ball, {} off the bat", delivery.runs_off_bat)
        }
        Extra::NoBall => "no-ball".to_string(),
        Extra::Bye => format!("{} bye", delivery.extra_runs),
        Extra::LegBye => format!("{} leg-bye", delivery.extra_runs),
        Extra::None => match delivery.runs_off_bat {
            0 => "no run".to_string(),
            4 => "FOUR".to_string(),
            6 => "SIX".to_string(),
            1 => "1 run".to_string(),
            n => format!("{n} runs"),
        },
    };
    format!("{header}: {event}")
}

#[cfg(test)]
mod tests {
    use crease_engine::{CorrectionEngine, Reducer};
    use crease_types::{DeliveryEdit, DeliveryInput, Dismissal, DismissalKind, MatchId, TeamConfig};

    use super::*;

    fn ledger_of(inputs: Vec<DeliveryInput>) -> Ledger {
        let mut ledger = Ledger::new(MatchId::new());
        for input in inputs {
            let (next, _) = ledger.append(input).unwrap();
            ledger = next;
        }
        ledger
    }

    fn project(config: &MatchConfig, inputs: Vec<DeliveryInput>) -> Snapshot {
        let fold = Reducer::fold(config, &ledger_of(inputs)).unwrap();
        Projector::project(config, &fold.state, &fold.ledger)
    }

    #[test]
    fn run_rate_never_divides_by_zero() {
        let config = MatchConfig::default();
        let snapshot = project(&config, vec![DeliveryInput::wide("a", "b", "x", 1)]);
        assert_eq!(snapshot.legal_balls_bowled, 0);
        assert_eq!(snapshot.current_run_rate, 0.0);
        assert_eq!(snapshot.total_runs, 1);
        assert_eq!(snapshot.extras.wides, 1);
        assert_eq!(snapshot.extras.total, 1);
    }

    #[test]
    fn run_rate_is_runs_per_over() {
        let config = MatchConfig::default();
        // 7 runs off 6 legal balls.
        let snapshot = project(
            &config,
            vec![
                DeliveryInput::runs("a", "b", "x", 4),
                DeliveryInput::runs("a", "b", "x", 2),
                DeliveryInput::runs("a", "b", "x", 1),
                DeliveryInput::runs("a", "b", "x", 0),
                DeliveryInput::runs("b", "a", "x", 0),
                DeliveryInput::runs("b", "a", "x", 0),
            ],
        );
        assert_eq!(snapshot.overs, "1.0");
        assert!((snapshot.current_run_rate - 7.0).abs() < 1e-9);
    }

    fn three_a_side(overs: u32) -> MatchConfig {
        MatchConfig {
            home: TeamConfig::new("Home").with_players(["a", "b", "c"]),
            away: TeamConfig::new("Away").with_players(["x", "y", "z"]),
            overs_limit: Some(overs),
            ..MatchConfig::default()
        }
    }

    fn into_the_chase() -> Vec<DeliveryInput> {
        vec![
            DeliveryInput::runs("a", "b", "x", 4),
            DeliveryInput::runs("a", "b", "x", 0)
                .with_dismissal(Dismissal::new(DismissalKind::Bowled, "a")),
            DeliveryInput::runs("c", "b", "x", 0)
                .with_dismissal(Dismissal::new(DismissalKind::Bowled, "c")),
        ]
    }

    #[test]
    fn required_rate_appears_only_in_a_live_chase() {
        let config = three_a_side(2);

        // First innings: no required rate.
        let snapshot = project(&config, vec![DeliveryInput::runs("a", "b", "x", 1)]);
        assert_eq!(snapshot.required_run_rate, None);

        // Chase of 5 with one single taken off the first ball: 4 needed
        // off 11 balls.
        let mut inputs = into_the_chase();
        inputs.push(DeliveryInput::runs("x", "y", "a", 1));
        let snapshot = project(&config, inputs);
        assert_eq!(snapshot.inning, 2);
        assert_eq!(snapshot.target, Some(5));
        assert_eq!(snapshot.balls_remaining, Some(11));
        let expected = 4.0 * 6.0 / 11.0;
        assert!((snapshot.required_run_rate.unwrap() - expected).abs() < 1e-9);
        assert_eq!(snapshot.first_innings.as_ref().unwrap().runs, 4);
    }

    #[test]
    fn extras_are_recomputed_after_a_correction() {
        let config = MatchConfig::default();
        let ledger = ledger_of(vec![
            DeliveryInput::wide("a", "b", "x", 1),
            DeliveryInput::runs("a", "b", "x", 1),
        ]);
        let fold = Reducer::fold(&config, &ledger).unwrap();
        let before = Projector::project(&config, &fold.state, &fold.ledger);
        assert_eq!(before.extras.wides, 1);

        let wide_id = fold.ledger.entries()[0].id;
        let edit = DeliveryEdit {
            extra: Some(Extra::None),
            extra_runs: Some(0),
            runs_off_bat: Some(1),
            ..Default::default()
        };
        let corrected = CorrectionEngine::correct(&config, &fold.ledger, wide_id, &edit).unwrap();
        let after = Projector::project(&config, &corrected.state, &corrected.ledger);

        assert_eq!(after.extras.wides, 0);
        assert_eq!(after.extras.total, 0);
        assert_eq!(after.total_runs, 2);
        assert_eq!(after.legal_balls_bowled, 2);
    }

    #[test]
    fn phases_bucket_by_fold_assigned_over_number() {
        let config = MatchConfig::default(); // 20 overs, powerplay 6, death 5
        let snapshot = project(
            &config,
            vec![
                DeliveryInput::runs("a", "b", "x", 4),
                DeliveryInput::runs("a", "b", "x", 2),
            ],
        );
        assert_eq!(snapshot.phases.len(), 3);

        let powerplay = &snapshot.phases[0];
        assert_eq!(powerplay.phase, Phase::Powerplay);
        assert_eq!(powerplay.runs, 6);
        assert_eq!(powerplay.legal_balls, 2);

        let middle = &snapshot.phases[1];
        assert_eq!(middle.runs, 0);
        assert_eq!(middle.run_rate, 0.0);
    }

    #[test]
    fn phase_of_respects_a_revised_overs_limit() {
        let config = MatchConfig::default();
        assert_eq!(phase_of(&config, 0), Phase::Powerplay);
        assert_eq!(phase_of(&config, 5), Phase::Powerplay);
        assert_eq!(phase_of(&config, 6), Phase::Middle);
        assert_eq!(phase_of(&config, 14), Phase::Middle);
        assert_eq!(phase_of(&config, 15), Phase::Death);

        let shortened = MatchConfig {
            overs_limit: Some(10),
            ..MatchConfig::default()
        };
        assert_eq!(phase_of(&shortened, 5), Phase::Death);

        let unlimited = MatchConfig {
            overs_limit: None,
            ..MatchConfig::default()
        };
        assert_eq!(phase_of(&unlimited, 90), Phase::Middle);
    }

    #[test]
    fn scorecards_carry_rates_and_dismissals() {
        let config = MatchConfig::default();
        let snapshot = project(
            &config,
            vec![
                DeliveryInput::runs("a", "b", "x", 4),
                DeliveryInput::runs("a", "b", "x", 0)
                    .with_dismissal(Dismissal::new(DismissalKind::Caught, "a").with_fielder("f")),
            ],
        );

        let batter = &snapshot.batting_card[0];
        assert_eq!(batter.player_id.as_str(), "a");
        assert_eq!(batter.runs, 4);
        assert!((batter.strike_rate - 200.0).abs() < 1e-9);
        assert_eq!(batter.how_out, "c f b x");

        let not_out = &snapshot.batting_card[1];
        assert_eq!(not_out.how_out, "not out");

        let bowler = &snapshot.bowling_card[0];
        assert_eq!(bowler.overs, "0.2");
        assert_eq!(bowler.wickets, 1);
        assert!((bowler.economy - 12.0).abs() < 1e-9);
    }

    #[test]
    fn recent_feed_keeps_the_newest_deliveries() {
        let config = MatchConfig::default();
        let mut inputs = Vec::new();
        for _ in 0..5 {
            inputs.push(DeliveryInput::runs("a", "b", "x", 0));
        }
        inputs.push(DeliveryInput::runs("a", "b", "x", 4));
        let fold = Reducer::fold(&config, &ledger_of(inputs)).unwrap();
        let snapshot = Projector::project_with_recent(&config, &fold.state, &fold.ledger, 2);

        assert_eq!(snapshot.recent_deliveries.len(), 2);
        let last = snapshot.recent_deliveries.last().unwrap();
        assert_eq!(last.runs, 4);
        assert_eq!(last.summary, "x to a: FOUR");
        assert_eq!(last.position, "0.6");
    }

    #[test]
    fn projection_is_deterministic_and_serializable() {
        let config = MatchConfig::default();
        let fold = Reducer::fold(
            &config,
            &ledger_of(vec![
                DeliveryInput::no_ball("a", "b", "x", 1, 2),
                DeliveryInput::runs("a", "b", "x", 1),
            ]),
        )
        .unwrap();

        let first = Projector::project(&config, &fold.state, &fold.ledger);
        let second = Projector::project(&config, &fold.state, &fold.ledger);
        assert_eq!(first, second);

        let json = serde_json::to_string(&first).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, first);
    }
}
