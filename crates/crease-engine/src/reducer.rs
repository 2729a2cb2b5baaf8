use tracing::debug;

use crease_ledger::Ledger;
use crease_types::{Delivery, Extra, MatchConfig, PlayerId, TeamConfig};

use crate::error::SequenceViolation;
use crate::state::{MatchState, MatchStatus};

/// Result of folding a ledger: the final state plus the ledger with
/// ordering metadata (innings, over, ball) rewritten by the fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub state: MatchState,
    pub ledger: Ledger,
}

/// The deterministic scoring reducer.
///
/// `fold` is literally [`Reducer::apply`] iterated from
/// [`MatchState::new`], which is why an incremental append and a full
/// replay can never disagree.
pub struct Reducer;

impl Reducer {
    /// Fold an entire ledger into match state from scratch.
    pub fn fold(config: &MatchConfig, ledger: &Ledger) -> Result<Fold, SequenceViolation> {
        let mut state = MatchState::new();
        let mut annotated = Vec::with_capacity(ledger.len());

        for delivery in ledger.iter() {
            let mut entry = delivery.clone();
            Self::apply(config, &mut state, &mut entry)?;
            annotated.push(entry);
        }

        Ok(Fold {
            state,
            ledger: Ledger::from_entries(ledger.match_id(), annotated),
        })
    }

    /// Fold and discard the annotated ledger.
    pub fn fold_state(
        config: &MatchConfig,
        ledger: &Ledger,
    ) -> Result<MatchState, SequenceViolation> {
        Self::fold(config, ledger).map(|fold| fold.state)
    }

    /// Apply one delivery to the state, assigning its ordering metadata.
    ///
    /// This is the single authority on cricket legality in context; a
    /// delivery that violates it must not enter the committed ledger.
    pub fn apply(
        config: &MatchConfig,
        state: &mut MatchState,
        delivery: &mut Delivery,
    ) -> Result<(), SequenceViolation> {
        match state.status {
            MatchStatus::Completed => {
                return Err(SequenceViolation::MatchAlreadyCompleted { id: delivery.id })
            }
            MatchStatus::NotStarted => state.status = MatchStatus::InProgress,
            MatchStatus::InningsBreak => state.begin_second_innings(config),
            MatchStatus::InProgress => {}
        }

        resolve_batters(config, state, delivery)?;
        resolve_bowler(config, state, delivery)?;

        // Ordering metadata is assigned here, never trusted from input.
        delivery.inning = state.current_inning;
        delivery.over_number = state.overs_completed;
        delivery.ball_number = state.balls_this_over + 1;

        // A striker-end dismissal must name the batter the fold puts on
        // strike, not whoever the caller believed was facing.
        if let Some(dismissal) = &delivery.dismissal {
            if dismissal.kind.striker_only()
                && state.striker_id.as_ref() != Some(&dismissal.player_id)
            {
                return Err(SequenceViolation::StrikeMismatch {
                    id: delivery.id,
                    expected: state.striker_id.clone().expect("both batters seated"),
                    found: dismissal.player_id.clone(),
                });
            }
        }

        if delivery.bowler_change_override {
            state.over_had_change = true;
        }

        score(state, delivery);

        if delivery.extra.is_legal() {
            state.legal_balls_bowled += 1;
            state.balls_this_over += 1;
            state.bowling_entry_mut(&delivery.bowler_id).legal_balls += 1;
        }

        if rotation_runs(delivery) % 2 == 1 {
            state.swap_strike();
        }

        if let Some(dismissal) = &delivery.dismissal {
            let summary = dismissal.summary(&delivery.bowler_id);
            let entry = state.batting_entry_mut(&dismissal.player_id);
            entry.is_out = true;
            entry.dismissal = Some(summary);
            state.total_wickets += 1;
            if dismissal.kind.credits_bowler() {
                state.bowling_entry_mut(&delivery.bowler_id).wickets += 1;
            }
            // Match by id: the odd-run swap may already have crossed the slots.
            if state.striker_id.as_ref() == Some(&dismissal.player_id) {
                state.striker_id = None;
            } else if state.non_striker_id.as_ref() == Some(&dismissal.player_id) {
                state.non_striker_id = None;
            }
            state.needs_new_batter = true;
            debug!(id = %delivery.id, player = %dismissal.player_id, "wicket");
        }

        if delivery.extra.is_legal() && state.balls_this_over == config.balls_per_over {
            end_over(state);
        }

        check_innings_completion(config, state);
        Ok(())
    }
}

/// Runs that decide whether the batters ended up at swapped ends.
///
/// Bat runs for ordinary deliveries and no-balls; byes and leg-byes are all
/// physically run, so they rotate on `extra_runs`; a wide's first extra is
/// the penalty, so only the runs beyond it were run.
fn rotation_runs(delivery: &Delivery) -> u32 {
    match delivery.extra {
        Extra::None | Extra::NoBall => delivery.runs_off_bat,
        Extra::Bye | Extra::LegBye => delivery.extra_runs,
        Extra::Wide => delivery.extra_runs.saturating_sub(1),
    }
}

fn score(state: &mut MatchState, delivery: &Delivery) {
    state.total_runs += delivery.runs_scored();

    let batter = state.batting_entry_mut(&delivery.striker_id);
    batter.runs += delivery.runs_off_bat;
    if delivery.extra.counts_as_ball_faced() {
        batter.balls_faced += 1;
    }
    match delivery.runs_off_bat {
        4 => batter.fours += 1,
        6 => batter.sixes += 1,
        _ => {}
    }

    let charged = delivery.runs_off_bat
        + if delivery.extra.charged_to_bowler() {
            delivery.extra_runs
        } else {
            0
        };
    let bowler = state.bowling_entry_mut(&delivery.bowler_id);
    bowler.runs_conceded += charged;
    match delivery.extra {
        Extra::Wide => bowler.wides += 1,
        Extra::NoBall => bowler.no_balls += 1,
        Extra::None | Extra::Bye | Extra::LegBye => {}
    }
    state.runs_this_over += charged;
}

fn end_over(state: &mut MatchState) {
    state.swap_strike();
    state.overs_completed += 1;
    state.balls_this_over = 0;
    if state.runs_this_over == 0 {
        if let Some(bowler) = state.bowler_id.clone() {
            state.bowling_entry_mut(&bowler).maidens += 1;
        }
    }
    state.runs_this_over = 0;
    state.previous_over_bowler = state.bowler_id.clone();
    state.previous_over_had_change = state.over_had_change;
    state.over_had_change = false;
    state.needs_new_over = true;
}

fn check_innings_completion(config: &MatchConfig, state: &mut MatchState) {
    let target_reached = state.current_inning == 2
        && state.target.is_some_and(|t| state.total_runs >= t);
    let all_out = state.total_wickets >= config.wickets_limit(state.current_inning);
    let overs_exhausted = config
        .balls_limit()
        .is_some_and(|limit| state.legal_balls_bowled >= limit);

    if !(target_reached || all_out || overs_exhausted) {
        return;
    }

    if state.current_inning == 1 {
        state.close_first_innings();
        debug!("first innings closed");
    } else {
        state.status = MatchStatus::Completed;
        state.needs_new_batter = false;
        state.needs_new_over = false;
        debug!("match completed");
    }
}

/// Seat the batter pair and assign who is on strike.
///
/// Which two players are at the crease is checked against the fold's own
/// state; which of them faces is *assigned* by the fold, the way ball
/// numbers are. A correction to an earlier ball legitimately changes who
/// is on strike for every later ball, so the stored order is rewritten on
/// replay rather than trusted.
fn resolve_batters(
    config: &MatchConfig,
    state: &mut MatchState,
    delivery: &mut Delivery,
) -> Result<(), SequenceViolation> {
    let batting = config.batting_team(state.current_inning);

    if state.striker_id.is_none() && state.non_striker_id.is_none() {
        // Fresh innings: the first delivery seats both openers as named.
        check_squad(batting, &delivery.striker_id, delivery.id)?;
        check_squad(batting, &delivery.non_striker_id, delivery.id)?;
        state.striker_id = Some(delivery.striker_id.clone());
        state.non_striker_id = Some(delivery.non_striker_id.clone());
        state.batting_entry_mut(&delivery.striker_id);
        state.batting_entry_mut(&delivery.non_striker_id);
        state.needs_new_batter = false;
        return Ok(());
    }

    if state.needs_new_batter {
        let survivor = state
            .striker_id
            .clone()
            .or_else(|| state.non_striker_id.clone())
            .expect("a wicket leaves one batter standing");

        let newcomer = if delivery.striker_id == survivor {
            delivery.non_striker_id.clone()
        } else if delivery.non_striker_id == survivor {
            delivery.striker_id.clone()
        } else {
            return Err(SequenceViolation::BatterPairMismatch {
                id: delivery.id,
                found_striker: delivery.striker_id.clone(),
                found_non_striker: delivery.non_striker_id.clone(),
            });
        };

        if state.is_out(&newcomer) {
            return Err(SequenceViolation::DismissedBatterReturned {
                id: delivery.id,
                player: newcomer,
            });
        }
        check_squad(batting, &newcomer, delivery.id)?;

        // The newcomer takes the end the wicket left open.
        if state.striker_id.is_none() {
            state.striker_id = Some(newcomer.clone());
        } else {
            state.non_striker_id = Some(newcomer.clone());
        }
        state.batting_entry_mut(&newcomer);
        state.needs_new_batter = false;
    } else {
        let at_crease = [
            state.striker_id.as_ref().expect("both batters seated"),
            state.non_striker_id.as_ref().expect("both batters seated"),
        ];
        for player in [&delivery.striker_id, &delivery.non_striker_id] {
            if !at_crease.contains(&player) {
                if state.is_out(player) {
                    return Err(SequenceViolation::DismissedBatterReturned {
                        id: delivery.id,
                        player: player.clone(),
                    });
                }
                return Err(SequenceViolation::BatterPairMismatch {
                    id: delivery.id,
                    found_striker: delivery.striker_id.clone(),
                    found_non_striker: delivery.non_striker_id.clone(),
                });
            }
        }
    }

    // Strike assignment is the fold's, not the caller's.
    delivery.striker_id = state.striker_id.clone().expect("both batters seated");
    delivery.non_striker_id = state.non_striker_id.clone().expect("both batters seated");
    Ok(())
}

fn resolve_bowler(
    config: &MatchConfig,
    state: &mut MatchState,
    delivery: &Delivery,
) -> Result<(), SequenceViolation> {
    let bowling = config.bowling_team(state.current_inning);

    let Some(current) = state.bowler_id.clone() else {
        // First ball of an innings.
        check_squad(bowling, &delivery.bowler_id, delivery.id)?;
        state.bowler_id = Some(delivery.bowler_id.clone());
        state.bowling_entry_mut(&delivery.bowler_id);
        state.needs_new_over = false;
        return Ok(());
    };

    if state.needs_new_over {
        if let Some(previous) = &state.previous_over_bowler {
            let override_given =
                delivery.bowler_change_override || state.previous_over_had_change;
            if delivery.bowler_id == *previous && !override_given {
                return Err(SequenceViolation::AdjacentOverBowler {
                    id: delivery.id,
                    bowler: delivery.bowler_id.clone(),
                });
            }
        }
        check_squad(bowling, &delivery.bowler_id, delivery.id)?;
        state.bowler_id = Some(delivery.bowler_id.clone());
        state.bowling_entry_mut(&delivery.bowler_id);
        state.needs_new_over = false;
        return Ok(());
    }

    if delivery.bowler_id != current {
        if !delivery.bowler_change_override {
            return Err(SequenceViolation::MidOverBowlerChange {
                id: delivery.id,
                expected: current,
                found: delivery.bowler_id.clone(),
            });
        }
        check_squad(bowling, &delivery.bowler_id, delivery.id)?;
        state.bowler_id = Some(delivery.bowler_id.clone());
        state.bowling_entry_mut(&delivery.bowler_id);
    }
    Ok(())
}

fn check_squad(
    team: &TeamConfig,
    player: &PlayerId,
    id: crease_types::DeliveryId,
) -> Result<(), SequenceViolation> {
    // An empty squad disables membership checks.
    if !team.players.is_empty() && !team.contains(player) {
        return Err(SequenceViolation::PlayerNotInSquad {
            id,
            player: player.clone(),
            team: team.name.clone(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use crease_ledger::Ledger;
    use crease_types::{DeliveryInput, MatchConfig, MatchId, PlayerId};

    use super::*;

    #[derive(Clone, Debug)]
    enum Ball {
        Runs(u32),
        Wide(u32),
        NoBall(u32),
        Bye(u32),
        LegBye(u32),
    }

    fn ball_strategy() -> impl Strategy<Value = Ball> {
        prop_oneof![
            (0u32..=6).prop_map(Ball::Runs),
            (1u32..=5).prop_map(Ball::Wide),
            (0u32..=4).prop_map(Ball::NoBall),
            (1u32..=4).prop_map(Ball::Bye),
            (1u32..=4).prop_map(Ball::LegBye),
        ]
    }

    /// Build a context-legal ledger by reading the evolving state back for
    /// striker and bowler choices. No wickets: the sequences stay inside
    /// one innings under the default 20-over config.
    fn drive(balls: &[Ball]) -> (MatchConfig, Ledger) {
        let config = MatchConfig::default();
        let mut ledger = Ledger::new(MatchId::new());
        let bowlers = [PlayerId::new("x"), PlayerId::new("y")];

        for ball in balls {
            let state = Reducer::fold_state(&config, &ledger).unwrap();
            let striker = state.striker_id.clone().unwrap_or_else(|| "a".into());
            let non_striker = state.non_striker_id.clone().unwrap_or_else(|| "b".into());
            let bowler = if state.needs_new_over {
                let previous = state.previous_over_bowler.clone();
                bowlers
                    .iter()
                    .find(|b| Some(*b) != previous.as_ref())
                    .cloned()
                    .unwrap()
            } else {
                state.bowler_id.clone().unwrap_or_else(|| "x".into())
            };

            let input = match ball {
                Ball::Runs(r) => DeliveryInput::runs(striker, non_striker, bowler, *r),
                Ball::Wide(r) => DeliveryInput::wide(striker, non_striker, bowler, *r),
                Ball::NoBall(r) => DeliveryInput::no_ball(striker, non_striker, bowler, 1, *r),
                Ball::Bye(r) => DeliveryInput::bye(striker, non_striker, bowler, *r),
                Ball::LegBye(r) => DeliveryInput::leg_bye(striker, non_striker, bowler, *r),
            };
            let (next, _) = ledger.append(input).unwrap();
            ledger = next;
        }
        (config, ledger)
    }

    proptest! {
        #[test]
        fn replay_is_deterministic(balls in prop::collection::vec(ball_strategy(), 0..40)) {
            let (config, ledger) = drive(&balls);
            let first = Reducer::fold(&config, &ledger).unwrap();
            let second = Reducer::fold(&config, &ledger).unwrap();
            prop_assert_eq!(first.state, second.state);
            prop_assert_eq!(first.ledger, second.ledger);
        }

        #[test]
        fn extras_are_conserved(balls in prop::collection::vec(ball_strategy(), 0..40)) {
            let (config, ledger) = drive(&balls);
            let state = Reducer::fold_state(&config, &ledger).unwrap();
            let independent: u32 = ledger
                .iter()
                .map(|d| d.runs_off_bat + d.extra_runs)
                .sum();
            prop_assert_eq!(state.total_runs, independent);
        }

        #[test]
        fn over_accounting_balances(balls in prop::collection::vec(ball_strategy(), 0..40)) {
            let (config, ledger) = drive(&balls);
            let state = Reducer::fold_state(&config, &ledger).unwrap();
            prop_assert_eq!(
                state.legal_balls_bowled,
                state.overs_completed * 6 + state.balls_this_over as u32
            );
        }
    }
}
