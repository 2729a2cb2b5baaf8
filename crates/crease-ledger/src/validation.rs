use crease_types::{Delivery, DeliveryInput, Dismissal, Extra, PlayerId};

use crate::error::ValidationError;

/// Validate caller input before it becomes a ledger entry.
pub fn validate_input(input: &DeliveryInput) -> Result<(), ValidationError> {
    validate_fields(
        &input.striker_id,
        &input.non_striker_id,
        &input.bowler_id,
        input.runs_off_bat,
        input.extra,
        input.extra_runs,
        input.dismissal.as_ref(),
    )
}

/// Validate an existing (possibly just-edited) delivery record.
pub fn validate_delivery(delivery: &Delivery) -> Result<(), ValidationError> {
    validate_fields(
        &delivery.striker_id,
        &delivery.non_striker_id,
        &delivery.bowler_id,
        delivery.runs_off_bat,
        delivery.extra,
        delivery.extra_runs,
        delivery.dismissal.as_ref(),
    )
}

/// The extras constraint table plus structural sanity checks.
///
/// | extra       | requires          | forbids              |
/// |-------------|-------------------|----------------------|
/// | none        | —                 | extra_runs must be 0 |
/// | wide        | extra_runs >= 1   | runs_off_bat         |
/// | bye/leg-bye | extra_runs >= 1   | runs_off_bat         |
/// | no-ball     | extra_runs >= 1   | — (bat runs live)    |
fn validate_fields(
    striker: &PlayerId,
    non_striker: &PlayerId,
    bowler: &PlayerId,
    runs_off_bat: u32,
    extra: Extra,
    extra_runs: u32,
    dismissal: Option<&Dismissal>,
) -> Result<(), ValidationError> {
    match extra {
        Extra::None => {
            if extra_runs != 0 {
                return Err(ValidationError::UnexpectedExtraRuns { found: extra_runs });
            }
        }
        Extra::Wide | Extra::Bye | Extra::LegBye => {
            if extra_runs == 0 {
                return Err(ValidationError::MissingExtraRuns { extra });
            }
            if runs_off_bat != 0 {
                return Err(ValidationError::RunsOffBatForbidden {
                    extra,
                    found: runs_off_bat,
                });
            }
        }
        Extra::NoBall => {
            if extra_runs == 0 {
                return Err(ValidationError::MissingExtraRuns { extra });
            }
        }
    }

    if striker == non_striker {
        return Err(ValidationError::IdenticalBatters(striker.clone()));
    }
    if bowler == striker || bowler == non_striker {
        return Err(ValidationError::BowlerAtCrease(bowler.clone()));
    }

    if let Some(dismissal) = dismissal {
        if !dismissal.kind.possible_on(extra) {
            return Err(ValidationError::DismissalImpossible {
                kind: dismissal.kind,
                extra,
            });
        }
        if dismissal.player_id != *striker && dismissal.player_id != *non_striker {
            return Err(ValidationError::DismissedNotAtCrease(
                dismissal.player_id.clone(),
            ));
        }
        if dismissal.kind.striker_only() && dismissal.player_id != *striker {
            return Err(ValidationError::StrikerOnlyDismissal {
                kind: dismissal.kind,
                player: dismissal.player_id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_types::DismissalKind;

    #[test]
    fn plain_delivery_rejects_extra_runs() {
        let mut input = DeliveryInput::runs("a", "b", "c", 2);
        input.extra_runs = 1;
        assert_eq!(
            validate_input(&input),
            Err(ValidationError::UnexpectedExtraRuns { found: 1 })
        );
    }

    #[test]
    fn wide_requires_a_run_and_no_bat_runs() {
        let no_runs = DeliveryInput::wide("a", "b", "c", 0);
        assert_eq!(
            validate_input(&no_runs),
            Err(ValidationError::MissingExtraRuns { extra: Extra::Wide })
        );

        let mut off_bat = DeliveryInput::wide("a", "b", "c", 1);
        off_bat.runs_off_bat = 4;
        assert_eq!(
            validate_input(&off_bat),
            Err(ValidationError::RunsOffBatForbidden {
                extra: Extra::Wide,
                found: 4
            })
        );
    }

    #[test]
    fn no_ball_allows_runs_off_the_bat() {
        let input = DeliveryInput::no_ball("a", "b", "c", 1, 6);
        assert!(validate_input(&input).is_ok());

        let missing_penalty = DeliveryInput::no_ball("a", "b", "c", 0, 6);
        assert_eq!(
            validate_input(&missing_penalty),
            Err(ValidationError::MissingExtraRuns {
                extra: Extra::NoBall
            })
        );
    }

    #[test]
    fn byes_validate_like_wides() {
        assert!(validate_input(&DeliveryInput::bye("a", "b", "c", 2)).is_ok());
        assert_eq!(
            validate_input(&DeliveryInput::leg_bye("a", "b", "c", 0)),
            Err(ValidationError::MissingExtraRuns {
                extra: Extra::LegBye
            })
        );
    }

    #[test]
    fn batters_must_differ_and_exclude_the_bowler() {
        let same = DeliveryInput::runs("a", "a", "c", 0);
        assert_eq!(
            validate_input(&same),
            Err(ValidationError::IdenticalBatters("a".into()))
        );

        let bowling_batter = DeliveryInput::runs("a", "b", "a", 0);
        assert_eq!(
            validate_input(&bowling_batter),
            Err(ValidationError::BowlerAtCrease("a".into()))
        );
    }

    #[test]
    fn bowled_off_a_no_ball_is_impossible() {
        let input = DeliveryInput::no_ball("a", "b", "c", 1, 0)
            .with_dismissal(Dismissal::new(DismissalKind::Bowled, "a"));
        assert_eq!(
            validate_input(&input),
            Err(ValidationError::DismissalImpossible {
                kind: DismissalKind::Bowled,
                extra: Extra::NoBall
            })
        );
    }

    #[test]
    fn run_out_off_a_no_ball_stands() {
        let input = DeliveryInput::no_ball("a", "b", "c", 1, 1)
            .with_dismissal(Dismissal::new(DismissalKind::RunOut, "b").with_fielder("f"));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn dismissed_player_must_be_batting() {
        let input = DeliveryInput::runs("a", "b", "c", 0)
            .with_dismissal(Dismissal::new(DismissalKind::RunOut, "z"));
        assert_eq!(
            validate_input(&input),
            Err(ValidationError::DismissedNotAtCrease("z".into()))
        );
    }

    #[test]
    fn only_the_striker_can_be_bowled() {
        let input = DeliveryInput::runs("a", "b", "c", 0)
            .with_dismissal(Dismissal::new(DismissalKind::Bowled, "b"));
        assert_eq!(
            validate_input(&input),
            Err(ValidationError::StrikerOnlyDismissal {
                kind: DismissalKind::Bowled,
                player: "b".into()
            })
        );
    }
}
