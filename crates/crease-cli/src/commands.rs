use anyhow::bail;
use colored::Colorize;

use crease_engine::Reducer;
use crease_ledger::LedgerAuditor;
use crease_projection::{Projector, Snapshot};
use crease_sdk::MatchSession;
use crease_types::MatchConfig;

use crate::cli::*;
use crate::store::{load_config, MatchFile};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Replay(args) => cmd_replay(args, &cli.format),
        Command::Audit(args) => cmd_audit(args),
        Command::Undo(args) => cmd_undo(args, &cli.format),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MatchConfig::default(),
    };
    let file = MatchFile::new(config);
    file.save(&args.out)?;

    println!("{} Initialized match in {}", "✓".green().bold(), args.out.bold());
    println!("  Match: {}", file.ledger.match_id().short_id().cyan());
    println!(
        "  Fixture: {} v {}",
        file.config.home.name.yellow(),
        file.config.away.name.yellow()
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let file = MatchFile::load(&args.file)?;
    let fold = Reducer::fold(&file.config, &file.ledger)?;
    let snapshot = Projector::project(&file.config, &fold.state, &fold.ledger);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print_scorecard(&snapshot),
    }
    Ok(())
}

fn cmd_audit(args: AuditArgs) -> anyhow::Result<()> {
    let file = MatchFile::load(&args.file)?;
    let report = LedgerAuditor::audit(&file.ledger);

    println!(
        "Ledger {}: {} deliveries",
        file.ledger.match_id().short_id().cyan(),
        report.delivery_count.to_string().bold()
    );
    if report.is_valid() {
        println!("{} No violations.", "✓".green().bold());
        return Ok(());
    }
    for violation in &report.violations {
        println!(
            "  {} #{} {} — {}",
            "!".red().bold(),
            violation.seq,
            violation.id.short_id().dimmed(),
            violation.description
        );
    }
    bail!("{} violation(s) found", report.violations.len());
}

fn cmd_undo(args: UndoArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let file = MatchFile::load(&args.file)?;
    let mut session = MatchSession::resume(file.config.clone(), file.ledger)?;
    let snapshot = session.undo_last()?;

    MatchFile {
        config: file.config,
        ledger: session.ledger().clone(),
    }
    .save(&args.file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("{} Last delivery undone.", "✓".green().bold());
            print_scorecard(&snapshot);
        }
    }
    Ok(())
}

fn print_scorecard(snapshot: &Snapshot) {
    println!(
        "{} {}/{} ({} ov)  CRR {:.2}",
        snapshot.batting_team.yellow().bold(),
        snapshot.total_runs.to_string().bold(),
        snapshot.total_wickets,
        snapshot.overs,
        snapshot.current_run_rate
    );
    if let (Some(target), Some(rrr)) = (snapshot.target, snapshot.required_run_rate) {
        println!(
            "  Chasing {} — need {} off {} ({} RRR {:.2})",
            target.to_string().bold(),
            target.saturating_sub(snapshot.total_runs),
            snapshot
                .balls_remaining
                .map(|b| format!("{b} balls"))
                .unwrap_or_else(|| "∞".into()),
            "req".dimmed(),
            rrr
        );
    }
    if let Some(first) = &snapshot.first_innings {
        println!(
            "  1st innings: {}/{} ({} ov)",
            first.runs, first.wickets, first.overs
        );
    }

    println!("\n{}", "Batting".bold());
    for line in &snapshot.batting_card {
        println!(
            "  {:<16} {:>4} ({:>3})  4s {:<2} 6s {:<2} SR {:>6.1}  {}",
            line.player_id.to_string(),
            line.runs,
            line.balls_faced,
            line.fours,
            line.sixes,
            line.strike_rate,
            if line.how_out == "not out" {
                line.how_out.green()
            } else {
                line.how_out.normal()
            }
        );
    }

    println!(
        "  {:<16} {:>4}  (wd {} nb {} b {} lb {})",
        "Extras".dimmed(),
        snapshot.extras.total,
        snapshot.extras.wides,
        snapshot.extras.no_balls,
        snapshot.extras.byes,
        snapshot.extras.leg_byes
    );

    println!("\n{}", "Bowling".bold());
    for line in &snapshot.bowling_card {
        println!(
            "  {:<16} {:>5}  M {:<2} R {:<3} W {:<2} Econ {:>5.2}",
            line.player_id.to_string(),
            line.overs,
            line.maidens,
            line.runs_conceded,
            line.wickets,
            line.economy
        );
    }

    if !snapshot.recent_deliveries.is_empty() {
        println!("\n{}", "Recent".bold());
        for digest in &snapshot.recent_deliveries {
            let marker = if digest.is_wicket {
                "W".red().bold()
            } else {
                digest.runs.to_string().normal()
            };
            println!("  {:>5}  {}  {}", digest.position, marker, digest.summary);
        }
    }
}
