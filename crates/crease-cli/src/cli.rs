use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "crease",
    about = "crease — auditable, replayable cricket scoring",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty stored match
    Init(InitArgs),
    /// Fold a stored ledger and print the scorecard
    Replay(ReplayArgs),
    /// Check a stored ledger's integrity
    Audit(AuditArgs),
    /// Undo the last delivery and rewrite the file
    Undo(UndoArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Path of the match file to create
    pub out: String,

    /// Match configuration (TOML); defaults to a 20-over scratch match
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Path of the match file
    pub file: String,
}

#[derive(Args)]
pub struct AuditArgs {
    /// Path of the match file
    pub file: String,
}

#[derive(Args)]
pub struct UndoArgs {
    /// Path of the match file
    pub file: String,
}
