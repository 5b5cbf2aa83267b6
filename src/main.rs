use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ecopulse::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ecopulse::AppCommand {
    fn from(cmd: Commands) -> ecopulse::AppCommand {
        match cmd {
            Commands::Snapshot { json } => ecopulse::AppCommand::Snapshot { json },
            Commands::Gdp => ecopulse::AppCommand::Gdp,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and display every economic indicator
    Snapshot {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display GDP growth by year and country
    Gdp,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ecopulse::cli::setup::setup(),
        Some(cmd) => ecopulse::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
