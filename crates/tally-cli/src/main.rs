//! Tally CLI - replay contract events into a store and inspect the projection

use alloy_primitives::Address;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the store directory [default: ./data]
    #[arg(short, long, global = true)]
    db_path: Option<PathBuf>,

    /// JSON file with `store` and `projector` sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Address whose incoming transfers are projected as fee-pool transactions
    #[arg(long, global = true)]
    fee_pool: Option<Address>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply events from a JSON-lines file
    Replay {
        /// One logged event per line, in delivery order
        #[arg(short, long)]
        events: PathBuf,

        /// Clear the projection before replaying
        #[arg(long)]
        from_scratch: bool,
    },

    /// Protocol totals, replay cursor and live record counts
    Status,

    /// List projected entities
    #[command(subcommand)]
    Show(ShowCommands),
}

#[derive(Subcommand)]
enum ShowCommands {
    /// Live transactions, newest first
    Transactions,

    /// Live prizes of one kind
    Prizes {
        #[arg(short, long, value_enum, default_value = "lottery")]
        kind: KindArg,
    },

    /// Aggregates for one address
    User { address: Address },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Lottery,
    Auction,
}

impl From<KindArg> for tally::PrizeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Lottery => tally::PrizeKind::Lottery,
            KindArg::Auction => tally::PrizeKind::Auction,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let settings = config::Settings::load(cli.config.as_deref(), cli.db_path, cli.fee_pool)?;

    // Execute command
    match cli.command {
        Commands::Replay {
            events,
            from_scratch,
        } => {
            commands::replay::execute(&settings, events, from_scratch)?;
        }
        Commands::Status => {
            commands::status::execute(&settings)?;
        }
        Commands::Show(ShowCommands::Transactions) => {
            commands::show::transactions(&settings)?;
        }
        Commands::Show(ShowCommands::Prizes { kind }) => {
            commands::show::prizes(&settings, kind.into())?;
        }
        Commands::Show(ShowCommands::User { address }) => {
            commands::show::user(&settings, address)?;
        }
    }

    Ok(())
}
