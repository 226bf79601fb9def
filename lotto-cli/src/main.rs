mod commands;
mod config;

use clap::{Parser, Subcommand};
use lotto_core::{Caller, Lottery, LottoError};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lotto")]
#[command(about = "Numbers lottery - betting rounds, tickets and draws")]
#[command(version)]
struct Cli {
    /// Data directory for the lottery database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/lotto.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Act as an administrator
    #[arg(long, global = true)]
    admin: bool,

    /// Identity recorded on submitted tickets
    #[arg(long, global = true)]
    identity: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Betting round lifecycle
    #[command(subcommand)]
    Round(commands::RoundCommands),

    /// Ticket submission and lookup
    #[command(subcommand)]
    Ticket(commands::TicketCommands),

    /// Draw publication
    #[command(subcommand)]
    Draw(commands::DrawCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "lotto={},lotto_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    tokio::fs::create_dir_all(&data_dir).await?;

    let lottery_config = config::load_config(&data_dir, cli.config.as_deref())?;
    tracing::debug!("Using data directory {}", data_dir.display());

    let lottery = Lottery::new(&data_dir, lottery_config).await?;
    tracing::debug!(
        "Draw validation: {:?}",
        lottery.config().draw_validation
    );

    let caller = Caller {
        is_admin: cli.admin,
        identity: cli.identity,
    };

    // Execute command
    let result = match cli.command {
        Commands::Round(cmd) => commands::handle_round_command(cmd, &lottery, &caller).await,
        Commands::Ticket(cmd) => commands::handle_ticket_command(cmd, &lottery, &caller).await,
        Commands::Draw(cmd) => commands::handle_draw_command(cmd, &lottery, &caller).await,
    };

    if let Err(e) = result {
        match &e {
            LottoError::Unauthorized(_) => {
                eprintln!("Error: {}", e);
                eprintln!("Administrative commands need the --admin flag");
            }
            LottoError::AdmissionClosed => {
                eprintln!("Error: Tickets are not being accepted right now");
                eprintln!("Use 'lotto round current' to check for an open round");
            }
            LottoError::BettingStillActive => {
                eprintln!("Error: {}", e);
                eprintln!("Close it first with: lotto --admin round close");
            }
            LottoError::NotFound(_) => {
                eprintln!("Error: {}", e);
                eprintln!("Check the ticket id and try again");
            }
            e if e.is_validation() => {
                eprintln!("Rejected: {}", e);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
