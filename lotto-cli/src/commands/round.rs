use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use lotto_core::{Caller, CloseOutcome, Lottery, LottoError, OpenOutcome, Result};

#[derive(Subcommand)]
pub enum RoundCommands {
    /// Open a new betting round (admin)
    Open,
    /// Close the open betting round (admin)
    Close {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show the currently open round
    Current,
    /// Show the most recently created round
    Latest,
    /// List all rounds (admin)
    List,
}

pub async fn handle_round_command(
    cmd: RoundCommands,
    lottery: &Lottery,
    caller: &Caller,
) -> Result<()> {
    match cmd {
        RoundCommands::Open => match lottery.open_new_round(caller).await? {
            OpenOutcome::Opened(round) => {
                println!("Round {} opened. Tickets are now accepted.", round.id);
            }
            OpenOutcome::AlreadyOpen(round) => {
                println!("Round {} is already open. Nothing to do.", round.id);
            }
        },

        RoundCommands::Close { force } => {
            // Non-admins get the authorization error without a prompt
            if !force && caller.is_admin {
                let Some(open) = lottery.get_open_round().await? else {
                    println!("No round is open. Nothing to do.");
                    return Ok(());
                };

                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Close round {}? No further tickets will be accepted for it.",
                        open.id
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| LottoError::internal(format!("Prompt failed: {}", e)))?;

                if !confirm {
                    println!("Close cancelled.");
                    return Ok(());
                }
            }

            match lottery.close_open_round(caller).await? {
                CloseOutcome::Closed(round) => {
                    println!("Round {} closed. The draw can now be published.", round.id);
                }
                CloseOutcome::AlreadyClosed => {
                    println!("No round is open. Nothing to do.");
                }
            }
        }

        RoundCommands::Current => match lottery.get_open_round().await? {
            Some(round) => {
                println!("Open round: {}", round.id);
                println!("  Opened at: {}", round.created_at.format("%Y-%m-%d %H:%M:%S"));
            }
            None => println!("No round is open."),
        },

        RoundCommands::Latest => match lottery.get_latest_round().await? {
            Some(round) => {
                println!("Latest round: {}", round.id);
                println!("  Created at: {}", round.created_at.format("%Y-%m-%d %H:%M:%S"));
                println!("  Status: {}", if round.is_open { "Open" } else { "Closed" });
                match lottery.get_draw(round.id).await? {
                    Some(draw) => {
                        println!("  Draw: {}", super::format_numbers(&draw.numbers))
                    }
                    None => println!("  Draw: not yet drawn"),
                }
            }
            None => println!("No rounds yet."),
        },

        RoundCommands::List => {
            let rounds = lottery.list_rounds(caller).await?;

            if rounds.is_empty() {
                println!("No rounds yet.");
                println!("Open one with: lotto --admin round open");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Round", "Created", "Status", "Tickets", "Drawn"]);

            for summary in rounds {
                table.add_row(vec![
                    summary.round.id.to_string(),
                    summary.round.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    if summary.round.is_open { "Open" } else { "Closed" }.to_string(),
                    summary.ticket_count.to_string(),
                    if summary.has_draw { "Yes" } else { "No" }.to_string(),
                ]);
            }

            println!("{}", table);
        }
    }

    Ok(())
}
