use super::format_numbers;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use lotto_core::{Caller, DrawStatus, Lottery, Result};

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Submit a ticket into the open round
    Submit {
        /// Personal id (1-20 letters or digits)
        personal_id: String,
        /// Chosen numbers, e.g. "3,11,17,25,38,44" or "[3,11,17,25,38,44]"
        numbers: String,
    },
    /// Show a ticket and, once drawn, the round's winning numbers
    Show {
        /// Ticket id
        ticket_id: String,
    },
    /// List the tickets of a round (admin)
    List {
        /// Round id
        round_id: i64,
    },
}

pub async fn handle_ticket_command(
    cmd: TicketCommands,
    lottery: &Lottery,
    caller: &Caller,
) -> Result<()> {
    match cmd {
        TicketCommands::Submit {
            personal_id,
            numbers,
        } => {
            let ticket = lottery.submit_ticket(&personal_id, numbers, caller).await?;

            println!("Ticket accepted!");
            println!("  Ticket ID: {}", ticket.id);
            println!("  Round: {}", ticket.round_id);
            println!("  Numbers: {}", format_numbers(&ticket.numbers));
            println!();
            println!("Keep the ticket ID to check the result later:");
            println!("  lotto ticket show {}", ticket.id);
        }

        TicketCommands::Show { ticket_id } => {
            let view = lottery.get_ticket_view(&ticket_id).await?;

            println!("Ticket {}", view.ticket.id);
            println!("  Personal ID: {}", view.ticket.personal_id);
            println!("  Round: {}", view.round.id);
            println!(
                "  Submitted: {}",
                view.ticket.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!("  Numbers: {}", format_numbers(&view.ticket.numbers));

            match view.draw {
                DrawStatus::Drawn { numbers, matched } => {
                    println!("  Drawn: {}", format_numbers(&numbers));
                    println!("  Matched: {} ({})", matched.len(), format_numbers(&matched));
                }
                DrawStatus::NotYetDrawn => {
                    println!("  Drawn: not yet drawn");
                }
            }
        }

        TicketCommands::List { round_id } => {
            let tickets = lottery.list_tickets(round_id, caller).await?;

            if tickets.is_empty() {
                println!("No tickets in round {}.", round_id);
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Ticket", "Personal ID", "Numbers", "Submitted", "Submitter"]);

            for ticket in tickets {
                table.add_row(vec![
                    ticket.id.to_string(),
                    ticket.personal_id.clone(),
                    format_numbers(&ticket.numbers),
                    ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    ticket.submitter.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            }

            println!("{}", table);
        }
    }

    Ok(())
}
