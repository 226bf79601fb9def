use super::format_numbers;
use clap::Subcommand;
use lotto_core::{Caller, Lottery, LottoError, Result};

#[derive(Subcommand)]
pub enum DrawCommands {
    /// Publish the winning numbers of the latest, closed round (admin)
    Publish {
        /// Winning numbers, e.g. "4,8,15,16,23,42" or "[4,8,15,16,23,42]"
        numbers: String,
    },
    /// Show the draw of a round
    Show {
        /// Round id (defaults to the latest round)
        round_id: Option<i64>,
    },
}

pub async fn handle_draw_command(cmd: DrawCommands, lottery: &Lottery, caller: &Caller) -> Result<()> {
    match cmd {
        DrawCommands::Publish { numbers } => {
            let draw = lottery.publish_draw(numbers, caller).await?;

            println!("Draw published for round {}.", draw.round_id);
            println!("  Numbers: {}", format_numbers(&draw.numbers));
            println!("  Draw ID: {}", draw.id);
        }

        DrawCommands::Show { round_id } => {
            let round_id = match round_id {
                Some(id) => id,
                None => lottery
                    .get_latest_round()
                    .await?
                    .ok_or(LottoError::NoRoundsExist)?
                    .id,
            };

            match lottery.get_draw(round_id).await? {
                Some(draw) => {
                    println!("Draw for round {}:", round_id);
                    println!("  Numbers: {}", format_numbers(&draw.numbers));
                    println!(
                        "  Published: {}",
                        draw.created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
                None => println!("Round {} has not been drawn yet.", round_id),
            }
        }
    }

    Ok(())
}
