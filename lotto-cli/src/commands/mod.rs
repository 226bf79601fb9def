pub mod draw;
pub mod round;
pub mod ticket;

pub use draw::{handle_draw_command, DrawCommands};
pub use round::{handle_round_command, RoundCommands};
pub use ticket::{handle_ticket_command, TicketCommands};

pub(crate) fn format_numbers<T: std::fmt::Display>(numbers: &[T]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
