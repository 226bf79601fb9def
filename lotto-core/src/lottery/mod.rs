pub mod config;
pub mod manager;

pub use config::{DrawValidation, LotteryConfig, NumberRules};
pub use manager::Lottery;
