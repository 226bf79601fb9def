use crate::error::{LottoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    pub database_file: String,
    pub ticket_rules: NumberRules,
    pub draw_validation: DrawValidation,
}

/// Bounds a ticket's numbers and personal id must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberRules {
    pub min_number: u8,
    pub max_number: u8,
    pub min_count: usize,
    pub max_count: usize,
    pub max_personal_id_len: usize,
}

/// How strictly published draw numbers are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawValidation {
    /// Any non-empty sequence of integers
    #[default]
    ShapeOnly,
    /// Same count, range and distinctness rules as tickets
    TicketRules,
}

impl Default for NumberRules {
    fn default() -> Self {
        Self {
            min_number: 1,
            max_number: 45,
            min_count: 6,
            max_count: 10,
            max_personal_id_len: 20,
        }
    }
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            database_file: "lotto.db".to_string(),
            ticket_rules: NumberRules::default(),
            draw_validation: DrawValidation::default(),
        }
    }
}

impl LotteryConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the default config
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_file.trim().is_empty() {
            return Err(LottoError::config("Database file name cannot be empty"));
        }

        self.ticket_rules.validate()
    }
}

impl NumberRules {
    pub fn validate(&self) -> Result<()> {
        if self.min_number == 0 {
            return Err(LottoError::config("Minimum number must be greater than 0"));
        }

        if self.min_number > self.max_number {
            return Err(LottoError::config(format!(
                "Number range is empty: {}..={}",
                self.min_number, self.max_number
            )));
        }

        if self.min_count == 0 || self.min_count > self.max_count {
            return Err(LottoError::config(format!(
                "Invalid number count bounds: {}..={}",
                self.min_count, self.max_count
            )));
        }

        // Distinct numbers must be able to fill the largest ticket
        let pool = (self.max_number - self.min_number) as usize + 1;
        if self.min_count > pool {
            return Err(LottoError::config(format!(
                "Cannot pick {} distinct numbers from a pool of {}",
                self.min_count, pool
            )));
        }

        if self.max_personal_id_len == 0 {
            return Err(LottoError::config(
                "Maximum personal id length must be greater than 0",
            ));
        }

        Ok(())
    }
}
