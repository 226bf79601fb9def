use thiserror::Error;

pub type Result<T> = std::result::Result<T, LottoError>;

#[derive(Error, Debug)]
pub enum LottoError {
    #[error("Ticket admission is closed: no round is open")]
    AdmissionClosed,

    #[error("Invalid personal id: {0}")]
    InvalidPersonalId(String),

    #[error("Invalid number count: {0}")]
    InvalidCount(String),

    #[error("Number out of range: {0}")]
    InvalidRange(String),

    #[error("Duplicate numbers: {0}")]
    DuplicateNumbers(String),

    #[error("Betting is still active: close the open round before publishing a draw")]
    BettingStillActive,

    #[error("No rounds exist")]
    NoRoundsExist,

    #[error("Round {round_id} already has a draw")]
    DrawAlreadyExists { round_id: i64 },

    #[error("Missing or invalid draw numbers: {0}")]
    MissingOrInvalidNumbers(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LottoError {
    pub fn invalid_personal_id(msg: impl Into<String>) -> Self {
        Self::InvalidPersonalId(msg.into())
    }

    pub fn invalid_count(msg: impl Into<String>) -> Self {
        Self::InvalidCount(msg.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn duplicate_numbers(msg: impl Into<String>) -> Self {
        Self::DuplicateNumbers(msg.into())
    }

    pub fn invalid_draw_numbers(msg: impl Into<String>) -> Self {
        Self::MissingOrInvalidNumbers(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for failures caused by the caller's input or timing rather than
    /// by the store or the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::AdmissionClosed
                | Self::InvalidPersonalId(_)
                | Self::InvalidCount(_)
                | Self::InvalidRange(_)
                | Self::DuplicateNumbers(_)
                | Self::BettingStillActive
                | Self::NoRoundsExist
                | Self::DrawAlreadyExists { .. }
                | Self::MissingOrInvalidNumbers(_)
        )
    }
}
