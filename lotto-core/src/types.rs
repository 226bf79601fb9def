use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub personal_id: String,
    pub numbers: Vec<u8>, // in submission order
    pub round_id: i64,
    pub submitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub id: Uuid,
    pub numbers: Vec<i64>, // in published order
    pub created_at: DateTime<Utc>,
    pub round_id: i64,
}

/// Round row plus the aggregates shown in admin listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: Round,
    pub ticket_count: u64,
    pub has_draw: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawStatus {
    NotYetDrawn,
    Drawn {
        numbers: Vec<i64>,
        /// Ticket numbers that appear in the draw, in ticket order
        matched: Vec<u8>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketView {
    pub ticket: Ticket,
    pub round: Round,
    pub draw: DrawStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcome {
    Opened(Round),
    AlreadyOpen(Round),
}

impl OpenOutcome {
    pub fn round(&self) -> &Round {
        match self {
            OpenOutcome::Opened(round) | OpenOutcome::AlreadyOpen(round) => round,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseOutcome {
    Closed(Round),
    AlreadyClosed,
}

/// Identity handed to the core by whatever authenticates the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub is_admin: bool,
    pub identity: Option<String>,
}

impl Caller {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            identity: None,
        }
    }

    pub fn public() -> Self {
        Self::default()
    }

    pub fn identified(identity: impl Into<String>) -> Self {
        Self {
            is_admin: false,
            identity: Some(identity.into()),
        }
    }
}
