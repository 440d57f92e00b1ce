//! Ticket model and lifecycle helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status for a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly reported, awaiting triage or work.
    Open,
    /// Waiting on the reporter or a third party.
    Pending,
    /// Fixed, awaiting confirmation.
    Resolved,
    /// Confirmed done; terminal unless reopened.
    Closed,
}

impl TicketStatus {
    /// Database column representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parse the database column representation.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "open" => Some(Self::Open),
            "pending" => Some(Self::Pending),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Ticket domain entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Ticket {
    /// Unique record identifier.
    pub id: String,
    /// One-line summary shown in list views.
    pub subject: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Current lifecycle status.
    pub status: TicketStatus,
    /// Priority this ticket is filed under, if any.
    pub priority_id: Option<String>,
    /// User who reported the ticket; immutable after creation.
    pub reporter: String,
    /// User currently assigned, if any.
    pub assignee: Option<String>,
    /// Free-form labels.
    pub labels: Vec<String>,
    /// Soft-delete flag; archived tickets are hidden from default listings.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the ticket was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Construct a new open ticket with defaults and generated identifier.
    #[must_use]
    pub fn new(subject: String, reporter: String, priority_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            subject,
            description: None,
            status: TicketStatus::Open,
            priority_id,
            reporter,
            assignee: None,
            labels: Vec::new(),
            archived: false,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self.status, next),
            (
                TicketStatus::Open,
                TicketStatus::Pending | TicketStatus::Resolved | TicketStatus::Closed
            ) | (
                TicketStatus::Pending,
                TicketStatus::Open | TicketStatus::Resolved | TicketStatus::Closed
            ) | (
                TicketStatus::Resolved,
                TicketStatus::Open | TicketStatus::Closed
            ) | (TicketStatus::Closed, TicketStatus::Open)
        )
    }
}
