//! Priority reference data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket priority level. Reference data: created and edited by
/// administrators, never deleted while tickets may point at it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Priority {
    /// Unique record identifier.
    pub id: String,
    /// Display name, e.g. "Urgent".
    pub name: String,
    /// Compact label used in list columns, e.g. "URG".
    pub shortname: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional icon resource path.
    pub icon: Option<String>,
    /// Sort rank; lower is more urgent.
    pub rank: i64,
}

impl Priority {
    /// Construct a new priority with a generated identifier.
    #[must_use]
    pub fn new(name: String, shortname: String, rank: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            shortname,
            description: None,
            icon: None,
            rank,
        }
    }
}
