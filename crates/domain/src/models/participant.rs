//! Session participant domain models.
//!
//! Each (session, user) pair has at most one participant row. The row
//! moves through: none -> invited -> accepted | declined, or straight
//! to accepted on a direct join. The host row is created with the
//! session itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::profile::ProfileSummary;

/// Role of a participant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Host,
    Participant,
    Invited,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Host => "host",
            ParticipantRole::Participant => "participant",
            ParticipantRole::Invited => "invited",
        }
    }
}

impl FromStr for ParticipantRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(ParticipantRole::Host),
            "participant" => Ok(ParticipantRole::Participant),
            "invited" => Ok(ParticipantRole::Invited),
            _ => Err(format!("Invalid participant role: {}", s)),
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a participant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Accepted,
    Invited,
    Declined,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Accepted => "accepted",
            ParticipantStatus::Invited => "invited",
            ParticipantStatus::Declined => "declined",
        }
    }

    /// Whether this row grants access to the session chat.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParticipantStatus::Accepted)
    }
}

impl FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(ParticipantStatus::Accepted),
            "invited" => Ok(ParticipantStatus::Invited),
            "declined" => Ok(ParticipantStatus::Declined),
            _ => Err(format!("Invalid participant status: {}", s)),
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One roster entry in a session detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipantResponse {
    pub user_id: Uuid,
    pub role: ParticipantRole,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
}

/// Request payload for inviting a matched partner to a session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InviteRequest {
    pub user_id: Uuid,
}
