//! Session chat domain models.
//!
//! Like direct messages, session messages are append-only; the history
//! view embeds a summary of each sender's profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;

/// A single session chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionMessageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<ProfileSummary>,
}

/// Full chat history for a session, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionMessagesResponse {
    pub messages: Vec<SessionMessageResponse>,
}
