//! Direct-message domain models.
//!
//! Messages belong to exactly one match and are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for sending a message (direct or session chat).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

/// A single direct message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MessageResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A page of message history, oldest first within the page.
///
/// `next_cursor` points past the oldest returned message; absent when
/// the full history has been read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MessageHistoryResponse {
    pub messages: Vec<MessageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_bounds() {
        let ok = SendMessageRequest { content: "hey!".into() };
        assert!(ok.validate().is_ok());

        let empty = SendMessageRequest { content: String::new() };
        assert!(empty.validate().is_err());

        let too_long = SendMessageRequest { content: "x".repeat(2001) };
        assert!(too_long.validate().is_err());
    }
}
