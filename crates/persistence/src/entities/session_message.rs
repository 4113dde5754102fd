//! Session chat message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::profile::ProfileSummary;
use domain::models::session_message::SessionMessageResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the session_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionMessageEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<SessionMessageEntity> for SessionMessageResponse {
    fn from(entity: SessionMessageEntity) -> Self {
        Self {
            id: entity.id,
            session_id: entity.session_id,
            sender_id: entity.sender_id,
            content: entity.content,
            created_at: entity.created_at,
            sender: None,
        }
    }
}

/// Session message joined with the sender's profile summary.
#[derive(Debug, Clone, FromRow)]
pub struct SessionMessageWithSenderEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    // Sender info
    pub sender_username: Option<String>,
    pub sender_full_name: Option<String>,
    pub sender_avatar_url: Option<String>,
}

impl From<SessionMessageWithSenderEntity> for SessionMessageResponse {
    fn from(entity: SessionMessageWithSenderEntity) -> Self {
        let sender = entity.sender_username.clone().map(|username| ProfileSummary {
            id: entity.sender_id,
            username,
            full_name: entity.sender_full_name.clone(),
            avatar_url: entity.sender_avatar_url.clone(),
        });

        Self {
            id: entity.id,
            session_id: entity.session_id,
            sender_id: entity.sender_id,
            content: entity.content,
            created_at: entity.created_at,
            sender,
        }
    }
}
