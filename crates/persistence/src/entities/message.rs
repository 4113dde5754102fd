//! Direct-message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::message::MessageResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for MessageResponse {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            match_id: entity.match_id,
            sender_id: entity.sender_id,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}
