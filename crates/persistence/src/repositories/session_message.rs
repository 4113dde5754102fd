//! Session chat repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{SessionMessageEntity, SessionMessageWithSenderEntity};
use crate::metrics::QueryTimer;

const WITH_SENDER_SELECT: &str = r#"
    SELECT sm.id, sm.session_id, sm.sender_id, sm.content, sm.created_at,
           p.username AS sender_username, p.full_name AS sender_full_name,
           p.avatar_url AS sender_avatar_url
    FROM session_messages sm
    LEFT JOIN profiles p ON p.id = sm.sender_id
"#;

/// Repository for session chat database operations.
#[derive(Clone)]
pub struct SessionMessageRepository {
    pool: PgPool,
}

impl SessionMessageRepository {
    /// Creates a new SessionMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to the session chat.
    pub async fn insert(
        &self,
        session_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<SessionMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_session_message");
        let result = sqlx::query_as::<_, SessionMessageEntity>(
            r#"
            INSERT INTO session_messages (id, session_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, sender_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch one message with its sender summary (used after insert so the
    /// response and the realtime event carry the sender profile).
    pub async fn find_with_sender(
        &self,
        id: Uuid,
    ) -> Result<Option<SessionMessageWithSenderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_message_with_sender");
        let result = sqlx::query_as::<_, SessionMessageWithSenderEntity>(&format!(
            "{WITH_SENDER_SELECT} WHERE sm.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Full chat history of a session, oldest first, senders attached.
    pub async fn list_with_senders(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SessionMessageWithSenderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_session_messages");
        let result = sqlx::query_as::<_, SessionMessageWithSenderEntity>(&format!(
            "{WITH_SENDER_SELECT} WHERE sm.session_id = $1 ORDER BY sm.created_at, sm.id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: SessionMessageRepository tests require a database connection
    // and are covered by the integration tests.
}
