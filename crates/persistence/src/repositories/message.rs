//! Direct-message repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MessageEntity;
use crate::metrics::QueryTimer;

/// Repository for direct-message database operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to a match conversation.
    pub async fn insert(
        &self,
        match_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (id, match_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, match_id, sender_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch one page of history, newest first. `before` is the exclusive
    /// (created_at, id) cursor of the previous page's oldest message; the
    /// caller reverses the page into chronological order.
    pub async fn list_page(
        &self,
        match_id: Uuid,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_message_page");
        let result = match before {
            Some((ts, id)) => {
                sqlx::query_as::<_, MessageEntity>(
                    r#"
                    SELECT id, match_id, sender_id, content, created_at
                    FROM messages
                    WHERE match_id = $1 AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                    "#,
                )
                .bind(match_id)
                .bind(ts)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageEntity>(
                    r#"
                    SELECT id, match_id, sender_id, content, created_at
                    FROM messages
                    WHERE match_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(match_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: MessageRepository tests require a database connection and are
    // covered by the integration tests.
}
