//! Swipe repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{SwipeDirectionDb, SwipeEntity};
use crate::metrics::QueryTimer;

/// Repository for swipe-related database operations.
#[derive(Clone)]
pub struct SwipeRepository {
    pool: PgPool,
}

impl SwipeRepository {
    /// Creates a new SwipeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the (swiper, target) decision. A later swipe supersedes the
    /// earlier one and refreshes the recency timestamp.
    pub async fn upsert(
        &self,
        swiper_id: Uuid,
        target_id: Uuid,
        direction: SwipeDirectionDb,
    ) -> Result<SwipeEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_swipe");
        let result = sqlx::query_as::<_, SwipeEntity>(
            r#"
            INSERT INTO swipes (id, swiper_id, target_id, direction)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (swiper_id, target_id)
            DO UPDATE SET direction = EXCLUDED.direction, created_at = now()
            RETURNING id, swiper_id, target_id, direction, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(swiper_id)
        .bind(target_id)
        .bind(direction)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether the reciprocal like (target -> swiper) exists.
    pub async fn reciprocal_like_exists(
        &self,
        target_id: Uuid,
        swiper_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reciprocal_like_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM swipes
                WHERE swiper_id = $1 AND target_id = $2 AND direction = 'like'
            )
            "#,
        )
        .bind(target_id)
        .bind(swiper_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

}
