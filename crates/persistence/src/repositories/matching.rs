//! Match repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::matching::canonical_pair;

use crate::entities::{MatchEntity, MatchWithPartnerEntity, ProfileEntity};
use crate::metrics::QueryTimer;

/// Repository for match-related database operations.
#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Creates a new MatchRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotently create the match for an unordered pair and return it.
    ///
    /// The pair is sorted into canonical order before insert, so both
    /// (a, b) and (b, a) resolve to the same row; the unique constraint
    /// guarantees exactly one row regardless of which call completes the
    /// mutual like.
    pub async fn upsert_pair(&self, a: Uuid, b: Uuid) -> Result<MatchEntity, sqlx::Error> {
        let (user1_id, user2_id) = canonical_pair(a, b);

        let timer = QueryTimer::new("upsert_match_pair");
        sqlx::query(
            r#"
            INSERT INTO matches (id, user1_id, user2_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user1_id, user2_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user1_id)
        .bind(user2_id)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query_as::<_, MatchEntity>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE user1_id = $1 AND user2_id = $2
            "#,
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a match by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_match_by_id");
        let result = sqlx::query_as::<_, MatchEntity>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's matches newest first, each with the partner profile
    /// and the latest message of the conversation.
    pub async fn list_with_partners(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MatchWithPartnerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_matches_with_partners");
        let result = sqlx::query_as::<_, MatchWithPartnerEntity>(
            r#"
            SELECT
                m.id AS match_id, m.created_at AS matched_at,
                p.id AS partner_id, p.username AS partner_username,
                p.full_name AS partner_full_name, p.program AS partner_program,
                p.avatar_url AS partner_avatar_url,
                p.current_subject AS partner_current_subject,
                p.courses AS partner_courses,
                lm.content AS last_message, lm.created_at AS last_message_at
            FROM matches m
            JOIN profiles p
              ON p.id = CASE WHEN m.user1_id = $1 THEN m.user2_id ELSE m.user1_id END
            LEFT JOIN LATERAL (
                SELECT content, created_at
                FROM messages
                WHERE match_id = m.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            ) lm ON true
            WHERE m.user1_id = $1 OR m.user2_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Full profiles of everyone the user has matched with (the invite
    /// candidate pool).
    pub async fn partner_profiles(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("match_partner_profiles");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT p.id, p.username, p.full_name, p.program, p.year, p.bio,
                   p.avatar_url, p.current_subject, p.courses, p.availability,
                   p.study_hours, p.has_onboarded, p.created_at
            FROM matches m
            JOIN profiles p
              ON p.id = CASE WHEN m.user1_id = $1 THEN m.user2_id ELSE m.user1_id END
            WHERE m.user1_id = $1 OR m.user2_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
