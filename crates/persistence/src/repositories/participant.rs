//! Session participant repository for database operations.
//!
//! Capacity is enforced inside the mutating statements themselves: the
//! count-vs-max predicate and the write are one atomic statement, so two
//! concurrent joins cannot both take the last seat.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ParticipantWithProfileEntity, SessionParticipantEntity};
use crate::metrics::QueryTimer;

/// Seats taken counts accepted and invited rows; a declined invitation
/// releases its seat.
const SEATS_AVAILABLE: &str = r#"
    (SELECT COUNT(*) FROM session_participants
     WHERE session_id = $1 AND status <> 'declined')
        < (SELECT max_participants FROM study_sessions WHERE id = $1)
"#;

/// Repository for session-participant database operations.
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    /// Creates a new ParticipantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the participant row for a (session, user) pair.
    pub async fn find_row(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SessionParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_participant_row");
        let result = sqlx::query_as::<_, SessionParticipantEntity>(
            r#"
            SELECT id, session_id, user_id, role, status, joined_at
            FROM session_participants
            WHERE session_id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a direct joiner (role=participant, status=accepted) if a
    /// seat is free. Returns the number of rows written; zero means the
    /// session is full.
    pub async fn insert_joiner_if_seat(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_joiner_if_seat");
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO session_participants (id, session_id, user_id, role, status)
            SELECT $3, $1, $2, 'participant', 'accepted'
            WHERE {SEATS_AVAILABLE}
            "#
        ))
        .bind(session_id)
        .bind(user_id)
        .bind(Uuid::new_v4())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Flip an invited row to accepted if a seat is free. Returns the
    /// number of rows written; zero means the session is full. The
    /// capacity predicate applies to acceptances as well, even though
    /// the invited row already holds its seat.
    pub async fn accept_invite_if_seat(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("accept_invite_if_seat");
        let result = sqlx::query(&format!(
            r#"
            UPDATE session_participants
            SET status = 'accepted'
            WHERE session_id = $1 AND user_id = $2 AND status = 'invited'
              AND {SEATS_AVAILABLE}
            "#
        ))
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Insert an invitation (role=invited, status=invited) if a seat is
    /// free. Returns the number of rows written; zero means full.
    pub async fn insert_invite_if_seat(
        &self,
        session_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_invite_if_seat");
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO session_participants (id, session_id, user_id, role, status)
            SELECT $3, $1, $2, 'invited', 'invited'
            WHERE {SEATS_AVAILABLE}
            "#
        ))
        .bind(session_id)
        .bind(invitee_id)
        .bind(Uuid::new_v4())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Decline an invitation. Returns the number of rows updated; zero
    /// means no invited row existed.
    pub async fn decline_invite(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("decline_invite");
        let result = sqlx::query(
            r#"
            UPDATE session_participants
            SET status = 'declined'
            WHERE session_id = $1 AND user_id = $2 AND status = 'invited'
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// The full roster of a session with profile summaries, host first.
    pub async fn roster(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<ParticipantWithProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("session_roster");
        let result = sqlx::query_as::<_, ParticipantWithProfileEntity>(
            r#"
            SELECT sp.user_id, sp.role, sp.status, sp.joined_at,
                   p.username, p.full_name, p.avatar_url
            FROM session_participants sp
            LEFT JOIN profiles p ON p.id = sp.user_id
            WHERE sp.session_id = $1
            ORDER BY (sp.role = 'host') DESC, sp.joined_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether the user has an accepted seat (host included) in the
    /// session. Gates the session chat.
    pub async fn is_accepted_member(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_accepted_member");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM session_participants
                WHERE session_id = $1 AND user_id = $2 AND status = 'accepted'
            )
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
