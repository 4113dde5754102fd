//! Study session repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::session::{CreateSessionRequest, UpdateSessionRequest};

use crate::entities::{SessionWithHostEntity, StudySessionEntity};
use crate::metrics::QueryTimer;

const SESSION_COLUMNS: &str = "id, host_id, title, description, course_code, location, \
     start_time, end_time, is_public, max_participants, created_at";

const SESSION_WITH_HOST_SELECT: &str = r#"
    SELECT
        s.id, s.host_id, s.title, s.description, s.course_code, s.location,
        s.start_time, s.end_time, s.is_public, s.max_participants, s.created_at,
        h.username AS host_username, h.full_name AS host_full_name,
        h.avatar_url AS host_avatar_url,
        (SELECT COUNT(*) FROM session_participants
         WHERE session_id = s.id AND status <> 'declined') AS participant_count
    FROM study_sessions s
    LEFT JOIN profiles h ON h.id = s.host_id
"#;

/// Repository for study-session database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a session together with its host participant row.
    ///
    /// Both inserts run in one transaction so a failure cannot leave a
    /// session without its host seat.
    pub async fn create_with_host(
        &self,
        host_id: Uuid,
        request: &CreateSessionRequest,
    ) -> Result<StudySessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session_with_host");
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, StudySessionEntity>(&format!(
            r#"
            INSERT INTO study_sessions
                (id, host_id, title, description, course_code, location,
                 start_time, end_time, is_public, max_participants)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(host_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.course_code)
        .bind(&request.location)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.is_public)
        .bind(request.max_participants)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO session_participants (id, session_id, user_id, role, status)
            VALUES ($1, $2, $3, 'host', 'accepted')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session.id)
        .bind(host_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(session)
    }

    /// Find a session by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StudySessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_id");
        let result = sqlx::query_as::<_, StudySessionEntity>(&format!(
            "SELECT {SESSION_COLUMNS} FROM study_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a session with host summary and seat count.
    pub async fn find_with_host(
        &self,
        id: Uuid,
    ) -> Result<Option<SessionWithHostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_with_host");
        let result = sqlx::query_as::<_, SessionWithHostEntity>(&format!(
            "{SESSION_WITH_HOST_SELECT} WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partially update a session. Absent request fields keep their value.
    /// Authorization (host-only) is the caller's responsibility.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateSessionRequest,
    ) -> Result<StudySessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_session");
        let result = sqlx::query_as::<_, StudySessionEntity>(&format!(
            r#"
            UPDATE study_sessions
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                course_code = COALESCE($4, course_code),
                location = COALESCE($5, location),
                start_time = COALESCE($6, start_time),
                end_time = COALESCE($7, end_time),
                is_public = COALESCE($8, is_public),
                max_participants = COALESCE($9, max_participants),
                updated_at = now()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.course_code)
        .bind(&request.location)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.is_public)
        .bind(request.max_participants)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a session; participants and chat cascade away with it.
    /// Authorization (host-only) is the caller's responsibility.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_session");
        let result = sqlx::query("DELETE FROM study_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Sessions the user hosts, soonest first.
    pub async fn list_hosted_by(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SessionWithHostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_hosted_sessions");
        let result = sqlx::query_as::<_, SessionWithHostEntity>(&format!(
            "{SESSION_WITH_HOST_SELECT} WHERE s.host_id = $1 ORDER BY s.start_time"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Private sessions the user has a non-host participant row in.
    pub async fn list_invited_to(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SessionWithHostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invited_sessions");
        let result = sqlx::query_as::<_, SessionWithHostEntity>(&format!(
            r#"
            {SESSION_WITH_HOST_SELECT}
            WHERE s.is_public = false
              AND s.id IN (
                  SELECT session_id FROM session_participants
                  WHERE user_id = $1 AND role <> 'host'
              )
            ORDER BY s.start_time
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All public sessions, soonest first.
    pub async fn list_public(&self) -> Result<Vec<SessionWithHostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_sessions");
        let result = sqlx::query_as::<_, SessionWithHostEntity>(&format!(
            "{SESSION_WITH_HOST_SELECT} WHERE s.is_public = true ORDER BY s.start_time"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
