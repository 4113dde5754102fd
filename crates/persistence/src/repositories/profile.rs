//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::profile::UpdateProfileRequest;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str = "id, username, full_name, program, year, bio, avatar_url, \
     current_subject, courses, availability, study_hours, has_onboarded, created_at";

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a profile by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_username");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partially update a profile. Absent request fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let availability = request
            .availability
            .as_ref()
            .map(|slots| serde_json::to_value(slots).unwrap_or_else(|_| serde_json::json!([])));

        let timer = QueryTimer::new("update_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            UPDATE profiles
            SET username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                program = COALESCE($4, program),
                year = COALESCE($5, year),
                bio = COALESCE($6, bio),
                avatar_url = COALESCE($7, avatar_url),
                current_subject = COALESCE($8, current_subject),
                courses = COALESCE($9, courses),
                availability = COALESCE($10, availability),
                has_onboarded = COALESCE($11, has_onboarded),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.username)
        .bind(&request.full_name)
        .bind(&request.program)
        .bind(&request.year)
        .bind(&request.bio)
        .bind(&request.avatar_url)
        .bind(&request.current_subject)
        .bind(&request.courses)
        .bind(availability)
        .bind(request.has_onboarded)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Atomically add studied hours to the aggregate counter.
    pub async fn add_study_hours(
        &self,
        id: Uuid,
        hours: i32,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_study_hours");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            UPDATE profiles
            SET study_hours = study_hours + $2, updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(hours)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Discovery candidates for a user: onboarded profiles other than the
    /// user's own, excluding anyone the user has already liked. A pass
    /// leaves the profile eligible for redisplay. Newest profiles first.
    pub async fn discover_candidates(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("discover_candidates");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            WHERE id <> $1
              AND has_onboarded = true
              AND id NOT IN (
                  SELECT target_id FROM swipes
                  WHERE swiper_id = $1 AND direction = 'like'
              )
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require a database connection and are
    // covered by the integration tests.
}
