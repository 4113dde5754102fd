//! Study session entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::profile::ProfileSummary;
use domain::models::session::{SessionResponse, SessionSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the study_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct StudySessionEntity {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
}

impl From<StudySessionEntity> for SessionResponse {
    fn from(entity: StudySessionEntity) -> Self {
        Self {
            id: entity.id,
            host_id: entity.host_id,
            title: entity.title,
            description: entity.description,
            course_code: entity.course_code,
            location: entity.location,
            start_time: entity.start_time,
            end_time: entity.end_time,
            is_public: entity.is_public,
            max_participants: entity.max_participants,
            created_at: entity.created_at,
        }
    }
}

/// Session row joined with host profile summary and seat count.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithHostEntity {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    // Host info
    pub host_username: Option<String>,
    pub host_full_name: Option<String>,
    pub host_avatar_url: Option<String>,
    // Seat count (all participant rows, invited included)
    pub participant_count: i64,
}

impl From<SessionWithHostEntity> for SessionSummary {
    fn from(entity: SessionWithHostEntity) -> Self {
        let host = entity.host_username.clone().map(|username| ProfileSummary {
            id: entity.host_id,
            username,
            full_name: entity.host_full_name.clone(),
            avatar_url: entity.host_avatar_url.clone(),
        });

        Self {
            session: SessionResponse {
                id: entity.id,
                host_id: entity.host_id,
                title: entity.title,
                description: entity.description,
                course_code: entity.course_code,
                location: entity.location,
                start_time: entity.start_time,
                end_time: entity.end_time,
                is_public: entity.is_public,
                max_participants: entity.max_participants,
                created_at: entity.created_at,
            },
            host,
            participant_count: entity.participant_count,
        }
    }
}
