//! Session participant entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::participant::{
    ParticipantResponse, ParticipantRole, ParticipantStatus,
};
use domain::models::profile::ProfileSummary;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the participant_role PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participant_role", rename_all = "lowercase")]
pub enum ParticipantRoleDb {
    Host,
    Participant,
    Invited,
}

impl From<ParticipantRoleDb> for ParticipantRole {
    fn from(db: ParticipantRoleDb) -> Self {
        match db {
            ParticipantRoleDb::Host => ParticipantRole::Host,
            ParticipantRoleDb::Participant => ParticipantRole::Participant,
            ParticipantRoleDb::Invited => ParticipantRole::Invited,
        }
    }
}

impl From<ParticipantRole> for ParticipantRoleDb {
    fn from(role: ParticipantRole) -> Self {
        match role {
            ParticipantRole::Host => ParticipantRoleDb::Host,
            ParticipantRole::Participant => ParticipantRoleDb::Participant,
            ParticipantRole::Invited => ParticipantRoleDb::Invited,
        }
    }
}

/// Database enum mapping for the participant_status PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "lowercase")]
pub enum ParticipantStatusDb {
    Accepted,
    Invited,
    Declined,
}

impl From<ParticipantStatusDb> for ParticipantStatus {
    fn from(db: ParticipantStatusDb) -> Self {
        match db {
            ParticipantStatusDb::Accepted => ParticipantStatus::Accepted,
            ParticipantStatusDb::Invited => ParticipantStatus::Invited,
            ParticipantStatusDb::Declined => ParticipantStatus::Declined,
        }
    }
}

impl From<ParticipantStatus> for ParticipantStatusDb {
    fn from(status: ParticipantStatus) -> Self {
        match status {
            ParticipantStatus::Accepted => ParticipantStatusDb::Accepted,
            ParticipantStatus::Invited => ParticipantStatusDb::Invited,
            ParticipantStatus::Declined => ParticipantStatusDb::Declined,
        }
    }
}

/// Database row mapping for the session_participants table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionParticipantEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub role: ParticipantRoleDb,
    pub status: ParticipantStatusDb,
    pub joined_at: DateTime<Utc>,
}

/// Participant row joined with the member's profile summary.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantWithProfileEntity {
    pub user_id: Uuid,
    pub role: ParticipantRoleDb,
    pub status: ParticipantStatusDb,
    pub joined_at: DateTime<Utc>,
    // Profile info
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ParticipantWithProfileEntity> for ParticipantResponse {
    fn from(entity: ParticipantWithProfileEntity) -> Self {
        let profile = entity.username.clone().map(|username| ProfileSummary {
            id: entity.user_id,
            username,
            full_name: entity.full_name.clone(),
            avatar_url: entity.avatar_url.clone(),
        });

        Self {
            user_id: entity.user_id,
            role: entity.role.into(),
            status: entity.status.into(),
            joined_at: entity.joined_at,
            profile,
        }
    }
}
