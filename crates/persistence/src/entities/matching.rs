//! Match entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::matching::MatchSummary;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the matches table.
#[derive(Debug, Clone, FromRow)]
pub struct MatchEntity {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl MatchEntity {
    /// Returns the other side of the pair from `user`'s perspective.
    pub fn partner_of(&self, user: Uuid) -> Uuid {
        if self.user1_id == user {
            self.user2_id
        } else {
            self.user1_id
        }
    }

    /// Whether `user` is one of the matched pair.
    pub fn involves(&self, user: Uuid) -> bool {
        self.user1_id == user || self.user2_id == user
    }
}

/// Match row joined with the partner profile and the latest message.
#[derive(Debug, Clone, FromRow)]
pub struct MatchWithPartnerEntity {
    pub match_id: Uuid,
    pub matched_at: DateTime<Utc>,
    // Partner info
    pub partner_id: Uuid,
    pub partner_username: String,
    pub partner_full_name: Option<String>,
    pub partner_program: Option<String>,
    pub partner_avatar_url: Option<String>,
    pub partner_current_subject: Option<String>,
    pub partner_courses: Vec<String>,
    // Conversation state
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl From<MatchWithPartnerEntity> for MatchSummary {
    fn from(entity: MatchWithPartnerEntity) -> Self {
        Self {
            match_id: entity.match_id,
            partner_id: entity.partner_id,
            partner_username: entity.partner_username,
            partner_full_name: entity.partner_full_name,
            partner_program: entity.partner_program,
            partner_avatar_url: entity.partner_avatar_url,
            partner_current_subject: entity.partner_current_subject,
            partner_courses: entity.partner_courses,
            last_message: entity.last_message,
            last_message_at: entity.last_message_at,
            matched_at: entity.matched_at,
        }
    }
}
