//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::profile::{AvailabilitySlot, Profile};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the profiles table.
///
/// Availability windows are stored as a JSONB array; a malformed value
/// (which the API never writes) maps to an empty list rather than an error.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub program: Option<String>,
    pub year: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub current_subject: Option<String>,
    pub courses: Vec<String>,
    pub availability: serde_json::Value,
    pub study_hours: i32,
    pub has_onboarded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        let availability: Vec<AvailabilitySlot> =
            serde_json::from_value(entity.availability).unwrap_or_default();

        Self {
            id: entity.id,
            username: entity.username,
            full_name: entity.full_name,
            program: entity.program,
            year: entity.year,
            bio: entity.bio,
            avatar_url: entity.avatar_url,
            current_subject: entity.current_subject,
            courses: entity.courses,
            availability,
            study_hours: entity.study_hours,
            has_onboarded: entity.has_onboarded,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_with_availability(value: serde_json::Value) -> ProfileEntity {
        ProfileEntity {
            id: Uuid::new_v4(),
            username: "cheela_z".into(),
            full_name: None,
            program: Some("Computer Science".into()),
            year: Some("U2".into()),
            bio: None,
            avatar_url: None,
            current_subject: Some("Lazy evaluation".into()),
            courses: vec!["COMP302".into()],
            availability: value,
            study_hours: 12,
            has_onboarded: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn availability_json_maps_to_slots() {
        let entity = entity_with_availability(serde_json::json!([
            { "day": "wed", "start": "13:00", "end": "18:00" }
        ]));
        let profile: Profile = entity.into();

        assert_eq!(profile.availability.len(), 1);
        assert_eq!(profile.availability[0].day, "wed");
    }

    #[test]
    fn malformed_availability_maps_to_empty() {
        let entity = entity_with_availability(serde_json::json!({"oops": true}));
        let profile: Profile = entity.into();
        assert!(profile.availability.is_empty());
    }
}
