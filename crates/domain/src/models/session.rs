//! Study session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::participant::ParticipantResponse;
use super::profile::ProfileSummary;

use shared::validation::validate_course_code;

/// Request payload for creating a study session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_optional_course_code"))]
    pub course_code: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub start_time: DateTime<Utc>,

    pub end_time: Option<DateTime<Utc>>,

    #[serde(default = "default_is_public")]
    pub is_public: bool,

    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub max_participants: i32,
}

fn default_is_public() -> bool {
    true
}

fn validate_optional_course_code(code: &str) -> Result<(), ValidationError> {
    validate_course_code(code)
}

impl CreateSessionRequest {
    /// Whether the optional end lies after the start. Cross-field checks
    /// stay out of the derive; callers reject invalid windows explicitly.
    pub fn time_window_is_valid(&self) -> bool {
        self.end_time.map_or(true, |end| end > self.start_time)
    }
}

impl UpdateSessionRequest {
    /// Valid only when both bounds are supplied and inverted.
    pub fn time_window_is_valid(&self) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end > start,
            _ => true,
        }
    }
}

/// Partial update of a session; host-only. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSessionRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_optional_course_code"))]
    pub course_code: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub is_public: Option<bool>,

    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub max_participants: Option<i32>,
}

/// A study session as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionResponse {
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

/// A session in a list view, enriched with host and seat count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub host: Option<ProfileSummary>,
    pub participant_count: i64,
}

/// The three session views a user sees: hosting, invited-to, public.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionsOverviewResponse {
    pub hosting: Vec<SessionSummary>,
    pub invited: Vec<SessionSummary>,
    pub public: Vec<SessionSummary>,
}

/// Full detail view: session, host, and the participant roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub host: Option<ProfileSummary>,
    pub participants: Vec<ParticipantResponse>,
    pub participant_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_request() -> CreateSessionRequest {
        CreateSessionRequest {
            title: "Midterm cram".into(),
            description: Some("Chapters 4-7".into()),
            course_code: Some("COMP302".into()),
            location: Some("McLennan 3rd floor".into()),
            start_time: Utc::now() + Duration::days(1),
            end_time: Some(Utc::now() + Duration::days(1) + Duration::hours(2)),
            is_public: true,
            max_participants: 4,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn empty_title_fails() {
        let mut req = base_request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn end_before_start_is_invalid() {
        let mut req = base_request();
        req.end_time = Some(req.start_time - Duration::hours(1));
        assert!(!req.time_window_is_valid());
    }

    #[test]
    fn open_ended_session_is_valid() {
        let mut req = base_request();
        req.end_time = None;
        assert!(req.validate().is_ok());
        assert!(req.time_window_is_valid());
    }

    #[test]
    fn update_window_checks_only_full_pairs() {
        let update = UpdateSessionRequest {
            end_time: Some(Utc::now()),
            ..Default::default()
        };
        assert!(update.time_window_is_valid());

        let inverted = UpdateSessionRequest {
            start_time: Some(Utc::now()),
            end_time: Some(Utc::now() - Duration::hours(2)),
            ..Default::default()
        };
        assert!(!inverted.time_window_is_valid());
    }

    #[test]
    fn capacity_bounds() {
        let mut req = base_request();
        req.max_participants = 0;
        assert!(req.validate().is_err());
        req.max_participants = 51;
        assert!(req.validate().is_err());
        req.max_participants = 1;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_course_code_fails() {
        let mut req = base_request();
        req.course_code = Some("not a code".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        assert!(UpdateSessionRequest::default().validate().is_ok());
    }
}
