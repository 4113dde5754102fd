//! Profile domain models.
//!
//! A profile is created alongside the user credential at signup and is
//! only ever mutated by its owner. Profiles are never hard-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::{
    validate_course_code, validate_time_of_day, validate_time_window, validate_weekday,
};

/// A weekly availability window, e.g. `{ day: "wed", start: "13:00", end: "18:00" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day: String,
    pub start: String,
    pub end: String,
}

impl AvailabilitySlot {
    /// Validates day key, time format, and window ordering.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_weekday(&self.day)?;
        validate_time_of_day(&self.start)?;
        validate_time_of_day(&self.end)?;
        validate_time_window(&self.start, &self.end)
    }
}

/// A student profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub program: Option<String>,
    pub year: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub current_subject: Option<String>,
    pub courses: Vec<String>,
    pub availability: Vec<AvailabilitySlot>,
    pub study_hours: i32,
    pub has_onboarded: bool,
    pub created_at: DateTime<Utc>,
}

/// Minimal profile projection used when embedding a sender or host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Full profile payload returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub program: Option<String>,
    pub year: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub current_subject: Option<String>,
    pub courses: Vec<String>,
    pub availability: Vec<AvailabilitySlot>,
    pub study_hours: i32,
    pub has_onboarded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            full_name: p.full_name,
            program: p.program,
            year: p.year,
            bio: p.bio,
            avatar_url: p.avatar_url,
            current_subject: p.current_subject,
            courses: p.courses,
            availability: p.availability,
            study_hours: p.study_hours,
            has_onboarded: p.has_onboarded,
            created_at: p.created_at,
        }
    }
}

/// Partial update of the caller's own profile. Absent fields are left
/// untouched; the client flips `has_onboarded` once setup is complete.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: Option<String>,

    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 100, message = "Program must be at most 100 characters"))]
    pub program: Option<String>,

    #[validate(length(max = 10, message = "Year must be at most 10 characters"))]
    pub year: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 100, message = "Current subject must be at most 100 characters"))]
    pub current_subject: Option<String>,

    #[validate(custom(function = "validate_course_list"))]
    pub courses: Option<Vec<String>>,

    #[validate(custom(function = "validate_availability"))]
    pub availability: Option<Vec<AvailabilitySlot>>,

    pub has_onboarded: Option<bool>,
}

fn validate_course_list(courses: &[String]) -> Result<(), ValidationError> {
    if courses.len() > 20 {
        let mut err = ValidationError::new("too_many_courses");
        err.message = Some("At most 20 courses".into());
        return Err(err);
    }
    for code in courses {
        validate_course_code(code)?;
    }
    Ok(())
}

fn validate_availability(slots: &[AvailabilitySlot]) -> Result<(), ValidationError> {
    if slots.len() > 21 {
        let mut err = ValidationError::new("too_many_slots");
        err.message = Some("At most 21 availability windows".into());
        return Err(err);
    }
    for slot in slots {
        slot.validate()?;
    }
    Ok(())
}

/// Adds studied hours to the profile's aggregate counter.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AddStudyHoursRequest {
    #[validate(range(min = 1, max = 24, message = "Hours must be between 1 and 24"))]
    pub hours: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_with_username(name: &str) -> UpdateProfileRequest {
        UpdateProfileRequest {
            username: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_update_passes() {
        let req = UpdateProfileRequest {
            username: Some("wonyoung_j".into()),
            program: Some("Psychology".into()),
            year: Some("U2".into()),
            courses: Some(vec!["PSYC213".into(), "COMP302".into()]),
            availability: Some(vec![AvailabilitySlot {
                day: "tue".into(),
                start: "13:00".into(),
                end: "18:00".into(),
            }]),
            has_onboarded: Some(true),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_username_fails() {
        assert!(update_with_username("x").validate().is_err());
        assert!(update_with_username("no spaces!").validate().is_err());
    }

    #[test]
    fn bad_course_code_fails() {
        let req = UpdateProfileRequest {
            courses: Some(vec!["comp302".into()]),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn inverted_availability_window_fails() {
        let req = UpdateProfileRequest {
            availability: Some(vec![AvailabilitySlot {
                day: "mon".into(),
                start: "18:00".into(),
                end: "09:00".into(),
            }]),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn study_hours_range() {
        assert!(AddStudyHoursRequest { hours: 3 }.validate().is_ok());
        assert!(AddStudyHoursRequest { hours: 0 }.validate().is_err());
        assert!(AddStudyHoursRequest { hours: 25 }.validate().is_err());
    }
}
