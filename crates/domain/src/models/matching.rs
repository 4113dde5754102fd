//! Match domain models.
//!
//! A match is an unordered pair of mutually-liked profiles, stored with
//! the smaller id first so the pair has exactly one canonical row. It is
//! created exactly once and never updated.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::profile::ProfileResponse;

/// One row of the matches overview: the partner plus conversation state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub partner_id: Uuid,
    pub partner_username: String,
    pub partner_full_name: Option<String>,
    pub partner_program: Option<String>,
    pub partner_avatar_url: Option<String>,
    pub partner_current_subject: Option<String>,
    pub partner_courses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    pub matched_at: DateTime<Utc>,
}

/// Response for listing the caller's matches, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchesResponse {
    pub matches: Vec<MatchSummary>,
}

/// Response for the invite candidate pool: full profiles of everyone the
/// caller has matched with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchedPartnersResponse {
    pub partners: Vec<ProfileResponse>,
}

/// Orders a pair of profile ids canonically (smaller first).
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
