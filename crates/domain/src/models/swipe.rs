//! Swipe domain models.
//!
//! A swipe is a single directional like/pass decision by one profile
//! about another. At most one swipe exists per (swiper, target) pair;
//! a later decision supersedes the earlier one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// The two possible swipe decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Like,
    Pass,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Like => "like",
            SwipeDirection::Pass => "pass",
        }
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeDirection::Like),
            "pass" => Ok(SwipeDirection::Pass),
            _ => Err(format!("Invalid swipe direction: {}", s)),
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request payload for recording a swipe.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RecordSwipeRequest {
    pub target_id: Uuid,
    pub direction: SwipeDirection,
}

/// Result of recording a swipe.
///
/// `is_match` is true only when this swipe was a like and the reciprocal
/// like already existed, i.e. this call completed the pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordSwipeResponse {
    pub is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}
