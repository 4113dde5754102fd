//! Swipe entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::swipe::SwipeDirection;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the swipe_direction PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "swipe_direction", rename_all = "lowercase")]
pub enum SwipeDirectionDb {
    Like,
    Pass,
}

impl From<SwipeDirectionDb> for SwipeDirection {
    fn from(db: SwipeDirectionDb) -> Self {
        match db {
            SwipeDirectionDb::Like => SwipeDirection::Like,
            SwipeDirectionDb::Pass => SwipeDirection::Pass,
        }
    }
}

impl From<SwipeDirection> for SwipeDirectionDb {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Like => SwipeDirectionDb::Like,
            SwipeDirection::Pass => SwipeDirectionDb::Pass,
        }
    }
}

/// Database row mapping for the swipes table.
#[derive(Debug, Clone, FromRow)]
pub struct SwipeEntity {
    pub id: Uuid,
    pub swiper_id: Uuid,
    pub target_id: Uuid,
    pub direction: SwipeDirectionDb,
    pub created_at: DateTime<Utc>,
}
