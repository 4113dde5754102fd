//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod matching;
pub mod message;
pub mod participant;
pub mod profile;
pub mod session;
pub mod session_message;
pub mod swipe;

pub use matching::{MatchEntity, MatchWithPartnerEntity};
pub use message::MessageEntity;
pub use participant::{
    ParticipantRoleDb, ParticipantStatusDb, ParticipantWithProfileEntity,
    SessionParticipantEntity,
};
pub use profile::ProfileEntity;
pub use session::{SessionWithHostEntity, StudySessionEntity};
pub use session_message::{SessionMessageEntity, SessionMessageWithSenderEntity};
pub use swipe::{SwipeDirectionDb, SwipeEntity};
