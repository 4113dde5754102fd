//! Repository implementations for database operations.

pub mod matching;
pub mod message;
pub mod participant;
pub mod profile;
pub mod session;
pub mod session_message;
pub mod swipe;

pub use matching::MatchRepository;
pub use message::MessageRepository;
pub use participant::ParticipantRepository;
pub use profile::ProfileRepository;
pub use session::SessionRepository;
pub use session_message::SessionMessageRepository;
pub use swipe::SwipeRepository;
