//! In-process realtime change feed.
//!
//! Replaces the hosted change-subscription service: each match and each
//! session has a broadcast channel; writes publish an event, WebSocket
//! clients subscribe for the lifetime of their socket.

pub mod hub;
pub mod ws;

pub use hub::{ChannelHub, ChannelKey, FeedEvent};
