//! Channel hub: per-key broadcast fan-out.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use domain::models::message::MessageResponse;
use domain::models::session_message::SessionMessageResponse;

/// Buffered events per channel; slow subscribers past this lag see a
/// `Lagged` error and miss events (at-least-once, client de-dups by id).
const CHANNEL_CAPACITY: usize = 256;

/// Key of a realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    /// Direct-message feed of one match.
    Match(Uuid),
    /// Chat feed of one study session.
    Session(Uuid),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKey::Match(id) => write!(f, "match:{}", id),
            ChannelKey::Session(id) => write!(f, "session:{}", id),
        }
    }
}

/// Events delivered over a channel, tagged for the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    MessageCreated { message: MessageResponse },
    SessionMessageCreated { message: SessionMessageResponse },
}

/// Hub of broadcast channels, one per match/session with live listeners.
///
/// Channels are created lazily on first subscribe or publish and pruned
/// when a publish finds no remaining receivers.
#[derive(Clone, Default)]
pub struct ChannelHub {
    channels: Arc<RwLock<HashMap<ChannelKey, broadcast::Sender<FeedEvent>>>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a channel. Dropping the receiver unsubscribes.
    pub fn subscribe(&self, key: ChannelKey) -> broadcast::Receiver<FeedEvent> {
        {
            let channels = self.channels.read().unwrap();
            if let Some(tx) = channels.get(&key) {
                return tx.subscribe();
            }
        }

        let mut channels = self.channels.write().unwrap();
        channels
            .entry(key)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to a channel. Returns the number of receivers the
    /// event was delivered to; zero when nobody is listening.
    pub fn publish(&self, key: ChannelKey, event: FeedEvent) -> usize {
        let delivered = {
            let channels = self.channels.read().unwrap();
            match channels.get(&key) {
                Some(tx) => tx.send(event).unwrap_or(0),
                None => 0,
            }
        };

        if delivered == 0 {
            // Drop the channel once its last listener is gone.
            let mut channels = self.channels.write().unwrap();
            if let Some(tx) = channels.get(&key) {
                if tx.receiver_count() == 0 {
                    channels.remove(&key);
                }
            }
        }

        delivered
    }

    /// Number of live channels (for diagnostics).
    #[allow(dead_code)]
    pub fn channel_count(&self) -> usize {
        self.channels.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message_event() -> FeedEvent {
        FeedEvent::MessageCreated {
            message: MessageResponse {
                id: Uuid::new_v4(),
                match_id: Uuid::new_v4(),
                sender_id: Uuid::new_v4(),
                content: "see you at 6".into(),
                created_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let hub = ChannelHub::new();
        let key = ChannelKey::Match(Uuid::new_v4());

        let mut rx = hub.subscribe(key);
        assert_eq!(hub.publish(key, message_event()), 1);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, FeedEvent::MessageCreated { .. }));
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let hub = ChannelHub::new();
        let key_a = ChannelKey::Match(Uuid::new_v4());
        let key_b = ChannelKey::Match(Uuid::new_v4());

        let mut rx_a = hub.subscribe(key_a);
        let _rx_b = hub.subscribe(key_b);

        hub.publish(key_b, message_event());
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_listeners_is_dropped() {
        let hub = ChannelHub::new();
        let key = ChannelKey::Session(Uuid::new_v4());

        assert_eq!(hub.publish(key, message_event()), 0);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_prunes_channel_on_next_publish() {
        let hub = ChannelHub::new();
        let key = ChannelKey::Match(Uuid::new_v4());

        let rx = hub.subscribe(key);
        assert_eq!(hub.channel_count(), 1);
        drop(rx);

        assert_eq!(hub.publish(key, message_event()), 0);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let hub = ChannelHub::new();
        let key = ChannelKey::Match(Uuid::new_v4());
        let mut rx = hub.subscribe(key);

        let first = message_event();
        let first_id = match &first {
            FeedEvent::MessageCreated { message } => message.id,
            _ => unreachable!(),
        };
        hub.publish(key, first);
        hub.publish(key, message_event());

        match rx.recv().await.unwrap() {
            FeedEvent::MessageCreated { message } => assert_eq!(message.id, first_id),
            _ => panic!("unexpected event"),
        }
    }

    #[test]
    fn channel_key_display() {
        let id = Uuid::parse_str("11111111-2222-3333-4444-555555555555").unwrap();
        assert_eq!(
            ChannelKey::Match(id).to_string(),
            "match:11111111-2222-3333-4444-555555555555"
        );
        assert_eq!(
            ChannelKey::Session(id).to_string(),
            "session:11111111-2222-3333-4444-555555555555"
        );
    }
}
