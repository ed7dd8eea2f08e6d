//! Room-scoped update broadcast.
//!
//! Every successful player action publishes a minimal "update occurred"
//! notification to the channel of its session. The real-time transport layer
//! (outside this service) subscribes per session and fans the signal out to
//! connected clients.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of one session's update channel; slow subscribers lag, they do
/// not block publishers.
const CHANNEL_CAPACITY: usize = 64;

/// One published update notification.
#[derive(Debug, Clone, Serialize)]
pub struct GameUpdate {
    /// The session the update belongs to.
    pub game_id: Uuid,
    /// Label of the action that caused the update.
    pub action: &'static str,
}

/// Publish/subscribe hub keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct UpdateBroadcaster {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<GameUpdate>>>>,
}

impl UpdateBroadcaster {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one session's updates.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<GameUpdate> {
        self.channels
            .lock()
            .unwrap()
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publishes an update for one session. A session without subscribers
    /// drops the notification.
    pub fn publish(&self, game_id: Uuid, action: &'static str) {
        let sender = self
            .channels
            .lock()
            .ok()
            .and_then(|channels| channels.get(&game_id).cloned());
        if let Some(sender) = sender {
            // A send error only means nobody is listening right now.
            let _ = sender.send(GameUpdate { game_id, action });
        }
    }
}
