//! Room registry: maps room keys to running room actors.

use std::collections::HashMap;

use noughts_protocol::RoomKey;
use tokio::sync::Mutex;

use crate::actor::spawn_room;
use crate::{RoomConfig, RoomHandle};

/// Owns every room for the life of the process.
///
/// Built once by the server and shared through an `Arc`. The map lock is
/// held only for lookup and insert; room operations run on the room's own
/// actor, so rooms never wait on each other.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomKey, RoomHandle>>,
    config: RoomConfig,
}

impl RoomRegistry {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Returns the room for `key`, spawning it on first use.
    ///
    /// Concurrent callers with the same key always get handles to the same
    /// room.
    pub async fn get_or_create(&self, key: &RoomKey) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.get(key) {
            return handle.clone();
        }

        let handle = spawn_room(key.clone(), self.config.channel_size);
        rooms.insert(key.clone(), handle.clone());
        tracing::info!(room = %key, rooms = rooms.len(), "room created");
        handle
    }

    /// Returns the room for `key` without creating it.
    pub async fn get(&self, key: &RoomKey) -> Option<RoomHandle> {
        self.rooms.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    pub async fn keys(&self) -> Vec<RoomKey> {
        self.rooms.lock().await.keys().cloned().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
