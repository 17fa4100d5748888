//! Registry: room name → running room.
//!
//! Created once at startup and shared through the application state. All
//! mutation happens behind one lock, so a name is never bound to two rooms and
//! a room's broadcast loop starts exactly once.

use std::{
    collections::HashMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicUsize, Ordering},
    },
};

use tokio::sync::Mutex;

use super::{Member, Room, RoomConfig, RoomError};

type RoomMap = HashMap<String, Room>;

pub struct Registry {
    rooms: Arc<Mutex<RoomMap>>,
    config: RoomConfig,
    rooms_created: AtomicUsize,
}

impl Registry {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            config,
            rooms_created: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Join `member` to the room called `room_name`, creating the room if needed.
    ///
    /// Returns the handle of the room the member was handed to.
    pub async fn join(&self, room_name: &str, member: Member) -> Result<Room, RoomError> {
        let mut rooms = self.rooms.lock().await;

        let room = match rooms.get(room_name) {
            Some(room) if !room.is_closed() => room.clone(),
            _ => {
                let room = Room::spawn_with_reaper(
                    room_name,
                    &self.config,
                    Some(RoomReaper {
                        rooms: Arc::downgrade(&self.rooms),
                    }),
                );
                self.rooms_created.fetch_add(1, Ordering::Relaxed);
                tracing::info!(room = room_name, id = %room.id(), "Room created");
                rooms.insert(room_name.to_string(), room.clone());
                room
            }
        };

        // Joined under the lock so the reaper sees the reserved slot.
        room.join(member)?;
        Ok(room)
    }

    pub async fn room(&self, room_name: &str) -> Option<Room> {
        self.rooms.lock().await.get(room_name).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Number of rooms created since startup, including reaped ones.
    pub fn rooms_created(&self) -> usize {
        self.rooms_created.load(Ordering::Relaxed)
    }

    /// Remove every room and stop its broadcast loop.
    pub async fn close_all(&self) {
        let rooms: Vec<(String, Room)> = self.rooms.lock().await.drain().collect();
        for (name, room) in rooms {
            tracing::debug!(room = %name, "Closing room");
            room.close();
        }
    }
}

/// Lets an idle room remove its own registry entry.
pub(crate) struct RoomReaper {
    rooms: Weak<Mutex<RoomMap>>,
}

impl RoomReaper {
    /// Drop `room` from the registry if nobody holds or is acquiring a slot in it.
    ///
    /// Returns true when the room should stop.
    pub(crate) async fn reap(&self, room: &Room) -> bool {
        let Some(rooms) = self.rooms.upgrade() else {
            return true;
        };
        let mut rooms = rooms.lock().await;

        if room.occupancy() > 0 {
            return false;
        }
        if rooms
            .get(room.name())
            .is_some_and(|current| current.id() == room.id())
        {
            rooms.remove(room.name());
            tracing::info!(room = %room.name(), id = %room.id(), "Idle room reaped");
        }
        true
    }
}
