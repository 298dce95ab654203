use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use derivative::Derivative;
use futures::future::join_all;
use tap::{TapFallible, TapOptional};
use tracing::{info, warn};

use crate::dto::outcome::Outcome;
use crate::dto::room::RoomId;
use crate::error::PlayerError;
use crate::roomtune_player::RoomPlayer;
use crate::settings::Settings;
use crate::transport::PlaybackTransport;

/// Process-wide mapping of rooms to their players. Build one at startup and share it with
/// whatever handles commands.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PlayerRegistry {
    players: Mutex<HashMap<RoomId, RoomPlayer>>,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn PlaybackTransport>,
    settings: Settings,
}

impl PlayerRegistry {
    pub fn new(transport: Arc<dyn PlaybackTransport>, settings: Settings) -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
            transport,
            settings,
        }
    }

    fn players(&self) -> MutexGuard<'_, HashMap<RoomId, RoomPlayer>> {
        // The map is only ever touched by short, non-panicking sections
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the player for `room`, creating an idle one if the room has none yet. Concurrent
    /// callers always observe the same player.
    pub fn get(&self, room: &RoomId) -> RoomPlayer {
        self.players()
            .entry(room.clone())
            .or_insert_with(|| {
                info!(%room, "Creating player");
                RoomPlayer::new(room.clone(), self.transport.clone(), &self.settings)
            })
            .clone()
    }

    pub fn find(&self, room: &RoomId) -> Option<RoomPlayer> {
        self.players().get(room).cloned()
    }

    pub fn remove(&self, room: &RoomId) -> Option<RoomPlayer> {
        self.players()
            .remove(room)
            .tap_some(|_| info!(%room, "Removed player"))
    }

    /// Removes `player` from its room, unless the room already moved on to another player.
    pub fn remove_player(&self, player: &RoomPlayer) -> bool {
        let mut players = self.players();
        let room = player.room();
        if players
            .get(room)
            .is_some_and(|current| current.same_player(player))
        {
            players.remove(room);
            info!(%room, "Removed player");
            return true;
        }
        false
    }

    /// Drops the room's entry and tears down its player. The next [`get`](Self::get) creates a
    /// fresh player.
    pub async fn disconnect(&self, room: &RoomId) -> Result<Outcome, PlayerError> {
        match self.remove(room) {
            Some(player) => player.disconnect().await,
            None => Ok(Outcome::NoOp),
        }
    }

    pub fn rooms(&self) -> Vec<RoomId> {
        let mut rooms: Vec<_> = self.players().keys().cloned().collect();
        rooms.sort();
        rooms
    }

    pub fn len(&self) -> usize {
        self.players().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players().is_empty()
    }

    /// Disconnects every room.
    pub async fn shutdown(&self) {
        let players: Vec<_> = self.players().drain().map(|(_, player)| player).collect();
        info!("Disconnecting {} players", players.len());
        join_all(players.iter().map(|player| async move {
            player
                .disconnect()
                .await
                .tap_err(|e| warn!(room = %player.room(), "Error disconnecting: {e}"))
                .ok();
        }))
        .await;
    }
}

#[cfg(test)]
#[path = "./registry_test.rs"]
mod registry_test;
