mod simulated;

use std::fmt::Debug;

use async_trait::async_trait;
use flume::WeakSender;
pub use simulated::*;
use tracing::debug;

use crate::dto::command::Command;
use crate::dto::room::RoomId;
use crate::dto::track::Track;
use crate::dto::transport_event::{PlaybackId, TransportEvent};
use crate::error::TransportError;

/// Opens the audio connection for a room.
#[async_trait]
pub trait PlaybackTransport: Send + Sync + 'static {
    /// Connects to `room`. Lifecycle events of the returned session must be reported through
    /// `events`.
    async fn open(
        &self,
        room: &RoomId,
        events: TransportEvents,
    ) -> Result<Box<dyn TransportSession>, TransportError>;
}

/// A live room connection, exclusively owned by the room's player.
///
/// `play` replaces whatever is currently playing. Neither `play` nor `stop` report
/// [`TransportEvent::TrackEnded`] for the track they interrupt; that event is reserved for tracks
/// that ran to completion.
#[async_trait]
pub trait TransportSession: Send {
    async fn play(&mut self, track: &Track, playback: PlaybackId) -> Result<(), TransportError>;
    async fn pause(&mut self) -> Result<(), TransportError>;
    async fn resume(&mut self) -> Result<(), TransportError>;
    async fn stop(&mut self) -> Result<(), TransportError>;
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Delivers lifecycle events into the inbox of the player that opened the session.
#[derive(Clone)]
pub struct TransportEvents {
    room: RoomId,
    tx: WeakSender<Command>,
}

impl TransportEvents {
    pub(crate) fn new(room: RoomId, tx: WeakSender<Command>) -> Self {
        Self { room, tx }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Returns `false` once the player is gone.
    pub fn send(&self, event: TransportEvent) -> bool {
        let Some(tx) = self.tx.upgrade() else {
            debug!(room = %self.room, "Dropping {event:?}, player is gone");
            return false;
        };
        tx.send(Command::Transport(event)).is_ok()
    }

    /// Hands the result of [`PlaybackTransport::open`] back to the player.
    pub(crate) fn opened(&self, result: Result<Box<dyn TransportSession>, TransportError>) -> bool {
        let Some(tx) = self.tx.upgrade() else {
            debug!(room = %self.room, "Dropping opened session, player is gone");
            return false;
        };
        tx.send(Command::Opened(result)).is_ok()
    }
}

impl Debug for TransportEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportEvents")
            .field("room", &self.room)
            .finish_non_exhaustive()
    }
}
