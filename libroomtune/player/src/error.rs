use thiserror::Error;

use crate::dto::player_state::PlayerState;
use crate::dto::room::RoomId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Unable to connect to room {room}: {reason}")]
    Connection { room: RoomId, reason: String },
    #[error("Transport session failed: {0}")]
    Session(String),
    #[error("Transport session is closed")]
    Closed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Player is {0} and no longer accepts commands")]
    InvalidState(PlayerState),
    #[error("Connection error: {0}")]
    Connection(TransportError),
    #[error("Transport error: {0}")]
    Transport(TransportError),
    #[error("Player task is no longer running")]
    Closed,
}
