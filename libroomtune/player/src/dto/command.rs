use derivative::Derivative;
use tokio::sync::oneshot;
use tracing::warn;

use super::outcome::{Outcome, Skipped};
use super::player_status::PlayerStatus;
use super::track::Track;
use super::transport_event::TransportEvent;
use crate::error::{PlayerError, TransportError};
use crate::transport::TransportSession;

pub(crate) type Responder<T> = oneshot::Sender<T>;

#[derive(Derivative)]
#[derivative(Debug)]
pub(crate) enum Command {
    Play(Track, Responder<Result<usize, PlayerError>>),
    Pause(Responder<Result<Outcome, PlayerError>>),
    Unpause(Responder<Result<Outcome, PlayerError>>),
    Skip(Responder<Result<Skipped, PlayerError>>),
    ClearQueue(Responder<Result<usize, PlayerError>>),
    Disconnect(Responder<Result<Outcome, PlayerError>>),
    GetStatus(Responder<PlayerStatus>),
    Transport(TransportEvent),
    /// Result of the transport open that runs outside the player loop.
    Opened(
        #[derivative(Debug = "ignore")] Result<Box<dyn TransportSession>, TransportError>,
    ),
}

pub(crate) fn respond<T>(responder: Responder<T>, response: T) {
    if responder.send(response).is_err() {
        warn!("Caller stopped waiting for the response");
    }
}
