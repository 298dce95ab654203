use std::collections::VecDeque;
use std::sync::Arc;

use derivative::Derivative;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dto::command::{Responder, respond};
use crate::dto::outcome::{Outcome, Skipped};
use crate::dto::player_event::PlayerEvent;
use crate::dto::player_state::PlayerState;
use crate::dto::player_status::PlayerStatus;
use crate::dto::room::RoomId;
use crate::dto::track::Track;
use crate::dto::transport_event::{PlaybackId, TransportEvent};
use crate::error::{PlayerError, TransportError};
use crate::transport::{PlaybackTransport, TransportEvents, TransportSession};

#[derive(Debug)]
struct CurrentTrack {
    playback: PlaybackId,
    track: Track,
}

/// A transport open running outside the player loop, with the play that asked for it.
#[derive(Debug)]
struct Connecting {
    track: Track,
    responder: Responder<Result<usize, PlayerError>>,
    cancel: CancellationToken,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub(crate) struct Player {
    room: RoomId,
    state: PlayerState,
    queue: VecDeque<Track>,
    current: Option<CurrentTrack>,
    last_playback: PlaybackId,
    connecting: Option<Connecting>,
    #[derivative(Debug = "ignore")]
    session: Option<Box<dyn TransportSession>>,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn PlaybackTransport>,
    events: TransportEvents,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Player {
    pub(crate) fn new(
        room: RoomId,
        transport: Arc<dyn PlaybackTransport>,
        events: TransportEvents,
        event_tx: broadcast::Sender<PlayerEvent>,
    ) -> Self {
        Self {
            room,
            state: PlayerState::Idle,
            queue: VecDeque::new(),
            current: None,
            last_playback: PlaybackId::default(),
            connecting: None,
            session: None,
            transport,
            events,
            event_tx,
        }
    }

    pub(crate) fn room(&self) -> &RoomId {
        &self.room
    }

    fn ensure_active(&self) -> Result<(), PlayerError> {
        if self.state.is_terminal() {
            warn!(room = %self.room, "Rejecting command, player is {}", self.state);
            return Err(PlayerError::InvalidState(self.state));
        }
        Ok(())
    }

    fn publish(&self, event: PlayerEvent) {
        self.event_tx.send(event).unwrap_or_default();
    }

    /// Answers with `0` once the track started, or with its queue position. Opening the
    /// transport happens off the loop, so the answer for the first track comes from
    /// [`Player::on_opened`].
    pub(crate) async fn play(
        &mut self,
        track: Track,
        responder: Responder<Result<usize, PlayerError>>,
    ) {
        if let Err(e) = self.ensure_active() {
            respond(responder, Err(e));
            return;
        }

        if self.state != PlayerState::Idle || self.connecting.is_some() {
            self.queue.push_back(track);
            let position = self.queue.len();
            info!(room = %self.room, "Queued track at position {position}");
            self.publish(PlayerEvent::QueueUpdated(position));
            respond(responder, Ok(position));
            return;
        }

        if self.session.is_none() {
            self.connect(track, responder);
            return;
        }

        respond(responder, self.start(track).await.map(|_| 0));
    }

    fn connect(&mut self, track: Track, responder: Responder<Result<usize, PlayerError>>) {
        info!(room = %self.room, "Opening transport session");
        let cancel = CancellationToken::new();
        let transport = self.transport.clone();
        let room = self.room.clone();
        let events = self.events.clone();
        let cancelled = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = transport.open(&room, events.clone()) => {
                    events.opened(result);
                }
                _ = cancelled.cancelled() => {
                    info!(%room, "Abandoned transport open");
                }
            }
        });
        self.connecting = Some(Connecting {
            track,
            responder,
            cancel,
        });
    }

    pub(crate) async fn on_opened(
        &mut self,
        result: Result<Box<dyn TransportSession>, TransportError>,
    ) {
        let Some(Connecting {
            track, responder, ..
        }) = self.connecting.take()
        else {
            // The player was torn down while the open was in flight
            if let Ok(mut session) = result {
                info!(room = %self.room, "Closing session opened after teardown");
                if let Err(e) = session.close().await {
                    warn!(room = %self.room, "Error closing session: {e}");
                }
            }
            return;
        };

        match result {
            Ok(session) => {
                self.session = Some(session);
                respond(responder, self.start(track).await.map(|_| 0));
            }
            Err(e) => {
                self.fail(e.to_string()).await;
                respond(responder, Err(PlayerError::Connection(e)));
            }
        }
    }

    pub(crate) async fn pause(&mut self) -> Result<Outcome, PlayerError> {
        self.ensure_active()?;
        if self.state != PlayerState::Playing {
            return Ok(Outcome::NoOp);
        }

        let result = match self.session.as_mut() {
            Some(session) => session.pause().await,
            None => Err(TransportError::Closed),
        };
        self.check_session(result).await?;
        Ok(Outcome::Applied)
    }

    pub(crate) async fn unpause(&mut self) -> Result<Outcome, PlayerError> {
        self.ensure_active()?;
        if self.state != PlayerState::Paused {
            return Ok(Outcome::NoOp);
        }

        let result = match self.session.as_mut() {
            Some(session) => session.resume().await,
            None => Err(TransportError::Closed),
        };
        self.check_session(result).await?;
        Ok(Outcome::Applied)
    }

    pub(crate) async fn skip(&mut self) -> Result<Skipped, PlayerError> {
        self.ensure_active()?;
        if !self.state.has_current_track() {
            return Ok(Skipped::noop());
        }

        let next = match self.queue.pop_front() {
            Some(next) => {
                info!(room = %self.room, "Skipping to {next}");
                self.start(next.clone()).await?;
                Some(next)
            }
            None => {
                info!(room = %self.room, "Skipping last track, stopping playback");
                let result = match self.session.as_mut() {
                    Some(session) => session.stop().await,
                    None => Err(TransportError::Closed),
                };
                self.check_session(result).await?;
                self.finish_queue();
                None
            }
        };
        Ok(Skipped {
            outcome: Outcome::Applied,
            next,
        })
    }

    pub(crate) fn clear_queue(&mut self) -> Result<usize, PlayerError> {
        self.ensure_active()?;
        let removed = self.queue.len();
        self.queue.clear();
        if removed > 0 {
            info!(room = %self.room, "Cleared {removed} queued tracks");
            self.publish(PlayerEvent::QueueUpdated(0));
        }
        Ok(removed)
    }

    pub(crate) async fn disconnect(&mut self) -> Result<Outcome, PlayerError> {
        if self.state == PlayerState::Disconnected {
            return Ok(Outcome::NoOp);
        }
        info!(room = %self.room, "Disconnecting");
        self.close_session().await;
        self.teardown(PlayerState::Disconnected);
        self.publish(PlayerEvent::Disconnected);
        Ok(Outcome::Applied)
    }

    pub(crate) fn status(&self) -> PlayerStatus {
        PlayerStatus {
            state: self.state,
            current_track: self.current.as_ref().map(|current| current.track.clone()),
            queue: self.queue.iter().cloned().collect(),
        }
    }

    pub(crate) async fn on_transport_event(&mut self, event: TransportEvent) {
        if self.state.is_terminal() {
            debug!(room = %self.room, "Ignoring {event:?}, player is {}", self.state);
            return;
        }
        if let Some(playback) = event.playback_id() {
            let current = self.current.as_ref().map(|current| current.playback);
            if current != Some(playback) {
                debug!(
                    room = %self.room,
                    "Ignoring stale {event:?}, current playback is {current:?}"
                );
                return;
            }
        }

        match event {
            TransportEvent::TrackEnded(_) => self.on_ended().await,
            TransportEvent::PlaybackStarted(_) => {
                if self.state == PlayerState::Paused {
                    self.state = PlayerState::Playing;
                    self.publish(PlayerEvent::Resumed);
                }
            }
            TransportEvent::PlaybackPaused(_) => {
                if self.state == PlayerState::Playing {
                    self.state = PlayerState::Paused;
                    self.publish(PlayerEvent::Paused);
                }
            }
            TransportEvent::TransportLost => {
                warn!(room = %self.room, "Transport lost");
                // The connection is already gone, there is nothing left to close
                self.session = None;
                self.teardown(PlayerState::Disconnected);
                self.publish(PlayerEvent::Disconnected);
            }
            TransportEvent::TransportError(cause) => {
                error!(room = %self.room, "Transport error: {cause}");
                self.fail(cause).await;
            }
        }
    }

    async fn on_ended(&mut self) {
        if let Some(ended) = self.current.take() {
            info!(room = %self.room, "Finished {}", ended.track);
        }
        match self.queue.pop_front() {
            Some(next) => {
                if let Err(e) = self.start(next).await {
                    error!(room = %self.room, "Error starting next track: {e}");
                }
            }
            None => self.finish_queue(),
        }
    }

    /// Stops the player task from outliving its connection.
    pub(crate) async fn shutdown(&mut self) {
        if let Some(connecting) = self.connecting.take() {
            connecting.cancel.cancel();
        }
        if self.session.is_some() {
            info!(room = %self.room, "Closing session of abandoned player");
            self.close_session().await;
        }
    }

    async fn start(&mut self, track: Track) -> Result<(), PlayerError> {
        let playback = self.last_playback.next();
        self.last_playback = playback;

        let result = match self.session.as_mut() {
            Some(session) => session.play(&track, playback).await,
            None => Err(TransportError::Closed),
        };
        self.check_session(result).await?;

        info!(room = %self.room, "Now playing {track} ({playback})");
        self.current = Some(CurrentTrack {
            playback,
            track: track.clone(),
        });
        self.state = PlayerState::Playing;
        self.publish(PlayerEvent::TrackStarted(track));
        Ok(())
    }

    fn finish_queue(&mut self) {
        self.current = None;
        self.state = PlayerState::Idle;
        info!(room = %self.room, "Queue ended");
        self.publish(PlayerEvent::QueueEnded);
    }

    async fn check_session(&mut self, result: Result<(), TransportError>) -> Result<(), PlayerError> {
        if let Err(e) = result {
            error!(room = %self.room, "Transport call failed: {e}");
            self.fail(e.to_string()).await;
            return Err(PlayerError::Transport(e));
        }
        Ok(())
    }

    async fn fail(&mut self, cause: String) {
        self.close_session().await;
        self.teardown(PlayerState::Error);
        self.publish(PlayerEvent::Errored(cause));
    }

    async fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!(room = %self.room, "Error closing session: {e}");
            }
        }
    }

    fn teardown(&mut self, state: PlayerState) {
        if let Some(connecting) = self.connecting.take() {
            info!(room = %self.room, "Cancelling transport open");
            connecting.cancel.cancel();
            respond(connecting.responder, Err(PlayerError::InvalidState(state)));
        }
        self.queue.clear();
        self.current = None;
        self.state = state;
    }
}
