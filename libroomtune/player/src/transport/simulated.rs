use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{PlaybackTransport, TransportEvents, TransportSession};
use crate::dto::room::RoomId;
use crate::dto::track::Track;
use crate::dto::transport_event::{PlaybackId, TransportEvent};
use crate::error::TransportError;

#[derive(Clone, Debug)]
pub struct SimulatedSettings {
    /// Playback speed multiplier. `2.0` finishes a three minute track in 90 seconds.
    pub speed: f64,
    /// Length assumed for tracks without a known duration, such as live streams.
    pub default_duration: Duration,
}

impl Default for SimulatedSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            default_duration: Duration::from_secs(180),
        }
    }
}

/// Transport that renders nothing and only keeps time. Each track "plays" for its duration and
/// then reports [`TransportEvent::TrackEnded`], which is enough to drive the room players without
/// a voice backend.
#[derive(Clone, Debug, Default)]
pub struct SimulatedTransport {
    settings: SimulatedSettings,
}

impl SimulatedTransport {
    pub fn new(settings: SimulatedSettings) -> Self {
        Self { settings }
    }

    fn playback_length(&self, track: &Track) -> Duration {
        let length = track.duration.unwrap_or(self.settings.default_duration);
        let speed = if self.settings.speed > 0.0 {
            self.settings.speed
        } else {
            1.0
        };
        length.div_f64(speed)
    }
}

#[async_trait]
impl PlaybackTransport for SimulatedTransport {
    async fn open(
        &self,
        room: &RoomId,
        events: TransportEvents,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        info!(%room, "Opening simulated session");
        Ok(Box::new(SimulatedSession {
            transport: self.clone(),
            events,
            active: None,
            closed: false,
        }))
    }
}

#[derive(Debug)]
struct ActivePlayback {
    id: PlaybackId,
    remaining: Duration,
    resumed_at: Option<Instant>,
    cancel: CancellationToken,
}

impl ActivePlayback {
    fn is_running(&self) -> bool {
        self.resumed_at.is_some()
    }
}

#[derive(Debug)]
struct SimulatedSession {
    transport: SimulatedTransport,
    events: TransportEvents,
    active: Option<ActivePlayback>,
    closed: bool,
}

impl SimulatedSession {
    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.closed {
            Err(TransportError::Closed)
        } else {
            Ok(())
        }
    }

    fn start_timer(&self, id: PlaybackId, remaining: Duration) -> CancellationToken {
        let cancel = CancellationToken::new();
        let cancelled = cancel.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(remaining) => {
                    debug!(room = %events.room(), "Playback {id} finished");
                    events.send(TransportEvent::TrackEnded(id));
                }
                _ = cancelled.cancelled() => {}
            }
        });
        cancel
    }

    fn halt(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

#[async_trait]
impl TransportSession for SimulatedSession {
    async fn play(&mut self, track: &Track, playback: PlaybackId) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.halt();
        let remaining = self.transport.playback_length(track);
        info!(
            room = %self.events.room(),
            "Playing {track} as {playback}, simulated length {remaining:?}"
        );
        self.active = Some(ActivePlayback {
            id: playback,
            remaining,
            resumed_at: Some(Instant::now()),
            cancel: self.start_timer(playback, remaining),
        });
        self.events.send(TransportEvent::PlaybackStarted(playback));
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), TransportError> {
        self.ensure_open()?;
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if let Some(resumed_at) = active.resumed_at.take() {
            active.cancel.cancel();
            active.remaining = active.remaining.saturating_sub(resumed_at.elapsed());
            self.events
                .send(TransportEvent::PlaybackPaused(active.id));
        }
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), TransportError> {
        self.ensure_open()?;
        let Some((id, remaining)) = self
            .active
            .as_ref()
            .filter(|active| !active.is_running())
            .map(|active| (active.id, active.remaining))
        else {
            return Ok(());
        };
        let cancel = self.start_timer(id, remaining);
        if let Some(active) = self.active.as_mut() {
            active.resumed_at = Some(Instant::now());
            active.cancel = cancel;
        }
        self.events.send(TransportEvent::PlaybackStarted(id));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.halt();
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.halt();
        self.closed = true;
        info!(room = %self.events.room(), "Closed simulated session");
        Ok(())
    }
}

impl Drop for SimulatedSession {
    fn drop(&mut self) {
        self.halt();
    }
}
