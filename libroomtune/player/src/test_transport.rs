use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::dto::room::RoomId;
use crate::dto::track::{AudioSource, Track};
use crate::dto::transport_event::{PlaybackId, TransportEvent};
use crate::error::TransportError;
use crate::transport::{PlaybackTransport, TransportEvents, TransportSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Open(RoomId),
    Play(String, PlaybackId),
    Pause,
    Resume,
    Stop,
    Close,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    events: Option<TransportEvents>,
    fail_open: bool,
    fail_play: bool,
    hold_open: Option<Arc<Notify>>,
}

/// Transport that records every call and only emits the events a test asks for.
#[derive(Clone, Default)]
pub(crate) struct ManualTransport {
    recorder: Arc<Mutex<Recorder>>,
}

impl ManualTransport {
    pub(crate) fn failing_open() -> Self {
        let transport = Self::default();
        transport.recorder.lock().unwrap().fail_open = true;
        transport
    }

    pub(crate) fn failing_play() -> Self {
        let transport = Self::default();
        transport.recorder.lock().unwrap().fail_play = true;
        transport
    }

    /// `open` does not return until [`ManualTransport::release_open`] is called.
    pub(crate) fn held_open() -> Self {
        let transport = Self::default();
        transport.recorder.lock().unwrap().hold_open = Some(Arc::new(Notify::new()));
        transport
    }

    pub(crate) fn release_open(&self) {
        let recorder = self.recorder.lock().unwrap();
        recorder.hold_open.as_ref().expect("open is not held").notify_one();
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.recorder.lock().unwrap().calls.clone()
    }

    pub(crate) fn open_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Open(_)))
            .count()
    }

    pub(crate) fn last_playback(&self) -> PlaybackId {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::Play(_, id) => Some(*id),
                _ => None,
            })
            .expect("nothing was played")
    }

    pub(crate) fn emit(&self, event: TransportEvent) -> bool {
        let events = self.recorder.lock().unwrap().events.clone();
        events.expect("transport was never opened").send(event)
    }

    fn record(&self, call: Call) {
        self.recorder.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl PlaybackTransport for ManualTransport {
    async fn open(
        &self,
        room: &RoomId,
        events: TransportEvents,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        self.record(Call::Open(room.clone()));
        let hold = self.recorder.lock().unwrap().hold_open.clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let mut recorder = self.recorder.lock().unwrap();
        if recorder.fail_open {
            return Err(TransportError::Connection {
                room: room.clone(),
                reason: "refused".to_owned(),
            });
        }
        recorder.events = Some(events);
        Ok(Box::new(ManualSession {
            transport: self.clone(),
        }))
    }
}

struct ManualSession {
    transport: ManualTransport,
}

#[async_trait]
impl TransportSession for ManualSession {
    async fn play(&mut self, track: &Track, playback: PlaybackId) -> Result<(), TransportError> {
        self.transport
            .record(Call::Play(track.title.clone(), playback));
        if self.transport.recorder.lock().unwrap().fail_play {
            return Err(TransportError::Session("encoder crashed".to_owned()));
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), TransportError> {
        self.transport.record(Call::Pause);
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), TransportError> {
        self.transport.record(Call::Resume);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        self.transport.record(Call::Stop);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.transport.record(Call::Close);
        Ok(())
    }
}

pub(crate) fn track(title: &str) -> Track {
    Track::new(
        title,
        format!("https://example.com/{title}"),
        AudioSource::Remote(format!("https://cdn.example.com/{title}.m4a")),
    )
}
