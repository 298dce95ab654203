use strum::Display;

use super::track::Track;

#[derive(Clone, Debug, Display)]
pub enum PlayerEvent {
    TrackStarted(Track),
    QueueUpdated(usize),
    Paused,
    Resumed,
    QueueEnded,
    Disconnected,
    Errored(String),
}
