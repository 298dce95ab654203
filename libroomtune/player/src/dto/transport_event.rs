use std::fmt;

use strum::Display;

/// Sequence number the player attaches to every track it hands to the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PlaybackId(pub(crate) u64);

impl PlaybackId {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum TransportEvent {
    TrackEnded(PlaybackId),
    PlaybackStarted(PlaybackId),
    PlaybackPaused(PlaybackId),
    TransportLost,
    TransportError(String),
}

impl TransportEvent {
    pub(crate) fn playback_id(&self) -> Option<PlaybackId> {
        match self {
            Self::TrackEnded(id) | Self::PlaybackStarted(id) | Self::PlaybackPaused(id) => {
                Some(*id)
            }
            Self::TransportLost | Self::TransportError(_) => None,
        }
    }
}
