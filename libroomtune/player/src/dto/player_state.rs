use strum::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
    Paused,
    Disconnected,
    Error,
}

impl PlayerState {
    /// A terminal instance never leaves its state again; the room needs a new player.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }

    pub fn has_current_track(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}
