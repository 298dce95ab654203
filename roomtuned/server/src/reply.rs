use std::fmt;

use libroomtune_player::roomtune_player::{
    PlayerError, PlayerEvent, PlayerState, PlayerStatus, SourceError, Track,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Error,
}

/// A chat message: a short title line and a description, rendered however the chat adapter
/// likes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub tone: Tone,
    pub title: String,
    pub description: String,
}

impl Reply {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone: Tone::Normal,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }

    pub fn nothing_playing() -> Self {
        Self::new(
            "Nothing is Playing!",
            "Songs must be playing to use that command. The queue is currently empty! Add songs \
             using the play command.",
        )
    }

    pub fn now_playing(track: &Track) -> Self {
        Self::new("Now Playing", format!("Now playing {track}"))
    }

    pub fn queued(track: &Track, position: usize) -> Self {
        Self::new(format!("Adding the song to queue #{position}"), track.to_string())
    }

    pub fn paused() -> Self {
        Self::new("Paused", "The current song has been paused.")
    }

    pub fn resumed() -> Self {
        Self::new("Resumed", "The current song has been resumed.")
    }

    pub fn skipped(next: Option<&Track>) -> Self {
        match next {
            Some(track) => Self::new(
                "Skipped the song to the next one in queue",
                format!("Now playing {track}"),
            ),
            None => Self::new("Skipped", "That was the last song, the queue is now empty."),
        }
    }

    pub fn cleared(removed: usize) -> Self {
        let songs = if removed == 1 { "song" } else { "songs" };
        Self::new(
            "Cleared",
            format!("Removed {removed} {songs} from the queue and stopped playback."),
        )
    }

    pub fn queue(status: &PlayerStatus) -> Self {
        let Some(current) = status.current_track.as_ref() else {
            return Self::nothing_playing();
        };
        let mut description = format!("Now playing {current}");
        if status.state == PlayerState::Paused {
            description.push_str(" (paused)");
        }
        if status.queue.is_empty() {
            description.push_str("\nNothing queued.");
        }
        for (i, track) in status.queue.iter().enumerate() {
            description.push_str(&format!("\n{}. {track}", i + 1));
        }
        Self::new("Queue", description)
    }

    pub fn left() -> Self {
        Self::new("Disconnected", "Left the room and dropped the queue.")
    }

    pub fn not_connected() -> Self {
        Self::new("Not Connected", "The bot is not in this room.")
    }

    pub fn player_error(error: &PlayerError) -> Self {
        match error {
            PlayerError::InvalidState(PlayerState::Disconnected) => Self::error(
                "Disconnected",
                "The bot left this room. Use the play command to bring it back.",
            ),
            PlayerError::InvalidState(state) => Self::error(
                "Player Unavailable",
                format!("The player is in the {state} state. Use the play command to re-join."),
            ),
            PlayerError::Connection(e) => Self::error("Unable to Join", e.to_string()),
            PlayerError::Transport(e) => Self::error("Playback Failed", e.to_string()),
            PlayerError::Closed => Self::error("Player Unavailable", error.to_string()),
        }
    }

    pub fn source_error(error: &SourceError) -> Self {
        let title = match error {
            SourceError::NoResultsFound(_) => "No Results",
            SourceError::InvalidReference(_) => "Invalid Link",
            SourceError::Download(_) => "Download Failed",
        };
        Self::error(title, error.to_string())
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::error(
            "Unknown Command",
            format!("There is no command named {name:?}. Try help."),
        )
    }

    pub fn failed() -> Self {
        Self::error("Something Went Wrong", "Could not execute this command.")
    }

    /// Announcement for a player event that happened without a command asking for it.
    /// Events that always answer a command are not announced.
    pub fn announcement(event: &PlayerEvent) -> Option<Self> {
        match event {
            PlayerEvent::TrackStarted(track) => Some(Self::now_playing(track)),
            PlayerEvent::QueueEnded => Some(Self::new(
                "Queue Ended",
                "Add more songs using the play command.",
            )),
            PlayerEvent::Disconnected => Some(Self::new("Disconnected", "Left the room.")),
            PlayerEvent::Errored(cause) => Some(Self::error("Playback Stopped", cause.clone())),
            PlayerEvent::QueueUpdated(_) | PlayerEvent::Paused | PlayerEvent::Resumed => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.tone {
            Tone::Normal => "*",
            Tone::Error => "!",
        };
        write!(f, "{marker} {}", self.title)?;
        for line in self.description.lines() {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./reply_test.rs"]
mod reply_test;
