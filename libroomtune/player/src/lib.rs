mod dto;
mod error;
mod event_loop;
mod inbox;
mod player;
mod registry;
mod resolver;
mod settings;
mod source;
mod transport;

pub mod roomtune_player {
    use std::sync::Arc;

    use tokio::sync::broadcast;
    use tracing::info;

    use crate::dto::command::Command;
    pub use crate::dto::outcome::{Outcome, Skipped};
    pub use crate::dto::player_event::PlayerEvent;
    pub use crate::dto::player_state::PlayerState;
    pub use crate::dto::player_status::PlayerStatus;
    pub use crate::dto::room::RoomId;
    pub use crate::dto::track::{AudioSource, Track};
    pub use crate::dto::transport_event::{PlaybackId, TransportEvent};
    pub use crate::error::{PlayerError, TransportError};
    use crate::event_loop::main_loop;
    use crate::inbox::{InboxSender, inbox};
    use crate::player::Player;
    pub use crate::registry::PlayerRegistry;
    pub use crate::resolver::YtDlpSource;
    pub use crate::settings::Settings;
    pub use crate::source::{SourceError, TrackSource};
    pub use crate::transport::{
        PlaybackTransport, SimulatedSettings, SimulatedTransport, TransportEvents,
        TransportSession,
    };

    /// Handle to the player of one room. Cloning is cheap and every clone talks to the same
    /// player task; the task stops once the last handle is dropped.
    #[derive(Clone, Debug)]
    pub struct RoomPlayer {
        room: RoomId,
        cmd_sender: InboxSender,
        event_tx: broadcast::Sender<PlayerEvent>,
    }

    impl RoomPlayer {
        /// Spawns the player task for `room`. No transport session is opened until the first
        /// track is played.
        pub fn new(room: RoomId, transport: Arc<dyn PlaybackTransport>, settings: &Settings) -> Self {
            let (event_tx, _) = broadcast::channel(settings.event_capacity.max(1));
            let (cmd_sender, cmd_rx) = inbox();
            let events = TransportEvents::new(room.clone(), cmd_sender.downgrade());
            let player = Player::new(room.clone(), transport, events, event_tx.clone());

            info!(%room, "Starting player");
            tokio::spawn(main_loop(cmd_rx, player));

            Self {
                room,
                cmd_sender,
                event_tx,
            }
        }

        pub fn room(&self) -> &RoomId {
            &self.room
        }

        pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
            self.event_tx.subscribe()
        }

        /// Starts `track` if nothing is playing and returns `0`, otherwise queues it and returns
        /// its 1-based position behind the current track. The first play opens the transport
        /// without holding up the player, so other requests are answered meanwhile and tracks
        /// played in the meantime are queued behind it.
        pub async fn play(&self, track: Track) -> Result<usize, PlayerError> {
            self.cmd_sender
                .request(|tx| Command::Play(track, tx))
                .await?
        }

        pub async fn pause(&self) -> Result<Outcome, PlayerError> {
            self.cmd_sender.request(Command::Pause).await?
        }

        pub async fn unpause(&self) -> Result<Outcome, PlayerError> {
            self.cmd_sender.request(Command::Unpause).await?
        }

        pub async fn skip(&self) -> Result<Outcome, PlayerError> {
            Ok(self.skip_to_next().await?.outcome)
        }

        /// Like [`RoomPlayer::skip`], but also reports the track that took over.
        pub async fn skip_to_next(&self) -> Result<Skipped, PlayerError> {
            self.cmd_sender.request(Command::Skip).await?
        }

        /// Empties the queue and returns how many tracks were removed. The current track keeps
        /// playing.
        pub async fn clear_queue(&self) -> Result<usize, PlayerError> {
            self.cmd_sender.request(Command::ClearQueue).await?
        }

        pub async fn disconnect(&self) -> Result<Outcome, PlayerError> {
            self.cmd_sender.request(Command::Disconnect).await?
        }

        pub async fn status(&self) -> Result<PlayerStatus, PlayerError> {
            self.cmd_sender.request(Command::GetStatus).await
        }

        pub async fn state(&self) -> Result<PlayerState, PlayerError> {
            Ok(self.status().await?.state)
        }

        pub fn is_closed(&self) -> bool {
            self.cmd_sender.is_closed()
        }

        /// Whether both handles talk to the same player task. A room that was disconnected and
        /// re-joined gets a new player, so a handle kept from before compares unequal.
        pub fn same_player(&self, other: &RoomPlayer) -> bool {
            self.cmd_sender.same_inbox(&other.cmd_sender)
        }
    }
}

#[cfg(test)]
mod test_transport;
