use flume::Receiver;
use tracing::{debug, info};

use crate::dto::command::{Command, respond};
use crate::player::Player;

pub(crate) async fn main_loop(receiver: Receiver<Command>, mut player: Player) {
    while let Ok(next_command) = receiver.recv_async().await {
        debug!(room = %player.room(), "Got command {:?}", next_command);
        match next_command {
            Command::Play(track, responder) => {
                player.play(track, responder).await;
            }
            Command::Pause(responder) => {
                respond(responder, player.pause().await);
            }
            Command::Unpause(responder) => {
                respond(responder, player.unpause().await);
            }
            Command::Skip(responder) => {
                respond(responder, player.skip().await);
            }
            Command::ClearQueue(responder) => {
                respond(responder, player.clear_queue());
            }
            Command::Disconnect(responder) => {
                respond(responder, player.disconnect().await);
            }
            Command::GetStatus(responder) => {
                respond(responder, player.status());
            }
            Command::Transport(event) => {
                player.on_transport_event(event).await;
            }
            Command::Opened(result) => {
                player.on_opened(result).await;
            }
        }
        debug!(room = %player.room(), "Completed command");
    }
    info!(room = %player.room(), "Request loop completed");
    player.shutdown().await;
}
