use async_trait::async_trait;
use eyre::Result;
use libroomtune_player::roomtune_player::{PlayerState, RoomId};

use super::{BotCommand, CommandContext, CommandInfo, answer};
use crate::reply::Reply;

pub(super) const NOW_PLAYING_INFO: CommandInfo = CommandInfo {
    name: "now-playing",
    aliases: &["np"],
    usage: "now-playing",
    description: "Show the current playing song",
};

pub(super) const QUEUE_INFO: CommandInfo = CommandInfo {
    name: "queue",
    aliases: &[],
    usage: "queue",
    description: "Show the current song and everything queued after it",
};

pub(super) struct NowPlayingCommand;

#[async_trait]
impl BotCommand for NowPlayingCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        answer(player.status().await.map(|status| {
            match (status.state, status.current_track) {
                (PlayerState::Paused, Some(track)) => {
                    Reply::new("Now Playing", format!("Now playing {track} (paused)"))
                }
                (_, Some(track)) => Reply::now_playing(&track),
                (_, None) => Reply::nothing_playing(),
            }
        }))
    }
}

pub(super) struct QueueCommand;

#[async_trait]
impl BotCommand for QueueCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        answer(player.status().await.map(|status| Reply::queue(&status)))
    }
}
