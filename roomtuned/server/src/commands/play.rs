use async_trait::async_trait;
use eyre::Result;
use libroomtune_player::roomtune_player::RoomId;
use tracing::warn;

use super::{BotCommand, CommandContext, CommandInfo, answer};
use crate::reply::Reply;

pub(super) const INFO: CommandInfo = CommandInfo {
    name: "play",
    aliases: &[],
    usage: "play <song name or url>",
    description: "Give the song name or URL to start playing",
};

pub(super) struct PlayCommand;

#[async_trait]
impl BotCommand for PlayCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, args: &str) -> Result<Reply> {
        let query = args.trim();
        if query.is_empty() {
            return Ok(Reply::error("Missing Query", format!("Usage: {}", INFO.usage)));
        }

        let track = match ctx.source.resolve(query).await {
            Ok(track) => track,
            Err(e) => {
                warn!(%room, "Unable to resolve {query:?}: {e}");
                return Ok(Reply::source_error(&e));
            }
        };

        let player = match ctx.join(room).await {
            Ok(player) => player,
            Err(e) => return answer(Err(e)),
        };
        answer(player.play(track.clone()).await.map(|position| {
            if position == 0 {
                Reply::now_playing(&track)
            } else {
                Reply::queued(&track, position)
            }
        }))
    }
}
