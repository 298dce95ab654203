use async_trait::async_trait;
use eyre::Result;
use libroomtune_player::roomtune_player::{Outcome, RoomId};

use super::{BotCommand, CommandContext, CommandInfo, answer};
use crate::reply::Reply;

pub(super) const INFO: CommandInfo = CommandInfo {
    name: "leave",
    aliases: &["disconnect"],
    usage: "leave",
    description: "Leave the room and drop the queue",
};

pub(super) struct LeaveCommand;

#[async_trait]
impl BotCommand for LeaveCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        answer(ctx.registry.disconnect(room).await.map(|outcome| match outcome {
            Outcome::Applied => Reply::left(),
            Outcome::NoOp => Reply::not_connected(),
        }))
    }
}
