use async_trait::async_trait;
use eyre::Result;
use libroomtune_player::roomtune_player::{Outcome, PlayerState, RoomId, RoomPlayer, Skipped};

use super::{BotCommand, CommandContext, CommandInfo, answer};
use crate::reply::Reply;

pub(super) const PAUSE_INFO: CommandInfo = CommandInfo {
    name: "pause",
    aliases: &[],
    usage: "pause",
    description: "Pause the current song",
};

pub(super) const RESUME_INFO: CommandInfo = CommandInfo {
    name: "resume",
    aliases: &["unpause"],
    usage: "resume",
    description: "Resume the paused song",
};

pub(super) const SKIP_INFO: CommandInfo = CommandInfo {
    name: "skip",
    aliases: &[],
    usage: "skip",
    description: "Skip the current song",
};

pub(super) const CLEAR_INFO: CommandInfo = CommandInfo {
    name: "clear",
    aliases: &[],
    usage: "clear",
    description: "Clear the queue and stop the current song",
};

/// Reply for a pause or resume that changed nothing.
async fn unchanged(player: &RoomPlayer) -> Result<Reply> {
    let status = match player.status().await {
        Ok(status) => status,
        Err(e) => return answer(Err(e)),
    };
    Ok(match (status.state, status.current_track) {
        (PlayerState::Paused, Some(track)) => {
            Reply::new("Already Paused", format!("{track} is paused."))
        }
        (PlayerState::Playing, Some(track)) => {
            Reply::new("Already Playing", format!("Now playing {track}"))
        }
        _ => Reply::nothing_playing(),
    })
}

pub(super) struct PauseCommand;

#[async_trait]
impl BotCommand for PauseCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        match player.pause().await {
            Ok(Outcome::Applied) => Ok(Reply::paused()),
            Ok(Outcome::NoOp) => unchanged(&player).await,
            Err(e) => answer(Err(e)),
        }
    }
}

pub(super) struct ResumeCommand;

#[async_trait]
impl BotCommand for ResumeCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        match player.unpause().await {
            Ok(Outcome::Applied) => Ok(Reply::resumed()),
            Ok(Outcome::NoOp) => unchanged(&player).await,
            Err(e) => answer(Err(e)),
        }
    }
}

pub(super) struct SkipCommand;

#[async_trait]
impl BotCommand for SkipCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        match player.skip_to_next().await {
            Ok(Skipped {
                outcome: Outcome::Applied,
                next,
            }) => Ok(Reply::skipped(next.as_ref())),
            Ok(_) => Ok(Reply::nothing_playing()),
            Err(e) => answer(Err(e)),
        }
    }
}

pub(super) struct ClearCommand;

#[async_trait]
impl BotCommand for ClearCommand {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, _args: &str) -> Result<Reply> {
        let Some(player) = ctx.registry.find(room) else {
            return Ok(Reply::nothing_playing());
        };
        let removed = match player.clear_queue().await {
            Ok(removed) => removed,
            Err(e) => return answer(Err(e)),
        };
        match player.skip().await {
            Ok(Outcome::NoOp) if removed == 0 => Ok(Reply::nothing_playing()),
            Ok(_) => Ok(Reply::cleared(removed)),
            Err(e) => answer(Err(e)),
        }
    }
}
