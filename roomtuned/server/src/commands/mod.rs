mod help;
mod leave;
mod play;
mod playback;
mod status;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, bail};
use libroomtune_player::roomtune_player::{
    PlayerError, PlayerRegistry, RoomId, RoomPlayer, TrackSource,
};
use tap::TapFallible;
use tracing::{error, info};

use crate::reply::Reply;

/// What every command gets to work with.
pub struct CommandContext {
    pub registry: Arc<PlayerRegistry>,
    pub source: Arc<dyn TrackSource>,
}

impl CommandContext {
    pub fn new(registry: Arc<PlayerRegistry>, source: Arc<dyn TrackSource>) -> Self {
        Self { registry, source }
    }

    /// Returns a usable player for `room`. A player that already left the room or failed is
    /// replaced with a fresh one.
    pub async fn join(&self, room: &RoomId) -> Result<RoomPlayer, PlayerError> {
        let player = self.registry.get(room);
        if !player.state().await?.is_terminal() {
            return Ok(player);
        }
        info!(%room, "Re-joining room");
        self.registry.remove_player(&player);
        Ok(self.registry.get(room))
    }
}

#[async_trait]
pub trait BotCommand: Send + Sync {
    async fn execute(&self, ctx: &CommandContext, room: &RoomId, args: &str) -> Result<Reply>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
}

struct Entry {
    info: CommandInfo,
    command: Arc<dyn BotCommand>,
}

/// Name and alias lookup for the chat commands.
#[derive(Default)]
pub struct CommandTable {
    entries: Vec<Entry>,
    by_name: HashMap<&'static str, usize>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table with every command the bot understands.
    pub fn standard() -> Result<Self> {
        let table = Self::new()
            .add(play::INFO, play::PlayCommand)?
            .add(playback::PAUSE_INFO, playback::PauseCommand)?
            .add(playback::RESUME_INFO, playback::ResumeCommand)?
            .add(playback::SKIP_INFO, playback::SkipCommand)?
            .add(playback::CLEAR_INFO, playback::ClearCommand)?
            .add(status::NOW_PLAYING_INFO, status::NowPlayingCommand)?
            .add(status::QUEUE_INFO, status::QueueCommand)?
            .add(leave::INFO, leave::LeaveCommand)?;
        let help = help::HelpCommand::new(table.infos().chain([&help::INFO]));
        table.add(help::INFO, help)
    }

    pub fn add(mut self, info: CommandInfo, command: impl BotCommand + 'static) -> Result<Self> {
        let index = self.entries.len();
        for name in std::iter::once(info.name).chain(info.aliases.iter().copied()) {
            if self.by_name.insert(name, index).is_some() {
                bail!("A command with name {name:?} already exists");
            }
        }
        self.entries.push(Entry {
            info,
            command: Arc::new(command),
        });
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn BotCommand>> {
        self.by_name
            .get(name.to_lowercase().as_str())
            .map(|&index| self.entries[index].command.clone())
    }

    pub fn infos(&self) -> impl Iterator<Item = &CommandInfo> {
        self.entries.iter().map(|entry| &entry.info)
    }

    /// Runs the command called `name`. Failures are logged and answered with an error reply.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        room: &RoomId,
        name: &str,
        args: &str,
    ) -> Reply {
        let Some(command) = self.get(name) else {
            return Reply::unknown_command(name);
        };
        info!(%room, "Executing {name} {args:?}");
        command
            .execute(ctx, room, args)
            .await
            .tap_err(|e| error!(%room, "Could not execute command {name}: {e:?}"))
            .unwrap_or_else(|_| Reply::failed())
    }
}

/// Turns the outcome of a player call into a reply. Expected player errors are answered, a
/// player task that is gone is a real failure.
fn answer(result: Result<Reply, PlayerError>) -> Result<Reply> {
    match result {
        Ok(reply) => Ok(reply),
        Err(e @ PlayerError::Closed) => Err(e.into()),
        Err(e) => Ok(Reply::player_error(&e)),
    }
}

#[cfg(test)]
#[path = "./commands_test.rs"]
mod commands_test;
