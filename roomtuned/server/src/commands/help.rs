use async_trait::async_trait;
use eyre::Result;
use libroomtune_player::roomtune_player::RoomId;

use super::{BotCommand, CommandContext, CommandInfo};
use crate::reply::Reply;

pub(super) const INFO: CommandInfo = CommandInfo {
    name: "help",
    aliases: &[],
    usage: "help",
    description: "List the available commands",
};

pub(super) struct HelpCommand {
    text: String,
}

impl HelpCommand {
    pub(super) fn new<'a>(infos: impl Iterator<Item = &'a CommandInfo>) -> Self {
        let text = infos
            .map(|info| {
                let mut line = format!("{} - {}", info.usage, info.description);
                if !info.aliases.is_empty() {
                    line.push_str(&format!(" (also: {})", info.aliases.join(", ")));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self { text }
    }
}

#[async_trait]
impl BotCommand for HelpCommand {
    async fn execute(&self, _ctx: &CommandContext, _room: &RoomId, _args: &str) -> Result<Reply> {
        Ok(Reply::new("Commands", self.text.clone()))
    }
}
