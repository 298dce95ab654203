use std::collections::HashMap;

use eyre::{Context, Result};
use flume::Sender;
use libroomtune_player::roomtune_player::{PlayerEvent, RoomId, RoomPlayer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::commands::{CommandContext, CommandTable};
use crate::reply::Reply;

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Command {
        room: RoomId,
        name: &'a str,
        args: &'a str,
    },
    Invalid(String),
}

/// Parses `<room> <command> [args]`. Lines starting with `#` are comments.
pub fn parse_line(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Blank;
    }
    let Some((room, rest)) = line.split_once(char::is_whitespace) else {
        return Line::Invalid(format!("Missing command after room {line:?}"));
    };
    let (name, args) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .unwrap_or((rest.trim_start(), ""));
    Line::Command {
        room: RoomId::from(room),
        name,
        args: args.trim(),
    }
}

fn render(room: &RoomId, reply: &Reply) -> String {
    format!("[{room}] {reply}")
}

/// Chat adapter for a terminal: every input line is a command issued in a room, replies and
/// player announcements go to `output`.
pub struct Console {
    table: CommandTable,
    ctx: CommandContext,
    output: Sender<String>,
    watched: HashMap<RoomId, RoomPlayer>,
}

impl Console {
    pub fn new(table: CommandTable, ctx: CommandContext, output: Sender<String>) -> Self {
        Self {
            table,
            ctx,
            output,
            watched: HashMap::new(),
        }
    }

    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines
            .next_line()
            .await
            .wrap_err("error reading console input")?
        {
            self.handle_line(&line).await;
        }
        info!("Console input closed");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) {
        match parse_line(line) {
            Line::Blank => {}
            Line::Invalid(reason) => {
                self.print(format!("! {reason}\n  Usage: <room> <command> [args]"));
            }
            Line::Command { room, name, args } => {
                let reply = self.table.dispatch(&self.ctx, &room, name, args).await;
                self.print(render(&room, &reply));
                self.watch(&room);
            }
        }
    }

    fn print(&self, text: String) {
        if self.output.send(text).is_err() {
            warn!("Console output is closed");
        }
    }

    /// Starts announcing the events of the room's current player, once per player.
    fn watch(&mut self, room: &RoomId) {
        let Some(player) = self.ctx.registry.find(room) else {
            self.watched.remove(room);
            return;
        };
        if self
            .watched
            .get(room)
            .is_some_and(|watched| watched.same_player(&player))
        {
            return;
        }
        debug!(%room, "Announcing player events");
        tokio::spawn(announce(
            room.clone(),
            player.subscribe(),
            self.output.clone(),
        ));
        self.watched.insert(room.clone(), player);
    }
}

async fn announce(
    room: RoomId,
    mut events: broadcast::Receiver<PlayerEvent>,
    output: Sender<String>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let Some(reply) = Reply::announcement(&event) else {
                    continue;
                };
                if output.send_async(render(&room, &reply)).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!(%room, "Missed {missed} player events");
            }
            Err(RecvError::Closed) => break,
        }
    }
    debug!(%room, "Stopped announcing player events");
}

/// Writes everything sent to `output` until all senders are gone.
pub async fn write_output<W>(output: flume::Receiver<String>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(text) = output.recv_async().await {
        writer
            .write_all(format!("{text}\n").as_bytes())
            .await
            .wrap_err("error writing console output")?;
        writer.flush().await.wrap_err("error flushing console output")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "./console_test.rs"]
mod console_test;
