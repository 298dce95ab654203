use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use libroomtune_player::roomtune_player::{
    AudioSource, PlaybackTransport, PlayerRegistry, PlayerState, RoomId, Settings,
    SimulatedSettings, SimulatedTransport, SourceError, Track, TrackSource, TransportError,
    TransportEvents, TransportSession,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{CommandContext, CommandInfo, CommandTable};
use crate::reply::Reply;

#[ctor::ctor]
fn init() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok();
}

struct FakeSource;

#[async_trait]
impl TrackSource for FakeSource {
    async fn resolve(&self, query: &str) -> Result<Track, SourceError> {
        match query {
            "nothing" => Err(SourceError::NoResultsFound(query.to_owned())),
            q if q.starts_with("http") => Err(SourceError::InvalidReference(query.to_owned())),
            _ => Ok(track(query)),
        }
    }
}

struct UnreachableTransport;

#[async_trait]
impl PlaybackTransport for UnreachableTransport {
    async fn open(
        &self,
        room: &RoomId,
        _events: TransportEvents,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        Err(TransportError::Connection {
            room: room.clone(),
            reason: "no route".to_owned(),
        })
    }
}

fn track(title: &str) -> Track {
    Track::new(
        title,
        format!("https://example.com/{title}"),
        AudioSource::Remote(format!("https://cdn.example.com/{title}.m4a")),
    )
    .with_duration(Duration::from_secs(600))
}

fn context(transport: Arc<dyn PlaybackTransport>) -> CommandContext {
    CommandContext::new(
        Arc::new(PlayerRegistry::new(transport, Settings::default())),
        Arc::new(FakeSource),
    )
}

fn simulated_context() -> CommandContext {
    context(Arc::new(SimulatedTransport::new(SimulatedSettings::default())))
}

struct Bot {
    table: CommandTable,
    ctx: CommandContext,
    room: RoomId,
}

impl Bot {
    fn new(ctx: CommandContext) -> Self {
        Self {
            table: CommandTable::standard().unwrap(),
            ctx,
            room: RoomId::from("lounge"),
        }
    }

    async fn run(&self, name: &str, args: &str) -> Reply {
        self.table.dispatch(&self.ctx, &self.room, name, args).await
    }

    async fn title(&self, name: &str, args: &str) -> String {
        self.run(name, args).await.title
    }

    async fn state(&self) -> PlayerState {
        self.ctx.registry.get(&self.room).state().await.unwrap()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_play_then_queue() {
    let bot = Bot::new(simulated_context());

    assert_eq!(
        Reply::now_playing(&track("intro")),
        bot.run("play", "intro").await
    );
    assert_eq!(
        Reply::queued(&track("verse"), 1),
        bot.run("play", "  verse ").await
    );
    assert_eq!(
        "Adding the song to queue #2",
        bot.title("play", "outro").await
    );
}

#[rstest(
    args,
    title,
    case("", "Missing Query"),
    case("nothing", "No Results"),
    case("https://bad.link", "Invalid Link")
)]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_play_errors(args: &str, title: &str) {
    let bot = Bot::new(simulated_context());
    let reply = bot.run("play", args).await;

    assert!(reply.is_error());
    assert_eq!(title, reply.title);
    assert!(bot.ctx.registry.find(&bot.room).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_pause_and_resume() {
    let bot = Bot::new(simulated_context());
    bot.run("play", "intro").await;

    assert_eq!(Reply::paused(), bot.run("pause", "").await);
    assert_eq!(PlayerState::Paused, bot.state().await);
    assert_eq!("Already Paused", bot.title("pause", "").await);

    assert_eq!(Reply::resumed(), bot.run("unpause", "").await);
    assert_eq!(PlayerState::Playing, bot.state().await);
    assert_eq!("Already Playing", bot.title("resume", "").await);
}

#[rstest(name, case("pause"), case("resume"), case("skip"), case("clear"), case("np"), case("queue"))]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_nothing_playing(name: &str) {
    let bot = Bot::new(simulated_context());
    assert_eq!(Reply::nothing_playing(), bot.run(name, "").await);
    assert!(bot.ctx.registry.is_empty());
}

#[rstest(name, case("pause"), case("resume"), case("skip"), case("clear"))]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_unknown_rooms_get_no_player(name: &str) {
    let bot = Bot::new(simulated_context());
    for i in 0..100 {
        let room = RoomId::from(format!("typo{i}"));
        let reply = bot.table.dispatch(&bot.ctx, &room, name, "").await;
        assert_eq!(Reply::nothing_playing(), reply);
    }
    assert_eq!(0, bot.ctx.registry.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_skip() {
    let bot = Bot::new(simulated_context());
    bot.run("play", "intro").await;
    bot.run("play", "verse").await;

    assert_eq!(
        Reply::skipped(Some(&track("verse"))),
        bot.run("skip", "").await
    );
    assert_eq!(Reply::skipped(None), bot.run("skip", "").await);
    assert_eq!(PlayerState::Idle, bot.state().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_clear_drops_queue_and_skips() {
    let bot = Bot::new(simulated_context());
    for title in ["intro", "verse", "outro"] {
        bot.run("play", title).await;
    }

    assert_eq!(Reply::cleared(2), bot.run("clear", "").await);

    let status = bot.ctx.registry.get(&bot.room).status().await.unwrap();
    assert_eq!(PlayerState::Idle, status.state);
    assert!(status.queue.is_empty());
    assert!(status.current_track.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_now_playing_and_queue() {
    let bot = Bot::new(simulated_context());
    bot.run("play", "intro").await;
    bot.run("play", "verse").await;

    assert_eq!(
        Reply::now_playing(&track("intro")),
        bot.run("now-playing", "").await
    );
    let queue = bot.run("queue", "").await;
    assert_eq!(
        "Now playing intro [10:00]\n1. verse [10:00]",
        queue.description
    );

    bot.run("pause", "").await;
    assert_eq!(
        "Now playing intro [10:00] (paused)",
        bot.run("np", "").await.description
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_leave() {
    let bot = Bot::new(simulated_context());
    bot.run("play", "intro").await;
    let player = bot.ctx.registry.get(&bot.room);

    assert_eq!(Reply::left(), bot.run("leave", "").await);
    assert_eq!(PlayerState::Disconnected, player.state().await.unwrap());
    assert_eq!(Reply::not_connected(), bot.run("disconnect", "").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_terminal_player_rejects_until_play_rejoins() {
    let bot = Bot::new(simulated_context());
    bot.run("play", "intro").await;
    let old = bot.ctx.registry.get(&bot.room);
    old.disconnect().await.unwrap();

    let reply = bot.run("skip", "").await;
    assert!(reply.is_error());
    assert_eq!("Disconnected", reply.title);

    assert_eq!(
        Reply::now_playing(&track("verse")),
        bot.run("play", "verse").await
    );
    let fresh = bot.ctx.registry.get(&bot.room);
    assert!(!old.same_player(&fresh));
    assert_eq!(PlayerState::Playing, fresh.state().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_unreachable_room() {
    let bot = Bot::new(context(Arc::new(UnreachableTransport)));

    for _ in 0..2 {
        let reply = bot.run("play", "intro").await;
        assert!(reply.is_error());
        assert_eq!("Unable to Join", reply.title);
    }
    assert_eq!(PlayerState::Error, bot.state().await);
}

#[rstest(name, case("PLAY"), case("Np"), case("unpause"), case("disconnect"))]
fn test_lookup_is_case_insensitive_and_knows_aliases(name: &str) {
    let table = CommandTable::standard().unwrap();
    assert!(table.get(name).is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_unknown_command() {
    let bot = Bot::new(simulated_context());
    assert_eq!(Reply::unknown_command("dance"), bot.run("dance", "").await);
}

#[test]
fn test_duplicate_names_are_rejected() {
    let table = CommandTable::standard().unwrap();
    let info = CommandInfo {
        name: "shuffle",
        aliases: &["np"],
        usage: "shuffle",
        description: "Shuffle",
    };
    assert!(table.add(info, super::status::QueueCommand).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_help_lists_every_command() {
    let bot = Bot::new(simulated_context());
    let reply = bot.run("help", "").await;

    let names: Vec<_> = bot.table.infos().map(|info| info.name).collect();
    assert_eq!(
        vec![
            "play",
            "pause",
            "resume",
            "skip",
            "clear",
            "now-playing",
            "queue",
            "leave",
            "help"
        ],
        names
    );
    assert_eq!(names.len(), reply.description.lines().count());
    assert!(reply.description.contains("resume - Resume the paused song (also: unpause)"));
}
