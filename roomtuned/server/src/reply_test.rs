use std::time::Duration;

use libroomtune_player::roomtune_player::{
    AudioSource, PlayerError, PlayerEvent, PlayerState, PlayerStatus, Track,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::Reply;

fn track(title: &str, secs: u64) -> Track {
    Track::new(
        title,
        format!("https://example.com/{title}"),
        AudioSource::Remote(format!("https://cdn.example.com/{title}.m4a")),
    )
    .with_duration(Duration::from_secs(secs))
}

#[test]
fn test_display() {
    let reply = Reply::queued(&track("intro", 95), 2);
    assert_eq!("* Adding the song to queue #2\n  intro [1:35]", reply.to_string());

    let reply = Reply::player_error(&PlayerError::InvalidState(PlayerState::Error));
    assert!(reply.is_error());
    assert!(reply.to_string().starts_with("! Player Unavailable\n  "));
}

#[test]
fn test_queue_listing() {
    let status = PlayerStatus {
        state: PlayerState::Paused,
        current_track: Some(track("intro", 60)),
        queue: vec![track("verse", 125), track("outro", 3)],
    };

    assert_eq!(
        "Now playing intro [1:00] (paused)\n1. verse [2:05]\n2. outro [0:03]",
        Reply::queue(&status).description
    );
}

#[test]
fn test_queue_listing_when_idle() {
    assert_eq!(
        Reply::nothing_playing(),
        Reply::queue(&PlayerStatus::default())
    );
}

#[rstest(
    removed,
    expected,
    case(0, "Removed 0 songs from the queue and stopped playback."),
    case(1, "Removed 1 song from the queue and stopped playback."),
    case(3, "Removed 3 songs from the queue and stopped playback.")
)]
fn test_cleared(removed: usize, expected: &str) {
    assert_eq!(expected, Reply::cleared(removed).description);
}

#[rstest(
    event,
    announced,
    case(PlayerEvent::TrackStarted(track("intro", 60)), true),
    case(PlayerEvent::QueueEnded, true),
    case(PlayerEvent::Disconnected, true),
    case(PlayerEvent::Errored("boom".to_owned()), true),
    case(PlayerEvent::QueueUpdated(2), false),
    case(PlayerEvent::Paused, false),
    case(PlayerEvent::Resumed, false)
)]
fn test_announcements(event: PlayerEvent, announced: bool) {
    assert_eq!(announced, Reply::announcement(&event).is_some());
}
