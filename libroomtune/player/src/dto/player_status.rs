use super::player_state::PlayerState;
use super::track::Track;

#[derive(Clone, Debug, Default)]
pub struct PlayerStatus {
    pub state: PlayerState,
    pub current_track: Option<Track>,
    pub queue: Vec<Track>,
}

impl PlayerStatus {
    pub fn next_track(&self) -> Option<&Track> {
        self.queue.first()
    }
}
