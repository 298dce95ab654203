use strum::Display;

use super::track::Track;

/// Result of an operation that is allowed to do nothing, such as pausing an idle player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Outcome {
    Applied,
    NoOp,
}

impl Outcome {
    pub fn is_noop(self) -> bool {
        self == Self::NoOp
    }
}

/// What a skip did, read in the same step as the skip itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub outcome: Outcome,
    /// The track that started in place of the skipped one. `None` when the queue was empty.
    pub next: Option<Track>,
}

impl Skipped {
    pub(crate) fn noop() -> Self {
        Self {
            outcome: Outcome::NoOp,
            next: None,
        }
    }
}
