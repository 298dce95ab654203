#[derive(Clone, Debug)]
pub struct Settings {
    /// Number of player events buffered for each subscriber before the slowest one starts
    /// missing events.
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { event_capacity: 32 }
    }
}
