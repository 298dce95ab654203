pub(crate) mod command;
pub(crate) mod outcome;
pub(crate) mod player_event;
pub(crate) mod player_state;
pub(crate) mod player_status;
pub(crate) mod room;
pub(crate) mod track;
pub(crate) mod transport_event;
