mod events;

pub use events::{HeartbeatEntry, describe_last, now_ms};

/// In-process session history of received heartbeats, newest first.
pub type HeartbeatLedger = crate::logbook::RingLog<HeartbeatEntry>;
