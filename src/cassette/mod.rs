//! Cassette format for recording and replaying command interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
