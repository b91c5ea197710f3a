//! Replaying adapters that replay recorded interactions.

pub mod command;

pub use command::ReplayingCommandRunner;
