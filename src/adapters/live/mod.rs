//! Live adapters for real external interactions.

pub mod command;
pub mod filesystem;

pub use command::LiveCommandRunner;
pub use filesystem::LiveFileSystem;
