//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution core and the
//! outside world (process execution, filesystem). Implementations live in
//! `src/adapters/`.

pub mod command;
pub mod filesystem;

pub use command::{capture, Answer, CommandOutput, CommandRunner, Invocation};
pub use filesystem::FileSystem;
