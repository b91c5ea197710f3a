//! Version resolution: from a directory and a tag prefix to [`VersionDetails`].
//!
//! The pieces, leaves first:
//! - [`locator`] finds the repository root above a directory.
//! - [`inspector`] asks git the four questions resolution needs.
//! - [`resolver`] turns those answers into a [`VersionDetails`].
//! - [`cache`] memoizes one result per (root, prefix) for the process.
//! - [`service`] wires them together behind a single entry point.

pub mod cache;
pub mod details;
pub mod inspector;
pub mod locator;
pub mod prefix;
pub mod resolver;
pub mod service;
pub mod timer;

pub use cache::{ResolutionCache, ResolutionKey};
pub use details::VersionDetails;
pub use inspector::{Cleanliness, GitInspector};
pub use locator::{RepositoryLocator, RepositoryRoot};
pub use prefix::TagPrefix;
pub use resolver::{Description, RawAnswers, VersionResolver};
pub use service::VersionService;
pub use timer::Timer;
