//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations with shared [`Settings`].
//!
//! [`Settings`]: crate::config::Settings

pub mod add;
pub mod cache;
pub mod completions;
pub mod create;
pub mod dispatcher;
pub mod list;
pub mod save;
pub mod search;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
