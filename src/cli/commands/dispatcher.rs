//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
    working_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher. Relative paths given to commands are
    /// resolved against `working_dir`.
    pub fn new(settings: Settings, working_dir: PathBuf) -> Self {
        Self {
            settings,
            working_dir,
        }
    }

    /// Get the runtime settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Create(args) => {
                let cmd =
                    super::create::CreateCommand::new(&self.settings, &self.working_dir, args.clone());
                cmd.execute(ui)
            }
            Commands::Add(args) => {
                let cmd = super::add::AddCommand::new(&self.settings, args.clone());
                cmd.execute(ui)
            }
            Commands::Save(args) => {
                let cmd =
                    super::save::SaveCommand::new(&self.settings, &self.working_dir, args.clone());
                cmd.execute(ui)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(&self.settings, args.clone());
                cmd.execute(ui)
            }
            Commands::Search(args) => {
                let cmd =
                    super::search::SearchCommand::new(&self.settings, &self.working_dir, args.clone());
                cmd.execute(ui)
            }
            Commands::Cache(args) => {
                let cmd = super::cache::CacheCommand::new(&self.settings, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
