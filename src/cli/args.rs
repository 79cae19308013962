//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::commands::cache::CacheArgs;
use crate::config::Settings;
use crate::registry::fetch::DEFAULT_API_URL;

/// ignr - Assemble .gitignore files from template collections.
#[derive(Debug, Parser)]
#[command(name = "ignr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding config, caches and saved templates
    #[arg(long, global = true, env = "IGNR_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, global = true, env = "IGNR_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    /// Token for GitHub API requests (raises the rate limit)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Runtime settings from the global flags.
    pub fn settings(&self) -> crate::error::Result<Settings> {
        Ok(Settings::resolve(self.config_dir.clone())?
            .with_api_url(self.api_url.clone())
            .with_github_token(self.github_token.clone()))
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a .gitignore from one or more templates
    Create(CreateArgs),

    /// Register a remote template collection under a nickname
    Add(AddArgs),

    /// Save a .gitignore file as a local template
    Save(SaveArgs),

    /// List available templates
    List(ListArgs),

    /// Pick templates interactively and create a .gitignore
    Search(SearchArgs),

    /// Manage the template cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateArgs {
    /// Templates to combine: `gh:Go`, `tt:Rust`, `<nickname>:Name` or a saved template name
    #[arg(required = true, value_name = "TEMPLATE")]
    pub templates: Vec<String>,

    /// Write to this file instead of ./.gitignore
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AddArgs {
    /// Collection URL, e.g. https://github.com/acme/gitignore-templates
    pub url: String,

    /// Prefix used to request templates from this collection
    #[arg(short, long)]
    pub nickname: String,
}

/// Arguments for the `save` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SaveArgs {
    /// Name to save the template under
    pub name: String,

    /// File to save
    #[arg(long, value_name = "PATH", default_value = ".gitignore")]
    pub from: PathBuf,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only list this source (`gh`, `ghc`, `ghg`, `tt`, a nickname, or `local`)
    pub prefix: Option<String>,
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchArgs {
    /// Write to this file instead of ./.gitignore
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_output() {
        let cli = Cli::parse_from(["ignr", "create", "gh:Go", "tt:Rust", "-o", "out.gitignore"]);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.templates, vec!["gh:Go", "tt:Rust"]);
                assert_eq!(args.output, Some(PathBuf::from("out.gitignore")));
            }
            other => panic!("Expected Create, got {:?}", other),
        }
    }

    #[test]
    fn create_requires_a_template() {
        assert!(Cli::try_parse_from(["ignr", "create"]).is_err());
    }

    #[test]
    fn parses_add() {
        let cli = Cli::parse_from([
            "ignr",
            "add",
            "https://github.com/acme/templates",
            "--nickname",
            "work",
        ]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.url, "https://github.com/acme/templates");
                assert_eq!(args.nickname, "work");
            }
            other => panic!("Expected Add, got {:?}", other),
        }
    }

    #[test]
    fn save_defaults_to_dot_gitignore() {
        let cli = Cli::parse_from(["ignr", "save", "mine"]);
        match cli.command {
            Commands::Save(args) => assert_eq!(args.from, PathBuf::from(".gitignore")),
            other => panic!("Expected Save, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ignr", "list", "gh", "--quiet", "--config-dir", "/tmp/x"]);
        assert!(cli.quiet);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn settings_from_flags() {
        let cli = Cli::parse_from([
            "ignr",
            "--config-dir",
            "/tmp/cfg",
            "--api-url",
            "http://localhost:9",
            "list",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(settings.api_url, "http://localhost:9");
    }
}
