//! Cache command implementation.
//!
//! Provides `ignr cache list` and `ignr cache clear`.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cache::{format_duration, ContentCache, TemplateCache};
use crate::config::Settings;
use crate::ui::{Prompt, PromptResult, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached listings and the content cache size.
    List,
    /// Remove every cache file.
    Clear {
        /// Don't prompt for confirmation.
        #[arg(short, long)]
        force: bool,
    },
}

/// The cache command implementation.
pub struct CacheCommand {
    settings: Settings,
    args: CacheArgs,
}

impl CacheCommand {
    /// Create a new cache command.
    pub fn new(settings: &Settings, args: CacheArgs) -> Self {
        Self {
            settings: settings.clone(),
            args,
        }
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let listings = TemplateCache::new(self.settings.listing_cache_dir());
        let content = ContentCache::new(self.settings.cache_dir());

        match &self.args.command {
            CacheSubcommand::List => list_cache(&listings, &content, ui)?,
            CacheSubcommand::Clear { force } => clear_cache(&listings, &content, *force, ui)?,
        }

        Ok(CommandResult::success())
    }
}

fn list_cache(
    listings: &TemplateCache,
    content: &ContentCache,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let records = listings.list()?;
    let content_entries = content.len();

    if records.is_empty() && content_entries == 0 {
        ui.message("Cache is empty");
        return Ok(());
    }

    if !records.is_empty() {
        ui.message(&format!("{} cached listings:\n", records.len()));
    }

    for (key, record) in records {
        let status = if record.is_expired(listings.ttl()) {
            "expired"
        } else {
            "fresh"
        };
        ui.message(&format!(
            "  {} [{}] {} templates, updated {} ago",
            key,
            status,
            record.templates.len(),
            format_duration(record.age())
        ));
    }

    ui.message(&format!("\nContent cache: {} templates", content_entries));
    ui.message(&format!("Location: {}", listings.root().display()));

    Ok(())
}

fn clear_cache(
    listings: &TemplateCache,
    content: &ContentCache,
    force: bool,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let listing_count = listings.file_count()?;
    let content_count = content.len();

    if listing_count == 0 && !content.path().exists() {
        ui.message("Cache is already empty");
        return Ok(());
    }

    if !force && ui.is_interactive() {
        let prompt = Prompt::confirm(
            "clear_cache",
            &format!(
                "Clear {} cached listings and {} cached templates?",
                listing_count, content_count
            ),
            false,
        );

        if ui.prompt(&prompt)? != PromptResult::Bool(true) {
            ui.message("Cancelled");
            return Ok(());
        }
    }

    let cleared = listings.clear()?;
    content.clear()?;
    ui.success(&format!(
        "Cleared {} listings and {} cached templates",
        cleared, content_count
    ));

    Ok(())
}
