//! Search command implementation.
//!
//! `ignr search` offers every cached and local template in a multi-select
//! prompt and creates a `.gitignore` from the selection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cli::args::SearchArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::registry::Registry;
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::create::{generate, output_path};
use super::dispatcher::{Command, CommandResult};
use super::list::{warm_up, LOCAL_LABEL};

/// The search command implementation.
pub struct SearchCommand {
    settings: Settings,
    working_dir: PathBuf,
    args: SearchArgs,
}

impl SearchCommand {
    /// Create a new search command.
    pub fn new(settings: &Settings, working_dir: &Path, args: SearchArgs) -> Self {
        Self {
            settings: settings.clone(),
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for SearchCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !ui.is_interactive() {
            ui.error("search needs an interactive terminal; use `ignr list` and `ignr create` instead");
            return Ok(CommandResult::failure(1));
        }

        let store = self.settings.config_store();
        let config = store.load()?;
        let registry = Registry::from_settings(&self.settings, &config)?;

        warm_up(&registry, &store, ui)?;

        let options = template_options(&registry)?;
        if options.is_empty() {
            ui.warning("No templates available.");
            return Ok(CommandResult::success());
        }

        let prompt = Prompt::multi_select(
            "templates",
            "Select templates (space to toggle, enter to confirm)",
            options,
        );
        let selected = ui.prompt(&prompt)?.into_strings();
        if selected.is_empty() {
            ui.message("Nothing selected.");
            return Ok(CommandResult::success());
        }

        let output = output_path(&self.working_dir, self.args.output.as_deref());
        generate(&registry, &selected, &output, ui)
    }
}

/// One option per cached remote entry and local template. Option values
/// are request tokens.
pub fn template_options(registry: &Registry) -> Result<Vec<PromptOption>> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    for collection in registry.browse_collections().into_iter().flatten() {
        for entry in registry.cached_entries(&collection) {
            let token = registry.token_for(&entry, &collection.source_key);
            if seen.insert(token.clone()) {
                options.push(PromptOption {
                    label: format!("{} ({})", entry.display_name(), entry.source_label),
                    value: token,
                });
            }
        }
    }

    for name in registry.local().list()? {
        if seen.insert(name.clone()) {
            options.push(PromptOption {
                label: format!("{} ({})", name, LOCAL_LABEL),
                value: name,
            });
        }
    }

    Ok(options)
}
