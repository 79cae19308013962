//! List command implementation.
//!
//! `ignr list` prints every known template grouped by source label;
//! `ignr list <prefix>` restricts the output to one source.

use std::collections::BTreeMap;

use crate::cli::args::ListArgs;
use crate::config::{ConfigStore, Settings};
use crate::error::Result;
use crate::registry::{resolve, Registry, TemplateEntry, LOCAL_PREFIX};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Header used for local templates.
pub const LOCAL_LABEL: &str = "Local";

/// The list command implementation.
pub struct ListCommand {
    settings: Settings,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(settings: &Settings, args: ListArgs) -> Self {
        Self {
            settings: settings.clone(),
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.settings.config_store();
        let config = store.load()?;
        let registry = Registry::from_settings(&self.settings, &config)?;

        match self.args.prefix.as_deref() {
            Some(LOCAL_PREFIX) => {
                print_local(&registry, ui)?;
            }
            Some(prefix) => {
                let collection = match resolve(prefix, registry.sources()) {
                    Ok(collection) => collection,
                    Err(e) => {
                        ui.error(&e.to_string());
                        return Ok(CommandResult::failure(1));
                    }
                };

                let mut spinner = ui.start_spinner(&format!("Loading {} templates...", prefix));
                let listing = registry.listing(&collection);
                spinner.finish_clear();

                match listing {
                    Ok(entries) => print_grouped(&entries, ui),
                    Err(e) => {
                        ui.error(&e.to_string());
                        return Ok(CommandResult::failure(1));
                    }
                }
            }
            None => {
                warm_up(&registry, &store, ui)?;

                let mut entries = Vec::new();
                for collection in registry.browse_collections().into_iter().flatten() {
                    entries.extend(registry.cached_entries(&collection));
                }
                print_grouped(&entries, ui);
                print_local(&registry, ui)?;
            }
        }

        Ok(CommandResult::success())
    }
}

/// Warm listing caches before browsing, consuming the refresh flag.
///
/// Failures are shown as warnings.
pub fn warm_up(registry: &Registry, store: &ConfigStore, ui: &mut dyn UserInterface) -> Result<()> {
    let refresh = store.take_refresh_flag()?;

    let mut spinner = ui.start_spinner("Loading templates...");
    let warnings = registry.warm_up(refresh);
    spinner.finish_clear();

    for warning in warnings {
        ui.warning(&warning.to_string());
    }
    Ok(())
}

/// Print entries under one header per source label.
fn print_grouped(entries: &[TemplateEntry], ui: &mut dyn UserInterface) {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.source_label.as_str())
            .or_default()
            .push(entry.display_name());
    }

    for (label, mut names) in groups {
        names.sort_unstable_by_key(|n| n.to_lowercase());
        names.dedup();
        ui.show_header(label);
        for name in names {
            ui.message(&format!("  {}", name));
        }
    }
}

fn print_local(registry: &Registry, ui: &mut dyn UserInterface) -> Result<()> {
    let names = registry.local().list()?;
    if names.is_empty() {
        return Ok(());
    }

    ui.show_header(LOCAL_LABEL);
    for name in names {
        ui.message(&format!("  {}", name));
    }
    Ok(())
}
