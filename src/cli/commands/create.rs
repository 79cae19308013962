//! Create command implementation.
//!
//! `ignr create gh:Go tt:Rust my-template` resolves each token and writes
//! the combined result to `.gitignore`.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::CreateArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::registry::{Registry, ResolvedTemplate};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = ".gitignore";

/// The create command implementation.
pub struct CreateCommand {
    settings: Settings,
    working_dir: PathBuf,
    args: CreateArgs,
}

impl CreateCommand {
    /// Create a new create command.
    pub fn new(settings: &Settings, working_dir: &Path, args: CreateArgs) -> Self {
        Self {
            settings: settings.clone(),
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for CreateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.settings.config_store().load()?;
        let registry = Registry::from_settings(&self.settings, &config)?;
        let output = output_path(&self.working_dir, self.args.output.as_deref());

        generate(&registry, &self.args.templates, &output, ui)
    }
}

/// Resolve the output file against the working directory.
pub fn output_path(working_dir: &Path, output: Option<&Path>) -> PathBuf {
    working_dir.join(output.unwrap_or(Path::new(DEFAULT_OUTPUT)))
}

/// Comment banner placed above each template.
pub fn banner(token: &str) -> String {
    let title = token.to_uppercase();
    let rule = "#".repeat(title.chars().count() + 6);
    format!("{}\n## {} ##\n{}\n", rule, title, rule)
}

/// Combine resolved templates into one file body.
pub fn render(resolved: &[ResolvedTemplate]) -> String {
    let mut out = String::new();
    for template in resolved {
        out.push_str(&banner(&template.token));
        out.push_str(&template.content);
        if !template.content.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Resolve `tokens` and write the combined file.
///
/// Tokens that fail are reported and skipped. Only a failure to write the
/// output is an error.
pub fn generate(
    registry: &Registry,
    tokens: &[String],
    output: &Path,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let mut spinner = ui.start_spinner("Fetching templates...");
    let resolution = registry.resolve_many(tokens);
    spinner.finish_clear();

    for failure in &resolution.failures {
        ui.error(&format!("Error processing {}", failure));
    }

    if resolution.resolved.is_empty() {
        ui.warning(&format!(
            "No templates could be resolved; {} was not written.",
            output.display()
        ));
        return Ok(CommandResult::success());
    }

    if !resolution.is_complete() {
        ui.warning(&format!(
            "Some templates failed to process. {} will be incomplete.",
            output.display()
        ));
    }

    fs::write(output, render(&resolution.resolved))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    ui.success(&format!("Created {}", output.display()));
    Ok(CommandResult::success())
}
