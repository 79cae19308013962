//! Add command implementation.
//!
//! `ignr add <url> --nickname <nick>` registers a remote collection so its
//! templates can be requested as `<nick>:Name`.

use crate::cli::args::AddArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::registry::{parse_repo_url, validate_nickname, GithubClient};
use crate::ui::{Prompt, PromptResult, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The add command implementation.
pub struct AddCommand {
    settings: Settings,
    args: AddArgs,
}

impl AddCommand {
    /// Create a new add command.
    pub fn new(settings: &Settings, args: AddArgs) -> Self {
        Self {
            settings: settings.clone(),
            args,
        }
    }
}

impl Command for AddCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let AddArgs { url, nickname } = &self.args;

        let repo = match parse_repo_url(url) {
            Ok(repo) => repo,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };
        if let Err(e) = validate_nickname(nickname) {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(1));
        }

        let client = GithubClient::with_api_url(&self.settings.api_url)?
            .with_token(self.settings.github_token.clone());

        let mut spinner = ui.start_spinner(&format!("Checking {}/{}...", repo.owner, repo.collection));
        let has_templates = client.has_templates(&repo.owner, &repo.collection);
        spinner.finish_clear();

        match has_templates {
            Ok(true) => {}
            Ok(false) => {
                ui.error(
                    "Repository must contain named .gitignore files (e.g. python.gitignore, node.gitignore)",
                );
                return Ok(CommandResult::failure(1));
            }
            Err(e) => {
                ui.error(&format!("Failed to validate repository: {}", e));
                return Ok(CommandResult::failure(1));
            }
        }

        let store = self.settings.config_store();
        if let Some(existing) = store.registered_sources()?.get(nickname) {
            let prompt = Prompt::confirm(
                "overwrite_nickname",
                &format!(
                    "The nickname '{}' already points to {}. Overwrite with {}?",
                    nickname, existing, url
                ),
                false,
            );
            if ui.prompt(&prompt)? != PromptResult::Bool(true) {
                ui.warning("Operation cancelled.");
                return Ok(CommandResult::success());
            }
        }

        store.register_source(nickname, url)?;

        ui.success(&format!(
            "Added {} as {}. Use with: ignr create {}:<template>",
            url, nickname, nickname
        ));
        Ok(CommandResult::success())
    }
}
