//! Save command implementation.
//!
//! `ignr save <name>` copies a `.gitignore` into the local template store.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::SaveArgs;
use crate::config::Settings;
use crate::error::{IgnrError, Result};
use crate::registry::LocalStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The save command implementation.
pub struct SaveCommand {
    settings: Settings,
    working_dir: PathBuf,
    args: SaveArgs,
}

impl SaveCommand {
    /// Create a new save command.
    pub fn new(settings: &Settings, working_dir: &Path, args: SaveArgs) -> Self {
        Self {
            settings: settings.clone(),
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for SaveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = self.working_dir.join(&self.args.from);
        if !source.is_file() {
            ui.error(&format!("{} not found", source.display()));
            return Ok(CommandResult::failure(1));
        }

        let content = fs::read_to_string(&source)
            .with_context(|| format!("Failed to read {}", source.display()))?;

        let config = self.settings.config_store().load()?;
        let store = LocalStore::new(self.settings.template_dir(&config));

        match store.save(&self.args.name, &content) {
            Ok(path) => {
                ui.success(&format!(
                    "Saved template '{}' to {}",
                    self.args.name,
                    path.display()
                ));
                Ok(CommandResult::success())
            }
            Err(e @ IgnrError::InvalidTemplateName { .. }) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn args(name: &str, from: &str) -> SaveArgs {
        SaveArgs {
            name: name.to_string(),
            from: PathBuf::from(from),
        }
    }

    #[test]
    fn saves_working_dir_gitignore() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "node_modules/\n").unwrap();
        let settings = Settings::new(temp.path().join("cfg"));

        let cmd = SaveCommand::new(&settings, temp.path(), args("web", ".gitignore"));
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let store = LocalStore::new(settings.template_dir(&Default::default()));
        assert_eq!(store.get("web").unwrap(), "node_modules/\n");
    }

    #[test]
    fn honours_storage_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("src.ignore"), "x\n").unwrap();
        let settings = Settings::new(temp.path().join("cfg"));
        let mut config = settings.config_store().load().unwrap();
        config.templates.storage_path = Some(temp.path().join("mine"));
        settings.config_store().save(&config).unwrap();

        let cmd = SaveCommand::new(&settings, temp.path(), args("t", "src.ignore"));
        cmd.execute(&mut MockUI::new()).unwrap();

        assert!(temp.path().join("mine/t.gitignore").exists());
    }

    #[test]
    fn missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::new(temp.path().join("cfg"));

        let cmd = SaveCommand::new(&settings, temp.path(), args("web", ".gitignore"));
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert!(ui.has_error("not found"));
    }

    #[test]
    fn invalid_name_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "x\n").unwrap();
        let settings = Settings::new(temp.path().join("cfg"));

        let cmd = SaveCommand::new(&settings, temp.path(), args("bad name", ".gitignore"));
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert!(ui.has_error("Invalid template name"));
    }
}
