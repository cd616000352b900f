// File: ./src/logic.rs
// Ties command parsing, the in-memory model and persistence together.
use crate::commands::{Command, CommandResult, parse_command};
use crate::config::Config;
use crate::context::SharedContext;
use crate::error::{RecipeError, Result};
use crate::import::ImportManager;
use crate::model::{Model, RecipeBook};
use crate::storage::{self, RecipeBookStorage};

pub struct Logic {
    ctx: SharedContext,
    config: Config,
    model: Model,
    storage: RecipeBookStorage,
    importer: ImportManager,
    startup_warnings: Vec<String>,
}

impl Logic {
    /// Loads preferences and the recipe book.
    ///
    /// Unreadable preferences fall back to the defaults. An unreadable recipe book
    /// starts the session with an empty book and blocks saving until it is fixed;
    /// both cases are reported through `startup_warnings`.
    pub fn new(ctx: SharedContext, config: Config) -> Result<Self> {
        let mut startup_warnings = Vec::new();

        let prefs = storage::load_prefs(ctx.as_ref()).unwrap_or_else(|e| {
            log::warn!("Using default preferences: {:#}", e);
            startup_warnings.push(format!("Preferences could not be read ({:#}), using defaults.", e));
            Default::default()
        });

        let storage = RecipeBookStorage::for_prefs(ctx.as_ref(), &prefs)?;
        let book = match storage.load() {
            Ok(book) => book,
            Err(e) => {
                startup_warnings.push(format!(
                    "{}. Starting with an empty recipe book; changes will not be saved until the file is fixed or removed.",
                    e
                ));
                RecipeBook::new()
            }
        };
        log::info!(
            "Started with {} recipes from {}",
            book.len(),
            storage.path().display()
        );

        let importer = ImportManager::from_config(&config, ctx.as_ref());
        Ok(Self {
            ctx,
            config,
            model: Model::new(book, prefs),
            storage,
            importer,
            startup_warnings,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &RecipeBookStorage {
        &self.storage
    }

    pub fn startup_warnings(&self) -> &[String] {
        &self.startup_warnings
    }

    /// Parses and runs one line of input.
    pub fn execute(&mut self, text: &str) -> Result<CommandResult> {
        let command = parse_command(text).inspect_err(|e| {
            log::warn!("Rejected input '{}': {}", text.trim(), e);
        })?;
        self.run(command)
    }

    /// Runs an already parsed command, saving the recipe book when it changed
    /// and the preferences when the session ends.
    pub fn run(&mut self, command: Command) -> Result<CommandResult> {
        log::info!("Executing {}", command.word());
        let result = command
            .execute(&mut self.model, &self.importer)
            .inspect_err(|e| log::warn!("{} failed: {}", command.word(), e))?;

        if result.changed {
            self.storage.save(&self.model.book).map_err(|e| {
                log::error!("Could not save recipe book: {}", e);
                RecipeError::command(format!("Could not save data to file: {}", e))
            })?;
        }
        if result.exit {
            self.save_prefs();
        }
        Ok(result)
    }

    /// Writes the user preferences. Failures are logged only.
    pub fn save_prefs(&self) {
        if let Err(e) = storage::save_prefs(self.ctx.as_ref(), &self.model.prefs) {
            log::error!("Failed to save preferences: {:#}", e);
        }
    }
}
