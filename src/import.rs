// File: ./src/import.rs
//! Importing recipes from another recipe book file, and formatting recipes
//! back into the command text accepted by `add`.

use crate::config::Config;
use crate::context::AppContext;
use crate::error::{RecipeError, Result};
use crate::model::Recipe;
use crate::model::display::RecipeDisplay;
use crate::storage::RecipeBookStorage;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ImportManager {
    fallback_dir: Option<PathBuf>,
}

impl ImportManager {
    /// `fallback_dir` is searched for relative paths that do not exist in the working directory.
    pub fn new(fallback_dir: Option<PathBuf>) -> Self {
        Self { fallback_dir }
    }

    pub fn from_config(config: &Config, ctx: &dyn AppContext) -> Self {
        Self::new(config.import_directory(ctx))
    }

    /// Turns user input into the file to import.
    ///
    /// Blank input means no file was chosen and yields `Ok(None)`.
    pub fn resolve(&self, raw: &str) -> Result<Option<PathBuf>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let path = PathBuf::from(raw);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| raw.to_string());
            return Err(RecipeError::command(format!("{} is not a JSON file.", file)));
        }

        if path.is_absolute() || path.exists() {
            return Ok(Some(path));
        }
        if let Some(dir) = &self.fallback_dir
            && dir.join(&path).exists()
        {
            return Ok(Some(dir.join(&path)));
        }
        // Reported by import_recipes as a missing file.
        Ok(Some(path))
    }

    /// Reads recipes from `path` through the same validation as the main recipe book.
    pub fn import_recipes(&self, path: &Path) -> Result<Vec<Recipe>> {
        log::info!("Importing recipes from {}", path.display());
        match RecipeBookStorage::read(path) {
            Ok(Some(book)) => Ok(book.recipes().to_vec()),
            Ok(None) => Err(RecipeError::command(format!(
                "File not found: {}",
                path.display()
            ))),
            Err(e) => {
                log::warn!("Rejected import of {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Command text for `recipe`, to be appended to `add`.
    pub fn command_text(recipe: &Recipe) -> String {
        recipe.to_command_text()
    }
}
