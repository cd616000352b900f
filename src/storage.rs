// Manages local file storage for the recipe book and the user preferences.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to JsonRecipe or JsonIngredient serialization require incrementing
// RECIPE_BOOK_VERSION below so older builds refuse the file instead of mangling it.
use crate::context::AppContext;
use crate::error::{RecipeError, Result};
use crate::model::adapter::JsonRecipe;
use crate::model::{RecipeBook, UserPrefs};
use anyhow::Context;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

// Version history:
// - v0: Unversioned `{ "recipes": [...] }` documents
// - v1: Added the `version` field
pub const RECIPE_BOOK_VERSION: u32 = 1;

/// Wrapper struct for the versioned recipe book file
#[derive(Serialize, Deserialize)]
struct RecipeBookData {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    recipes: Vec<JsonRecipe>,
}

/// Tracks whether the last load of each recipe book file succeeded.
/// Saving is refused after a failed load so unreadable data is never overwritten.
static LOAD_STATE_MAP: OnceLock<Mutex<HashMap<PathBuf, LoadState>>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Uninitialized,
    Success,
    Failed,
}

impl LoadState {
    fn get(path: &Path) -> LoadState {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        *map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .unwrap_or(&LoadState::Uninitialized)
    }

    fn set(path: &Path, state: LoadState) {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), state);
    }
}

/// Helper to get a sidecar lock file path: `recipebook.json` -> `recipebook.json.lock`
fn get_lock_path(file_path: &Path) -> PathBuf {
    let mut lock_path = file_path.to_path_buf();
    if let Some(ext) = lock_path.extension() {
        let mut new_ext = ext.to_os_string();
        new_ext.push(".lock");
        lock_path.set_extension(new_ext);
    } else {
        lock_path.set_extension("lock");
    }
    lock_path
}

/// Runs `f` while holding an exclusive advisory lock on the sidecar lock file.
pub fn with_lock<F, T, E>(file_path: &Path, f: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: From<std::io::Error>,
{
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let lock_path = get_lock_path(file_path);
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    file.lock_exclusive()?;
    let result = f();
    file.unlock()?;
    result
}

/// Atomic write: Write to .tmp file then rename
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> anyhow::Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// JSON-backed store for one recipe book file.
#[derive(Debug, Clone)]
pub struct RecipeBookStorage {
    path: PathBuf,
}

impl RecipeBookStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for the book named in the user preferences.
    pub fn for_prefs(ctx: &dyn AppContext, prefs: &UserPrefs) -> Result<Self> {
        Ok(Self::new(
            ctx.resolve_recipe_book_path(&prefs.recipe_book_file_path)?,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates a recipe book document without locking.
    ///
    /// Returns `Ok(None)` when the file does not exist. Malformed JSON, a
    /// version newer than `RECIPE_BOOK_VERSION`, an invalid field value or a
    /// duplicate recipe all yield `RecipeError::DataConversion`.
    pub fn read(path: &Path) -> Result<Option<RecipeBook>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        let conversion = |reason: String| RecipeError::DataConversion {
            path: path.to_path_buf(),
            reason,
        };

        let data: RecipeBookData =
            serde_json::from_str(&json).map_err(|e| conversion(e.to_string()))?;
        if data.version > RECIPE_BOOK_VERSION {
            return Err(conversion(format!(
                "recipe book version {} is newer than supported version {}",
                data.version, RECIPE_BOOK_VERSION
            )));
        }
        if data.version < RECIPE_BOOK_VERSION {
            log::info!(
                "Reading {} as v{} (will be written as v{})",
                path.display(),
                data.version,
                RECIPE_BOOK_VERSION
            );
        }

        let recipes = data
            .recipes
            .iter()
            .map(JsonRecipe::to_model)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| conversion(e.to_string()))?;
        let book = RecipeBook::from_recipes(recipes).map_err(|e| conversion(e.to_string()))?;
        Ok(Some(book))
    }

    /// Loads the book, treating a missing file as an empty book.
    ///
    /// # Load State Tracking
    /// A failed load marks this path so that `save()` refuses to overwrite it.
    /// Callers must surface the error; falling back to an empty book silently
    /// and then saving would destroy the user's data.
    pub fn load(&self) -> Result<RecipeBook> {
        let result = with_lock(&self.path, || Self::read(&self.path))
            .map(Option::unwrap_or_default);
        match &result {
            Ok(book) => {
                log::debug!("Loaded {} recipes from {}", book.len(), self.path.display());
                LoadState::set(&self.path, LoadState::Success);
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", self.path.display(), e);
                LoadState::set(&self.path, LoadState::Failed);
            }
        }
        result
    }

    /// Returns `false` only when the last load of this file failed.
    pub fn can_save(&self) -> bool {
        match LoadState::get(&self.path) {
            LoadState::Uninitialized | LoadState::Success => true,
            LoadState::Failed => false,
        }
    }

    /// Saves the book in the current versioned format.
    pub fn save(&self, book: &RecipeBook) -> Result<()> {
        if !self.can_save() {
            return Err(anyhow::anyhow!(
                "Cannot save {}: previous load failed. This prevents overwriting data that couldn't be read.",
                self.path.display()
            )
            .into());
        }
        self.force_save(book)
    }

    /// Saves regardless of the load state, then clears the failed mark.
    pub fn force_save(&self, book: &RecipeBook) -> Result<()> {
        let data = RecipeBookData {
            version: RECIPE_BOOK_VERSION,
            recipes: book.recipes().iter().map(JsonRecipe::from).collect(),
        };
        let json = serde_json::to_string_pretty(&data).map_err(anyhow::Error::from)?;
        with_lock(&self.path, || atomic_write(&self.path, &json))?;
        LoadState::set(&self.path, LoadState::Success);
        log::debug!("Saved {} recipes to {}", book.len(), self.path.display());
        Ok(())
    }
}

/// Reads `preferences.json`; a missing file yields the defaults.
pub fn load_prefs(ctx: &dyn AppContext) -> anyhow::Result<UserPrefs> {
    let path = ctx.get_preferences_path()?;
    if !path.exists() {
        return Ok(UserPrefs::default());
    }
    let content = with_lock(&path, || fs::read_to_string(&path))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid preferences in {}", path.display()))
}

pub fn save_prefs(ctx: &dyn AppContext, prefs: &UserPrefs) -> anyhow::Result<()> {
    let path = ctx.get_preferences_path()?;
    let json = serde_json::to_string_pretty(prefs)?;
    with_lock(&path, || atomic_write(&path, &json))
}
