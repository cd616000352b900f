use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the user of the recipe book.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Command text could not be parsed
    #[error("{0}")]
    Parse(String),

    /// Command was well-formed but cannot be carried out
    #[error("{0}")]
    Command(String),

    /// A field value violates its constraints
    #[error("{0}")]
    IllegalValue(String),

    /// A stored or imported JSON document could not be turned into recipes
    #[error("Invalid values found in {}: {reason}", path.display())]
    DataConversion { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure in the storage plumbing (locking, atomic writes, preferences)
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RecipeError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    pub fn illegal(msg: impl Into<String>) -> Self {
        Self::IllegalValue(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
