use recipe_core::RecipeError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid profile JSON {}: {source}", path.display())]
    Profile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Recipe(#[from] RecipeError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid start time {0:?}, expected HH:MM")]
    InvalidStart(String),

    #[error("no target servings given (use --servings or a profile)")]
    MissingServings,
}
