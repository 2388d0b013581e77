use std::fmt;

/// Recipe store errors
#[derive(Debug)]
pub enum RecipeError {
    /// No recipe with this id
    NotFound(i64),
    /// Payload rejected before reaching the store
    Invalid(String),
    Database(anyhow::Error),
}

impl fmt::Display for RecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeError::NotFound(id) => write!(f, "Recipe with id {} not found", id),
            RecipeError::Invalid(msg) => write!(f, "Invalid recipe: {}", msg),
            RecipeError::Database(e) => write!(f, "Recipe store error: {:#}", e),
        }
    }
}

impl std::error::Error for RecipeError {}

impl From<rusqlite::Error> for RecipeError {
    fn from(err: rusqlite::Error) -> Self {
        RecipeError::Database(err.into())
    }
}

impl From<serde_json::Error> for RecipeError {
    fn from(err: serde_json::Error) -> Self {
        RecipeError::Database(err.into())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        RecipeError::Database(err)
    }
}
