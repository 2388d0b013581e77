//! Recipe Module
//! Mission: Recipe records, their SQLite store, and the guarded mutation service

pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::RecipeError;
pub use models::{NewRecipe, Recipe};
pub use service::{RecipeService, ServiceError};
pub use store::RecipeStore;
