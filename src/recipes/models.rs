//! Recipe Models

use serde::{Deserialize, Serialize};

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub img_src: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// Recipe payload for create and full-replacement update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    #[serde(default)]
    pub img_src: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl NewRecipe {
    /// Attach a store-assigned id
    pub fn with_id(self, id: i64) -> Recipe {
        Recipe {
            id,
            img_src: self.img_src,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            steps: self.steps,
        }
    }
}
