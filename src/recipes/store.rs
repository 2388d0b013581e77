//! SQLite-backed Recipe Storage
//!
//! Ingredients and steps are kept as JSON arrays in TEXT columns so their
//! order survives every round trip.

use crate::recipes::{
    error::RecipeError,
    models::{NewRecipe, Recipe},
};
use anyhow::Context;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    img_src TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    ingredients_json TEXT NOT NULL DEFAULT '[]',
    steps_json TEXT NOT NULL DEFAULT '[]',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

const SELECT_COLUMNS: &str = "id, img_src, title, description, ingredients_json, steps_json";

pub type Result<T> = std::result::Result<T, RecipeError>;

/// Keyed CRUD store for recipes
pub struct RecipeStore {
    conn: Mutex<Connection>,
}

impl RecipeStore {
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open recipe db at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        info!("📚 Recipe store opened at: {}", db_path);
        Self::from_connection(conn)
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory recipe db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize recipe schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn create(&self, recipe: NewRecipe) -> Result<Recipe> {
        let ingredients_json = serde_json::to_string(&recipe.ingredients)?;
        let steps_json = serde_json::to_string(&recipe.steps)?;
        let now = Utc::now().timestamp();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO recipes (img_src, title, description, ingredients_json, steps_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                recipe.img_src,
                recipe.title,
                recipe.description,
                ingredients_json,
                steps_json,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Stored recipe {} ({})", id, recipe.title);
        Ok(recipe.with_id(id))
    }

    pub fn get(&self, id: i64) -> Result<Recipe> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM recipes WHERE id = ?1",
            SELECT_COLUMNS
        ))?;

        stmt.query_row(params![id], row_to_recipe)
            .optional()?
            .ok_or(RecipeError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Recipe>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM recipes ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;

        let recipes = stmt
            .query_map([], row_to_recipe)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Replace every field of an existing recipe
    pub fn update(&self, id: i64, recipe: NewRecipe) -> Result<Recipe> {
        let ingredients_json = serde_json::to_string(&recipe.ingredients)?;
        let steps_json = serde_json::to_string(&recipe.steps)?;

        let conn = self.conn.lock();
        let rows_affected = conn.execute(
            "UPDATE recipes
             SET img_src = ?2, title = ?3, description = ?4,
                 ingredients_json = ?5, steps_json = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                id,
                recipe.img_src,
                recipe.title,
                recipe.description,
                ingredients_json,
                steps_json,
                Utc::now().timestamp(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(RecipeError::NotFound(id));
        }

        debug!("Updated recipe {}", id);
        Ok(recipe.with_id(id))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let rows_affected = conn.execute("DELETE FROM recipes WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(RecipeError::NotFound(id));
        }

        debug!("Deleted recipe {}", id);
        Ok(())
    }
}

fn row_to_recipe(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        img_src: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        ingredients: json_column(row, 4)?,
        steps: json_column(row, 5)?,
    })
}

fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn noodles() -> NewRecipe {
        NewRecipe {
            img_src: "https://example.com/noodles.jpg".to_string(),
            title: "Stir Fried Noodles".to_string(),
            description: "A quick and tasty stir-fried noodle recipe.".to_string(),
            ingredients: vec![
                "Egg noodles".to_string(),
                "Soy sauce".to_string(),
                "Garlic cloves".to_string(),
                "Sesame oil".to_string(),
            ],
            steps: vec![
                "Cook the egg noodles.".to_string(),
                "Stir-fry garlic in sesame oil.".to_string(),
                "Add noodles and soy sauce.".to_string(),
            ],
        }
    }

    fn salmon() -> NewRecipe {
        NewRecipe {
            img_src: "https://example.com/salmon.png".to_string(),
            title: "Dijon Mustard Salmon".to_string(),
            description: "Baked salmon with a mustard glaze.".to_string(),
            ingredients: vec!["Salmon fillets".to_string(), "Dijon mustard".to_string()],
            steps: vec!["Preheat oven to 200°C.".to_string(), "Bake 12 minutes.".to_string()],
        }
    }

    #[test]
    fn test_create_and_get_preserves_order() {
        let store = RecipeStore::in_memory().unwrap();

        let created = store.create(noodles()).unwrap();
        let fetched = store.get(created.id).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.ingredients, noodles().ingredients);
        assert_eq!(fetched.steps, noodles().steps);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = RecipeStore::in_memory().unwrap();
        assert!(matches!(store.get(2), Err(RecipeError::NotFound(2))));
    }

    #[test]
    fn test_list_in_id_order() {
        let store = RecipeStore::in_memory().unwrap();
        assert!(store.list().unwrap().is_empty());

        let first = store.create(noodles()).unwrap();
        let second = store.create(salmon()).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let store = RecipeStore::in_memory().unwrap();
        let created = store.create(noodles()).unwrap();

        let updated = store.update(created.id, salmon()).unwrap();
        assert_eq!(updated, salmon().with_id(created.id));
        assert_eq!(store.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = RecipeStore::in_memory().unwrap();
        assert!(matches!(
            store.update(2, salmon()),
            Err(RecipeError::NotFound(2))
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let store = RecipeStore::in_memory().unwrap();
        let created = store.create(noodles()).unwrap();

        store.delete(created.id).unwrap();
        assert!(matches!(
            store.get(created.id),
            Err(RecipeError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(created.id),
            Err(RecipeError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_backed_store_persists() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();

        let id = {
            let store = RecipeStore::new(db_path).unwrap();
            store.create(noodles()).unwrap().id
        };

        let reopened = RecipeStore::new(db_path).unwrap();
        assert_eq!(reopened.get(id).unwrap().title, "Stir Fried Noodles");
    }
}
