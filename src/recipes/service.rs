//! Recipe Service
//! Mission: Gate every recipe mutation behind the authorization guard

use crate::auth::{Action, AuthError, AuthorizationGuard, Identity};
use crate::recipes::{
    error::RecipeError,
    models::{NewRecipe, Recipe},
    store::RecipeStore,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Failure of a recipe service call
#[derive(Debug)]
pub enum ServiceError {
    Auth(AuthError),
    Recipe(RecipeError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Auth(e) => write!(f, "{}", e),
            ServiceError::Recipe(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Auth(err)
    }
}

impl From<RecipeError> for ServiceError {
    fn from(err: RecipeError) -> Self {
        ServiceError::Recipe(err)
    }
}

pub struct RecipeService {
    store: Arc<RecipeStore>,
    guard: AuthorizationGuard,
}

impl RecipeService {
    pub fn new(store: Arc<RecipeStore>, guard: AuthorizationGuard) -> Self {
        Self { store, guard }
    }

    pub fn list(&self) -> Result<Vec<Recipe>, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn get(&self, id: i64) -> Result<Recipe, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn create(&self, identity: &Identity, recipe: NewRecipe) -> Result<Recipe, ServiceError> {
        // Recipes carry no owner yet, so the guard sees `None`
        self.guard.authorize(identity, Action::Create, None)?;
        check_payload(&recipe)?;

        let created = self.store.create(recipe)?;
        info!(user = %identity, recipe_id = created.id, "🍳 Recipe created");
        Ok(created)
    }

    pub fn update(
        &self,
        identity: &Identity,
        id: i64,
        recipe: NewRecipe,
    ) -> Result<Recipe, ServiceError> {
        self.guard.authorize(identity, Action::Update, None)?;
        check_payload(&recipe)?;

        let updated = self.store.update(id, recipe)?;
        info!(user = %identity, recipe_id = id, "✏️ Recipe updated");
        Ok(updated)
    }

    pub fn delete(&self, identity: &Identity, id: i64) -> Result<(), ServiceError> {
        self.guard.authorize(identity, Action::Delete, None)?;

        self.store.delete(id)?;
        info!(user = %identity, recipe_id = id, "🗑️ Recipe deleted");
        Ok(())
    }
}

fn check_payload(recipe: &NewRecipe) -> Result<(), RecipeError> {
    if recipe.title.trim().is_empty() {
        return Err(RecipeError::Invalid("title must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FnPolicy;

    fn pancakes() -> NewRecipe {
        NewRecipe {
            img_src: String::new(),
            title: "Pancakes".to_string(),
            description: "Fluffy".to_string(),
            ingredients: vec!["Flour".to_string(), "Milk".to_string(), "Egg".to_string()],
            steps: vec!["Whisk".to_string(), "Fry".to_string()],
        }
    }

    fn permissive_service() -> (RecipeService, Arc<RecipeStore>) {
        let store = Arc::new(RecipeStore::in_memory().unwrap());
        let service = RecipeService::new(store.clone(), AuthorizationGuard::permissive());
        (service, store)
    }

    fn deny_all_service() -> (RecipeService, Arc<RecipeStore>) {
        let store = Arc::new(RecipeStore::in_memory().unwrap());
        let guard = AuthorizationGuard::new(Arc::new(FnPolicy(
            |_: &Identity, _: Action, _: Option<&str>| false,
        )));
        (RecipeService::new(store.clone(), guard), store)
    }

    #[test]
    fn test_crud_with_permissive_guard() {
        let (service, _) = permissive_service();
        let alice = Identity::new("alice");

        let created = service.create(&alice, pancakes()).unwrap();
        assert_eq!(service.get(created.id).unwrap(), created);

        let mut changed = pancakes();
        changed.title = "Crepes".to_string();
        let updated = service.update(&alice, created.id, changed).unwrap();
        assert_eq!(updated.title, "Crepes");

        service.delete(&alice, created.id).unwrap();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_denied_create_never_touches_store() {
        let (service, store) = deny_all_service();

        let result = service.create(&Identity::new("mallory"), pancakes());
        match result {
            Err(ServiceError::Auth(AuthError::Forbidden { identity, action })) => {
                assert_eq!(identity, "mallory");
                assert_eq!(action, Action::Create);
            }
            other => panic!("Expected Forbidden, got {:?}", other),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_denied_update_and_delete_leave_recipe_intact() {
        let (service, store) = deny_all_service();
        let existing = store.create(pancakes()).unwrap();
        let mallory = Identity::new("mallory");

        let mut changed = pancakes();
        changed.title = "Ruined".to_string();
        assert!(matches!(
            service.update(&mallory, existing.id, changed),
            Err(ServiceError::Auth(AuthError::Forbidden { .. }))
        ));
        assert!(matches!(
            service.delete(&mallory, existing.id),
            Err(ServiceError::Auth(AuthError::Forbidden { .. }))
        ));

        assert_eq!(store.get(existing.id).unwrap(), existing);
    }

    #[test]
    fn test_guard_runs_before_not_found() {
        let (service, _) = deny_all_service();
        assert!(matches!(
            service.delete(&Identity::new("mallory"), 42),
            Err(ServiceError::Auth(AuthError::Forbidden { .. }))
        ));
    }

    #[test]
    fn test_missing_recipe_passes_through_not_found() {
        let (service, _) = permissive_service();
        let alice = Identity::new("alice");

        assert!(matches!(
            service.get(2),
            Err(ServiceError::Recipe(RecipeError::NotFound(2)))
        ));
        assert!(matches!(
            service.update(&alice, 2, pancakes()),
            Err(ServiceError::Recipe(RecipeError::NotFound(2)))
        ));
        assert!(matches!(
            service.delete(&alice, 2),
            Err(ServiceError::Recipe(RecipeError::NotFound(2)))
        ));
    }

    #[test]
    fn test_blank_title_rejected() {
        let (service, store) = permissive_service();
        let mut blank = pancakes();
        blank.title = "   ".to_string();

        assert!(matches!(
            service.create(&Identity::new("alice"), blank),
            Err(ServiceError::Recipe(RecipeError::Invalid(_)))
        ));
        assert!(store.list().unwrap().is_empty());
    }
}
