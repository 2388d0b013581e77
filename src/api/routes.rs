use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Extension, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{api as auth_api, auth_middleware, AuthError, Identity, TokenService};
use crate::middleware::request_logging_simple;
use crate::recipes::{NewRecipe, Recipe, RecipeError, RecipeService, ServiceError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub tokens: Arc<TokenService>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Build auth routes (separate router with token service state)
    let auth_router = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/auth/validate", get(auth_api::validate))
        .with_state(state.tokens.clone());

    // Mutations require a valid bearer token
    let protected_routes = Router::new()
        .route("/api/recipes", post(create_recipe))
        .route("/api/recipes/:id", put(update_recipe).delete(delete_recipe))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/:id", get(get_recipe))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging_simple))
        .layer(CorsLayer::permissive())
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.recipes.list()?))
}

// Extractors are taken as `Result` so rejections render through `ApiError`

async fn get_recipe(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.recipes.get(id)?))
}

async fn create_recipe(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let Json(payload) = payload?;
    let created = state.recipes.create(&identity, payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_recipe(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.recipes.update(&identity, id, payload)?))
}

async fn delete_recipe(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.recipes.delete(&identity, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Request/Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Recipe(RecipeError),
    /// Request could not be extracted (bad JSON body or path parameter)
    Rejected { status: StatusCode, message: String },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Auth(e) => ApiError::Auth(e),
            ServiceError::Recipe(e) => ApiError::Recipe(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::Recipe(RecipeError::Database(err)) => {
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Recipe(err @ RecipeError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Recipe(err @ RecipeError::Invalid(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Rejected { status, message } => (status, message),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
