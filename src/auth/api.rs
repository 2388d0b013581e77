//! Authentication API Endpoints
//! Mission: Provide login and token validation endpoints

use crate::api::ApiError;
use crate::auth::{
    error::AuthError,
    jwt::TokenService,
    models::{LoginRequest, LoginResponse, ValidateResponse},
};
use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(tokens): State<Arc<TokenService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    info!("🔐 Login attempt: {}", payload.username);

    let username = payload.username.clone();

    // bcrypt verification is CPU bound; keep it off the async workers
    let issued = tokio::task::spawn_blocking(move || {
        tokens.issue(&payload.username, &payload.password)
    })
    .await
    .map_err(|e| AuthError::Store(anyhow!("Login task failed: {}", e)))?;

    match issued {
        Ok(issued) => {
            info!("✅ Login successful: {}", username);
            Ok(Json(LoginResponse::from_issued(issued)))
        }
        Err(err) => {
            warn!("❌ Failed login attempt: {} ({})", username, err);
            Err(err.into())
        }
    }
}

/// Validate endpoint - GET /api/auth/validate
pub async fn validate(
    State(tokens): State<Arc<TokenService>>,
    headers: HeaderMap,
) -> Result<Json<ValidateResponse>, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let identity = tokens.validate(header)?;

    Ok(Json(ValidateResponse::from(identity)))
}
