//! Authentication Middleware
//! Mission: Protect mutating endpoints with JWT validation

use crate::auth::{error::AuthError, jwt::TokenService};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Auth middleware that validates the `Authorization` header.
///
/// On success the caller's [`Identity`](crate::auth::models::Identity) is
/// stored in the request extensions for handlers to pick up with
/// `Extension<Identity>`.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let identity = tokens.validate(header)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
