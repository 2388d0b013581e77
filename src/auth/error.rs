//! Authentication Errors
//! Mission: One error type for login, token validation and authorization

use crate::auth::guard::Action;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;
use serde_json::json;
use std::fmt;

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    /// Login with a username the credential store does not know
    UnknownUser,
    /// Login with a password that does not match the stored hash
    BadPassword,
    /// No token was supplied
    MissingToken,
    /// Token is not a decodable three-segment JWT
    MalformedToken,
    /// Signature does not verify against the signing key
    BadSignature,
    /// Token is past its expiration
    Expired,
    /// Authenticated identity is not allowed to perform the action
    Forbidden { identity: String, action: Action },
    /// Token could not be signed
    Signing(jsonwebtoken::errors::Error),
    /// Credential store failure, passed through untouched
    Store(anyhow::Error),
}

impl AuthError {
    /// Classify a decode failure from `jsonwebtoken`
    pub(crate) fn from_decode(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::MalformedToken,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UnknownUser
            | AuthError::BadPassword
            | AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::BadSignature
            | AuthError::Expired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Signing(_) | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client
    pub fn public_message(&self) -> String {
        match self {
            // Same text for both so login cannot be used to enumerate users
            AuthError::UnknownUser | AuthError::BadPassword => {
                "Invalid username or password".to_string()
            }
            AuthError::MissingToken => "Missing authorization token".to_string(),
            AuthError::MalformedToken => {
                "Invalid authorization format. Use: Bearer {token}".to_string()
            }
            AuthError::BadSignature => "Invalid token signature".to_string(),
            AuthError::Expired => "Token has expired".to_string(),
            AuthError::Forbidden { .. } => self.to_string(),
            AuthError::Signing(_) | AuthError::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UnknownUser => write!(f, "Invalid username"),
            AuthError::BadPassword => write!(f, "Invalid password"),
            AuthError::MissingToken => write!(f, "Missing authorization token"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::BadSignature => write!(f, "Token signature does not verify"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::Forbidden { identity, action } => write!(
                f,
                "User {} is not authorized to {} the recipe",
                identity, action
            ),
            AuthError::Signing(e) => write!(f, "Failed to sign token: {}", e),
            AuthError::Store(e) => write!(f, "Credential store error: {:#}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Signing(e) => Some(e),
            AuthError::Store(e) => Some(&**e),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Signing(_) | AuthError::Store(_) = &self {
            tracing::error!("Auth failure: {}", self);
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}
