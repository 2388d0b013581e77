//! JWT Token Service
//! Mission: Issue signed tokens from verified credentials and validate them statelessly

use crate::auth::{
    error::AuthError,
    models::{Claims, Identity, IssuedToken},
    user_store::CredentialStore,
};
use anyhow::Context;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::debug;

/// Fixed token lifetime
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Minimum signing key length for HS256 (256 bits)
pub const MIN_SECRET_BYTES: usize = 32;

/// Issues and validates HS256 access tokens
pub struct TokenService {
    credentials: Arc<dyn CredentialStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service signing with `secret`
    pub fn new(credentials: Arc<dyn CredentialStore>, secret: &[u8]) -> Self {
        Self::with_clock(credentials, secret, Arc::new(DefaultClock))
    }

    pub fn with_clock(
        credentials: Arc<dyn CredentialStore>,
        secret: &[u8],
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock with zero leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            credentials,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Verify `username`/`password` and sign a token for that user
    pub fn issue(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let Some(credential) = self
            .credentials
            .find_by_username(username)
            .map_err(AuthError::Store)?
        else {
            // Unknown users pay the same bcrypt cost as a wrong password
            let _ = bcrypt::verify(password, self.credentials.dummy_hash());
            return Err(AuthError::UnknownUser);
        };

        let matches = bcrypt::verify(password, &credential.password_hash)
            .context("Failed to verify password")
            .map_err(AuthError::Store)?;
        if !matches {
            return Err(AuthError::BadPassword);
        }

        let issued_at = self.clock.utc();
        let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);

        let claims = Claims {
            sub: credential.username,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        debug!(
            "Generating JWT for user {}, expires in {}h",
            claims.sub, TOKEN_TTL_HOURS
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Validate a raw token (optionally `Bearer `-prefixed) and return its subject
    pub fn validate(&self, raw: &str) -> Result<Identity, AuthError> {
        let token = strip_scheme(raw);
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::from_decode)?;

        if self.clock.utc().timestamp() >= decoded.claims.exp {
            return Err(AuthError::Expired);
        }

        debug!("Validated JWT for user {}", decoded.claims.sub);

        Ok(Identity::new(decoded.claims.sub))
    }
}

/// Remove an optional `Bearer` scheme label and surrounding whitespace
fn strip_scheme(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("bearer") {
        return "";
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => trimmed,
    }
}
