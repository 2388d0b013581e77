//! Runtime configuration
//! Mission: Load settings and the signing secret once at startup

use crate::auth::jwt::MIN_SECRET_BYTES;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_FILENAME: &str = "recipes.db";

/// Settings shared by every subcommand.
///
/// The signing secret is loaded separately with [`jwt_secret_from_env`] so
/// commands that never sign tokens do not need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database_path = resolve_data_path(lookup("DATABASE_PATH"), DEFAULT_DB_FILENAME);

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid BCRYPT_COST: {}", raw))?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        Ok(Self {
            bind_addr,
            database_path,
            bcrypt_cost,
        })
    }
}

/// Read the token signing secret from `JWT_SECRET`
pub fn jwt_secret_from_env() -> Result<String> {
    jwt_secret_from_lookup(|key| env::var(key).ok())
}

/// Read the signing secret from an arbitrary key lookup; at least 32 bytes
pub fn jwt_secret_from_lookup<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let secret = lookup("JWT_SECRET").context("JWT_SECRET must be set (at least 32 bytes)")?;
    if secret.len() < MIN_SECRET_BYTES {
        bail!(
            "JWT_SECRET is {} bytes; HS256 needs at least {}",
            secret.len(),
            MIN_SECRET_BYTES
        );
    }
    Ok(secret)
}

fn default_data_path(filename: &str) -> String {
    // Anchor defaults to the crate directory
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    base.join(filename).to_string_lossy().to_string()
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return default_data_path(default_filename);
    };

    if raw == ":memory:" {
        return raw;
    }

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Treat relative paths as relative to the crate dir, not the caller's cwd.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(p)
        .to_string_lossy()
        .to_string()
}

/// Load `.env` from the cwd (and parents) and from the crate directory
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
