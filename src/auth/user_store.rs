//! User Storage
//! Mission: Store user credentials in SQLite and look them up by username

use crate::auth::models::Credential;
use anyhow::{bail, Context, Result};
use bcrypt::hash;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

/// Read-only credential lookup consumed by the token service
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>>;

    /// A bcrypt hash at the store's cost that matches no real password.
    ///
    /// Verified against when a username is unknown, so a miss costs as much
    /// as a wrong password.
    fn dummy_hash(&self) -> &str;
}

const DUMMY_PASSWORD: &str = "recipe-backend-unknown-user";

/// User storage with SQLite backend
pub struct UserStore {
    conn: Mutex<Connection>,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl UserStore {
    /// Open (or create) the user database at `db_path`
    pub fn new(db_path: &str, bcrypt_cost: u32) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open user db at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        Self::from_connection(conn, bcrypt_cost)
    }

    /// Private in-memory database, used by tests and throwaway runs
    pub fn in_memory(bcrypt_cost: u32) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory user db")?;
        Self::from_connection(conn, bcrypt_cost)
    }

    fn from_connection(conn: Connection, bcrypt_cost: u32) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        let dummy_hash = hash(DUMMY_PASSWORD, bcrypt_cost).context("Failed to hash dummy password")?;

        Ok(Self {
            conn: Mutex::new(conn),
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Create a new user, hashing the password with bcrypt
    pub fn create_user(&self, username: &str, password: &str) -> Result<Credential> {
        let username = username.trim();
        if username.is_empty() {
            bail!("Username must not be empty");
        }
        if password.is_empty() {
            bail!("Password must not be empty");
        }

        let password_hash = hash(password, self.bcrypt_cost).context("Failed to hash password")?;
        let created_at = Utc::now().to_rfc3339();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, created_at],
        )
        .with_context(|| format!("Failed to insert user {}", username))?;

        let credential = Credential {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash,
            created_at,
        };

        info!("✅ Created user: {} ({})", credential.username, credential.id);

        Ok(credential)
    }

    /// Number of stored users
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")?;
        Ok(count)
    }
}

impl CredentialStore for UserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
        )?;

        let credential = stmt
            .query_row(params![username], |row| {
                Ok(Credential {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .optional()
            .context("Failed to look up user")?;

        Ok(credential)
    }

    fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}
