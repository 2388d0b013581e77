//! Authentication Module
//! Mission: Stateless JWT login/validation and the authorization guard for recipe mutations

pub mod api;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use error::AuthError;
pub use guard::{Action, AllowAuthenticated, AuthorizationGuard, AuthorizationPolicy, FnPolicy};
pub use jwt::{TokenService, TOKEN_TTL_HOURS};
pub use middleware::auth_middleware;
pub use models::{Credential, Identity, IssuedToken};
pub use user_store::{CredentialStore, UserStore};
