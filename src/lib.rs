//! Recipe Backend Library
//!
//! Recipe CRUD behind stateless JWT authentication. Exposes the services,
//! stores and router so the binary and integration tests share one wiring.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod recipes;
