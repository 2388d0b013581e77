//! Middleware for observability.
//!
//! This module provides request logging with latency tracking.

pub mod logging;

pub use logging::request_logging_simple;
