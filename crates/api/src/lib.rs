//! Country exchange API server library.
//!
//! Exposes config, state, error handling, routes and the refresh pipeline
//! so integration tests and the binary entrypoint share the same pieces.

pub mod config;
pub mod error;
pub mod handlers;
pub mod refresh;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
