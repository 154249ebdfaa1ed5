//! Clients for the two upstream APIs feeding a refresh.
//!
//! [`HttpSources`] talks to the real endpoints with [`reqwest`]; anything
//! implementing [`DataSources`] can stand in for it.

pub mod client;
pub mod error;

pub use client::{fetch_all, DataSources, HttpSources, SourceConfig};
pub use error::SourceError;
