//! Domain logic for the country exchange service.
//!
//! Everything in this crate is free of I/O except the summary renderer,
//! which writes a PNG to a caller-supplied path.

pub mod country;
pub mod error;
pub mod gdp;
pub mod merge;
pub mod query;
pub mod summary;
pub mod types;
