//! Core types and trait definitions for the Faro incident map.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod catalog;
pub mod error;
pub mod incident;
pub mod moderation;
pub mod store;

pub use error::{Error, Result};
