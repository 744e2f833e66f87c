//! Core types and trait definitions for the Vestor investor registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod investor;
pub mod mail;
pub mod media;
pub mod query;
pub mod status;
pub mod store;

pub use error::{Error, Result};
