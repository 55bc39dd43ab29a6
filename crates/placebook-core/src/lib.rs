//! Core types and trait definitions for the Placebook places service.
//!
//! This crate is free of HTTP and database dependencies. The store backend
//! and the API layer both depend on it.

pub mod error;
pub mod place;
pub mod store;
pub mod user;

pub use error::{Error, Result};
