//! Shared types for the store-hours workspace: error type and configuration.

pub mod config;
pub mod error;

pub use error::{Error, Result};
