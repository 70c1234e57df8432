//! # Songlens Common Library
//!
//! Shared code for the songlens crates:
//! - Common error type
//! - TOML + environment configuration loading
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
