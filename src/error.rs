//! Error handling for Fundwatch
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("holdings error: {0}")]
    Holdings(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tracker operations
pub type Result<T> = anyhow::Result<T>;
