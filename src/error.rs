//! Error types shared by the content and newsletter layers

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the post collection from its source.
///
/// Every variant is a load failure from the views' point of view.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content directory not found: {0:?}")]
    MissingSource(PathBuf),

    #[error("Content source unavailable: {0}")]
    Unavailable(String),
}

/// Newsletter signup failures
#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("Please enter your email address")]
    EmptyEmail,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Newsletter signup is disabled")]
    Disabled,

    #[error("Failed to store subscribers: {0}")]
    Storage(String),
}
