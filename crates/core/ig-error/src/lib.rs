//! Error types for s3-indexgen.
//!
//! This crate provides:
//! - [`IgError`] - Top-level error enum for listing, upload and configuration errors
//! - Domain-specific errors ([`ListingError`], [`UploadError`])
//!
//! Listing and configuration errors abort a run. Upload errors only affect the
//! directory whose page failed to store.

use thiserror::Error;

/// Top-level error type for s3-indexgen.
#[derive(Error, Debug)]
pub enum IgError {
    /// Object listing errors (session, pagination)
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Index upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while enumerating objects under a prefix.
#[derive(Error, Debug)]
pub enum ListingError {
    /// Failed to establish a listing session (client setup, credentials)
    #[error("Session failed: {0}")]
    Session(String),

    /// A list page request failed
    #[error("List page failed: {0}")]
    Page(String),
}

/// Errors raised while storing a generated index page.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The put request for `key` failed
    #[error("Put {key} failed: {message}")]
    Put { key: String, message: String },
}

/// Result type alias using IgError.
pub type Result<T> = std::result::Result<T, IgError>;
