//! Publishing of rendered index pages.
//!
//! This module provides the [`Publisher`] trait and the [`S3Publisher`]
//! implementation that stores pages back into the bucket they describe.

mod s3;

pub use s3::S3Publisher;

use async_trait::async_trait;
use ig_error::Result;

/// Trait for storing a rendered index page.
///
/// Implementations decide where the bytes end up. The walker only calls
/// `publish` when uploads are enabled, so implementations never need to
/// handle dry runs themselves.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Store `body` under `key` with the given content type.
    async fn publish(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}
