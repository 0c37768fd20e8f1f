//! S3 client, listing and retry support.
//!
//! This module provides the S3 side of index generation:
//! - Client configuration with LocalStack support
//! - Paginated object listing as a stream of [`ObjectRecord`](crate::ObjectRecord)s
//! - Exponential backoff for transient S3 errors

mod client;
mod list;
mod retry;

pub use client::{S3Config, check_bucket, create_s3_client};
pub use list::list_objects;
pub use retry::{ErrorClassification, RetryConfig, S3Failure, classify_error, with_retry};
