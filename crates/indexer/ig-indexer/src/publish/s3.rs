//! S3 publisher for index pages.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use ig_error::{Result, UploadError};
use tracing::debug;

use super::Publisher;
use crate::s3::{RetryConfig, S3Failure, with_retry};

/// Uploads index pages with `PutObject`, retrying transient failures.
pub struct S3Publisher {
    client: Client,
    bucket: String,
    retry: RetryConfig,
}

impl S3Publisher {
    /// Create a publisher for `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            retry,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn publish(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let size = body.len();

        with_retry(&self.retry, "put_object", || {
            let req = self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .content_type(content_type)
                .body(ByteStream::from(body.clone()));

            async move { req.send().await.map_err(S3Failure::from) }
        })
        .await
        .map_err(|e| UploadError::Put {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        debug!(bucket = %self.bucket, key = key, bytes = size, "Uploaded index");
        Ok(())
    }
}
