//! S3 object listing with pagination support.

use async_stream::try_stream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use futures::Stream;
use ig_error::{IgError, ListingError, Result};
use tracing::debug;

use super::retry::{RetryConfig, S3Failure, with_retry};
use crate::ObjectRecord;

/// List objects in an S3 bucket under an optional prefix.
///
/// Returns a stream of [`ObjectRecord`]s, handling pagination automatically.
/// Each page request is retried according to `retry`; a page that still
/// fails yields a [`ListingError::Page`] and ends the stream.
///
/// Directory markers (keys ending with `/`) and empty keys are skipped.
/// Objects without a timestamp are reported at the Unix epoch.
///
/// # Example
///
/// ```ignore
/// use futures::{StreamExt, pin_mut};
///
/// let stream = list_objects(&client, "my-bucket", Some("releases"), &RetryConfig::default());
/// pin_mut!(stream);
///
/// while let Some(result) = stream.next().await {
///     let obj = result?;
///     println!("Found: {} ({} bytes)", obj.key, obj.size);
/// }
/// ```
pub fn list_objects<'a>(
    client: &'a Client,
    bucket: &'a str,
    prefix: Option<&'a str>,
    retry: &'a RetryConfig,
) -> impl Stream<Item = Result<ObjectRecord>> + 'a {
    try_stream! {
        let mut continuation_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            let token = continuation_token.take();
            let resp = with_retry(retry, "list_objects_v2", || {
                let mut req = client.list_objects_v2().bucket(bucket);

                if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
                    req = req.prefix(prefix);
                }

                if let Some(token) = &token {
                    req = req.continuation_token(token);
                }

                async move { req.send().await.map_err(S3Failure::from) }
            })
            .await
            .map_err(|e| IgError::from(ListingError::Page(format!("S3 list objects failed: {e}"))))?;

            page += 1;
            debug!(
                bucket = bucket,
                page = page,
                objects = resp.contents().len(),
                "Listed page"
            );

            for obj in resp.contents() {
                let key = obj.key().unwrap_or_default();

                // Skip directory markers and empty keys
                if key.is_empty() || key.ends_with('/') {
                    continue;
                }

                let last_modified = obj
                    .last_modified()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

                yield ObjectRecord {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified,
                };
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(str::to_string);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }
    }
}
