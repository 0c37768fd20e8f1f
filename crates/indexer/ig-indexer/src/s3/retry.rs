//! Retry logic for S3 operations.
//!
//! List page requests and index uploads are retried with exponential backoff
//! and jitter when the failure looks transient.

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Whether to add jitter to backoff times.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that never retries.
    pub fn disabled() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff in milliseconds.
    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Set the maximum backoff in milliseconds.
    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Backoff before retry number `attempt` (0-based), capped and
    /// optionally extended by up to 25% jitter.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let base_ms = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped_ms = base_ms.min(self.max_backoff_ms);

        let final_ms = if self.jitter {
            let jitter = rand::rng().random_range(0..=capped_ms / 4);
            capped_ms.saturating_add(jitter)
        } else {
            capped_ms
        };

        Duration::from_millis(final_ms)
    }
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// The error is transient and can be retried.
    Retryable,
    /// The error is permanent and should not be retried.
    NonRetryable,
}

/// S3 error codes worth retrying regardless of the status they come with.
const RETRYABLE_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "TooManyRequests",
    "RequestLimitExceeded",
    "RequestTimeout",
    "InternalError",
    "ServiceUnavailable",
];

/// Classify an S3 service error by its error code and HTTP status.
///
/// Throttling codes, 429 and 5xx responses are retried. Other 4xx responses
/// (missing buckets, credential and permission problems, malformed requests)
/// and anything else that carries a status are not. A failure without a
/// status never reached S3 and is retried.
pub fn classify_error(code: Option<&str>, status: Option<u16>) -> ErrorClassification {
    if code.is_some_and(|c| RETRYABLE_CODES.contains(&c)) {
        return ErrorClassification::Retryable;
    }

    match status {
        Some(429) | Some(500..=599) | None => ErrorClassification::Retryable,
        Some(_) => ErrorClassification::NonRetryable,
    }
}

/// A failed S3 request, reduced to what retry decisions and error reports need.
#[derive(Debug, Clone)]
pub struct S3Failure {
    code: Option<String>,
    status: Option<u16>,
    classification: ErrorClassification,
    message: String,
}

impl S3Failure {
    fn service(code: Option<&str>, status: Option<u16>, message: String) -> Self {
        Self {
            code: code.map(str::to_string),
            status,
            classification: classify_error(code, status),
            message,
        }
    }

    /// S3 error code, when the service answered with one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }
}

impl std::fmt::Display for S3Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E> From<SdkError<E, HttpResponse>> for S3Failure
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        let message = DisplayErrorContext(&err).to_string();

        match &err {
            SdkError::ServiceError(service) => Self::service(
                service.err().code(),
                Some(service.raw().status().as_u16()),
                message,
            ),
            // The request could not even be built; resending it cannot help.
            SdkError::ConstructionFailure(_) => Self {
                code: None,
                status: None,
                classification: ErrorClassification::NonRetryable,
                message,
            },
            // Timeouts, dispatch failures and unparseable responses
            _ => Self {
                code: None,
                status: err.raw_response().map(|r| r.status().as_u16()),
                classification: ErrorClassification::Retryable,
                message,
            },
        }
    }
}

/// Execute an async operation with retry logic.
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `operation_name` - Name of the operation for logging
/// * `operation` - The async operation to execute
///
/// # Returns
///
/// The result of the operation, or the last error once retries are exhausted
/// or a non-retryable error is seen.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, S3Failure>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, S3Failure>>,
{
    let mut attempt = 0;

    loop {
        let e = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if e.classification() == ErrorClassification::NonRetryable {
            warn!(
                operation = operation_name,
                attempt = attempt,
                code = ?e.code(),
                status = ?e.status(),
                error = %e,
                "Non-retryable error"
            );
            return Err(e);
        }

        if attempt >= config.max_retries {
            warn!(
                operation = operation_name,
                attempts = attempt + 1,
                error = %e,
                "Retries exhausted"
            );
            return Err(e);
        }

        let backoff = config.backoff_duration(attempt);
        warn!(
            operation = operation_name,
            attempt = attempt,
            error = %e,
            backoff_ms = backoff.as_millis(),
            "Retryable error, backing off"
        );
        sleep(backoff).await;
        attempt += 1;
    }
}
