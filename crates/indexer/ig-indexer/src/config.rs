//! Configuration for an indexing run.

use serde::{Deserialize, Serialize};

/// Immutable settings passed to the [`Walker`](crate::Walker).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Bucket being indexed
    pub bucket: String,

    /// Scan prefix; only directories under it receive index pages
    pub prefix: String,

    /// Upload generated pages (otherwise only report what would be uploaded)
    pub upload: bool,
}

impl IndexConfig {
    /// Create a dry-run configuration for the whole bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the scan prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable uploads.
    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    /// Prefix to pass to the listing, `None` when scanning the whole bucket.
    pub fn listing_prefix(&self) -> Option<&str> {
        if self.prefix.is_empty() {
            None
        } else {
            Some(self.prefix.as_str())
        }
    }
}
