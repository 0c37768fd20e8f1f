//! ig-indexer - static directory listings for S3 prefixes.
//!
//! This crate turns a flat object listing into a directory hierarchy and
//! renders one `index.html` page per directory level. It provides:
//!
//! - S3 listing with pagination, retry and LocalStack support
//! - Tree reconstruction from `/`-delimited object keys
//! - Per-directory eligibility (`.noindex` opt-out, prefix scoping)
//! - HTML rendering with escaped, percent-encoded links
//! - A pre-order walker that publishes each page through a [`Publisher`]
//!
//! # Example
//!
//! ```ignore
//! use ig_indexer::s3::{S3Config, create_s3_client, list_objects};
//! use ig_indexer::{IndexConfig, RetryConfig, S3Publisher, Walker, build_tree_from_stream};
//!
//! let s3_config = S3Config::new("my-bucket").with_prefix("releases");
//! let client = create_s3_client(&s3_config).await?;
//! let retry = RetryConfig::default();
//!
//! let stream = list_objects(&client, "my-bucket", Some("releases"), &retry);
//! let (tree, build_stats) = build_tree_from_stream(stream).await?;
//!
//! let config = IndexConfig::new("my-bucket").with_prefix("releases").with_upload(true);
//! let publisher = S3Publisher::new(client, "my-bucket", retry);
//! let stats = Walker::new(publisher, config).walk(&tree).await;
//! eprintln!("Indexed {} directories", stats.directories_indexed);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eligibility;
pub mod publish;
pub mod render;
pub mod s3;
pub mod stats;
pub mod tree;
pub mod walker;

pub use config::IndexConfig;
pub use eligibility::{Eligibility, NOINDEX_MARKER, check_eligibility};
pub use publish::{Publisher, S3Publisher};
pub use render::{format_timestamp, render_index, render_index_bytes};
pub use s3::{RetryConfig, S3Config, check_bucket, create_s3_client, list_objects};
pub use stats::IndexStats;
pub use tree::{
    BuildStats, DirId, DirectoryNode, DirectoryTree, FileEntry, TreeBuilder, build_tree,
    build_tree_from_stream,
};
pub use walker::Walker;

/// File name of generated index pages.
pub const INDEX_FILE_NAME: &str = "index.html";

/// Content type used when publishing index pages.
pub const INDEX_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// One object from a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Size of the object in bytes
    pub size: u64,

    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,
}

impl ObjectRecord {
    /// Create a new object record.
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }

    /// The final `/`-delimited segment of the key.
    pub fn basename(&self) -> &str {
        basename(&self.key)
    }
}

/// Return the final `/`-delimited segment of a key, or the whole key.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Join a directory prefix and a name with `/`, omitting the separator
/// when the prefix is empty.
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Key under which the index page for directory `prefix` is stored.
pub fn index_key(prefix: &str) -> String {
    join_key(prefix, INDEX_FILE_NAME)
}
