//! Decides which directories receive an index page.

use serde::{Deserialize, Serialize};

use crate::tree::DirectoryNode;

/// A directory containing a file with this name is never indexed.
pub const NOINDEX_MARKER: &str = ".noindex";

/// Outcome of the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// The directory gets an index page
    Eligible,

    /// The directory contains a `.noindex` marker
    OptedOut,

    /// The directory lies outside the scanned prefix
    OutOfScope,
}

impl std::fmt::Display for Eligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligible => write!(f, "eligible"),
            Self::OptedOut => write!(f, "opted out"),
            Self::OutOfScope => write!(f, "out of scope"),
        }
    }
}

/// Check whether `node` should be indexed when scanning `scan_prefix`.
///
/// Rules, in order:
/// 1. a `.noindex` file opts the directory out
/// 2. the directory prefix must start with the scan prefix (both compared
///    without trailing `/`, as a plain string prefix)
pub fn check_eligibility(node: &DirectoryNode, scan_prefix: &str) -> Eligibility {
    if node.has_file(NOINDEX_MARKER) {
        return Eligibility::OptedOut;
    }

    let prefix = node.prefix().trim_end_matches('/');
    if !prefix.starts_with(scan_prefix.trim_end_matches('/')) {
        return Eligibility::OutOfScope;
    }

    Eligibility::Eligible
}
