//! Tree walk that renders and publishes index pages.

use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::eligibility::{Eligibility, check_eligibility};
use crate::publish::Publisher;
use crate::render::render_index_bytes;
use crate::stats::IndexStats;
use crate::tree::{DirId, DirectoryTree};
use crate::{INDEX_CONTENT_TYPE, index_key};

/// Visits every directory of a tree and publishes its index page.
///
/// Directories are visited in pre-order, children sorted by name, using an
/// explicit stack so arbitrarily deep key hierarchies cannot exhaust the
/// call stack. A directory that is skipped or fails to publish does not
/// affect its siblings or descendants.
pub struct Walker<P: Publisher> {
    publisher: P,
    config: IndexConfig,
}

impl<P: Publisher> Walker<P> {
    /// Create a new Walker.
    ///
    /// `publisher` is only called when `config.upload` is set.
    pub fn new(publisher: P, config: IndexConfig) -> Self {
        Self { publisher, config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Walk the whole tree.
    ///
    /// Per-directory failures are logged and collected in the returned
    /// statistics; they never stop the walk.
    pub async fn walk(&self, tree: &DirectoryTree) -> IndexStats {
        let mut stats = IndexStats::new();

        debug!(
            bucket = %self.config.bucket,
            prefix = %self.config.prefix,
            upload = self.config.upload,
            directories = tree.directory_count(),
            "Starting walk"
        );

        let mut stack = vec![DirId::ROOT];
        while let Some(id) = stack.pop() {
            stats.record_visited();

            let children: Vec<DirId> = tree[id].subdirectories().map(|(_, child)| child).collect();
            stack.extend(children.into_iter().rev());

            self.index_directory(tree, id, &mut stats).await;
        }

        stats.complete();

        debug!(
            visited = stats.directories_visited,
            indexed = stats.directories_indexed,
            skipped = stats.directories_skipped(),
            published = stats.indexes_published,
            errors = stats.error_count(),
            "Walk completed"
        );

        stats
    }

    async fn index_directory(&self, tree: &DirectoryTree, id: DirId, stats: &mut IndexStats) {
        let node = &tree[id];

        match check_eligibility(node, &self.config.prefix) {
            Eligibility::Eligible => {}
            Eligibility::OptedOut => {
                debug!(prefix = %node.prefix(), "Skipping directory with .noindex marker");
                stats.record_opted_out();
                return;
            }
            Eligibility::OutOfScope => {
                debug!(
                    prefix = %node.prefix(),
                    scan_prefix = %self.config.prefix,
                    "Skipping directory outside scan prefix"
                );
                stats.record_out_of_scope();
                return;
            }
        }

        let body = render_index_bytes(tree, id);
        let key = index_key(node.prefix());
        stats.record_rendered(body.len());

        if !self.config.upload {
            info!(
                key = %key,
                directories = node.subdirectory_count(),
                files = node.file_count(),
                "Would upload index (dry run)"
            );
            return;
        }

        info!(
            key = %key,
            directories = node.subdirectory_count(),
            files = node.file_count(),
            "Uploading index"
        );

        match self.publisher.publish(&key, body, INDEX_CONTENT_TYPE).await {
            Ok(()) => stats.record_published(),
            Err(e) => {
                warn!(prefix = %node.prefix(), key = %key, error = %e, "Failed to publish index");
                stats.record_error(format!("/{}: {}", node.prefix(), e));
            }
        }
    }
}
