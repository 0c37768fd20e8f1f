//! Directory tree reconstruction from object keys.
//!
//! Object storage has no directories, only keys. [`TreeBuilder`] splits each
//! key on `/` and rebuilds the implied hierarchy, propagating the newest
//! modification time up through every directory an object passes through.
//!
//! Nodes are stored in an arena owned by [`DirectoryTree`] and addressed by
//! [`DirId`]. The parent link is a plain index used only for navigation.

use std::collections::BTreeMap;
use std::ops::Index;

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt, pin_mut};
use ig_error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{INDEX_FILE_NAME, ObjectRecord, join_key};

/// Index of a directory node within a [`DirectoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirId(usize);

impl DirId {
    /// The root directory of every tree.
    pub const ROOT: DirId = DirId(0);
}

/// A file inside a directory: one listed object plus its basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    object: ObjectRecord,
}

impl FileEntry {
    /// The file name (basename of the key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full object key.
    pub fn key(&self) -> &str {
        &self.object.key
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.object.size
    }

    /// Last modified timestamp of the object.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.object.last_modified
    }
}

/// One directory level of the reconstructed hierarchy.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Full path from the bucket root, without trailing slash. Empty for root.
    prefix: String,

    /// Final path segment. Empty for root.
    name: String,

    /// Newest modification time of anything below this directory.
    last_modified: DateTime<Utc>,

    /// Enclosing directory, `None` for root.
    parent: Option<DirId>,

    subdirectories: BTreeMap<String, DirId>,
    files: BTreeMap<String, FileEntry>,
}

impl DirectoryNode {
    fn root() -> Self {
        Self {
            prefix: String::new(),
            name: String::new(),
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            parent: None,
            subdirectories: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }

    fn child(parent: DirId, prefix: String, name: &str) -> Self {
        Self {
            prefix,
            name: name.to_string(),
            parent: Some(parent),
            ..Self::root()
        }
    }

    /// Raise `last_modified` if `timestamp` is newer.
    fn touch(&mut self, timestamp: DateTime<Utc>) {
        if timestamp > self.last_modified {
            self.last_modified = timestamp;
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn parent(&self) -> Option<DirId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Immediate subdirectories, sorted by name.
    pub fn subdirectories(&self) -> impl Iterator<Item = (&str, DirId)> + '_ {
        self.subdirectories
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// Look up an immediate subdirectory by name.
    pub fn subdirectory(&self, name: &str) -> Option<DirId> {
        self.subdirectories.get(name).copied()
    }

    /// Files directly in this directory, sorted by name.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.files.values()
    }

    /// Look up a file in this directory by name.
    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.get(name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn subdirectory_count(&self) -> usize {
        self.subdirectories.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// The reconstructed hierarchy. Read-only once built.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryTree {
    /// Create a tree containing only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![DirectoryNode::root()],
        }
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.nodes[DirId::ROOT.0]
    }

    pub fn get(&self, id: DirId) -> Option<&DirectoryNode> {
        self.nodes.get(id.0)
    }

    /// The enclosing directory of `id`, if any.
    pub fn parent(&self, id: DirId) -> Option<&DirectoryNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Resolve a directory by its prefix. The empty prefix is the root.
    pub fn find(&self, prefix: &str) -> Option<DirId> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Some(DirId::ROOT);
        }

        prefix.split('/').try_fold(DirId::ROOT, |current, segment| {
            self.nodes[current.0].subdirectory(segment)
        })
    }

    /// Number of directories, root included.
    pub fn directory_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of files across all directories.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(DirectoryNode::file_count).sum()
    }

    fn node_mut(&mut self, id: DirId) -> &mut DirectoryNode {
        &mut self.nodes[id.0]
    }

    /// Descend into `segment` under `parent`, creating it if needed.
    fn child_or_insert(&mut self, parent: DirId, segment: &str) -> DirId {
        if let Some(id) = self.nodes[parent.0].subdirectory(segment) {
            return id;
        }

        let id = DirId(self.nodes.len());
        let prefix = join_key(&self.nodes[parent.0].prefix, segment);
        self.nodes.push(DirectoryNode::child(parent, prefix, segment));
        self.node_mut(parent)
            .subdirectories
            .insert(segment.to_string(), id);
        id
    }
}

impl Index<DirId> for DirectoryTree {
    type Output = DirectoryNode;

    fn index(&self, id: DirId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/// Counters collected while building a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Objects added to the tree as files
    pub objects_ingested: usize,

    /// Previously generated `index.html` objects that were ignored
    pub index_pages_skipped: usize,

    /// Records with an empty file name (empty key or trailing `/`) or an
    /// empty directory segment (leading `/`, `//`)
    pub records_rejected: usize,
}

/// Incrementally builds a [`DirectoryTree`] from object records.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: DirectoryTree,
    stats: BuildStats,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one listed object to the tree.
    pub fn insert(&mut self, record: ObjectRecord) {
        let (dirs, name) = match record.key.rsplit_once('/') {
            Some((dirs, name)) => (Some(dirs.to_string()), name.to_string()),
            None => (None, record.key.clone()),
        };

        if name == INDEX_FILE_NAME {
            debug!(key = %record.key, "Skipping generated index page");
            self.stats.index_pages_skipped += 1;
            return;
        }

        if name.is_empty() {
            debug!(key = %record.key, "Skipping record without a file name");
            self.stats.records_rejected += 1;
            return;
        }

        // A leading `/` or `//` inside the key would create a directory with
        // an empty name whose index page collides with its parent's.
        if dirs.as_deref().is_some_and(|d| d.split('/').any(str::is_empty)) {
            debug!(key = %record.key, "Skipping record with an empty path segment");
            self.stats.records_rejected += 1;
            return;
        }

        let mut current = DirId::ROOT;
        self.tree.node_mut(current).touch(record.last_modified);

        if let Some(dirs) = dirs {
            for segment in dirs.split('/') {
                current = self.tree.child_or_insert(current, segment);
                self.tree.node_mut(current).touch(record.last_modified);
            }
        }

        // Duplicate keys: the later record wins.
        self.tree.node_mut(current).files.insert(
            name.clone(),
            FileEntry {
                name,
                object: record,
            },
        );
        self.stats.objects_ingested += 1;
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Finish building and hand out the tree.
    pub fn finish(self) -> (DirectoryTree, BuildStats) {
        debug!(
            directories = self.tree.directory_count(),
            files = self.tree.file_count(),
            skipped_index_pages = self.stats.index_pages_skipped,
            rejected = self.stats.records_rejected,
            "Tree built"
        );
        (self.tree, self.stats)
    }
}

/// Build a tree from an in-memory listing.
pub fn build_tree<I>(records: I) -> (DirectoryTree, BuildStats)
where
    I: IntoIterator<Item = ObjectRecord>,
{
    let mut builder = TreeBuilder::new();
    for record in records {
        builder.insert(record);
    }
    builder.finish()
}

/// Build a tree from a listing stream.
///
/// The first listing error aborts the build.
pub async fn build_tree_from_stream<S>(stream: S) -> Result<(DirectoryTree, BuildStats)>
where
    S: Stream<Item = Result<ObjectRecord>>,
{
    pin_mut!(stream);

    let mut builder = TreeBuilder::new();
    while let Some(record) = stream.next().await {
        builder.insert(record?);
    }

    Ok(builder.finish())
}
