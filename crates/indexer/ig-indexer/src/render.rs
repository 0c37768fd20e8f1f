//! HTML rendering of directory index pages.
//!
//! Pages are self-contained: styling is inlined and every link is an
//! absolute path within the bucket. Names, prefixes and keys are escaped by
//! `maud`; link targets are additionally percent-encoded per path segment.

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::tree::{DirId, DirectoryTree};

const STYLE: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Helvetica,Arial,sans-serif;margin:2em;color:#222}\
h1{font-size:1.4em;font-weight:normal;border-bottom:1px solid #ddd;padding-bottom:.4em}\
table{border-collapse:collapse;min-width:40em}\
th,td{text-align:left;padding:.2em 1.5em .2em 0;white-space:nowrap}\
th{border-bottom:1px solid #ddd}\
td.size,th.size{text-align:right}\
a{color:#0645ad;text-decoration:none}\
a:hover{text-decoration:underline}";

/// Timestamp format used in listings, e.g. `02-Jan-2006 15:04`.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M";

/// Format a timestamp for a listing row.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Percent-encode each `/`-delimited segment of a path.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Link target for a directory prefix. The root is `/`.
fn directory_href(prefix: &str) -> String {
    if prefix.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", encode_path(prefix))
    }
}

fn file_href(key: &str) -> String {
    format!("/{}", encode_path(key))
}

/// Render the index page for directory `id`.
pub fn render_index(tree: &DirectoryTree, id: DirId) -> Markup {
    let node = &tree[id];
    let title = format!("Index of /{}", node.prefix());

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (title) }
                table {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Last modified" }
                            th.size { "Size" }
                        }
                    }
                    tbody {
                        @if let Some(parent) = tree.parent(id) {
                            tr.parent {
                                td { a href=(directory_href(parent.prefix())) { "../" } }
                                td {}
                                td.size { "-" }
                            }
                        }
                        @for (name, child_id) in node.subdirectories() {
                            @let child = &tree[child_id];
                            tr.dir {
                                td { a href=(directory_href(child.prefix())) { (name) "/" } }
                                td { (format_timestamp(child.last_modified())) }
                                td.size { "-" }
                            }
                        }
                        @for file in node.files() {
                            tr.file {
                                td { a href=(file_href(file.key())) { (file.name()) } }
                                td { (format_timestamp(file.last_modified())) }
                                td.size { (file.size()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render the index page for directory `id` as UTF-8 bytes.
pub fn render_index_bytes(tree: &DirectoryTree, id: DirId) -> Vec<u8> {
    render_index(tree, id).into_string().into_bytes()
}
