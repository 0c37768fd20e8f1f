//! End-to-end indexing tests using LocalStack.
//!
//! These tests list real objects, build the tree, and upload index pages
//! through the S3 publisher.

use crate::common::LocalStackTestContext;
use ig_error::{IgError, ListingError};
use ig_indexer::{
    BuildStats, IndexConfig, IndexStats, RetryConfig, S3Config, S3Publisher, Walker,
    build_tree_from_stream, check_bucket, create_s3_client, list_objects,
};

const BUCKET: &str = "ig-indexer-test";

/// List, build and walk `prefix` the way the CLI does.
async fn run_indexer(
    ctx: &LocalStackTestContext,
    prefix: &str,
    upload: bool,
) -> (BuildStats, IndexStats) {
    let s3_config = S3Config::new(BUCKET)
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials("test", "test");
    let client = create_s3_client(&s3_config).await.unwrap();
    let retry = RetryConfig::new().with_initial_backoff_ms(10);

    let config = IndexConfig::new(BUCKET)
        .with_prefix(prefix)
        .with_upload(upload);

    let stream = list_objects(&client, BUCKET, config.listing_prefix(), &retry);
    let (tree, build) = build_tree_from_stream(stream).await.unwrap();

    let walker = Walker::new(S3Publisher::new(client, BUCKET, retry), config);
    let stats = walker.walk(&tree).await;
    (build, stats)
}

async fn setup(prefix: &str) -> Option<LocalStackTestContext> {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return None;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.delete_prefix(BUCKET, prefix).await.unwrap();
    Some(ctx)
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_uploads_index_for_every_directory() {
    let prefix = "it-basic";
    let Some(ctx) = setup(prefix).await else {
        return;
    };

    ctx.put_text(BUCKET, "it-basic/a/b/file1.txt", "0123456789").await.unwrap();
    ctx.put_text(BUCKET, "it-basic/a/file2.txt", "01234567890123456789").await.unwrap();

    let (build, stats) = run_indexer(&ctx, prefix, true).await;

    assert_eq!(build.objects_ingested, 2);
    assert_eq!(stats.indexes_published, 3);
    assert!(!stats.has_errors());

    let mut keys = ctx.list_keys(BUCKET, prefix).await.unwrap();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "it-basic/a/b/file1.txt",
            "it-basic/a/b/index.html",
            "it-basic/a/file2.txt",
            "it-basic/a/index.html",
            "it-basic/index.html",
        ]
    );

    let (body, content_type) = ctx.get_object(BUCKET, "it-basic/a/index.html").await.unwrap();
    let html = String::from_utf8(body).unwrap();
    assert_eq!(content_type.as_deref(), Some("text/html; charset=UTF-8"));
    assert!(html.contains("<title>Index of /it-basic/a</title>"));
    assert!(html.contains(">file2.txt</a>"));
    assert!(html.contains("<td class=\"size\">20</td>"));

    ctx.delete_prefix(BUCKET, prefix).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_noindex_directory_is_not_indexed() {
    let prefix = "it-noindex";
    let Some(ctx) = setup(prefix).await else {
        return;
    };

    ctx.put_text(BUCKET, "it-noindex/x/.noindex", "").await.unwrap();
    ctx.put_text(BUCKET, "it-noindex/x/secret.txt", "s").await.unwrap();
    ctx.put_text(BUCKET, "it-noindex/x/pub/readme.txt", "r").await.unwrap();

    let (_, stats) = run_indexer(&ctx, prefix, true).await;
    assert_eq!(stats.directories_opted_out, 1);

    let keys = ctx.list_keys(BUCKET, prefix).await.unwrap();
    assert!(!keys.contains(&"it-noindex/x/index.html".to_string()));
    assert!(keys.contains(&"it-noindex/x/pub/index.html".to_string()));

    ctx.delete_prefix(BUCKET, prefix).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_dry_run_uploads_nothing() {
    let prefix = "it-dry";
    let Some(ctx) = setup(prefix).await else {
        return;
    };

    ctx.put_text(BUCKET, "it-dry/a/file.txt", "f").await.unwrap();

    let (_, stats) = run_indexer(&ctx, prefix, false).await;
    assert_eq!(stats.directories_indexed, 2);
    assert_eq!(stats.indexes_published, 0);

    let keys = ctx.list_keys(BUCKET, prefix).await.unwrap();
    assert_eq!(keys, vec!["it-dry/a/file.txt"]);

    ctx.delete_prefix(BUCKET, prefix).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_second_run_produces_identical_pages() {
    let prefix = "it-rerun";
    let Some(ctx) = setup(prefix).await else {
        return;
    };

    ctx.put_text(BUCKET, "it-rerun/a/b/c.txt", "c").await.unwrap();
    ctx.put_text(BUCKET, "it-rerun/d.txt", "d").await.unwrap();

    run_indexer(&ctx, prefix, true).await;
    let (first, _) = ctx.get_object(BUCKET, "it-rerun/a/index.html").await.unwrap();

    let (build, stats) = run_indexer(&ctx, prefix, true).await;
    let (second, _) = ctx.get_object(BUCKET, "it-rerun/a/index.html").await.unwrap();

    assert_eq!(build.index_pages_skipped, 3);
    assert!(!stats.has_errors());
    assert_eq!(first, second);

    ctx.delete_prefix(BUCKET, prefix).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_is_a_session_error() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let s3_config = S3Config::new("ig-indexer-does-not-exist")
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials("test", "test");
    let client = create_s3_client(&s3_config).await.unwrap();

    let result = check_bucket(&client, "ig-indexer-does-not-exist").await;
    assert!(matches!(result, Err(IgError::Listing(ListingError::Session(_)))));
}
