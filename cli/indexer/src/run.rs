//! Main execution logic for the ig-indexer CLI.

use anyhow::Result;
use ig_indexer::{
    BuildStats, IndexConfig, IndexStats, RetryConfig, S3Config, S3Publisher, Walker,
    build_tree_from_stream, check_bucket, create_s3_client, list_objects,
};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::fmt;

use crate::args::{Cli, LogLevel};

/// Initialize logging.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr); // stdout is reserved for the JSON report

    subscriber.init();

    Ok(())
}

/// Everything a run produced, for the final report.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub bucket: String,
    pub prefix: String,
    pub upload: bool,
    pub directories: usize,
    pub files: usize,
    pub build: BuildStats,
    pub walk: IndexStats,
}

/// Execute an indexing run with the provided arguments.
///
/// Listing failures abort the run and are returned as errors. Failures to
/// publish individual pages are reported in the returned [`RunReport`].
pub async fn execute(args: Cli) -> Result<RunReport> {
    let mut s3_config = S3Config::new(&args.bucket)
        .with_region(&args.region)
        .with_prefix(&args.prefix)
        .with_timeout(args.timeout);

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    let s3_client = create_s3_client(&s3_config).await?;
    check_bucket(&s3_client, &args.bucket).await?;

    let retry = RetryConfig::new().with_max_retries(args.max_retries);
    let config = IndexConfig::new(&args.bucket)
        .with_prefix(&args.prefix)
        .with_upload(args.upload);

    info!(
        bucket = %config.bucket,
        prefix = %config.prefix,
        upload = config.upload,
        "Listing objects"
    );

    let stream = list_objects(&s3_client, &config.bucket, config.listing_prefix(), &retry);
    let (tree, build) = build_tree_from_stream(stream).await?;

    info!(
        objects = build.objects_ingested,
        directories = tree.directory_count(),
        skipped_index_pages = build.index_pages_skipped,
        "Directory tree built"
    );

    let publisher = S3Publisher::new(s3_client, &args.bucket, retry);
    let walker = Walker::new(publisher, config);
    let walk = walker.walk(&tree).await;

    Ok(RunReport {
        bucket: args.bucket,
        prefix: args.prefix,
        upload: args.upload,
        directories: tree.directory_count(),
        files: tree.file_count(),
        build,
        walk,
    })
}
