//! ig-indexer CLI
//!
//! Generates static index.html directory listings for an S3 prefix.

use clap::Parser;

mod args;
mod run;

use args::{Cli, ReportFormat};
use run::RunReport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for the JSON report)
    run::init_logging(args.log_level)?;

    let format = args.report;
    let report = run::execute(args).await?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_summary(&report),
    }

    Ok(())
}

/// Print a human-readable run summary to stderr.
fn print_summary(report: &RunReport) {
    let walk = &report.walk;

    eprintln!();
    if report.upload {
        eprintln!("Indexing completed:");
    } else {
        eprintln!("Indexing completed (dry run, nothing uploaded):");
    }
    eprintln!("  Objects listed:       {}", report.build.objects_ingested);
    eprintln!("  Index pages ignored:  {}", report.build.index_pages_skipped);
    eprintln!("  Directories:          {}", report.directories);
    eprintln!("  Files:                {}", report.files);
    eprintln!("  Directories indexed:  {}", walk.directories_indexed);
    eprintln!("  Opted out (.noindex): {}", walk.directories_opted_out);
    eprintln!("  Outside prefix:       {}", walk.directories_out_of_scope);
    eprintln!("  Pages uploaded:       {}", walk.indexes_published);
    eprintln!("  Errors:               {}", walk.error_count());

    if let Some(duration) = walk.duration() {
        eprintln!(
            "  Duration:             {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }

    for error in &walk.errors {
        eprintln!("  Error: {}", error);
    }
}
