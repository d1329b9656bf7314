//! burrow-report - tabular consumer lag reports from a Burrow server
//!
//! Fetches the configured clusters, topics and consumer groups from the
//! Burrow HTTP API and prints the selected report sections to stdout.

use anyhow::{Context, Result};
use burrow_report::args::Args;
use burrow_report::{BurrowClient, ReportOptions, Reporter, ResponseCache};
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Initialize tracing subscriber for structured logging
///
/// Logs go to stderr so that stdout carries nothing but the report.
fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(default_level)),
        )
        .init();
}

/// Log the effective run configuration
fn log_startup_info(args: &Args, options: &ReportOptions) {
    info!("Burrow server: {}/{}", args.url, args.api);
    info!(
        "Sections: {:?}, verbose: {}, decimal: {}",
        options.sections, options.verbose, options.decimal
    );
    if options.filters.topic.is_active() {
        info!("Topic filter: {:?}", args.filter_topic);
    }
    if options.filters.consumer.is_active() {
        info!("Consumer filter: {:?}", args.filter_consumer);
    }
}

/// Main entry point for burrow-report
///
/// 1. Parse command-line arguments and compile the name filters
/// 2. Build the HTTP client and an empty response cache
/// 3. Generate every enabled report section
/// 4. Write the report to stdout
///
/// Transport and decode errors are not recovered; they end the run with a
/// non-zero exit status.
fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let options = args
        .report_options()
        .context("Invalid report configuration")?;
    log_startup_info(&args, &options);

    let client = BurrowClient::new(&args.url, &args.api, args.debug)
        .context("Failed to initialize the Burrow HTTP client")?;
    let mut reporter = Reporter::new(ResponseCache::new(client), options);

    let mut report = reporter
        .report()
        .with_context(|| format!("Failed to build report from {}", args.url))?;
    if !report.ends_with('\n') {
        report.push('\n');
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .context("Failed to write report to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}
