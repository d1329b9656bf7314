//! Command-line argument types for burrow-report
//!
//! This module contains the clap `Args` struct and its conversion into the
//! library's report options.

use crate::aggregate::Filters;
use crate::error::Result;
use crate::filter::NameFilter;
use crate::gateway::{DEFAULT_API, DEFAULT_URL};
use crate::reporter::{ReportOptions, Sections};
use clap::Parser;

/// Command-line arguments for a Burrow report run
#[derive(Parser, Debug)]
#[command(name = "burrow-report")]
#[command(about = "The Burrow API CLI tool")]
pub struct Args {
    /// Burrow server root URL
    #[arg(short, long, env = "BURROW_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Burrow API prefix after the root URL
    #[arg(short, long, env = "BURROW_API", default_value = DEFAULT_API)]
    pub api: String,

    /// Show all configured Kafka clusters
    #[arg(short = 'l', long, default_value = "false")]
    pub clusters: bool,

    /// Show the list of Kafka topic offsets
    #[arg(short, long, default_value = "false")]
    pub topics: bool,

    /// Show the list of Kafka consumers
    #[arg(short, long, default_value = "false")]
    pub consumers: bool,

    /// Show Kafka consumer status summary
    #[arg(short, long, default_value = "false")]
    pub status: bool,

    /// Show Kafka consumer status by every partition
    #[arg(short, long, default_value = "false")]
    pub partitions: bool,

    /// Filter report output by topic name regular expression
    #[arg(short = 'T', long)]
    pub filter_topic: Option<String>,

    /// Filter report output by consumer group name regular expression
    #[arg(short = 'C', long)]
    pub filter_consumer: Option<String>,

    /// Show extended versions of reports
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Show HTTP requests to the Burrow API
    #[arg(short, long, default_value = "false")]
    pub debug: bool,

    /// Show decimal separator commas in large numbers
    #[arg(short = 'e', long, default_value = "false")]
    pub decimal: bool,
}

impl Args {
    /// Selected report sections; the status summary when none was chosen
    pub fn sections(&self) -> Sections {
        Sections {
            clusters: self.clusters,
            topics: self.topics,
            consumers: self.consumers,
            status: self.status,
            partitions: self.partitions,
        }
        .or_default_status()
    }

    /// Builds report options, compiling the name filters
    ///
    /// # Returns
    /// * `Err(ApiError::InvalidFilter)` - If either filter is not a valid regex
    pub fn report_options(&self) -> Result<ReportOptions> {
        Ok(ReportOptions {
            sections: self.sections(),
            verbose: self.verbose,
            decimal: self.decimal,
            filters: Filters {
                topic: NameFilter::new(self.filter_topic.as_deref())?,
                consumer: NameFilter::new(self.filter_consumer.as_deref())?,
            },
        })
    }
}
