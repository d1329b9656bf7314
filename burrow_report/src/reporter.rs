//! Report assembly
//!
//! The [`Reporter`] owns the response cache for one run and stitches the
//! enabled report sections together into the final text.

use crate::aggregate::{self, Filters};
use crate::cache::ResponseCache;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::report::Renderer;
use tracing::{debug, info};

/// Report sections that can be enabled independently
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    /// Configured clusters (printed once, before the per-cluster sections)
    pub clusters: bool,
    /// Topic head offsets
    pub topics: bool,
    /// Committed offsets per consumer group and topic
    pub consumers: bool,
    /// Consumer group status summary
    pub status: bool,
    /// Consumer group status per partition
    pub partitions: bool,
}

impl Sections {
    /// Falls back to the status summary when nothing was selected
    pub fn or_default_status(mut self) -> Self {
        if self == Self::default() {
            self.status = true;
        }
        self
    }

    /// Whether any section is printed per cluster
    pub fn any_per_cluster(&self) -> bool {
        self.topics || self.consumers || self.status || self.partitions
    }
}

/// Presentation settings for a report run
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub sections: Sections,
    pub verbose: bool,
    pub decimal: bool,
    pub filters: Filters,
}

/// Generates Burrow reports for all configured clusters
pub struct Reporter<G> {
    cache: ResponseCache<G>,
    options: ReportOptions,
    renderer: Renderer,
}

impl<G: Gateway> Reporter<G> {
    pub fn new(cache: ResponseCache<G>, options: ReportOptions) -> Self {
        let renderer = Renderer::new(options.verbose, options.decimal);
        Self::with_renderer(cache, options, renderer)
    }

    /// Reporter using a caller-supplied renderer
    pub fn with_renderer(
        cache: ResponseCache<G>,
        options: ReportOptions,
        renderer: Renderer,
    ) -> Self {
        Self {
            cache,
            options,
            renderer,
        }
    }

    pub fn cache(&self) -> &ResponseCache<G> {
        &self.cache
    }

    /// Configured clusters report
    pub fn report_clusters(&mut self) -> Result<String> {
        let rows = aggregate::cluster_rows(&mut self.cache)?;
        Ok(self.renderer.clusters(&rows))
    }

    /// Topic offsets report for one cluster
    pub fn report_topics(&mut self, cluster: &str) -> Result<String> {
        let rows = aggregate::topic_rows(&mut self.cache, cluster, &self.options.filters)?;
        Ok(self.renderer.topics(&rows))
    }

    /// Consumer group committed offsets report for one cluster
    pub fn report_consumers(&mut self, cluster: &str) -> Result<String> {
        let filters = &self.options.filters;
        let rows = aggregate::consumer_topic_rows(&mut self.cache, cluster, filters)?;
        Ok(self.renderer.consumers(&rows))
    }

    /// Consumer group status summary for one cluster
    pub fn report_consumer_status(&mut self, cluster: &str) -> Result<String> {
        let filters = &self.options.filters;
        let rows = aggregate::consumer_status_rows(&mut self.cache, cluster, filters)?;
        Ok(self.renderer.consumer_status(&rows))
    }

    /// Consumer group status by partition for one cluster
    pub fn report_consumer_partitions(&mut self, cluster: &str) -> Result<String> {
        let rows = aggregate::partition_rows(&mut self.cache, cluster, &self.options.filters)?;
        Ok(self.renderer.partitions(&rows))
    }

    /// Generates the full report with all enabled sections
    ///
    /// The clusters section comes first; every per-cluster section is then
    /// printed under a `### Cluster: <name> ###` heading. The first
    /// transport or decode error aborts the whole report.
    pub fn report(&mut self) -> Result<String> {
        let sections = self.options.sections;
        let mut report = String::new();

        if sections.clusters {
            report.push_str(&self.report_clusters()?);
        }

        let clusters = self.cache.clusters()?;
        info!("Reporting on {} cluster(s)", clusters.len());

        for cluster in clusters {
            debug!("Building report sections for cluster {}", cluster);
            if sections.any_per_cluster() {
                report.push_str(&format!("\n### Cluster: {} ###\n\n", cluster));
            }
            if sections.topics {
                report.push_str(&self.report_topics(&cluster)?);
            }
            if sections.consumers {
                report.push_str(&self.report_consumers(&cluster)?);
            }
            if sections.status {
                report.push_str(&self.report_consumer_status(&cluster)?);
            }
            if sections.partitions {
                report.push_str(&self.report_consumer_partitions(&cluster)?);
            }
        }

        Ok(report)
    }
}
