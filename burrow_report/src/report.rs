//! Table rendering for aggregated report rows
//!
//! Every report is an ASCII table with left-aligned columns, sorted by its
//! first column and terminated by a single newline.

use crate::aggregate::{ClusterRow, ConsumerStatusRow, ConsumerTopicRow, PartitionRow, TopicRow};
use crate::stats::UNKNOWN;
use crate::utils::{age_at, format_number, timestamp_to_date};
use chrono::{DateTime, Utc};
use comfy_table::{presets::ASCII_FULL_CONDENSED, ContentArrangement, Table};

const CLUSTER_COLUMNS: [&str; 6] = [
    "Cluster",
    "Version",
    "Client ID",
    "Refresh Offsets",
    "Refresh Topics",
    "Servers",
];
const TOPIC_COLUMNS: [&str; 4] = ["Topic", "Partitions", "Min Offset", "Max Offset"];
const TOPIC_COLUMNS_VERBOSE: [&str; 3] = ["Topic", "Partitions", "Offsets"];
const CONSUMER_COLUMNS: [&str; 9] = [
    "Consumer Group",
    "Topic",
    "Owner",
    "Current Lag",
    "Min Offset",
    "Max Offset",
    "Timestamp",
    "Date",
    "Age",
];
const STATUS_COLUMNS: [&str; 8] = [
    "Consumer Group",
    "Status",
    "Current Lag",
    "Total Lag",
    "Offset",
    "Timestamp",
    "Date",
    "Age",
];
const STATUS_COLUMNS_VERBOSE_EXTRA: [&str; 2] = ["Owners", "Topics"];
const PARTITION_COLUMNS: [&str; 10] = [
    "Consumer Group",
    "Topic",
    "Partition",
    "Status",
    "Lag",
    "Owner",
    "Offset",
    "Timestamp",
    "Date",
    "Age",
];

/// Renders rows as a table sorted by the column at `sort_column`
///
/// Rows are ordered by the sort column (byte-wise, so case-sensitive); ties
/// are broken by the remaining cells so the output is fully deterministic.
pub fn render(columns: &[&str], mut rows: Vec<Vec<String>>, sort_column: usize) -> String {
    rows.sort_by(|a, b| {
        a.get(sort_column)
            .cmp(&b.get(sort_column))
            .then_with(|| a.cmp(b))
    });

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(columns.to_vec());
    for row in rows {
        table.add_row(row);
    }

    let mut output = table.to_string();
    output.truncate(output.trim_end_matches('\n').len());
    output.push('\n');
    output
}

/// Turns aggregated rows into report text
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Use the extended column sets
    pub verbose: bool,
    /// Group thousands in numbers with commas
    pub decimal: bool,
    /// Reference instant for age columns
    now: DateTime<Utc>,
}

impl Renderer {
    pub fn new(verbose: bool, decimal: bool) -> Self {
        Self::at(verbose, decimal, Utc::now())
    }

    /// Renderer computing ages relative to a fixed instant
    pub fn at(verbose: bool, decimal: bool, now: DateTime<Utc>) -> Self {
        Self {
            verbose,
            decimal,
            now,
        }
    }

    pub fn number(&self, number: i64) -> String {
        format_number(number, self.decimal)
    }

    /// Timestamp, date and age cells for a millisecond timestamp; all `?`
    /// when the timestamp could not be read
    fn time_cells(&self, timestamp: Option<i64>) -> [String; 3] {
        match timestamp {
            Some(timestamp) => [
                self.number(timestamp),
                timestamp_to_date(timestamp),
                age_at(timestamp, self.now),
            ],
            None => [UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()],
        }
    }

    fn optional_number(&self, number: Option<i64>) -> String {
        number.map_or_else(|| UNKNOWN.to_string(), |n| self.number(n))
    }

    pub fn clusters(&self, rows: &[ClusterRow]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                vec![
                    row.cluster.clone(),
                    row.kafka_version.clone(),
                    row.client_id.clone(),
                    row.offset_refresh.clone(),
                    row.topic_refresh.clone(),
                    row.servers.join(","),
                ]
            })
            .collect();
        render(&CLUSTER_COLUMNS, cells, 0)
    }

    pub fn topics(&self, rows: &[TopicRow]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.topic.clone(), row.partitions().to_string()];
                if self.verbose {
                    let offsets: Vec<String> =
                        row.offsets.iter().map(|&o| self.optional_number(o)).collect();
                    cells.push(offsets.join(","));
                } else {
                    cells.push(self.number(row.min_offset()));
                    cells.push(self.number(row.max_offset()));
                }
                cells
            })
            .collect();

        if self.verbose {
            render(&TOPIC_COLUMNS_VERBOSE, cells, 0)
        } else {
            render(&TOPIC_COLUMNS, cells, 0)
        }
    }

    pub fn consumers(&self, rows: &[ConsumerTopicRow]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.consumer.clone(),
                    row.topic.clone(),
                    row.owner.clone(),
                    self.optional_number(row.lag),
                    self.number(row.min_offset),
                    self.number(row.max_offset),
                ];
                cells.extend(self.time_cells(row.max_timestamp));
                cells
            })
            .collect();
        render(&CONSUMER_COLUMNS, cells, 0)
    }

    pub fn consumer_status(&self, rows: &[ConsumerStatusRow]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.consumer.clone(),
                    row.status.clone(),
                    self.number(row.lag),
                    self.number(row.total_lag),
                    self.number(row.max_offset),
                ];
                cells.extend(self.time_cells(row.max_timestamp));
                if self.verbose {
                    cells.push(owners_cell(row));
                    cells.push(topics_cell(row));
                }
                cells
            })
            .collect();

        if self.verbose {
            let columns: Vec<&str> = STATUS_COLUMNS
                .iter()
                .chain(STATUS_COLUMNS_VERBOSE_EXTRA.iter())
                .copied()
                .collect();
            render(&columns, cells, 0)
        } else {
            render(&STATUS_COLUMNS, cells, 0)
        }
    }

    pub fn partitions(&self, rows: &[PartitionRow]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                let stats = &row.stats;
                let mut cells = vec![
                    row.consumer.clone(),
                    stats.topic.clone(),
                    stats.partition_label(),
                    stats.status.clone(),
                    self.number(stats.lag),
                    stats.owner.clone(),
                    self.number(stats.offset),
                ];
                cells.extend(self.time_cells(stats.timestamp));
                cells
            })
            .collect();
        render(&PARTITION_COLUMNS, cells, 0)
    }
}

/// Sorted, comma-joined owners
fn owners_cell(row: &ConsumerStatusRow) -> String {
    row.owners.iter().cloned().collect::<Vec<_>>().join(",")
}

/// Sorted `topic[partitions]` list
fn topics_cell(row: &ConsumerStatusRow) -> String {
    row.topics
        .iter()
        .map(|(topic, partitions)| format!("{}[{}]", topic, partitions))
        .collect::<Vec<_>>()
        .join(",")
}
