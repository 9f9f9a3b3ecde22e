//! Report construction: rows, ordering, truncation

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::aggregate::{aggregate, RootRewrite};
use crate::call_site::CallSite;
use crate::record::RecordTable;
use crate::stats;

/// One ranked row of the latency report.
///
/// The numeric statistics are floored to whole milliseconds at row
/// construction; `count` is exact.
#[derive(Debug, Clone)]
pub struct ResultRow {
    /// `position in name`, rewritten when a root rewrite is in effect.
    pub key: String,
    pub call_site: CallSite,
    pub name: String,
    /// Total elapsed milliseconds across the group.
    pub sum: u64,
    pub count: usize,
    pub mean: u64,
    pub p95: u64,
    pub p99: u64,
}

impl ResultRow {
    /// `path:line:column` as displayed in the table and annotations.
    pub fn position(&self) -> String {
        self.call_site.position()
    }
}

/// Field a report is ranked by. Ranking is always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Key,
    Position,
    Name,
    #[default]
    Sum,
    Count,
    Mean,
    P95,
    P99,
}

impl SortKey {
    /// Descending comparison of two rows on this field. String fields
    /// compare lexicographically, numeric fields numerically; both yield a
    /// total order.
    fn compare(self, a: &ResultRow, b: &ResultRow) -> Ordering {
        match self {
            SortKey::Key => b.key.cmp(&a.key),
            SortKey::Position => b.position().cmp(&a.position()),
            SortKey::Name => b.name.cmp(&a.name),
            SortKey::Sum => b.sum.cmp(&a.sum),
            SortKey::Count => b.count.cmp(&a.count),
            SortKey::Mean => b.mean.cmp(&a.mean),
            SortKey::P95 => b.p95.cmp(&a.p95),
            SortKey::P99 => b.p99.cmp(&a.p99),
        }
    }
}

/// Returned when parsing a sort key from a field name fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0:?}")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(Self::Key),
            "position" => Ok(Self::Position),
            "name" => Ok(Self::Name),
            "sum" => Ok(Self::Sum),
            "count" => Ok(Self::Count),
            "mean" => Ok(Self::Mean),
            "p95" => Ok(Self::P95),
            "p99" => Ok(Self::P99),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Options for one report request.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Field to rank by.
    pub order: SortKey,
    /// Maximum number of rows returned.
    pub limit: usize,
    /// Replace the attribution root with this prefix in keys and paths.
    pub new_root_dir: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            order: SortKey::Sum,
            limit: 1000,
            new_root_dir: None,
        }
    }
}

/// Build ranked result rows from the record table.
///
/// Rows materialize in ascending key order first, so ties under the chosen
/// ranking field keep a deterministic relative order, then a stable sort
/// ranks them descending by that field before truncation to `limit`.
pub fn build_report(table: &RecordTable, root_dir: &Path, options: &ReportOptions) -> Vec<ResultRow> {
    let rewrite = options
        .new_root_dir
        .as_ref()
        .map(|to| RootRewrite::new(root_dir, to));
    let groups = aggregate(table, rewrite.as_ref());

    let mut keys: Vec<&String> = groups.keys().collect();
    keys.sort();

    let mut rows: Vec<ResultRow> = keys
        .into_iter()
        .map(|key| {
            let group = &groups[key];
            let samples = &group.samples;
            ResultRow {
                key: key.clone(),
                call_site: group.call_site.clone(),
                name: group.call_site.function_name.clone(),
                sum: stats::sum(samples).floor() as u64,
                count: samples.len(),
                mean: stats::mean(samples).floor() as u64,
                p95: stats::percentile(samples, 95.0).floor() as u64,
                p99: stats::percentile(samples, 99.0).floor() as u64,
            }
        })
        .collect();

    rows.sort_by(|a, b| options.order.compare(a, b));
    rows.truncate(options.limit);
    rows
}
