//! Editor annotation JSON renderer
//!
//! Serializes result rows into the decoration format consumed by editor
//! overlays: one entry per call site with an inline label, a hover body,
//! and a severity color derived from where the row's total sits in the
//! distribution of all totals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::report::ResultRow;
use crate::stats;

/// Severity ramp, coolest to hottest. A row's bucket index is the number of
/// distribution thresholds its total reaches.
const COLOR_RAMP: [&str; 7] = [
    "#4caf50", "#8bc34a", "#cddc39", "#ffeb3b", "#ffc107", "#ff9800", "#f44336",
];

/// Bucket thresholds: these percentiles of all rows' totals.
const BUCKET_PERCENTILES: [f64; 6] = [30.0, 50.0, 80.0, 90.0, 95.0, 99.0];

/// Background applied to every bucket above the coolest.
const HIGHLIGHT_BACKGROUND: &str = "rgba(244, 67, 54, 0.18)";

/// One editor decoration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub path: String,
    pub line: u32,
    /// Short inline label rendered at the end of the line.
    pub text: String,
    /// Full statistics shown on hover.
    pub hover_message: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Render rows as a JSON array of editor annotations.
///
/// Empty input renders an empty array, never an error.
pub fn render_annotations(rows: &[ResultRow]) -> Result<String> {
    let sums: Vec<f64> = rows.iter().map(|row| row.sum as f64).collect();
    let thresholds: Vec<f64> = BUCKET_PERCENTILES
        .iter()
        .map(|&p| stats::percentile(&sums, p))
        .collect();

    let annotations: Vec<Annotation> = rows
        .iter()
        .map(|row| {
            let bucket = severity_bucket(row.sum as f64, &thresholds);
            Annotation {
                path: row.call_site.path.display().to_string(),
                line: row.call_site.line,
                text: format!(" {} ms total over {} tasks", row.sum, row.count),
                hover_message: format!(
                    "{}\nsum: {} ms\ncount: {}\nmean: {} ms\np95: {} ms\np99: {} ms",
                    row.key, row.sum, row.count, row.mean, row.p95, row.p99,
                ),
                color: COLOR_RAMP[bucket].to_string(),
                background_color: (bucket > 0).then(|| HIGHLIGHT_BACKGROUND.to_string()),
            }
        })
        .collect();

    serde_json::to_string(&annotations).context("failed to serialize annotations")
}

/// Number of thresholds `sum` reaches, clamped to the ramp.
fn severity_bucket(sum: f64, thresholds: &[f64]) -> usize {
    thresholds
        .iter()
        .filter(|&&threshold| sum >= threshold)
        .count()
        .min(COLOR_RAMP.len() - 1)
}
