//! Duration aggregation over the record table
//!
//! Collapses per-task records into per-call-site sample lists. One blocking
//! task can dominate a thousand fast ones, so downstream ranking works on
//! collected durations rather than bare counts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::call_site::CallSite;
use crate::record::RecordTable;

/// Prefix substitution applied to report keys and paths, mapping the
/// attribution root onto a different directory (e.g. build output onto the
/// source tree an editor displays).
#[derive(Debug, Clone)]
pub struct RootRewrite {
    from: PathBuf,
    to: PathBuf,
}

impl RootRewrite {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Rewrite a path when it lives under the `from` root; other paths pass
    /// through untouched.
    pub fn apply(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.from) {
            Ok(rest) => self.to.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// Samples collected for one call site + function combination.
#[derive(Debug, Clone)]
pub struct DurationGroup {
    /// Representative call site, path already rewritten when a rewrite is
    /// in effect.
    pub call_site: CallSite,
    /// Elapsed milliseconds, appended in table iteration order. Intra-group
    /// order is not a contract.
    pub samples: Vec<f64>,
}

/// Group key: `path:line:column in function_name`.
pub fn group_key(call_site: &CallSite) -> String {
    format!("{} in {}", call_site.position(), call_site.function_name)
}

/// Group completed records by call site and collect their elapsed durations.
///
/// A record contributes `end - init`, where the end instant prefers first
/// resolution over first execution (see [`crate::record::Timestamps::end`]).
/// Records with neither instant are skipped: the task never started or
/// never settled, so there is nothing to measure yet. It may contribute to
/// a later report once it completes.
pub fn aggregate(
    table: &RecordTable,
    rewrite: Option<&RootRewrite>,
) -> HashMap<String, DurationGroup> {
    let mut groups: HashMap<String, DurationGroup> = HashMap::new();

    for (_, record) in table.iter() {
        let Some(end) = record.timestamps.end() else {
            continue;
        };
        let elapsed = end - record.timestamps.init;

        let mut call_site = record.call_site.clone();
        if let Some(rewrite) = rewrite {
            call_site.path = rewrite.apply(&call_site.path);
        }

        groups
            .entry(group_key(&call_site))
            .or_insert_with(|| DurationGroup {
                call_site,
                samples: Vec::new(),
            })
            .samples
            .push(elapsed);
    }

    groups
}
