//! Call-site resolution from captured stacks
//!
//! Finding the frame that "owns" a new task is heuristic: the number of
//! runtime and shim frames between the scheduler hook and application code
//! varies by task kind, so the resolver scans the ordered capture for the
//! first frame that survives filtering instead of indexing a fixed depth.
//! Frames outside the configured root directory are rejected rather than
//! attributed, which keeps dependency and runtime code out of reports.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::stack_capture::FrameInfo;

/// Placeholder name for frames with no resolvable function or method name.
pub const ANONYMOUS: &str = "()";

/// Source position that spawned a task. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
    /// May be [`ANONYMOUS`].
    pub function_name: String,
}

impl CallSite {
    /// `path:line:column`
    pub fn position(&self) -> String {
        format!("{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Two call sites are the same source position; the enclosing function name
/// does not participate in identity.
impl PartialEq for CallSite {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.line == other.line && self.column == other.column
    }
}

impl Eq for CallSite {}

impl Hash for CallSite {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Filters captured stacks down to the single owning application frame.
#[derive(Debug, Clone)]
pub struct CallSiteResolver {
    root_dir: PathBuf,
    internal_prefixes: Vec<PathBuf>,
}

impl CallSiteResolver {
    /// Frames under this crate's own source tree are always treated as
    /// instrumentation and skipped.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            internal_prefixes: vec![PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/src"))],
        }
    }

    /// Also skip frames under `prefix` (e.g. a host scheduler's hook shims).
    pub fn with_internal_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.add_internal_prefix(prefix);
        self
    }

    /// Register an additional instrumentation prefix on an existing resolver.
    pub fn add_internal_prefix(&mut self, prefix: impl Into<PathBuf>) {
        self.internal_prefixes.push(prefix.into());
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn set_root_dir(&mut self, root_dir: impl Into<PathBuf>) {
        self.root_dir = root_dir.into();
    }

    /// Resolve the owning call site for a capture taken at task creation.
    ///
    /// The candidate is the first frame, innermost outward, that does not
    /// belong to instrumentation code. Resolution fails when no candidate
    /// exists, when the candidate has no source path, when its path lies
    /// outside the root directory, or when it reports line 1 column 1 (a
    /// synthetic module-wrapper frame with no real source position).
    pub fn resolve(&self, frames: &[FrameInfo]) -> Option<CallSite> {
        let candidate = frames.iter().find(|frame| {
            frame
                .path
                .as_deref()
                .map_or(true, |path| !self.is_internal(path))
        })?;

        let path = candidate.path.as_deref()?;
        if !path.starts_with(&self.root_dir) {
            return None;
        }
        if candidate.line == 1 && candidate.column == 1 {
            return None;
        }

        Some(CallSite {
            path: path.to_path_buf(),
            line: candidate.line,
            column: candidate.column,
            function_name: candidate
                .function_name
                .clone()
                .or_else(|| candidate.method_name.clone())
                .unwrap_or_else(|| ANONYMOUS.to_string()),
        })
    }

    fn is_internal(&self, path: &Path) -> bool {
        self.internal_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(path: &str, line: u32, column: u32, name: &str) -> FrameInfo {
        FrameInfo {
            path: Some(PathBuf::from(path)),
            line,
            column,
            function_name: Some(name.to_string()),
            method_name: None,
        }
    }

    fn resolver() -> CallSiteResolver {
        CallSiteResolver::new("/app/src").with_internal_prefix("/hooks")
    }

    #[test]
    fn test_resolve_skips_instrumentation_frames() {
        let frames = vec![
            frame("/hooks/shim.rs", 40, 3, "hook_entry"),
            frame("/hooks/dispatch.rs", 12, 7, "dispatch"),
            frame("/app/src/flow.rs", 14, 9, "run_batches"),
            frame("/app/src/main.rs", 30, 5, "main"),
        ];

        let site = resolver().resolve(&frames).unwrap();
        assert_eq!(site.path, PathBuf::from("/app/src/flow.rs"));
        assert_eq!(site.line, 14);
        assert_eq!(site.column, 9);
        assert_eq!(site.function_name, "run_batches");
    }

    #[test]
    fn test_resolve_rejects_frame_outside_root() {
        let frames = vec![frame("/deps/runtime/timer.rs", 88, 2, "arm_timer")];
        assert!(resolver().resolve(&frames).is_none());
    }

    #[test]
    fn test_resolve_rejects_empty_capture() {
        assert!(resolver().resolve(&[]).is_none());
    }

    #[test]
    fn test_resolve_rejects_all_internal_capture() {
        let frames = vec![frame("/hooks/shim.rs", 40, 3, "hook_entry")];
        assert!(resolver().resolve(&frames).is_none());
    }

    #[test]
    fn test_resolve_rejects_synthetic_wrapper_position() {
        // line 1 column 1 marks wrapper code with no real source position
        let frames = vec![frame("/app/src/flow.rs", 1, 1, "wrapper")];
        assert!(resolver().resolve(&frames).is_none());
    }

    #[test]
    fn test_resolve_accepts_line_one_with_real_column() {
        let frames = vec![frame("/app/src/flow.rs", 1, 20, "inline")];
        assert!(resolver().resolve(&frames).is_some());
    }

    #[test]
    fn test_resolve_rejects_pathless_candidate() {
        // A pathless frame is the candidate (it cannot be classified as
        // internal) but can never be attributed.
        let frames = vec![
            FrameInfo {
                line: 5,
                column: 5,
                ..FrameInfo::default()
            },
            frame("/app/src/flow.rs", 14, 9, "run_batches"),
        ];
        assert!(resolver().resolve(&frames).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_method_name() {
        let frames = vec![FrameInfo {
            path: Some(PathBuf::from("/app/src/worker.rs")),
            line: 21,
            column: 13,
            function_name: None,
            method_name: Some("Worker::poll".to_string()),
        }];

        let site = resolver().resolve(&frames).unwrap();
        assert_eq!(site.function_name, "Worker::poll");
    }

    #[test]
    fn test_resolve_anonymous_marker_when_unnamed() {
        let frames = vec![FrameInfo {
            path: Some(PathBuf::from("/app/src/worker.rs")),
            line: 21,
            column: 13,
            function_name: None,
            method_name: None,
        }];

        let site = resolver().resolve(&frames).unwrap();
        assert_eq!(site.function_name, ANONYMOUS);
    }

    #[test]
    fn test_set_root_dir_changes_filtering() {
        let mut resolver = resolver();
        let frames = vec![frame("/lib/vendor/pool.rs", 9, 4, "spawn")];
        assert!(resolver.resolve(&frames).is_none());

        resolver.set_root_dir("/lib/vendor");
        assert!(resolver.resolve(&frames).is_some());
    }

    #[test]
    fn test_call_site_equality_ignores_function_name() {
        let a = CallSite {
            path: PathBuf::from("/app/src/flow.rs"),
            line: 14,
            column: 9,
            function_name: "run_batches".to_string(),
        };
        let b = CallSite {
            function_name: ANONYMOUS.to_string(),
            ..a.clone()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_call_site_position_format() {
        let site = CallSite {
            path: PathBuf::from("/app/src/flow.rs"),
            line: 14,
            column: 9,
            function_name: "run_batches".to_string(),
        };
        assert_eq!(site.position(), "/app/src/flow.rs:14:9");
        assert_eq!(site.to_string(), site.position());
    }
}
