//! Stack capture collaborator interface and the backtrace-backed default
//!
//! Attribution needs an ordered view of the call stack at task-creation
//! time. The capture itself is treated as a pure function over the current
//! execution state; everything heuristic about picking the interesting
//! frame lives in [`crate::call_site`].

use std::path::PathBuf;

/// One captured stack frame. Captures are ordered innermost first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInfo {
    /// Source file, when debug info resolves one.
    pub path: Option<PathBuf>,
    /// 1-based line; 0 when unknown.
    pub line: u32,
    /// 1-based column; 0 when unknown.
    pub column: u32,
    /// Enclosing function, when known.
    pub function_name: Option<String>,
    /// Enclosing method, when the frame is a method rather than a free
    /// function and the backend distinguishes the two.
    pub method_name: Option<String>,
}

impl FrameInfo {
    /// Format as `path:line:column name`, the shape used in raw stack dumps.
    pub fn describe(&self) -> String {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        let name = self
            .function_name
            .as_deref()
            .or(self.method_name.as_deref())
            .unwrap_or("");
        format!("{}:{}:{} {}", path, self.line, self.column, name)
    }
}

/// Captures the current call stack as an ordered frame sequence.
pub trait StackCapture {
    /// Frames at the point of the call, innermost first.
    fn capture(&self) -> Vec<FrameInfo>;
}

/// Production capture backed by the `backtrace` crate.
///
/// Resolution quality depends on debug info: builds without `debug = true`
/// yield frames with unknown paths, which the call-site resolver then
/// rejects. Inlined functions may surface as multiple symbols for one
/// physical frame; each symbol becomes its own [`FrameInfo`] so the
/// resolver sees the logical stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl BacktraceCapture {
    pub fn new() -> Self {
        Self
    }
}

impl StackCapture for BacktraceCapture {
    fn capture(&self) -> Vec<FrameInfo> {
        let trace = backtrace::Backtrace::new();
        let mut frames = Vec::with_capacity(trace.frames().len());
        for frame in trace.frames() {
            for symbol in frame.symbols() {
                frames.push(FrameInfo {
                    path: symbol.filename().map(|p| p.to_path_buf()),
                    line: symbol.lineno().unwrap_or(0),
                    column: symbol.colno().unwrap_or(0),
                    function_name: symbol.name().map(|n| n.to_string()),
                    method_name: None,
                });
            }
        }
        frames
    }
}
