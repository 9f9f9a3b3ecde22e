//! Profiler controller: subscription lifecycle and report entry points
//!
//! One [`Profiler`] instance is one profiling session context. Nothing in
//! the crate is a module-level global, so independent sessions can coexist
//! against different schedulers if a host ever needs that.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use tracing::debug;

use crate::annotation_output;
use crate::clock::Clock;
use crate::recorder::Recorder;
use crate::report::{self, ReportOptions, ResultRow};
use crate::scheduler::{LifecycleObserver, Scheduler};
use crate::stack_capture::StackCapture;
use crate::table_output;

/// Owns the on/off lifecycle of the scheduler subscription and the record
/// table behind it.
pub struct Profiler<S: Scheduler> {
    scheduler: S,
    recorder: Rc<Recorder>,
    subscription: Option<S::Handle>,
}

impl<S: Scheduler> Profiler<S> {
    /// A profiler starts disabled. `root_dir` seeds attribution filtering
    /// and can be replaced by [`enable`](Self::enable) or
    /// [`set_root_dir`](Self::set_root_dir) later.
    pub fn new(
        scheduler: S,
        stacks: Rc<dyn StackCapture>,
        clock: Rc<dyn Clock>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scheduler,
            recorder: Rc::new(Recorder::new(root_dir, stacks, clock)),
            subscription: None,
        }
    }

    /// Start recording lifecycle events, attributing to call sites under
    /// `root_dir`.
    ///
    /// The root is updated unconditionally; the table reset and the
    /// subscription happen only on the disabled-to-enabled transition, so a
    /// second call cannot double-subscribe or wipe live data.
    pub fn enable(&mut self, root_dir: impl Into<PathBuf>) {
        self.recorder.set_root_dir(root_dir);
        if self.subscription.is_some() {
            return;
        }

        self.recorder.clear();
        let observer: Rc<Recorder> = Rc::clone(&self.recorder);
        let observer: Rc<dyn LifecycleObserver> = observer;
        self.subscription = Some(self.scheduler.subscribe(observer));
        debug!(root_dir = %self.recorder.root_dir().display(), "profiler enabled");
    }

    /// Stop recording. Data recorded so far stays readable until cleared.
    /// No-op when not enabled.
    pub fn disable(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.scheduler.unsubscribe(handle);
            debug!("profiler disabled");
        }
    }

    /// Whether a subscription is currently active.
    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drop all recorded data without touching the subscription.
    pub fn clear(&self) {
        self.recorder.clear();
        debug!("profiler data cleared");
    }

    /// Change the attribution root without touching the subscription.
    pub fn set_root_dir(&self, root_dir: impl Into<PathBuf>) {
        self.recorder.set_root_dir(root_dir.into());
        debug!(root_dir = %self.recorder.root_dir().display(), "attribution root changed");
    }

    /// Current attribution root.
    pub fn root_dir(&self) -> PathBuf {
        self.recorder.root_dir()
    }

    /// Treat frames under `prefix` as instrumentation during attribution,
    /// on top of this crate's own source tree.
    pub fn add_internal_prefix(&self, prefix: impl Into<PathBuf>) {
        self.recorder.add_internal_prefix(prefix);
    }

    /// Number of records currently tracked, completed or not.
    pub fn record_count(&self) -> usize {
        self.recorder.len()
    }

    /// Ranked result rows.
    ///
    /// Generate reports between task executions only, never from inside a
    /// lifecycle callback: the computation reads the record table and must
    /// not interleave with a mutation.
    pub fn result(&self, options: &ReportOptions) -> Vec<ResultRow> {
        let root_dir = self.recorder.root_dir();
        self.recorder
            .with_table(|table| report::build_report(table, &root_dir, options))
    }

    /// Fixed-width text table over [`result`](Self::result).
    pub fn result_table(&self, options: &ReportOptions) -> String {
        table_output::render_table(&self.result(options))
    }

    /// Editor annotation JSON over [`result`](Self::result).
    pub fn result_annotations(&self, options: &ReportOptions) -> Result<String> {
        annotation_output::render_annotations(&self.result(options))
    }
}
