//! Lifecycle recorder: the five scheduler callbacks
//!
//! The recorder turns scheduler events into record-table mutations. Every
//! callback other than creation is keyed by task id and is a no-op for ids
//! that were never attributed, which keeps unrelated scheduler traffic
//! cheap: the table lookup misses and nothing else happens. Creation is the
//! expensive path (stack capture plus resolution) and runs for every task
//! in the process, attributable or not.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::call_site::CallSiteResolver;
use crate::clock::Clock;
use crate::record::{LifecycleRecord, RecordTable, Timestamps};
use crate::scheduler::{LifecycleObserver, TaskId};
use crate::stack_capture::StackCapture;

/// Owns the record table and feeds it from scheduler callbacks.
///
/// Shared as `Rc<Recorder>` between the controller (which resets and reads
/// it) and the scheduler subscription (which mutates it). Interior state
/// lives behind `RefCell`: the crate is single-threaded by design, and each
/// callback holds a borrow only for the duration of one mutation, so
/// callbacks never observe a torn table.
pub struct Recorder {
    table: RefCell<RecordTable>,
    resolver: RefCell<CallSiteResolver>,
    stacks: Rc<dyn StackCapture>,
    clock: Rc<dyn Clock>,
}

impl Recorder {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        stacks: Rc<dyn StackCapture>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            table: RefCell::new(RecordTable::new()),
            resolver: RefCell::new(CallSiteResolver::new(root_dir)),
            stacks,
            clock,
        }
    }

    /// Change the attribution root. Existing records are untouched.
    pub fn set_root_dir(&self, root_dir: impl Into<PathBuf>) {
        self.resolver.borrow_mut().set_root_dir(root_dir);
    }

    pub fn root_dir(&self) -> PathBuf {
        self.resolver.borrow().root_dir().to_path_buf()
    }

    /// Treat frames under `prefix` as instrumentation during resolution.
    pub fn add_internal_prefix(&self, prefix: impl Into<PathBuf>) {
        self.resolver.borrow_mut().add_internal_prefix(prefix);
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.table.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// Run `f` over the table. Must not be called from inside a lifecycle
    /// callback; the borrow would panic on re-entry.
    pub fn with_table<R>(&self, f: impl FnOnce(&RecordTable) -> R) -> R {
        f(&self.table.borrow())
    }
}

impl LifecycleObserver for Recorder {
    fn on_create(&self, id: TaskId, kind: &str, trigger_id: TaskId) {
        let frames = self.stacks.capture();
        let Some(call_site) = self.resolver.borrow().resolve(&frames) else {
            // unattributable tasks are dropped, not recorded with nulls
            return;
        };

        let raw_stack = frames
            .iter()
            .map(|frame| frame.describe())
            .collect::<Vec<_>>()
            .join("\n");

        self.table.borrow_mut().insert(
            id,
            LifecycleRecord {
                trigger_id,
                kind: kind.to_string(),
                call_site,
                raw_stack,
                timestamps: Timestamps::at_init(self.clock.now_ms()),
            },
        );
    }

    fn on_before_execute(&self, id: TaskId) {
        if let Some(record) = self.table.borrow_mut().get_mut(id) {
            record.timestamps.before_execute = Some(self.clock.now_ms());
        }
    }

    fn on_after_execute(&self, id: TaskId) {
        if let Some(record) = self.table.borrow_mut().get_mut(id) {
            record.timestamps.after_execute = Some(self.clock.now_ms());
        }
    }

    fn on_destroy(&self, id: TaskId) {
        if let Some(record) = self.table.borrow_mut().get_mut(id) {
            record.timestamps.destroyed = Some(self.clock.now_ms());
        }
    }

    fn on_resolve(&self, id: TaskId) {
        if let Some(record) = self.table.borrow_mut().get_mut(id) {
            // first settlement wins; later fires are bookkeeping noise
            if record.timestamps.resolved.is_none() {
                record.timestamps.resolved = Some(self.clock.now_ms());
            }
        }
    }
}
