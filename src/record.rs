//! Per-task lifecycle records and the record table

use std::collections::HashMap;

use crate::call_site::CallSite;
use crate::scheduler::TaskId;

/// Named instants in a task's life, fractional milliseconds from the clock
/// origin.
///
/// `init` is always present. The others are set independently as the
/// scheduler reports transitions; `init <= before_execute <= after_execute`
/// holds whenever both sides of a comparison are set, and `resolved`, when
/// set, is at or after `init`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamps {
    pub init: f64,
    pub before_execute: Option<f64>,
    pub after_execute: Option<f64>,
    pub destroyed: Option<f64>,
    pub resolved: Option<f64>,
}

impl Timestamps {
    /// A fresh set with only the creation instant populated.
    pub fn at_init(init: f64) -> Self {
        Self {
            init,
            before_execute: None,
            after_execute: None,
            destroyed: None,
            resolved: None,
        }
    }

    /// Instant a duration sample ends at: the first deferred-result
    /// settlement when the task settled one, else the first time its body
    /// ran. `None` means the task has not completed in either sense and
    /// contributes no sample yet.
    pub fn end(&self) -> Option<f64> {
        self.resolved.or(self.before_execute)
    }
}

/// Everything tracked for one attributed task.
#[derive(Debug, Clone)]
pub struct LifecycleRecord {
    /// Task that caused this one to be created. Diagnostic only.
    pub trigger_id: TaskId,
    /// Scheduler-defined category. Diagnostic only.
    pub kind: String,
    /// Resolved at creation; never mutated afterwards.
    pub call_site: CallSite,
    /// Full capture at creation, one frame per line. Diagnostic only.
    pub raw_stack: String,
    pub timestamps: Timestamps,
}

/// Table of live and completed records, keyed by task id.
///
/// Entries are inserted at creation (attributed tasks only) and stay until
/// the table is cleared; task destruction marks a timestamp but removes
/// nothing, so completed work remains reportable.
#[derive(Debug, Default)]
pub struct RecordTable {
    records: HashMap<TaskId, LifecycleRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TaskId, record: LifecycleRecord) {
        self.records.insert(id, record);
    }

    pub fn get(&self, id: TaskId) -> Option<&LifecycleRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut LifecycleRecord> {
        self.records.get_mut(&id)
    }

    /// Iteration order is the map's natural order and is not a contract.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &LifecycleRecord)> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
