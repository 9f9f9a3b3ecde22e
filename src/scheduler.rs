//! Scheduler collaborator interface
//!
//! The host process's asynchronous task scheduler is a black box to this
//! crate: it is consumed purely through the subscription surface below. The
//! scheduler invokes the five lifecycle callbacks synchronously at
//! well-defined points in its cooperative loop (task creation, immediately
//! before and after body execution, resource reclamation, deferred-result
//! settlement), and hands back an opaque handle used to tear the
//! subscription down again.

use std::fmt;
use std::rc::Rc;

/// Opaque identifier for one unit of scheduled asynchronous work.
///
/// Assigned by the scheduler at task creation. Unique among
/// currently-tracked tasks; not reused while a record for it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle callbacks a subscriber receives from the scheduler.
///
/// All five run synchronously on the hot path of every scheduled task in
/// the process, related to the profiled code or not, so implementations
/// must be fast and non-blocking. For a single task id, the creation
/// callback always fires first; execution pairs may repeat for recurring
/// tasks; destruction and resolution are independent and may arrive in
/// either order.
pub trait LifecycleObserver {
    /// A task was created. `kind` is the scheduler-defined category of the
    /// task; `trigger_id` identifies the task that caused this one to exist.
    fn on_create(&self, id: TaskId, kind: &str, trigger_id: TaskId);

    /// The task body is about to run.
    fn on_before_execute(&self, id: TaskId);

    /// The task body finished one execution.
    fn on_after_execute(&self, id: TaskId);

    /// The scheduler discarded the task.
    fn on_destroy(&self, id: TaskId);

    /// The task's deferred result settled. May fire more than once for
    /// internal bookkeeping reasons; only the first settlement is
    /// meaningful.
    fn on_resolve(&self, id: TaskId);
}

/// Subscription surface of the host scheduler.
///
/// Subscription is infallible at this seam: a scheduler that cannot accept
/// a subscriber has no recovery path here, and such a failure is treated as
/// fatal by the caller.
pub trait Scheduler {
    /// Token returned by [`subscribe`](Self::subscribe) and consumed by
    /// [`unsubscribe`](Self::unsubscribe).
    type Handle;

    /// Start delivering lifecycle events to `observer`.
    fn subscribe(&mut self, observer: Rc<dyn LifecycleObserver>) -> Self::Handle;

    /// Stop delivering events for the given subscription.
    fn unsubscribe(&mut self, handle: Self::Handle);
}
