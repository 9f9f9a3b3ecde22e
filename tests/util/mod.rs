//! Shared harness for profiler integration tests
//!
//! Drives the profiler the way a host scheduler would: lifecycle events are
//! replayed through the subscribed observer, stacks come from a script, and
//! time only moves when a scenario advances it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use demora::clock::{Clock, ManualClock};
use demora::profiler::Profiler;
use demora::scheduler::{LifecycleObserver, Scheduler, TaskId};
use demora::stack_capture::{FrameInfo, StackCapture};

/// Attribution root every scenario runs under.
pub const ROOT: &str = "/app/src";

/// Scheduler double: remembers the subscribed observer and replays events
/// into it. Clones share one subscription slot so a test can keep emitting
/// after handing the scheduler to the profiler.
#[derive(Clone, Default)]
pub struct SimScheduler {
    observer: Rc<RefCell<Option<Rc<dyn LifecycleObserver>>>>,
}

impl Scheduler for SimScheduler {
    type Handle = ();

    fn subscribe(&mut self, observer: Rc<dyn LifecycleObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    fn unsubscribe(&mut self, _handle: ()) {
        *self.observer.borrow_mut() = None;
    }
}

impl SimScheduler {
    fn with_observer(&self, f: impl FnOnce(&dyn LifecycleObserver)) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            f(&*observer);
        }
    }

    pub fn create(&self, id: u64, kind: &str, trigger: u64) {
        self.with_observer(|o| o.on_create(TaskId(id), kind, TaskId(trigger)));
    }

    pub fn before_execute(&self, id: u64) {
        self.with_observer(|o| o.on_before_execute(TaskId(id)));
    }

    pub fn after_execute(&self, id: u64) {
        self.with_observer(|o| o.on_after_execute(TaskId(id)));
    }

    pub fn destroy(&self, id: u64) {
        self.with_observer(|o| o.on_destroy(TaskId(id)));
    }

    pub fn resolve(&self, id: u64) {
        self.with_observer(|o| o.on_resolve(TaskId(id)));
    }
}

/// Stack capture double handing out one scripted capture per task creation.
#[derive(Default)]
pub struct ScriptedStacks {
    queue: RefCell<VecDeque<Vec<FrameInfo>>>,
}

impl ScriptedStacks {
    pub fn push(&self, frames: Vec<FrameInfo>) {
        self.queue.borrow_mut().push_back(frames);
    }
}

impl StackCapture for ScriptedStacks {
    fn capture(&self) -> Vec<FrameInfo> {
        self.queue.borrow_mut().pop_front().unwrap_or_default()
    }
}

/// Frame in application code under [`ROOT`].
pub fn app_frame(file: &str, line: u32, column: u32, name: &str) -> FrameInfo {
    FrameInfo {
        path: Some(PathBuf::from(format!("{ROOT}/{file}"))),
        line,
        column,
        function_name: Some(name.to_string()),
        method_name: None,
    }
}

/// Frame inside this crate's own source tree, i.e. instrumentation the
/// resolver must skip.
pub fn hook_frame() -> FrameInfo {
    FrameInfo {
        path: Some(PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/src/recorder.rs"
        ))),
        line: 101,
        column: 5,
        function_name: Some("on_create".to_string()),
        method_name: None,
    }
}

/// Frame in dependency code outside the attribution root.
pub fn runtime_frame() -> FrameInfo {
    FrameInfo {
        path: Some(PathBuf::from("/deps/runtime/executor.rs")),
        line: 301,
        column: 17,
        function_name: Some("poll_task".to_string()),
        method_name: None,
    }
}

/// Everything a scenario needs: an enabled profiler plus the handles that
/// drive it.
pub struct Harness {
    pub profiler: Profiler<SimScheduler>,
    pub scheduler: SimScheduler,
    pub stacks: Rc<ScriptedStacks>,
    pub clock: Rc<ManualClock>,
}

pub fn enabled_harness() -> Harness {
    let scheduler = SimScheduler::default();
    let stacks = Rc::new(ScriptedStacks::default());
    let clock = Rc::new(ManualClock::new());

    let stacks_dyn: Rc<ScriptedStacks> = Rc::clone(&stacks);
    let stacks_dyn: Rc<dyn StackCapture> = stacks_dyn;
    let clock_dyn: Rc<ManualClock> = Rc::clone(&clock);
    let clock_dyn: Rc<dyn Clock> = clock_dyn;
    let mut profiler = Profiler::new(scheduler.clone(), stacks_dyn, clock_dyn, ROOT);
    profiler.enable(ROOT);

    Harness {
        profiler,
        scheduler,
        stacks,
        clock,
    }
}

impl Harness {
    /// Script the next creation's capture as hook frames above one
    /// application frame, then emit the creation event.
    pub fn create_at(&self, id: u64, kind: &str, trigger: u64, frame: FrameInfo) {
        self.stacks.push(vec![hook_frame(), frame]);
        self.scheduler.create(id, kind, trigger);
    }
}
