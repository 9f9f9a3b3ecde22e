//! Demora - latency attribution for asynchronous task schedulers
//!
//! This library answers "which line of code originated the async work that
//! consumed the most wall-clock time?" without manual instrumentation of
//! that work. It subscribes to a host scheduler's task lifecycle events,
//! attributes each new task to the call site that spawned it by filtering
//! a captured stack, records per-task timestamps, and aggregates elapsed
//! durations into ranked per-call-site statistics.
//!
//! The scheduler, the stack capture, and the clock are collaborator traits
//! ([`scheduler::Scheduler`], [`stack_capture::StackCapture`],
//! [`clock::Clock`]). The crate ships a `backtrace`-backed capture and a
//! monotonic clock; the scheduler integration is host-specific.

pub mod aggregate;
pub mod annotation_output;
pub mod call_site;
pub mod clock;
pub mod profiler;
pub mod record;
pub mod recorder;
pub mod report;
pub mod scheduler;
pub mod stack_capture;
pub mod stats;
pub mod table_output;
