//! Tick-driven scheduling for single-threaded hosts.
//!
//! [`TaskQueue`] holds delayed and repeating tasks keyed by tick;
//! [`JobQueue`] steps resumable jobs under a per-tick budget. Both are
//! advanced from the host's tick loop and never spawn threads.
#![forbid(unsafe_code)]

mod jobs;
mod queue;

pub use jobs::{JobQueue, JobRunStats, JobStep};
pub use queue::{Envelope, TaskQueue, TimerId};
