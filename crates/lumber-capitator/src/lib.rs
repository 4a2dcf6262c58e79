//! Progressive tree felling.
//!
//! A sneaking player hitting a natural trunk converts it into a phased custom
//! log. Each further hit advances the phase; idling lets countdowns demote it
//! back, one phase at a time, until it reverts to vanilla. Breaking the block
//! at the terminal phase while sneaking fells the whole connected tree.
//!
//! [`Capitator`] owns all state. The host forwards its events to the `on_*`
//! handlers and calls [`Capitator::tick`] once per game tick.
#![forbid(unsafe_code)]

mod capitator;
pub mod config;
mod countdown;
pub mod destroy;
pub mod display;
mod error;
pub mod keys;
mod orchestrator;
pub mod radius;
mod roll;
pub mod wear;

pub use capitator::{Capitator, CapitatorState};
pub use config::{CapitatorConfig, load_config_from_path};
pub use countdown::{CountdownEntry, WatchRecord};
pub use destroy::{DestroyReport, DestroyRun};
pub use display::compose_display;
pub use error::ConfigError;
pub use keys::{CountdownKey, TimerSlot};
pub use orchestrator::{BlockBroken, BreakDecision, HIT_PARTICLE};
pub use radius::{LeafRadius, RadiusScan, ScanStep, estimate_leaf_radius};
pub use wear::{WearOutcome, apply_wear};
