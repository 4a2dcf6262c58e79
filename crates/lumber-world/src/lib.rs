//! Host capabilities consumed by the capitator, plus an in-memory host.
//!
//! The game owns the world, the players and the marker storage. The core only
//! sees them through [`BlockAccess`], [`PlayerAccess`] and [`MarkerStore`];
//! [`sim::SimHost`] implements all three for tests and the simulator.
#![forbid(unsafe_code)]

pub mod sim;

use core::fmt;

use lumber_blocks::Phase;
use lumber_geom::BlockPos;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host refused a block or inventory write.
    #[error("write rejected at {pos}: {reason}")]
    Rejected { pos: BlockPos, reason: String },

    /// Position is outside the loaded world.
    #[error("no block at {0}")]
    Missing(BlockPos),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the host reports for a single position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockView {
    pub type_id: String,
    /// Chopping progress; only custom logs carry it.
    pub phase: Option<Phase>,
}

impl BlockView {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            phase: None,
        }
    }

    pub fn with_phase(type_id: impl Into<String>, phase: Phase) -> Self {
        Self {
            type_id: type_id.into(),
            phase: Some(phase),
        }
    }

    pub fn phase_or_zero(&self) -> Phase {
        self.phase.unwrap_or(Phase::ZERO)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    pub damage: u32,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub type_id: String,
    /// `None` for items without a durability component.
    pub durability: Option<Durability>,
    /// Unbreaking enchantment level, 0 when absent.
    pub unbreaking: u8,
}

impl ItemStack {
    pub fn tool(type_id: impl Into<String>, max: u32) -> Self {
        Self {
            type_id: type_id.into(),
            durability: Some(Durability { damage: 0, max }),
            unbreaking: 0,
        }
    }

    pub fn plain(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            durability: None,
            unbreaking: 0,
        }
    }
}

pub trait BlockAccess {
    /// `None` when the position is not loaded.
    fn block(&self, pos: BlockPos) -> Option<BlockView>;

    /// Replace the block, resetting its state. Custom logs start at phase 0.
    fn set_type(&mut self, pos: BlockPos, type_id: &str) -> Result<(), HostError>;

    /// Change only the phase, keeping type and texture.
    fn set_phase(&mut self, pos: BlockPos, phase: Phase) -> Result<(), HostError>;

    /// Break the block into air, dropping its item.
    fn destroy(&mut self, pos: BlockPos) -> Result<(), HostError>;

    fn spawn_particle(&mut self, name: &str, at: [f32; 3]);
}

pub trait PlayerAccess {
    fn is_valid(&self, player: &PlayerId) -> bool;
    fn is_sneaking(&self, player: &PlayerId) -> bool;
    fn game_mode(&self, player: &PlayerId) -> GameMode;

    /// Overwrites the player's single status line.
    fn set_status(&mut self, player: &PlayerId, text: &str);
    fn play_sound(&mut self, player: &PlayerId, sound: &str, at: Option<BlockPos>, pitch: f32);

    /// Item in the selected hotbar slot.
    fn held_item(&self, player: &PlayerId) -> Option<ItemStack>;
    fn set_held_item(&mut self, player: &PlayerId, item: Option<ItemStack>) -> Result<(), HostError>;
}

/// Persistent per-position flags.
pub trait MarkerStore {
    fn marker(&self, pos: BlockPos) -> bool;
    fn set_marker(&mut self, pos: BlockPos);
    fn clear_marker(&mut self, pos: BlockPos);
}

/// Everything the capitator needs from the game.
pub trait Host: BlockAccess + PlayerAccess + MarkerStore {}

impl<T: BlockAccess + PlayerAccess + MarkerStore> Host for T {}
