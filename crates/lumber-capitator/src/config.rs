use lumber_blocks::{Namespaces, species_of};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CapitatorConfig {
    #[serde(default)]
    pub namespaces: Namespaces,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub destroy: Destroy,
    #[serde(default)]
    pub species: Species,
    #[serde(default)]
    pub wear: Wear,
}

impl CapitatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<CapitatorConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    CapitatorConfig::from_toml_str(&s)
}

#[derive(Clone, Debug, Deserialize)]
pub struct Timing {
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,
    #[serde(default = "default_conversion_secs")]
    pub conversion_secs: u32,
    #[serde(default = "default_progress_secs")]
    pub progress_secs: u32,
    #[serde(default = "default_regression_secs")]
    pub regression_secs: u32,
}
fn default_ticks_per_second() -> u32 {
    20
}
fn default_conversion_secs() -> u32 {
    10
}
fn default_progress_secs() -> u32 {
    10
}
fn default_regression_secs() -> u32 {
    5
}
impl Default for Timing {
    fn default() -> Self {
        Self {
            ticks_per_second: default_ticks_per_second(),
            conversion_secs: default_conversion_secs(),
            progress_secs: default_progress_secs(),
            regression_secs: default_regression_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Destroy {
    /// Logs destroyed per batch before the run is parked.
    #[serde(default = "default_batch_cap")]
    pub batch_cap: usize,
    #[serde(default = "default_batch_delay_ticks")]
    pub batch_delay_ticks: u64,
    /// Leaf removal delay before the horizontal falloff is added.
    #[serde(default = "default_leaf_delay_base")]
    pub leaf_delay_base: u64,
    #[serde(default = "default_leaf_vertical_reach")]
    pub leaf_vertical_reach: i32,
    #[serde(default = "default_scan_half_extent")]
    pub scan_half_extent: i32,
    #[serde(default = "default_leaf_radius")]
    pub default_leaf_radius: i32,
    /// Job steps shared by all destroy runs per tick.
    #[serde(default = "default_job_steps_per_tick")]
    pub job_steps_per_tick: usize,
}
fn default_batch_cap() -> usize {
    8
}
fn default_batch_delay_ticks() -> u64 {
    20
}
fn default_leaf_delay_base() -> u64 {
    20
}
fn default_leaf_vertical_reach() -> i32 {
    2
}
fn default_scan_half_extent() -> i32 {
    3
}
fn default_leaf_radius() -> i32 {
    2
}
fn default_job_steps_per_tick() -> usize {
    64
}
impl Default for Destroy {
    fn default() -> Self {
        Self {
            batch_cap: default_batch_cap(),
            batch_delay_ticks: default_batch_delay_ticks(),
            leaf_delay_base: default_leaf_delay_base(),
            leaf_vertical_reach: default_leaf_vertical_reach(),
            scan_half_extent: default_scan_half_extent(),
            default_leaf_radius: default_leaf_radius(),
            job_steps_per_tick: default_job_steps_per_tick(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Species {
    /// Species allowed to be worked while hanging over air (mangrove roots).
    #[serde(default = "default_floating_exempt")]
    pub floating_exempt: Vec<String>,
}
fn default_floating_exempt() -> Vec<String> {
    vec!["mangrove_log".into()]
}
impl Default for Species {
    fn default() -> Self {
        Self {
            floating_exempt: default_floating_exempt(),
        }
    }
}

impl Species {
    pub fn is_floating_exempt(&self, type_id: &str) -> bool {
        let sp = species_of(type_id);
        self.floating_exempt.iter().any(|e| sp.ends_with(e.as_str()))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Wear {
    #[serde(default = "default_wear_enabled")]
    pub enabled: bool,
    #[serde(default = "default_wear_seed")]
    pub seed: u32,
}
fn default_wear_enabled() -> bool {
    true
}
fn default_wear_seed() -> u32 {
    0x5EED
}
impl Default for Wear {
    fn default() -> Self {
        Self {
            enabled: default_wear_enabled(),
            seed: default_wear_seed(),
        }
    }
}
