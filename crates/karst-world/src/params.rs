use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Tunables for the simulation. Every field has a default, so an empty
/// document is a valid config.
#[derive(Clone, Debug, Deserialize)]
pub struct SimParams {
    /// Upper bound on pending updates drained by one tick.
    #[serde(default = "default_max_tick_updates")]
    pub max_tick_updates: usize,
    #[serde(default = "default_lit_brightness")]
    pub lit_brightness: f32,
    #[serde(default = "default_shadow_brightness")]
    pub shadow_brightness: f32,
    /// Water level as a fraction of world height.
    #[serde(default = "default_water_level_ratio")]
    pub water_level_ratio: f32,
}

fn default_max_tick_updates() -> usize {
    8192
}

fn default_lit_brightness() -> f32 {
    1.0
}

fn default_shadow_brightness() -> f32 {
    0.8
}

fn default_water_level_ratio() -> f32 {
    0.5
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            max_tick_updates: default_max_tick_updates(),
            lit_brightness: default_lit_brightness(),
            shadow_brightness: default_shadow_brightness(),
            water_level_ratio: default_water_level_ratio(),
        }
    }
}

pub fn load_params_from_str(s: &str) -> Result<SimParams, Box<dyn Error>> {
    let params: SimParams = toml::from_str(s)?;
    Ok(params)
}

pub fn load_params_from_path(path: &Path) -> Result<SimParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    load_params_from_str(&s)
}
