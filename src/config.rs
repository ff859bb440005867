use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::GridResult;
use crate::iso::IsoTransform;
use crate::pathfinding::Connectivity;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MapConfig {
    /// Side length of the generated map when the map file can't be used
    #[serde(default = "default_map_size")]
    pub size: i32,
    #[serde(default = "default_map_path")]
    pub path: String,
    /// Keys the agent starts with
    #[serde(default = "default_starting_keys")]
    pub starting_keys: Vec<String>,
    /// Seed for the fallback generator; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_tile_width")]
    pub tile_width: f64,
    #[serde(default = "default_tile_height")]
    pub tile_height: f64,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "default_camera_easing")]
    pub camera_easing: f64,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

#[derive(Debug, Deserialize)]
pub struct MovementConfig {
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Fraction of a tile covered per tick
    #[serde(default = "default_step_fraction")]
    pub step_fraction: f64,
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Re-check each cell before entering it
    #[serde(default)]
    pub revalidate_path: bool,
}

#[derive(Debug, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "default_reach")]
    pub reach: f64,
    /// How long messages and the exclamation stay visible
    #[serde(default = "default_notice_seconds")]
    pub notice_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_enable_event_log")]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_map_size() -> i32 { 50 }
fn default_map_path() -> String { "village_map.json".to_string() }
fn default_starting_keys() -> Vec<String> { vec!["key_1250".to_string(), "key_750".to_string()] }
fn default_tile_width() -> f64 { 64.0 }
fn default_tile_height() -> f64 { 32.0 }
fn default_viewport_width() -> f64 { 800.0 }
fn default_viewport_height() -> f64 { 600.0 }
fn default_camera_easing() -> f64 { 0.05 }
fn default_window_title() -> String { "isogrid - Isometric Map".to_string() }
fn default_step_fraction() -> f64 { crate::movement::DEFAULT_STEP_FRACTION }
fn default_tick_hz() -> u32 { 60 }
fn default_reach() -> f64 { crate::door::DEFAULT_REACH }
fn default_notice_seconds() -> f64 { 2.0 }
fn default_log_level() -> String { "info".to_string() }
fn default_enable_event_log() -> bool { true }
fn default_event_log_path() -> String { "event_log.json".to_string() }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            size: default_map_size(),
            path: default_map_path(),
            starting_keys: default_starting_keys(),
            seed: None,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tile_width: default_tile_width(),
            tile_height: default_tile_height(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            camera_easing: default_camera_easing(),
            window_title: default_window_title(),
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            step_fraction: default_step_fraction(),
            tick_hz: default_tick_hz(),
            revalidate_path: false,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: default_reach(),
            notice_seconds: default_notice_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_event_log: default_enable_event_log(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl ViewConfig {
    pub fn transform(&self) -> IsoTransform {
        IsoTransform::new(
            self.tile_width,
            self.tile_height,
            self.viewport_width,
            self.viewport_height,
        )
    }
}

impl MovementConfig {
    /// A step outside (0, 1] would stall the agent or skip cells
    fn sanitize(&mut self) {
        if !(self.step_fraction > 0.0 && self.step_fraction <= 1.0) {
            warn!(
                "movement.step_fraction {} out of range, using {}",
                self.step_fraction,
                default_step_fraction()
            );
            self.step_fraction = default_step_fraction();
        }
    }
}

impl InteractionConfig {
    /// Notice lifetime in ticks at the given tick rate
    pub fn notice_ticks(&self, tick_hz: u32) -> u32 {
        (self.notice_seconds * tick_hz as f64).round().max(1.0) as u32
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> GridResult<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.movement.sanitize();
        Ok(config)
    }

    /// Load configuration from config.toml, or use defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}; using default configuration", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }
}
