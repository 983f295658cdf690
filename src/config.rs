// src/config.rs

//! Configuration for the coordinator and the demo simulation.
//!
//! Settings are deserialized from an optional JSON file named by the
//! `HBM_COORDINATOR_CONFIG` environment variable. Every field has a default,
//! so a missing or partial file is fine.

use crate::display::DisplayId;
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Environment variable naming the optional config file.
const CONFIG_ENV_VAR: &str = "HBM_COORDINATOR_CONFIG";

/// Global configuration, loaded once on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Coordinator control-thread settings.
    pub coordinator: CoordinatorConfig,
    /// Parameters for the simulated display used by the demo binary.
    pub simulation: SimulationConfig,
}

/// Settings for the coordinator control thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Bound of the control queue carrying commands and display events.
    /// Senders block when it fills (backpressure).
    pub control_queue_depth: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        CoordinatorConfig {
            control_queue_depth: 64,
        }
    }
}

/// Parameters of the simulated display driven by the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Id of the simulated display.
    pub display_id: DisplayId,
    /// Refresh rate the display idles at before the mode is requested, Hz.
    pub initial_refresh_rate: f32,
    /// Refresh rates of the simulated display's modes, Hz.
    pub supported_refresh_rates: Vec<f32>,
    /// Delay before the simulated hardware confirms a mode change, ms.
    pub ramp_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            display_id: DisplayId(0),
            initial_refresh_rate: 60.0,
            supported_refresh_rates: vec![60.0, 90.0, 120.0],
            ramp_delay_ms: 50,
        }
    }
}

impl Config {
    /// Load from the file named by `HBM_COORDINATOR_CONFIG`, falling back to
    /// defaults if the variable is unset or the file is unreadable/invalid.
    fn load_or_default() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Config::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Config: failed to parse {}: {}, using defaults", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                warn!("Config: failed to read {}: {}, using defaults", path, e);
                Config::default()
            }
        }
    }
}
