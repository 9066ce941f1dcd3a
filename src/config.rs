//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ambient::AmbientReading;
use crate::devices::{Device, DeviceRegistry};
use crate::sim::types::SimConfig;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Fixed ambient conditions used until a live reading arrives.
    #[serde(default)]
    pub ambient: AmbientConfig,
    /// Device roster. Defaults to the standard home roster when absent.
    #[serde(default = "default_device_roster")]
    pub devices: Vec<Device>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of ticks a headless run executes (must be > 0).
    pub ticks: u64,
    /// Wall-clock hour at tick zero (0-23).
    pub start_hour: u32,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 120,
            start_hour: 12,
            seed: 42,
        }
    }
}

/// Fixed ambient conditions for headless runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    /// Outside temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
    /// Condition summary.
    pub condition: String,
    /// Whether the scenario plays out in daylight.
    pub is_day: bool,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        let fallback = AmbientReading::fallback();
        Self {
            temperature_c: fallback.temperature_c,
            humidity_pct: fallback.humidity_pct,
            condition: fallback.condition,
            is_day: fallback.is_day,
        }
    }
}

fn default_device_roster() -> Vec<Device> {
    DeviceRegistry::default_home().snapshot()
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the default home roster at 22 °C.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            ambient: AmbientConfig::default(),
            devices: default_device_roster(),
        }
    }

    /// Returns the heatwave preset: 35 °C clear sky, which drives the HVAC
    /// thermal multiplier hard.
    pub fn heatwave() -> Self {
        Self {
            ambient: AmbientConfig {
                temperature_c: 35.0,
                humidity_pct: 30.0,
                condition: "Clear".to_string(),
                ..AmbientConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the evening-charge preset: the EV charger on through the
    /// peak tariff band.
    pub fn ev_evening() -> Self {
        let mut cfg = Self::baseline();
        cfg.simulation.start_hour = 18;
        if let Some(ev) = cfg.devices.iter_mut().find(|d| d.id == "2") {
            ev.is_on = true;
        }
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "heatwave", "ev_evening"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "heatwave" => Ok(Self::heatwave()),
            "ev_evening" => Ok(Self::ev_evening()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.ticks == 0 {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }
        if s.start_hour >= 24 {
            errors.push(ConfigError {
                field: "simulation.start_hour".into(),
                message: "must be in 0..24".into(),
            });
        }

        let a = &self.ambient;
        if !a.temperature_c.is_finite() || !(-60.0..=60.0).contains(&a.temperature_c) {
            errors.push(ConfigError {
                field: "ambient.temperature_c".into(),
                message: "must be a finite temperature in [-60, 60]".into(),
            });
        }
        if !a.humidity_pct.is_finite() || !(0.0..=100.0).contains(&a.humidity_pct) {
            errors.push(ConfigError {
                field: "ambient.humidity_pct".into(),
                message: "must be in [0, 100]".into(),
            });
        }

        let mut seen_ids: Vec<&str> = Vec::new();
        for (i, d) in self.devices.iter().enumerate() {
            if d.id.is_empty() {
                errors.push(ConfigError {
                    field: format!("devices[{i}].id"),
                    message: "must not be empty".into(),
                });
            }
            if seen_ids.contains(&d.id.as_str()) {
                errors.push(ConfigError {
                    field: format!("devices[{i}].id"),
                    message: format!("duplicate id \"{}\"", d.id),
                });
            }
            seen_ids.push(&d.id);

            if !d.base_load_w.is_finite() || d.base_load_w < 0.0 {
                errors.push(ConfigError {
                    field: format!("devices[{i}].base_load_w"),
                    message: "must be >= 0".into(),
                });
            }
            if !d.variability_w.is_finite() || d.variability_w < 0.0 {
                errors.push(ConfigError {
                    field: format!("devices[{i}].variability_w"),
                    message: "must be >= 0".into(),
                });
            }
            if !d.surge_probability.is_finite() || !(0.0..=1.0).contains(&d.surge_probability) {
                errors.push(ConfigError {
                    field: format!("devices[{i}].surge_probability"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        errors
    }

    /// Builds the engine inputs described by this scenario.
    ///
    /// Returns `(sim_config, registry, ambient)`. Call [`Self::validate`]
    /// first; `SimConfig::new` asserts the timing constraints.
    pub fn build(&self) -> (SimConfig, DeviceRegistry, AmbientReading) {
        let s = &self.simulation;
        let sim_config = SimConfig::new(s.ticks, s.start_hour, s.seed);
        let registry = DeviceRegistry::new(self.devices.clone());
        let ambient = AmbientReading {
            temperature_c: self.ambient.temperature_c,
            humidity_pct: self.ambient.humidity_pct,
            condition: self.ambient.condition.clone(),
            is_day: self.ambient.is_day,
        };
        (sim_config, registry, ambient)
    }
}
