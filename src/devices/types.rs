//! Device definitions shared by the registry, the load model, and config.

use serde::{Deserialize, Serialize};

/// Broad device class. Only `Ac` changes the load model's behavior (thermal
/// scaling); the rest exist so rosters stay descriptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    /// Air conditioning / HVAC. Works harder the further ambient temperature
    /// strays from the 22 °C setpoint.
    Ac,
    Light,
    Ev,
    Heater,
    Pump,
    Motor,
    Other,
}

/// One metered appliance.
///
/// The set of devices is fixed for the session; only `is_on` ever changes,
/// through [`crate::devices::DeviceRegistry::toggle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Device {
    /// Unique identifier used by the toggle command.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Device class.
    pub category: DeviceCategory,
    /// Whether the device currently draws power.
    #[serde(default)]
    pub is_on: bool,
    /// Nominal draw in watts (>= 0).
    pub base_load_w: f32,
    /// Full width of the symmetric per-tick noise band in watts (>= 0).
    /// The draw moves by uniform `[-variability/2, +variability/2]`.
    #[serde(default)]
    pub variability_w: f32,
    /// Per-tick probability of a 1.4x surge spike (0-1). Surges are
    /// independent per tick, never sticky.
    #[serde(default)]
    pub surge_probability: f32,
}
