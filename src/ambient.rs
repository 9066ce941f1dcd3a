//! Ambient weather conditions consumed by the load model.
//!
//! The engine never fetches weather itself: an external refresher publishes
//! readings on a slow cadence and the engine keeps using the last one it was
//! handed. When no reading has ever arrived (or the fetch fails), the fixed
//! fallback applies, so a tick never waits on the network.

use serde::{Deserialize, Serialize};

/// How many base ticks pass between ambient refresh attempts (600 s).
pub const REFRESH_CADENCE_TICKS: u64 = 600;

/// A single ambient weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientReading {
    /// Outside air temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
    /// Free-text condition summary (e.g. "Cloudy", "Clear").
    pub condition: String,
    /// Whether the observation falls between sunrise and sunset.
    pub is_day: bool,
}

impl AmbientReading {
    /// The fixed substitute used when no live reading is available.
    pub fn fallback() -> Self {
        Self {
            temperature_c: 22.0,
            humidity_pct: 60.0,
            condition: "Cloudy".to_string(),
            is_day: true,
        }
    }
}

impl Default for AmbientReading {
    fn default() -> Self {
        Self::fallback()
    }
}
