//! Core simulation types: configuration and the published meter reading.

use std::fmt;

use serde::Serialize;

/// Centralized simulation configuration.
///
/// One tick is one simulated second. `ticks` bounds headless runs; the live
/// service ignores it and ticks until shut down.
///
/// # Examples
///
/// ```
/// use district_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(120, 12, 42);
/// assert_eq!(cfg.hour_at(0), 12);
/// assert_eq!(cfg.hour_at(3600), 13);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Number of ticks a headless run executes.
    pub ticks: u64,
    /// Wall-clock hour at tick zero for headless runs (0-23).
    pub start_hour: u32,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` is zero or `start_hour` is not a valid hour.
    pub fn new(ticks: u64, start_hour: u32, seed: u64) -> Self {
        assert!(ticks > 0, "ticks must be > 0");
        assert!(start_hour < 24, "start_hour must be in 0..24");
        Self {
            ticks,
            start_hour,
            seed,
        }
    }

    /// The simulated wall-clock hour `elapsed_ticks` seconds after start.
    pub fn hour_at(&self, elapsed_ticks: u64) -> u32 {
        ((self.start_hour as u64 + elapsed_ticks / 3600) % 24) as u32
    }
}

/// One published meter reading. Immutable once produced.
///
/// `cost` and `co2_kg` are cumulative session totals, carried in `f64` so the
/// per-second increments keep registering over very long sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Milliseconds since the Unix epoch (headless runs count from zero).
    pub timestamp_ms: i64,
    /// Aggregate instantaneous power in watts (clamped to >= 0).
    pub power_w: f32,
    /// Supply voltage in volts.
    pub voltage_v: f32,
    /// Line current in amperes.
    pub current_a: f32,
    /// Grid frequency in hertz.
    pub frequency_hz: f32,
    /// Power factor (0-1 nominal range).
    pub power_factor: f32,
    /// Cumulative session cost in currency units.
    pub cost: f64,
    /// Cumulative session emissions in kilograms of CO2.
    pub co2_kg: f64,
    /// Ambient temperature used for this tick, in degrees Celsius.
    pub temperature_c: f32,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>8}ms | {:>8.1} W  {:>6.2} V  {:>6.3} A  {:.3} Hz  pf={:.3} | \
             cost={:.6}  co2={:.6} kg | {:.1} C",
            self.timestamp_ms,
            self.power_w,
            self.voltage_v,
            self.current_a,
            self.frequency_hz,
            self.power_factor,
            self.cost,
            self.co2_kg,
            self.temperature_c,
        )
    }
}
