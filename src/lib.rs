//! District-scale energy telemetry simulator.
//!
//! Synthesizes a continuous stream of plausible electrical, economic, and
//! environmental readings for a virtual building and its surrounding district
//! (building floors, industrial machines, city wards, a carbon market), all
//! advanced off a single tick counter with modulus-gated multi-rate stepping.

/// Ambient weather reading types and the fixed fallback value.
pub mod ambient;
/// TOML scenario configuration and preset definitions.
pub mod config;
/// Household device roster and toggle registry.
pub mod devices;
/// CSV telemetry export.
pub mod io;
/// Simulation engine, clock, and the district models.
pub mod sim;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod runtime;
#[cfg(feature = "api")]
pub mod weather;
