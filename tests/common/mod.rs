//! Shared test fixtures for integration tests.

use district_sim::devices::DeviceRegistry;
use district_sim::sim::engine::Engine;
use district_sim::sim::types::SimConfig;

/// Default simulation configuration (120 ticks, noon start, seed 42).
pub fn default_config() -> SimConfig {
    SimConfig::new(120, 12, 42)
}

/// Engine over the default home roster with the default configuration.
pub fn default_engine() -> Engine {
    Engine::new(default_config(), DeviceRegistry::default_home())
}

/// Engine with an explicit tick horizon, start hour, and seed.
#[allow(dead_code)]
pub fn engine_with(ticks: u64, start_hour: u32, seed: u64) -> Engine {
    Engine::new(
        SimConfig::new(ticks, start_hour, seed),
        DeviceRegistry::default_home(),
    )
}
