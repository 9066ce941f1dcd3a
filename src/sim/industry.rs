//! Industrial machine loads and the oscilloscope trace, stepped every 2nd tick.

use rand::Rng;
use rand::rngs::StdRng;

use serde::Serialize;

use super::history::RingBuffer;

/// Half-width of the per-step load change.
const LOAD_STEP: f32 = 7.5;
/// Oscilloscope trace retention.
pub const SCOPE_CAPACITY: usize = 30;
/// Nominal three-phase voltage of the scope trace.
const SCOPE_BASE_V: f32 = 400.0;
/// Half-width of the scope voltage jitter.
const SCOPE_NOISE_V: f32 = 7.5;
/// Baseline scope load.
const SCOPE_BASE_LOAD: f32 = 800.0;
/// Extra load when a scope surge fires (probability 0.2).
const SCOPE_SURGE_LOAD: f32 = 200.0;

/// One machine on the factory floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryMachine {
    pub label: &'static str,
    /// Present load, clamped to `[0, full_mark]`.
    pub load: f32,
    /// Fixed ceiling for this machine.
    pub full_mark: f32,
}

impl IndustryMachine {
    fn new(label: &'static str, load: f32, full_mark: f32) -> Self {
        Self {
            label,
            load,
            full_mark,
        }
    }
}

/// One point of the oscilloscope trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeSample {
    pub timestamp_ms: i64,
    pub voltage_v: f32,
    pub load_w: f32,
}

/// The fixed six-machine floor.
pub fn default_machines() -> Vec<IndustryMachine> {
    vec![
        IndustryMachine::new("Motor A", 120.0, 150.0),
        IndustryMachine::new("Pump B", 98.0, 150.0),
        IndustryMachine::new("Compressor", 86.0, 150.0),
        IndustryMachine::new("Conveyor", 99.0, 150.0),
        IndustryMachine::new("HVAC Ind.", 85.0, 150.0),
        IndustryMachine::new("Lighting", 65.0, 150.0),
    ]
}

/// Advances every machine's load by one bounded random-walk step.
pub fn step_machines(machines: &mut [IndustryMachine], rng: &mut StdRng) {
    for machine in machines {
        let next = machine.load + rng.random_range(-LOAD_STEP..LOAD_STEP);
        machine.load = next.clamp(0.0, machine.full_mark);
    }
}

/// Draws one oscilloscope sample: ~400 V +/- 7.5 with an 800 W base load that
/// spikes by 200 W with probability 0.2.
pub fn scope_sample(timestamp_ms: i64, rng: &mut StdRng) -> ScopeSample {
    let voltage_v = SCOPE_BASE_V + rng.random_range(-SCOPE_NOISE_V..SCOPE_NOISE_V);
    let load_w = SCOPE_BASE_LOAD
        + if rng.random::<f32>() > 0.8 {
            SCOPE_SURGE_LOAD
        } else {
            0.0
        };
    ScopeSample {
        timestamp_ms,
        voltage_v,
        load_w,
    }
}

/// Appends one sample to the bounded trace, evicting the oldest on overflow.
pub fn push_scope_sample(trace: &mut RingBuffer<ScopeSample>, timestamp_ms: i64, rng: &mut StdRng) {
    trace.push(scope_sample(timestamp_ms, rng));
}
