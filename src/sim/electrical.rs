//! Grid electrical characteristics derived from aggregate power.
//!
//! Stateless: every output is a pure function of the current tick's power
//! plus fresh randomness. Voltage sags linearly with load against a 15 kW
//! nominal feeder capacity; frequency jitters independently of load.

use rand::Rng;
use rand::rngs::StdRng;

/// Nominal supply voltage in volts.
pub const NOMINAL_VOLTAGE_V: f32 = 230.0;
/// Feeder capacity against which voltage sag is scaled, in watts.
pub const FEEDER_CAPACITY_W: f32 = 15_000.0;
/// Voltage drop at full feeder capacity, in volts.
const SAG_AT_CAPACITY_V: f32 = 5.0;
/// Half-width of the uniform voltage noise, in volts.
const VOLTAGE_NOISE_V: f32 = 1.5;

/// Electrical quantities for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricalState {
    pub voltage_v: f32,
    pub current_a: f32,
    pub frequency_hz: f32,
    pub power_factor: f32,
}

/// Derives voltage, power factor, current, and frequency from aggregate power.
pub fn derive(power_w: f32, rng: &mut StdRng) -> ElectricalState {
    let sag = (power_w / FEEDER_CAPACITY_W) * SAG_AT_CAPACITY_V;
    let voltage_v = NOMINAL_VOLTAGE_V - sag + rng.random_range(-VOLTAGE_NOISE_V..VOLTAGE_NOISE_V);
    let power_factor = rng.random_range(0.92..0.99);
    let current_a = current_a(power_w, voltage_v, power_factor);
    let frequency_hz = rng.random_range(49.95..50.05);

    ElectricalState {
        voltage_v,
        current_a,
        frequency_hz,
        power_factor,
    }
}

/// Line current from power, voltage, and power factor.
///
/// A degenerate denominator (voltage x pf rounding to zero) yields a 0 A
/// reading rather than a non-finite value.
pub fn current_a(power_w: f32, voltage_v: f32, power_factor: f32) -> f32 {
    let denom = voltage_v * power_factor;
    if denom.abs() < 1e-3 {
        return 0.0;
    }
    let current = power_w / denom;
    if current.is_finite() { current } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn outputs_stay_in_nominal_bands() {
        let mut rng = StdRng::seed_from_u64(42);
        for power in [0.0_f32, 500.0, 3000.0, 15_000.0] {
            for _ in 0..200 {
                let e = derive(power, &mut rng);
                assert!((0.92..0.99).contains(&e.power_factor));
                assert!((49.95..50.05).contains(&e.frequency_hz));
                assert!(e.voltage_v.is_finite());
                assert!(e.current_a.is_finite());
                assert!(e.current_a >= 0.0);
            }
        }
    }

    #[test]
    fn voltage_sags_with_load() {
        // At 15 kW the sag term is exactly 5 V; noise is bounded by +/-1.5 V.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let idle = derive(0.0, &mut rng);
            let loaded = derive(FEEDER_CAPACITY_W, &mut rng);
            assert!(idle.voltage_v >= NOMINAL_VOLTAGE_V - VOLTAGE_NOISE_V);
            assert!(loaded.voltage_v < NOMINAL_VOLTAGE_V - SAG_AT_CAPACITY_V + VOLTAGE_NOISE_V);
        }
    }

    #[test]
    fn current_matches_ohms_law() {
        let i = current_a(2300.0, 230.0, 1.0);
        assert!((i - 10.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_denominator_reads_zero_amps() {
        assert_eq!(current_a(1000.0, 0.0, 0.95), 0.0);
        assert_eq!(current_a(1000.0, 230.0, 0.0), 0.0);
        assert_eq!(current_a(1000.0, 1e-4, 1.0), 0.0);
    }
}
