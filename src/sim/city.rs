//! City ward loads and stress, stepped every 5th tick.

use rand::Rng;
use rand::rngs::StdRng;

use serde::Serialize;

/// Number of wards in the district.
pub const WARD_COUNT: usize = 24;
/// Half-width of the per-step load change, in percent points.
const LOAD_STEP: f32 = 5.0;
/// Half-width of the per-step stress change.
const STRESS_STEP: f32 = 0.05;

/// One ward of the city grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityWard {
    pub id: u32,
    /// Relative load in percent, clamped to `[0, 100]`.
    pub load_pct: f32,
    /// Infrastructure stress index, clamped to `[0, 1]`.
    pub stress: f32,
}

/// The 24 wards with randomized starting load and stress.
pub fn default_wards(rng: &mut StdRng) -> Vec<CityWard> {
    (1..=WARD_COUNT as u32)
        .map(|id| CityWard {
            id,
            load_pct: rng.random::<f32>() * 100.0,
            stress: rng.random::<f32>(),
        })
        .collect()
}

/// Advances every ward by one bounded random-walk step.
pub fn step_wards(wards: &mut [CityWard], rng: &mut StdRng) {
    for ward in wards {
        let load = ward.load_pct + rng.random_range(-LOAD_STEP..LOAD_STEP);
        ward.load_pct = load.clamp(0.0, 100.0);
        let stress = ward.stress + rng.random_range(-STRESS_STEP..STRESS_STEP);
        ward.stress = stress.clamp(0.0, 1.0);
    }
}
