//! Building floor loads: a bounded random walk stepped every 3rd tick.

use rand::Rng;
use rand::rngs::StdRng;

use serde::Serialize;

/// Half-width of the per-step load change, in kW.
const LOAD_STEP_KW: f32 = 5.0;
/// Loads may overshoot capacity by this factor before clamping.
const OVERLOAD_HEADROOM: f32 = 1.2;

/// Load status derived from the load/capacity ratio.
///
/// Always recomputed from the current ratio when a floor steps; never carried
/// stale from a previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorStatus {
    Normal,
    Warning,
    High,
    Critical,
}

/// One floor of the building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingFloor {
    pub id: &'static str,
    pub name: &'static str,
    /// Present load in kW, clamped to `[0, 1.2 x capacity]`.
    pub load_kw: f32,
    /// Fixed electrical capacity in kW.
    pub capacity_kw: f32,
    pub status: FloorStatus,
}

impl BuildingFloor {
    fn new(id: &'static str, name: &'static str, load_kw: f32, capacity_kw: f32) -> Self {
        Self {
            id,
            name,
            load_kw,
            capacity_kw,
            status: status_for_ratio(load_kw / capacity_kw),
        }
    }
}

/// Status thresholds on the load/capacity ratio (strict comparisons, so a
/// ratio exactly on a boundary falls to the lower band).
pub fn status_for_ratio(ratio: f32) -> FloorStatus {
    if ratio > 1.1 {
        FloorStatus::Critical
    } else if ratio > 0.9 {
        FloorStatus::High
    } else if ratio > 0.75 {
        FloorStatus::Warning
    } else {
        FloorStatus::Normal
    }
}

/// The fixed eight-floor building, roof to basement.
pub fn default_floors() -> Vec<BuildingFloor> {
    vec![
        BuildingFloor::new("R", "Roof / HVAC", 185.0, 200.0),
        BuildingFloor::new("5", "Floor 5", 45.0, 100.0),
        BuildingFloor::new("4", "Floor 4", 82.0, 100.0),
        BuildingFloor::new("3", "Floor 3", 95.0, 100.0),
        BuildingFloor::new("2", "Floor 2", 30.0, 100.0),
        BuildingFloor::new("1", "Floor 1", 55.0, 100.0),
        BuildingFloor::new("G", "Lobby / Retail", 120.0, 150.0),
        BuildingFloor::new("B", "Basement / EV", 160.0, 180.0),
    ]
}

/// Advances every floor by one bounded random-walk step.
///
/// Each load moves by uniform +/-5 kW, is clamped to `[0, 1.2 x capacity]`,
/// rounded to one decimal, and gets its status recomputed from the new ratio.
pub fn step_floors(floors: &mut [BuildingFloor], rng: &mut StdRng) {
    for floor in floors {
        let next = floor.load_kw + rng.random_range(-LOAD_STEP_KW..LOAD_STEP_KW);
        let clamped = next.clamp(0.0, floor.capacity_kw * OVERLOAD_HEADROOM);
        floor.load_kw = (clamped * 10.0).round() / 10.0;
        floor.status = status_for_ratio(floor.load_kw / floor.capacity_kw);
    }
}
