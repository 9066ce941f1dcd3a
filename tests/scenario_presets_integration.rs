//! Integration tests for built-in scenario presets.

use district_sim::config::ScenarioConfig;
use district_sim::sim::engine::Engine;
use district_sim::sim::report::SessionReport;

fn run_preset(name: &str) -> SessionReport {
    let cfg = ScenarioConfig::from_preset(name).expect("preset should load");
    assert!(cfg.validate().is_empty(), "preset \"{name}\" should validate");
    let (sim, registry, ambient) = cfg.build();
    let mut engine = Engine::new(sim, registry);
    engine.set_ambient(ambient);
    SessionReport::from_readings(&engine.run())
}

#[test]
fn presets_produce_distinct_dynamics() {
    let baseline = run_preset("baseline");
    let heatwave = run_preset("heatwave");
    let ev_evening = run_preset("ev_evening");

    // 35 C drives the HVAC multiplier: identical seeds, strictly more power
    assert!(
        heatwave.avg_power_w > baseline.avg_power_w,
        "expected heatwave to out-draw baseline: {:.1} vs {:.1}",
        heatwave.avg_power_w,
        baseline.avg_power_w
    );

    // the 7.2 kW charger dominates everything else in the roster
    assert!(
        ev_evening.avg_power_w > baseline.avg_power_w + 3000.0,
        "expected the EV preset to out-draw baseline: {:.1} vs {:.1}",
        ev_evening.avg_power_w,
        baseline.avg_power_w
    );

    // more power plus peak-band tariffs means strictly higher cost
    assert!(ev_evening.total_cost > baseline.total_cost);
}

#[test]
fn ev_evening_accrues_at_peak_rates() {
    let cfg = ScenarioConfig::from_preset("ev_evening").expect("preset should load");
    let (sim, registry, ambient) = cfg.build();
    assert_eq!(sim.start_hour, 18);
    let mut engine = Engine::new(sim, registry);
    engine.set_ambient(ambient);
    engine.run();
    assert!(engine.snapshot().is_peak_hour);
}
