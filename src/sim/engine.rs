//! Simulation engine that owns all district state and drives it per tick.

use chrono::{Local, Timelike};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::ambient::AmbientReading;
use crate::devices::{Device, DeviceRegistry};

use super::building::{self, BuildingFloor};
use super::city::{self, CityWard};
use super::clock::{BUILDING_CADENCE, CITY_CADENCE, Clock, INDUSTRY_CADENCE};
use super::daily::{self, DailyStat};
use super::electrical;
use super::history::RingBuffer;
use super::industry::{self, IndustryMachine, SCOPE_CAPACITY, ScopeSample};
use super::load;
use super::market::{CarbonMarket, MarketSnapshot, TradeOutcome, TradeSide};
use super::tariff;
use super::types::{Reading, SimConfig};

/// Meter readings retained for charting.
pub const HISTORY_CAPACITY: usize = 60;

/// Simulation engine owning every piece of mutable district state.
///
/// The engine is the single writer: external collaborators read published
/// snapshots and mutate state only through [`Engine::toggle_device`] and
/// [`Engine::trade`]. All randomness flows from one seeded RNG, so a run is
/// fully determined by its configuration and command schedule.
pub struct Engine {
    config: SimConfig,
    clock: Clock,
    rng: StdRng,
    devices: DeviceRegistry,
    ambient: AmbientReading,
    reading: Reading,
    history: RingBuffer<Reading>,
    accumulator: tariff::Accumulator,
    floors: Vec<BuildingFloor>,
    machines: Vec<IndustryMachine>,
    scope: RingBuffer<ScopeSample>,
    wards: Vec<CityWard>,
    market: CarbonMarket,
    daily_stats: Vec<DailyStat>,
    last_hour: u32,
}

/// Immutable copy of all published engine state.
///
/// Produced after each tick; readers holding a snapshot can never observe a
/// half-applied command or a partially updated reading.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub tick: u64,
    pub reading: Reading,
    pub history: Vec<Reading>,
    pub devices: Vec<Device>,
    pub ambient: AmbientReading,
    pub is_peak_hour: bool,
    pub floors: Vec<BuildingFloor>,
    pub machines: Vec<IndustryMachine>,
    pub scope: Vec<ScopeSample>,
    pub wards: Vec<CityWard>,
    pub market: MarketSnapshot,
    pub daily_stats: Vec<DailyStat>,
}

impl Engine {
    /// Creates an engine with the given device roster.
    ///
    /// Entity sets (floors, machines, wards) and the daily baseline are fixed
    /// here; the randomized ward starting state and daily noise are drawn
    /// from the seeded RNG before the first tick.
    pub fn new(config: SimConfig, devices: DeviceRegistry) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let wards = city::default_wards(&mut rng);
        let daily_stats = daily::generate(&mut rng);
        let start_hour = config.start_hour;

        Self {
            config,
            clock: Clock::new(),
            rng,
            devices,
            ambient: AmbientReading::fallback(),
            reading: Reading {
                timestamp_ms: 0,
                power_w: 0.0,
                voltage_v: electrical::NOMINAL_VOLTAGE_V,
                current_a: 0.0,
                frequency_hz: 50.0,
                power_factor: 0.95,
                cost: 0.0,
                co2_kg: 0.0,
                temperature_c: AmbientReading::fallback().temperature_c,
            },
            history: RingBuffer::new(HISTORY_CAPACITY),
            accumulator: tariff::Accumulator::new(),
            floors: building::default_floors(),
            machines: industry::default_machines(),
            scope: RingBuffer::new(SCOPE_CAPACITY),
            wards,
            market: CarbonMarket::new(),
            daily_stats,
            last_hour: start_hour,
        }
    }

    /// Executes one tick at the given timestamp and wall-clock hour.
    ///
    /// Pipeline order is fixed: load, electrical, tariff accrual, history
    /// append, then the gated district models, then the market. Commands
    /// issued between ticks are already applied by the time this runs, so a
    /// tick never sees a half-applied command.
    pub fn step_at(&mut self, timestamp_ms: i64, hour: u32) -> &Reading {
        let tick = self.clock.advance();
        self.last_hour = hour;

        let power_w =
            load::aggregate_power_w(self.devices.devices(), self.ambient.temperature_c, &mut self.rng);
        let elec = electrical::derive(power_w, &mut self.rng);
        self.accumulator.accrue(power_w, hour);

        let reading = Reading {
            timestamp_ms,
            power_w,
            voltage_v: elec.voltage_v,
            current_a: elec.current_a,
            frequency_hz: elec.frequency_hz,
            power_factor: elec.power_factor,
            cost: self.accumulator.cost(),
            co2_kg: self.accumulator.co2_kg(),
            temperature_c: self.ambient.temperature_c,
        };
        self.history.push(reading.clone());
        self.reading = reading;

        if Clock::fires(tick, BUILDING_CADENCE) {
            building::step_floors(&mut self.floors, &mut self.rng);
        }
        if Clock::fires(tick, INDUSTRY_CADENCE) {
            industry::step_machines(&mut self.machines, &mut self.rng);
            industry::push_scope_sample(&mut self.scope, timestamp_ms, &mut self.rng);
        }
        if Clock::fires(tick, CITY_CADENCE) {
            city::step_wards(&mut self.wards, &mut self.rng);
        }
        self.market.step(timestamp_ms, &mut self.rng);

        &self.reading
    }

    /// Executes one tick against the real wall clock.
    ///
    /// The peak/off-peak classification keys on the local hour.
    pub fn step(&mut self) -> &Reading {
        let now = Local::now();
        self.step_at(now.timestamp_millis(), now.hour())
    }

    /// Runs the configured number of ticks headlessly and returns every
    /// reading produced.
    ///
    /// Timestamps count from zero and the hour advances from
    /// `config.start_hour` at one simulated second per tick, so the record is
    /// reproducible for a given seed.
    pub fn run(&mut self) -> Vec<Reading> {
        let total = self.config.ticks;
        let mut readings = Vec::with_capacity(total as usize);
        for t in 0..total {
            let hour = self.config.hour_at(t);
            readings.push(self.step_at(t as i64 * 1000, hour).clone());
        }
        readings
    }

    /// Flips a device's on/off flag. Unknown ids are a no-op.
    pub fn toggle_device(&mut self, id: &str) -> bool {
        self.devices.toggle(id)
    }

    /// Executes a trade against the carbon market at the current price.
    ///
    /// Applies immediately; the change is visible on the next read.
    pub fn trade(&mut self, amount: f64, side: TradeSide) -> TradeOutcome {
        let outcome = self.market.trade(amount, side);
        if outcome == TradeOutcome::Rejected {
            debug!(amount, ?side, "trade rejected, ledger unchanged");
        }
        outcome
    }

    /// Replaces the ambient reading used from the next tick on.
    pub fn set_ambient(&mut self, ambient: AmbientReading) {
        self.ambient = ambient;
    }

    /// The ambient reading currently in effect.
    pub fn ambient(&self) -> &AmbientReading {
        &self.ambient
    }

    /// The most recent published reading.
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    /// Bounded reading history, oldest first.
    pub fn history(&self) -> Vec<Reading> {
        self.history.to_vec()
    }

    /// The device roster.
    pub fn devices(&self) -> &[Device] {
        self.devices.devices()
    }

    /// Building floor states.
    pub fn floors(&self) -> &[BuildingFloor] {
        &self.floors
    }

    /// Industry machine states.
    pub fn machines(&self) -> &[IndustryMachine] {
        &self.machines
    }

    /// City ward states.
    pub fn wards(&self) -> &[CityWard] {
        &self.wards
    }

    /// The market ledger and price history.
    pub fn market(&self) -> MarketSnapshot {
        self.market.snapshot()
    }

    /// The static daily baseline.
    pub fn daily_stats(&self) -> &[DailyStat] {
        &self.daily_stats
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// The simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Copies all published state into one immutable snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tick: self.clock.tick(),
            reading: self.reading.clone(),
            history: self.history.to_vec(),
            devices: self.devices.snapshot(),
            ambient: self.ambient.clone(),
            is_peak_hour: tariff::is_peak_hour(self.last_hour),
            floors: self.floors.clone(),
            machines: self.machines.clone(),
            scope: self.scope.to_vec(),
            wards: self.wards.clone(),
            market: self.market.snapshot(),
            daily_stats: self.daily_stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> Engine {
        Engine::new(SimConfig::new(120, 12, seed), DeviceRegistry::default_home())
    }

    #[test]
    fn pipeline_produces_bounded_readings() {
        let mut e = engine(42);
        for t in 0..600 {
            let r = e.step_at(t * 1000, 12);
            assert!(r.power_w >= 0.0);
            assert!((0.0..=1.0).contains(&r.power_factor));
            assert!((49.9..=50.1).contains(&r.frequency_hz));
            assert!(r.current_a.is_finite());
        }
    }

    #[test]
    fn totals_are_monotonic_across_toggles() {
        let mut e = engine(42);
        let mut last_cost = 0.0;
        let mut last_co2 = 0.0;
        for t in 0..300 {
            if t % 50 == 0 {
                e.toggle_device("2");
            }
            let r = e.step_at(t * 1000, 18);
            assert!(r.cost >= last_cost);
            assert!(r.co2_kg >= last_co2);
            last_cost = r.cost;
            last_co2 = r.co2_kg;
        }
    }

    #[test]
    fn history_keeps_the_last_60_in_order() {
        let mut e = engine(1);
        for t in 0..61 {
            e.step_at(t * 1000, 12);
        }
        let history = e.history();
        assert_eq!(history.len(), 60);
        // the first tick's reading was evicted, readings 2..=61 remain
        assert_eq!(history.first().map(|r| r.timestamp_ms), Some(1000));
        assert!(history.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    #[test]
    fn subordinate_models_step_on_their_cadence() {
        let mut e = engine(42);
        let floors_start = e.floors().to_vec();
        let wards_start = e.wards().to_vec();

        e.step_at(0, 12);
        e.step_at(1000, 12);
        assert_eq!(e.floors(), floors_start.as_slice(), "before 3rd tick");
        assert_eq!(e.wards(), wards_start.as_slice(), "before 5th tick");

        e.step_at(2000, 12);
        assert_ne!(e.floors(), floors_start.as_slice(), "after 3rd tick");
        assert_eq!(e.wards(), wards_start.as_slice(), "before 5th tick");

        e.step_at(3000, 12);
        e.step_at(4000, 12);
        assert_ne!(e.wards(), wards_start.as_slice(), "after 5th tick");
    }

    #[test]
    fn scope_trace_grows_every_second_tick() {
        let mut e = engine(42);
        for t in 0..10 {
            e.step_at(t * 1000, 12);
        }
        assert_eq!(e.snapshot().scope.len(), 5);
    }

    #[test]
    fn market_steps_every_tick() {
        let mut e = engine(42);
        for t in 0..7 {
            e.step_at(t * 1000, 12);
        }
        assert_eq!(e.market().history.len(), 7);
    }

    #[test]
    fn same_seed_and_commands_give_identical_records() {
        let mut a = engine(99);
        let mut b = engine(99);
        for e in [&mut a, &mut b] {
            e.toggle_device("3");
        }
        assert_eq!(a.run(), b.run());
        assert_eq!(a.snapshot().wards, b.snapshot().wards);
        assert_eq!(a.market(), b.market());
    }

    #[test]
    fn toggling_the_ev_charger_shows_up_in_power() {
        // 7.2 kW of base load dominates every other bounded term, so the
        // toggled engine must read higher even on divergent random streams
        let mut off = engine(5);
        let mut on = engine(5);
        on.toggle_device("2");
        let p_off = off.step_at(0, 12).power_w;
        let p_on = on.step_at(0, 12).power_w;
        assert!(p_on > p_off + 3000.0, "p_on={p_on} p_off={p_off}");
    }

    #[test]
    fn double_toggle_restores_the_roster() {
        let mut e = engine(7);
        let before = e.devices().to_vec();
        e.toggle_device("4");
        e.toggle_device("4");
        assert_eq!(e.devices(), before.as_slice());
    }

    #[test]
    fn ambient_change_takes_effect_next_tick() {
        let mut mild = engine(13);
        let mut hot = engine(13);
        hot.set_ambient(AmbientReading {
            temperature_c: 35.0,
            ..AmbientReading::fallback()
        });
        // identical RNG streams; the HVAC thermal multiplier is the only
        // difference, so the hot engine reads strictly higher
        let p_mild = mild.step_at(0, 12).power_w;
        let p_hot = hot.step_at(0, 12).power_w;
        assert!(p_hot > p_mild);
        assert_eq!(hot.reading().temperature_c, 35.0);
    }

    #[test]
    fn daily_stats_are_static_across_ticks() {
        let mut e = engine(21);
        let before = e.daily_stats().to_vec();
        for t in 0..50 {
            e.step_at(t * 1000, 12);
        }
        assert_eq!(e.daily_stats(), before.as_slice());
        assert_eq!(before.len(), 24);
    }

    #[test]
    fn snapshot_reflects_peak_classification() {
        let mut e = engine(3);
        e.step_at(0, 12);
        assert!(!e.snapshot().is_peak_hour);
        e.step_at(1000, 19);
        assert!(e.snapshot().is_peak_hour);
    }

    #[test]
    fn headless_run_matches_configured_tick_count() {
        let mut e = engine(42);
        let readings = e.run();
        assert_eq!(readings.len(), 120);
        assert_eq!(e.tick(), 120);
    }
}
