//! Time-of-day tariff and carbon accounting.
//!
//! The two running totals are monotonic for the life of the session: they
//! accrue every base tick and are never reset or decremented.

/// Tariff during peak hours, in currency per kWh.
pub const PEAK_RATE: f64 = 0.35;
/// Tariff outside peak hours, in currency per kWh.
pub const OFF_PEAK_RATE: f64 = 0.18;
/// Carbon intensity during peak hours, in kg CO2 per kWh.
pub const PEAK_CARBON_KG_PER_KWH: f64 = 0.25;
/// Carbon intensity outside peak hours, in kg CO2 per kWh.
pub const OFF_PEAK_CARBON_KG_PER_KWH: f64 = 0.15;

/// Peak band: 17:00 through 21:59 local time.
pub fn is_peak_hour(hour: u32) -> bool {
    (17..=21).contains(&hour)
}

/// Tariff for the given wall-clock hour.
pub fn rate_for_hour(hour: u32) -> f64 {
    if is_peak_hour(hour) {
        PEAK_RATE
    } else {
        OFF_PEAK_RATE
    }
}

/// Carbon intensity for the given wall-clock hour.
pub fn carbon_for_hour(hour: u32) -> f64 {
    if is_peak_hour(hour) {
        PEAK_CARBON_KG_PER_KWH
    } else {
        OFF_PEAK_CARBON_KG_PER_KWH
    }
}

/// Session-lifetime cost and emissions totals.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    cost: f64,
    co2_kg: f64,
}

impl Accumulator {
    /// Starts both totals at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accrues one tick's worth of energy at the given hour's rates.
    ///
    /// The tick interval is exactly one second, so the energy increment is
    /// `power_w / 1000 / 3600` kWh. Negative power (which the load model
    /// never publishes) is treated as zero so the totals stay monotonic.
    pub fn accrue(&mut self, power_w: f32, hour: u32) {
        let kwh = f64::from(power_w.max(0.0)) / 1000.0 / 3600.0;
        self.cost += kwh * rate_for_hour(hour);
        self.co2_kg += kwh * carbon_for_hour(hour);
    }

    /// Cumulative cost in currency units.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Cumulative emissions in kilograms of CO2.
    pub fn co2_kg(&self) -> f64 {
        self.co2_kg
    }
}
