//! Aggregate load model: device draws, thermal scaling, noise, and surges.
//!
//! Every function here is a transition of the form `output = f(inputs, rng)`;
//! handing in a seeded RNG makes the whole load pipeline reproducible.

use rand::Rng;
use rand::rngs::StdRng;

use crate::devices::{Device, DeviceCategory};

/// Always-on parasitic draw added to every tick, in watts.
pub const PHANTOM_BASE_W: f32 = 40.0;
/// Upper bound of the uniform noise added to the phantom load, in watts.
pub const PHANTOM_NOISE_W: f32 = 5.0;

/// Thermal setpoint for AC loads, in degrees Celsius.
const AC_SETPOINT_C: f32 = 22.0;
/// Fractional load increase per degree of deviation from the setpoint.
const AC_GAIN_PER_DEG: f32 = 0.08;
/// Multiplier applied when a surge fires.
const SURGE_FACTOR: f32 = 1.4;

/// Computes one powered-on device's instantaneous draw in watts.
///
/// Starts from the base load; AC devices scale multiplicatively with the
/// ambient temperature's deviation from 22 °C (deliberately unbounded above,
/// there is no HVAC capacity ceiling); symmetric uniform noise of half-width
/// `variability/2` is added; finally the whole draw is multiplied by 1.4 with
/// probability `surge_probability`.
pub fn device_draw_w(device: &Device, ambient_c: f32, rng: &mut StdRng) -> f32 {
    let mut draw = device.base_load_w;

    if device.category == DeviceCategory::Ac {
        let deviation = (ambient_c - AC_SETPOINT_C).abs();
        draw *= 1.0 + AC_GAIN_PER_DEG * deviation;
    }

    draw += rng.random_range(-0.5..0.5) * device.variability_w;

    if rng.random::<f32>() < device.surge_probability {
        draw *= SURGE_FACTOR;
    }

    draw
}

/// Sums the draws of all powered-on devices plus the phantom baseline.
///
/// Powered-off devices consume no random draws, so toggling a device changes
/// the random stream from that tick on. The result is clamped to >= 0 before
/// publishing even though the accumulation is structurally non-negative.
pub fn aggregate_power_w(devices: &[Device], ambient_c: f32, rng: &mut StdRng) -> f32 {
    let mut total = 0.0_f32;
    for device in devices.iter().filter(|d| d.is_on) {
        total += device_draw_w(device, ambient_c, rng);
    }
    total += PHANTOM_BASE_W + rng.random::<f32>() * PHANTOM_NOISE_W;
    total.max(0.0)
}
