//! Fixed device roster with toggle-only mutation.

use tracing::debug;

use super::types::{Device, DeviceCategory};

/// The set of devices behind the virtual meter.
///
/// Devices are created once at engine start and never added or removed;
/// the only mutation is flipping a device's `is_on` flag. Iteration order is
/// the roster order, which keeps randomized load draws reproducible for a
/// given seed.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Creates a registry from a fixed roster.
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// The default home roster: HVAC and kitchen/lighting on, the heavy
    /// loads (EV charger, geyser) off.
    pub fn default_home() -> Self {
        let mk = |id: &str,
                  name: &str,
                  category: DeviceCategory,
                  is_on: bool,
                  base_load_w: f32,
                  variability_w: f32,
                  surge_probability: f32| Device {
            id: id.to_string(),
            name: name.to_string(),
            category,
            is_on,
            base_load_w,
            variability_w,
            surge_probability,
        };

        Self::new(vec![
            mk("1", "HVAC System", DeviceCategory::Ac, true, 2200.0, 150.0, 0.05),
            mk("2", "EV Charger", DeviceCategory::Ev, false, 7200.0, 50.0, 0.01),
            mk("3", "Smart Geyser", DeviceCategory::Heater, false, 3000.0, 20.0, 0.02),
            mk("4", "Kitchen Array", DeviceCategory::Other, true, 450.0, 80.0, 0.1),
            mk("5", "Lighting Grid", DeviceCategory::Light, true, 120.0, 5.0, 0.0),
        ])
    }

    /// Flips the on/off flag of the device with the given id.
    ///
    /// Unknown ids are a no-op; the registry stays unchanged and `false` is
    /// returned.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.devices.iter_mut().find(|d| d.id == id) {
            Some(device) => {
                device.is_on = !device.is_on;
                true
            }
            None => {
                debug!(id, "toggle ignored: unknown device id");
                false
            }
        }
    }

    /// Returns the device with the given id, if present.
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Read-only view of the roster.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Owned copy of the roster for publishing.
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.clone()
    }

    /// Number of devices in the roster.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
