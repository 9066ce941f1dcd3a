//! Household devices that contribute to the metered load.

pub mod registry;
pub mod types;

// Re-export the main types for convenience
pub use registry::DeviceRegistry;
pub use types::Device;
pub use types::DeviceCategory;
