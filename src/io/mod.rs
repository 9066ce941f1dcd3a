/// CSV export for meter readings.
pub mod export;
