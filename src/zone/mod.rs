pub mod config;
pub mod model;

pub use config::{KpiZonesConfig, MetricCategory, ZonePair};
pub use model::{PixelRect, Zone};
