//! Metric categories and the per-category KPI zone configuration.
//!
//! The four tracked categories are a closed set; the extraction engine is
//! keyed by category. Each category owns two zones on the reference
//! screenshot: `current` (an absolute value) and `previous` (the evolution
//! percentage as printed next to it).

use serde::{Deserialize, Serialize};

use super::model::Zone;

/// One of the four tracked business metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Profile overview interactions.
    Overview,
    /// Phone calls.
    Calls,
    /// Website clicks.
    WebClicks,
    /// Direction requests.
    Directions,
}

impl MetricCategory {
    /// All categories, in report order.
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::Overview,
        MetricCategory::Calls,
        MetricCategory::WebClicks,
        MetricCategory::Directions,
    ];

    /// Stable wire name, used in persisted configuration and variable paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Calls => "calls",
            Self::WebClicks => "web_clicks",
            Self::Directions => "directions",
        }
    }

    /// Human-readable label for editor overlays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Calls => "Calls",
            Self::WebClicks => "Web clicks",
            Self::Directions => "Direction requests",
        }
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two zones a category owns on the reference screenshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZonePair {
    /// Zone containing the current period's absolute value.
    pub current: Zone,
    /// Zone containing the printed evolution percentage.
    pub previous: Zone,
}

/// Mapping from each category to its zone pair.
///
/// Created empty, filled incrementally by the zone editor. A category's pair
/// is always replaced wholesale, never merged field by field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiZonesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<ZonePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls: Option<ZonePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_clicks: Option<ZonePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<ZonePair>,
}

impl KpiZonesConfig {
    /// Returns the zone pair for a category, if one has been saved.
    pub fn get(&self, category: MetricCategory) -> Option<&ZonePair> {
        match category {
            MetricCategory::Overview => self.overview.as_ref(),
            MetricCategory::Calls => self.calls.as_ref(),
            MetricCategory::WebClicks => self.web_clicks.as_ref(),
            MetricCategory::Directions => self.directions.as_ref(),
        }
    }

    /// Replaces a category's pair wholesale.
    pub fn set(&mut self, category: MetricCategory, pair: ZonePair) {
        let slot = match category {
            MetricCategory::Overview => &mut self.overview,
            MetricCategory::Calls => &mut self.calls,
            MetricCategory::WebClicks => &mut self.web_clicks,
            MetricCategory::Directions => &mut self.directions,
        };
        *slot = Some(pair);
    }

    /// True when the category has both zones saved.
    pub fn is_complete(&self, category: MetricCategory) -> bool {
        self.get(category).is_some()
    }

    /// Categories that still lack a zone pair.
    pub fn missing_categories(&self) -> Vec<MetricCategory> {
        MetricCategory::ALL
            .iter()
            .copied()
            .filter(|c| !self.is_complete(*c))
            .collect()
    }
}
