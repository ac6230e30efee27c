//! The merged report dataset.
//!
//! Everything the composition engine can stamp: client identity, period
//! label, and the display-ready KPI entries. Variable paths resolve against
//! this structure to a tagged value; `None` means the data is genuinely
//! absent (no logo uploaded, for instance), which the composer renders as a
//! blank stamp.

use chrono::{Datelike, NaiveDate};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::kpi::KpiReportEntry;
use crate::template::{KpiField, VariablePath};
use crate::zone::MetricCategory;

/// Display-ready KPI entries, one per category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub overview: KpiReportEntry,
    pub calls: KpiReportEntry,
    pub web_clicks: KpiReportEntry,
    pub directions: KpiReportEntry,
}

impl KpiReport {
    pub fn get(&self, category: MetricCategory) -> &KpiReportEntry {
        match category {
            MetricCategory::Overview => &self.overview,
            MetricCategory::Calls => &self.calls,
            MetricCategory::WebClicks => &self.web_clicks,
            MetricCategory::Directions => &self.directions,
        }
    }

    pub fn set(&mut self, category: MetricCategory, entry: KpiReportEntry) {
        match category {
            MetricCategory::Overview => self.overview = entry,
            MetricCategory::Calls => self.calls = entry,
            MetricCategory::WebClicks => self.web_clicks = entry,
            MetricCategory::Directions => self.directions = entry,
        }
    }
}

/// A variable path resolved against the dataset.
#[derive(Debug, PartialEq)]
pub enum ResolvedValue<'a> {
    Text(String),
    Image(&'a RgbaImage),
}

/// The filled dataset one report is composed from.
#[derive(Clone, Debug, Default)]
pub struct ReportDataset {
    pub client_name: String,
    /// Client logo, already fetched and decoded. Absent when the client has
    /// not uploaded one.
    pub logo: Option<RgbaImage>,
    /// Period label as printed on the report, e.g. "Mars 2026".
    pub period_label: String,
    pub kpis: KpiReport,
}

impl ReportDataset {
    /// Resolves a variable path to its display value.
    ///
    /// Returns `None` only for data genuinely absent from this dataset; a
    /// resolvable path always yields a value, even if an empty string.
    pub fn resolve(&self, path: &VariablePath) -> Option<ResolvedValue<'_>> {
        match path {
            VariablePath::ClientName => Some(ResolvedValue::Text(self.client_name.clone())),
            VariablePath::ClientLogo => self.logo.as_ref().map(ResolvedValue::Image),
            VariablePath::PeriodLabel => Some(ResolvedValue::Text(self.period_label.clone())),
            VariablePath::Kpi(category, field) => {
                let entry = self.kpis.get(*category);
                let text = match field {
                    KpiField::Current => format_value(entry.current),
                    KpiField::Previous => format_value(entry.previous),
                    KpiField::Analysis => entry.analysis.clone(),
                };
                Some(ResolvedValue::Text(text))
            }
        }
    }
}

/// Formats a KPI value for stamping: whole numbers without a decimal part,
/// everything else rounded to one decimal with the French decimal comma.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded).replace('.', ",")
    }
}

const FRENCH_MONTHS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Period label for the month containing `date`, as the reports print it.
pub fn period_label_for(date: NaiveDate) -> String {
    let month = FRENCH_MONTHS[date.month0() as usize];
    format!("{} {}", month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> ReportDataset {
        let mut kpis = KpiReport::default();
        kpis.set(
            MetricCategory::Calls,
            KpiReportEntry {
                current: 2726.0,
                previous: 1780.5,
                analysis: "Forte progression des appels.".to_string(),
            },
        );
        ReportDataset {
            client_name: "Garage Dupont".to_string(),
            logo: None,
            period_label: "Mars 2026".to_string(),
            kpis,
        }
    }

    #[test]
    fn test_resolve_text_paths() {
        let data = dataset();
        assert_eq!(
            data.resolve(&VariablePath::ClientName),
            Some(ResolvedValue::Text("Garage Dupont".to_string()))
        );
        assert_eq!(
            data.resolve(&VariablePath::Kpi(MetricCategory::Calls, KpiField::Current)),
            Some(ResolvedValue::Text("2726".to_string()))
        );
        assert_eq!(
            data.resolve(&VariablePath::Kpi(MetricCategory::Calls, KpiField::Previous)),
            Some(ResolvedValue::Text("1780,5".to_string()))
        );
        assert_eq!(
            data.resolve(&VariablePath::Kpi(MetricCategory::Calls, KpiField::Analysis)),
            Some(ResolvedValue::Text("Forte progression des appels.".to_string()))
        );
    }

    #[test]
    fn test_resolve_missing_logo_is_none() {
        let data = dataset();
        assert_eq!(data.resolve(&VariablePath::ClientLogo), None);
    }

    #[test]
    fn test_resolve_present_logo() {
        let mut data = dataset();
        data.logo = Some(RgbaImage::new(4, 4));
        assert!(matches!(
            data.resolve(&VariablePath::ClientLogo),
            Some(ResolvedValue::Image(_))
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2726.0), "2726");
        assert_eq!(format_value(1780.53), "1780,5");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-8.25), "-8,3");
    }

    #[test]
    fn test_period_label() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(period_label_for(date), "Mars 2026");
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(period_label_for(date), "Décembre 2025");
    }
}
