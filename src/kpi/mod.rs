pub mod evolution;
pub mod extract;

pub use evolution::{evolution_percentage, to_report_entry, KpiReportEntry};
pub use extract::{
    extract_all, extract_category, CancelToken, ExtractedKpi, KpiSet, ScreenshotSet,
    ZoneConfidence, ZoneRawText,
};
