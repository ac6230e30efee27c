//! Recurring analytics report pipeline.
//!
//! Takes operator-drawn zones on a reference screenshot, runs OCR against
//! those zones on real screenshots to recover the period's KPI numbers,
//! derives period-over-period evolution, and stamps the merged dataset onto
//! multi-page report templates.
//!
//! The crate is a library-level subsystem: the surrounding application owns
//! record storage, uploads, and all CRUD surfaces, and feeds this crate
//! screenshots, pointer events, and template configurations.

pub mod compose;
pub mod dataset;
pub mod editor;
pub mod kpi;
pub mod ocr;
pub mod storage;
pub mod template;
pub mod zone;

pub use dataset::{ReportDataset, ResolvedValue};
pub use kpi::{CancelToken, ExtractedKpi, KpiReportEntry, KpiSet};
pub use zone::{KpiZonesConfig, MetricCategory, Zone, ZonePair};
