//! KPI extraction from screenshots.
//!
//! Orchestrates the OCR service and parsers across the four metric
//! categories. The batch operation races all categories concurrently and
//! joins with a gather-all policy: a category whose screenshot is missing or
//! whose zones cannot be read comes back all-null and zero-confidence
//! instead of failing the batch, so a report with three good categories
//! stays usable.

use image::RgbaImage;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::ocr::{parse_number, parse_percentage, OcrResult, OcrService};
use crate::zone::{KpiZonesConfig, MetricCategory};

/// OCR confidence for the two zones of one category (0.0-100.0 each).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfidence {
    pub current: f32,
    pub previous: f32,
}

/// Raw recognized text for the two zones, kept for diagnostics and audit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRawText {
    pub current: String,
    pub previous: String,
}

/// OCR output for one category.
///
/// `Default` is the degraded value: all-null, zero confidence, empty text.
/// Derived data, recomputed from screenshots each time extraction runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKpi {
    /// Current period's absolute value, when a number was recovered.
    pub current: Option<f64>,
    /// Evolution percentage as printed on the screenshot, signed.
    pub previous_pct: Option<f64>,
    pub confidence: ZoneConfidence,
    pub raw: ZoneRawText,
}

/// The screenshots a batch extraction runs against, one per category.
/// Categories may share one screenshot; absent entries degrade that
/// category rather than failing the batch.
#[derive(Clone, Debug, Default)]
pub struct ScreenshotSet {
    pub overview: Option<RgbaImage>,
    pub calls: Option<RgbaImage>,
    pub web_clicks: Option<RgbaImage>,
    pub directions: Option<RgbaImage>,
}

impl ScreenshotSet {
    /// One screenshot shared by all four categories (the common case:
    /// every metric is on the same stats page).
    pub fn shared(img: RgbaImage) -> Self {
        Self {
            overview: Some(img.clone()),
            calls: Some(img.clone()),
            web_clicks: Some(img.clone()),
            directions: Some(img),
        }
    }

    pub fn get(&self, category: MetricCategory) -> Option<&RgbaImage> {
        match category {
            MetricCategory::Overview => self.overview.as_ref(),
            MetricCategory::Calls => self.calls.as_ref(),
            MetricCategory::WebClicks => self.web_clicks.as_ref(),
            MetricCategory::Directions => self.directions.as_ref(),
        }
    }

    pub fn set(&mut self, category: MetricCategory, img: RgbaImage) {
        match category {
            MetricCategory::Overview => self.overview = Some(img),
            MetricCategory::Calls => self.calls = Some(img),
            MetricCategory::WebClicks => self.web_clicks = Some(img),
            MetricCategory::Directions => self.directions = Some(img),
        }
    }
}

/// Fixed-shape batch result: exactly one entry per category, always.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub overview: ExtractedKpi,
    pub calls: ExtractedKpi,
    pub web_clicks: ExtractedKpi,
    pub directions: ExtractedKpi,
}

impl KpiSet {
    pub fn get(&self, category: MetricCategory) -> &ExtractedKpi {
        match category {
            MetricCategory::Overview => &self.overview,
            MetricCategory::Calls => &self.calls,
            MetricCategory::WebClicks => &self.web_clicks,
            MetricCategory::Directions => &self.directions,
        }
    }

    fn set(&mut self, category: MetricCategory, kpi: ExtractedKpi) {
        match category {
            MetricCategory::Overview => self.overview = kpi,
            MetricCategory::Calls => self.calls = kpi,
            MetricCategory::WebClicks => self.web_clicks = kpi,
            MetricCategory::Directions => self.directions = kpi,
        }
    }

    /// Categories that came back without a current value and should be
    /// flagged for manual correction.
    pub fn degraded_categories(&self) -> Vec<MetricCategory> {
        MetricCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.get(*c).current.is_none())
            .collect()
    }
}

/// Cooperative cancellation for a batch extraction.
///
/// Cancelling stops issuing further OCR calls; categories already extracted
/// are returned as-is and the rest come back degraded.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Extracts one category's KPI from a screenshot.
///
/// Reads the `current` zone as a number and the `previous` zone as a signed
/// percentage. A category with no saved zone pair degrades to the default
/// result. The token is re-checked before each zone read, so a cancellation
/// arriving mid-category stops further OCR calls and keeps what was already
/// recognized.
pub fn extract_category(
    service: &OcrService,
    screenshot: &RgbaImage,
    category: MetricCategory,
    config: &KpiZonesConfig,
    cancel: &CancelToken,
) -> ExtractedKpi {
    let Some(pair) = config.get(category) else {
        warn!("No zones configured for {category}, skipping extraction");
        return ExtractedKpi::default();
    };

    if cancel.is_cancelled() {
        info!("Extraction cancelled before {category}");
        return ExtractedKpi::default();
    }
    let current = service.read_zone(screenshot, &pair.current);

    let previous = if cancel.is_cancelled() {
        info!("Extraction cancelled during {category}, skipping previous zone");
        OcrResult::empty()
    } else {
        service.read_zone(screenshot, &pair.previous)
    };

    ExtractedKpi {
        current: parse_number(&current.text),
        previous_pct: parse_percentage(&previous.text),
        confidence: ZoneConfidence {
            current: current.confidence,
            previous: previous.confidence,
        },
        raw: ZoneRawText {
            current: current.text,
            previous: previous.text,
        },
    }
}

/// Extracts all four categories concurrently.
///
/// Gather-all join: every category gets exactly one result, degraded when
/// its screenshot is absent, its zones are unconfigured, or the token
/// tripped before its zones were read. Never fails as a batch.
pub fn extract_all(
    service: &OcrService,
    screenshots: &ScreenshotSet,
    config: &KpiZonesConfig,
    cancel: &CancelToken,
) -> KpiSet {
    let mut set = KpiSet::default();

    thread::scope(|scope| {
        let handles: Vec<_> = MetricCategory::ALL
            .iter()
            .map(|&category| {
                scope.spawn(move || {
                    if cancel.is_cancelled() {
                        info!("Extraction cancelled before {category}");
                        return (category, ExtractedKpi::default());
                    }
                    let Some(screenshot) = screenshots.get(category) else {
                        warn!("No screenshot for {category}, returning empty result");
                        return (category, ExtractedKpi::default());
                    };
                    (category, extract_category(service, screenshot, category, config, cancel))
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok((category, kpi)) => set.set(category, kpi),
                // A panicking extraction thread degrades its category only
                Err(_) => warn!("Extraction thread panicked, leaving category empty"),
            }
        }
    });

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{OcrResult, TextRecognizer};
    use crate::zone::{Zone, ZonePair};
    use anyhow::Result;
    use std::sync::atomic::AtomicUsize;

    /// Recognizer that answers from a fixed table keyed by zone x position.
    struct TableRecognizer {
        entries: Vec<(f32, &'static str)>,
    }

    impl TextRecognizer for TableRecognizer {
        fn recognize(&self, _img: &RgbaImage, zone: &Zone) -> Result<OcrResult> {
            let text = self
                .entries
                .iter()
                .find(|(x, _)| *x == zone.x)
                .map(|(_, t)| *t)
                .unwrap_or("");
            Ok(OcrResult {
                text: text.to_string(),
                confidence: if text.is_empty() { 0.0 } else { 85.0 },
            })
        }
    }

    fn service_with(entries: Vec<(f32, &'static str)>) -> OcrService {
        OcrService::with_factory(Box::new(move || {
            Ok(Box::new(TableRecognizer {
                entries: entries.clone(),
            }) as Box<dyn TextRecognizer>)
        }))
    }

    fn pair_at(x_current: f32, x_previous: f32) -> ZonePair {
        ZonePair {
            current: Zone::new(x_current, 0.0, 10.0, 10.0),
            previous: Zone::new(x_previous, 0.0, 10.0, 10.0),
        }
    }

    fn full_config() -> KpiZonesConfig {
        let mut config = KpiZonesConfig::default();
        config.set(MetricCategory::Overview, pair_at(0.0, 1.0));
        config.set(MetricCategory::Calls, pair_at(2.0, 3.0));
        config.set(MetricCategory::WebClicks, pair_at(4.0, 5.0));
        config.set(MetricCategory::Directions, pair_at(6.0, 7.0));
        config
    }

    #[test]
    fn test_extract_category_parses_both_zones() {
        let service = service_with(vec![(2.0, "2 726"), (3.0, "+53,1%")]);
        let config = full_config();
        let img = RgbaImage::new(50, 50);

        let kpi = extract_category(&service, &img, MetricCategory::Calls, &config, &CancelToken::new());
        assert_eq!(kpi.current, Some(2726.0));
        assert_eq!(kpi.previous_pct, Some(53.1));
        assert_eq!(kpi.confidence.current, 85.0);
        assert_eq!(kpi.raw.current, "2 726");
        assert_eq!(kpi.raw.previous, "+53,1%");
    }

    #[test]
    fn test_extract_category_without_zones_degrades() {
        let service = service_with(vec![]);
        let config = KpiZonesConfig::default();
        let img = RgbaImage::new(50, 50);

        let kpi = extract_category(&service, &img, MetricCategory::Calls, &config, &CancelToken::new());
        assert_eq!(kpi, ExtractedKpi::default());
    }

    #[test]
    fn test_extract_all_populates_every_category() {
        let service = service_with(vec![
            (0.0, "845"),
            (1.0, "+12%"),
            (2.0, "2726"),
            (3.0, "+53,1%"),
            (4.0, "431"),
            (5.0, "-8%"),
            (6.0, "129"),
            (7.0, "0%"),
        ]);
        let config = full_config();
        let screenshots = ScreenshotSet::shared(RgbaImage::new(50, 50));

        let set = extract_all(&service, &screenshots, &config, &CancelToken::new());
        assert_eq!(set.overview.current, Some(845.0));
        assert_eq!(set.calls.previous_pct, Some(53.1));
        assert_eq!(set.web_clicks.previous_pct, Some(-8.0));
        assert_eq!(set.directions.current, Some(129.0));
        assert!(set.degraded_categories().is_empty());
    }

    #[test]
    fn test_extract_all_missing_screenshot_degrades_only_that_category() {
        let service = service_with(vec![
            (0.0, "845"),
            (1.0, "+12%"),
            (2.0, "2726"),
            (3.0, "+53,1%"),
            (4.0, "431"),
            (5.0, "-8%"),
            (6.0, "129"),
            (7.0, "0%"),
        ]);
        let config = full_config();
        let mut screenshots = ScreenshotSet::shared(RgbaImage::new(50, 50));
        screenshots.web_clicks = None;

        let set = extract_all(&service, &screenshots, &config, &CancelToken::new());
        assert_eq!(set.web_clicks, ExtractedKpi::default());
        assert_eq!(set.overview.current, Some(845.0));
        assert_eq!(set.calls.current, Some(2726.0));
        assert_eq!(set.directions.current, Some(129.0));
        assert_eq!(set.degraded_categories(), vec![MetricCategory::WebClicks]);
    }

    #[test]
    fn test_extract_all_cancelled_before_start_returns_all_empty() {
        let service = service_with(vec![(0.0, "845")]);
        let config = full_config();
        let screenshots = ScreenshotSet::shared(RgbaImage::new(50, 50));

        let cancel = CancelToken::new();
        cancel.cancel();
        let set = extract_all(&service, &screenshots, &config, &cancel);
        assert_eq!(set, KpiSet::default());
    }

    /// Counts issued recognitions and trips the token on the first one.
    struct CancellingRecognizer {
        issued: Arc<AtomicUsize>,
        cancel: CancelToken,
    }

    impl TextRecognizer for CancellingRecognizer {
        fn recognize(&self, _img: &RgbaImage, _zone: &Zone) -> Result<OcrResult> {
            self.issued.fetch_add(1, Ordering::SeqCst);
            self.cancel.cancel();
            Ok(OcrResult {
                text: "1".to_string(),
                confidence: 90.0,
            })
        }
    }

    fn cancelling_service(issued: &Arc<AtomicUsize>, cancel: &CancelToken) -> OcrService {
        let issued = issued.clone();
        let cancel = cancel.clone();
        OcrService::with_factory(Box::new(move || {
            Ok(Box::new(CancellingRecognizer {
                issued: issued.clone(),
                cancel: cancel.clone(),
            }) as Box<dyn TextRecognizer>)
        }))
    }

    #[test]
    fn test_cancel_mid_category_skips_the_remaining_zone() {
        let issued = Arc::new(AtomicUsize::new(0));
        let cancel = CancelToken::new();
        let service = cancelling_service(&issued, &cancel);
        let config = full_config();
        let img = RgbaImage::new(50, 50);

        let kpi = extract_category(&service, &img, MetricCategory::Calls, &config, &cancel);
        assert_eq!(issued.load(Ordering::SeqCst), 1);
        assert_eq!(kpi.current, Some(1.0));
        assert_eq!(kpi.previous_pct, None);
        assert_eq!(kpi.raw.previous, "");
        assert_eq!(kpi.confidence.previous, 0.0);
    }

    #[test]
    fn test_cancel_mid_batch_stops_further_ocr_calls() {
        let issued = Arc::new(AtomicUsize::new(0));
        let cancel = CancelToken::new();
        let service = cancelling_service(&issued, &cancel);
        let config = full_config();
        let screenshots = ScreenshotSet::shared(RgbaImage::new(50, 50));

        let set = extract_all(&service, &screenshots, &config, &cancel);

        // The first recognition trips the token. A category thread may have
        // committed to its first zone read before that, but no thread reads
        // its second zone once the token is tripped.
        let issued = issued.load(Ordering::SeqCst);
        assert!(issued <= 4, "cancel was ignored: {issued} of 8 calls issued");
        for category in MetricCategory::ALL {
            assert_eq!(set.get(category).previous_pct, None);
        }
    }

    #[test]
    fn test_unparseable_text_is_kept_raw_with_null_value() {
        let service = service_with(vec![(2.0, "visible"), (3.0, "N/A")]);
        let config = full_config();
        let img = RgbaImage::new(50, 50);

        let kpi = extract_category(&service, &img, MetricCategory::Calls, &config, &CancelToken::new());
        assert_eq!(kpi.current, None);
        assert_eq!(kpi.previous_pct, None);
        assert_eq!(kpi.raw.current, "visible");
        assert_eq!(kpi.raw.previous, "N/A");
        // Confidence still reported for audit even when parsing failed
        assert_eq!(kpi.confidence.current, 85.0);
    }
}
