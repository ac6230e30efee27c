//! The long-lived OCR service.
//!
//! One recognizer instance serves every extraction in the process. It is
//! lazily constructed on first use from an injectable factory (so tests can
//! supply a double), serialized behind a mutex, and explicitly releasable.
//!
//! `read_zone` never propagates recognition errors: an unreadable zone
//! degrades to an empty zero-confidence result so one bad crop does not
//! abort the other categories.

use anyhow::Result;
use image::RgbaImage;
use log::{debug, warn};
use std::sync::Mutex;

use super::engine::{OcrResult, TesseractRecognizer, TextRecognizer};
use crate::zone::Zone;

type RecognizerFactory = Box<dyn Fn() -> Result<Box<dyn TextRecognizer>> + Send + Sync>;

/// Owns the process-wide recognition engine.
pub struct OcrService {
    recognizer: Mutex<Option<Box<dyn TextRecognizer>>>,
    factory: RecognizerFactory,
}

impl OcrService {
    /// Service backed by the Tesseract executable.
    pub fn tesseract(lang: &str) -> Self {
        let lang = lang.to_string();
        Self::with_factory(Box::new(move || {
            Ok(Box::new(TesseractRecognizer::new(&lang)?) as Box<dyn TextRecognizer>)
        }))
    }

    /// Service with a custom recognizer factory. The factory runs at most
    /// once per acquire cycle, on the first `read_zone` after construction
    /// or `release`.
    pub fn with_factory(factory: RecognizerFactory) -> Self {
        Self {
            recognizer: Mutex::new(None),
            factory,
        }
    }

    /// Eagerly initializes the engine. Useful to surface a missing
    /// Tesseract install at startup instead of mid-report.
    pub fn acquire(&self) -> Result<()> {
        let mut guard = self.lock_recognizer();
        if guard.is_none() {
            *guard = Some((self.factory)()?);
        }
        Ok(())
    }

    /// Releases the engine. The next `read_zone` re-creates it.
    pub fn release(&self) {
        let mut guard = self.lock_recognizer();
        *guard = None;
    }

    /// A recognizer panic poisons the lock; the `Option` state stays valid,
    /// so the guard is recovered instead of propagating the poison.
    fn lock_recognizer(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn TextRecognizer>>> {
        self.recognizer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Recognizes the text inside `zone`, degrading failures to an empty
    /// zero-confidence result. Calls are serialized through the engine lock.
    pub fn read_zone(&self, img: &RgbaImage, zone: &Zone) -> OcrResult {
        let mut guard = self.lock_recognizer();

        if guard.is_none() {
            match (self.factory)() {
                Ok(recognizer) => *guard = Some(recognizer),
                Err(e) => {
                    warn!("OCR engine unavailable: {e:#}");
                    return OcrResult::empty();
                }
            }
        }

        let recognizer = guard.as_ref().expect("engine initialized above");
        match recognizer.recognize(img, zone) {
            Ok(result) => {
                debug!(
                    "OCR zone ({:.0},{:.0} {:.0}x{:.0}): {:?} (conf {:.0}%)",
                    zone.x, zone.y, zone.width, zone.height, result.text, result.confidence
                );
                result
            }
            Err(e) => {
                warn!("OCR recognition failed, returning empty result: {e:#}");
                OcrResult::empty()
            }
        }
    }
}
