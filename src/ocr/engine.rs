//! Text recognition against a zone of a screenshot.
//!
//! The `TextRecognizer` trait is the seam between the extraction engine and
//! the actual recognition backend; `TesseractRecognizer` is the production
//! backend, shelling out to the `tesseract` executable with TSV output so we
//! get per-word confidence scores back.

use anyhow::{anyhow, Result};
use image::imageops;
use image::{ImageBuffer, Luma, RgbaImage};
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use crate::zone::Zone;

/// Recognized text for one zone, with the engine's confidence (0.0-100.0).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f32,
}

impl OcrResult {
    /// The degraded result used when a zone cannot be read.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A text recognition backend.
///
/// Implementations restrict recognition to the zone's rectangle; callers
/// never crop themselves. The trait is object-safe so the service can hold a
/// test double in place of Tesseract.
pub trait TextRecognizer: Send {
    /// Recognizes the text inside `zone` on `img`.
    fn recognize(&self, img: &RgbaImage, zone: &Zone) -> Result<OcrResult>;
}

/// Recognizer backed by the `tesseract` command-line tool.
pub struct TesseractRecognizer {
    exe: PathBuf,
    lang: String,
}

impl TesseractRecognizer {
    /// Locates the executable once; subsequent calls reuse the path.
    ///
    /// `REPORT_PIPELINE_TESSERACT` overrides discovery, otherwise the
    /// executable is expected on PATH.
    pub fn new(lang: &str) -> Result<Self> {
        let exe = find_tesseract_executable()?;
        Ok(Self {
            exe,
            lang: lang.to_string(),
        })
    }

    /// Crops the zone out of the screenshot and converts to grayscale,
    /// which is what Tesseract performs best on.
    fn crop_zone(&self, img: &RgbaImage, zone: &Zone) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let (w, h) = img.dimensions();
        let rect = zone
            .to_pixel_rect(w, h)
            .ok_or_else(|| anyhow!("Zone {:?} has no overlap with {}x{} image", zone, w, h))?;

        let cropped = imageops::crop_imm(img, rect.x, rect.y, rect.width, rect.height).to_image();
        Ok(imageops::grayscale(&cropped))
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, img: &RgbaImage, zone: &Zone) -> Result<OcrResult> {
        let cropped = self.crop_zone(img, zone)?;

        // Save crop to a temporary file for the subprocess
        let temp_input = NamedTempFile::with_suffix(".png")?;
        cropped.save(temp_input.path())?;

        // Tesseract appends .tsv to the output base
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let output = Command::new(&self.exe)
            .arg(temp_input.path())
            .arg(&output_base)
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg("7") // Treat the crop as a single line of text
            .arg("tsv")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)
            .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;
        let _ = std::fs::remove_file(&tsv_path);

        Ok(parse_tsv_output(&tsv_content))
    }
}

fn find_tesseract_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("REPORT_PIPELINE_TESSERACT") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(anyhow!(
            "REPORT_PIPELINE_TESSERACT points to {}, which does not exist",
            path.display()
        ));
    }

    // Probe PATH by asking for the version
    let candidate = PathBuf::from("tesseract");
    match Command::new(&candidate).arg("--version").output() {
        Ok(out) if out.status.success() => Ok(candidate),
        _ => Err(anyhow!(
            "tesseract not found on PATH (set REPORT_PIPELINE_TESSERACT to override)"
        )),
    }
}

/// Collapses Tesseract TSV word rows into one text + averaged confidence.
///
/// TSV fields: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Level 5 rows are words.
fn parse_tsv_output(tsv: &str) -> OcrResult {
    let mut words: Vec<&str> = Vec::new();
    let mut conf_sum = 0.0f32;
    let mut conf_count = 0usize;

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();

        if level != 5 || text.is_empty() {
            continue;
        }

        words.push(text);
        if conf >= 0.0 {
            conf_sum += conf;
            conf_count += 1;
        }
    }

    let confidence = if conf_count > 0 {
        conf_sum / conf_count as f32
    } else {
        0.0
    };

    OcrResult {
        text: words.join(" "),
        confidence,
    }
}
