//! Document composition.
//!
//! Pure orchestration over the canvas primitives: resolve each variable
//! zone's path against the dataset and stamp the value onto its page. An
//! unresolvable path stamps nothing and the document still comes out, so an
//! operator can review and fix rather than being blocked. The step itself
//! introduces no timestamps or randomness; composing twice from the same
//! inputs is byte-identical.

use ab_glyph::FontRef;
use anyhow::{anyhow, Result};
use image::{ImageFormat, RgbaImage};
use log::warn;
use std::io::Cursor;

use super::canvas::{PageCanvas, RasterCanvas};
use crate::dataset::{ReportDataset, ResolvedValue};
use crate::template::{ReportTemplateConfig, TextStyle, VariableKind};

/// Stamps every variable zone of `page` (1-based) onto the canvas.
pub fn stamp_page(
    canvas: &mut impl PageCanvas,
    dataset: &ReportDataset,
    template: &ReportTemplateConfig,
    page: usize,
) {
    for variable_zone in template.zones_for_page(page) {
        let resolved = match dataset.resolve(&variable_zone.variable) {
            Some(value) => value,
            None => {
                warn!(
                    "Variable {} has no value in this dataset, leaving zone blank",
                    variable_zone.variable
                );
                continue;
            }
        };

        match (resolved, variable_zone.kind) {
            (ResolvedValue::Text(text), VariableKind::Text) => {
                let default_style = TextStyle::default();
                let style = variable_zone.style.as_ref().unwrap_or(&default_style);
                canvas.draw_text(&variable_zone.zone, &text, style);
            }
            (ResolvedValue::Image(img), VariableKind::Image) => {
                canvas.draw_image(&variable_zone.zone, img);
            }
            (_, kind) => {
                warn!(
                    "Variable {} does not match zone type {:?}, leaving zone blank",
                    variable_zone.variable, kind
                );
            }
        }
    }
}

/// Composes the finished document.
///
/// `pages` are the template's page images, in the order of
/// `template.pages`; the output keeps that order. The font is needed for
/// text zones only.
pub fn compose_document(
    dataset: &ReportDataset,
    template: &ReportTemplateConfig,
    pages: &[RgbaImage],
    font: Option<&FontRef<'_>>,
) -> Result<Vec<RgbaImage>> {
    if pages.len() != template.page_count() {
        return Err(anyhow!(
            "Template lists {} pages but {} page images were provided",
            template.page_count(),
            pages.len()
        ));
    }

    let mut composed = Vec::with_capacity(pages.len());
    for (idx, page_image) in pages.iter().enumerate() {
        let mut page = page_image.clone();
        let mut canvas = RasterCanvas::new(&mut page, font);
        stamp_page(&mut canvas, dataset, template, idx + 1);
        composed.push(page);
    }
    Ok(composed)
}

/// Encodes composed pages as PNG, ready for object storage upload.
pub fn encode_pages_png(pages: &[RgbaImage]) -> Result<Vec<Vec<u8>>> {
    let mut encoded = Vec::with_capacity(pages.len());
    for page in pages {
        let mut buf = Vec::new();
        page.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        encoded.push(buf);
    }
    Ok(encoded)
}
