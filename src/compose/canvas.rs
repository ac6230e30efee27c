//! Page drawing primitives.
//!
//! `PageCanvas` is the seam between composition orchestration and actual
//! rasterization; `RasterCanvas` draws onto an `RgbaImage` page. Both
//! operations take coordinates in the page's native pixel space and clip at
//! the page edges.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use log::warn;

use crate::template::{Align, TextStyle};
use crate::zone::Zone;

/// A surface zones are stamped onto.
pub trait PageCanvas {
    /// Draws `text` inside `zone`, aligned per the style.
    fn draw_text(&mut self, zone: &Zone, text: &str, style: &TextStyle);

    /// Draws `img` inside `zone`, scaled to fit while preserving aspect.
    fn draw_image(&mut self, zone: &Zone, img: &RgbaImage);
}

/// Canvas over one raster template page.
///
/// The font is optional: a template with only image zones composes without
/// one, and a text zone met without a font stamps nothing (with a warning)
/// rather than failing the document.
pub struct RasterCanvas<'a> {
    page: &'a mut RgbaImage,
    font: Option<&'a FontRef<'a>>,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(page: &'a mut RgbaImage, font: Option<&'a FontRef<'a>>) -> Self {
        Self { page, font }
    }

    /// Advance width of `text` at `scale`, for alignment.
    fn text_width(font: &FontRef<'_>, text: &str, scale: PxScale) -> f32 {
        let scaled = font.as_scaled(scale);
        text.chars()
            .map(|c| scaled.h_advance(font.glyph_id(c)))
            .sum()
    }
}

impl PageCanvas for RasterCanvas<'_> {
    fn draw_text(&mut self, zone: &Zone, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let Some(font) = self.font else {
            warn!("No font loaded, skipping text stamp {:?}", text);
            return;
        };

        let scale = PxScale::from(style.font_size);
        let width = Self::text_width(font, text, scale);
        let x = match style.align {
            Align::Left => zone.x,
            Align::Center => zone.x + (zone.width - width) / 2.0,
            Align::Right => zone.x + zone.width - width,
        };

        // Vertically center the line inside the zone
        let line_height = font.as_scaled(scale).height();
        let y = zone.y + (zone.height - line_height).max(0.0) / 2.0;

        draw_text_mut(
            self.page,
            Rgba(style.rgba()),
            x.round() as i32,
            y.round() as i32,
            scale,
            font,
            text,
        );
    }

    fn draw_image(&mut self, zone: &Zone, img: &RgbaImage) {
        if zone.is_empty() || img.width() == 0 || img.height() == 0 {
            return;
        }

        let fit = (zone.width / img.width() as f32).min(zone.height / img.height() as f32);
        let w = ((img.width() as f32 * fit).round() as u32).max(1);
        let h = ((img.height() as f32 * fit).round() as u32).max(1);
        let resized = imageops::resize(img, w, h, FilterType::Triangle);

        // Center inside the zone
        let x = zone.x + (zone.width - w as f32) / 2.0;
        let y = zone.y + (zone.height - h as f32) / 2.0;
        imageops::overlay(self.page, &resized, x.round() as i64, y.round() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_page(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn red_square(side: u32) -> RgbaImage {
        RgbaImage::from_pixel(side, side, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn test_draw_image_scales_and_centers() {
        let mut page = white_page(100, 100);
        let mut canvas = RasterCanvas::new(&mut page, None);

        // 10x10 logo into a wide 80x40 zone at (10,30): fits to 40x40,
        // centered at x = 10 + (80-40)/2 = 30
        canvas.draw_image(&Zone::new(10.0, 30.0, 80.0, 40.0), &red_square(10));

        assert_eq!(page.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
        assert_eq!(page.get_pixel(29, 50), &Rgba([255, 255, 255, 255]));
        assert_eq!(page.get_pixel(71, 50), &Rgba([255, 255, 255, 255]));
        assert_eq!(page.get_pixel(50, 29), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_image_clips_at_page_edge() {
        let mut page = white_page(50, 50);
        let mut canvas = RasterCanvas::new(&mut page, None);

        canvas.draw_image(&Zone::new(40.0, 40.0, 20.0, 20.0), &red_square(10));
        // Pixels inside the page got painted, nothing panicked
        assert_eq!(page.get_pixel(45, 45), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_draw_image_empty_inputs_are_noops() {
        let mut page = white_page(20, 20);
        let blank = page.clone();
        let mut canvas = RasterCanvas::new(&mut page, None);

        canvas.draw_image(&Zone::default(), &red_square(10));
        canvas.draw_image(&Zone::new(0.0, 0.0, 10.0, 10.0), &RgbaImage::new(0, 0));
        assert_eq!(page, blank);
    }

    #[test]
    fn test_draw_text_without_font_stamps_nothing() {
        let mut page = white_page(40, 20);
        let blank = page.clone();
        let mut canvas = RasterCanvas::new(&mut page, None);

        canvas.draw_text(
            &Zone::new(0.0, 0.0, 40.0, 20.0),
            "2726",
            &TextStyle::default(),
        );
        assert_eq!(page, blank);
    }
}
