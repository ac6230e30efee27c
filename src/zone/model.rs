//! The zone rectangle.
//!
//! A `Zone` is an axis-aligned rectangle in the native pixel space of one
//! specific reference image. It has no identity beyond its coordinates; it is
//! meaningful only paired with the image it was drawn on and a semantic role
//! (OCR region-of-interest or stamping target).

use serde::{Deserialize, Serialize};

/// A rectangle in an image's native pixel coordinate space.
///
/// `width` and `height` are always non-negative; construction from corner
/// points normalizes the rectangle regardless of drag direction.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Zone {
    /// X of the top-left corner, in native pixels.
    pub x: f32,
    /// Y of the top-left corner, in native pixels.
    pub y: f32,
    /// Width in native pixels.
    pub width: f32,
    /// Height in native pixels.
    pub height: f32,
}

/// A zone resolved against a concrete image: integer pixels, clamped to the
/// image bounds. This is the shape cropping code consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Zone {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds the normalized bounding box of two arbitrary corner points.
    ///
    /// The top-left corner is the componentwise minimum, so dragging from
    /// bottom-right to top-left yields the same rectangle as the reverse.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// True when the zone covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Scales all four components uniformly.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Resolves the zone to integer pixels, clamped to a `width` x `height`
    /// image. Returns `None` when the zone lies entirely outside the image
    /// or has no area left after clamping.
    pub fn to_pixel_rect(&self, img_width: u32, img_height: u32) -> Option<PixelRect> {
        if self.is_empty() {
            return None;
        }

        let x0 = self.x.max(0.0) as u32;
        let y0 = self.y.max(0.0) as u32;
        if x0 >= img_width || y0 >= img_height {
            return None;
        }

        let x1 = ((self.x + self.width).max(0.0) as u32).min(img_width);
        let y1 = ((self.y + self.height).max(0.0) as u32).min(img_height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}
