//! Editor coordinate spaces.
//!
//! The editors render a possibly-downscaled copy of the reference image, so
//! two coordinate spaces are in play: view space (what the pointer reports)
//! and the image's native pixel space (what gets persisted). The two are
//! distinct types and every conversion goes through `Scale`, so a raw
//! division can never hide in an event handler.

use crate::zone::Zone;

/// A point in the scaled editing viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

/// A point in the reference image's native pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

/// The view/native scale factor, computed once when the reference image
/// loads. Always in `(0, 1]`: large images are downscaled to fit the
/// viewport, small ones are shown at native size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale(f32);

impl Scale {
    /// `min(max_width/img_width, max_height/img_height, 1)`.
    pub fn fit(img_width: u32, img_height: u32, max_width: f32, max_height: f32) -> Self {
        let sx = max_width / img_width.max(1) as f32;
        let sy = max_height / img_height.max(1) as f32;
        Self(sx.min(sy).min(1.0))
    }

    pub fn factor(&self) -> f32 {
        self.0
    }

    pub fn to_image(&self, p: ViewPoint) -> ImagePoint {
        ImagePoint {
            x: p.x / self.0,
            y: p.y / self.0,
        }
    }

    pub fn to_view(&self, p: ImagePoint) -> ViewPoint {
        ViewPoint {
            x: p.x * self.0,
            y: p.y * self.0,
        }
    }

    /// Converts a view-space zone to native space.
    pub fn zone_to_image(&self, zone: &Zone) -> Zone {
        zone.scaled(1.0 / self.0)
    }

    /// Converts a native-space zone to view space, for overlay painting.
    pub fn zone_to_view(&self, zone: &Zone) -> Zone {
        zone.scaled(self.0)
    }
}
