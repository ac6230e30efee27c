//! Interactive KPI zone editor session.
//!
//! The host UI renders the reference screenshot at a fit scale and forwards
//! pointer events here. The primary pointer button draws a category's
//! `current` zone, the secondary button its `previous` zone. Drafts are
//! converted to native image space as soon as a drag finishes; saving
//! validates the pair and replaces the category's configuration wholesale.

use anyhow::{anyhow, Result};
use log::info;

use super::coords::{Scale, ViewPoint};
use super::state::DragState;
use crate::zone::{KpiZonesConfig, MetricCategory, Zone, ZonePair};

/// Pointer button used for a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Which of the category's two zones a drag is drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneSlot {
    Current,
    Previous,
}

impl From<PointerButton> for ZoneSlot {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => ZoneSlot::Current,
            PointerButton::Secondary => ZoneSlot::Previous,
        }
    }
}

/// One rectangle of the editor overlay, in view space.
///
/// The overlay is a pure description of what to paint; producing it has no
/// side effects, so the host can re-render it on every coordinate update.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayRect {
    pub rect: Zone,
    pub label: String,
    pub in_progress: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Draft {
    current: Option<Zone>,
    previous: Option<Zone>,
}

/// Zone authoring session over one reference image.
pub struct ZoneEditor {
    scale: Scale,
    config: KpiZonesConfig,
    category: MetricCategory,
    drafts: [Draft; 4],
    drag: DragState,
    active_slot: Option<ZoneSlot>,
}

fn category_index(category: MetricCategory) -> usize {
    MetricCategory::ALL
        .iter()
        .position(|c| *c == category)
        .expect("category in ALL")
}

impl ZoneEditor {
    /// Opens a session for a reference image of `img_width` x `img_height`
    /// native pixels, edited in a viewport of at most `max_width` x
    /// `max_height`. Existing zones from `config` become editable drafts.
    pub fn new(
        img_width: u32,
        img_height: u32,
        max_width: f32,
        max_height: f32,
        config: KpiZonesConfig,
    ) -> Self {
        let mut drafts = [Draft::default(); 4];
        for category in MetricCategory::ALL {
            if let Some(pair) = config.get(category) {
                drafts[category_index(category)] = Draft {
                    current: Some(pair.current),
                    previous: Some(pair.previous),
                };
            }
        }

        Self {
            scale: Scale::fit(img_width, img_height, max_width, max_height),
            config,
            category: MetricCategory::Overview,
            drafts,
            drag: DragState::Idle,
            active_slot: None,
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn category(&self) -> MetricCategory {
        self.category
    }

    /// Switches the category being edited. An in-progress drag is dropped.
    pub fn select_category(&mut self, category: MetricCategory) {
        self.category = category;
        self.drag = DragState::Idle;
        self.active_slot = None;
    }

    pub fn pointer_down(&mut self, button: PointerButton, p: ViewPoint) {
        self.active_slot = Some(button.into());
        self.drag.pointer_down(p);
    }

    pub fn pointer_move(&mut self, p: ViewPoint) {
        self.drag.pointer_move(p);
    }

    /// Finishes the drag and stores the zone, converted to native space,
    /// into the active slot. Zero-area drags are discarded.
    pub fn pointer_up(&mut self, p: ViewPoint) {
        let Some(view_zone) = self.drag.pointer_up(p) else {
            return;
        };
        let Some(slot) = self.active_slot.take() else {
            return;
        };
        if view_zone.is_empty() {
            return;
        }

        let native = self.scale.zone_to_image(&view_zone);
        let draft = &mut self.drafts[category_index(self.category)];
        match slot {
            ZoneSlot::Current => draft.current = Some(native),
            ZoneSlot::Previous => draft.previous = Some(native),
        }
    }

    /// The overlay to paint for the active category: saved drafts plus the
    /// in-progress drag rectangle, all in view space.
    pub fn overlay(&self) -> Vec<OverlayRect> {
        let mut rects = Vec::new();
        let draft = &self.drafts[category_index(self.category)];

        if let Some(zone) = &draft.current {
            rects.push(OverlayRect {
                rect: self.scale.zone_to_view(zone),
                label: format!("{}: current", self.category.label()),
                in_progress: false,
            });
        }
        if let Some(zone) = &draft.previous {
            rects.push(OverlayRect {
                rect: self.scale.zone_to_view(zone),
                label: format!("{}: previous", self.category.label()),
                in_progress: false,
            });
        }
        if let Some(rect) = self.drag.current_rect() {
            let slot = match self.active_slot {
                Some(ZoneSlot::Previous) => "previous",
                _ => "current",
            };
            rects.push(OverlayRect {
                rect,
                label: format!("{}: {}", self.category.label(), slot),
                in_progress: true,
            });
        }

        rects
    }

    /// Validates and persists the active category's pair, replacing any
    /// existing pair wholesale. Incomplete drafts are rejected and nothing
    /// is written.
    pub fn save(&mut self) -> Result<ZonePair> {
        let draft = &self.drafts[category_index(self.category)];

        let current = draft.current.ok_or_else(|| {
            anyhow!(
                "Draw the current-value zone for {} before saving",
                self.category.label()
            )
        })?;
        let previous = draft.previous.ok_or_else(|| {
            anyhow!(
                "Draw the evolution zone for {} before saving",
                self.category.label()
            )
        })?;
        if current.is_empty() || previous.is_empty() {
            return Err(anyhow!(
                "Zones for {} must have a non-zero area",
                self.category.label()
            ));
        }

        let pair = ZonePair { current, previous };
        self.config.set(self.category, pair);
        info!("Saved zones for {}", self.category);
        Ok(pair)
    }

    pub fn config(&self) -> &KpiZonesConfig {
        &self.config
    }

    /// Consumes the session, yielding the configuration to persist.
    pub fn into_config(self) -> KpiZonesConfig {
        self.config
    }
}
