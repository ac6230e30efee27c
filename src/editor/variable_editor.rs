//! Interactive template variable zone editor session.
//!
//! Same drag capture as the KPI zone editor, applied to one template page:
//! the operator picks a variable, draws a single zone, adjusts text styling,
//! and saves. The save yields a finished `TemplateVariableZone` in the
//! page's native pixel space.

use anyhow::{anyhow, Result};

use super::coords::{Scale, ViewPoint};
use super::state::DragState;
use super::zone_editor::OverlayRect;
use crate::template::{Align, TemplateVariableZone, TextStyle, VariableKind, VariablePath};
use crate::zone::Zone;

/// Variable zone authoring session over one template page.
pub struct VariableEditor {
    scale: Scale,
    page: usize,
    variable: Option<VariablePath>,
    style: TextStyle,
    draft: Option<Zone>,
    drag: DragState,
}

impl VariableEditor {
    /// Opens a session on page `page` (1-based) whose image is `img_width`
    /// x `img_height` native pixels, edited in a viewport of at most
    /// `max_width` x `max_height`.
    pub fn new(
        page: usize,
        img_width: u32,
        img_height: u32,
        max_width: f32,
        max_height: f32,
    ) -> Self {
        Self {
            scale: Scale::fit(img_width, img_height, max_width, max_height),
            page,
            variable: None,
            style: TextStyle::default(),
            draft: None,
            drag: DragState::Idle,
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Selects the variable the zone will render.
    pub fn select_variable(&mut self, variable: VariablePath) {
        self.variable = Some(variable);
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.style.font_size = font_size;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = color.into();
    }

    pub fn set_align(&mut self, align: Align) {
        self.style.align = align;
    }

    pub fn pointer_down(&mut self, p: ViewPoint) {
        self.drag.pointer_down(p);
    }

    pub fn pointer_move(&mut self, p: ViewPoint) {
        self.drag.pointer_move(p);
    }

    /// Finishes the drag; a new non-empty rectangle replaces the draft.
    pub fn pointer_up(&mut self, p: ViewPoint) {
        if let Some(view_zone) = self.drag.pointer_up(p) {
            if !view_zone.is_empty() {
                self.draft = Some(self.scale.zone_to_image(&view_zone));
            }
        }
    }

    /// The overlay to paint: the settled draft and any in-progress drag.
    pub fn overlay(&self) -> Vec<OverlayRect> {
        let label = self
            .variable
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unassigned".to_string());

        let mut rects = Vec::new();
        if let Some(zone) = &self.draft {
            rects.push(OverlayRect {
                rect: self.scale.zone_to_view(zone),
                label: label.clone(),
                in_progress: false,
            });
        }
        if let Some(rect) = self.drag.current_rect() {
            rects.push(OverlayRect {
                rect,
                label,
                in_progress: true,
            });
        }
        rects
    }

    /// Validates the session and returns the finished zone. Requires a
    /// selected variable and a drawn, non-empty rectangle; the zone's kind
    /// follows from the variable, text styling applies to text zones only.
    pub fn save(&self) -> Result<TemplateVariableZone> {
        let variable = self
            .variable
            .ok_or_else(|| anyhow!("Select a variable before saving the zone"))?;
        let zone = self
            .draft
            .ok_or_else(|| anyhow!("Draw a zone for {variable} before saving"))?;
        if zone.is_empty() {
            return Err(anyhow!("Zone for {variable} must have a non-zero area"));
        }

        let kind = variable.kind();
        let style = match kind {
            VariableKind::Text => Some(self.style.clone()),
            VariableKind::Image => None,
        };

        Ok(TemplateVariableZone {
            zone,
            page: self.page,
            variable,
            kind,
            style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::KpiField;
    use crate::zone::MetricCategory;

    fn p(x: f32, y: f32) -> ViewPoint {
        ViewPoint { x, y }
    }

    fn drag(editor: &mut VariableEditor, from: ViewPoint, to: ViewPoint) {
        editor.pointer_down(from);
        editor.pointer_move(to);
        editor.pointer_up(to);
    }

    #[test]
    fn test_save_produces_native_space_text_zone() {
        // Page is 2000x1500, viewport 800x600: scale 0.4
        let mut editor = VariableEditor::new(2, 2000, 1500, 800.0, 600.0);
        editor.select_variable(VariablePath::Kpi(MetricCategory::Calls, KpiField::Current));
        editor.set_font_size(24.0);
        editor.set_align(Align::Center);
        drag(&mut editor, p(40.0, 40.0), p(120.0, 90.0));

        let zone = editor.save().unwrap();
        assert_eq!(zone.zone, Zone::new(100.0, 100.0, 200.0, 125.0));
        assert_eq!(zone.page, 2);
        assert_eq!(zone.kind, VariableKind::Text);
        let style = zone.style.unwrap();
        assert_eq!(style.font_size, 24.0);
        assert_eq!(style.align, Align::Center);
    }

    #[test]
    fn test_image_variable_gets_no_text_style() {
        let mut editor = VariableEditor::new(1, 1000, 1000, 500.0, 500.0);
        editor.select_variable(VariablePath::ClientLogo);
        drag(&mut editor, p(10.0, 10.0), p(110.0, 60.0));

        let zone = editor.save().unwrap();
        assert_eq!(zone.kind, VariableKind::Image);
        assert!(zone.style.is_none());
        assert!(zone.kind_is_consistent());
    }

    #[test]
    fn test_save_requires_variable_and_zone() {
        let mut editor = VariableEditor::new(1, 1000, 1000, 500.0, 500.0);
        assert!(editor.save().is_err());

        editor.select_variable(VariablePath::ClientName);
        assert!(editor.save().is_err());

        drag(&mut editor, p(10.0, 10.0), p(60.0, 30.0));
        assert!(editor.save().is_ok());
    }

    #[test]
    fn test_zero_area_drag_does_not_replace_draft() {
        let mut editor = VariableEditor::new(1, 1000, 1000, 500.0, 500.0);
        editor.select_variable(VariablePath::ClientName);
        drag(&mut editor, p(10.0, 10.0), p(60.0, 30.0));
        let first = editor.save().unwrap();

        drag(&mut editor, p(80.0, 80.0), p(80.0, 80.0));
        assert_eq!(editor.save().unwrap(), first);
    }

    #[test]
    fn test_redraw_replaces_draft() {
        let mut editor = VariableEditor::new(1, 1000, 1000, 500.0, 500.0);
        editor.select_variable(VariablePath::PeriodLabel);
        drag(&mut editor, p(10.0, 10.0), p(60.0, 30.0));
        drag(&mut editor, p(100.0, 100.0), p(200.0, 130.0));

        let zone = editor.save().unwrap();
        assert_eq!(zone.zone, Zone::new(200.0, 200.0, 200.0, 60.0));
    }
}
