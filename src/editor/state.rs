//! Drag state machine for drawing a zone.
//!
//! `Idle → Dragging → Idle` on pointer down/move/up. While dragging, the
//! rectangle is always the normalized bounding box of the drag-start point
//! and the current point, so the top-left corner is min(start, current)
//! whatever direction the operator drags in.

use super::coords::ViewPoint;
use crate::zone::Zone;

/// The zone-drawing state of one pointer interaction, in view space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: ViewPoint,
        current: ViewPoint,
    },
}

impl DragState {
    /// Starts a drag at `p`. A pointer-down mid-drag restarts the drag.
    pub fn pointer_down(&mut self, p: ViewPoint) {
        *self = Self::Dragging {
            start: p,
            current: p,
        };
    }

    /// Updates the drag endpoint. Ignored when idle.
    pub fn pointer_move(&mut self, p: ViewPoint) {
        if let Self::Dragging { current, .. } = self {
            *current = p;
        }
    }

    /// Finishes the drag, returning the drawn view-space zone.
    /// Returns `None` on a pointer-up with no drag in progress.
    pub fn pointer_up(&mut self, p: ViewPoint) -> Option<Zone> {
        match *self {
            Self::Dragging { start, .. } => {
                *self = Self::Idle;
                Some(Zone::from_corners(start.x, start.y, p.x, p.y))
            }
            Self::Idle => None,
        }
    }

    /// The in-progress rectangle, for overlay painting.
    pub fn current_rect(&self) -> Option<Zone> {
        match *self {
            Self::Dragging { start, current } => {
                Some(Zone::from_corners(start.x, start.y, current.x, current.y))
            }
            Self::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
