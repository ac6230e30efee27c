pub mod coords;
pub mod state;
pub mod variable_editor;
pub mod zone_editor;

pub use coords::{ImagePoint, Scale, ViewPoint};
pub use state::DragState;
pub use variable_editor::VariableEditor;
pub use zone_editor::{OverlayRect, PointerButton, ZoneEditor, ZoneSlot};
