pub mod canvas;
pub mod engine;

pub use canvas::{PageCanvas, RasterCanvas};
pub use engine::{compose_document, encode_pages_png, stamp_page};
