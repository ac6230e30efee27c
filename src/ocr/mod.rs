pub mod engine;
pub mod parse;
pub mod service;

pub use engine::{OcrResult, TesseractRecognizer, TextRecognizer};
pub use parse::{parse_number, parse_percentage};
pub use service::OcrService;
