pub mod config;
pub mod variable;

pub use config::ReportTemplateConfig;
pub use variable::{Align, KpiField, TemplateVariableZone, TextStyle, VariableKind, VariablePath};
