//! Period-over-period evolution.
//!
//! The screenshot only shows the current value and the printed evolution
//! percentage; the prior period's absolute value is reconstructed from the
//! two. Document rendering always needs a number to display, so unknown
//! evolution collapses to "no apparent change" rather than an error.

use serde::{Deserialize, Serialize};

use super::extract::ExtractedKpi;

/// Display-ready form of one KPI.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiReportEntry {
    /// Current period's value.
    pub current: f64,
    /// Prior period's absolute value, reconstructed from the percentage.
    pub previous: f64,
    /// Free-text analysis, filled in by the report-text subsystem and
    /// carried through unchanged.
    pub analysis: String,
}

/// Derives the display-ready entry from an extraction result.
///
/// `previous = current / (1 + pct/100)`. A null or zero percentage, or a
/// null current value, yields `previous == current`.
pub fn to_report_entry(extracted: &ExtractedKpi) -> KpiReportEntry {
    let current = extracted.current.unwrap_or(0.0);

    let previous = match extracted.previous_pct {
        Some(pct) if pct != 0.0 && extracted.current.is_some() => {
            let divisor = 1.0 + pct / 100.0;
            if divisor.abs() < f64::EPSILON {
                // A -100% evolution would divide by zero; treat as unknown
                current
            } else {
                current / divisor
            }
        }
        _ => current,
    };

    KpiReportEntry {
        current,
        previous,
        analysis: String::new(),
    }
}

/// Signed evolution percentage for confirmed (operator-entered) values.
///
/// Returns `None` when the prior value is zero, since the evolution is
/// undefined rather than infinite.
pub fn evolution_percentage(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}
