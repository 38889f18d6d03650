//! Filtering operations.
//!
//! A filter reads the current working set and returns a new one; the
//! records themselves are never touched. Every record is checked before the
//! result is built, so a failure part-way through leaves nothing half-filtered.

use crate::error::LineError;
use crate::field::FieldPath;
use crate::record::County;
use crate::report::{Report, format_number};

/// Strict comparison used by `filter-gt` / `filter-lt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
}

impl Comparison {
    pub fn keyword(self) -> &'static str {
        match self {
            Comparison::Greater => "gt",
            Comparison::Less => "lt",
        }
    }

    /// Equal values never match.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
        }
    }
}

/// `filter-state:<abbr>`: exact, case-sensitive match on the state abbreviation.
pub fn filter_state(counties: &[County], state: &str, report: &mut Report) -> Vec<County> {
    let kept: Vec<County> = counties
        .iter()
        .filter(|c| c.state == state)
        .cloned()
        .collect();
    report.line(format!("Filter: state == {state} ({} entries)", kept.len()));
    kept
}

/// `filter-gt` / `filter-lt`: keep counties whose `field` compares strictly
/// against `threshold`.
pub fn filter_field(
    counties: &[County],
    field: &FieldPath,
    comparison: Comparison,
    threshold: f64,
    report: &mut Report,
) -> Result<Vec<County>, LineError> {
    let mut kept = Vec::new();
    for county in counties {
        if comparison.holds(field.value(county)?, threshold) {
            kept.push(county.clone());
        }
    }
    report.line(format!(
        "Filter: {field} {} {} ({} entries)",
        comparison.keyword(),
        format_number(threshold),
        kept.len()
    ));
    Ok(kept)
}
