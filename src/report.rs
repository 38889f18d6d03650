//! Reporting operations: display, population totals, and percentages.
//!
//! None of these change the working set. Each appends its lines to a
//! [`Report`]; lines appended before a failure are kept, so a report that
//! fails halfway still shows what it produced.

use crate::error::LineError;
use crate::field::{FieldPath, POPULATION_2014};
use crate::record::{County, Group};
use std::io::{self, Write};

/// Format an `f64` in shortest round-trip form, keeping `.0` on integral values.
pub fn format_number(x: f64) -> String {
    format!("{x:?}")
}

/// Output lines produced by one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write every line, newline-terminated, and clear the buffer.
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for line in self.lines.drain(..) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Sub-population and total behind a `population` report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub sub_population: f64,
    pub total: f64,
}

impl Breakdown {
    /// Sub-population as a percentage of the total.
    pub fn percentage(&self) -> Result<f64, LineError> {
        if self.total == 0.0 {
            return Err(LineError::DivisionByZero);
        }
        Ok(self.sub_population / self.total * 100.0)
    }
}

/// Sum of 2014 population over `counties`.
pub fn total_population(counties: &[County]) -> Result<f64, LineError> {
    let path = FieldPath::population_2014();
    counties
        .iter()
        .try_fold(0.0, |total, county| -> Result<f64, LineError> {
            Ok(total + path.value(county)?)
        })
}

/// Compute total and sub-population for `field` in one pass.
///
/// Field values are percentages (0-100), so each county contributes
/// `population * value / 100`.
pub fn breakdown(counties: &[County], field: &FieldPath) -> Result<Breakdown, LineError> {
    let population = FieldPath::population_2014();
    let mut total = 0.0;
    let mut sub_population = 0.0;
    for county in counties {
        let pop = population.value(county)?;
        total += pop;
        sub_population += pop * (field.value(county)? / 100.0);
    }
    Ok(Breakdown {
        sub_population,
        total,
    })
}

/// `display`: one line per county with its 2014 population as stored.
pub fn display(counties: &[County], report: &mut Report) -> Result<(), LineError> {
    for county in counties {
        let population = county
            .value(Group::Population, POPULATION_2014)
            .ok_or_else(|| LineError::MissingValue {
                county: county.name.clone(),
                field: FieldPath::population_2014().to_string(),
            })?;
        report.line(format!(
            "County: {}, State: {}, Population: {}",
            county.name, county.state, population
        ));
    }
    Ok(())
}

/// `population-total`
pub fn population_total(counties: &[County], report: &mut Report) -> Result<f64, LineError> {
    let total = total_population(counties)?;
    report.line(format!("2014 population: {}", format_number(total)));
    Ok(total)
}

/// `population:<field>`: prints the sub-population, then the total.
pub fn population(
    counties: &[County],
    field: &FieldPath,
    report: &mut Report,
) -> Result<Breakdown, LineError> {
    let breakdown = breakdown(counties, field)?;
    report.line(format!(
        "2014 {field} population: {}",
        format_number(breakdown.sub_population)
    ));
    report.line(format!(
        "Total 2014 population: {}",
        format_number(breakdown.total)
    ));
    Ok(breakdown)
}

/// `percent:<field>`: the `population` report followed by the percentage.
pub fn percent(
    counties: &[County],
    field: &FieldPath,
    report: &mut Report,
) -> Result<f64, LineError> {
    let percentage = population(counties, field, report)?.percentage()?;
    report.line(format!(
        "2014 {field} percentage: {}",
        format_number(percentage)
    ));
    Ok(percentage)
}
