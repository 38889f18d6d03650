//! Operations-file parser.
//!
//! Operations format, one per line:
//! ```text
//! filter-state:NY
//! filter-gt:Education.High School or Higher:90
//! display
//! population-total
//! percent:Ethnicities.Two or More Races
//! ```
//!
//! - Fields are colon-separated: `verb[:arg1[:arg2]]`; extra arguments are ignored
//! - Leading and trailing whitespace is trimmed
//! - Any other line, blank ones included, is reported as an unknown operation
//!
//! Supported operations:
//! - `display` - Print name, state and 2014 population of each county
//! - `filter-state:<abbr>` - Keep counties in the given state
//! - `filter-gt:<field>:<number>` - Keep counties where field > number
//! - `filter-lt:<field>:<number>` - Keep counties where field < number
//! - `population-total` - Print total 2014 population
//! - `population:<field>` - Print the sub-population the field describes
//! - `percent:<field>` - Print that sub-population as a percentage
//!
//! Verbs are matched exactly first. As a fallback, any other verb starting
//! with `population` is treated as `population`, and any verb starting with
//! `percent` as `percent`, so `population-total` is never read as
//! `population`.

use crate::error::{LineError, ScriptError};
use crate::field::{Catalog, FieldPath};
use std::fs;
use std::path::Path;

/// Parsed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// display
    Display,
    /// filter-state:<abbr>
    FilterState { state: String },
    /// filter-gt:<field>:<number>
    FilterGt { field: FieldPath, threshold: f64 },
    /// filter-lt:<field>:<number>
    FilterLt { field: FieldPath, threshold: f64 },
    /// population-total
    PopulationTotal,
    /// population:<field>
    Population { field: FieldPath },
    /// percent:<field>
    Percent { field: FieldPath },
    /// Anything else; reported and skipped.
    Unknown { line: String },
}

impl Operation {
    /// Get the operation name for logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Display => "display",
            Operation::FilterState { .. } => "filter-state",
            Operation::FilterGt { .. } => "filter-gt",
            Operation::FilterLt { .. } => "filter-lt",
            Operation::PopulationTotal => "population-total",
            Operation::Population { .. } => "population",
            Operation::Percent { .. } => "percent",
            Operation::Unknown { .. } => "unknown",
        }
    }
}

/// Handler selected by a verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Display,
    FilterState,
    FilterGt,
    FilterLt,
    PopulationTotal,
    Population,
    Percent,
}

impl Verb {
    /// Exact names win; the two prefix rules only apply when nothing matched exactly.
    fn classify(verb: &str) -> Option<Verb> {
        match verb {
            "display" => Some(Verb::Display),
            "filter-state" => Some(Verb::FilterState),
            "filter-gt" => Some(Verb::FilterGt),
            "filter-lt" => Some(Verb::FilterLt),
            "population-total" => Some(Verb::PopulationTotal),
            v if v.starts_with("population") => Some(Verb::Population),
            v if v.starts_with("percent") => Some(Verb::Percent),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Verb::Display => "display",
            Verb::FilterState => "filter-state",
            Verb::FilterGt => "filter-gt",
            Verb::FilterLt => "filter-lt",
            Verb::PopulationTotal => "population-total",
            Verb::Population => "population",
            Verb::Percent => "percent",
        }
    }
}

/// One line of an operations file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine<'a> {
    /// 1-based line number in the file.
    pub number: usize,
    /// Line text with surrounding whitespace trimmed.
    pub text: &'a str,
}

/// Split operations text into numbered, trimmed lines.
pub fn script_lines(text: &str) -> impl Iterator<Item = ScriptLine<'_>> {
    text.lines().enumerate().map(|(idx, line)| ScriptLine {
        number: idx + 1,
        text: line.trim(),
    })
}

/// Read an operations file into memory.
pub fn read_script(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path).map_err(|source| ScriptError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a single operation line, validating field paths against `catalog`.
pub fn parse_operation(line: &str, catalog: &Catalog) -> Result<Operation, LineError> {
    let line = line.trim();
    let parts: Vec<&str> = line.split(':').collect();

    let Some(verb) = Verb::classify(parts[0]) else {
        return Ok(Operation::Unknown {
            line: line.to_string(),
        });
    };

    match verb {
        Verb::Display => Ok(Operation::Display),
        Verb::PopulationTotal => Ok(Operation::PopulationTotal),
        Verb::FilterState => {
            let state = argument(&parts, 1, verb, "state")?;
            Ok(Operation::FilterState {
                state: state.to_string(),
            })
        }
        Verb::FilterGt | Verb::FilterLt => {
            let field = FieldPath::parse(argument(&parts, 1, verb, "field")?, catalog)?;
            let threshold = parse_number(argument(&parts, 2, verb, "number")?)?;
            if verb == Verb::FilterGt {
                Ok(Operation::FilterGt { field, threshold })
            } else {
                Ok(Operation::FilterLt { field, threshold })
            }
        }
        Verb::Population => {
            let field = FieldPath::parse(argument(&parts, 1, verb, "field")?, catalog)?;
            Ok(Operation::Population { field })
        }
        Verb::Percent => {
            let field = FieldPath::parse(argument(&parts, 1, verb, "field")?, catalog)?;
            Ok(Operation::Percent { field })
        }
    }
}

/// Fetch argument `idx`; empty arguments count as missing.
fn argument<'a>(
    parts: &[&'a str],
    idx: usize,
    verb: Verb,
    what: &'static str,
) -> Result<&'a str, LineError> {
    parts
        .get(idx)
        .copied()
        .filter(|arg| !arg.trim().is_empty())
        .ok_or(LineError::MissingArgument {
            verb: verb.name(),
            what,
        })
}

fn parse_number(text: &str) -> Result<f64, LineError> {
    text.trim()
        .parse()
        .map_err(|_| LineError::InvalidNumber(text.to_string()))
}
