//! Error types for loading data, reading scripts, and evaluating operations.
//!
//! `LoadError` and `ScriptError` are fatal and end the run. `LineError` is
//! scoped to one operations-file line: it is reported and the interpreter
//! moves on to the next line.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The county data source could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read data file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The operations file could not be opened or read.
#[derive(Debug, Error)]
#[error("Cannot open operations file '{}'", .path.display())]
pub struct ScriptError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure while evaluating a single operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    #[error("{verb} requires a {what} argument")]
    MissingArgument {
        verb: &'static str,
        what: &'static str,
    },
    #[error("malformed field path '{0}' (expected group.field)")]
    MalformedFieldPath(String),
    #[error("unknown field group '{0}'")]
    UnknownGroup(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("{county}: value of '{field}' is not numeric: '{value}'")]
    NotNumeric {
        county: String,
        field: String,
        value: String,
    },
    #[error("{county}: no value for '{field}'")]
    MissingValue { county: String, field: String },
    #[error("division by zero (total population is 0)")]
    DivisionByZero,
}
