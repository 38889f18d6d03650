//! # county-report
//!
//! A batch report generator over county demographic records.
//!
//! A dataset of counties is loaded once, then an operations script is run
//! against it line by line. Report operations print totals and percentages
//! for the current working set; filter operations narrow the working set for
//! every line that follows.
//!
//! ## Overview
//!
//! - **Records**: one [`County`] per entry, with named groups of numeric fields
//! - **Field paths**: `group.subfield`, checked against the loaded data before use
//! - **Working set**: replaced by each filter, never edited in place
//! - **Line isolation**: a failing line is reported and the run continues
//!
//! ## Example
//!
//! ```
//! use county_report::{County, Group, Interpreter};
//!
//! let counties = vec![
//!     County::new("A", "NY")
//!         .with_field(Group::Population, "2014 Population", 100_i64)
//!         .with_field(Group::Education, "Bachelor's Degree or Higher", 50.0),
//!     County::new("B", "CA")
//!         .with_field(Group::Population, "2014 Population", 200_i64)
//!         .with_field(Group::Education, "Bachelor's Degree or Higher", 25.0),
//! ];
//!
//! let mut out = Vec::new();
//! let summary = Interpreter::new(counties)
//!     .run("filter-state:NY\npopulation-total", &mut out)
//!     .unwrap();
//!
//! assert_eq!(summary.final_count, 1);
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "Filter: state == NY (1 entries)\n2014 population: 100.0\n"
//! );
//! ```

pub mod dsl;
pub mod error;
pub mod executor;
pub mod field;
pub mod filter;
pub mod record;
pub mod report;
pub mod store;

pub use dsl::{Operation, ScriptLine, parse_operation, read_script, script_lines};
pub use error::{LineError, LoadError, ScriptError};
pub use executor::{Interpreter, RunSummary, StepInfo, StepOutcome};
pub use field::{Catalog, FieldPath, POPULATION_2014};
pub use filter::Comparison;
pub use record::{County, FieldGroup, FieldValue, Group};
pub use report::{Breakdown, Report, format_number};
pub use store::{DEFAULT_DATA_FILE, load_counties, parse_counties};
