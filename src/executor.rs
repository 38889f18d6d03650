//! Operation interpreter.
//!
//! Runs an operations script line by line against a working set of counties.
//! Reports leave the working set alone; filters replace it with a new,
//! smaller one. A line that fails is reported with its line number and
//! leaves the working set exactly as it was before the line.

use crate::dsl::{Operation, parse_operation, script_lines};
use crate::error::LineError;
use crate::field::Catalog;
use crate::filter::{self, Comparison};
use crate::record::County;
use crate::report::{self, Report};
use std::io::{self, Write};
use tracing::debug;

/// How a single script line ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Printed a report; working set unchanged.
    Reported,
    /// Replaced the working set.
    Filtered,
    /// Verb not recognized; skipped.
    Unknown,
    /// Evaluation failed; working set unchanged.
    Failed(LineError),
}

/// Trace entry for one executed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub line_number: usize,
    pub text: String,
    /// Text before the first `:`.
    pub verb: String,
    pub input_count: usize,
    pub output_count: usize,
    pub outcome: StepOutcome,
}

/// Result of running a whole script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub steps: Vec<StepInfo>,
    pub final_count: usize,
}

impl RunSummary {
    /// Steps that failed.
    pub fn errors(&self) -> impl Iterator<Item = &StepInfo> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Owns the working set and applies operations to it.
#[derive(Debug, Clone)]
pub struct Interpreter {
    working: Vec<County>,
    catalog: Catalog,
}

impl Interpreter {
    /// Start from the full loaded dataset.
    ///
    /// The field catalog is taken from the full dataset, so a path stays
    /// valid after filters have narrowed the working set.
    pub fn new(counties: Vec<County>) -> Self {
        let catalog = Catalog::from_counties(&counties);
        Self {
            working: counties,
            catalog,
        }
    }

    pub fn working_set(&self) -> &[County] {
        &self.working
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply one parsed operation.
    pub fn apply(
        &mut self,
        op: &Operation,
        report: &mut Report,
    ) -> Result<StepOutcome, LineError> {
        match op {
            Operation::Display => {
                report::display(&self.working, report)?;
            }
            Operation::PopulationTotal => {
                report::population_total(&self.working, report)?;
            }
            Operation::Population { field } => {
                report::population(&self.working, field, report)?;
            }
            Operation::Percent { field } => {
                report::percent(&self.working, field, report)?;
            }
            Operation::FilterState { state } => {
                self.working = filter::filter_state(&self.working, state, report);
                return Ok(StepOutcome::Filtered);
            }
            Operation::FilterGt { field, threshold } => {
                self.working = filter::filter_field(
                    &self.working,
                    field,
                    Comparison::Greater,
                    *threshold,
                    report,
                )?;
                return Ok(StepOutcome::Filtered);
            }
            Operation::FilterLt { field, threshold } => {
                self.working =
                    filter::filter_field(&self.working, field, Comparison::Less, *threshold, report)?;
                return Ok(StepOutcome::Filtered);
            }
            Operation::Unknown { line } => {
                report.line(format!("Unknown operation: {line}"));
                return Ok(StepOutcome::Unknown);
            }
        }
        Ok(StepOutcome::Reported)
    }

    /// Parse and apply one line of operations text.
    pub fn execute_line(
        &mut self,
        line: &str,
        report: &mut Report,
    ) -> Result<StepOutcome, LineError> {
        let op = parse_operation(line, &self.catalog)?;
        debug!(operation = op.name(), counties = self.working.len(), "dispatch");
        self.apply(&op, report)
    }

    /// Run a whole operations script, writing report lines to `out`.
    ///
    /// Line failures are written to `out` as
    /// `Error processing line <n>: <line> - <reason>` and do not stop the run.
    /// Only write errors on `out` are returned.
    pub fn run<W: Write>(&mut self, script: &str, out: &mut W) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut report = Report::new();

        for line in script_lines(script) {
            let input_count = self.working.len();
            let outcome = match self.execute_line(line.text, &mut report) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(line = line.number, error = %e, "operation failed");
                    report.line(format!(
                        "Error processing line {}: {} - {e}",
                        line.number, line.text
                    ));
                    StepOutcome::Failed(e)
                }
            };
            report.flush_to(out)?;

            summary.steps.push(StepInfo {
                line_number: line.number,
                text: line.text.to_string(),
                verb: line.text.split(':').next().unwrap_or_default().to_string(),
                input_count,
                output_count: self.working.len(),
                outcome,
            });
        }

        summary.final_count = self.working.len();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::POPULATION_2014;
    use crate::record::Group;
    use crate::store::load_counties;
    use std::fs;
    use std::path::Path;

    const BACHELOR: &str = "Bachelor's Degree or Higher";

    /// Helper: the two-county NY/CA scenario.
    fn scenario() -> Interpreter {
        Interpreter::new(vec![
            County::new("A", "NY")
                .with_field(Group::Population, POPULATION_2014, 100_i64)
                .with_field(Group::Education, BACHELOR, 50_i64),
            County::new("B", "CA")
                .with_field(Group::Population, POPULATION_2014, 200_i64)
                .with_field(Group::Education, BACHELOR, 25_i64),
        ])
    }

    /// Helper: run a script and return (output, summary).
    fn run(interp: &mut Interpreter, script: &str) -> (String, RunSummary) {
        let mut out = Vec::new();
        let summary = interp.run(script, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    fn names(interp: &Interpreter) -> Vec<&str> {
        interp.working_set().iter().map(|c| c.name.as_str()).collect()
    }

    /// Assert a script under specs/ produces its recorded `.out` text.
    fn assert_script_output(name: &str) {
        let spec_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("specs");
        let counties = load_counties(&spec_dir.join("counties.json")).unwrap();
        let script = fs::read_to_string(spec_dir.join(format!("{name}.ops"))).unwrap();
        let expected = fs::read_to_string(spec_dir.join(format!("{name}.out"))).unwrap();

        let (output, _) = run(&mut Interpreter::new(counties), &script);
        assert_eq!(output, expected, "output differs for {name}.ops");
    }

    // --- Unit tests ---

    #[test]
    fn test_filter_state_scenario() {
        let mut interp = scenario();
        let (output, summary) = run(&mut interp, "filter-state:NY");
        assert_eq!(output, "Filter: state == NY (1 entries)\n");
        assert_eq!(names(&interp), vec!["A"]);
        assert_eq!(summary.final_count, 1);
        assert_eq!(summary.steps[0].outcome, StepOutcome::Filtered);
    }

    #[test]
    fn test_population_scenario() {
        let mut interp = scenario();
        let script = "population-total\n\
                      population:Education.Bachelor's Degree or Higher\n\
                      percent:Education.Bachelor's Degree or Higher";
        let (output, summary) = run(&mut interp, script);
        assert_eq!(
            output,
            "2014 population: 300.0\n\
             2014 Education.Bachelor's Degree or Higher population: 100.0\n\
             Total 2014 population: 300.0\n\
             2014 Education.Bachelor's Degree or Higher population: 100.0\n\
             Total 2014 population: 300.0\n\
             2014 Education.Bachelor's Degree or Higher percentage: 33.33333333333333\n"
        );
        assert_eq!(summary.error_count(), 0);
        assert_eq!(interp.working_set().len(), 2);
    }

    #[test]
    fn test_malformed_line_keeps_working_set() {
        let mut interp = scenario();
        let script = "filter-gt:Education.Bachelor's Degree or Higher:notanumber\n\
                      population-total";
        let (output, summary) = run(&mut interp, script);
        assert!(output.starts_with(
            "Error processing line 1: \
             filter-gt:Education.Bachelor's Degree or Higher:notanumber - "
        ));
        assert!(output.ends_with("2014 population: 300.0\n"));
        assert_eq!(summary.error_count(), 1);
        let failed = summary.errors().next().unwrap();
        assert_eq!(failed.line_number, 1);
        assert_eq!(failed.verb, "filter-gt");
        assert_eq!(
            failed.outcome,
            StepOutcome::Failed(LineError::InvalidNumber("notanumber".to_string()))
        );
        assert_eq!((failed.input_count, failed.output_count), (2, 2));
    }

    #[test]
    fn test_evaluation_failure_keeps_working_set() {
        let mut interp = Interpreter::new(vec![
            County::new("A", "NY").with_field(Group::Education, BACHELOR, 50_i64),
            County::new("B", "NY").with_field(Group::Education, BACHELOR, "unknown"),
        ]);
        let (output, summary) = run(
            &mut interp,
            "filter-lt:Education.Bachelor's Degree or Higher:60\nfilter-state:NY",
        );
        assert!(output.starts_with("Error processing line 1: "));
        assert!(output.contains("not numeric"));
        assert!(output.ends_with("Filter: state == NY (2 entries)\n"));
        assert_eq!(summary.final_count, 2);
    }

    #[test]
    fn test_unknown_verb_changes_nothing() {
        let mut interp = scenario();
        let (output, summary) = run(&mut interp, "sort:Education.Bachelor's Degree or Higher");
        assert_eq!(
            output,
            "Unknown operation: sort:Education.Bachelor's Degree or Higher\n"
        );
        assert_eq!(summary.steps[0].outcome, StepOutcome::Unknown);
        assert_eq!(summary.error_count(), 0);
        assert_eq!(interp.working_set().len(), 2);
    }

    #[test]
    fn test_unknown_field_reported_with_line_number() {
        let mut interp = scenario();
        let (output, _) = run(&mut interp, "display\n\npercent:Education.Masters");
        assert!(output.ends_with(
            "Error processing line 3: percent:Education.Masters - \
             unknown field 'Education.Masters'\n"
        ));
    }

    #[test]
    fn test_filters_narrow_monotonically() {
        let mut interp = scenario();
        let script = "filter-gt:Education.Bachelor's Degree or Higher:10\n\
                      filter-lt:Education.Bachelor's Degree or Higher:40\n\
                      filter-state:NY";
        let (_, summary) = run(&mut interp, script);
        let counts: Vec<(usize, usize)> = summary
            .steps
            .iter()
            .map(|s| (s.input_count, s.output_count))
            .collect();
        assert_eq!(counts, vec![(2, 2), (2, 1), (1, 0)]);
        assert!(interp.working_set().is_empty());
    }

    #[test]
    fn test_catalog_survives_narrowing() {
        let mut interp = scenario();
        let (output, summary) = run(
            &mut interp,
            "filter-state:TX\npopulation:Education.Bachelor's Degree or Higher",
        );
        assert_eq!(summary.error_count(), 0);
        assert!(output.contains("Total 2014 population: 0.0"));
        assert_eq!(interp.catalog().len(), 2);
    }

    #[test]
    fn test_blank_and_hash_lines_report_unknown() {
        let mut interp = Interpreter::new(vec![]);
        let (output, summary) = run(&mut interp, "display\n\n#filter-state:NY\ndisplay");
        assert_eq!(
            output,
            "Unknown operation: \nUnknown operation: #filter-state:NY\n"
        );
        assert_eq!(summary.steps.len(), 4);
        assert_eq!(summary.steps[1].line_number, 2);
        assert_eq!(summary.steps[1].outcome, StepOutcome::Unknown);
        assert_eq!(summary.steps[2].outcome, StepOutcome::Unknown);
        assert_eq!(summary.error_count(), 0);
    }

    #[test]
    fn test_empty_script() {
        let mut interp = scenario();
        let (output, summary) = run(&mut interp, "");
        assert!(output.is_empty());
        assert!(summary.steps.is_empty());
        assert_eq!(summary.final_count, 2);
    }

    #[test]
    fn test_apply_parsed_operation() {
        let mut interp = scenario();
        let mut report = Report::new();
        let outcome = interp
            .apply(
                &Operation::FilterState {
                    state: "CA".to_string(),
                },
                &mut report,
            )
            .unwrap();
        assert_eq!(outcome, StepOutcome::Filtered);
        assert_eq!(names(&interp), vec!["B"]);
        assert_eq!(report.lines(), &["Filter: state == CA (1 entries)"]);
    }

    // --- Script files under specs/ ---

    macro_rules! script_test {
        ($name:ident, $file:expr) => {
            #[test]
            fn $name() {
                assert_script_output($file);
            }
        };
    }

    script_test!(script_bad_lines, "bad-lines");
    script_test!(script_display_all, "display-all");
    script_test!(script_empty, "empty");
    script_test!(script_filter_chain, "filter-chain");
    script_test!(script_population_breakdown, "population-breakdown");
    script_test!(script_prefix_verbs, "prefix-verbs");
    script_test!(script_state_report, "state-report");
}
