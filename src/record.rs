//! County demographic records.
//!
//! A [`County`] carries a name, a state abbreviation, and five named groups
//! of fields. Field values are kept exactly as the data source supplied them
//! and only converted to `f64` when an operation reads them.

use crate::error::LineError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named group of demographic fields within a county record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Age,
    Education,
    Ethnicities,
    Income,
    Population,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::Age,
        Group::Education,
        Group::Ethnicities,
        Group::Income,
        Group::Population,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Group::Age => "Age",
            Group::Education => "Education",
            Group::Ethnicities => "Ethnicities",
            Group::Income => "Income",
            Group::Population => "Population",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Group names match case-insensitively (`education` and `Education` both work).
impl FromStr for Group {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LineError::UnknownGroup(s.to_string()))
    }
}

/// A field value as stored in the data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value; text is parsed, ignoring surrounding whitespace.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Float(x) => Some(*x),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x:?}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Sub-field name to value, for one group.
pub type FieldGroup = BTreeMap<String, FieldValue>;

/// One county record.
///
/// Deserializes from the CORGIS `county_demographics.json` layout; top-level
/// groups other than the five in [`Group`] are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct County {
    #[serde(rename = "County")]
    pub name: String,
    pub state: String,
    pub age: FieldGroup,
    pub education: FieldGroup,
    pub ethnicities: FieldGroup,
    pub income: FieldGroup,
    pub population: FieldGroup,
}

impl County {
    /// Create a county with all groups empty.
    pub fn new(name: &str, state: &str) -> Self {
        Self {
            name: name.to_string(),
            state: state.to_string(),
            age: FieldGroup::new(),
            education: FieldGroup::new(),
            ethnicities: FieldGroup::new(),
            income: FieldGroup::new(),
            population: FieldGroup::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, group: Group, key: &str, value: impl Into<FieldValue>) -> Self {
        self.group_mut(group).insert(key.to_string(), value.into());
        self
    }

    pub fn group(&self, group: Group) -> &FieldGroup {
        match group {
            Group::Age => &self.age,
            Group::Education => &self.education,
            Group::Ethnicities => &self.ethnicities,
            Group::Income => &self.income,
            Group::Population => &self.population,
        }
    }

    fn group_mut(&mut self, group: Group) -> &mut FieldGroup {
        match group {
            Group::Age => &mut self.age,
            Group::Education => &mut self.education,
            Group::Ethnicities => &mut self.ethnicities,
            Group::Income => &mut self.income,
            Group::Population => &mut self.population,
        }
    }

    /// Raw stored value of `group.key`, if present.
    pub fn value(&self, group: Group, key: &str) -> Option<&FieldValue> {
        self.group(group).get(key)
    }

    /// Iterate every `(group, key)` pair this record exposes.
    pub fn field_names(&self) -> impl Iterator<Item = (Group, &str)> + '_ {
        Group::ALL
            .into_iter()
            .flat_map(move |g| self.group(g).keys().map(move |k| (g, k.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTAUGA: &str = r#"{
        "County": "Autauga County",
        "State": "AL",
        "Age": {"Percent 65 and Older": 13.8, "Percent Under 18 Years": 25.2},
        "Education": {"Bachelor's Degree or Higher": 20.9, "High School or Higher": 85.6},
        "Employment": {"Nonemployer Establishments": 2947},
        "Ethnicities": {"White Alone": 77.9},
        "Income": {"Median Houseold Income": 53682, "Persons Below Poverty Level": "12.1"},
        "Population": {"2010 Population": 54571, "2014 Population": 55395}
    }"#;

    #[test]
    fn test_deserialize_corgis_record() {
        let county: County = serde_json::from_str(AUTAUGA).unwrap();
        assert_eq!(county.name, "Autauga County");
        assert_eq!(county.state, "AL");
        assert_eq!(
            county.value(Group::Population, "2014 Population"),
            Some(&FieldValue::Integer(55395))
        );
        assert_eq!(
            county.value(Group::Education, "High School or Higher"),
            Some(&FieldValue::Float(85.6))
        );
        // Employment is not one of the tracked groups
        assert_eq!(county.field_names().count(), 9);
    }

    #[test]
    fn test_missing_group_is_an_error() {
        let json = r#"{"County": "X", "State": "AL", "Age": {}}"#;
        assert!(serde_json::from_str::<County>(json).is_err());
    }

    #[test]
    fn test_text_values_parse_at_read_time() {
        let county: County = serde_json::from_str(AUTAUGA).unwrap();
        let poverty = county
            .value(Group::Income, "Persons Below Poverty Level")
            .unwrap();
        assert_eq!(poverty, &FieldValue::Text("12.1".to_string()));
        assert_eq!(poverty.as_f64(), Some(12.1));
        assert_eq!(FieldValue::from(" 7 ").as_f64(), Some(7.0));
        assert_eq!(FieldValue::from("n/a").as_f64(), None);
    }

    #[test]
    fn test_group_from_str_ignores_case() {
        assert_eq!("education".parse::<Group>(), Ok(Group::Education));
        assert_eq!("POPULATION".parse::<Group>(), Ok(Group::Population));
        assert_eq!(
            "edu".parse::<Group>(),
            Err(LineError::UnknownGroup("edu".to_string()))
        );
    }

    #[test]
    fn test_value_display_keeps_stored_form() {
        assert_eq!(FieldValue::Integer(300).to_string(), "300");
        assert_eq!(FieldValue::Float(300.0).to_string(), "300.0");
        assert_eq!(FieldValue::from("1,200").to_string(), "1,200");
    }

    #[test]
    fn test_with_field_builder() {
        let county = County::new("A", "NY")
            .with_field(Group::Population, "2014 Population", 100_i64)
            .with_field(Group::Education, "Bachelor's Degree or Higher", 50.0);
        assert_eq!(county.field_names().count(), 2);
        assert_eq!(
            county.value(Group::Education, "Bachelor's Degree or Higher"),
            Some(&FieldValue::Float(50.0))
        );
    }
}
