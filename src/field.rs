//! Typed field paths and the field catalog they are validated against.
//!
//! Operations refer to fields as `group.subfield`, e.g.
//! `Education.Bachelor's Degree or Higher`. A [`FieldPath`] is only built
//! once the group parses and the catalog knows the sub-field, so evaluation
//! never has to guess what a path means.

use crate::error::LineError;
use crate::record::{County, Group};
use std::collections::BTreeSet;
use std::fmt;

/// Sub-field of [`Group::Population`] that every population figure uses.
pub const POPULATION_2014: &str = "2014 Population";

/// A resolved `group.subfield` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    group: Group,
    key: String,
    /// Spelling the path was written with, echoed back in reports.
    label: String,
}

impl FieldPath {
    pub fn new(group: Group, key: &str) -> Self {
        Self {
            group,
            key: key.to_string(),
            label: format!("{}.{}", group.name(), key),
        }
    }

    /// `Population.2014 Population`
    pub fn population_2014() -> Self {
        Self::new(Group::Population, POPULATION_2014)
    }

    /// Parse `group.subfield` and check it against `catalog`.
    ///
    /// The path splits at the first `.`, so sub-field names may contain dots.
    pub fn parse(text: &str, catalog: &Catalog) -> Result<Self, LineError> {
        let text = text.trim();
        let (group, key) = text
            .split_once('.')
            .filter(|(g, k)| !g.is_empty() && !k.is_empty())
            .ok_or_else(|| LineError::MalformedFieldPath(text.to_string()))?;

        let group: Group = group.parse()?;
        if !catalog.contains(group, key) {
            return Err(LineError::UnknownField(text.to_string()));
        }

        Ok(Self {
            group,
            key: key.to_string(),
            label: text.to_string(),
        })
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read this field from `county` as a number.
    pub fn value(&self, county: &County) -> Result<f64, LineError> {
        let raw = county
            .value(self.group, &self.key)
            .ok_or_else(|| LineError::MissingValue {
                county: county.name.clone(),
                field: self.label.clone(),
            })?;
        raw.as_f64().ok_or_else(|| LineError::NotNumeric {
            county: county.name.clone(),
            field: self.label.clone(),
            value: raw.to_string(),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Field vocabulary observed in a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    fields: BTreeSet<(Group, String)>,
}

impl Catalog {
    /// Collect every `(group, key)` any county exposes.
    pub fn from_counties(counties: &[County]) -> Self {
        let fields = counties
            .iter()
            .flat_map(County::field_names)
            .map(|(g, k)| (g, k.to_string()))
            .collect();
        Self { fields }
    }

    pub fn contains(&self, group: Group, key: &str) -> bool {
        self.fields.contains(&(group, key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
