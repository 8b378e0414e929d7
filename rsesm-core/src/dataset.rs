//! Named collections of fields
//!
//! A [`Dataset`] is the unit the diagnostics read from: variables are looked
//! up by name and every field added must agree with the others on shared
//! dimension lengths and coordinates.

use crate::errors::{RSESMError, RSESMResult};
use crate::field::Field;
use crate::time_axis::TimeAxis;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A collection of named fields sharing a coordinate system
///
/// Dimensions with the same name must have the same length in every field,
/// and coordinates attached to the same dimension must agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    variables: BTreeMap<String, Field>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, field)` pairs
    pub fn from_fields<I, S>(fields: I) -> RSESMResult<Self>
    where
        I: IntoIterator<Item = (S, Field)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, field) in fields {
            dataset.insert(name, field)?;
        }
        Ok(dataset)
    }

    /// Add a field, replacing any existing field with the same name
    pub fn insert(&mut self, name: impl Into<String>, field: Field) -> RSESMResult<()> {
        let name = name.into();
        for (existing_name, existing) in &self.variables {
            if *existing_name != name {
                existing.check_compatible(&field)?;
            }
        }
        if self.variables.insert(name.clone(), field).is_some() {
            debug!("Replaced variable '{}'", name);
        }
        Ok(())
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> RSESMResult<Self> {
        self.insert(name, field)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.variables.get(name)
    }

    /// Get a field, failing with [`RSESMError::MissingVariables`] if absent
    pub fn field(&self, name: &str) -> RSESMResult<&Field> {
        self.get(name)
            .ok_or_else(|| RSESMError::MissingVariables(vec![name.to_string()]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Check that every name in `required` is present
    ///
    /// The error lists exactly the missing names, in the order they were requested.
    pub fn require(&self, required: &[&str]) -> RSESMResult<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RSESMError::MissingVariables(missing))
        }
    }

    /// A new dataset holding only `names`, failing if any are absent
    pub fn select(&self, names: &[&str]) -> RSESMResult<Dataset> {
        self.require(names)?;
        let mut out = Dataset::new();
        for name in names {
            out.insert(*name, self.field(name)?.clone())?;
        }
        Ok(out)
    }

    /// Apply a fallible transformation to every field
    pub fn try_map<F>(&self, mut f: F) -> RSESMResult<Dataset>
    where
        F: FnMut(&str, &Field) -> RSESMResult<Field>,
    {
        let mut out = Dataset::new();
        for (name, field) in &self.variables {
            out.insert(name.clone(), f(name, field)?)?;
        }
        Ok(out)
    }

    /// Calendar view of the coordinate along `dim`, taken from the first field that has one
    pub fn time_axis(&self, dim: &str) -> RSESMResult<TimeAxis> {
        self.variables
            .values()
            .find(|field| field.coord(dim).is_some())
            .ok_or_else(|| {
                RSESMError::CoordinateMismatch(format!(
                    "no variable carries coordinate values for '{}'",
                    dim
                ))
            })?
            .time_axis(dim)
    }
}

impl IntoIterator for Dataset {
    type Item = (String, Field);
    type IntoIter = std::collections::btree_map::IntoIter<String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn series(values: ndarray::Array1<f64>) -> Field {
        let time = TimeAxis::monthly(2000, values.len());
        Field::new(["time"], values.into_dyn())
            .unwrap()
            .with_time("time", &time)
            .unwrap()
    }

    #[test]
    fn require_lists_missing_in_order() {
        let ds = Dataset::from_fields([("tos", series(array![1.0, 2.0]))]).unwrap();
        let err = ds.require(&["spco2", "tos", "sos"]).unwrap_err();
        assert_eq!(
            err,
            RSESMError::MissingVariables(vec!["spco2".to_string(), "sos".to_string()])
        );
        assert!(ds.require(&["tos"]).is_ok());
    }

    #[test]
    fn rejects_inconsistent_lengths() {
        let mut ds = Dataset::new();
        ds.insert("a", series(array![1.0, 2.0])).unwrap();
        let result = ds.insert("b", series(array![1.0, 2.0, 3.0]));
        assert!(matches!(result, Err(RSESMError::CoordinateMismatch(_))));
    }

    #[test]
    fn rejects_inconsistent_time() {
        let shifted = Field::new(["time"], array![1.0, 2.0].into_dyn())
            .unwrap()
            .with_time("time", &TimeAxis::monthly(2010, 2))
            .unwrap();
        let result = Dataset::from_fields([("a", series(array![1.0, 2.0])), ("b", shifted)]);
        assert!(matches!(result, Err(RSESMError::CoordinateMismatch(_))));
    }

    #[test]
    fn replacing_a_field_is_allowed() {
        let mut ds = Dataset::new();
        ds.insert("a", series(array![1.0, 2.0])).unwrap();
        ds.insert("a", series(array![3.0, 4.0])).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.field("a").unwrap().values()[[1]], 4.0);
    }

    #[test]
    fn select_subset() {
        let ds = Dataset::from_fields([
            ("a", series(array![1.0, 2.0])),
            ("b", series(array![3.0, 4.0])),
        ])
        .unwrap();
        let subset = ds.select(&["b"]).unwrap();
        assert_eq!(subset.names().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(
            ds.select(&["b", "c"]).unwrap_err(),
            RSESMError::MissingVariables(vec!["c".to_string()])
        );
    }

    #[test]
    fn time_axis_from_fields() {
        let ds = Dataset::from_fields([("a", series(array![1.0, 2.0, 3.0]))]).unwrap();
        assert_eq!(ds.time_axis("time").unwrap().len(), 3);
        assert!(ds.time_axis("depth").is_err());
    }
}
