//! Named-binding snapshots for cartesian-product points
//!
//! A [`Permutation`] is an immutable snapshot of one point in an iterator's
//! cartesian product: for each axis, the axis's display name paired with the
//! value selected at that point. The empty permutation is the valid identity
//! point for an iterator with zero axes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Runs of non-word characters collapse to a single underscore
static AXIS_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("axis name regex"));

/// Sanitize an axis display name for use as a macro binding name.
pub fn sanitize_axis_name(name: &str) -> String {
    AXIS_NAME_PATTERN.replace_all(name.trim(), "_").into_owned()
}

/// One concrete binding of every axis to a single selected value.
///
/// Invariant: `names` and `values` always have equal length; violating it is
/// a programming error and fails the construction assert rather than being
/// silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permutation {
    names: Vec<String>,
    values: Vec<String>,
}

impl Permutation {
    pub fn new(names: Vec<String>, values: Vec<String>) -> Self {
        assert_eq!(
            names.len(),
            values.len(),
            "permutation names and values must have equal length"
        );
        Self { names, values }
    }

    /// The identity point for zero iteration axes.
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Look up the selected value for a macro name.
    ///
    /// A decimal name selects by axis position (`0` is the innermost axis),
    /// anything else matches the sanitized axis display names.
    pub fn binding(&self, name: &str) -> Option<&str> {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            let index: usize = name.parse().ok()?;
            return self.values.get(index).map(String::as_str);
        }
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i].as_str())
    }

    /// Iterate (name, value) pairs in axis order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}
