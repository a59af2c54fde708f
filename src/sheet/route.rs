//! Routes: resolved key paths emitted from generated sub-documents

use crate::sheet::value::Value;
use serde::Serialize;
use std::fmt;

/// A key path → value pair produced by parsing a generated object body.
///
/// The first path segment is the namespace root; for object-iterator output
/// that root is `"{prefix}#{counter}#"` and its exact format is observable
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    path: Vec<String>,
    value: Value,
}

impl Route {
    pub fn new(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The full dotted key, e.g. `"platforms#0#.compile.flags"`.
    pub fn key(&self) -> String {
        self.path.join(".")
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
