//! Test support: an in-memory [`ValueContext`] backed by a macro table
//!
//! Production code resolves against the host document model; tests (and small
//! embedders) use [`MacroTable`] instead. The single-value policy here is
//! "first value wins".

use crate::sheet::context::ValueContext;
use crate::sheet::permutation::Permutation;
use std::collections::HashMap;

/// A plain name → value-set macro store.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<String, Vec<String>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a value set, replacing any previous binding.
    pub fn define<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.macros.insert(
            name.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
    }
}

impl ValueContext for MacroTable {
    fn macro_values(&self, name: &str, _permutation: Option<&Permutation>) -> Vec<String> {
        self.macros.get(name).cloned().unwrap_or_default()
    }

    fn single_macro_value(&self, name: &str, permutation: Option<&Permutation>) -> Option<String> {
        if let Some(perm) = permutation {
            if let Some(value) = perm.binding(name) {
                return Some(value.to_string());
            }
        }
        self.macros.get(name).and_then(|v| v.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut table = MacroTable::new();
        table.define("platform", ["x86", "x64"]);
        assert_eq!(table.macro_values("platform", None), vec!["x86", "x64"]);
        assert_eq!(table.single_macro_value("platform", None).as_deref(), Some("x86"));
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let table = MacroTable::new();
        assert!(table.macro_values("nope", None).is_empty());
        assert_eq!(table.single_macro_value("nope", None), None);
    }

    #[test]
    fn test_redefine_replaces() {
        let mut table = MacroTable::new();
        table.define("x", ["a"]);
        table.define("x", ["b", "c"]);
        assert_eq!(table.macro_values("x", None), vec!["b", "c"]);
    }
}
