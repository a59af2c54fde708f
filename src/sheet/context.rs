//! The macro-resolution capability consumed by the expansion core
//!
//! The surrounding document model implements [`ValueContext`]; the core only
//! consumes it. A context answers two questions — what value set is bound to
//! a macro name, and what single value stands in for it — and rewrites macro
//! placeholders embedded in arbitrary text.
//!
//! Placeholder syntax (consumed, not defined here): `${name}` substitutes
//! normally; `${#name}` is the "substitute on the next pass" escape and is
//! never touched by [`ValueContext::resolve_macros`] — the object-iterator
//! resolver strips one `#` per pass. Placeholders that resolve to nothing are
//! left verbatim so a later pass with a richer context can still pick them up.

use crate::sheet::permutation::Permutation;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `${name}` placeholders, including the `${#name}` escape form
static MACRO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^${}]+)\}").expect("macro placeholder regex"));

/// Capability interface to the enclosing document's macro bindings.
pub trait ValueContext {
    /// The value set bound to `name`, optionally narrowed by an enclosing
    /// permutation. Empty when the name is unknown.
    fn macro_values(&self, name: &str, permutation: Option<&Permutation>) -> Vec<String>;

    /// Single-value convenience form. The policy for multi-valued macros
    /// (first value, join, ...) belongs to the implementer.
    fn single_macro_value(&self, name: &str, permutation: Option<&Permutation>) -> Option<String>;

    /// Replace every `${name}` occurrence in `text` with its resolved value.
    ///
    /// Axis bindings of `permutation` take precedence over document macros.
    /// With `items_only` set, *only* axis bindings are substituted — the mode
    /// used while resolving object-iterator bodies, where ambient macros must
    /// survive to the next pass.
    fn resolve_macros(
        &self,
        text: &str,
        permutation: Option<&Permutation>,
        items_only: bool,
    ) -> String {
        MACRO_PATTERN
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                if name.starts_with('#') {
                    // deferred escape, consumed by the next resolution pass
                    return caps[0].to_string();
                }
                if let Some(perm) = permutation {
                    if let Some(value) = perm.binding(name) {
                        return value.to_string();
                    }
                }
                if !items_only {
                    if let Some(value) = self.single_macro_value(name, permutation) {
                        return value;
                    }
                }
                caps[0].to_string()
            })
            .into_owned()
    }
}
