//! The polymorphic value model of a propsheet document
//!
//! A parsed document is a tree of [`Value`]s. Resolution is context-dependent:
//! the same value tree can be resolved many times, once per enclosing
//! permutation when nested inside another iterator, and is immutable after
//! construction. String conversion is always explicit, through —
//! [`Value::to_single_string`] and [`Value::to_string_list`], and element
//! lists are private fields behind accessors, never exposed for mutation.

use crate::sheet::context::ValueContext;
use crate::sheet::error::ExpandResult;
use crate::sheet::lexing::Token;
use crate::sheet::location::SourceLocation;
use crate::sheet::parsing::RouteParser;
use crate::sheet::resolver;
use crate::sheet::route::Route;
use serde::Serialize;

/// A resolvable unit of document data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Scalar(Scalar),
    Collection(Collection),
    Instruction(Instruction),
    Expansion(Expansion),
    ObjectExpansion(ObjectExpansion),
}

impl Value {
    /// Resolve to a single string under `ctx`.
    pub fn to_single_string(&self, ctx: &dyn ValueContext) -> String {
        match self {
            Value::Scalar(s) => s.to_single_string(ctx),
            Value::Collection(c) => c.to_single_string(ctx),
            Value::Instruction(i) => i.text().to_string(),
            Value::Expansion(e) => resolver::expansion_value(e, ctx),
            Value::ObjectExpansion(o) => resolver::expansion_value(o.expansion(), ctx),
        }
    }

    /// Resolve to a list of strings under `ctx`.
    pub fn to_string_list(&self, ctx: &dyn ValueContext) -> Vec<String> {
        match self {
            Value::Scalar(s) => s.to_string_list(ctx),
            Value::Collection(c) => c.to_string_list(ctx),
            Value::Instruction(i) => vec![i.text().to_string()],
            Value::Expansion(e) => resolver::expansion_values(e, ctx).collect(),
            Value::ObjectExpansion(o) => resolver::expansion_values(o.expansion(), ctx).collect(),
        }
    }

    /// Source locations of this value, one per leaf for collections.
    pub fn source_locations(&self) -> Vec<SourceLocation> {
        match self {
            Value::Scalar(s) => vec![s.location.clone()],
            Value::Collection(c) => c
                .elements
                .iter()
                .flat_map(Value::source_locations)
                .collect(),
            Value::Instruction(i) => vec![i.location.clone()],
            Value::Expansion(e) => vec![e.location.clone()],
            Value::ObjectExpansion(o) => vec![o.expansion.location.clone()],
        }
    }
}

/// Trimmed literal text; macros resolve at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scalar {
    text: String,
    location: SourceLocation,
}

impl Scalar {
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            text: text.into().trim().to_string(),
            location,
        }
    }

    /// The unresolved literal text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn to_single_string(&self, ctx: &dyn ValueContext) -> String {
        ctx.resolve_macros(&self.text, None, false)
    }

    /// Resolve, then split on commas into trimmed parts. A scalar that
    /// resolves to the empty string yields `[""]`, never an empty list.
    pub fn to_string_list(&self, ctx: &dyn ValueContext) -> Vec<String> {
        self.to_single_string(ctx)
            .split(',')
            .map(|part| part.trim().to_string())
            .collect()
    }
}

/// An ordered sequence of child values.
///
/// Invariant: a collection never directly contains another collection;
/// [`Collection::push`] splices nested collections into place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    elements: Vec<Value>,
    location: SourceLocation,
}

impl Collection {
    pub fn new(location: SourceLocation) -> Self {
        Self {
            elements: Vec::new(),
            location,
        }
    }

    pub fn from_values(values: Vec<Value>, location: SourceLocation) -> Self {
        let mut collection = Self::new(location);
        for value in values {
            collection.push(value);
        }
        collection
    }

    /// Append a value, flattening nested collections into direct siblings.
    pub fn push(&mut self, value: Value) {
        match value {
            Value::Collection(inner) => self.elements.extend(inner.elements),
            other => self.elements.push(other),
        }
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Join resolved child values with `", "`. A singleton resolves to its
    /// element's value unjoined; an empty collection to the empty string.
    pub fn to_single_string(&self, ctx: &dyn ValueContext) -> String {
        match self.elements.len() {
            0 => String::new(),
            1 => self.elements[0].to_single_string(ctx),
            _ => self
                .elements
                .iter()
                .map(|e| e.to_single_string(ctx))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn to_string_list(&self, ctx: &dyn ValueContext) -> Vec<String> {
        self.elements
            .iter()
            .flat_map(|e| e.to_string_list(ctx))
            .collect()
    }
}

/// Opaque raw directive text; never macro-resolved by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    text: String,
    location: SourceLocation,
}

impl Instruction {
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// An iterator expression: axis expressions plus a raw token template.
///
/// Each axis resolves to a value set (a known macro name wins over literal
/// enumeration, see [`resolver::resolve_axis`]); the template is resolved
/// once per point of the axes' cartesian product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expansion {
    axes: Vec<Value>,
    template: Vec<Token>,
    location: SourceLocation,
}

impl Expansion {
    pub fn new(axes: Vec<Value>, template: Vec<Token>, location: SourceLocation) -> Self {
        Self {
            axes,
            template,
            location,
        }
    }

    pub fn axes(&self) -> &[Value] {
        &self.axes
    }

    pub fn template(&self) -> &[Token] {
        &self.template
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// An iterator whose per-permutation output is a re-parsed sub-document.
///
/// Each permutation's resolved text parses into routes namespaced under
/// `"{prefix}#{counter}#"`, with the counter running 0, 1, ... in
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpansion {
    expansion: Expansion,
    prefix: String,
}

impl ObjectExpansion {
    pub fn new(expansion: Expansion, prefix: impl Into<String>) -> Self {
        Self {
            expansion,
            prefix: prefix.into(),
        }
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Expand into routes, re-parsing each permutation's resolved body with
    /// the injected `parser`. See [`resolver::expand_object`].
    pub fn expand(
        &self,
        ctx: &dyn ValueContext,
        parser: &mut dyn RouteParser,
    ) -> ExpandResult<Vec<Route>> {
        resolver::expand_object(self, ctx, parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::testing::MacroTable;

    fn loc() -> SourceLocation {
        SourceLocation::unknown()
    }

    fn scalar(text: &str) -> Value {
        Value::Scalar(Scalar::new(text, loc()))
    }

    #[test]
    fn test_scalar_without_macros_is_literal() {
        let ctx = MacroTable::new();
        assert_eq!(scalar("plain text").to_single_string(&ctx), "plain text");
    }

    #[test]
    fn test_scalar_trims_on_construction() {
        let s = Scalar::new("  padded  ", loc());
        assert_eq!(s.text(), "padded");
    }

    #[test]
    fn test_scalar_list_splits_on_commas() {
        let ctx = MacroTable::new();
        assert_eq!(
            scalar("a, b, c").to_string_list(&ctx),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_empty_scalar_yields_single_empty_string() {
        let ctx = MacroTable::new();
        assert_eq!(scalar("").to_string_list(&ctx), vec![""]);
    }

    #[test]
    fn test_scalar_resolves_macros() {
        let mut ctx = MacroTable::new();
        ctx.define("arch", ["x64"]);
        assert_eq!(scalar("bin-${arch}").to_single_string(&ctx), "bin-x64");
    }

    #[test]
    fn test_collection_flattening() {
        let mut inner = Collection::new(loc());
        inner.push(scalar("x"));
        inner.push(scalar("y"));

        let mut outer = Collection::new(loc());
        outer.push(scalar("a"));
        outer.push(Value::Collection(inner));

        assert_eq!(outer.len(), 3);
        assert!(outer
            .elements()
            .iter()
            .all(|e| !matches!(e, Value::Collection(_))));
    }

    #[test]
    fn test_collection_join_rules() {
        let ctx = MacroTable::new();

        let empty = Collection::new(loc());
        assert_eq!(empty.to_single_string(&ctx), "");

        let single = Collection::from_values(vec![scalar("one")], loc());
        assert_eq!(single.to_single_string(&ctx), "one");

        let many = Collection::from_values(vec![scalar("one"), scalar("two")], loc());
        assert_eq!(many.to_single_string(&ctx), "one, two");
    }

    #[test]
    fn test_collection_list_concatenates_children() {
        let ctx = MacroTable::new();
        let c = Collection::from_values(vec![scalar("a, b"), scalar("c")], loc());
        assert_eq!(c.to_string_list(&ctx), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_instruction_is_not_resolved() {
        let mut ctx = MacroTable::new();
        ctx.define("arch", ["x64"]);
        let i = Value::Instruction(Instruction::new("@copy ${arch}", loc()));
        assert_eq!(i.to_single_string(&ctx), "@copy ${arch}");
    }

    #[test]
    fn test_source_locations_flatten() {
        let a = Value::Scalar(Scalar::new("a", SourceLocation::new(None, 1, 1)));
        let b = Value::Scalar(Scalar::new("b", SourceLocation::new(None, 2, 1)));
        let c = Value::Collection(Collection::from_values(vec![a, b], loc()));
        let locations = c.source_locations();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].row, 1);
        assert_eq!(locations[1].row, 2);
    }
}
