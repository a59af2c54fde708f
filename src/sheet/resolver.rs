//! Template resolution for iterator and object-iterator expressions
//!
//! Resolution is a staged pipeline per expression:
//!
//! 1. every axis expression resolves to a value set ([`resolve_axis`] — a
//!    scalar naming a known macro takes the macro's values, anything else
//!    enumerates literally);
//! 2. the odometer enumerates the cartesian product of those sets;
//! 3. the raw template tokens are flattened to text (template slots `?`
//!    rewriting to positional placeholders) and macros are substituted once
//!    per permutation.
//!
//! For plain expansions step 3 yields the output strings directly. For object
//! expansions the resolved text re-enters the front of the pipeline: it is
//! re-tokenized and handed to an injected [`RouteParser`] as a dictionary
//! body namespaced per permutation instance. Re-parsing needs a live document
//! seam, so object expansion is eager; plain expansion stays lazy.

use crate::sheet::context::ValueContext;
use crate::sheet::error::ExpandResult;
use crate::sheet::lexing::{tokenize, Token, TokenKind};
use crate::sheet::odometer::{permutations, Axis};
use crate::sheet::parsing::RouteParser;
use crate::sheet::route::Route;
use crate::sheet::value::{Expansion, ObjectExpansion, Value};

/// The outcome of resolving one axis expression to its value set.
///
/// The macro-name-or-literal-list duality is an explicit branch: context
/// lookup is always attempted first, literal enumeration is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisSet {
    /// The axis scalar named a macro known to the context
    Macro(Vec<String>),
    /// The axis enumerated its own literal values
    Literal(Vec<String>),
}

impl AxisSet {
    pub fn into_values(self) -> Vec<String> {
        match self {
            AxisSet::Macro(values) | AxisSet::Literal(values) => values,
        }
    }
}

/// Resolve one axis expression to its value set.
///
/// A `Scalar` axis whose literal text is a macro name known to `ctx` takes
/// the macro's value set; any other axis (or an unknown name) enumerates its
/// own `to_string_list`. Never a hard failure: an unknown scalar is just a
/// literal list.
pub fn resolve_axis(axis: &Value, ctx: &dyn ValueContext) -> AxisSet {
    if let Value::Scalar(scalar) = axis {
        let values = ctx.macro_values(scalar.text(), None);
        if !values.is_empty() {
            return AxisSet::Macro(values);
        }
    }
    AxisSet::Literal(axis.to_string_list(ctx))
}

/// The display name an axis binds under (sanitized later by [`Axis::new`]).
fn axis_display_name(axis: &Value, ctx: &dyn ValueContext) -> String {
    match axis {
        Value::Scalar(scalar) => scalar.text().to_string(),
        other => other.to_single_string(ctx),
    }
}

fn resolved_axes(expansion: &Expansion, ctx: &dyn ValueContext) -> Vec<Axis> {
    expansion
        .axes()
        .iter()
        .map(|axis| {
            Axis::new(
                axis_display_name(axis, ctx),
                resolve_axis(axis, ctx).into_values(),
            )
        })
        .collect()
}

/// Flatten template tokens to one string, rewriting the n-th `?` slot to the
/// positional placeholder `${n}`. With one axis and one slot this reproduces
/// the legacy single-slot behavior; slots inside string literals are real
/// string content and stay untouched because they lex as part of the literal.
fn stringify_template(template: &[Token]) -> String {
    let mut slot = 0;
    let mut text = String::new();
    for token in template {
        if token.kind == TokenKind::TemplateSlot {
            text.push_str(&format!("${{{}}}", slot));
            slot += 1;
        } else {
            text.push_str(&token.text);
        }
    }
    text
}

/// Resolve an expansion to one string per point of its axis product.
///
/// The sequence length is the product of the axis set sizes: zero when any
/// axis is empty, exactly one for a zero-axis expansion. Enumeration is lazy;
/// callers needing stability must collect, since nothing is cached.
pub fn expansion_values<'c>(
    expansion: &Expansion,
    ctx: &'c dyn ValueContext,
) -> impl Iterator<Item = String> + 'c {
    let axes = resolved_axes(expansion, ctx);
    let template = stringify_template(expansion.template());
    permutations(axes).map(move |permutation| ctx.resolve_macros(&template, Some(&permutation), false))
}

/// Resolve an expansion to a single string.
///
/// Zero results give the empty string and two or more join with `", "`.
/// A singleton result returns the *first axis expression's own* value, not
/// the computed template string — longstanding observable behavior, kept
/// as-is. A zero-axis expansion has no first axis and returns its one
/// computed string.
pub fn expansion_value(expansion: &Expansion, ctx: &dyn ValueContext) -> String {
    let mut values: Vec<String> = expansion_values(expansion, ctx).collect();
    match values.len() {
        0 => String::new(),
        1 => match expansion.axes().first() {
            Some(first) => first.to_single_string(ctx),
            None => values.remove(0),
        },
        _ => values.join(", "),
    }
}

/// Ensure a template parses as an object body: wrap in a synthetic brace
/// pair unless the first token already opens one.
fn brace_wrapped(template: &[Token]) -> Vec<Token> {
    if template.first().map(|t| t.kind) == Some(TokenKind::OpenBrace) {
        return template.to_vec();
    }
    let mut tokens = Vec::with_capacity(template.len() + 2);
    tokens.push(Token::synthetic(TokenKind::OpenBrace, "{"));
    tokens.extend_from_slice(template);
    tokens.push(Token::synthetic(TokenKind::CloseBrace, "}"));
    tokens
}

/// Expand an object-iterator into routes.
///
/// Per permutation, in enumeration order: brace-wrap and flatten the
/// template, substitute axis bindings only (ambient macros defer to the next
/// pass), strip one level of `${#...}` escaping, re-tokenize, and parse the
/// result as a dictionary body namespaced `"{prefix}#{counter}#"`. Any
/// re-tokenization or parse failure aborts the whole expansion — partial
/// matrices are not emitted.
pub fn expand_object(
    object: &ObjectExpansion,
    ctx: &dyn ValueContext,
    parser: &mut dyn RouteParser,
) -> ExpandResult<Vec<Route>> {
    let expansion = object.expansion();
    let axes = resolved_axes(expansion, ctx);
    let template = brace_wrapped(expansion.template());
    let text = stringify_template(&template);
    let file = expansion.location().file.clone();

    let mut routes = Vec::new();
    for (counter, permutation) in permutations(axes).enumerate() {
        let resolved = ctx.resolve_macros(&text, Some(&permutation), true);
        let unescaped = resolved.replace("${#", "${");
        let body = tokenize(&unescaped, file.as_deref())?;
        let namespace = format!("{}#{}#", object.prefix(), counter);
        routes.extend(parser.parse_routes(&body, &namespace)?);
    }
    Ok(routes)
}
