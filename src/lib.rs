//! # propsheet
//!
//! A macro-resolution and combinatorial-expansion engine for the propsheet
//! format, a declarative configuration language for describing build and
//! package matrices ("for each {platform} x {configuration} produce a named,
//! macro-substituted block").
//!
//! The crate owns the value model (scalars, collections, instructions, and
//! iterator expressions over named axes), the lazy cartesian-product
//! enumeration that drives iterator expansion, and the template resolution
//! that substitutes macros per enumerated permutation. The outer document
//! model is consumed through the [`ValueContext`](sheet::ValueContext)
//! capability, and re-entrant parsing of generated object bodies goes through
//! the injected [`RouteParser`](sheet::RouteParser) seam, so the core stays
//! testable without a host document.

pub mod sheet;
