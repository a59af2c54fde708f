//! Lazy cartesian-product enumeration over axis value sets
//!
//! Given N independently-sized axis value sets, [`permutations`] yields every
//! tuple of their cartesian product without materializing the product: state
//! is one cursor per axis. The carry discipline is an odometer's — cursor 0
//! is the fastest-varying wheel (the innermost loop), cursor N-1 the slowest.
//! Cursor 0 starts one step before its first element and is advanced before
//! the first emission; carrying past the last wheel ends the enumeration.
//!
//! Two edge shapes are significant and must not be conflated:
//! zero axes yields exactly one empty [`Permutation`] (the identity point),
//! while any axis with zero values makes the whole product empty and yields
//! nothing. An axis with exactly one value is a constant across the product.
//!
//! The iterator is finite and not restartable; a second traversal needs a
//! fresh [`permutations`] call.

use crate::sheet::permutation::{sanitize_axis_name, Permutation};

/// One resolved iteration axis: a display name and its value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    name: String,
    values: Vec<String>,
}

impl Axis {
    /// The display name is sanitized on construction so permutation bindings
    /// always see word-character names.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: sanitize_axis_name(&name.into()),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

enum Cursors {
    /// Cursor 0 not yet advanced onto its first element
    BeforeFirst,
    Running(Vec<usize>),
    Exhausted,
}

/// Lazy enumeration state over a set of axes. Create with [`permutations`].
pub struct Permutations {
    axes: Vec<Axis>,
    cursors: Cursors,
}

/// Enumerate every point of the cartesian product of `axes`, innermost-first.
pub fn permutations(axes: Vec<Axis>) -> Permutations {
    Permutations {
        axes,
        cursors: Cursors::BeforeFirst,
    }
}

fn point(axes: &[Axis], cursors: &[usize]) -> Permutation {
    let names = axes.iter().map(|a| a.name.clone()).collect();
    let values = axes
        .iter()
        .zip(cursors)
        .map(|(axis, &cursor)| axis.values[cursor].clone())
        .collect();
    Permutation::new(names, values)
}

impl Iterator for Permutations {
    type Item = Permutation;

    fn next(&mut self) -> Option<Permutation> {
        match std::mem::replace(&mut self.cursors, Cursors::Exhausted) {
            Cursors::Exhausted => None,
            Cursors::BeforeFirst => {
                if self.axes.is_empty() {
                    // the identity point for zero axes
                    return Some(Permutation::empty());
                }
                if self.axes.iter().any(Axis::is_empty) {
                    // an empty axis empties the whole product
                    return None;
                }
                let cursors = vec![0; self.axes.len()];
                let first = point(&self.axes, &cursors);
                self.cursors = Cursors::Running(cursors);
                Some(first)
            }
            Cursors::Running(mut cursors) => {
                for i in 0..cursors.len() {
                    cursors[i] += 1;
                    if cursors[i] < self.axes[i].len() {
                        let item = point(&self.axes, &cursors);
                        self.cursors = Cursors::Running(cursors);
                        return Some(item);
                    }
                    // wheel i wrapped, carry into wheel i+1
                    cursors[i] = 0;
                }
                None
            }
        }
    }
}
