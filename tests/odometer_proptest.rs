//! Property-based tests for the permutation engine and the lexer round trip
//!
//! The engine must obey the product-size law for arbitrary axis shapes and
//! keep cursor 0 the fastest-varying wheel; the lexer must round-trip any
//! text built from the surface character set.

use propsheet::sheet::lexing::{detokenize, tokenize};
use propsheet::sheet::odometer::{permutations, Axis};
use proptest::prelude::*;

fn axes_of(sizes: &[usize]) -> Vec<Axis> {
    sizes
        .iter()
        .enumerate()
        .map(|(axis_index, &size)| {
            Axis::new(
                format!("axis{}", axis_index),
                (0..size).map(|v| format!("a{}v{}", axis_index, v)).collect(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn product_size_law(sizes in proptest::collection::vec(0usize..4, 0..4)) {
        let expected: usize = if sizes.is_empty() {
            1
        } else {
            sizes.iter().product()
        };
        prop_assert_eq!(permutations(axes_of(&sizes)).count(), expected);
    }

    #[test]
    fn cursor_zero_varies_fastest(sizes in proptest::collection::vec(1usize..4, 1..4)) {
        // the j-th permutation selects index (j / stride_k) % L_k on axis k,
        // where stride_k is the product of the sizes of all faster axes
        for (j, permutation) in permutations(axes_of(&sizes)).enumerate() {
            let mut stride = 1;
            for (k, &size) in sizes.iter().enumerate() {
                let expected = format!("a{}v{}", k, (j / stride) % size);
                prop_assert_eq!(&permutation.values()[k], &expected);
                stride *= size;
            }
        }
    }

    #[test]
    fn permutations_are_distinct(sizes in proptest::collection::vec(1usize..4, 1..4)) {
        let tuples: Vec<Vec<String>> = permutations(axes_of(&sizes))
            .map(|p| p.values().to_vec())
            .collect();
        let mut deduped = tuples.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), tuples.len());
    }

    #[test]
    fn tokenize_round_trip(source in r"[a-z0-9 {};=,?.\-\n]{0,60}") {
        let tokens = tokenize(&source, None).expect("surface charset always lexes");
        prop_assert_eq!(detokenize(&tokens), source);
    }
}
