//! Property-based tests for storage and the kind lattice
//!
//! These tests use proptest to check lattice and conversion properties across
//! randomly generated kinds, shapes and cell values.

#[cfg(test)]
mod tests {
    use crate::dense::increment_index;
    use crate::{NumericKind, Tensor, LATTICE};
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = NumericKind> {
        prop::sample::select(LATTICE.to_vec())
    }

    // Strategy for generating valid tensor shapes (1-4D, reasonable sizes)
    fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(1usize..6, 1..=4)
    }

    proptest! {
        #[test]
        fn prop_resolve_is_max_precedence(kinds in prop::collection::vec(kind_strategy(), 1..8)) {
            let resolved = NumericKind::resolve(kinds.iter().copied());
            let max_precedence = kinds.iter().map(|k| k.precedence()).max().unwrap();
            prop_assert_eq!(resolved.precedence(), max_precedence);
            for kind in &kinds {
                prop_assert!(kind.widens_to(resolved));
            }
        }

        #[test]
        fn prop_common_is_commutative(a in kind_strategy(), b in kind_strategy()) {
            prop_assert_eq!(a.common(b), b.common(a));
        }

        #[test]
        fn prop_integer_widening_is_lossless(cells in prop::collection::vec(any::<i8>(), 1..32)) {
            let n = cells.len();
            let t = Tensor::from_vec(cells.clone(), &[n]).unwrap();
            for kind in [NumericKind::Short, NumericKind::Int, NumericKind::Long, NumericKind::Float, NumericKind::Double] {
                let wide = t.to_kind(kind);
                prop_assert_eq!(wide.kind(), kind);
                for (i, &v) in cells.iter().enumerate() {
                    prop_assert_eq!(wide.get_i64(&[i]), Some(v as i64));
                }
            }
        }

        #[test]
        fn prop_walk_covers_every_cell(shape in shape_strategy()) {
            let total: usize = shape.iter().product();
            let mut index = vec![0usize; shape.len()];
            let mut count = 1usize;
            while increment_index(&mut index, &shape) {
                count += 1;
            }
            prop_assert_eq!(count, total);
        }

        #[test]
        fn prop_zeros_shape_and_kind(kind in kind_strategy(), shape in shape_strategy()) {
            let t = Tensor::zeros(kind, &shape);
            prop_assert_eq!(t.kind(), kind);
            prop_assert_eq!(t.shape(), shape.as_slice());
            prop_assert_eq!(t.len(), shape.iter().product::<usize>());
        }
    }
}
