//! Property-based tests for shape matching and cell-wise dispatch

use super::*;
use cellcalc_core::{NumericKind, Tensor};
use proptest::prelude::*;

/// A larger shape together with an in-order subsequence of its extents.
fn shape_and_subsequence() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(1usize..5, 1..5).prop_flat_map(|larger| {
        let rank = larger.len();
        (Just(larger), prop::collection::vec(any::<bool>(), rank))
            .prop_map(|(larger, keep)| {
                let smaller = larger
                    .iter()
                    .zip(&keep)
                    .filter(|&(_, &k)| k)
                    .map(|(&e, _)| e)
                    .collect();
                (larger, smaller)
            })
    })
}

fn filled(shape: &[usize], offset: i64) -> Tensor {
    let n: usize = shape.iter().product();
    Tensor::from_vec((0..n as i64).map(|v| v * 3 + offset).collect(), shape).unwrap()
}

proptest! {
    /// Any in-order subsequence of extents can be matched
    #[test]
    fn test_shape_match_totality((larger, smaller) in shape_and_subsequence()) {
        let m = infer_match_and_free(&larger, &smaller).unwrap();
        prop_assert_eq!(m.matching.len(), smaller.len());
        prop_assert_eq!(m.matching.len() + m.free.len(), larger.len());
        prop_assert!(m.matching.windows(2).all(|w| w[0] < w[1]));
        for (k, &axis) in m.matching.iter().enumerate() {
            prop_assert_eq!(larger[axis], smaller[k]);
        }
    }

    /// Every cell combines with the projected cell of the smaller tensor
    #[test]
    fn test_broadcast_correctness((larger, smaller) in shape_and_subsequence()) {
        let a = filled(&larger, 0);
        let b = filled(&smaller, 1000);
        let m = infer_match_and_free(&larger, &smaller).unwrap();
        let r = apply2(&a, &b, &Add).unwrap();
        prop_assert_eq!(r.shape(), a.shape());

        let mut index = vec![0usize; larger.len()];
        let mut projected = vec![0usize; smaller.len()];
        loop {
            m.project(&index, &mut projected);
            let expected = a.get_i64(&index).unwrap() + b.get_i64(&projected).unwrap();
            prop_assert_eq!(r.get_i64(&index), Some(expected));
            if !cellcalc_core::dense::increment_index(&mut index, &larger) {
                break;
            }
        }
    }

    /// Swapping the operands and mirroring the function gives the same result
    #[test]
    fn test_mirror_symmetry((larger, smaller) in shape_and_subsequence()) {
        prop_assume!(smaller.len() < larger.len());
        let big = filled(&larger, 5);
        let small = filled(&smaller, -7);

        let direct = apply2(&small, &big, &Subtract).unwrap();
        let mirrored = apply2(&big, &small, &Mirrored(Subtract)).unwrap();
        prop_assert_eq!(direct, mirrored);
    }

    /// The result kind is the wider of the two input kinds
    #[test]
    fn test_result_kind_is_common(p1 in 1u8..=6, p2 in 1u8..=6) {
        let k1 = NumericKind::from_precedence(p1).unwrap();
        let k2 = NumericKind::from_precedence(p2).unwrap();
        let a = Tensor::zeros(k1, &[2, 2]);
        let b = Tensor::zeros(k2, &[2]);
        let r = apply2(&a, &b, &Multiply).unwrap();
        prop_assert_eq!(r.kind(), k1.common(k2));
    }

    /// In-place unary application mutates and returns the same tensor
    #[test]
    fn test_in_place_identity(values in prop::collection::vec(-1000i64..1000, 1..30)) {
        let n = values.len();
        let mut t = Tensor::from_vec(values.clone(), &[n]).unwrap();
        let expected: Vec<i64> = values.iter().map(|v| -v).collect();
        let ptr: *const Tensor = &t;
        let r = apply_into1(&mut t, &Negate);
        prop_assert!(std::ptr::eq(r, ptr));
        prop_assert_eq!(t.kind(), NumericKind::Long);
        prop_assert_eq!(t.as_dense::<i64>().unwrap().to_vec(), expected);
    }

    /// Allocating and in-place binary application agree when no narrowing occurs
    #[test]
    fn test_apply_into2_matches_apply2((larger, smaller) in shape_and_subsequence()) {
        let a = filled(&larger, 2);
        let b = filled(&smaller, 9);
        let allocated = apply2(&a, &b, &Add).unwrap();
        let mut in_place = a.clone();
        apply_into2(&mut in_place, &b, &Add).unwrap();
        prop_assert_eq!(allocated, in_place);
    }
}
