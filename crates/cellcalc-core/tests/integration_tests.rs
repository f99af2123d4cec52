//! Integration tests for cellcalc-core
//!
//! These tests exercise the public storage and tensor API across modules.

use cellcalc_core::dense::increment_index;
use cellcalc_core::{match_tensor, DenseND, Element, NumericKind, Scalar, Tensor};

#[test]
fn test_tensor_from_dense_and_back() {
    let dense = DenseND::from_vec((0..12).map(|x| x as i32).collect(), &[3, 4]).unwrap();
    let tensor = Tensor::from(dense.clone());

    assert_eq!(tensor.kind(), NumericKind::Int);
    assert_eq!(tensor.as_dense::<i32>(), Some(&dense));
    assert!(tensor.as_dense::<i64>().is_none());
}

#[test]
fn test_walk_order_matches_storage_order() {
    let tensor = Tensor::from_vec((0..24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
    let cells = tensor.to_f64_vec();

    let mut index = vec![0usize; 3];
    let mut position = 0usize;
    loop {
        assert_eq!(tensor.get_f64(&index), Some(cells[position]));
        position += 1;
        if !increment_index(&mut index, tensor.shape()) {
            break;
        }
    }
    assert_eq!(position, 24);
}

#[test]
fn test_narrow_destination_truncates() {
    let mut bytes = Tensor::zeros(NumericKind::Byte, &[2]);
    bytes.set_i64(&[0], 200);
    bytes.set_f64(&[1], -3.9);
    assert_eq!(bytes.get_i64(&[0]), Some(200i64 as i8 as i64));
    assert_eq!(bytes.get_i64(&[1]), Some(-3));
}

#[test]
fn test_match_tensor_generic_body() {
    fn max_cell<T: Element>(d: &DenseND<T>) -> f64 {
        d.iter()
            .map(|&v| v.to_double())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    let tensors = [
        Tensor::from_vec(vec![1i8, 9, 3], &[3]).unwrap(),
        Tensor::from_vec(vec![1.5f32, -2.0], &[2]).unwrap(),
        Tensor::full(Scalar::Long(4), &[2, 2]),
    ];
    let maxima: Vec<f64> = tensors
        .iter()
        .map(|t| match_tensor!(t, d => max_cell(d)))
        .collect();
    assert_eq!(maxima, vec![9.0, 1.5, 4.0]);
}
