//! Typed cell-wise kernels
//!
//! One generic body per operation, instantiated for each primitive through
//! [`match_tensor!`](cellcalc_core::match_tensor). Integer primitives compute
//! in `i64` and real primitives in `f64`; the result is narrowed back to the
//! storage type on write.
//!
//! Kernels assume their operands already share a kind and that shapes have
//! been matched; the dispatcher in [`crate::cellwise`] establishes both.

use crate::function::{NumericFunction1, NumericFunction2, NumericFunctionN};
use crate::shape::ShapeMatch;
use cellcalc_core::dense::increment_index;
use cellcalc_core::{DenseND, Element, Shape};
use scirs2_core::ndarray_ext::Zip;

/// Evaluate a unary function in the compute domain of `T`.
#[inline]
pub fn eval1<T, F>(f: &F, value: T) -> T
where
    T: Element,
    F: NumericFunction1 + ?Sized,
{
    if T::KIND.is_integral() {
        T::from_long(f.apply_long(value.to_long()))
    } else {
        T::from_double(f.apply_double(value.to_double()))
    }
}

/// Evaluate a binary function in the compute domain of `T`.
#[inline]
pub fn eval2<T, F>(f: &F, a: T, b: T) -> T
where
    T: Element,
    F: NumericFunction2 + ?Sized,
{
    if T::KIND.is_integral() {
        T::from_long(f.apply_long(a.to_long(), b.to_long()))
    } else {
        T::from_double(f.apply_double(a.to_double(), b.to_double()))
    }
}

/// `f` applied to every cell, as a new tensor of the same primitive.
pub fn map_unary<T, F>(input: &DenseND<T>, f: &F) -> DenseND<T>
where
    T: Element,
    F: NumericFunction1 + ?Sized,
{
    input.map_cells(|v| eval1(f, v))
}

/// `f` applied to every cell in place.
pub fn map_unary_inplace<T, F>(target: &mut DenseND<T>, f: &F)
where
    T: Element,
    F: NumericFunction1 + ?Sized,
{
    target.as_array_mut().mapv_inplace(|v| eval1(f, v));
}

/// `target[c] = f(target[c], operand[project(c)])` for every cell `c` of
/// `target`.
///
/// `target` has the larger shape; `operand` is aligned to it by
/// `shape_match`. Identical shapes take a lock-step pass over both arrays;
/// everything else walks `target` in row-major order and reads the projected
/// cell of `operand`.
pub fn binary_into<T, F>(
    target: &mut DenseND<T>,
    operand: &DenseND<T>,
    shape_match: &ShapeMatch,
    f: &F,
) where
    T: Element,
    F: NumericFunction2 + ?Sized,
{
    debug_assert_eq!(shape_match.larger_rank(), target.rank());
    debug_assert_eq!(shape_match.smaller_rank(), operand.rank());

    if shape_match.is_identity() && target.shape() == operand.shape() {
        let operand_view = operand.view();
        Zip::from(target.view_mut())
            .and(&operand_view)
            .for_each(|t, &o| *t = eval2(f, *t, o));
        return;
    }

    if target.is_empty() {
        return;
    }

    let shape = target.shape_vec();
    let mut index = Shape::from_elem(0, shape.len());
    let mut projected = Shape::from_elem(0, shape_match.smaller_rank());
    loop {
        shape_match.project(&index, &mut projected);
        let b = operand[projected.as_slice()];
        let cell = &mut target[index.as_slice()];
        *cell = eval2(f, *cell, b);

        if !increment_index(&mut index, &shape) {
            break;
        }
    }
}

/// `target[c] = f(params[0][p0(c)], params[1][p1(c)], ...)` for every cell
/// `c` of `target`.
///
/// Each parameter comes with its alignment against `target`'s shape. Cells
/// are gathered into a reusable buffer in the compute domain of `T`.
pub fn nary_into<T, F>(target: &mut DenseND<T>, params: &[(&DenseND<T>, ShapeMatch)], f: &F)
where
    T: Element,
    F: NumericFunctionN + ?Sized,
{
    if target.is_empty() {
        return;
    }

    let shape = target.shape_vec();
    let mut index = Shape::from_elem(0, shape.len());
    let mut projected: Vec<Shape> = params
        .iter()
        .map(|(_, m)| Shape::from_elem(0, m.smaller_rank()))
        .collect();
    let mut longs = vec![0i64; params.len()];
    let mut doubles = vec![0f64; params.len()];

    loop {
        for (i, (param, shape_match)) in params.iter().enumerate() {
            shape_match.project(&index, &mut projected[i]);
            let value = param[projected[i].as_slice()];
            if T::KIND.is_integral() {
                longs[i] = value.to_long();
            } else {
                doubles[i] = value.to_double();
            }
        }

        target[index.as_slice()] = if T::KIND.is_integral() {
            T::from_long(f.apply_long(&longs))
        } else {
            T::from_double(f.apply_double(&doubles))
        };

        if !increment_index(&mut index, &shape) {
            break;
        }
    }
}
