//! Cell-wise dispatcher
//!
//! The public `apply*` surface. Each entry point resolves the common kind of
//! its inputs on the [`NumericKind`] lattice, widens narrower inputs, aligns
//! shapes through [`crate::shape`], and runs the typed kernel for the common
//! kind.
//!
//! - `apply*` functions allocate a new result
//! - `apply_into*` functions overwrite their first tensor argument and hand
//!   the same tensor back; the destination keeps its declared kind, so
//!   results computed in a wider kind are narrowed on write
//!
//! # Examples
//!
//! ```
//! use cellcalc_kernels::cellwise::{apply2, apply2_scalar_right};
//! use cellcalc_kernels::function::{Add, Multiply};
//! use cellcalc_core::{NumericKind, Scalar, Tensor};
//!
//! let trips = Tensor::from_vec(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! let by_destination = Tensor::from_vec(vec![0.5f64, 1.0, 2.0], &[3]).unwrap();
//!
//! let scaled = apply2(&trips, &by_destination, &Multiply).unwrap();
//! assert_eq!(scaled.kind(), NumericKind::Double);
//! assert_eq!(scaled.to_f64_vec(), vec![0.5, 2.0, 6.0, 2.0, 5.0, 12.0]);
//!
//! let shifted = apply2_scalar_right(&trips, Scalar::Int(10), &Add).unwrap();
//! assert_eq!(shifted.get_i64(&[1, 2]), Some(16));
//! ```

use crate::error::{CalcError, CalcResult};
use crate::function::{Mirrored, NumericFunction1, NumericFunction2, NumericFunctionN};
use crate::kernels;
use crate::operand::Operand;
use crate::shape::{resolve_match, ShapeMatch};
use cellcalc_core::types::format_shape;
use cellcalc_core::{match_tensor, Axis, NumericKind, Scalar, Tensor};
use std::borrow::Cow;

// ========== Unary ==========

/// `f` applied to every cell, as a new tensor of the input's kind.
///
/// Integer kinds compute in `i64` and real kinds in `f64`.
pub fn apply1<F>(tensor: &Tensor, f: &F) -> Tensor
where
    F: NumericFunction1 + ?Sized,
{
    match_tensor!(tensor, d => Tensor::from(kernels::map_unary(d, f)))
}

/// `f` applied to every cell of `tensor` in place. Returns `tensor`.
pub fn apply_into1<'t, F>(tensor: &'t mut Tensor, f: &F) -> &'t mut Tensor
where
    F: NumericFunction1 + ?Sized,
{
    match_tensor!(&mut *tensor, d => kernels::map_unary_inplace(d, f));
    tensor
}

// ========== Binary ==========

/// `f(t1, t2)` cell by cell, as a new tensor.
///
/// Equal ranks must have identical shapes or be an unambiguous permutation of
/// each other. Otherwise the lower-rank tensor is broadcast across the free
/// axes of the other (see [`crate::shape::infer_match_and_free`]). Operand
/// order is preserved whichever tensor is larger. The result has the larger
/// tensor's shape and the wider of the two kinds.
///
/// # Errors
///
/// [`CalcError::ShapeMismatch`] if the shapes cannot be aligned.
pub fn apply2<F>(t1: &Tensor, t2: &Tensor, f: &F) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    binary_new("apply2", t1, t2, None, f)
}

/// Like [`apply2`], with the alignment given explicitly.
///
/// `matching[k]` is the axis of the higher-rank tensor aligned with axis `k`
/// of the lower-rank one (`t1` is taken as higher-rank when ranks are equal).
pub fn apply2_matching<F>(
    t1: &Tensor,
    t2: &Tensor,
    matching: &[Axis],
    f: &F,
) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    binary_new("apply2_matching", t1, t2, Some(matching), f)
}

/// `t1 = f(t1, t2)` cell by cell. Returns `t1`.
///
/// `t1` keeps its shape and kind; the computation runs in the common kind and
/// is narrowed back into `t1`.
///
/// # Errors
///
/// [`CalcError::RankGrowthInPlace`] if `t2` has the higher rank, and
/// [`CalcError::ShapeMismatch`] if the shapes cannot be aligned. On error
/// `t1` may be partially written.
pub fn apply_into2<'t, F>(t1: &'t mut Tensor, t2: &Tensor, f: &F) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    binary_into("apply_into2", t1, t2, None, f)
}

/// Like [`apply_into2`], with the alignment of `t2` against `t1` given
/// explicitly.
pub fn apply_into2_matching<'t, F>(
    t1: &'t mut Tensor,
    t2: &Tensor,
    matching: &[Axis],
    f: &F,
) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    binary_into("apply_into2_matching", t1, t2, Some(matching), f)
}

// ========== Scalar broadcast ==========

/// `f(value, tensor)` cell by cell.
///
/// `value` is materialized as a constant tensor of `tensor`'s shape and the
/// call delegates to [`apply2`].
pub fn apply2_scalar_left<F>(value: Scalar, tensor: &Tensor, f: &F) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    let constant = Tensor::full(value, tensor.shape());
    binary_new("apply2_scalar_left", &constant, tensor, None, f)
}

/// `f(tensor, value)` cell by cell.
pub fn apply2_scalar_right<F>(tensor: &Tensor, value: Scalar, f: &F) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    let constant = Tensor::full(value, tensor.shape());
    binary_new("apply2_scalar_right", tensor, &constant, None, f)
}

/// `tensor = f(value, tensor)` cell by cell. Returns `tensor`.
pub fn apply_into2_scalar_left<'t, F>(
    value: Scalar,
    tensor: &'t mut Tensor,
    f: &F,
) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    let constant = Tensor::full(value, tensor.shape());
    binary_into(
        "apply_into2_scalar_left",
        tensor,
        &constant,
        None,
        &Mirrored(f),
    )
}

/// `tensor = f(tensor, value)` cell by cell. Returns `tensor`.
pub fn apply_into2_scalar_right<'t, F>(
    tensor: &'t mut Tensor,
    value: Scalar,
    f: &F,
) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    let constant = Tensor::full(value, tensor.shape());
    binary_into("apply_into2_scalar_right", tensor, &constant, None, f)
}

// ========== N-ary ==========

/// `result = f(params...)` cell by cell. Returns `result`.
///
/// Every parameter must conform to `result`'s shape: equal shape, rank 0
/// (numbers are rank-0 tensors), or alignable by
/// [`crate::shape::resolve_match`]. The common kind is resolved once across
/// all parameters; `result` keeps its declared kind.
///
/// # Errors
///
/// - [`CalcError::ArityMismatch`] if `f` has a fixed arity different from
///   `params.len()`
/// - [`CalcError::InvalidParameterType`] for a non-numeric opaque parameter
/// - [`CalcError::ShapeMismatch`] for a parameter that does not conform
///
/// # Examples
///
/// ```
/// use cellcalc_kernels::cellwise::apply_n;
/// use cellcalc_kernels::function::Sum;
/// use cellcalc_kernels::Operand;
/// use cellcalc_core::{NumericKind, Scalar, Tensor};
///
/// let a = Tensor::from_vec(vec![1i16, 2, 3, 4], &[2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![10i32, 20], &[2]).unwrap();
/// let mut out = Tensor::zeros(NumericKind::Long, &[2, 2]);
///
/// let params = [Operand::from(&a), Operand::from(&b), Operand::Scalar(Scalar::Byte(100))];
/// apply_n(&Sum, &params, &mut out).unwrap();
/// // 3 + 20 + 100, with `b` aligned to axis 0
/// assert_eq!(out.get_i64(&[1, 0]), Some(123));
/// ```
pub fn apply_n<'t, F>(
    f: &F,
    params: &[Operand<'_>],
    result: &'t mut Tensor,
) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunctionN + ?Sized,
{
    const OP: &str = "apply_n";

    if let Some(arity) = f.arity() {
        if arity != params.len() {
            return Err(CalcError::arity_mismatch(OP, arity, params.len()));
        }
    }

    let tensors = params
        .iter()
        .enumerate()
        .map(|(position, p)| p.to_tensor(position))
        .collect::<CalcResult<Vec<_>>>()?;

    let kind = NumericKind::resolve(tensors.iter().map(|t| t.kind()));
    let matches = tensors
        .iter()
        .map(|t| resolve_match(result.shape(), t.shape(), None).map_err(|e| e.in_operation(OP)))
        .collect::<CalcResult<Vec<ShapeMatch>>>()?;
    let widened = tensors
        .iter()
        .map(|t| widen(OP, t, kind))
        .collect::<CalcResult<Vec<_>>>()?;

    log::debug!(
        "{}: {} parameters into {} {}, computing in {}",
        OP,
        params.len(),
        result.kind(),
        format_shape(result.shape()),
        kind
    );

    let mut work = Tensor::zeros(kind, result.shape());
    match_tensor!(&mut work, dst => {
        let mut typed = Vec::with_capacity(widened.len());
        for (param, shape_match) in widened.iter().zip(matches) {
            let dense = param
                .as_dense()
                .ok_or_else(|| kind_not_resolved(OP, kind, param.kind()))?;
            typed.push((dense, shape_match));
        }
        kernels::nary_into(dst, &typed, f);
    });

    *result = work.into_kind(result.kind());
    Ok(result)
}

// ========== Internals ==========

fn binary_new<F>(
    op: &str,
    t1: &Tensor,
    t2: &Tensor,
    matching: Option<&[Axis]>,
    f: &F,
) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    if t2.rank() > t1.rank() {
        log::debug!(
            "{}: swapping operands {} and {} to keep the higher rank first",
            op,
            format_shape(t1.shape()),
            format_shape(t2.shape())
        );
        return broadcast_new(op, t2, t1, matching, &Mirrored(f));
    }
    broadcast_new(op, t1, t2, matching, f)
}

/// `f(larger, smaller)` with `rank(larger) >= rank(smaller)`.
fn broadcast_new<F>(
    op: &str,
    larger: &Tensor,
    smaller: &Tensor,
    matching: Option<&[Axis]>,
    f: &F,
) -> CalcResult<Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    let shape_match =
        resolve_match(larger.shape(), smaller.shape(), matching).map_err(|e| e.in_operation(op))?;
    let kind = larger.kind().common(smaller.kind());

    let mut result = widen(op, larger, kind)?.into_owned();
    let operand = widen(op, smaller, kind)?;
    combine(op, &mut result, &operand, &shape_match, f)?;
    Ok(result)
}

fn binary_into<'t, F>(
    op: &str,
    t1: &'t mut Tensor,
    t2: &Tensor,
    matching: Option<&[Axis]>,
    f: &F,
) -> CalcResult<&'t mut Tensor>
where
    F: NumericFunction2 + ?Sized,
{
    if t2.rank() > t1.rank() {
        return Err(CalcError::rank_growth(op, t1.shape(), t2.shape()));
    }

    let shape_match =
        resolve_match(t1.shape(), t2.shape(), matching).map_err(|e| e.in_operation(op))?;
    let declared = t1.kind();
    let kind = declared.common(t2.kind());
    let operand = widen(op, t2, kind)?;

    if kind == declared {
        combine(op, t1, &operand, &shape_match, f)?;
    } else {
        let mut work = t1.to_kind(kind);
        combine(op, &mut work, &operand, &shape_match, f)?;
        *t1 = work.into_kind(declared);
    }
    Ok(t1)
}

/// `target = f(target, operand)` where both tensors already share a kind.
fn combine<F>(
    op: &str,
    target: &mut Tensor,
    operand: &Tensor,
    shape_match: &ShapeMatch,
    f: &F,
) -> CalcResult<()>
where
    F: NumericFunction2 + ?Sized,
{
    let kind = target.kind();
    match_tensor!(target, dst => {
        let src = operand
            .as_dense()
            .ok_or_else(|| kind_not_resolved(op, kind, operand.kind()))?;
        kernels::binary_into(dst, src, shape_match, f);
        Ok(())
    })
}

/// `tensor` converted to `kind`, borrowing when no conversion is needed.
///
/// Only widening is allowed here; narrowing means the common kind was not
/// resolved over this tensor.
fn widen<'a>(op: &str, tensor: &'a Tensor, kind: NumericKind) -> CalcResult<Cow<'a, Tensor>> {
    if tensor.kind() == kind {
        return Ok(Cow::Borrowed(tensor));
    }
    if !tensor.kind().widens_to(kind) {
        return Err(kind_not_resolved(op, kind, tensor.kind()));
    }
    log::debug!(
        "{}: widening {} {} to {}",
        op,
        tensor.kind(),
        format_shape(tensor.shape()),
        kind
    );
    Ok(Cow::Owned(tensor.to_kind(kind)))
}

fn kind_not_resolved(op: &str, expected: NumericKind, found: NumericKind) -> CalcError {
    CalcError::invalid_state(
        op,
        format!(
            "operand of kind {} does not match resolved kind {}",
            found, expected
        ),
    )
}
