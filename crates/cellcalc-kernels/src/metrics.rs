//! Error metrics between two tensors of identical shape
//!
//! Built on [`apply2`](crate::cellwise::apply2) with [`SquaredError`] and a
//! full-reduction sum. Unlike the cell-wise operations, the metrics do not
//! broadcast: both tensors must have exactly the same shape.
//!
//! Inputs are compared in the real domain, so integer tensors of any width
//! produce the same metric as their `f64` counterparts.

use crate::cellwise::apply2;
use crate::error::{CalcError, CalcResult};
use crate::function::SquaredError;
use cellcalc_core::{NumericKind, Tensor};

fn require_same_shape(op: &str, t1: &Tensor, t2: &Tensor) -> CalcResult<()> {
    if t1.shape() != t2.shape() {
        return Err(CalcError::shape_mismatch(
            op,
            t1.shape(),
            t2.shape(),
            "metrics require identical shapes",
        ));
    }
    Ok(())
}

fn mse(op: &str, t1: &Tensor, t2: &Tensor) -> CalcResult<f64> {
    require_same_shape(op, t1, t2)?;
    if t1.is_empty() {
        return Ok(f64::NAN);
    }

    let a = t1.to_kind(NumericKind::Double);
    let b = t2.to_kind(NumericKind::Double);
    let squared = apply2(&a, &b, &SquaredError).map_err(|e| e.in_operation(op))?;
    Ok(squared.sum_f64() / squared.len() as f64)
}

/// Mean of the squared cell differences.
///
/// `NaN` for tensors without cells.
///
/// # Errors
///
/// [`CalcError::ShapeMismatch`] unless the shapes are identical.
///
/// # Examples
///
/// ```
/// use cellcalc_core::Tensor;
/// use cellcalc_kernels::metrics::mean_squared_error;
///
/// let observed = Tensor::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
/// let modelled = Tensor::from_vec(vec![1.0f64, 2.0, 3.0, 6.0], &[2, 2]).unwrap();
/// assert_eq!(mean_squared_error(&observed, &modelled).unwrap(), 1.0);
/// ```
pub fn mean_squared_error(t1: &Tensor, t2: &Tensor) -> CalcResult<f64> {
    mse("mean_squared_error", t1, t2)
}

/// Square root of [`mean_squared_error`].
pub fn root_mean_squared_error(t1: &Tensor, t2: &Tensor) -> CalcResult<f64> {
    Ok(mse("root_mean_squared_error", t1, t2)?.sqrt())
}

/// [`root_mean_squared_error`] divided by the mean of `t1`.
///
/// The ratio is not scaled by 100. A zero mean gives an infinite or `NaN`
/// result, following IEEE 754 division.
pub fn percent_rmse(t1: &Tensor, t2: &Tensor) -> CalcResult<f64> {
    let rmse = mse("percent_rmse", t1, t2)?.sqrt();
    Ok(t1.mean_f64().map_or(f64::NAN, |mean| rmse / mean))
}
