//! Parameters of N-ary cell-wise calls

use crate::error::{CalcError, CalcResult};
use cellcalc_core::{Scalar, Tensor};
use std::any::Any;
use std::borrow::Cow;

/// One parameter of [`apply_n`](crate::cellwise::apply_n).
///
/// `Opaque` carries a value whose type is only known at runtime, such as an
/// entry of a heterogeneous argument list. It is accepted when it holds a
/// [`Tensor`], a [`Scalar`], or one of `i8`, `i16`, `i32`, `i64`, `f32`,
/// `f64`; anything else is rejected with
/// [`CalcError::InvalidParameterType`].
#[derive(Clone, Copy)]
pub enum Operand<'a> {
    /// A tensor parameter
    Tensor(&'a Tensor),
    /// A number broadcast to every cell
    Scalar(Scalar),
    /// A dynamically typed value
    Opaque(&'a dyn Any),
}

impl<'a> Operand<'a> {
    /// Resolve to a tensor; numbers become rank-0 tensors.
    ///
    /// `position` is reported in the error when the value is not numeric.
    pub fn to_tensor(self, position: usize) -> CalcResult<Cow<'a, Tensor>> {
        match self {
            Operand::Tensor(t) => Ok(Cow::Borrowed(t)),
            Operand::Scalar(s) => Ok(Cow::Owned(s.to_tensor())),
            Operand::Opaque(value) => {
                if let Some(t) = value.downcast_ref::<Tensor>() {
                    return Ok(Cow::Borrowed(t));
                }
                opaque_scalar(value).map(|s| Cow::Owned(s.to_tensor())).ok_or_else(|| {
                    CalcError::invalid_parameter(
                        "apply_n",
                        position,
                        "value is neither a tensor nor a primitive number",
                    )
                })
            }
        }
    }
}

fn opaque_scalar(value: &dyn Any) -> Option<Scalar> {
    if let Some(&s) = value.downcast_ref::<Scalar>() {
        return Some(s);
    }
    macro_rules! try_primitive {
        ($($ty:ty),*) => {
            $(
                if let Some(&v) = value.downcast_ref::<$ty>() {
                    return Some(Scalar::from(v));
                }
            )*
        };
    }
    try_primitive!(i8, i16, i32, i64, f32, f64);
    None
}

impl<'a> From<&'a Tensor> for Operand<'a> {
    fn from(tensor: &'a Tensor) -> Self {
        Operand::Tensor(tensor)
    }
}

impl From<Scalar> for Operand<'_> {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

impl std::fmt::Debug for Operand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Tensor(t) => f
                .debug_tuple("Tensor")
                .field(&t.kind())
                .field(&t.shape())
                .finish(),
            Operand::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Operand::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}
