//! Primitive cell types.
//!
//! [`Element`] is implemented for exactly the six primitives of the
//! [`NumericKind`] lattice and is sealed. It ties a primitive to its kind, to
//! the 64-bit compute domains used by kernels, and to its variant of the
//! type-erased [`Tensor`].

use crate::dense::DenseND;
use crate::kind::NumericKind;
use crate::tensor::{Scalar, Tensor};
use scirs2_core::numeric::{Num, NumCast};
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A primitive numeric type that can be stored in a tensor cell.
pub trait Element:
    Copy + Num + NumCast + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static + sealed::Sealed
{
    /// The lattice position of this type.
    const KIND: NumericKind;

    /// Value in the 64-bit integer domain (reals truncate towards zero).
    fn to_long(self) -> i64;

    /// Value in the 64-bit real domain.
    fn to_double(self) -> f64;

    /// Narrow a 64-bit integer into this type with `as` semantics.
    fn from_long(value: i64) -> Self;

    /// Convert a 64-bit real into this type with `as` semantics
    /// (saturating for integer targets, NaN maps to zero).
    fn from_double(value: f64) -> Self;

    /// Wrap a dense tensor of this type into the type-erased [`Tensor`].
    fn into_tensor(dense: DenseND<Self>) -> Tensor;

    /// Borrow the dense storage if `tensor` holds this type.
    fn dense(tensor: &Tensor) -> Option<&DenseND<Self>>;

    /// Mutably borrow the dense storage if `tensor` holds this type.
    fn dense_mut(tensor: &mut Tensor) -> Option<&mut DenseND<Self>>;

    /// Wrap a single value into a [`Scalar`].
    fn into_scalar(self) -> Scalar;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const KIND: NumericKind = NumericKind::$variant;

            #[inline]
            fn to_long(self) -> i64 {
                self as i64
            }

            #[inline]
            fn to_double(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_long(value: i64) -> Self {
                value as $ty
            }

            #[inline]
            fn from_double(value: f64) -> Self {
                value as $ty
            }

            fn into_tensor(dense: DenseND<Self>) -> Tensor {
                Tensor::$variant(dense)
            }

            fn dense(tensor: &Tensor) -> Option<&DenseND<Self>> {
                match tensor {
                    Tensor::$variant(d) => Some(d),
                    _ => None,
                }
            }

            fn dense_mut(tensor: &mut Tensor) -> Option<&mut DenseND<Self>> {
                match tensor {
                    Tensor::$variant(d) => Some(d),
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }
        }
    };
}

impl_element!(i8, Byte);
impl_element!(i16, Short);
impl_element!(i32, Int);
impl_element!(i64, Long);
impl_element!(f32, Float);
impl_element!(f64, Double);

/// Convert one cell between primitive types.
///
/// Integer to integer goes through `i64` and is exact when widening; every
/// other pair goes through `f64`.
///
/// ```
/// use cellcalc_core::element::convert;
///
/// let wide: i64 = convert(-7i8);
/// assert_eq!(wide, -7);
/// let real: f64 = convert(3i32);
/// assert_eq!(real, 3.0);
/// let truncated: i32 = convert(2.9f64);
/// assert_eq!(truncated, 2);
/// ```
#[inline]
pub fn convert<S: Element, T: Element>(value: S) -> T {
    if S::KIND.is_integral() && T::KIND.is_integral() {
        T::from_long(value.to_long())
    } else {
        T::from_double(value.to_double())
    }
}
