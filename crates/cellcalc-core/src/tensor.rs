//! Type-erased tensors and scalars.
//!
//! A [`Tensor`] is a [`DenseND`] of one of the six lattice primitives, with the
//! primitive chosen at runtime. Callers of the cell-wise engine hand tensors
//! of mixed kinds to a single entry point; the engine resolves the common
//! kind and dispatches to a generic kernel through [`match_tensor!`].
//!
//! # Examples
//!
//! ```
//! use cellcalc_core::{NumericKind, Scalar, Tensor};
//!
//! let t = Tensor::from_vec(vec![1i8, 2, 3, 4], &[2, 2]).unwrap();
//! assert_eq!(t.kind(), NumericKind::Byte);
//! assert_eq!(t.shape(), &[2, 2]);
//!
//! let wide = t.to_kind(NumericKind::Long);
//! assert_eq!(wide.get_i64(&[1, 1]), Some(4));
//!
//! let c = Tensor::full(Scalar::Double(0.5), &[3]);
//! assert_eq!(c.sum_f64(), 1.5);
//! ```

use crate::dense::DenseND;
use crate::element::{convert, Element};
use crate::kind::NumericKind;
use crate::types::Rank;
use std::fmt;

/// Run `$body` with `$dense` bound to the concrete storage of `$tensor`.
///
/// The body is instantiated once per primitive kind, so it may call generic
/// functions bounded on [`Element`](crate::Element). Works for `&Tensor`,
/// `&mut Tensor` and owned tensors alike.
///
/// ```
/// use cellcalc_core::{match_tensor, Tensor};
///
/// let t = Tensor::from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
/// let n = match_tensor!(&t, d => d.len());
/// assert_eq!(n, 2);
/// ```
#[macro_export]
macro_rules! match_tensor {
    ($tensor:expr, $dense:ident => $body:expr) => {
        match $tensor {
            $crate::Tensor::Byte($dense) => $body,
            $crate::Tensor::Short($dense) => $body,
            $crate::Tensor::Int($dense) => $body,
            $crate::Tensor::Long($dense) => $body,
            $crate::Tensor::Float($dense) => $body,
            $crate::Tensor::Double($dense) => $body,
        }
    };
}

/// A dense tensor whose cell type is one of the six lattice primitives.
#[derive(Clone, Debug, PartialEq)]
pub enum Tensor {
    /// `i8` cells
    Byte(DenseND<i8>),
    /// `i16` cells
    Short(DenseND<i16>),
    /// `i32` cells
    Int(DenseND<i32>),
    /// `i64` cells
    Long(DenseND<i64>),
    /// `f32` cells
    Float(DenseND<f32>),
    /// `f64` cells
    Double(DenseND<f64>),
}

impl Tensor {
    /// Allocate a zero-filled tensor of the given kind and shape.
    ///
    /// This is the allocation half of the tensor factory; the engine never
    /// builds storage any other way.
    #[must_use]
    pub fn zeros(kind: NumericKind, shape: &[usize]) -> Self {
        match kind {
            NumericKind::Byte => Tensor::Byte(DenseND::zeros(shape)),
            NumericKind::Short => Tensor::Short(DenseND::zeros(shape)),
            NumericKind::Int => Tensor::Int(DenseND::zeros(shape)),
            NumericKind::Long => Tensor::Long(DenseND::zeros(shape)),
            NumericKind::Float => Tensor::Float(DenseND::zeros(shape)),
            NumericKind::Double => Tensor::Double(DenseND::zeros(shape)),
        }
    }

    /// Constant tensor: every cell of `shape` holds `value`, and the tensor's
    /// kind is the scalar's kind.
    #[must_use]
    pub fn full(value: Scalar, shape: &[usize]) -> Self {
        match value {
            Scalar::Byte(v) => Tensor::Byte(DenseND::full(shape, v)),
            Scalar::Short(v) => Tensor::Short(DenseND::full(shape, v)),
            Scalar::Int(v) => Tensor::Int(DenseND::full(shape, v)),
            Scalar::Long(v) => Tensor::Long(DenseND::full(shape, v)),
            Scalar::Float(v) => Tensor::Float(DenseND::full(shape, v)),
            Scalar::Double(v) => Tensor::Double(DenseND::full(shape, v)),
        }
    }

    /// Build a tensor from row-major cells.
    pub fn from_vec<T: Element>(cells: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        Ok(T::into_tensor(DenseND::from_vec(cells, shape)?))
    }

    /// The primitive kind of the cells.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        match self {
            Tensor::Byte(_) => NumericKind::Byte,
            Tensor::Short(_) => NumericKind::Short,
            Tensor::Int(_) => NumericKind::Int,
            Tensor::Long(_) => NumericKind::Long,
            Tensor::Float(_) => NumericKind::Float,
            Tensor::Double(_) => NumericKind::Double,
        }
    }

    /// Dimension extents.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match_tensor!(self, d => d.shape())
    }

    /// Number of dimensions; `0` for a scalar tensor.
    #[must_use]
    pub fn rank(&self) -> Rank {
        match_tensor!(self, d => d.rank())
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match_tensor!(self, d => d.len())
    }

    /// `true` if some extent is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match_tensor!(self, d => d.is_empty())
    }

    /// Borrow the storage if the cells are of type `T`.
    #[must_use]
    pub fn as_dense<T: Element>(&self) -> Option<&DenseND<T>> {
        T::dense(self)
    }

    /// Mutably borrow the storage if the cells are of type `T`.
    pub fn as_dense_mut<T: Element>(&mut self) -> Option<&mut DenseND<T>> {
        T::dense_mut(self)
    }

    /// Read a cell in the 64-bit real domain.
    #[must_use]
    pub fn get_f64(&self, index: &[usize]) -> Option<f64> {
        match_tensor!(self, d => d.get(index).map(|v| v.to_double()))
    }

    /// Read a cell in the 64-bit integer domain (reals truncate).
    #[must_use]
    pub fn get_i64(&self, index: &[usize]) -> Option<i64> {
        match_tensor!(self, d => d.get(index).map(|v| v.to_long()))
    }

    /// Read a cell as a [`Scalar`] of the tensor's own kind.
    #[must_use]
    pub fn get_scalar(&self, index: &[usize]) -> Option<Scalar> {
        match_tensor!(self, d => d.get(index).map(|v| v.into_scalar()))
    }

    /// Write a real value into a cell, narrowing to the tensor's kind.
    ///
    /// Returns `false` if the index is out of bounds.
    pub fn set_f64(&mut self, index: &[usize], value: f64) -> bool {
        match_tensor!(self, d => match d.get_mut(index) {
            Some(cell) => {
                *cell = Element::from_double(value);
                true
            }
            None => false,
        })
    }

    /// Write an integer value into a cell, narrowing to the tensor's kind.
    ///
    /// Returns `false` if the index is out of bounds.
    pub fn set_i64(&mut self, index: &[usize], value: i64) -> bool {
        match_tensor!(self, d => match d.get_mut(index) {
            Some(cell) => {
                *cell = Element::from_long(value);
                true
            }
            None => false,
        })
    }

    /// Copy of the cells converted to primitive `T`.
    #[must_use]
    pub fn cast<T: Element>(&self) -> DenseND<T> {
        match_tensor!(self, d => d.map_cells(convert))
    }

    /// Copy of this tensor converted to `kind`.
    ///
    /// Widening conversions are lossless for integer chains and float to
    /// double. Narrowing follows `as` semantics; callers that must only widen
    /// check [`NumericKind::widens_to`] first.
    #[must_use]
    pub fn to_kind(&self, kind: NumericKind) -> Tensor {
        match kind {
            NumericKind::Byte => Tensor::Byte(self.cast()),
            NumericKind::Short => Tensor::Short(self.cast()),
            NumericKind::Int => Tensor::Int(self.cast()),
            NumericKind::Long => Tensor::Long(self.cast()),
            NumericKind::Float => Tensor::Float(self.cast()),
            NumericKind::Double => Tensor::Double(self.cast()),
        }
    }

    /// Like [`Tensor::to_kind`] but reuses `self` when the kind already matches.
    #[must_use]
    pub fn into_kind(self, kind: NumericKind) -> Tensor {
        if self.kind() == kind {
            self
        } else {
            self.to_kind(kind)
        }
    }

    /// Cells as `f64` in row-major order.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match_tensor!(self, d => d.iter().map(|v| v.to_double()).collect())
    }

    /// Sum of all cells in the real domain.
    #[must_use]
    pub fn sum_f64(&self) -> f64 {
        match_tensor!(self, d => d.iter().map(|v| v.to_double()).sum())
    }

    /// Sum of all cells in the integer domain, wrapping on overflow.
    #[must_use]
    pub fn sum_i64(&self) -> i64 {
        match_tensor!(self, d => d.iter().fold(0i64, |acc, v| acc.wrapping_add(v.to_long())))
    }

    /// Mean of all cells, or `None` for a tensor without cells.
    #[must_use]
    pub fn mean_f64(&self) -> Option<f64> {
        let n = self.len();
        if n == 0 {
            None
        } else {
            Some(self.sum_f64() / n as f64)
        }
    }
}

impl<T: Element> From<DenseND<T>> for Tensor {
    fn from(dense: DenseND<T>) -> Self {
        T::into_tensor(dense)
    }
}

/// The common working kind of a set of tensors: the highest-precedence kind
/// present, or `Double` when the set is empty.
///
/// ```
/// use cellcalc_core::{resolve_common_kind, NumericKind, Tensor};
///
/// let a = Tensor::zeros(NumericKind::Byte, &[2]);
/// let b = Tensor::zeros(NumericKind::Short, &[2]);
/// assert_eq!(resolve_common_kind(&[&a, &b]), NumericKind::Short);
/// ```
#[must_use]
pub fn resolve_common_kind(tensors: &[&Tensor]) -> NumericKind {
    NumericKind::resolve(tensors.iter().map(|t| t.kind()))
}

/// A single value of one of the six lattice primitives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// `i8` value
    Byte(i8),
    /// `i16` value
    Short(i16),
    /// `i32` value
    Int(i32),
    /// `i64` value
    Long(i64),
    /// `f32` value
    Float(f32),
    /// `f64` value
    Double(f64),
}

impl Scalar {
    /// The primitive kind of the value.
    #[must_use]
    pub fn kind(self) -> NumericKind {
        match self {
            Scalar::Byte(_) => NumericKind::Byte,
            Scalar::Short(_) => NumericKind::Short,
            Scalar::Int(_) => NumericKind::Int,
            Scalar::Long(_) => NumericKind::Long,
            Scalar::Float(_) => NumericKind::Float,
            Scalar::Double(_) => NumericKind::Double,
        }
    }

    /// Value in the 64-bit real domain.
    #[must_use]
    pub fn to_double(self) -> f64 {
        match self {
            Scalar::Byte(v) => v.to_double(),
            Scalar::Short(v) => v.to_double(),
            Scalar::Int(v) => v.to_double(),
            Scalar::Long(v) => v.to_double(),
            Scalar::Float(v) => v.to_double(),
            Scalar::Double(v) => v,
        }
    }

    /// Value in the 64-bit integer domain (reals truncate).
    #[must_use]
    pub fn to_long(self) -> i64 {
        match self {
            Scalar::Byte(v) => v.to_long(),
            Scalar::Short(v) => v.to_long(),
            Scalar::Int(v) => v.to_long(),
            Scalar::Long(v) => v,
            Scalar::Float(v) => v.to_long(),
            Scalar::Double(v) => v.to_long(),
        }
    }

    /// A rank-0 tensor holding this value.
    #[must_use]
    pub fn to_tensor(self) -> Tensor {
        Tensor::full(self, &[])
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    value.into_scalar()
                }
            }
        )*
    };
}

scalar_from!(i8, i16, i32, i64, f32, f64);

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Byte(v) => write!(f, "{}", v),
            Scalar::Short(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Long(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_every_kind() {
        for kind in crate::kind::LATTICE {
            let t = Tensor::zeros(kind, &[2, 3]);
            assert_eq!(t.kind(), kind);
            assert_eq!(t.shape(), &[2, 3]);
            assert_eq!(t.len(), 6);
            assert_eq!(t.sum_f64(), 0.0);
        }
    }

    #[test]
    fn test_full_takes_scalar_kind() {
        let t = Tensor::full(Scalar::Short(-3), &[4]);
        assert_eq!(t.kind(), NumericKind::Short);
        assert_eq!(t.sum_i64(), -12);
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut t = Tensor::zeros(NumericKind::Int, &[2, 2]);
        assert!(t.set_f64(&[0, 1], 7.9));
        assert!(t.set_i64(&[1, 0], -4));
        assert!(!t.set_i64(&[2, 0], 1));
        assert_eq!(t.get_i64(&[0, 1]), Some(7));
        assert_eq!(t.get_f64(&[1, 0]), Some(-4.0));
        assert_eq!(t.get_scalar(&[1, 0]), Some(Scalar::Int(-4)));
        assert_eq!(t.get_f64(&[9, 9]), None);
    }

    #[test]
    fn test_to_kind_widens_values() {
        let t = Tensor::from_vec(vec![-128i8, 0, 127], &[3]).unwrap();
        let long = t.to_kind(NumericKind::Long);
        assert_eq!(long.as_dense::<i64>().unwrap().to_vec(), vec![-128, 0, 127]);
        let double = t.to_kind(NumericKind::Double);
        assert_eq!(double.to_f64_vec(), vec![-128.0, 0.0, 127.0]);
    }

    #[test]
    fn test_into_kind_same_kind_is_identity() {
        let t = Tensor::from_vec(vec![1.5f32, 2.5], &[2]).unwrap();
        let same = t.clone().into_kind(NumericKind::Float);
        assert_eq!(same, t);
    }

    #[test]
    fn test_mean() {
        let t = Tensor::from_vec(vec![1i32, 2, 3, 6], &[2, 2]).unwrap();
        assert_eq!(t.mean_f64(), Some(3.0));
        let empty = Tensor::zeros(NumericKind::Double, &[0]);
        assert_eq!(empty.mean_f64(), None);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::from(2.5f32).kind(), NumericKind::Float);
        assert_eq!(Scalar::from(9i64).to_double(), 9.0);
        assert_eq!(Scalar::Double(-2.7).to_long(), -2);
        let t = Scalar::Int(5).to_tensor();
        assert_eq!(t.rank(), 0);
        assert_eq!(t.get_i64(&[]), Some(5));
    }

    #[test]
    fn test_resolve_common_kind() {
        let a = Tensor::zeros(NumericKind::Long, &[1]);
        let b = Tensor::zeros(NumericKind::Float, &[1]);
        let c = Tensor::zeros(NumericKind::Byte, &[1]);
        assert_eq!(resolve_common_kind(&[&a, &b, &c]), NumericKind::Float);
        assert_eq!(resolve_common_kind(&[]), NumericKind::Double);
    }
}
