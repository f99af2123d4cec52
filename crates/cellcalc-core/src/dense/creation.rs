//! Tensor creation and initialization methods

use super::types::DenseND;
use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Create a tensor filled with a specific value
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// let tensor = DenseND::from_elem(&[2, 3], 5i64);
    /// assert_eq!(tensor[&[0, 0]], 5);
    /// assert_eq!(tensor[&[1, 2]], 5);
    /// ```
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Create a tensor filled with a specific value.
    ///
    /// Alias for [`DenseND::from_elem`]; this is the constant-tensor factory
    /// used when a bare scalar takes part in a cell-wise operation.
    pub fn full(shape: &[usize], value: T) -> Self {
        Self::from_elem(shape, value)
    }

    /// Create a tensor of zeros
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// let tensor = DenseND::<f32>::zeros(&[2, 3, 4]);
    /// assert_eq!(tensor[&[0, 0, 0]], 0.0);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// Create a tensor of ones
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// Create a rank-0 tensor holding a single value.
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// let s = DenseND::scalar(7i32);
    /// assert_eq!(s.rank(), 0);
    /// assert_eq!(s[&[]], 7);
    /// ```
    pub fn scalar(value: T) -> Self {
        Self::from_elem(&[], value)
    }
}
