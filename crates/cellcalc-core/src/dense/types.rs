//! Dense tensor type definition and basic accessors

use scirs2_core::ndarray_ext::{Array, ArrayView, ArrayViewMut, IxDyn};
use crate::types::{Rank, Shape};
use scirs2_core::numeric::Num;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// The container behind every variant of [`Tensor`](crate::Tensor). Cells are
/// addressed by a full multi-dimensional index; a rank-0 tensor holds exactly
/// one cell addressed by the empty index.
///
/// # Type Parameters
///
/// * `T` - The element type, one of `i8`, `i16`, `i32`, `i64`, `f32`, `f64`
///   when used through [`Tensor`](crate::Tensor)
///
/// # Examples
///
/// ```
/// use cellcalc_core::dense::DenseND;
///
/// let tensor = DenseND::<i32>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// ```
#[derive(Clone)]
pub struct DenseND<T> {
    /// Underlying ndarray storage (via scirs2_core)
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Create a tensor from an existing ndarray
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from a vector with given shape
    ///
    /// # Arguments
    ///
    /// * `vec` - Flattened data in row-major order
    /// * `shape` - Target shape
    ///
    /// # Returns
    ///
    /// A tensor with the specified shape, or an error if dimensions don't match
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1i16, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// assert_eq!(tensor[&[1, 0]], 4);
    ///
    /// assert!(DenseND::from_vec(vec![1.0f32, 2.0], &[3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self { data: array })
    }

    /// Get the rank (number of dimensions) of this tensor
    pub fn rank(&self) -> Rank {
        self.data.ndim()
    }

    /// Get the shape of this tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get the total number of cells
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// assert_eq!(DenseND::<i8>::zeros(&[2, 3, 4]).len(), 24);
    /// assert_eq!(DenseND::<i8>::zeros(&[]).len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor has zero cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get an owned copy of the shape.
    ///
    /// ```
    /// use cellcalc_core::{DenseND, Shape};
    ///
    /// let tensor = DenseND::<f32>::zeros(&[4, 5, 2]);
    /// let shape: Shape = tensor.shape_vec();
    /// assert_eq!(shape.as_slice(), &[4, 5, 2]);
    /// assert!(!shape.spilled());
    /// ```
    pub fn shape_vec(&self) -> Shape {
        Shape::from_slice(self.shape())
    }

    /// Get an immutable reference to the underlying ndarray
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Get a mutable reference to the underlying ndarray
    pub fn as_array_mut(&mut self) -> &mut Array<T, IxDyn> {
        &mut self.data
    }

    /// Get an immutable view of the tensor
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Get a mutable view of the tensor
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, IxDyn> {
        self.data.view_mut()
    }

    /// Iterate over cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    /// Mutably iterate over cells in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.data.iter_mut()
    }

    /// Convert the tensor to a flat vector in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }

    /// Apply `f` to every cell, producing a tensor of the same shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::dense::DenseND;
    ///
    /// let bytes = DenseND::from_vec(vec![1i8, -2, 3], &[3]).unwrap();
    /// let longs = bytes.map_cells(|v| v as i64 * 1000);
    /// assert_eq!(longs.to_vec(), vec![1000, -2000, 3000]);
    /// ```
    pub fn map_cells<U, F>(&self, f: F) -> DenseND<U>
    where
        F: FnMut(T) -> U,
    {
        DenseND {
            data: self.data.mapv(f),
        }
    }
}
