//! Element access and index walking

use super::types::DenseND;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Get an element by index without panicking
    ///
    /// Returns `None` when the index has the wrong length or any coordinate is
    /// outside `[0, shape[i])`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cellcalc_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
    /// assert_eq!(tensor.get(&[0, 1]), Some(&2));
    /// assert_eq!(tensor.get(&[5, 5]), None);
    /// assert_eq!(tensor.get(&[0]), None);
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }
        for (i, &idx) in index.iter().enumerate() {
            if idx >= self.shape()[i] {
                return None;
            }
        }
        self.data.get(index)
    }

    /// Get a mutable reference to an element by index without panicking
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        if index.len() != self.rank() {
            return None;
        }
        for (i, &idx) in index.iter().enumerate() {
            if idx >= self.shape()[i] {
                return None;
            }
        }
        self.data.get_mut(index)
    }
}

/// Advance `index` to the next cell of `shape` in row-major order.
///
/// Returns `false` once the walk wraps past the last cell (the index is then
/// back at all zeros). A rank-0 shape has a single cell, so the first call
/// already returns `false`.
///
/// # Examples
///
/// ```
/// use cellcalc_core::dense::increment_index;
///
/// let shape = [2, 2];
/// let mut index = vec![0, 0];
/// let mut seen = vec![index.clone()];
/// while increment_index(&mut index, &shape) {
///     seen.push(index.clone());
/// }
/// assert_eq!(seen, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
pub fn increment_index(index: &mut [usize], shape: &[usize]) -> bool {
    debug_assert_eq!(index.len(), shape.len());
    for axis in (0..shape.len()).rev() {
        index[axis] += 1;
        if index[axis] < shape[axis] {
            return true;
        }
        index[axis] = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_index_visits_every_cell() {
        let shape = [2, 3, 4];
        let mut index = vec![0; 3];
        let mut count = 1;
        while increment_index(&mut index, &shape) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(index, vec![0, 0, 0]);
    }

    #[test]
    fn test_increment_index_rank_zero() {
        let mut index: Vec<usize> = Vec::new();
        assert!(!increment_index(&mut index, &[]));
    }

    #[test]
    fn test_get_mut_writes() {
        let mut tensor = DenseND::<i64>::zeros(&[2, 2]);
        if let Some(cell) = tensor.get_mut(&[1, 1]) {
            *cell = 9;
        }
        assert_eq!(tensor.to_vec(), vec![0, 0, 0, 9]);
        assert!(tensor.get_mut(&[2, 0]).is_none());
    }
}
