//! Shape vocabulary shared by every cellcalc crate.
//!
//! - [`Axis`] - zero-based index of a dimension
//! - [`Rank`] - number of dimensions
//! - [`Shape`] - dimension extents, inline up to six axes
//!
//! # Examples
//!
//! ```
//! use cellcalc_core::{Axis, Rank, Shape};
//!
//! let shape: Shape = Shape::from_slice(&[4, 3, 2]);
//! let rank: Rank = shape.len();
//! let last: Axis = rank - 1;
//! assert_eq!(shape[last], 2);
//! ```

use smallvec::SmallVec;

/// Type alias for tensor axis index.
pub type Axis = usize;

/// Type alias for tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape or axis list using SmallVec to avoid heap allocation.
///
/// Trip tables and zone vectors rarely exceed six axes; longer lists spill to
/// the heap transparently.
pub type Shape = SmallVec<[usize; 6]>;

/// Format a shape the way error messages print it, e.g. `(2, 3, 4)`.
///
/// ```
/// use cellcalc_core::types::format_shape;
///
/// assert_eq!(format_shape(&[2, 3, 4]), "(2, 3, 4)");
/// assert_eq!(format_shape(&[7]), "(7,)");
/// assert_eq!(format_shape(&[]), "()");
/// ```
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [only] => format!("({},)", only),
        _ => {
            let parts: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}
