//! Shape matching between tensors of possibly different rank
//!
//! Broadcasting here is richer than trailing-dimension broadcasting: the
//! axes of the smaller tensor may align with any in-order subset of the
//! larger tensor's axes. A by-destination vector of extent 5 can be combined
//! with axis 1 of a `(5, 5, 3)` trip table without transposing first.
//!
//! A [`ShapeMatch`] records, for a larger tensor `A` and a smaller tensor `B`:
//!
//! - `matching`: for each axis `k` of `B`, the axis of `A` it aligns with
//! - `free`: the axes of `A` with no counterpart in `B`
//!
//! Every cell of `A` reads the cell of `B` found by projecting its
//! coordinates onto the matching axes ([`ShapeMatch::project`]).
//!
//! # Examples
//!
//! ```
//! use cellcalc_kernels::shape::{infer_match_and_free, validate_explicit_match};
//!
//! // Greedy left-to-right inference
//! let m = infer_match_and_free(&[4, 3, 5], &[3, 5]).unwrap();
//! assert_eq!(m.matching, vec![1, 2]);
//! assert_eq!(m.free, vec![0]);
//!
//! // The caller picks the axis when extents repeat
//! let m = validate_explicit_match(&[5, 5, 3], &[5], &[1]).unwrap();
//! assert_eq!(m.free, vec![0, 2]);
//! ```

use crate::error::{CalcError, CalcResult};
use cellcalc_core::types::format_shape;
use cellcalc_core::{Axis, Rank};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Alignment of a smaller tensor's axes against a larger tensor's axes.
///
/// Invariants: `matching.len()` equals the smaller tensor's rank; `matching`
/// and `free` are disjoint and together cover every axis of the larger
/// tensor; each matched pair of axes has equal extent. `matching` is strictly
/// increasing when inferred, and may be any order when given explicitly or
/// found by [`check_exact_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeMatch {
    /// Axis of the larger tensor aligned with each axis of the smaller one
    pub matching: Vec<Axis>,
    /// Axes of the larger tensor the smaller tensor is replicated across
    pub free: Vec<Axis>,
}

impl ShapeMatch {
    /// Every axis matches itself: the shapes are identical.
    pub fn identity(rank: usize) -> Self {
        Self {
            matching: (0..rank).collect(),
            free: Vec::new(),
        }
    }

    /// `true` if cell `i` of the larger tensor pairs with cell `i` of the smaller.
    pub fn is_identity(&self) -> bool {
        self.free.is_empty() && self.matching.iter().enumerate().all(|(k, &axis)| k == axis)
    }

    /// Rank of the smaller tensor.
    pub fn smaller_rank(&self) -> Rank {
        self.matching.len()
    }

    /// Rank of the larger tensor.
    pub fn larger_rank(&self) -> Rank {
        self.matching.len() + self.free.len()
    }

    /// Project a coordinate of the larger tensor onto the smaller tensor.
    ///
    /// `out` must have length [`ShapeMatch::smaller_rank`]; free axes of
    /// `coords` are ignored.
    ///
    /// ```
    /// use cellcalc_kernels::shape::ShapeMatch;
    ///
    /// let m = ShapeMatch { matching: vec![0, 2], free: vec![1] };
    /// let mut out = [0; 2];
    /// m.project(&[4, 9, 7], &mut out);
    /// assert_eq!(out, [4, 7]);
    /// ```
    pub fn project(&self, coords: &[usize], out: &mut [usize]) {
        debug_assert_eq!(out.len(), self.matching.len());
        for (slot, &axis) in out.iter_mut().zip(&self.matching) {
            *slot = coords[axis];
        }
    }
}

/// Find the axis permutation relating two shapes of equal rank.
///
/// Returns `Ok(None)` when the shapes are already identical, and
/// `Ok(Some(remap))` when axis `i` of `shape2` corresponds to axis
/// `remap[i]` of `shape1`. Every extent of `shape2` must occur on exactly one
/// axis of `shape1`; repeated extents make the permutation ambiguous and are
/// rejected.
///
/// # Errors
///
/// [`CalcError::ShapeMismatch`] if the ranks differ, an axis has no
/// counterpart, or the mapping is not unique.
///
/// # Examples
///
/// ```
/// use cellcalc_kernels::shape::check_exact_match;
///
/// assert_eq!(check_exact_match(&[2, 3], &[2, 3]).unwrap(), None);
/// assert_eq!(check_exact_match(&[2, 3, 4], &[4, 2, 3]).unwrap(), Some(vec![2, 0, 1]));
/// assert!(check_exact_match(&[3, 3], &[3, 3, 1]).is_err());
/// assert!(check_exact_match(&[3, 3, 4], &[4, 3, 3]).is_err());
/// ```
pub fn check_exact_match(shape1: &[usize], shape2: &[usize]) -> CalcResult<Option<Vec<Axis>>> {
    const OP: &str = "check_exact_match";

    if shape1.len() != shape2.len() {
        return Err(CalcError::shape_mismatch(
            OP,
            shape1,
            shape2,
            format!("ranks differ ({} vs {})", shape1.len(), shape2.len()),
        ));
    }
    if shape1 == shape2 {
        return Ok(None);
    }

    let mut remap = Vec::with_capacity(shape2.len());
    let mut used = vec![false; shape1.len()];
    for (axis2, &extent) in shape2.iter().enumerate() {
        let mut candidates = shape1
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e == extent)
            .map(|(axis1, _)| axis1);

        let axis1 = match (candidates.next(), candidates.next()) {
            (Some(axis1), None) => axis1,
            (None, _) => {
                return Err(CalcError::shape_mismatch(
                    OP,
                    shape1,
                    shape2,
                    format!("axis {} (extent {}) has no counterpart", axis2, extent),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(CalcError::shape_mismatch(
                    OP,
                    shape1,
                    shape2,
                    format!("non-unambiguous shape: extent {} occurs on several axes", extent),
                ))
            }
        };

        if used[axis1] {
            return Err(CalcError::shape_mismatch(
                OP,
                shape1,
                shape2,
                format!("non-unambiguous shape: axis {} is matched twice", axis1),
            ));
        }
        used[axis1] = true;
        remap.push(axis1);
    }

    Ok(Some(remap))
}

/// Greedily align the axes of `smaller` with the axes of `larger`.
///
/// Walks `larger` left to right, consuming the next unconsumed axis of
/// `smaller` whenever the extents are equal. Unconsumed axes of `larger` are
/// free. A rank-0 `smaller` matches nothing and every axis is free.
///
/// # Errors
///
/// [`CalcError::ShapeMismatch`] if some axis of `smaller` is left unconsumed.
pub fn infer_match_and_free(larger: &[usize], smaller: &[usize]) -> CalcResult<ShapeMatch> {
    let mut matching = Vec::with_capacity(smaller.len());
    let mut free = Vec::with_capacity(larger.len().saturating_sub(smaller.len()));

    let mut next = 0;
    for (axis, &extent) in larger.iter().enumerate() {
        if next < smaller.len() && smaller[next] == extent {
            matching.push(axis);
            next += 1;
        } else {
            free.push(axis);
        }
    }

    if next < smaller.len() {
        let reason = if smaller.len() > larger.len() {
            "shape does not map element-by-element: second tensor has the higher rank".to_string()
        } else if larger.contains(&smaller[next]) {
            format!(
                "shape does not map element-by-element: axis {} (extent {}) has no counterpart in order",
                next, smaller[next]
            )
        } else {
            format!(
                "shape does not map element-by-element: no axis of the larger tensor has extent {}",
                smaller[next]
            )
        };
        return Err(CalcError::shape_mismatch(
            "infer_match_and_free",
            larger,
            smaller,
            reason,
        ));
    }

    Ok(ShapeMatch { matching, free })
}

/// Validate a caller-supplied list of matching axes.
///
/// `matching[k]` names the axis of `larger` aligned with axis `k` of
/// `smaller`. The list must have one entry per axis of `smaller`, name only
/// in-bounds axes, name no axis twice, and pair equal extents. The remaining
/// axes of `larger` become free.
///
/// # Errors
///
/// [`CalcError::ShapeMismatch`] on any violation.
pub fn validate_explicit_match(
    larger: &[usize],
    smaller: &[usize],
    matching: &[Axis],
) -> CalcResult<ShapeMatch> {
    const OP: &str = "validate_explicit_match";

    if matching.len() != smaller.len() {
        return Err(CalcError::shape_mismatch(
            OP,
            larger,
            smaller,
            format!(
                "{} matching axes given for a tensor of rank {}",
                matching.len(),
                smaller.len()
            ),
        ));
    }

    let mut used = vec![false; larger.len()];
    for (k, &axis) in matching.iter().enumerate() {
        if axis >= larger.len() {
            return Err(CalcError::shape_mismatch(
                OP,
                larger,
                smaller,
                format!("matching axis {} is out of bounds for rank {}", axis, larger.len()),
            ));
        }
        if used[axis] {
            return Err(CalcError::shape_mismatch(
                OP,
                larger,
                smaller,
                format!("matching axis {} is repeated", axis),
            ));
        }
        if larger[axis] != smaller[k] {
            return Err(CalcError::shape_mismatch(
                OP,
                larger,
                smaller,
                format!(
                    "axis {} (extent {}) cannot match axis {} (extent {})",
                    axis, larger[axis], k, smaller[k]
                ),
            ));
        }
        used[axis] = true;
    }

    let free = used
        .iter()
        .enumerate()
        .filter(|&(_, &u)| !u)
        .map(|(axis, _)| axis)
        .collect();

    Ok(ShapeMatch {
        matching: matching.to_vec(),
        free,
    })
}

/// Resolve how `smaller` aligns against `larger`.
///
/// - explicit axes given: [`validate_explicit_match`]
/// - identical shapes: [`ShapeMatch::identity`]
/// - equal rank: the permutation from [`check_exact_match`]
/// - otherwise: [`infer_match_and_free`]
pub fn resolve_match(
    larger: &[usize],
    smaller: &[usize],
    explicit: Option<&[Axis]>,
) -> CalcResult<ShapeMatch> {
    let shape_match = match explicit {
        Some(axes) => validate_explicit_match(larger, smaller, axes)?,
        None if larger == smaller => ShapeMatch::identity(larger.len()),
        None if larger.len() == smaller.len() => match check_exact_match(larger, smaller)? {
            Some(remap) => ShapeMatch {
                matching: remap,
                free: Vec::new(),
            },
            None => ShapeMatch::identity(larger.len()),
        },
        None => infer_match_and_free(larger, smaller)?,
    };

    log::trace!(
        "matched {} against {}: matching {:?}, free {:?}",
        format_shape(smaller),
        format_shape(larger),
        shape_match.matching,
        shape_match.free
    );

    Ok(shape_match)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_vector_against_matrix() {
        let m = infer_match_and_free(&[2, 3], &[3]).unwrap();
        assert_eq!(m.matching, vec![1]);
        assert_eq!(m.free, vec![0]);
        assert_eq!(m.larger_rank(), 2);
        assert_eq!(m.smaller_rank(), 1);
    }

    #[test]
    fn test_infer_is_greedy_left_to_right() {
        // Both axes have extent 5; the first one wins.
        let m = infer_match_and_free(&[5, 5, 3], &[5]).unwrap();
        assert_eq!(m.matching, vec![0]);
        assert_eq!(m.free, vec![1, 2]);
    }

    #[test]
    fn test_infer_scalar_matches_nothing() {
        let m = infer_match_and_free(&[2, 2], &[]).unwrap();
        assert!(m.matching.is_empty());
        assert_eq!(m.free, vec![0, 1]);
    }

    #[test]
    fn test_infer_unconsumed_axis_fails() {
        let err = infer_match_and_free(&[2, 3], &[4]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(2, 3)"));
        assert!(msg.contains("(4,)"));
        assert!(msg.contains("extent 4"));

        // Extents exist but not in order
        assert!(infer_match_and_free(&[2, 3], &[3, 2]).is_err());
    }

    #[test]
    fn test_explicit_match_valid() {
        let m = validate_explicit_match(&[4, 3, 4], &[4, 3], &[2, 1]).unwrap();
        assert_eq!(m.matching, vec![2, 1]);
        assert_eq!(m.free, vec![0]);
    }

    #[test]
    fn test_explicit_match_violations() {
        // wrong length
        assert!(validate_explicit_match(&[4, 3], &[3], &[0, 1]).is_err());
        // out of bounds
        assert!(validate_explicit_match(&[4, 3], &[3], &[2]).is_err());
        // duplicate
        assert!(validate_explicit_match(&[3, 3], &[3, 3], &[0, 0]).is_err());
        // extent mismatch
        assert!(validate_explicit_match(&[4, 3], &[3], &[0]).is_err());
    }

    #[test]
    fn test_exact_match_permutation() {
        let remap = check_exact_match(&[2, 3, 4], &[3, 4, 2]).unwrap();
        assert_eq!(remap, Some(vec![1, 2, 0]));
    }

    #[test]
    fn test_exact_match_ambiguous_extents() {
        let err = check_exact_match(&[3, 3, 4], &[4, 3, 3]).unwrap_err();
        assert!(err.to_string().contains("non-unambiguous"));
    }

    #[test]
    fn test_exact_match_missing_extent() {
        let err = check_exact_match(&[2, 3], &[2, 5]).unwrap_err();
        assert!(err.to_string().contains("no counterpart"));
    }

    #[test]
    fn test_resolve_match_paths() {
        assert!(resolve_match(&[2, 3], &[2, 3], None).unwrap().is_identity());
        assert_eq!(
            resolve_match(&[2, 3], &[3, 2], None).unwrap().matching,
            vec![1, 0]
        );
        assert_eq!(resolve_match(&[2, 3], &[3], Some(&[1])).unwrap().free, vec![0]);
        assert_eq!(resolve_match(&[2, 3, 4], &[2, 4], None).unwrap().free, vec![1]);
    }

    #[test]
    fn test_project() {
        let m = infer_match_and_free(&[2, 3, 4], &[2, 4]).unwrap();
        let mut out = [0usize; 2];
        m.project(&[1, 2, 3], &mut out);
        assert_eq!(out, [1, 3]);
    }
}
