//! # cellcalc-kernels
//!
//! Cell-wise application of numeric functions across tensors of mixed
//! primitive kinds and mixed ranks.
//!
//! **Key Features:**
//! - **Kind promotion** - inputs widen to the highest kind on the
//!   `byte < short < int < long < float < double` lattice
//! - **Subset broadcasting** - a lower-rank tensor aligns with any in-order
//!   subset of the higher-rank tensor's axes, not only a suffix
//! - **Allocate or overwrite** - every operation comes as `apply*` (new
//!   result) and `apply_into*` (mutates and returns the destination)
//! - **Unary, binary, scalar and N-ary** application
//! - **Error metrics** - MSE, RMSE and relative RMSE
//!
//! ## Quick Start
//!
//! ```rust
//! use cellcalc_core::{NumericKind, Scalar, Tensor};
//! use cellcalc_kernels::{apply2, apply2_scalar_right, apply_into2, Add, Multiply};
//!
//! // [[1, 2], [3, 4]] + 10
//! let a = Tensor::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
//! let b = apply2_scalar_right(&a, Scalar::Int(10), &Add).unwrap();
//! assert_eq!(b.as_dense::<i32>().unwrap().to_vec(), vec![11, 12, 13, 14]);
//!
//! // Matrix times a per-row factor (axis 0 matches first); bytes widen to int
//! let factor = Tensor::from_vec(vec![2i8, 3], &[2]).unwrap();
//! let c = apply2(&a, &factor, &Multiply).unwrap();
//! assert_eq!(c.kind(), NumericKind::Int);
//!
//! // In place
//! let mut d = a.clone();
//! apply_into2(&mut d, &c, &Add).unwrap();
//! assert_eq!(d.get_i64(&[1, 1]), Some(4 + 12));
//! ```
//!
//! ## Shape Matching
//!
//! When no axes are given, the smaller tensor's axes are matched greedily
//! left to right against equal extents of the larger tensor:
//!
//! ```rust
//! use cellcalc_core::Tensor;
//! use cellcalc_kernels::{apply2, apply2_matching, Add, CalcError};
//!
//! let m = Tensor::from_vec(vec![0i64; 6], &[2, 3]).unwrap();
//! let v = Tensor::from_vec(vec![1i64, 2, 3], &[3]).unwrap();
//! assert!(apply2(&m, &v, &Add).is_ok());
//!
//! let w = Tensor::from_vec(vec![1i64, 2, 3, 4], &[4]).unwrap();
//! assert!(matches!(apply2(&m, &w, &Add), Err(CalcError::ShapeMismatch { .. })));
//!
//! // Square tables need the axis spelled out to match columns
//! let sq = Tensor::from_vec(vec![0i64; 4], &[2, 2]).unwrap();
//! let by_col = Tensor::from_vec(vec![1i64, 2], &[2]).unwrap();
//! let r = apply2_matching(&sq, &by_col, &[1], &Add).unwrap();
//! assert_eq!(r.get_i64(&[0, 1]), Some(2));
//! ```
//!
//! ## Numeric Semantics
//!
//! Integer kinds compute in `i64` with wrapping arithmetic and real kinds in
//! `f64`; results are narrowed into the destination's declared kind.
//!
//! ## Features
//!
//! - `serde` - derive `Serialize`/`Deserialize` for [`ShapeMatch`]
//!
//! ## SciRS2 Integration
//!
//! Storage and array iteration come from `scirs2-core` through
//! `cellcalc-core`.

#![forbid(unsafe_code)]

pub mod cellwise;
pub mod error;
pub mod function;
pub mod kernels;
pub mod metrics;
pub mod operand;
pub mod shape;

#[cfg(test)]
mod property_tests;

// Re-exports
pub use cellwise::*;
pub use error::{CalcError, CalcResult};
pub use function::*;
pub use metrics::*;
pub use operand::Operand;
pub use shape::*;
