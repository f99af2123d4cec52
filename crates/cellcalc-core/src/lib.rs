//! # cellcalc-core
//!
//! Tensor storage, the numeric kind lattice, and type-erased tensors for the
//! cellcalc cell-wise calculation engine.
//!
//! - **Dense storage** ([`DenseND`]) backed by `scirs2_core` dynamic arrays
//! - **Numeric kind lattice** ([`NumericKind`]): `byte < short < int < long < float < double`
//! - **Cell primitives** ([`Element`]) tying `i8`..`f64` to their kind
//! - **Type-erased tensors** ([`Tensor`]) and values ([`Scalar`])
//!
//! ## Quick Start
//!
//! ```
//! use cellcalc_core::{DenseND, NumericKind, Scalar, Tensor};
//!
//! // Typed storage
//! let trips = DenseND::from_vec(vec![1.5f64, 2.25, 0.0, 4.0], &[2, 2]).unwrap();
//! assert_eq!(trips[&[0, 1]], 2.25);
//!
//! // Runtime-typed tensors
//! let counts = Tensor::from_vec(vec![1i16, 2, 3], &[3]).unwrap();
//! assert_eq!(counts.kind(), NumericKind::Short);
//!
//! // Constant tensor from a scalar
//! let ten = Tensor::full(Scalar::Int(10), &[2, 2]);
//! assert_eq!(ten.sum_f64(), 40.0);
//! ```
//!
//! ## Memory Layout
//!
//! Tensors are C-contiguous (row-major). Every "fixed iteration order" in the
//! engine is this row-major order over the full cross-product of indices.
//!
//! ## Error Handling
//!
//! Storage construction returns `anyhow::Result`:
//!
//! ```
//! use cellcalc_core::Tensor;
//!
//! assert!(Tensor::from_vec(vec![1i32, 2, 3], &[2, 2]).is_err());
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`NumericKind`]

#![forbid(unsafe_code)]

pub mod dense;
pub mod element;
pub mod kind;
pub mod tensor;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use dense::DenseND;
pub use element::Element;
pub use kind::{NumericKind, LATTICE};
pub use tensor::{resolve_common_kind, Scalar, Tensor};
pub use types::{Axis, Rank, Shape};
