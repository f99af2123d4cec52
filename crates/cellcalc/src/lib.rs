//! # cellcalc - Cell-wise Tensor Calculation
//!
//! Applies scalar numeric functions cell by cell across N-dimensional tensors
//! of mixed primitive kinds, and rounds real tensors to integers without
//! losing totals.
//!
//! This is the **meta crate** that re-exports all cellcalc components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use cellcalc::prelude::*;
//!
//! // [[1, 2], [3, 4]] + 10
//! let a = Tensor::from_vec(vec![1i32, 2, 3, 4], &[2, 2])?;
//! let b = apply2_scalar_right(&a, Scalar::Int(10), &Add)?;
//! assert_eq!(b.as_dense::<i32>().unwrap().to_vec(), vec![11, 12, 13, 14]);
//!
//! // Scale, then round back to whole trips without drifting the total
//! let scaled = apply2_scalar_right(&a, Scalar::Double(0.4), &Multiply)?;
//! let trips = round_deterministically(&scaled)?;
//! assert_eq!(trips.sum_i64(), 4);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Core Storage ([`core`])
//!
//! Dense tensors, the numeric kind lattice, type-erased tensors and scalars.
//!
//! ```
//! use cellcalc::core::{NumericKind, Tensor};
//!
//! let t = Tensor::zeros(NumericKind::Short, &[3, 4]);
//! assert_eq!(t.len(), 12);
//! assert!(NumericKind::Short < NumericKind::Float);
//! ```
//!
//! ### Cell-wise Kernels ([`kernels`])
//!
//! Unary, binary and N-ary application, shape matching, error metrics.
//!
//! ```
//! use cellcalc::core::Tensor;
//! use cellcalc::kernels::{apply2, root_mean_squared_error, Subtract};
//!
//! let observed = Tensor::from_vec(vec![3.0f64, 5.0], &[2]).unwrap();
//! let modelled = Tensor::from_vec(vec![4.0f64, 4.0], &[2]).unwrap();
//! let diff = apply2(&observed, &modelled, &Subtract).unwrap();
//! assert_eq!(diff.to_f64_vec(), vec![-1.0, 1.0]);
//! assert_eq!(root_mean_squared_error(&observed, &modelled).unwrap(), 1.0);
//! ```
//!
//! ### Bucket Rounding ([`round`])
//!
//! Deterministic and randomized sum-preserving rounding.
//!
//! ```
//! use cellcalc::core::Tensor;
//! use cellcalc::round::{round_deterministically, BucketRounder, RoundingConfig};
//!
//! let t = Tensor::from_vec(vec![0.5f64, 0.5, 0.5], &[3]).unwrap();
//! assert_eq!(round_deterministically(&t).unwrap().sum_i64(), 2);
//!
//! let small = BucketRounder::new(RoundingConfig::with_cell_limit(2));
//! assert!(small.round_deterministically(&t).is_err());
//! ```
//!
//! ## Features
//!
//! - `serde` - serialization for [`core::NumericKind`],
//!   [`kernels::ShapeMatch`], [`round::Replacement`] and
//!   [`round::RoundingConfig`]

#![forbid(unsafe_code)]

// Re-export all components
pub use cellcalc_core as core;
pub use cellcalc_kernels as kernels;
pub use cellcalc_round as round;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use cellcalc::prelude::*;
    //!
    //! let t = Tensor::zeros(NumericKind::Double, &[10, 20]);
    //! let negated = apply1(&t, &Negate);
    //! assert_eq!(negated.shape(), &[10, 20]);
    //! ```

    // Core types
    pub use crate::core::{DenseND, Element, NumericKind, Scalar, Tensor};

    // Dispatcher
    pub use crate::kernels::{
        apply1, apply2, apply2_matching, apply2_scalar_left, apply2_scalar_right, apply_into1,
        apply_into2, apply_into2_matching, apply_into2_scalar_left, apply_into2_scalar_right,
        apply_n, CalcError, CalcResult, Operand,
    };

    // Functions
    pub use crate::kernels::{
        binary_fn, nary_fn, unary_fn, Abs, Add, Divide, Max, Min, Mirrored, Multiply, Negate,
        NumericFunction1, NumericFunction2, NumericFunctionN, Product, SquaredError, Subtract,
        Sum,
    };

    // Metrics
    pub use crate::kernels::{mean_squared_error, percent_rmse, root_mean_squared_error};

    // Rounding
    pub use crate::round::{
        round_deterministically, round_randomly, round_randomly_with_rng, BucketRounder,
        Replacement, RoundingConfig,
    };
}
