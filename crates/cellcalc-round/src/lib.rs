//! # cellcalc-round
//!
//! Controlled ("bucket") rounding of real-valued tensors to integers.
//!
//! Rounding each cell on its own lets totals drift: five cells of `0.4` round
//! to zero trips although `2.0` trips were modelled. Bucket rounding floors
//! every cell and hands the rounded fractional mass back out one unit at a
//! time, so `sum(output) == round(sum(input))` always holds.
//!
//! - [`round_deterministically`] - largest remainder first, ties by row-major
//!   position; identical input gives identical output
//! - [`round_randomly`] / [`round_randomly_with_rng`] - cells drawn with
//!   probability proportional to their remainder, with or without
//!   [`Replacement`]
//! - [`BucketRounder`] - the same operations with a custom [`RoundingConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use cellcalc_core::Tensor;
//! use cellcalc_round::round_deterministically;
//!
//! let flows = Tensor::from_vec(vec![2.6f64, 1.3, 0.6, 4.5], &[2, 2]).unwrap();
//! let trips = round_deterministically(&flows).unwrap();
//! assert_eq!(trips.sum_i64(), 9);
//! assert_eq!(trips.as_dense::<i32>().unwrap().to_vec(), vec![3, 1, 1, 4]);
//! ```
//!
//! ## Reproducibility
//!
//! Randomized rounding never touches hidden global state when given a
//! generator; seed it for repeatable runs:
//!
//! ```rust
//! use cellcalc_core::Tensor;
//! use cellcalc_round::{round_randomly_with_rng, Replacement};
//! use scirs2_core::random::{rngs::StdRng, SeedableRng};
//!
//! let flows = Tensor::from_vec(vec![0.3f64; 10], &[10]).unwrap();
//! let a = round_randomly_with_rng(&flows, Replacement::Without, &mut StdRng::seed_from_u64(7)).unwrap();
//! let b = round_randomly_with_rng(&flows, Replacement::Without, &mut StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.sum_i64(), 3);
//! ```
//!
//! ## Features
//!
//! - `serde` - derive `Serialize`/`Deserialize` for [`Replacement`] and
//!   [`RoundingConfig`]

#![forbid(unsafe_code)]

pub mod bucket;
pub mod sampling;


pub use bucket::{
    round_deterministically, round_randomly, round_randomly_with_rng, BucketRounder,
    Replacement, RoundingConfig, WeightedIndex,
};
