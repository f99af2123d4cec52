//! Dense tensor storage.
//!
//! [`DenseND`] is the shaped, mutable container every cell-wise operation
//! reads from and writes into. Storage is a C-contiguous (row-major)
//! `scirs2_core` dynamic array, and logical iteration always follows
//! row-major order over the full cross-product of indices.

pub mod types;

mod creation;
mod indexing;

pub mod densend_traits;

pub use indexing::increment_index;
pub use types::DenseND;
