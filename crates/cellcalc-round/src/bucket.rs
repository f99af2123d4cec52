//! Bucket rounding
//!
//! Rounds every cell of a real-valued tensor to an integer such that the sum
//! of the output equals the rounded sum of the input, which plain cell-wise
//! rounding does not guarantee.
//!
//! 1. **Floor phase**: walking the cells in row-major order, each output cell
//!    gets `floor(value)` and the remainder `value - floor(value)` is kept.
//! 2. **Distribution phase**: `extra = round(Σ remainders)` (half rounds up)
//!    cells receive `+1`, chosen either by largest remainder
//!    ([`BucketRounder::round_deterministically`]) or by sampling weighted by
//!    remainder ([`BucketRounder::round_randomly`]).
//!
//! The output is an `int` tensor of the input's shape. Floors and increments
//! are tracked in `i64`; a cell whose floor or final value falls outside the
//! `int` range fails the pass with [`CalcError::ValueOutOfRange`].
//!
//! # Examples
//!
//! ```
//! use cellcalc_core::{NumericKind, Shape, Tensor};
//! use cellcalc_round::{round_deterministically, round_randomly_with_rng, Replacement};
//! use scirs2_core::random::{rngs::StdRng, SeedableRng};
//!
//! let demand = Tensor::from_vec(vec![0.4f64, 0.4, 0.4, 0.4, 0.4], &[5]).unwrap();
//!
//! let rounded = round_deterministically(&demand).unwrap();
//! assert_eq!(rounded.as_dense::<i32>().unwrap().to_vec(), vec![1, 1, 0, 0, 0]);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let sampled = round_randomly_with_rng(&demand, Replacement::Without, &mut rng).unwrap();
//! assert_eq!(sampled.sum_i64(), 2);
//! ```

use crate::sampling::{draw_index, draw_index_without_replacement};
use cellcalc_core::types::format_shape;
use cellcalc_core::{NumericKind, Shape, Tensor};
use cellcalc_kernels::{CalcError, CalcResult};
use scirs2_core::random::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How randomized rounding picks cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Replacement {
    /// A cell is drawn at most once and gains at most `+1`
    #[default]
    Without,
    /// A cell may be drawn repeatedly; increments stack
    With,
}

/// Limits for a rounding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundingConfig {
    /// Largest number of cells accepted; larger inputs fail with
    /// [`CalcError::CapacityExceeded`]
    pub cell_limit: usize,
}

impl RoundingConfig {
    /// Cell count addressable by a 32-bit signed flat index.
    pub const DEFAULT_CELL_LIMIT: usize = i32::MAX as usize;

    /// Config with a custom cell limit.
    pub fn with_cell_limit(cell_limit: usize) -> Self {
        Self { cell_limit }
    }
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            cell_limit: Self::DEFAULT_CELL_LIMIT,
        }
    }
}

/// A cell's fractional remainder and its row-major position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedIndex {
    /// `value - floor(value)`, in `[0, 1)`
    pub weight: f64,
    /// Flat position in row-major order
    pub position: usize,
}

impl WeightedIndex {
    /// Largest remainder first; equal remainders by ascending position.
    pub fn selection_order(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Output of the floor phase.
struct Floored {
    shape: Shape,
    cells: Vec<i64>,
    remainders: Vec<f64>,
    extra: usize,
}

/// Sum-preserving rounding of real tensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketRounder {
    config: RoundingConfig,
}

impl BucketRounder {
    /// Rounder with the given limits.
    pub fn new(config: RoundingConfig) -> Self {
        Self { config }
    }

    /// The active limits.
    pub fn config(&self) -> &RoundingConfig {
        &self.config
    }

    /// Round with the largest remainders receiving the extra units.
    ///
    /// Cells with equal remainders are taken in row-major order, so the
    /// result depends only on the input.
    ///
    /// # Errors
    ///
    /// [`CalcError::CapacityExceeded`] if the input has more cells than the
    /// configured limit, [`CalcError::ValueOutOfRange`] if a cell does not
    /// fit an `int`.
    pub fn round_deterministically(&self, tensor: &Tensor) -> CalcResult<Tensor> {
        const OP: &str = "round_deterministically";

        let mut floored = self.floor_phase(OP, tensor)?;

        let mut order: Vec<WeightedIndex> = floored
            .remainders
            .iter()
            .enumerate()
            .map(|(position, &weight)| WeightedIndex { weight, position })
            .collect();
        order.sort_by(WeightedIndex::selection_order);

        for selected in order.iter().take(floored.extra) {
            floored.cells[selected.position] += 1;
        }

        log::debug!(
            "{}: {} cells of {}, {} extra units",
            OP,
            floored.cells.len(),
            format_shape(&floored.shape),
            floored.extra
        );
        finish(OP, floored)
    }

    /// Round with extra units assigned by sampling weighted by remainder,
    /// drawing from `rng`.
    ///
    /// With [`Replacement::Without`] every selected cell gains exactly one
    /// unit. With [`Replacement::With`] a cell may be drawn again and gain
    /// several.
    ///
    /// # Errors
    ///
    /// [`CalcError::CapacityExceeded`] if the input has more cells than the
    /// configured limit, [`CalcError::ValueOutOfRange`] if a cell does not
    /// fit an `int`.
    pub fn round_randomly<R>(
        &self,
        tensor: &Tensor,
        replacement: Replacement,
        rng: &mut R,
    ) -> CalcResult<Tensor>
    where
        R: Rng + ?Sized,
    {
        const OP: &str = "round_randomly";

        let mut floored = self.floor_phase(OP, tensor)?;

        match replacement {
            Replacement::Without => {
                let mut used = vec![false; floored.remainders.len()];
                for _ in 0..floored.extra {
                    let position =
                        draw_index_without_replacement(&floored.remainders, &mut used, rng)
                            .ok_or_else(|| exhausted(OP, floored.extra))?;
                    floored.cells[position] += 1;
                }
            }
            Replacement::With => {
                for _ in 0..floored.extra {
                    let position = draw_index(&floored.remainders, rng)
                        .ok_or_else(|| exhausted(OP, floored.extra))?;
                    floored.cells[position] += 1;
                }
            }
        }

        log::debug!(
            "{}: {} cells of {}, {} extra units drawn {:?} replacement",
            OP,
            floored.cells.len(),
            format_shape(&floored.shape),
            floored.extra,
            replacement
        );
        finish(OP, floored)
    }

    fn floor_phase(&self, op: &str, tensor: &Tensor) -> CalcResult<Floored> {
        let len = tensor.len();
        if len > self.config.cell_limit {
            return Err(CalcError::capacity_exceeded(op, len, self.config.cell_limit));
        }

        let values = tensor.to_f64_vec();
        let mut cells = Vec::with_capacity(values.len());
        let mut remainders = Vec::with_capacity(values.len());
        let mut fraction_sum = 0.0;
        for (position, value) in values.into_iter().enumerate() {
            let floor = value.floor();
            if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&floor) {
                return Err(CalcError::out_of_range(op, position, value, NumericKind::Int));
            }
            let remainder = value - floor;
            cells.push(floor as i64);
            remainders.push(remainder);
            fraction_sum += remainder;
        }

        let extra = round_half_up(fraction_sum);
        if extra > cells.len() {
            return Err(CalcError::invalid_state(
                op,
                format!(
                    "{} extra units for {} cells (remainder sum {})",
                    extra,
                    cells.len(),
                    fraction_sum
                ),
            ));
        }

        Ok(Floored {
            shape: Shape::from_slice(tensor.shape()),
            cells,
            remainders,
            extra,
        })
    }
}

/// Nearest integer of a non-negative sum, halves rounding up.
fn round_half_up(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        (value + 0.5).floor() as usize
    } else {
        0
    }
}

fn exhausted(op: &str, extra: usize) -> CalcError {
    CalcError::invalid_state(
        op,
        format!("no cell left to receive one of {} extra units", extra),
    )
}

fn finish(op: &str, floored: Floored) -> CalcResult<Tensor> {
    let cells = floored
        .cells
        .iter()
        .enumerate()
        .map(|(position, &cell)| {
            i32::try_from(cell)
                .map_err(|_| CalcError::out_of_range(op, position, cell as f64, NumericKind::Int))
        })
        .collect::<CalcResult<Vec<i32>>>()?;
    Tensor::from_vec(cells, &floored.shape).map_err(|e| CalcError::invalid_state(op, e.to_string()))
}

/// [`BucketRounder::round_deterministically`] with the default limits.
pub fn round_deterministically(tensor: &Tensor) -> CalcResult<Tensor> {
    BucketRounder::default().round_deterministically(tensor)
}

/// [`BucketRounder::round_randomly`] with the default limits and a generator
/// seeded from the thread-local source.
pub fn round_randomly(tensor: &Tensor, replacement: Replacement) -> CalcResult<Tensor> {
    let mut thread_rng_instance = thread_rng();
    let mut rng = StdRng::from_rng(&mut thread_rng_instance);
    BucketRounder::default().round_randomly(tensor, replacement, &mut rng)
}

/// [`BucketRounder::round_randomly`] with the default limits and the
/// caller's generator.
pub fn round_randomly_with_rng<R>(
    tensor: &Tensor,
    replacement: Replacement,
    rng: &mut R,
) -> CalcResult<Tensor>
where
    R: Rng + ?Sized,
{
    BucketRounder::default().round_randomly(tensor, replacement, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcalc_core::NumericKind;

    fn cells(t: &Tensor) -> Vec<i32> {
        t.as_dense::<i32>().unwrap().to_vec()
    }

    #[test]
    fn test_ties_broken_by_position() {
        let t = Tensor::from_vec(vec![0.4f64; 5], &[5]).unwrap();
        let r = round_deterministically(&t).unwrap();
        assert_eq!(cells(&r), vec![1, 1, 0, 0, 0]);
        assert_eq!(r.kind(), NumericKind::Int);
    }

    #[test]
    fn test_largest_remainder_wins() {
        let t = Tensor::from_vec(vec![1.2f64, 0.9, 2.5, 3.0], &[2, 2]).unwrap();
        // remainders 0.2, 0.9, 0.5, 0.0 -> sum 1.6 -> 2 extra units
        let r = round_deterministically(&t).unwrap();
        assert_eq!(cells(&r), vec![1, 1, 3, 3]);
        assert_eq!(r.shape(), &[2, 2]);
    }

    #[test]
    fn test_negative_values() {
        let t = Tensor::from_vec(vec![-0.5f64, -1.25, 0.75], &[3]).unwrap();
        // floors -1, -2, 0; remainders 0.5, 0.75, 0.75 -> 2 extra units
        let r = round_deterministically(&t).unwrap();
        assert_eq!(cells(&r), vec![-1, -1, 1]);
        assert_eq!(r.sum_i64(), -1);
    }

    #[test]
    fn test_half_sum_rounds_up() {
        let t = Tensor::from_vec(vec![0.25f64, 0.25], &[2]).unwrap();
        assert_eq!(round_deterministically(&t).unwrap().sum_i64(), 1);
    }

    #[test]
    fn test_integral_input_unchanged() {
        let t = Tensor::from_vec(vec![3i64, -2, 0, 7], &[4]).unwrap();
        let r = round_deterministically(&t).unwrap();
        assert_eq!(cells(&r), vec![3, -2, 0, 7]);
    }

    #[test]
    fn test_capacity_guard() {
        let rounder = BucketRounder::new(RoundingConfig::with_cell_limit(4));
        let t = Tensor::zeros(NumericKind::Double, &[5]);
        let err = rounder.round_deterministically(&t).unwrap_err();
        assert_eq!(err, CalcError::capacity_exceeded("round_deterministically", 5, 4));

        let mut rng = StdRng::seed_from_u64(1);
        assert!(rounder.round_randomly(&t, Replacement::With, &mut rng).is_err());
    }

    #[test]
    fn test_floor_outside_int_range_is_rejected() {
        let t = Tensor::from_vec(vec![3.0e9 + 0.5, 0.5], &[2]).unwrap();
        let err = round_deterministically(&t).unwrap_err();
        assert_eq!(
            err,
            CalcError::out_of_range("round_deterministically", 0, 3.0e9 + 0.5, NumericKind::Int)
        );

        let low = Tensor::from_vec(vec![0.5, -3.0e9], &[2]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            round_randomly_with_rng(&low, Replacement::Without, &mut rng),
            Err(CalcError::ValueOutOfRange { position: 1, .. })
        ));

        let nan = Tensor::from_vec(vec![f64::NAN], &[1]).unwrap();
        assert!(matches!(
            round_deterministically(&nan),
            Err(CalcError::ValueOutOfRange { position: 0, .. })
        ));
    }

    #[test]
    fn test_increment_past_int_max_is_rejected() {
        // floor is i32::MAX, the extra unit would push it past
        let top = f64::from(i32::MAX) + 0.5;
        let t = Tensor::from_vec(vec![top, 0.5], &[2]).unwrap();
        assert!(matches!(
            round_deterministically(&t),
            Err(CalcError::ValueOutOfRange { position: 0, .. })
        ));

        let mut rng = StdRng::seed_from_u64(8);
        let only = Tensor::from_vec(vec![top, 1.0], &[2]).unwrap();
        assert!(matches!(
            round_randomly_with_rng(&only, Replacement::With, &mut rng),
            Err(CalcError::ValueOutOfRange { position: 0, .. })
        ));
    }

    #[test]
    fn test_int_extremes_round_trip() {
        let t = Tensor::from_vec(vec![f64::from(i32::MAX), f64::from(i32::MIN) + 0.25, 0.75], &[3])
            .unwrap();
        let r = round_deterministically(&t).unwrap();
        assert_eq!(cells(&r), vec![i32::MAX, i32::MIN, 1]);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(RoundingConfig::default().cell_limit, i32::MAX as usize);
        assert_eq!(Replacement::default(), Replacement::Without);
    }

    #[test]
    fn test_random_without_replacement_increments_once() {
        let t = Tensor::from_vec(vec![0.5f64, 0.5, 0.5, 0.5], &[4]).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let r = round_randomly_with_rng(&t, Replacement::Without, &mut rng).unwrap();
        assert_eq!(r.sum_i64(), 2);
        assert!(cells(&r).iter().all(|&c| c == 0 || c == 1));
    }

    #[test]
    fn test_random_with_replacement_preserves_sum() {
        let t = Tensor::from_vec(vec![0.875f64, 0.125, 2.0, 0.5], &[2, 2]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let r = round_randomly_with_rng(&t, Replacement::With, &mut rng).unwrap();
        // remainders sum to 1.5 -> 2 units on top of the floor sum of 2
        assert_eq!(r.sum_i64(), 4);
        assert_eq!(r.get_i64(&[1, 0]), Some(2));
    }

    #[test]
    fn test_random_never_picks_zero_remainder() {
        let t = Tensor::from_vec(vec![1.0f64, 0.75, 4.0, 0.0], &[4]).unwrap();
        let r = round_randomly(&t, Replacement::Without).unwrap();
        assert_eq!(cells(&r), vec![1, 1, 4, 0]);
    }

    #[test]
    fn test_selection_order() {
        let mut v = vec![
            WeightedIndex { weight: 0.1, position: 0 },
            WeightedIndex { weight: 0.7, position: 3 },
            WeightedIndex { weight: 0.7, position: 1 },
        ];
        v.sort_by(WeightedIndex::selection_order);
        let positions: Vec<usize> = v.iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![1, 3, 0]);
    }
}
