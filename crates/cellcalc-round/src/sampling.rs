//! Weighted index sampling
//!
//! Draws an index with probability proportional to its weight. Non-positive
//! and non-finite weights are never drawn. The random source is always the
//! caller's, so a seeded generator reproduces the same draws.
//!
//! # Examples
//!
//! ```
//! use cellcalc_round::sampling::{draw_index, draw_index_without_replacement};
//! use scirs2_core::random::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let weights = [0.0, 0.7, 0.0, 0.3];
//!
//! let i = draw_index(&weights, &mut rng).unwrap();
//! assert!(i == 1 || i == 3);
//!
//! let mut used = vec![false; weights.len()];
//! let first = draw_index_without_replacement(&weights, &mut used, &mut rng).unwrap();
//! let second = draw_index_without_replacement(&weights, &mut used, &mut rng).unwrap();
//! assert_ne!(first, second);
//! assert_eq!(draw_index_without_replacement(&weights, &mut used, &mut rng), None);
//! ```

use scirs2_core::random::Rng;

#[inline]
fn usable(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Walk the cumulative weights of the eligible indices and return the one
/// covering `target`. Falls back to the last eligible index when rounding
/// leaves `target` past the final bucket.
fn pick<I>(eligible: I, target: f64) -> Option<usize>
where
    I: Iterator<Item = (usize, f64)>,
{
    let mut cumulative = 0.0;
    let mut last = None;
    for (index, weight) in eligible {
        cumulative += weight;
        last = Some(index);
        if target < cumulative {
            return Some(index);
        }
    }
    last
}

/// Draw one index with probability `weights[i] / Σ weights`.
///
/// Returns `None` if no weight is positive.
pub fn draw_index<R>(weights: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let eligible = || {
        weights
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, w)| usable(w))
    };

    let total: f64 = eligible().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let target = rng.random::<f64>() * total;
    pick(eligible(), target)
}

/// Draw one index not yet marked in `used`, then mark it.
///
/// The remaining weights are renormalized implicitly. Returns `None` once no
/// unused index has a positive weight, or if `used` is shorter than
/// `weights`.
pub fn draw_index_without_replacement<R>(
    weights: &[f64],
    used: &mut [bool],
    rng: &mut R,
) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if used.len() < weights.len() {
        return None;
    }

    let index = {
        let taken: &[bool] = used;
        let eligible = || {
            weights
                .iter()
                .copied()
                .enumerate()
                .filter(|&(i, w)| !taken[i] && usable(w))
        };

        let total: f64 = eligible().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }
        let target = rng.random::<f64>() * total;
        pick(eligible(), target)?
    };

    used[index] = true;
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::random::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_zero_weights_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = [0.0, 0.25, 0.0, -1.0, f64::NAN];
        for _ in 0..200 {
            assert_eq!(draw_index(&weights, &mut rng), Some(1));
        }
    }

    #[test]
    fn test_all_zero_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_index(&[0.0, 0.0], &mut rng), None);
        assert_eq!(draw_index(&[], &mut rng), None);
    }

    #[test]
    fn test_frequencies_follow_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        let weights = [0.1, 0.9];
        let mut counts = [0usize; 2];
        for _ in 0..10_000 {
            counts[draw_index(&weights, &mut rng).unwrap()] += 1;
        }
        // expected 1000 / 9000
        assert!(counts[0] > 700 && counts[0] < 1300, "counts {:?}", counts);
    }

    #[test]
    fn test_without_replacement_exhausts() {
        let mut rng = StdRng::seed_from_u64(11);
        let weights = [0.5, 0.2, 0.0, 0.3];
        let mut used = vec![false; 4];
        let mut drawn = Vec::new();
        while let Some(i) = draw_index_without_replacement(&weights, &mut used, &mut rng) {
            drawn.push(i);
        }
        drawn.sort_unstable();
        assert_eq!(drawn, vec![0, 1, 3]);
        assert_eq!(used, vec![true, true, false, true]);
    }

    #[test]
    fn test_short_used_set_is_none() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut used = vec![false; 2];
        assert_eq!(
            draw_index_without_replacement(&[0.5, 0.5, 0.5], &mut used, &mut rng),
            None
        );
        assert_eq!(used, vec![false, false]);
    }

    #[test]
    fn test_seeded_draws_reproduce() {
        let weights: Vec<f64> = (1..=20).map(|i| i as f64 / 20.0).collect();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| draw_index(&weights, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }
}
