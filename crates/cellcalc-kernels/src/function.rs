//! Scalar functions applied cell by cell.
//!
//! Every function has two evaluation domains: the 64-bit integer domain
//! (`apply_long`), used when the resolved common kind is `byte`..`long`, and
//! the 64-bit real domain (`apply_double`), used for `float` and `double`.
//! Built-in integer arithmetic wraps on overflow.
//!
//! # Examples
//!
//! ```
//! use cellcalc_kernels::function::{binary_fn, Mirrored, NumericFunction2, Subtract};
//!
//! assert_eq!(Subtract.apply_long(7, 2), 5);
//! assert_eq!(Mirrored(Subtract).apply_long(7, 2), -5);
//!
//! let hypot = binary_fn(
//!     |a, b| ((a * a + b * b) as f64).sqrt() as i64,
//!     |a: f64, b: f64| a.hypot(b),
//! );
//! assert_eq!(hypot.apply_double(3.0, 4.0), 5.0);
//! ```

/// A pure function of one operand.
pub trait NumericFunction1 {
    /// Evaluate in the integer domain.
    fn apply_long(&self, value: i64) -> i64;

    /// Evaluate in the real domain.
    fn apply_double(&self, value: f64) -> f64;
}

/// A pure function of two operands.
///
/// The mirrored variants take operands in swapped order. The engine calls
/// them when it exchanges operands to keep the higher-rank tensor first, so
/// the user-visible operand order is preserved. Override them when a cheaper
/// swapped form exists.
pub trait NumericFunction2 {
    /// Evaluate `f(a, b)` in the integer domain.
    fn apply_long(&self, a: i64, b: i64) -> i64;

    /// Evaluate `f(a, b)` in the real domain.
    fn apply_double(&self, a: f64, b: f64) -> f64;

    /// Evaluate `f(b, a)` in the integer domain.
    fn apply_long_mirrored(&self, a: i64, b: i64) -> i64 {
        self.apply_long(b, a)
    }

    /// Evaluate `f(b, a)` in the real domain.
    fn apply_double_mirrored(&self, a: f64, b: f64) -> f64 {
        self.apply_double(b, a)
    }
}

/// A pure function of a parameter list.
pub trait NumericFunctionN {
    /// Number of parameters the function takes, or `None` if variadic.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Evaluate in the integer domain.
    fn apply_long(&self, values: &[i64]) -> i64;

    /// Evaluate in the real domain.
    fn apply_double(&self, values: &[f64]) -> f64;
}

impl<F: NumericFunction1 + ?Sized> NumericFunction1 for &F {
    fn apply_long(&self, value: i64) -> i64 {
        (**self).apply_long(value)
    }

    fn apply_double(&self, value: f64) -> f64 {
        (**self).apply_double(value)
    }
}

impl<F: NumericFunction2 + ?Sized> NumericFunction2 for &F {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        (**self).apply_long(a, b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        (**self).apply_double(a, b)
    }

    fn apply_long_mirrored(&self, a: i64, b: i64) -> i64 {
        (**self).apply_long_mirrored(a, b)
    }

    fn apply_double_mirrored(&self, a: f64, b: f64) -> f64 {
        (**self).apply_double_mirrored(a, b)
    }
}

impl<F: NumericFunctionN + ?Sized> NumericFunctionN for &F {
    fn arity(&self) -> Option<usize> {
        (**self).arity()
    }

    fn apply_long(&self, values: &[i64]) -> i64 {
        (**self).apply_long(values)
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        (**self).apply_double(values)
    }
}

/// The mirror of a binary function: `Mirrored(f)(a, b) == f(b, a)`.
///
/// Mirroring twice gives back the original operand order.
#[derive(Debug, Clone, Copy)]
pub struct Mirrored<F>(pub F);

impl<F: NumericFunction2> NumericFunction2 for Mirrored<F> {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        self.0.apply_long_mirrored(a, b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        self.0.apply_double_mirrored(a, b)
    }

    fn apply_long_mirrored(&self, a: i64, b: i64) -> i64 {
        self.0.apply_long(a, b)
    }

    fn apply_double_mirrored(&self, a: f64, b: f64) -> f64 {
        self.0.apply_double(a, b)
    }
}

// ========== Built-in binary functions ==========

/// `a + b`
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl NumericFunction2 for Add {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        a.wrapping_add(b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn apply_long_mirrored(&self, a: i64, b: i64) -> i64 {
        self.apply_long(a, b)
    }

    fn apply_double_mirrored(&self, a: f64, b: f64) -> f64 {
        self.apply_double(a, b)
    }
}

/// `a - b`
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtract;

impl NumericFunction2 for Subtract {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        a.wrapping_sub(b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        a - b
    }
}

/// `a * b`
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl NumericFunction2 for Multiply {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        a.wrapping_mul(b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn apply_long_mirrored(&self, a: i64, b: i64) -> i64 {
        self.apply_long(a, b)
    }

    fn apply_double_mirrored(&self, a: f64, b: f64) -> f64 {
        self.apply_double(a, b)
    }
}

/// `a / b`
///
/// Integer division truncates towards zero; an integer division by zero
/// yields `0` instead of panicking. Real division follows IEEE 754.
#[derive(Debug, Clone, Copy, Default)]
pub struct Divide;

impl NumericFunction2 for Divide {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        a.checked_div(b).unwrap_or(0)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        a / b
    }
}

/// `(a - b)²`, the per-cell term of the squared-error metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredError;

impl NumericFunction2 for SquaredError {
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        let d = a.wrapping_sub(b);
        d.wrapping_mul(d)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        let d = a - b;
        d * d
    }
}

// ========== Built-in unary functions ==========

/// `-x`
#[derive(Debug, Clone, Copy, Default)]
pub struct Negate;

impl NumericFunction1 for Negate {
    fn apply_long(&self, value: i64) -> i64 {
        value.wrapping_neg()
    }

    fn apply_double(&self, value: f64) -> f64 {
        -value
    }
}

/// `|x|`
#[derive(Debug, Clone, Copy, Default)]
pub struct Abs;

impl NumericFunction1 for Abs {
    fn apply_long(&self, value: i64) -> i64 {
        value.wrapping_abs()
    }

    fn apply_double(&self, value: f64) -> f64 {
        value.abs()
    }
}

// ========== Built-in N-ary functions ==========

/// Sum of all parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl NumericFunctionN for Sum {
    fn apply_long(&self, values: &[i64]) -> i64 {
        values.iter().fold(0i64, |acc, &v| acc.wrapping_add(v))
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        values.iter().sum()
    }
}

/// Product of all parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Product;

impl NumericFunctionN for Product {
    fn apply_long(&self, values: &[i64]) -> i64 {
        values.iter().fold(1i64, |acc, &v| acc.wrapping_mul(v))
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        values.iter().product()
    }
}

/// Largest parameter; `i64::MIN` / `-inf` for an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl NumericFunctionN for Max {
    fn apply_long(&self, values: &[i64]) -> i64 {
        values.iter().copied().max().unwrap_or(i64::MIN)
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Smallest parameter; `i64::MAX` / `+inf` for an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl NumericFunctionN for Min {
    fn apply_long(&self, values: &[i64]) -> i64 {
        values.iter().copied().min().unwrap_or(i64::MAX)
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

// ========== Closure adapters ==========

/// Unary function built from a pair of closures. See [`unary_fn`].
#[derive(Clone, Copy)]
pub struct UnaryFn<L, D> {
    long: L,
    double: D,
}

/// Build a [`NumericFunction1`] from an integer-domain and a real-domain closure.
///
/// ```
/// use cellcalc_kernels::function::{unary_fn, NumericFunction1};
///
/// let square = unary_fn(|x| x * x, |x| x * x);
/// assert_eq!(square.apply_long(-3), 9);
/// assert_eq!(square.apply_double(1.5), 2.25);
/// ```
pub fn unary_fn<L, D>(long: L, double: D) -> UnaryFn<L, D>
where
    L: Fn(i64) -> i64,
    D: Fn(f64) -> f64,
{
    UnaryFn { long, double }
}

impl<L, D> NumericFunction1 for UnaryFn<L, D>
where
    L: Fn(i64) -> i64,
    D: Fn(f64) -> f64,
{
    fn apply_long(&self, value: i64) -> i64 {
        (self.long)(value)
    }

    fn apply_double(&self, value: f64) -> f64 {
        (self.double)(value)
    }
}

/// Binary function built from a pair of closures. See [`binary_fn`].
#[derive(Clone, Copy)]
pub struct BinaryFn<L, D> {
    long: L,
    double: D,
}

/// Build a [`NumericFunction2`] from an integer-domain and a real-domain closure.
pub fn binary_fn<L, D>(long: L, double: D) -> BinaryFn<L, D>
where
    L: Fn(i64, i64) -> i64,
    D: Fn(f64, f64) -> f64,
{
    BinaryFn { long, double }
}

impl<L, D> NumericFunction2 for BinaryFn<L, D>
where
    L: Fn(i64, i64) -> i64,
    D: Fn(f64, f64) -> f64,
{
    fn apply_long(&self, a: i64, b: i64) -> i64 {
        (self.long)(a, b)
    }

    fn apply_double(&self, a: f64, b: f64) -> f64 {
        (self.double)(a, b)
    }
}

/// N-ary function built from a pair of closures. See [`nary_fn`].
#[derive(Clone, Copy)]
pub struct NaryFn<L, D> {
    arity: Option<usize>,
    long: L,
    double: D,
}

/// Build a [`NumericFunctionN`] from an integer-domain and a real-domain
/// closure over the parameter slice.
///
/// ```
/// use cellcalc_kernels::function::{nary_fn, NumericFunctionN};
///
/// // a * b + c
/// let fma = nary_fn(
///     Some(3),
///     |v: &[i64]| v[0] * v[1] + v[2],
///     |v: &[f64]| v[0].mul_add(v[1], v[2]),
/// );
/// assert_eq!(fma.arity(), Some(3));
/// assert_eq!(fma.apply_long(&[2, 3, 4]), 10);
/// ```
pub fn nary_fn<L, D>(arity: Option<usize>, long: L, double: D) -> NaryFn<L, D>
where
    L: Fn(&[i64]) -> i64,
    D: Fn(&[f64]) -> f64,
{
    NaryFn {
        arity,
        long,
        double,
    }
}

impl<L, D> NumericFunctionN for NaryFn<L, D>
where
    L: Fn(&[i64]) -> i64,
    D: Fn(&[f64]) -> f64,
{
    fn arity(&self) -> Option<usize> {
        self.arity
    }

    fn apply_long(&self, values: &[i64]) -> i64 {
        (self.long)(values)
    }

    fn apply_double(&self, values: &[f64]) -> f64 {
        (self.double)(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_of_mirror_restores_order() {
        let f = Mirrored(Mirrored(Subtract));
        assert_eq!(f.apply_long(10, 3), 7);
        assert_eq!(f.apply_double(1.0, 4.0), -3.0);
    }

    #[test]
    fn test_mirror_through_reference() {
        let sub = Subtract;
        let by_ref: &dyn NumericFunction2 = &sub;
        assert_eq!(Mirrored(by_ref).apply_long(1, 5), 4);
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(Add.apply_long(i64::MAX, 1), i64::MIN);
        assert_eq!(Negate.apply_long(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_integer_divide_by_zero_is_zero() {
        assert_eq!(Divide.apply_long(5, 0), 0);
        assert_eq!(Divide.apply_long(-7, 2), -3);
        assert!(Divide.apply_double(1.0, 0.0).is_infinite());
    }

    #[test]
    fn test_squared_error() {
        assert_eq!(SquaredError.apply_long(3, 7), 16);
        assert_eq!(SquaredError.apply_double(0.5, 2.0), 2.25);
    }

    #[test]
    fn test_nary_builtins() {
        assert_eq!(Sum.apply_long(&[1, 2, 3]), 6);
        assert_eq!(Product.apply_double(&[1.5, 2.0, 4.0]), 12.0);
        assert_eq!(Max.apply_long(&[4, -1, 9]), 9);
        assert_eq!(Min.apply_double(&[4.0, -1.5, 9.0]), -1.5);
        assert_eq!(Sum.arity(), None);
    }

    #[test]
    fn test_closure_adapters() {
        let clamp = unary_fn(|x| x.clamp(0, 10), |x| x.clamp(0.0, 10.0));
        assert_eq!(clamp.apply_long(42), 10);
        assert_eq!(clamp.apply_double(-2.0), 0.0);

        let pow = binary_fn(|a, b| a.pow(b as u32), f64::powf);
        assert_eq!(pow.apply_long(2, 10), 1024);
        assert_eq!(Mirrored(&pow).apply_long(2, 3), 9);
    }
}
