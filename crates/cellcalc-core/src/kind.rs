//! The numeric kind lattice.
//!
//! Six primitive kinds form a total widening order:
//!
//! ```text
//! Byte (i8) < Short (i16) < Int (i32) < Long (i64) < Float (f32) < Double (f64)
//! ```
//!
//! When several tensors take part in one cell-wise operation the kind with the
//! highest precedence becomes the common working kind and every other operand
//! is widened to it. Widening never goes the other way.
//!
//! # Examples
//!
//! ```
//! use cellcalc_core::NumericKind;
//!
//! assert_eq!(NumericKind::Byte.common(NumericKind::Short), NumericKind::Short);
//! assert_eq!(NumericKind::Long.common(NumericKind::Float), NumericKind::Float);
//! assert!(NumericKind::Int.widens_to(NumericKind::Double));
//! assert!(!NumericKind::Double.widens_to(NumericKind::Int));
//! ```

use std::fmt;

/// One of the six primitive numeric kinds a tensor can hold.
///
/// The discriminant is the promotion precedence; derived ordering follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NumericKind {
    /// 8-bit signed integer (`i8`)
    Byte = 1,
    /// 16-bit signed integer (`i16`)
    Short = 2,
    /// 32-bit signed integer (`i32`)
    Int = 3,
    /// 64-bit signed integer (`i64`)
    Long = 4,
    /// 32-bit float (`f32`)
    Float = 5,
    /// 64-bit float (`f64`)
    Double = 6,
}

/// All kinds in ascending precedence order.
pub const LATTICE: [NumericKind; 6] = [
    NumericKind::Byte,
    NumericKind::Short,
    NumericKind::Int,
    NumericKind::Long,
    NumericKind::Float,
    NumericKind::Double,
];

impl NumericKind {
    /// Promotion precedence, `1` (byte) through `6` (double).
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self as u8
    }

    /// Look a kind up by its precedence value.
    #[must_use]
    pub const fn from_precedence(precedence: u8) -> Option<Self> {
        match precedence {
            1 => Some(NumericKind::Byte),
            2 => Some(NumericKind::Short),
            3 => Some(NumericKind::Int),
            4 => Some(NumericKind::Long),
            5 => Some(NumericKind::Float),
            6 => Some(NumericKind::Double),
            _ => None,
        }
    }

    /// Map a primitive type name onto the lattice.
    ///
    /// Accepts both Rust (`i32`) and conventional (`int`) spellings. Anything
    /// unrecognized is treated as `Double`, the most general kind.
    ///
    /// ```
    /// use cellcalc_core::NumericKind;
    ///
    /// assert_eq!(NumericKind::from_type_name("short"), NumericKind::Short);
    /// assert_eq!(NumericKind::from_type_name("i64"), NumericKind::Long);
    /// assert_eq!(NumericKind::from_type_name("object"), NumericKind::Double);
    /// ```
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "byte" | "i8" => NumericKind::Byte,
            "short" | "i16" => NumericKind::Short,
            "int" | "integer" | "i32" => NumericKind::Int,
            "long" | "i64" => NumericKind::Long,
            "float" | "f32" => NumericKind::Float,
            _ => NumericKind::Double,
        }
    }

    /// Whether cells of this kind are computed in the 64-bit integer domain.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            NumericKind::Byte | NumericKind::Short | NumericKind::Int | NumericKind::Long
        )
    }

    /// The wider of the two kinds.
    #[must_use]
    pub fn common(self, other: Self) -> Self {
        self.max(other)
    }

    /// `true` when converting `self` into `target` is a (possibly trivial)
    /// widening.
    #[must_use]
    pub fn widens_to(self, target: Self) -> bool {
        self <= target
    }

    /// Resolve the common working kind of a sequence of kinds.
    ///
    /// An empty sequence resolves to `Double`.
    #[must_use]
    pub fn resolve<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = NumericKind>,
    {
        kinds.into_iter().max().unwrap_or(NumericKind::Double)
    }

    /// Primitive type name, e.g. `"int"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NumericKind::Byte => "byte",
            NumericKind::Short => "short",
            NumericKind::Int => "int",
            NumericKind::Long => "long",
            NumericKind::Float => "float",
            NumericKind::Double => "double",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        for pair in LATTICE.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].precedence() + 1, pair[1].precedence());
        }
    }

    #[test]
    fn test_from_precedence_roundtrip() {
        for kind in LATTICE {
            assert_eq!(NumericKind::from_precedence(kind.precedence()), Some(kind));
        }
        assert_eq!(NumericKind::from_precedence(0), None);
        assert_eq!(NumericKind::from_precedence(7), None);
    }

    #[test]
    fn test_byte_short_resolves_to_short() {
        let kind = NumericKind::resolve([NumericKind::Byte, NumericKind::Short]);
        assert_eq!(kind, NumericKind::Short);
    }

    #[test]
    fn test_resolve_empty_is_double() {
        assert_eq!(NumericKind::resolve([]), NumericKind::Double);
    }

    #[test]
    fn test_unknown_type_name_defaults_to_double() {
        assert_eq!(NumericKind::from_type_name("String"), NumericKind::Double);
        assert_eq!(NumericKind::from_type_name(" INT "), NumericKind::Int);
    }
}
