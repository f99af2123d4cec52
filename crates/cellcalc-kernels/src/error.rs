//! Error types for cell-wise operations
//!
//! Every variant is a caller-input error raised at the point of detection;
//! nothing is retried or suppressed. Shape-related messages always carry the
//! offending shapes so broadcast mistakes can be diagnosed from the message
//! alone.
//!
//! On error, a tensor passed for in-place mutation may be partially written
//! and must be treated as invalid.

use cellcalc_core::types::format_shape;
use cellcalc_core::NumericKind;
use thiserror::Error;

/// Error type for cell-wise calculation and rounding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Shapes cannot be aligned cell by cell
    #[error(
        "{operation}: shape mismatch between {} and {}: {reason}",
        format_shape(.shape_a),
        format_shape(.shape_b)
    )]
    ShapeMismatch {
        operation: String,
        shape_a: Vec<usize>,
        shape_b: Vec<usize>,
        reason: String,
    },

    /// An in-place operation would need a larger destination
    #[error(
        "{operation}: cannot grow shape when writing in place: destination {} has rank {}, operand {} has rank {}",
        format_shape(.destination),
        .destination.len(),
        format_shape(.operand),
        .operand.len()
    )]
    RankGrowthInPlace {
        operation: String,
        destination: Vec<usize>,
        operand: Vec<usize>,
    },

    /// An N-ary parameter is neither a tensor nor a number
    #[error("{operation}: parameter {position} is not numeric: {description}")]
    InvalidParameterType {
        operation: String,
        position: usize,
        description: String,
    },

    /// An N-ary function was given the wrong number of parameters
    #[error("{operation}: function takes {expected} parameters, got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Input is larger than the operation supports
    #[error("{operation}: {cells} cells exceed the supported maximum of {limit}")]
    CapacityExceeded {
        operation: String,
        cells: usize,
        limit: usize,
    },

    /// A cell value cannot be represented in the output kind
    #[error("{operation}: cell {position} holds {value}, outside the range of {kind}")]
    ValueOutOfRange {
        operation: String,
        position: usize,
        value: f64,
        kind: NumericKind,
    },

    /// An internal invariant does not hold (programming error)
    #[error("{operation}: invalid state: {message}")]
    InvalidState { operation: String, message: String },
}

/// Result type for cell-wise operations
pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(
        operation: impl Into<String>,
        shape_a: &[usize],
        shape_b: &[usize],
        reason: impl Into<String>,
    ) -> Self {
        CalcError::ShapeMismatch {
            operation: operation.into(),
            shape_a: shape_a.to_vec(),
            shape_b: shape_b.to_vec(),
            reason: reason.into(),
        }
    }

    /// Create an in-place rank growth error
    pub fn rank_growth(operation: impl Into<String>, destination: &[usize], operand: &[usize]) -> Self {
        CalcError::RankGrowthInPlace {
            operation: operation.into(),
            destination: destination.to_vec(),
            operand: operand.to_vec(),
        }
    }

    /// Create an invalid parameter type error
    pub fn invalid_parameter(
        operation: impl Into<String>,
        position: usize,
        description: impl Into<String>,
    ) -> Self {
        CalcError::InvalidParameterType {
            operation: operation.into(),
            position,
            description: description.into(),
        }
    }

    /// Create an arity mismatch error
    pub fn arity_mismatch(operation: impl Into<String>, expected: usize, actual: usize) -> Self {
        CalcError::ArityMismatch {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    /// Create a capacity error
    pub fn capacity_exceeded(operation: impl Into<String>, cells: usize, limit: usize) -> Self {
        CalcError::CapacityExceeded {
            operation: operation.into(),
            cells,
            limit,
        }
    }

    /// Create an out-of-range error for the cell at flat `position`
    pub fn out_of_range(
        operation: impl Into<String>,
        position: usize,
        value: f64,
        kind: NumericKind,
    ) -> Self {
        CalcError::ValueOutOfRange {
            operation: operation.into(),
            position,
            value,
            kind,
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(operation: impl Into<String>, message: impl Into<String>) -> Self {
        CalcError::InvalidState {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Replace the operation name, keeping everything else.
    ///
    /// Shape matching reports under its own name; public entry points relabel
    /// errors so callers see the operation they invoked.
    #[must_use]
    pub fn in_operation(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match &mut self {
            CalcError::ShapeMismatch { operation, .. }
            | CalcError::RankGrowthInPlace { operation, .. }
            | CalcError::InvalidParameterType { operation, .. }
            | CalcError::ArityMismatch { operation, .. }
            | CalcError::CapacityExceeded { operation, .. }
            | CalcError::ValueOutOfRange { operation, .. }
            | CalcError::InvalidState { operation, .. } => *operation = name,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = CalcError::shape_mismatch(
            "apply2",
            &[2, 3],
            &[4],
            "no axis of the larger tensor has extent 4",
        );

        let msg = format!("{}", err);
        assert!(msg.contains("apply2"));
        assert!(msg.contains("(2, 3)"));
        assert!(msg.contains("(4,)"));
        assert!(msg.contains("extent 4"));
    }

    #[test]
    fn test_rank_growth_display() {
        let err = CalcError::rank_growth("apply_into2", &[3], &[2, 3]);

        let msg = format!("{}", err);
        assert!(msg.contains("cannot grow shape"));
        assert!(msg.contains("(3,) has rank 1"));
        assert!(msg.contains("(2, 3) has rank 2"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = CalcError::invalid_parameter("apply_n", 2, "a string");

        let msg = format!("{}", err);
        assert!(msg.contains("parameter 2"));
        assert!(msg.contains("a string"));
    }

    #[test]
    fn test_capacity_display() {
        let err = CalcError::capacity_exceeded("round_deterministically", 10, 5);

        let msg = format!("{}", err);
        assert!(msg.contains("10 cells"));
        assert!(msg.contains("maximum of 5"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = CalcError::out_of_range("round_deterministically", 3, 3.0e9, NumericKind::Int);

        let msg = format!("{}", err);
        assert!(msg.contains("cell 3"));
        assert!(msg.contains("3000000000"));
        assert!(msg.contains("range of int"));
    }

    #[test]
    fn test_in_operation_relabels() {
        let err = CalcError::arity_mismatch("inner", 2, 3).in_operation("apply_n");
        assert_eq!(
            err,
            CalcError::ArityMismatch {
                operation: "apply_n".to_string(),
                expected: 2,
                actual: 3
            }
        );
    }
}
