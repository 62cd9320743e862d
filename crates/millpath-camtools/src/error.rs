//! Error types for the CAM tools crate.
//!
//! Numeric failures from the core crates are wrapped so callers can tell a
//! bad parameter apart from degenerate geometry.

use millpath_core::NumericError;
use thiserror::Error;

/// Errors that can occur while planning toolpath passes.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Pass generation could not produce a usable result.
    #[error("Pass generation failed: {0}")]
    GenerationFailed(String),

    /// A geometry or linear algebra routine failed.
    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to planner parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// The region outline is unusable.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),
}

impl ParameterError {
    /// Reject values that are not finite or not strictly positive.
    pub fn require_positive(name: &str, value: f64) -> ParameterResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ParameterError::InvalidValue {
                name: name.to_string(),
                reason: format!("must be positive and finite, got {value}"),
            })
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::GenerationFailed("empty toolpath".to_string());
        assert_eq!(err.to_string(), "Pass generation failed: empty toolpath");
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "medial_steps".to_string(),
            value: 0.0,
            min: 1.0,
            max: 1000.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'medial_steps' out of range: 0 (valid: 1..1000)"
        );

        let err = ParameterError::InvalidBoundary("2 vertices".to_string());
        assert_eq!(err.to_string(), "Invalid boundary: 2 vertices");
    }

    #[test]
    fn test_require_positive() {
        assert!(ParameterError::require_positive("step_down", 0.5).is_ok());
        assert!(ParameterError::require_positive("step_down", 0.0).is_err());
        assert!(ParameterError::require_positive("step_down", f64::NAN).is_err());
    }

    #[test]
    fn test_error_conversion() {
        let param_err = ParameterError::InvalidBoundary("empty".to_string());
        let cam_err: CamToolError = param_err.into();
        assert!(matches!(cam_err, CamToolError::Parameter(_)));

        let numeric = NumericError::DegenerateInput("collinear".to_string());
        let cam_err: CamToolError = numeric.into();
        assert!(matches!(cam_err, CamToolError::Numeric(_)));
        assert_eq!(
            cam_err.to_string(),
            format!("Numeric error: {}", NumericError::DegenerateInput("collinear".to_string()))
        );
    }
}
