//! Error types and validation functions for MF-DFA.
//!
//! Structural problems (too-short series, malformed moment orders, bad
//! configuration) surface as [`MfdfaError`]. Statistical degeneracies inside
//! the pipeline never do; they are encoded as sentinel values by the component
//! that detects them.

use std::sync::Arc;
use thiserror::Error;

/// Error types for MF-DFA operations.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum MfdfaError {
    /// Insufficient data for the requested analysis.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value in the analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// The moment-order set lacks an exact member required by the spectrum.
    #[error("Moment orders must contain q = {q} exactly")]
    MissingMomentOrder {
        /// The q value that could not be found
        q: f64,
    },

    /// The moment-order set is not uniformly spaced.
    #[error(
        "Moment orders must be uniformly spaced: step at index {index} is {actual}, expected {expected}"
    )]
    NonUniformMomentOrders {
        /// Index of the first offending step
        index: usize,
        /// Step implied by the first two moment orders
        expected: f64,
        /// Step found at `index`
        actual: f64,
    },

    /// Numerical computation error due to invalid input or a singular system.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// I/O operation error.
    #[error("I/O operation failed: {operation}")]
    IoError {
        /// I/O operation that failed
        operation: String,
        /// Underlying error if available
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// A token in a text series could not be parsed as a number.
    #[error("Could not parse '{token}' on line {line} as a number")]
    ParseError {
        /// One-based line number
        line: usize,
        /// Offending token
        token: String,
    },
}

/// Result type for MF-DFA operations.
pub type MfdfaResult<T> = Result<T, MfdfaError>;

/// Validates that data has sufficient length for analysis.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2).is_ok());
/// assert!(validate_data_length(&data, 5).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> MfdfaResult<()> {
    if data.len() < min_required {
        Err(MfdfaError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (inclusive).
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::errors::validate_parameter;
///
/// assert!(validate_parameter(0.5, 0.0, 1.0, "hurst").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "hurst").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> MfdfaResult<()> {
    if value.is_nan() {
        return Err(MfdfaError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if value < min || value > max {
        Err(MfdfaError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::errors::validate_all_finite;
///
/// assert!(validate_all_finite(&[1.0, 2.0, 3.0], "series").is_ok());
/// assert!(validate_all_finite(&[1.0, f64::NAN], "series").is_err());
/// ```
pub fn validate_all_finite(data: &[f64], name: &str) -> MfdfaResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(MfdfaError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
            operation: None,
        });
    }

    Ok(())
}
