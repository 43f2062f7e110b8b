//! Mathematical utility functions and constants for MF-DFA.
//!
//! Holds the numeric constants shared by the pipeline, NaN-aware float
//! helpers, the profile builder and the straight-line least-squares fit used
//! for the log-log scaling regression.

use crate::errors::{MfdfaError, MfdfaResult};

/// Numerical tolerances
pub mod constants {
    /// Default epsilon for floating point comparisons
    pub const DEFAULT_EPSILON: f64 = 1e-12;

    /// Minimum spread of a regressor before a fit is considered singular
    pub const MIN_VARIANCE: f64 = 1e-15;

    /// Relative tolerance used when checking that moment orders are evenly spaced
    pub const SPACING_RELATIVE_TOLERANCE: f64 = 1e-9;
}

/// Constants that define the analysis itself
pub mod analysis_constants {
    /// Local variances below this value are masked out of every moment average
    pub const VARIANCE_MASK_THRESHOLD: f64 = 0.0005;

    /// Generalized Hurst exponent substituted when a per-q fit is impossible
    pub const NEUTRAL_HURST_EXPONENT: f64 = 0.5;

    /// Default spacing of the moment-order grid
    pub const DEFAULT_Q_STEP: f64 = 0.25;

    /// Default moment-order grid as integer multiples of [`DEFAULT_Q_STEP`] (-5.0..=5.0)
    pub const DEFAULT_Q_STEP_RANGE: (i32, i32) = (-20, 20);

    /// Default detrending polynomial order (local linear trend)
    pub const DEFAULT_POLYNOMIAL_ORDER: usize = 1;

    /// Highest detrending order accepted; beyond this the Vandermonde fit degrades
    pub const MAX_POLYNOMIAL_ORDER: usize = 10;

    /// First exponent n of the scale sequence 2^floor(n/2) + 2^floor((n+1)/2)
    pub const FIRST_SCALE_EXPONENT: u32 = 6;

    /// Every selected scale must fit at least this many times into the series
    pub const MIN_WINDOWS_PER_SCALE: usize = 3;
}

/// Safe floating point comparison functions
pub mod float_ops {
    use super::constants::DEFAULT_EPSILON;

    /// Check if a floating point number is approximately zero
    #[inline]
    pub fn approx_zero(x: f64) -> bool {
        x.abs() < DEFAULT_EPSILON
    }

    /// Replace NaN by zero, leaving every other value untouched
    #[inline]
    pub fn nan_to_zero(x: f64) -> f64 {
        if x.is_nan() {
            0.0
        } else {
            x
        }
    }
}

/// Integrate a series into its profile.
///
/// The profile is the running sum of the mean-removed series:
/// `profile[i] = sum_{k <= i} (data[k] - mean(data))`.
///
/// # Errors
/// Returns [`MfdfaError::InsufficientData`] for an empty series, whose mean
/// is undefined.
pub fn integrate_series(data: &[f64]) -> MfdfaResult<Vec<f64>> {
    if data.is_empty() {
        return Err(MfdfaError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let mut cumsum = 0.0;

    Ok(data
        .iter()
        .map(|&value| {
            cumsum += value - mean;
            cumsum
        })
        .collect())
}

/// Straight-line least-squares fit with goodness-of-fit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    /// Slope of the fitted line
    pub slope: f64,
    /// Intercept of the fitted line
    pub intercept: f64,
    /// Mean squared error of the fitted values
    pub mse: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

/// Fit `y = slope * x + intercept` by ordinary least squares.
///
/// The data are centered before the sums are formed to avoid catastrophic
/// cancellation. `r_squared` follows the usual convention for a constant
/// response: 1 when the fit is exact, 0 otherwise.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::math_utils::fit_line;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0];
/// let y = vec![3.0, 5.0, 7.0, 9.0];
/// let fit = fit_line(&x, &y).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn fit_line(x: &[f64], y: &[f64]) -> MfdfaResult<LineFit> {
    if x.len() != y.len() {
        return Err(MfdfaError::NumericalError {
            reason: format!(
                "Regression inputs differ in length: {} vs {}",
                x.len(),
                y.len()
            ),
            operation: Some("fit_line".to_string()),
        });
    }

    if x.len() < 2 {
        return Err(MfdfaError::InsufficientData {
            required: 2,
            actual: x.len(),
        });
    }

    if !x.iter().chain(y).all(|v| v.is_finite()) {
        return Err(MfdfaError::NumericalError {
            reason: "Non-finite values in regression data".to_string(),
            operation: Some("fit_line".to_string()),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let sxx: f64 = x.iter().map(|xi| (xi - mean_x) * (xi - mean_x)).sum();

    if sxx < constants::MIN_VARIANCE {
        return Err(MfdfaError::NumericalError {
            reason: format!(
                "Predictor variable has zero variance ({:.2e})",
                sxx / n
            ),
            operation: Some("fit_line".to_string()),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(MfdfaError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
            operation: Some("fit_line".to_string()),
        });
    }

    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let residual = yi - (slope * xi + intercept);
            residual * residual
        })
        .sum();
    let ss_tot: f64 = y.iter().map(|yi| (yi - mean_y) * (yi - mean_y)).sum();

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LineFit {
        slope,
        intercept,
        mse: ss_res / n,
        r_squared,
    })
}
