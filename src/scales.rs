//! Window-size selection.
//!
//! Scales follow `s(n) = 2^floor(n/2) + 2^floor((n+1)/2)` for `n = 6, 7, ...`,
//! i.e. 16, 24, 32, 48, 64, 96, ... Adjacent scales differ by a factor of
//! 4/3 or 3/2, which gives an evenly populated log-log regression. The
//! sequence stops before a scale reaches a third of the series length, so
//! every scale fits at least three disjoint windows.

use crate::errors::{MfdfaError, MfdfaResult};
use crate::math_utils::analysis_constants::{FIRST_SCALE_EXPONENT, MIN_WINDOWS_PER_SCALE};

/// Scale `s(n)` of the sequence, or `None` on overflow.
fn scale_for_exponent(n: u32) -> Option<usize> {
    let low = 1usize.checked_shl(n / 2)?;
    let high = 1usize.checked_shl((n + 1) / 2)?;
    low.checked_add(high)
}

/// Select the window sizes for a series of `length` samples.
///
/// Returns an empty vector when the series is too short for the first scale;
/// callers turn that into an insufficient-data error.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::scales::select_scales;
///
/// assert_eq!(select_scales(200), vec![16, 24, 32, 48, 64]);
/// assert!(select_scales(48).is_empty());
/// ```
pub fn select_scales(length: usize) -> Vec<usize> {
    let limit = length as f64 / MIN_WINDOWS_PER_SCALE as f64;
    let mut scales = Vec::new();
    let mut n = FIRST_SCALE_EXPONENT;

    while let Some(scale) = scale_for_exponent(n) {
        if scale as f64 >= limit {
            break;
        }
        scales.push(scale);
        n += 1;
    }

    scales
}

/// Shortest series for which [`select_scales`] returns at least one scale.
pub fn minimum_series_length() -> usize {
    // scale_for_exponent(FIRST_SCALE_EXPONENT) is 16 and cannot overflow
    let first = scale_for_exponent(FIRST_SCALE_EXPONENT).unwrap_or(16);
    first * MIN_WINDOWS_PER_SCALE + 1
}

/// Validate caller-supplied scales.
///
/// Scales must be non-empty, strictly increasing and each larger than the
/// detrending polynomial order (a window of `order + 1` points is fitted
/// exactly, fewer points leave the fit underdetermined). Scales longer than
/// the series are accepted; they simply produce no windows.
pub fn validate_scales(scales: &[usize], polynomial_order: usize) -> MfdfaResult<()> {
    if scales.is_empty() {
        return Err(MfdfaError::InvalidParameter {
            parameter: "scales".to_string(),
            value: 0.0,
            constraint: "at least one scale".to_string(),
        });
    }

    if let Some(&scale) = scales.iter().find(|&&s| s <= polynomial_order) {
        return Err(MfdfaError::InvalidParameter {
            parameter: "scale".to_string(),
            value: scale as f64,
            constraint: format!("> polynomial order {}", polynomial_order),
        });
    }

    if let Some(pair) = scales.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(MfdfaError::InvalidParameter {
            parameter: "scales".to_string(),
            value: pair[1] as f64,
            constraint: format!("strictly greater than previous scale {}", pair[0]),
        });
    }

    Ok(())
}
