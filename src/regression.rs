//! Per-moment scaling exponents from log-log regression.
//!
//! For each q the fluctuation function is regressed in log2-log2 space
//! against the scale. Scales whose fluctuation is exactly 0 (everything was
//! masked) are left out. When fewer than two usable points remain, or a log
//! value is not finite, the fit falls back to the neutral exponent 0.5 with
//! zeroed diagnostics and is flagged as such.

use crate::math_utils::analysis_constants::NEUTRAL_HURST_EXPONENT;
use crate::math_utils::fit_line;
use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of the log-log fit for a single moment order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalingFit {
    /// Fitted line coefficients, highest degree first: `[slope, intercept]`
    pub coefficients: [f64; 2],
    /// Generalized Hurst exponent H(q), the fitted slope
    pub hurst: f64,
    /// Mean squared error in log2 units
    pub mse: f64,
    /// Coefficient of determination of the log-log fit
    pub r_squared: f64,
    /// Number of scales that entered the fit
    pub valid_scales: usize,
    /// Whether the neutral fallback was used instead of a fit
    pub fallback: bool,
}

impl ScalingFit {
    /// The neutral result used when no fit is possible.
    pub fn neutral(valid_scales: usize) -> Self {
        Self {
            coefficients: [0.0, 0.0],
            hurst: NEUTRAL_HURST_EXPONENT,
            mse: 0.0,
            r_squared: 0.0,
            valid_scales,
            fallback: true,
        }
    }
}

/// Fit `log2(Fq)` against `log2(scale)` for one moment order.
///
/// `fluctuations[i]` belongs to `scales[i]`.
pub fn fit_scaling_exponent(scales: &[usize], fluctuations: &[f64], q: f64) -> ScalingFit {
    let (log_scales, log_fluctuations): (Vec<f64>, Vec<f64>) = scales
        .iter()
        .zip(fluctuations)
        .filter(|&(_, &f)| f != 0.0)
        .map(|(&s, &f)| ((s as f64).log2(), f.log2()))
        .unzip();

    let valid_scales = log_scales.len();

    if valid_scales < 2 {
        warn!(
            "Only {} usable scale(s) for q = {}; using neutral exponent {}",
            valid_scales, q, NEUTRAL_HURST_EXPONENT
        );
        return ScalingFit::neutral(valid_scales);
    }

    if !log_fluctuations.iter().all(|v| v.is_finite()) {
        warn!(
            "Non-finite fluctuation for q = {}; using neutral exponent {}",
            q, NEUTRAL_HURST_EXPONENT
        );
        return ScalingFit::neutral(valid_scales);
    }

    match fit_line(&log_scales, &log_fluctuations) {
        Ok(fit) => ScalingFit {
            coefficients: [fit.slope, fit.intercept],
            hurst: fit.slope,
            mse: fit.mse,
            r_squared: fit.r_squared,
            valid_scales,
            fallback: false,
        },
        Err(e) => {
            warn!(
                "Scaling fit failed for q = {}: {}; using neutral exponent {}",
                q, e, NEUTRAL_HURST_EXPONENT
            );
            ScalingFit::neutral(valid_scales)
        }
    }
}

/// Fit every column of the fluctuation function `Fq[scale][q]`.
///
/// Row `i` belongs to `scales[i]` and column `j` to `qs[j]`. A moment order
/// whose column is missing from any row takes the neutral fallback.
pub fn fit_scaling_exponents(
    scales: &[usize],
    scaling_function: &[Vec<f64>],
    qs: &[f64],
) -> Vec<ScalingFit> {
    let fit_column = |(qi, &q): (usize, &f64)| {
        let column: Option<Vec<f64>> = scaling_function
            .iter()
            .map(|row| row.get(qi).copied())
            .collect();
        match column {
            Some(column) => fit_scaling_exponent(scales, &column, q),
            None => {
                warn!(
                    "Fluctuation function has no column for q = {}; using neutral exponent {}",
                    q, NEUTRAL_HURST_EXPONENT
                );
                ScalingFit::neutral(0)
            }
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        qs.par_iter().enumerate().map(fit_column).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        qs.iter().enumerate().map(fit_column).collect()
    }
}
