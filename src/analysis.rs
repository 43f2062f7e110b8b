//! MF-DFA entry points and the result bundle.
//!
//! The pipeline runs strictly forward:
//! series → profile → local variances (per scale, both directions) →
//! fluctuation function → per-q scaling fits → singularity spectrum.
//! Every call is a pure function of its inputs.

use crate::config::{MfdfaConfig, MomentOrders};
use crate::errors::{
    validate_all_finite, validate_data_length, validate_parameter, MfdfaError, MfdfaResult,
};
use crate::fluctuation::{compute_fluctuation_function, LocalVariances};
use crate::math_utils::analysis_constants::MAX_POLYNOMIAL_ORDER;
use crate::math_utils::integrate_series;
use crate::regression::fit_scaling_exponents;
use crate::scales::{minimum_series_length, select_scales, validate_scales};
use crate::spectrum::derive_spectrum;
use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete MF-DFA result.
///
/// Field names follow the conventional result layout consumed by plotting
/// and reporting tools; with the `serde` feature the upper-case names (`H`,
/// `Dq`, `LSE`, `R2`) are used on the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MfdfaAnalysis {
    /// Input series
    pub series: Vec<f64>,
    /// Window sizes
    pub scales: Vec<usize>,
    /// Moment orders
    pub qs: Vec<f64>,
    /// Fluctuation function `Fq[scale][q]`
    pub scaling_function: Vec<Vec<f64>>,
    /// Generalized Hurst exponent per moment order
    pub h_q: Vec<f64>,
    /// Log-log fit coefficients `[slope, intercept]` per moment order
    pub polynomial_coeff: Vec<[f64; 2]>,
    /// Hurst exponent, H(q) at q = 2
    #[cfg_attr(feature = "serde", serde(rename = "H"))]
    pub hurst: f64,
    /// Mass exponents τ(q)
    pub tq: Vec<f64>,
    /// Singularity strengths
    pub hq: Vec<f64>,
    /// Singularity spectrum
    #[cfg_attr(feature = "serde", serde(rename = "Dq"))]
    pub dq: Vec<f64>,
    /// Mean squared error of each log-log fit
    #[cfg_attr(feature = "serde", serde(rename = "LSE"))]
    pub lse: Vec<f64>,
    /// R² of each log-log fit
    #[cfg_attr(feature = "serde", serde(rename = "R2"))]
    pub r2: Vec<f64>,
    /// Whether each moment order took the neutral fallback instead of a fit
    pub fit_fallback: Vec<bool>,
    /// Spectrum width
    pub multifractality: f64,
    /// Spectrum asymmetry
    pub asymmetry: f64,
}

impl MfdfaAnalysis {
    /// `(scale, Fq)` pairs for moment order index `q_index`.
    pub fn fluctuation_curve(&self, q_index: usize) -> Option<Vec<(usize, f64)>> {
        if q_index >= self.qs.len() {
            return None;
        }
        Some(
            self.scales
                .iter()
                .zip(&self.scaling_function)
                .map(|(&s, row)| (s, row[q_index]))
                .collect(),
        )
    }

    /// `(hq, Dq)` points of the singularity spectrum.
    pub fn spectrum_points(&self) -> Vec<(f64, f64)> {
        self.hq.iter().copied().zip(self.dq.iter().copied()).collect()
    }

    /// Indices of the integer moment orders (the ones usually labelled in plots).
    pub fn integer_moment_indices(&self) -> Vec<usize> {
        self.qs
            .iter()
            .enumerate()
            .filter(|(_, q)| q.fract() == 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether any moment order fell back to the neutral exponent.
    pub fn any_fallback(&self) -> bool {
        self.fit_fallback.iter().any(|&f| f)
    }
}

/// Run MF-DFA with automatic scales, q from -5 to 5 in steps of 0.25 and
/// linear detrending.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::mfdfa;
///
/// let series: Vec<f64> = (0..500).map(|i| ((i * 37 % 101) as f64).sin()).collect();
/// let result = mfdfa(&series).unwrap();
/// assert_eq!(result.qs.len(), 41);
/// assert!(result.multifractality >= 0.0);
/// ```
pub fn mfdfa(series: &[f64]) -> MfdfaResult<MfdfaAnalysis> {
    mfdfa_with_config(series, &MfdfaConfig::default())
}

/// Run MF-DFA with explicit scales, moment orders and polynomial order.
///
/// The moment orders are validated here: they must be uniformly spaced and
/// contain 0 and 2 exactly.
pub fn mfdfa_algorithm(
    series: &[f64],
    scales: &[usize],
    qs: &[f64],
    polynomial_order: usize,
) -> MfdfaResult<MfdfaAnalysis> {
    let config = MfdfaConfig {
        scales: Some(scales.to_vec()),
        moment_orders: MomentOrders::from_values(qs.to_vec())?,
        polynomial_order,
    };
    mfdfa_with_config(series, &config)
}

/// Run MF-DFA with a full configuration.
pub fn mfdfa_with_config(series: &[f64], config: &MfdfaConfig) -> MfdfaResult<MfdfaAnalysis> {
    validate_data_length(series, 2)?;
    validate_all_finite(series, "series")?;
    validate_parameter(
        config.polynomial_order as f64,
        0.0,
        MAX_POLYNOMIAL_ORDER as f64,
        "polynomial_order",
    )?;

    let scales = match &config.scales {
        Some(scales) => {
            validate_scales(scales, config.polynomial_order)?;
            scales.clone()
        }
        None => {
            let scales = select_scales(series.len());
            if scales.is_empty() {
                return Err(MfdfaError::InsufficientData {
                    required: minimum_series_length(),
                    actual: series.len(),
                });
            }
            validate_scales(&scales, config.polynomial_order)?;
            scales
        }
    };

    let qs = config.moment_orders.values();
    debug!(
        "MF-DFA on {} samples: {} scales ({}..={}), {} moment orders, polynomial order {}",
        series.len(),
        scales.len(),
        scales[0],
        scales[scales.len() - 1],
        qs.len(),
        config.polynomial_order
    );

    let profile = integrate_series(series)?;
    let variances = LocalVariances::compute(&profile, &scales, config.polynomial_order)?;
    let scaling_function = compute_fluctuation_function(&variances, qs);
    let fits = fit_scaling_exponents(&scales, &scaling_function, qs);

    let fallbacks = fits.iter().filter(|f| f.fallback).count();
    if fallbacks > 0 {
        warn!(
            "{} of {} moment orders used the neutral Hurst exponent",
            fallbacks,
            fits.len()
        );
    }

    let h_q: Vec<f64> = fits.iter().map(|f| f.hurst).collect();
    let spectrum = derive_spectrum(&config.moment_orders, &h_q)?;

    Ok(MfdfaAnalysis {
        series: series.to_vec(),
        scales,
        qs: qs.to_vec(),
        scaling_function,
        polynomial_coeff: fits.iter().map(|f| f.coefficients).collect(),
        lse: fits.iter().map(|f| f.mse).collect(),
        r2: fits.iter().map(|f| f.r_squared).collect(),
        fit_fallback: fits.iter().map(|f| f.fallback).collect(),
        h_q,
        hurst: spectrum.hurst,
        tq: spectrum.tq,
        hq: spectrum.hq,
        dq: spectrum.dq,
        multifractality: spectrum.multifractality,
        asymmetry: spectrum.asymmetry,
    })
}
