//! Multifractal spectrum via the Legendre transform.
//!
//! From the generalized Hurst exponents H(q):
//!
//! - mass exponents `τ(q) = q·H(q) − 1`
//! - singularity strengths `h_i = (τ_{i+1} − τ_i) / Δq`
//! - singularity spectrum `D_i = q_i·h_i − τ_i`
//!
//! and the scalar summaries: spectrum width (multifractality), its
//! asymmetry around H(0), and the Hurst exponent H(2).

use crate::config::MomentOrders;
use crate::errors::{MfdfaError, MfdfaResult};
use crate::math_utils::float_ops;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Singularity spectrum and its scalar summaries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingularitySpectrum {
    /// Mass exponents τ(q), one per moment order
    pub tq: Vec<f64>,
    /// Singularity strengths, one fewer than the moment orders
    pub hq: Vec<f64>,
    /// Singularity spectrum D, aligned with `hq`
    pub dq: Vec<f64>,
    /// Width of the spectrum, `max(hq) − min(hq)`
    pub multifractality: f64,
    /// Skew of the spectrum around H(0)
    pub asymmetry: f64,
    /// H(q) at q = 0
    pub alpha_zero: f64,
    /// H(q) at q = 2
    pub hurst: f64,
}

/// Derive the spectrum from per-q Hurst exponents.
///
/// `hurst_exponents[i]` must belong to `moment_orders.values()[i]`. A zero
/// width spectrum (monofractal) has asymmetry 0.
pub fn derive_spectrum(
    moment_orders: &MomentOrders,
    hurst_exponents: &[f64],
) -> MfdfaResult<SingularitySpectrum> {
    let qs = moment_orders.values();
    if hurst_exponents.len() != qs.len() {
        return Err(MfdfaError::InvalidParameter {
            parameter: "hurst_exponents".to_string(),
            value: hurst_exponents.len() as f64,
            constraint: format!("one exponent per moment order ({})", qs.len()),
        });
    }

    let step = moment_orders.step();

    let tq: Vec<f64> = qs
        .iter()
        .zip(hurst_exponents)
        .map(|(&q, &h)| h * q - 1.0)
        .collect();

    let hq: Vec<f64> = tq.windows(2).map(|t| (t[1] - t[0]) / step).collect();

    let dq: Vec<f64> = qs
        .iter()
        .zip(&tq)
        .zip(&hq)
        .map(|((&q, &t), &h)| q * h - t)
        .collect();

    let h_max = hq.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let h_min = hq.iter().copied().fold(f64::INFINITY, f64::min);
    let multifractality = h_max - h_min;

    let alpha_zero = hurst_exponents[moment_orders.zero_index()];
    let hurst = hurst_exponents[moment_orders.two_index()];

    let asymmetry = if float_ops::approx_zero(multifractality) {
        0.0
    } else {
        ((h_max - alpha_zero) - (alpha_zero - h_min)) / multifractality
    };

    Ok(SingularitySpectrum {
        tq,
        hq,
        dq,
        multifractality,
        asymmetry,
        alpha_zero,
        hurst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_monofractal_spectrum_is_a_point() {
        let qs = MomentOrders::default();
        let hurst = vec![0.7; qs.len()];
        let spectrum = derive_spectrum(&qs, &hurst).unwrap();

        assert_eq!(spectrum.tq.len(), 41);
        assert_eq!(spectrum.hq.len(), 40);
        assert_eq!(spectrum.dq.len(), 40);
        assert!(spectrum.multifractality >= 0.0);
        assert!(spectrum.multifractality < 1e-12);
        assert_eq!(spectrum.asymmetry, 0.0);
        assert_eq!(spectrum.hurst, 0.7);
        assert_eq!(spectrum.alpha_zero, 0.7);

        for (&h, &d) in spectrum.hq.iter().zip(&spectrum.dq) {
            assert_approx_eq!(h, 0.7, 1e-12);
            // D = q*H - (q*H - 1) = 1 for a monofractal
            assert_approx_eq!(d, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_neutral_fallback_spectrum_is_exact() {
        let qs = MomentOrders::default();
        let spectrum = derive_spectrum(&qs, &vec![0.5; qs.len()]).unwrap();
        assert!(spectrum.hq.iter().all(|&h| h == 0.5));
        assert_eq!(spectrum.multifractality, 0.0);
        assert_eq!(spectrum.asymmetry, 0.0);
        assert_eq!(spectrum.hurst, 0.5);
    }

    #[test]
    fn test_hand_computed_spectrum() {
        let qs = MomentOrders::from_steps(-1, 2, 1.0).unwrap(); // -1, 0, 1, 2
        let hurst = [0.9, 0.8, 0.7, 0.6];
        let spectrum = derive_spectrum(&qs, &hurst).unwrap();

        // tq = [-1.9, -1.0, -0.3, 0.2]
        let expected_tq = [-1.9, -1.0, -0.3, 0.2];
        for (t, e) in spectrum.tq.iter().zip(expected_tq) {
            assert_approx_eq!(t, e, 1e-12);
        }
        // hq = [0.9, 0.7, 0.5]
        let expected_hq = [0.9, 0.7, 0.5];
        for (h, e) in spectrum.hq.iter().zip(expected_hq) {
            assert_approx_eq!(h, e, 1e-12);
        }
        // dq = q*h - t for q = -1, 0, 1
        let expected_dq = [-0.9 + 1.9, 1.0, 0.5 + 0.3];
        for (d, e) in spectrum.dq.iter().zip(expected_dq) {
            assert_approx_eq!(d, e, 1e-12);
        }

        assert_approx_eq!(spectrum.multifractality, 0.4, 1e-12);
        assert_eq!(spectrum.alpha_zero, 0.8);
        assert_eq!(spectrum.hurst, 0.6);
        // ((0.9 - 0.8) - (0.8 - 0.5)) / 0.4 = -0.5
        assert_approx_eq!(spectrum.asymmetry, -0.5, 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let qs = MomentOrders::default();
        assert!(matches!(
            derive_spectrum(&qs, &[0.5, 0.5]),
            Err(MfdfaError::InvalidParameter { .. })
        ));
    }
}
