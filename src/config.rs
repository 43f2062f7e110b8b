//! # Analysis Configuration
//!
//! Moment orders and the MF-DFA configuration. The moment-order grid is
//! built from integer step indices so that q = 0 and q = 2 are exact members
//! and can be located by equality.

use crate::errors::{MfdfaError, MfdfaResult};
use crate::math_utils::analysis_constants::{
    DEFAULT_POLYNOMIAL_ORDER, DEFAULT_Q_STEP, DEFAULT_Q_STEP_RANGE,
};
use crate::math_utils::constants::SPACING_RELATIVE_TOLERANCE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Validated, uniformly spaced set of moment orders containing 0 and 2.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct MomentOrders {
    values: Vec<f64>,
    step: f64,
    zero_index: usize,
    two_index: usize,
}

impl MomentOrders {
    /// Build `k * step` for every integer `k` in `k_min..=k_max`.
    ///
    /// # Example
    /// ```rust
    /// use mfdfa_toolkit::MomentOrders;
    ///
    /// let qs = MomentOrders::from_steps(-4, 8, 0.5).unwrap();
    /// assert_eq!(qs.values()[0], -2.0);
    /// assert_eq!(qs.values()[qs.two_index()], 2.0);
    /// ```
    pub fn from_steps(k_min: i32, k_max: i32, step: f64) -> MfdfaResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(MfdfaError::InvalidParameter {
                parameter: "q_step".to_string(),
                value: step,
                constraint: "finite and > 0".to_string(),
            });
        }
        if k_max <= k_min {
            return Err(MfdfaError::InvalidParameter {
                parameter: "q_step_range".to_string(),
                value: k_max as f64,
                constraint: format!("greater than lower step index {}", k_min),
            });
        }

        let values = (k_min..=k_max).map(|k| k as f64 * step).collect();
        Self::from_values(values)
    }

    /// Validate a caller-supplied list of moment orders.
    ///
    /// The list must be strictly increasing with constant spacing and contain
    /// 0.0 and 2.0 exactly.
    pub fn from_values(values: Vec<f64>) -> MfdfaResult<Self> {
        if values.len() < 2 {
            return Err(MfdfaError::InsufficientData {
                required: 2,
                actual: values.len(),
            });
        }

        if let Some(&q) = values.iter().find(|q| !q.is_finite()) {
            return Err(MfdfaError::InvalidParameter {
                parameter: "q".to_string(),
                value: q,
                constraint: "finite".to_string(),
            });
        }

        let step = values[1] - values[0];
        if step <= 0.0 {
            return Err(MfdfaError::InvalidParameter {
                parameter: "q_step".to_string(),
                value: step,
                constraint: "moment orders must be strictly increasing".to_string(),
            });
        }

        let tolerance = SPACING_RELATIVE_TOLERANCE * step.abs().max(1.0);
        for (index, pair) in values.windows(2).enumerate() {
            let actual = pair[1] - pair[0];
            if (actual - step).abs() > tolerance {
                return Err(MfdfaError::NonUniformMomentOrders {
                    index,
                    expected: step,
                    actual,
                });
            }
        }

        let position = |target: f64| {
            values
                .iter()
                .position(|&q| q == target)
                .ok_or(MfdfaError::MissingMomentOrder { q: target })
        };
        let zero_index = position(0.0)?;
        let two_index = position(2.0)?;

        Ok(Self {
            values,
            step,
            zero_index,
            two_index,
        })
    }

    /// Moment orders in increasing order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Spacing between consecutive moment orders.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Index of q = 0.
    pub fn zero_index(&self) -> usize {
        self.zero_index
    }

    /// Index of q = 2.
    pub fn two_index(&self) -> usize {
        self.two_index
    }

    /// Number of moment orders.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MomentOrders {
    /// -5.0 to 5.0 inclusive in steps of 0.25 (41 values).
    fn default() -> Self {
        let (k_min, k_max) = DEFAULT_Q_STEP_RANGE;
        Self {
            values: (k_min..=k_max).map(|k| k as f64 * DEFAULT_Q_STEP).collect(),
            step: DEFAULT_Q_STEP,
            zero_index: (-k_min) as usize,
            two_index: (-k_min + 8) as usize,
        }
    }
}

impl TryFrom<Vec<f64>> for MomentOrders {
    type Error = MfdfaError;

    fn try_from(values: Vec<f64>) -> MfdfaResult<Self> {
        Self::from_values(values)
    }
}

impl From<MomentOrders> for Vec<f64> {
    fn from(orders: MomentOrders) -> Self {
        orders.values
    }
}

/// Configuration for an MF-DFA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MfdfaConfig {
    /// Explicit window sizes; `None` selects them from the series length
    pub scales: Option<Vec<usize>>,
    /// Moment orders at which the fluctuation function is evaluated
    pub moment_orders: MomentOrders,
    /// Order of the detrending polynomial fitted in each window
    pub polynomial_order: usize,
}

impl Default for MfdfaConfig {
    fn default() -> Self {
        Self {
            scales: None,
            moment_orders: MomentOrders::default(),
            polynomial_order: DEFAULT_POLYNOMIAL_ORDER,
        }
    }
}

impl MfdfaConfig {
    /// Use explicit window sizes instead of automatic selection.
    pub fn with_scales(mut self, scales: Vec<usize>) -> Self {
        self.scales = Some(scales);
        self
    }

    /// Use a different moment-order set.
    pub fn with_moment_orders(mut self, moment_orders: MomentOrders) -> Self {
        self.moment_orders = moment_orders;
        self
    }

    /// Use a different detrending polynomial order.
    pub fn with_polynomial_order(mut self, polynomial_order: usize) -> Self {
        self.polynomial_order = polynomial_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_moment_orders() {
        let qs = MomentOrders::default();
        assert_eq!(qs.len(), 41);
        assert_eq!(qs.values()[0], -5.0);
        assert_eq!(qs.values()[40], 5.0);
        assert_eq!(qs.step(), 0.25);
        assert_eq!(qs.values()[qs.zero_index()], 0.0);
        assert_eq!(qs.values()[qs.two_index()], 2.0);

        // The shortcut constructor must agree with the validated path
        let validated = MomentOrders::from_steps(-20, 20, 0.25).unwrap();
        assert_eq!(validated, qs);
    }

    #[test]
    fn test_from_values_requires_zero_and_two() {
        let no_zero = vec![-1.5, -0.5, 0.5, 1.5, 2.5];
        assert!(matches!(
            MomentOrders::from_values(no_zero),
            Err(MfdfaError::MissingMomentOrder { q }) if q == 0.0
        ));

        let no_two = vec![-1.0, 0.0, 1.0];
        assert!(matches!(
            MomentOrders::from_values(no_two),
            Err(MfdfaError::MissingMomentOrder { q }) if q == 2.0
        ));
    }

    #[test]
    fn test_from_values_requires_uniform_spacing() {
        let uneven = vec![-1.0, 0.0, 1.0, 2.0, 4.0];
        match MomentOrders::from_values(uneven) {
            Err(MfdfaError::NonUniformMomentOrders {
                index,
                expected,
                actual,
            }) => {
                assert_eq!(index, 3);
                assert_eq!(expected, 1.0);
                assert_eq!(actual, 2.0);
            }
            other => panic!("Expected NonUniformMomentOrders, got {:?}", other),
        }
    }

    #[test]
    fn test_from_values_rejects_bad_lists() {
        assert!(MomentOrders::from_values(vec![]).is_err());
        assert!(MomentOrders::from_values(vec![2.0]).is_err());
        assert!(MomentOrders::from_values(vec![2.0, 1.0, 0.0]).is_err());
        assert!(MomentOrders::from_values(vec![0.0, 1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_from_steps_validation() {
        assert!(MomentOrders::from_steps(-4, 4, 0.0).is_err());
        assert!(MomentOrders::from_steps(4, -4, 0.5).is_err());
        // 0.3 steps never hit 2.0 exactly
        assert!(matches!(
            MomentOrders::from_steps(-10, 10, 0.3),
            Err(MfdfaError::MissingMomentOrder { .. })
        ));
        let qs = MomentOrders::from_steps(0, 4, 1.0).unwrap();
        assert_eq!(qs.values(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_config_builders() {
        let config = MfdfaConfig::default()
            .with_scales(vec![16, 32, 64])
            .with_polynomial_order(2)
            .with_moment_orders(MomentOrders::from_steps(-2, 2, 1.0).unwrap());

        assert_eq!(config.scales, Some(vec![16, 32, 64]));
        assert_eq!(config.polynomial_order, 2);
        assert_eq!(config.moment_orders.len(), 5);
        assert_eq!(MfdfaConfig::default().polynomial_order, 1);
        assert!(MfdfaConfig::default().scales.is_none());
    }
}
