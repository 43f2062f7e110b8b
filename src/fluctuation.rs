//! Bidirectional detrended variance estimation and the q-order fluctuation function.
//!
//! For every scale `s` the profile is cut into windows of `s` samples twice,
//! once from the start and once from the end (by windowing the reversed
//! profile), so the tail of the series is covered by complete windows as
//! well. A polynomial of order `m` is fitted to each window against the local
//! index `0..s` and the mean squared residual is kept.
//!
//! The windows of each scale are stored as a ragged row. The fixed-width,
//! NaN-padded layout of the classic formulation can be reconstructed with
//! [`LocalVariances::to_padded_matrix`]; it carries no extra information
//! because padding cells are always masked out of the moment averages.

use crate::errors::{MfdfaError, MfdfaResult};
use crate::math_utils::analysis_constants::VARIANCE_MASK_THRESHOLD;
use crate::math_utils::constants::{DEFAULT_EPSILON, MIN_VARIANCE};
use crate::math_utils::float_ops::nan_to_zero;
use crate::windowing::WindowView;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Polynomial detrending prepared once per scale.
///
/// The abscissa `0..s` is the same for every window of a scale, so the
/// least-squares operator is built once and reused.
#[derive(Debug, Clone)]
enum Detrender {
    /// Closed-form straight-line fit on centered abscissa.
    Linear { center: f64, sxx: f64 },
    /// General order via a precomputed pseudo-inverse of the Vandermonde matrix.
    Polynomial {
        design: DMatrix<f64>,
        pseudo_inverse: DMatrix<f64>,
    },
}

impl Detrender {
    fn new(scale: usize, polynomial_order: usize) -> MfdfaResult<Self> {
        if scale <= polynomial_order {
            return Err(MfdfaError::InvalidParameter {
                parameter: "scale".to_string(),
                value: scale as f64,
                constraint: format!("> polynomial order {}", polynomial_order),
            });
        }

        if polynomial_order == 1 {
            let s = scale as f64;
            let center = (s - 1.0) / 2.0;
            // sum (i - center)^2 for i in 0..s
            let sxx = s * (s * s - 1.0) / 12.0;
            if sxx < MIN_VARIANCE {
                return Err(MfdfaError::NumericalError {
                    reason: format!("Linear detrending is singular for scale {}", scale),
                    operation: Some("detrend".to_string()),
                });
            }
            return Ok(Detrender::Linear { center, sxx });
        }

        // Map the window index onto [-1, 1] to keep the Vandermonde matrix
        // well conditioned; residuals do not depend on the affine change.
        let half_span = ((scale - 1) as f64 / 2.0).max(1.0);
        let design = DMatrix::from_fn(scale, polynomial_order + 1, |i, j| {
            ((i as f64 - (scale - 1) as f64 / 2.0) / half_span).powi(j as i32)
        });

        let pseudo_inverse = design
            .clone()
            .pseudo_inverse(DEFAULT_EPSILON)
            .map_err(|reason| MfdfaError::NumericalError {
                reason: format!(
                    "Polynomial detrending of order {} failed for scale {}: {}",
                    polynomial_order, scale, reason
                ),
                operation: Some("detrend".to_string()),
            })?;

        Ok(Detrender::Polynomial {
            design,
            pseudo_inverse,
        })
    }

    /// Mean squared residual of the fitted trend over one window.
    fn mean_squared_residual(&self, window: &[f64]) -> f64 {
        let n = window.len() as f64;
        match self {
            Detrender::Linear { center, sxx } => {
                let mean_y = window.iter().sum::<f64>() / n;
                let sxy: f64 = window
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| (i as f64 - center) * (y - mean_y))
                    .sum();
                let slope = sxy / sxx;

                window
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| {
                        let residual = y - (mean_y + slope * (i as f64 - center));
                        residual * residual
                    })
                    .sum::<f64>()
                    / n
            }
            Detrender::Polynomial {
                design,
                pseudo_inverse,
            } => {
                let y = DVector::from_column_slice(window);
                let coefficients = pseudo_inverse * &y;
                let fitted = design * coefficients;
                (y - fitted).norm_squared() / n
            }
        }
    }
}

/// Detrended variances of all windows at one scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleVariances {
    /// Window length
    pub scale: usize,
    /// Windows taken from the start of the profile
    pub forward: Vec<f64>,
    /// Windows taken from the end of the profile (reversed profile)
    pub reverse: Vec<f64>,
}

impl ScaleVariances {
    /// Number of windows in each direction.
    pub fn windows_per_direction(&self) -> usize {
        self.forward.len()
    }

    /// Whether the scale produced no window at all.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }

    /// Forward windows followed by reverse windows.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.forward.iter().chain(self.reverse.iter())
    }
}

/// Ragged matrix of local variances, one row per scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalVariances {
    profile_len: usize,
    rows: Vec<ScaleVariances>,
}

impl LocalVariances {
    /// Estimate the bidirectional local variances of `profile` at every scale.
    ///
    /// A scale longer than the profile yields an empty row rather than an
    /// error; it contributes no data downstream.
    pub fn compute(
        profile: &[f64],
        scales: &[usize],
        polynomial_order: usize,
    ) -> MfdfaResult<Self> {
        let reversed: Vec<f64> = profile.iter().rev().copied().collect();

        let estimate = |&scale: &usize| -> MfdfaResult<ScaleVariances> {
            let detrender = Detrender::new(scale, polynomial_order)?;
            let forward: Vec<f64> = WindowView::new(profile, scale)?
                .iter()
                .map(|w| detrender.mean_squared_residual(w))
                .collect();
            let reverse: Vec<f64> = WindowView::new(&reversed, scale)?
                .iter()
                .map(|w| detrender.mean_squared_residual(w))
                .collect();

            if forward.is_empty() {
                warn!(
                    "Scale {} exceeds series length {}; no windows available",
                    scale,
                    profile.len()
                );
            }

            Ok(ScaleVariances {
                scale,
                forward,
                reverse,
            })
        };

        #[cfg(feature = "parallel")]
        let rows = {
            use rayon::prelude::*;
            scales
                .par_iter()
                .map(estimate)
                .collect::<MfdfaResult<Vec<_>>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let rows = scales
            .iter()
            .map(estimate)
            .collect::<MfdfaResult<Vec<_>>>()?;

        debug!(
            "Estimated local variances for {} scales over {} profile samples",
            rows.len(),
            profile.len()
        );

        Ok(Self {
            profile_len: profile.len(),
            rows,
        })
    }

    /// Rows in scale order.
    pub fn rows(&self) -> &[ScaleVariances] {
        &self.rows
    }

    /// Length of the profile the variances were computed from.
    pub fn profile_len(&self) -> usize {
        self.profile_len
    }

    /// Fixed-width layout with NaN padding.
    ///
    /// The width is `2 * N / s0` for the first scale `s0`. The row for scale
    /// `s` starts at `width / 2 - N / s`, forward windows first, reverse windows
    /// immediately after. Useful for comparing against published matrices.
    pub fn to_padded_matrix(&self) -> Vec<Vec<f64>> {
        let Some(first) = self.rows.first() else {
            return Vec::new();
        };

        let width = 2 * self.profile_len / first.scale;
        self.rows
            .iter()
            .map(|row| {
                let mut padded = vec![f64::NAN; width];
                let offset = (width / 2).saturating_sub(self.profile_len / row.scale);
                for (cell, &value) in padded.iter_mut().skip(offset).zip(row.iter()) {
                    *cell = value;
                }
                padded
            })
            .collect()
    }
}

/// Variances that survive masking.
///
/// NaN entries are treated as zero and then removed together with every
/// variance below [`VARIANCE_MASK_THRESHOLD`].
pub fn masked_variances<'a, I>(variances: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    variances
        .into_iter()
        .map(|&v| nan_to_zero(v))
        .filter(|&v| v >= VARIANCE_MASK_THRESHOLD)
        .collect()
}

/// q-order generalized mean fluctuation of already masked variances.
///
/// For `q != 0`: `(mean(v^(q/2)))^(1/q)`. For `q == 0` the power mean is
/// replaced by its limit `exp(0.5 * mean(ln v))`. An empty input yields 0.
pub fn generalized_fluctuation(masked: &[f64], q: f64) -> f64 {
    if masked.is_empty() {
        return 0.0;
    }

    let n = masked.len() as f64;
    if q == 0.0 {
        let mean_log = masked.iter().map(|v| v.ln()).sum::<f64>() / n;
        (0.5 * mean_log).exp()
    } else {
        let mean_moment = masked.iter().map(|v| v.powf(q / 2.0)).sum::<f64>() / n;
        mean_moment.powf(1.0 / q)
    }
}

/// Fluctuation function `Fq[scale][q]`.
///
/// Cells whose scale has no variance left after masking are 0.
pub fn compute_fluctuation_function(variances: &LocalVariances, qs: &[f64]) -> Vec<Vec<f64>> {
    variances
        .rows()
        .iter()
        .map(|row| {
            let masked = masked_variances(row.iter());
            if masked.is_empty() {
                debug!("All local variances masked at scale {}", row.scale);
            }
            qs.iter()
                .map(|&q| generalized_fluctuation(&masked, q))
                .collect()
        })
        .collect()
}
