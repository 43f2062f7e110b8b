//! # MF-DFA Toolkit
//!
//! Multifractal Detrended Fluctuation Analysis of one-dimensional series.
//!
//! MF-DFA measures how the fluctuations of a series scale with window size,
//! separately for small and large fluctuations. The outcome is a generalized
//! Hurst exponent H(q) per moment order q and the multifractal spectrum
//! derived from it.
//!
//! ## Quick Start
//!
//! ```rust
//! use mfdfa_toolkit::generators::{generate_fractional_gaussian_noise, GeneratorConfig};
//! use mfdfa_toolkit::mfdfa;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let series = generate_fractional_gaussian_noise(&GeneratorConfig::seeded(4096, 1), 0.7)?;
//!     let result = mfdfa(&series)?;
//!
//!     println!(
//!         "H: {:.2}, Multifractality: {:.2}, Asymmetry: {:.2}",
//!         result.hurst, result.multifractality, result.asymmetry
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Profile**: mean-centred cumulative sum ([`math_utils::integrate_series`])
//! 2. **Scales**: geometric window sizes from 16 up to a third of the series
//!    ([`scales::select_scales`])
//! 3. **Local variances**: polynomial detrending in non-overlapping windows,
//!    cut from both ends of the profile ([`fluctuation::LocalVariances`])
//! 4. **Fluctuation function**: q-th order mean over windows, with
//!    near-zero variances masked ([`fluctuation::compute_fluctuation_function`])
//! 5. **Scaling exponents**: log2-log2 regression per q
//!    ([`regression::fit_scaling_exponents`])
//! 6. **Spectrum**: Legendre transform and summaries
//!    ([`spectrum::derive_spectrum`])
//!
//! ## Features
//!
//! - `parallel`: fan out over scales and moment orders with rayon
//! - `serde`: serialize configurations and results
//! - `cli`: the `mfdfa` command-line binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod math_utils;
pub mod series_io;

// Analysis stages
pub mod analysis;
pub mod fluctuation;
pub mod regression;
pub mod scales;
pub mod spectrum;
pub mod windowing;

// Synthetic data
pub mod generators;

pub use analysis::{mfdfa, mfdfa_algorithm, mfdfa_with_config, MfdfaAnalysis};
pub use config::{MfdfaConfig, MomentOrders};
pub use errors::{MfdfaError, MfdfaResult};
pub use fluctuation::{compute_fluctuation_function, LocalVariances, ScaleVariances};
pub use generators::{
    generate_fractional_gaussian_noise, generate_random_walk, generate_white_noise,
    GeneratorConfig,
};
pub use math_utils::{fit_line, integrate_series, LineFit};
pub use regression::{fit_scaling_exponent, fit_scaling_exponents, ScalingFit};
pub use scales::{minimum_series_length, select_scales};
pub use series_io::{load_series, parse_series};
pub use spectrum::{derive_spectrum, SingularitySpectrum};
pub use windowing::WindowView;
