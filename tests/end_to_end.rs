//! End-to-end MF-DFA scenarios on synthetic series with known scaling.
//!
//! All series come from the seeded generators, so every run sees the same
//! data. Tolerances allow for finite-sample scatter of the estimates.

use mfdfa_toolkit::{
    generate_fractional_gaussian_noise, generate_random_walk, generate_white_noise, mfdfa,
    mfdfa_with_config, GeneratorConfig, MfdfaConfig, MomentOrders,
};

fn q_index(qs: &[f64], q: f64) -> usize {
    qs.iter().position(|&v| v == q).unwrap()
}

/// White noise: H(2) within 0.05 of 0.5, small but non-zero spectrum width,
/// asymmetry near 0 on average.
#[test]
fn test_white_noise_scenario() {
    let seeds = [1u64, 2, 3, 4, 5];
    let mut asymmetries = Vec::new();

    for &seed in &seeds {
        let noise = generate_white_noise(&GeneratorConfig::seeded(10_000, seed)).unwrap();
        let result = mfdfa(&noise).unwrap();

        assert!(
            (result.hurst - 0.5).abs() < 0.05,
            "seed {}: H = {}",
            seed,
            result.hurst
        );
        assert!(result.multifractality > 0.0);
        assert!(
            result.multifractality < 1.0,
            "seed {}: width {}",
            seed,
            result.multifractality
        );
        assert!(result.asymmetry.is_finite());
        assert!(!result.any_fallback());

        asymmetries.push(result.asymmetry.abs());
    }

    // A single narrow spectrum can be lopsided; the average stays small
    let mean_abs_asymmetry = asymmetries.iter().sum::<f64>() / asymmetries.len() as f64;
    assert!(
        mean_abs_asymmetry < 0.5,
        "mean |asymmetry| = {} ({:?})",
        mean_abs_asymmetry,
        asymmetries
    );
}

/// Random walk: the profile is integrated twice, so DFA reports H(2) near 1.5.
#[test]
fn test_random_walk_scenario() {
    for seed in [10u64, 11, 12] {
        let walk = generate_random_walk(&GeneratorConfig::seeded(10_000, seed)).unwrap();
        let result = mfdfa(&walk).unwrap();
        assert!(
            (result.hurst - 1.5).abs() < 0.1,
            "seed {}: H = {}",
            seed,
            result.hurst
        );
    }
}

/// Fractional Gaussian noise with H = 0.7: the core scaling scenario.
#[test]
fn test_fractional_gaussian_noise_scaling() {
    let n = 8192;
    let fgn = generate_fractional_gaussian_noise(&GeneratorConfig::seeded(n, 2024), 0.7).unwrap();
    let result = mfdfa(&fgn).unwrap();
    let two = q_index(&result.qs, 2.0);

    assert!(
        (result.hurst - 0.7).abs() < 0.1,
        "H = {}, expected 0.7",
        result.hurst
    );
    assert!(!result.fit_fallback[two]);
    assert!(result.r2[two] > 0.98, "R2 = {}", result.r2[two]);
    assert!(result.lse[two] < 0.01, "LSE = {}", result.lse[two]);

    // Fq(q = 2) is non-decreasing over every selected scale
    let fluctuations: Vec<f64> = result
        .fluctuation_curve(two)
        .unwrap()
        .iter()
        .map(|&(_, f)| f)
        .collect();
    assert_eq!(fluctuations.len(), result.scales.len());
    for pair in fluctuations.windows(2) {
        assert!(pair[1] >= pair[0], "Fq not increasing: {:?}", fluctuations);
    }
}

/// Anti-persistent and persistent noise are told apart.
#[test]
fn test_hurst_ordering_across_generators() {
    let config = GeneratorConfig::seeded(8192, 99);
    let anti = mfdfa(&generate_fractional_gaussian_noise(&config, 0.3).unwrap()).unwrap();
    let persistent = mfdfa(&generate_fractional_gaussian_noise(&config, 0.8).unwrap()).unwrap();
    assert!(anti.hurst < 0.45, "H = {}", anti.hurst);
    assert!(persistent.hurst > 0.65, "H = {}", persistent.hurst);
}

/// Constant input has no fluctuation at all: every q falls back.
#[test]
fn test_constant_series() {
    let result = mfdfa(&vec![1.25; 2000]).unwrap();
    assert!(result.fit_fallback.iter().all(|&f| f));
    assert!(result.h_q.iter().all(|&h| h == 0.5));
    assert!(result.lse.iter().all(|&e| e == 0.0));
    assert!(result.r2.iter().all(|&r| r == 0.0));
    assert!(result.polynomial_coeff.iter().all(|c| *c == [0.0, 0.0]));
    assert_eq!(result.hurst, 0.5);
    assert_eq!(result.multifractality, 0.0);
    assert_eq!(result.asymmetry, 0.0);
}

/// The same input always produces the same bundle.
#[test]
fn test_repeated_runs_are_identical() {
    let series = generate_white_noise(&GeneratorConfig::seeded(3000, 8)).unwrap();
    let first = mfdfa(&series).unwrap();
    let second = mfdfa(&series).unwrap();
    assert_eq!(first, second);
}

/// Shifting and scaling the input only moves the intercepts.
#[test]
fn test_affine_invariance_of_exponents() {
    let series = generate_fractional_gaussian_noise(&GeneratorConfig::seeded(4096, 5), 0.6).unwrap();
    let shifted: Vec<f64> = series.iter().map(|x| 3.0 * x + 100.0).collect();

    let base = mfdfa(&series).unwrap();
    let moved = mfdfa(&shifted).unwrap();

    let two = q_index(&base.qs, 2.0);
    assert!((base.h_q[two] - moved.h_q[two]).abs() < 1e-9);
    // log2(3) offset in the intercept
    assert!(
        (moved.polynomial_coeff[two][1] - base.polynomial_coeff[two][1] - 3f64.log2()).abs() < 1e-9
    );
}

/// Quadratic detrending with a coarser q grid.
#[test]
fn test_second_order_detrending() {
    let fgn = generate_fractional_gaussian_noise(&GeneratorConfig::seeded(8192, 31), 0.7).unwrap();
    let config = MfdfaConfig::default()
        .with_polynomial_order(2)
        .with_moment_orders(MomentOrders::from_steps(-6, 6, 0.5).unwrap());
    let result = mfdfa_with_config(&fgn, &config).unwrap();

    assert_eq!(result.qs.len(), 13);
    assert_eq!(result.hq.len(), 12);
    assert!((result.hurst - 0.7).abs() < 0.1, "H = {}", result.hurst);
    assert!(!result.any_fallback());
}

/// Generalized Hurst exponents of a monofractal barely depend on q.
#[test]
fn test_h_q_profile_of_fgn() {
    let fgn = generate_fractional_gaussian_noise(&GeneratorConfig::seeded(16_384, 77), 0.7).unwrap();
    let result = mfdfa(&fgn).unwrap();

    for (&q, &h) in result.qs.iter().zip(&result.h_q) {
        if q.abs() <= 2.0 {
            assert!((h - 0.7).abs() < 0.15, "H({}) = {}", q, h);
        }
    }
    assert_eq!(result.spectrum_points().len(), result.qs.len() - 1);
}
