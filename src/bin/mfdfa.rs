//! Command-line MF-DFA.
//!
//!   mfdfa returns.txt
//!   mfdfa --order 2 --scales 16,32,64,128 returns.txt
//!   cat returns.txt | mfdfa -

use clap::Parser;
use mfdfa_toolkit::{
    load_series, mfdfa_with_config, parse_series, MfdfaConfig, MfdfaError, MomentOrders,
};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(about = "Multifractal detrended fluctuation analysis of a numeric series")]
struct Args {
    /// File with one number per line (or comma/whitespace separated); `-` reads stdin
    path: String,

    /// Order of the detrending polynomial
    #[arg(short, long, default_value_t = 1)]
    order: usize,

    /// Explicit comma-separated window sizes instead of automatic selection
    #[arg(short, long, value_delimiter = ',')]
    scales: Option<Vec<usize>>,

    /// Spacing of the moment orders
    #[arg(long, default_value_t = 0.25)]
    q_step: f64,

    /// Largest |q|; must be a multiple of the spacing and at least 2
    #[arg(long, default_value_t = 5.0)]
    q_max: f64,

    /// Also print H(q) for every integer moment order
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: &str) -> Result<Vec<f64>, MfdfaError> {
    if path == "-" {
        let text = std::io::read_to_string(std::io::stdin()).map_err(|e| MfdfaError::IoError {
            operation: "reading stdin".to_string(),
            source: Some(Arc::new(e)),
        })?;
        parse_series(&text)
    } else {
        load_series(path)
    }
}

/// Number of q steps on each side of zero; `q_max` must be a whole multiple of `q_step`.
fn step_count(q_max: f64, q_step: f64) -> Result<i32, MfdfaError> {
    let invalid = || MfdfaError::InvalidParameter {
        parameter: "q_max".to_string(),
        value: q_max,
        constraint: format!("positive whole multiple of q_step {}", q_step),
    };

    if !(q_step.is_finite() && q_step > 0.0) {
        return Err(MfdfaError::InvalidParameter {
            parameter: "q_step".to_string(),
            value: q_step,
            constraint: "finite and > 0".to_string(),
        });
    }

    let ratio = q_max / q_step;
    let steps = ratio.round();
    if !ratio.is_finite() || steps < 1.0 || steps > i32::MAX as f64 {
        return Err(invalid());
    }
    if (ratio - steps).abs() > 1e-9 * steps {
        return Err(invalid());
    }
    Ok(steps as i32)
}

fn build_config(args: &Args) -> Result<MfdfaConfig, MfdfaError> {
    let k = step_count(args.q_max, args.q_step)?;
    let moment_orders = MomentOrders::from_steps(-k, k, args.q_step)?;

    let mut config = MfdfaConfig::default()
        .with_moment_orders(moment_orders)
        .with_polynomial_order(args.order);
    if let Some(scales) = &args.scales {
        config = config.with_scales(scales.clone());
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), MfdfaError> {
    let series = read_input(&args.path)?;
    let config = build_config(args)?;
    log::info!(
        "Analysing {} values with polynomial order {}",
        series.len(),
        config.polynomial_order
    );

    let result = mfdfa_with_config(&series, &config)?;

    println!(
        "H: {:.2}, Multifractality: {:.2}, Asymmetry: {:.2}",
        result.hurst, result.multifractality, result.asymmetry
    );

    if args.verbose {
        println!("scales: {:?}", result.scales);
        for i in result.integer_moment_indices() {
            let flag = if result.fit_fallback[i] { " (fallback)" } else { "" };
            println!(
                "q = {:>5.1}  H(q) = {:.4}  R2 = {:.4}{}",
                result.qs[i], result.h_q[i], result.r2[i], flag
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mfdfa=info,mfdfa_toolkit=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
