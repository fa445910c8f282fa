// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! `cmac-train`: learn a noisy 2-D surface online and plot the result.
//!
//! Streams `iterations × batch_size` samples of `sin(x) + cos(y) + noise·N(0,1)`
//! through a tile coder, logs the per-batch MSE, then sweeps the learned
//! function on a dense grid, scores it against the noiseless target and
//! writes a standalone HTML surface plot.
//!
//! ```bash
//! cmac-train --iterations 200 --batch-size 50 --output surface.html
//! cmac-train --config coder.json --noise 0.0 --log-level debug
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use cmac_core::{train_batch, Interval, Sample, TileCoder, TileCoderConfig, TrainingLog};
use cmac_viz::{render_surface, SurfaceGrid, SurfaceStats, Theme};

/// Command-line arguments for the training driver.
#[derive(Parser, Debug)]
#[command(
    name = "cmac-train",
    version,
    about = "Online tile-coder training on a noisy sinusoid surface",
    long_about = None
)]
struct Args {
    /// JSON tile-coder configuration. Must describe a 2-D input space.
    ///
    /// Without it the built-in sinusoid preset is used.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of training batches.
    #[arg(long, default_value_t = 200)]
    iterations: usize,

    /// Samples per batch.
    #[arg(long, default_value_t = 50)]
    batch_size: usize,

    /// Standard deviation of the Gaussian noise added to each target.
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    /// RNG seed for sample positions and noise.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Grid points per axis for the evaluation sweep.
    #[arg(long, default_value_t = 100)]
    resolution: usize,

    /// Write the learned surface as an HTML page to this path.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use the light color theme for the HTML output.
    #[arg(long, default_value_t = false)]
    light: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn target_fn(x: f64, y: f64) -> f64 {
    x.sin() + y.cos()
}

/// Standard normal draw via the Box–Muller transform.
fn gaussian(rng: &mut StdRng) -> f64 {
    // 1 - U keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn uniform_in(rng: &mut StdRng, lim: &Interval) -> f64 {
    lim.low + rng.gen::<f64>() * lim.range()
}

fn load_config(path: Option<&PathBuf>) -> Result<TileCoderConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TileCoderConfig::from_json(path)
                .with_context(|| format!("loading tile coder config {}", path.display()))?
        }
        None => {
            info!("No configuration file provided, using the sinusoid preset");
            TileCoderConfig::sinusoid_surface()
        }
    };
    if config.n_dims() != 2 {
        bail!("cmac-train needs a 2-D configuration, got {} dims", config.n_dims());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    if args.batch_size == 0 {
        bail!("--batch-size must be > 0");
    }
    if !args.noise.is_finite() || args.noise < 0.0 {
        bail!("--noise must be a finite, non-negative standard deviation");
    }

    let config = load_config(args.config.as_ref())?;
    let mut coder = TileCoder::new(config.clone()).context("constructing tile coder")?;

    info!("Configuration validated successfully");
    info!("  tiles/dim : {:?}", config.dims);
    info!("  tilings   : {}", coder.num_tilings());
    info!("  weights   : {}", coder.num_weights());
    info!("  step size : {} (alpha {:.5})", coder.step_size(), coder.alpha());
    info!("  samples   : {} × {}", args.iterations, args.batch_size);
    info!("  noise     : {}", args.noise);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut log = TrainingLog::new();
    let limits = config.limits.clone();
    let start = Instant::now();

    for _ in 0..args.iterations {
        let batch: Vec<Sample> = (0..args.batch_size)
            .map(|_| {
                let x = uniform_in(&mut rng, &limits[0]);
                let y = uniform_in(&mut rng, &limits[1]);
                let z = target_fn(x, y) + args.noise * gaussian(&mut rng);
                Sample::new(vec![x, y], z)
            })
            .collect();

        let batch_mse = train_batch(&mut coder, &batch)?;
        let report = log.record(batch.len(), batch_mse);
        info!("samples: {} batch_mse: {:.6}", report.samples_seen, report.batch_mse);
    }

    let elapsed = start.elapsed();
    info!(
        "Trained on {} samples in {:.2}ms ({:.2}us/sample)",
        log.samples_seen(),
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1e6 / log.samples_seen().max(1) as f64,
    );

    let learned = SurfaceGrid::sample(&coder, args.resolution)?;
    let truth = SurfaceGrid::from_fn(limits[0], limits[1], args.resolution, target_fn)?;
    let grid_mse = learned.mse_against(&truth)?;
    info!("Noiseless MSE over {0}×{0} grid: {1:.6}", args.resolution, grid_mse);
    if let Some(trailing) = log.trailing_mse(10) {
        info!("Trailing batch MSE (10 batches): {:.6}", trailing);
    }

    match args.output {
        Some(path) => {
            let theme = if args.light { Theme::Light } else { Theme::Dark };
            let stats = SurfaceStats::collect(&coder, &log).with_grid_mse(grid_mse);
            let html = render_surface(&learned, &stats, theme);
            std::fs::write(&path, html)
                .with_context(|| format!("writing surface plot to {}", path.display()))?;
            info!("Surface plot written to {}", path.display());
        }
        None => warn!("No --output given, skipping the surface plot"),
    }

    Ok(())
}
