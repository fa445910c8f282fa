//! Tile Coder Benchmarks and Validation
//!
//! Measures:
//! 1. `predict` latency across input dimensionality and tiling count
//! 2. `update` latency across the same shapes
//! 3. Index computation alone (`active_tiles`)
//! 4. Validation: single-point convergence and locality on a trained coder

use std::hint::black_box;
use std::time::Instant;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cmac_core::{Interval, TileCoder, TileCoderConfig};

const POINTS: usize = 1024;

/// (n_dims, tiles per dim, tilings)
const SHAPES: &[(usize, usize, usize)] = &[
    (1, 16, 4),
    (2, 8, 8),
    (2, 16, 32),
    (4, 6, 16),
    (8, 4, 8),
];

fn main() -> Result<()> {
    println!("=== Tile Coder Benchmarks ===\n");

    for &(n_dims, tiles, tilings) in SHAPES {
        bench_shape(n_dims, tiles, tilings)?;
    }

    println!("=== Validation ===\n");
    validate_convergence()?;
    validate_locality()?;

    Ok(())
}

fn unit_config(n_dims: usize, tiles: usize, tilings: usize) -> TileCoderConfig {
    TileCoderConfig::new(vec![tiles; n_dims], vec![(0.0, 1.0); n_dims], tilings)
}

fn random_points(rng: &mut StdRng, limits: &[Interval], count: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|_| limits.iter().map(|l| l.low + rng.gen::<f64>() * l.range()).collect())
        .collect()
}

fn bench_shape(n_dims: usize, tiles: usize, tilings: usize) -> Result<()> {
    let cfg = unit_config(n_dims, tiles, tilings);
    let mut coder = TileCoder::new(cfg.clone())?;
    let mut rng = StdRng::seed_from_u64(42);
    let points = random_points(&mut rng, &cfg.limits, POINTS);
    let targets: Vec<f64> = (0..POINTS).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let iters = (200_000 / tilings).max(POINTS);

    let start = Instant::now();
    for i in 0..iters {
        let p = i % POINTS;
        coder.update(&points[p], targets[p])?;
    }
    let elapsed_update = start.elapsed();

    let start = Instant::now();
    let mut acc = 0.0;
    for i in 0..iters {
        acc += coder.predict(&points[i % POINTS])?;
    }
    let elapsed_predict = start.elapsed();
    black_box(acc);

    let start = Instant::now();
    for i in 0..iters {
        black_box(coder.active_tiles(&points[i % POINTS])?);
    }
    let elapsed_index = start.elapsed();

    println!(
        "[CPU] dims={} tiles={}^{} tilings={} ({} weights, {:.1} KiB)",
        n_dims,
        tiles,
        n_dims,
        tilings,
        coder.num_weights(),
        cfg.estimated_memory_bytes() as f64 / 1024.0,
    );
    for (label, elapsed) in [
        ("update", elapsed_update),
        ("predict", elapsed_predict),
        ("active_tiles", elapsed_index),
    ] {
        println!(
            "  {:<13} {} calls in {:.2}ms ({:.3}us/call)",
            label,
            iters,
            elapsed.as_secs_f64() * 1000.0,
            elapsed.as_secs_f64() * 1e6 / iters as f64,
        );
    }
    println!();
    Ok(())
}

fn validate_convergence() -> Result<()> {
    let start = Instant::now();
    let mut worst: f64 = 0.0;
    for tilings in [1, 2, 4, 8, 16, 32] {
        let mut coder = TileCoder::new(unit_config(2, 5, tilings).with_step_size(0.5))?;
        let x = [0.37, 0.81];
        for _ in 0..60 {
            coder.update(&x, -3.25)?;
        }
        worst = worst.max((coder.predict(&x)? + 3.25).abs());
    }
    let pass = worst < 1e-9;
    println!(
        "Convergence (tilings 1..32, 60 updates): max |err|={:.3e} in {:.2}ms ... {}",
        worst,
        start.elapsed().as_secs_f64() * 1000.0,
        if pass { "PASS" } else { "FAIL" },
    );
    println!();
    Ok(())
}

fn validate_locality() -> Result<()> {
    let cfg = unit_config(2, 4, 4);
    let mut rng = StdRng::seed_from_u64(7);
    let trials = 1000;
    let mut violations = 0;

    for _ in 0..trials {
        let mut coder = TileCoder::new(cfg.clone())?;
        let pts = random_points(&mut rng, &cfg.limits, 2);
        let t1 = coder.active_tiles(&pts[0])?;
        let t2 = coder.active_tiles(&pts[1])?;
        let shared = t1.iter().filter(|i| t2.contains(i)).count();

        coder.update(&pts[0], 1.0)?;
        let expected = shared as f64 * coder.alpha();
        if (coder.predict(&pts[1])? - expected).abs() > 1e-12 {
            violations += 1;
        }
    }

    println!(
        "Locality ({} random pairs): {} violations ... {}",
        trials,
        violations,
        if violations == 0 { "PASS" } else { "FAIL" },
    );
    println!();
    Ok(())
}
