//! Tile Coder Training Demo
//!
//! Shows the construct → update → predict loop on three small tasks:
//! 1. Sine wave approximation (1-D, coarse vs. fine tilings)
//! 2. XOR-like step surface (2-D, discontinuous target)
//! 3. Step-size annealing with `set_step_size`
//!
//! Run: cargo run --release --example train_demo -p cmac-core

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cmac_core::{nmse, train_batch, Sample, TileCoder, TileCoderConfig};

fn main() -> cmac_core::Result<()> {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║          Tile Coder (CMAC) Demo                  ║");
    println!("╠══════════════════════════════════════════════════╣");
    println!("║ Weights:  one table per tiling, summed           ║");
    println!("║ Learning: LMS update, alpha = step / tilings     ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    task_sine_approximation()?;
    task_step_surface()?;
    task_annealing()?;
    Ok(())
}

fn eval_1d(coder: &TileCoder, f: impl Fn(f64) -> f64, n: usize) -> cmac_core::Result<f64> {
    let mut predicted = Vec::with_capacity(n);
    let mut actual = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f64 / n as f64;
        predicted.push(coder.predict(&[x])?);
        actual.push(f(x));
    }
    nmse(&predicted, &actual)
}

// ─── Task 1: Sine Wave Approximation ──────────────────

fn task_sine_approximation() -> cmac_core::Result<()> {
    println!("━━━ Task 1: Sine Wave Approximation ━━━");
    println!("  y = sin(2*pi*x) for x in [0, 1)");
    println!();

    let f = |x: f64| (2.0 * std::f64::consts::PI * x).sin();
    for tilings in [1, 4, 16] {
        let cfg = TileCoderConfig::new(vec![10], vec![(0.0, 1.0)], tilings).with_step_size(0.3);
        let mut coder = TileCoder::new(cfg)?;
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..4000 {
            let x: f64 = rng.gen();
            coder.update(&[x], f(x))?;
        }
        println!(
            "  tilings={:>2}  weights={:>3}  NMSE={:.5}",
            tilings,
            coder.num_weights(),
            eval_1d(&coder, f, 500)?,
        );
    }
    println!();
    Ok(())
}

// ─── Task 2: Step Surface ─────────────────────────────

fn task_step_surface() -> cmac_core::Result<()> {
    println!("━━━ Task 2: XOR Step Surface ━━━");
    println!("  z = 1 where exactly one of x, y is >= 0.5, else 0");
    println!();

    let f = |x: f64, y: f64| if (x >= 0.5) ^ (y >= 0.5) { 1.0 } else { 0.0 };
    let cfg = TileCoderConfig::new(vec![8, 8], vec![(0.0, 1.0); 2], 8).with_step_size(0.2);
    let mut coder = TileCoder::new(cfg)?;
    let mut rng = StdRng::seed_from_u64(7);

    for epoch in 0..5 {
        let batch: Vec<Sample> = (0..1000)
            .map(|_| {
                let (x, y): (f64, f64) = (rng.gen(), rng.gen());
                Sample::new(vec![x, y], f(x, y))
            })
            .collect();
        let mse = train_batch(&mut coder, &batch)?;
        println!("  epoch {}  batch MSE={:.5}", epoch, mse);
    }

    for (x, y) in [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)] {
        println!("  f({:.2}, {:.2}) = {:.0}  predicted {:+.3}", x, y, f(x, y), coder.predict(&[x, y])?);
    }
    println!();
    Ok(())
}

// ─── Task 3: Step-size Annealing ──────────────────────

fn task_annealing() -> cmac_core::Result<()> {
    println!("━━━ Task 3: Step-size Annealing with Noisy Targets ━━━");
    println!();

    let f = |x: f64| 2.0 * x - 1.0;
    let cfg = TileCoderConfig::new(vec![6], vec![(0.0, 1.0)], 8).with_step_size(0.5);
    let mut coder = TileCoder::new(cfg)?;
    let mut rng = StdRng::seed_from_u64(3);

    let mut step = 0.5;
    for phase in 0..4 {
        coder.set_step_size(step)?;
        for _ in 0..2000 {
            let x: f64 = rng.gen();
            let noise = rng.gen_range(-0.3..0.3);
            coder.update(&[x], f(x) + noise)?;
        }
        println!(
            "  phase {}  step={:.4}  alpha={:.5}  NMSE={:.5}",
            phase,
            coder.step_size(),
            coder.alpha(),
            eval_1d(&coder, f, 500)?,
        );
        step *= 0.25;
    }
    println!();
    Ok(())
}
