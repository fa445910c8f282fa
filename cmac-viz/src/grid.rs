// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Dense grid sweep of a two-dimensional function.
//!
//! `xs[i] = low_x + i · range_x / resolution` for `i in 0..resolution`, likewise
//! for `ys`, so the top edge of each interval is never sampled. Values are
//! stored row-major by `y`: `z[j][i] = f(xs[i], ys[j])`.

use cmac_core::{Interval, Result, TileCoder, TileCoderError};

/// A function sampled on a regular 2-D grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// `z[j][i]` is the value at `(xs[i], ys[j])`
    pub z: Vec<Vec<f64>>,
}

fn axis(lim: &Interval, resolution: usize) -> Vec<f64> {
    let step = lim.range() / resolution as f64;
    (0..resolution).map(|k| lim.low + k as f64 * step).collect()
}

fn check_resolution(resolution: usize) -> Result<()> {
    if resolution == 0 {
        return Err(TileCoderError::invalid("resolution", "must be > 0"));
    }
    Ok(())
}

impl SurfaceGrid {
    /// Sample an arbitrary function over `x_lim × y_lim`.
    pub fn from_fn<F>(x_lim: Interval, y_lim: Interval, resolution: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(f64, f64) -> f64,
    {
        check_resolution(resolution)?;
        let xs = axis(&x_lim, resolution);
        let ys = axis(&y_lim, resolution);
        let z = ys
            .iter()
            .map(|&y| xs.iter().map(|&x| f(x, y)).collect())
            .collect();
        Ok(Self { xs, ys, z })
    }

    /// Sweep a two-dimensional coder's predictions over its whole input box.
    pub fn sample(coder: &TileCoder, resolution: usize) -> Result<Self> {
        if coder.n_dims() != 2 {
            return Err(TileCoderError::DimensionMismatch {
                what: "surface dims",
                expected: 2,
                actual: coder.n_dims(),
            });
        }
        check_resolution(resolution)?;
        let limits = coder.geometry().limits();
        let xs = axis(&limits[0], resolution);
        let ys = axis(&limits[1], resolution);

        let mut z = Vec::with_capacity(ys.len());
        for &y in &ys {
            let row = xs
                .iter()
                .map(|&x| coder.predict(&[x, y]))
                .collect::<Result<Vec<f64>>>()?;
            z.push(row);
        }
        Ok(Self { xs, ys, z })
    }

    /// `(columns, rows)`
    pub fn shape(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// All values, row by row.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.z.iter().flat_map(|row| row.iter().copied())
    }

    pub fn min(&self) -> f64 {
        self.values().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean squared difference against another grid of the same shape.
    pub fn mse_against(&self, other: &SurfaceGrid) -> Result<f64> {
        if self.shape() != other.shape() {
            let (c, r) = self.shape();
            let (oc, or) = other.shape();
            return Err(TileCoderError::DimensionMismatch {
                what: "surface grid",
                expected: c * r,
                actual: oc * or,
            });
        }
        let predicted: Vec<f64> = self.values().collect();
        let actual: Vec<f64> = other.values().collect();
        cmac_core::mse(&predicted, &actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmac_core::TileCoderConfig;

    #[test]
    fn test_axis_excludes_high() {
        let grid = SurfaceGrid::from_fn(
            Interval::new(0.0, 1.0),
            Interval::new(-2.0, 2.0),
            4,
            |x, y| x + y,
        )
        .unwrap();
        assert_eq!(grid.xs, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(grid.ys, vec![-2.0, -1.0, 0.0, 1.0]);
        assert_eq!(grid.z[1][2], 0.5 - 1.0);
        assert_eq!(grid.shape(), (4, 4));
        assert_eq!(grid.min(), -2.0);
        assert_eq!(grid.max(), 1.75);
    }

    #[test]
    fn test_sample_fresh_coder_is_flat() {
        let coder = TileCoder::new(TileCoderConfig::sinusoid_surface()).unwrap();
        let grid = SurfaceGrid::sample(&coder, 20).unwrap();
        assert_eq!(grid.shape(), (20, 20));
        assert!(grid.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_sample_reflects_training() {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 1).with_step_size(1.0);
        let mut coder = TileCoder::new(cfg).unwrap();
        coder.update(&[0.1, 0.1], 5.0).unwrap();
        let grid = SurfaceGrid::sample(&coder, 4).unwrap();
        // x, y ∈ {0, .25, .5, .75}: the lower-left 2×2 block is tile 0.
        assert_eq!(grid.z[0][0], 5.0);
        assert_eq!(grid.z[1][1], 5.0);
        assert_eq!(grid.z[2][2], 0.0);
        assert_eq!(grid.max(), 5.0);
    }

    #[test]
    fn test_sample_requires_two_dims() {
        let coder = TileCoder::from_parts(vec![4], vec![(0.0, 1.0)], 2).unwrap();
        assert!(matches!(
            SurfaceGrid::sample(&coder, 10),
            Err(TileCoderError::DimensionMismatch { what: "surface dims", .. })
        ));
        let coder = TileCoder::new(TileCoderConfig::sinusoid_surface()).unwrap();
        assert!(SurfaceGrid::sample(&coder, 0).is_err());
    }

    #[test]
    fn test_mse_against() {
        let a = SurfaceGrid::from_fn(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), 3, |_, _| 1.0).unwrap();
        let b = SurfaceGrid::from_fn(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), 3, |_, _| 3.0).unwrap();
        assert_eq!(a.mse_against(&b).unwrap(), 4.0);
        let c = SurfaceGrid::from_fn(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), 2, |_, _| 0.0).unwrap();
        assert!(a.mse_against(&c).is_err());
    }
}
