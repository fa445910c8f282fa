// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! The tile coder: a linear approximator over one-hot tile features.
//!
//! `predict(x) = Σ_k w[index_k(x)]`
//!
//! `update(x, y)`: `w[index_k(x)] += α · (y - predict(x))` for every tiling `k`,
//! with `α = step_size / tilings` so the total correction per update is
//! `step_size · (y - predict(x))` whatever the number of tilings.
//!
//! The weight buffer is the only mutable state. `TileCoder` is `Send + Sync`
//! but performs no locking; callers training from several threads must guard
//! the read-modify-write of `update` themselves.

use serde::Serialize;
use tracing::debug;

use crate::config::{validate_step_size, Interval, TileCoderConfig};
use crate::error::{Result, TileCoderError};
use crate::geometry::TileGeometry;

/// Lifecycle of a coder. The only transition is `Constructed → Trained`,
/// taken by the first successful `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoderState {
    /// Geometry fixed, every weight zero
    Constructed,
    /// At least one update applied
    Trained,
}

/// Tile-coding function approximator.
#[derive(Debug, Clone)]
pub struct TileCoder {
    config: TileCoderConfig,
    geometry: TileGeometry,
    /// `tilings × tiling_size` weights, tiling `k` owns `[k·tiling_size, (k+1)·tiling_size)`
    weights: Vec<f64>,
    step_size: f64,
    alpha: f64,
    /// Scratch buffer for the active indices of the point being updated
    active: Vec<usize>,
    updates: u64,
}

impl TileCoder {
    /// Validate `config`, derive the geometry and allocate zeroed weights.
    pub fn new(config: TileCoderConfig) -> Result<Self> {
        let geometry = TileGeometry::new(&config)?;
        let tilings = geometry.tilings();
        let num_weights = geometry.num_weights();

        debug!(
            dims = ?geometry.dims(),
            padded_dims = ?geometry.padded_dims(),
            tilings,
            tiling_size = geometry.tiling_size(),
            num_weights,
            step_size = config.step_size,
            boundary = ?geometry.boundary(),
            "tile coder constructed"
        );

        Ok(Self {
            weights: vec![0.0; num_weights],
            step_size: config.step_size,
            alpha: config.step_size / tilings as f64,
            active: vec![0; tilings],
            updates: 0,
            geometry,
            config,
        })
    }

    /// Coder with the default step size (0.1), unit offsets and `Reject` boundaries.
    pub fn from_parts<I>(dims: Vec<usize>, limits: Vec<I>, tilings: usize) -> Result<Self>
    where
        I: Into<Interval>,
    {
        Self::new(TileCoderConfig::new(dims, limits, tilings))
    }

    /// Estimate the function at `x`. Read-only and allocation-free.
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        self.geometry.check_point(x)?;
        Ok(self.geometry.tiles(x).map(|i| self.weights[i]).sum())
    }

    /// One online gradient step on squared error toward `target`.
    ///
    /// On error no weight is touched.
    pub fn update(&mut self, x: &[f64], target: f64) -> Result<()> {
        if !target.is_finite() {
            return Err(TileCoderError::InvalidTarget(target));
        }
        self.geometry.active_tiles_into(x, &mut self.active)?;

        let prediction: f64 = self.active.iter().map(|&i| self.weights[i]).sum();
        let delta = self.alpha * (target - prediction);
        for &i in &self.active {
            self.weights[i] += delta;
        }
        self.updates += 1;
        Ok(())
    }

    /// Replace the nominal step size. Takes effect on the next `update`.
    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        validate_step_size(step_size)?;
        self.step_size = step_size;
        self.alpha = step_size / self.geometry.tilings() as f64;
        debug!(step_size, alpha = self.alpha, "step size changed");
        Ok(())
    }

    /// Active weight indices of `x`, one per tiling.
    pub fn active_tiles(&self, x: &[f64]) -> Result<Vec<usize>> {
        let mut out = vec![0; self.geometry.tilings()];
        self.geometry.active_tiles_into(x, &mut out)?;
        Ok(out)
    }

    /// The configuration this coder was built from. `step_size` here is the
    /// construction-time value; see [`Self::step_size`] for the current one.
    pub fn config(&self) -> &TileCoderConfig {
        &self.config
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Current per-tiling learning rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current nominal step size.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn num_tilings(&self) -> usize {
        self.geometry.tilings()
    }

    pub fn tiling_size(&self) -> usize {
        self.geometry.tiling_size()
    }

    pub fn n_dims(&self) -> usize {
        self.geometry.n_dims()
    }

    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }

    /// Number of successful updates applied so far.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    pub fn state(&self) -> CoderState {
        if self.updates == 0 {
            CoderState::Constructed
        } else {
            CoderState::Trained
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryPolicy;

    fn degenerate() -> TileCoder {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 1)
            .with_step_size(1.0)
            .with_offset_vec(vec![1.0, 1.0]);
        TileCoder::new(cfg).unwrap()
    }

    #[test]
    fn test_fresh_coder_predicts_zero() {
        let coder = TileCoder::new(TileCoderConfig::sinusoid_surface()).unwrap();
        assert_eq!(coder.predict(&[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(coder.state(), CoderState::Constructed);
        assert!(coder.weights().iter().all(|&w| w == 0.0));
        assert_eq!(coder.num_weights(), 792);
    }

    #[test]
    fn test_single_tiling_full_correction() {
        let mut coder = degenerate();
        coder.update(&[0.1, 0.1], 5.0).unwrap();
        assert_eq!(coder.predict(&[0.1, 0.1]).unwrap(), 5.0);
    }

    #[test]
    fn test_distant_tile_unaffected() {
        let mut coder = degenerate();
        coder.update(&[0.1, 0.1], 5.0).unwrap();
        assert_eq!(coder.predict(&[0.9, 0.9]).unwrap(), 0.0);
    }

    #[test]
    fn test_alpha_is_normalised_by_tilings() {
        let cfg = TileCoderConfig::new(vec![4], vec![(0.0, 1.0)], 8).with_step_size(0.4);
        let coder = TileCoder::new(cfg).unwrap();
        assert!((coder.alpha() - 0.05).abs() < 1e-15);
        assert_eq!(coder.step_size(), 0.4);
    }

    #[test]
    fn test_update_moves_exactly_tilings_weights() {
        let cfg = TileCoderConfig::new(vec![4, 4], vec![(0.0, 1.0); 2], 4).with_step_size(0.5);
        let mut coder = TileCoder::new(cfg).unwrap();
        coder.update(&[0.3, 0.7], 2.0).unwrap();

        let changed = coder.weights().iter().filter(|&&w| w != 0.0).count();
        assert_eq!(changed, 4);
        for &i in &coder.active_tiles(&[0.3, 0.7]).unwrap() {
            assert!((coder.weights()[i] - 0.25).abs() < 1e-12);
        }
        // Total correction = step_size · error
        assert!((coder.predict(&[0.3, 0.7]).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_set_step_size() {
        let mut coder = degenerate();
        coder.set_step_size(0.5).unwrap();
        assert_eq!(coder.alpha(), 0.5);
        coder.update(&[0.1, 0.1], 4.0).unwrap();
        assert_eq!(coder.predict(&[0.1, 0.1]).unwrap(), 2.0);

        assert!(coder.set_step_size(0.0).is_err());
        assert!(coder.set_step_size(f64::NAN).is_err());
        assert_eq!(coder.alpha(), 0.5);
    }

    #[test]
    fn test_state_transition() {
        let mut coder = degenerate();
        assert_eq!(coder.state(), CoderState::Constructed);
        coder.predict(&[0.5, 0.5]).unwrap();
        assert_eq!(coder.state(), CoderState::Constructed);
        coder.update(&[0.5, 0.5], 1.0).unwrap();
        assert_eq!(coder.state(), CoderState::Trained);
        assert_eq!(coder.update_count(), 1);
    }

    #[test]
    fn test_failed_update_leaves_weights_untouched() {
        let mut coder = degenerate();
        coder.update(&[0.2, 0.2], 3.0).unwrap();
        let before = coder.weights().to_vec();

        assert!(matches!(
            coder.update(&[1.5, 0.2], 1.0),
            Err(TileCoderError::OutOfRangeInput { dim: 0, .. })
        ));
        assert!(matches!(
            coder.update(&[0.2], 1.0),
            Err(TileCoderError::DimensionMismatch { what: "point", .. })
        ));
        assert!(matches!(
            coder.update(&[0.2, 0.2], f64::NAN),
            Err(TileCoderError::InvalidTarget(_))
        ));
        assert!(matches!(
            coder.update(&[0.2, 0.2], f64::INFINITY),
            Err(TileCoderError::InvalidTarget(_))
        ));

        assert_eq!(coder.weights(), before.as_slice());
        assert_eq!(coder.update_count(), 1);
    }

    #[test]
    fn test_clamped_coder_accepts_out_of_range() {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 1)
            .with_step_size(1.0)
            .with_boundary(BoundaryPolicy::Clamp);
        let mut coder = TileCoder::new(cfg).unwrap();
        coder.update(&[-3.0, -3.0], 2.0).unwrap();
        assert_eq!(coder.predict(&[0.0, 0.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_clamped_high_side_update_stays_local() {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 1)
            .with_step_size(1.0)
            .with_boundary(BoundaryPolicy::Clamp);
        let mut coder = TileCoder::new(cfg).unwrap();
        coder.update(&[5.0, 0.1], 3.0).unwrap();
        assert_eq!(coder.predict(&[0.99, 0.1]).unwrap(), 3.0);
        assert_eq!(coder.predict(&[0.1, 0.6]).unwrap(), 0.0);
        assert_eq!(coder.predict(&[0.0, 0.9]).unwrap(), 0.0);
    }

    #[test]
    fn test_from_parts_defaults() {
        let coder = TileCoder::from_parts(vec![4], vec![(0.0, 1.0)], 2).unwrap();
        assert_eq!(coder.step_size(), 0.1);
        assert_eq!(coder.geometry().offset_vec(), &[1.0]);
        assert!(TileCoder::from_parts(vec![4], vec![(0.0, 1.0)], 0).is_err());
    }

    #[test]
    fn test_coder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TileCoder>();
    }
}
