// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Tiling geometry: the mapping from a continuous point to one active tile per tiling.
//!
//! For tiling `k` and dimension `i`:
//!
//! `c_i = floor((x_i - low_i) · dims_i / range_i + k · offset_vec_i / tilings)`
//!
//! The integer coordinate `c` is flattened with the mixed-radix vector
//! `hash_vec = [1, d_0, d_0·d_1, ...]` built from the *unpadded* `dims`, and
//! shifted by `k · tiling_size` into tiling `k`'s slice of the weight buffer:
//!
//! `index_k = k · tiling_size + Σ_i hash_vec_i · c_i`
//!
//! Each tiling carries `ceil(offset_vec_i)` extra tiles per dimension so the
//! stagger never pushes an in-range point past the slice. Because `hash_vec`
//! ignores that padding, a tile in the padded row can share a slot with a tile
//! of the next row; the slot is still inside the tiling's own slice.
//!
//! Coordinates are capped at `dims_i - 1 + ceil(shift)`, the tile of the
//! largest value below `high_i`. Under [`BoundaryPolicy::Clamp`] an input at or
//! beyond `high_i` therefore lands on the same tile as the in-range edge.

use crate::config::{BoundaryPolicy, Interval, TileCoderConfig};
use crate::error::{Result, TileCoderError};

/// Extra tiles a dimension needs to absorb an offset of `offset` tile widths.
pub(crate) fn padding_for(offset: f64) -> usize {
    offset.ceil().max(0.0) as usize
}

/// Immutable derived geometry of a tile coder.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGeometry {
    dims: Vec<usize>,
    padded_dims: Vec<usize>,
    limits: Vec<Interval>,
    ranges: Vec<f64>,
    offset_vec: Vec<f64>,
    /// Row-major `tilings × n_dims` per-tiling shifts
    offsets: Vec<f64>,
    hash_vec: Vec<usize>,
    tilings: usize,
    tiling_size: usize,
    boundary: BoundaryPolicy,
}

impl TileGeometry {
    /// Validate `config` and derive every geometry field once.
    pub fn new(config: &TileCoderConfig) -> Result<Self> {
        config.validate()?;

        let n = config.n_dims();
        let tilings = config.tilings;
        let offset_vec = config.resolved_offset_vec();

        let padded_dims: Vec<usize> = config
            .dims
            .iter()
            .zip(offset_vec.iter())
            .map(|(&d, &o)| d + padding_for(o))
            .collect();

        let mut offsets = Vec::with_capacity(tilings * n);
        for k in 0..tilings {
            for &o in &offset_vec {
                offsets.push(k as f64 * o / tilings as f64);
            }
        }

        let mut hash_vec = Vec::with_capacity(n);
        hash_vec.push(1usize);
        for i in 1..n {
            hash_vec.push(hash_vec[i - 1] * config.dims[i - 1]);
        }

        Ok(Self {
            dims: config.dims.clone(),
            tiling_size: padded_dims.iter().product(),
            padded_dims,
            ranges: config.limits.iter().map(Interval::range).collect(),
            limits: config.limits.clone(),
            offset_vec,
            offsets,
            hash_vec,
            tilings,
            boundary: config.boundary,
        })
    }

    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn padded_dims(&self) -> &[usize] {
        &self.padded_dims
    }

    pub fn limits(&self) -> &[Interval] {
        &self.limits
    }

    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    pub fn offset_vec(&self) -> &[f64] {
        &self.offset_vec
    }

    pub fn hash_vec(&self) -> &[usize] {
        &self.hash_vec
    }

    pub fn tilings(&self) -> usize {
        self.tilings
    }

    /// Number of tile slots in one tiling layer.
    pub fn tiling_size(&self) -> usize {
        self.tiling_size
    }

    /// Length of the weight buffer.
    pub fn num_weights(&self) -> usize {
        self.tilings * self.tiling_size
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Per-dimension shift of tiling `k`.
    pub fn offsets(&self, k: usize) -> &[f64] {
        let n = self.n_dims();
        &self.offsets[k * n..(k + 1) * n]
    }

    /// Check a point's length and, under `Reject`, that every component is in range.
    ///
    /// NaN is rejected under both policies.
    pub fn check_point(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.n_dims() {
            return Err(TileCoderError::DimensionMismatch {
                what: "point",
                expected: self.n_dims(),
                actual: x.len(),
            });
        }
        for (dim, (&value, lim)) in x.iter().zip(self.limits.iter()).enumerate() {
            let ok = match self.boundary {
                BoundaryPolicy::Reject => lim.contains(value),
                BoundaryPolicy::Clamp => !value.is_nan(),
            };
            if !ok {
                return Err(TileCoderError::OutOfRangeInput {
                    dim,
                    value,
                    low: lim.low,
                    high: lim.high,
                });
            }
        }
        Ok(())
    }

    /// Integer tile coordinate of `value` along `dim`, after adding `shift`.
    #[inline]
    fn tile_coordinate(&self, value: f64, dim: usize, shift: f64) -> usize {
        let lim = self.limits[dim];
        let value = match self.boundary {
            BoundaryPolicy::Reject => value,
            BoundaryPolicy::Clamp => value.clamp(lim.low, lim.high),
        };
        let coord = (value - lim.low) * self.dims[dim] as f64 / self.ranges[dim] + shift;
        // The highest point below `high` lands on `dims - 1 + ceil(shift)`. Capping
        // there keeps `high` itself (and rounding near it) off the padded row,
        // which would alias a tile on the far side of the next row.
        let top = (self.dims[dim] - 1 + shift.ceil() as usize).min(self.padded_dims[dim] - 1);
        (coord.floor().max(0.0) as usize).min(top)
    }

    /// Flattened weight index of the active tile in tiling `k`.
    ///
    /// `x` must already have passed [`Self::check_point`].
    #[inline]
    pub(crate) fn tile_index(&self, x: &[f64], k: usize) -> usize {
        let shifts = self.offsets(k);
        let mut flat = 0usize;
        for (i, &value) in x.iter().enumerate() {
            flat += self.hash_vec[i] * self.tile_coordinate(value, i, shifts[i]);
        }
        debug_assert!(flat < self.tiling_size);
        k * self.tiling_size + flat
    }

    /// Iterate the active weight indices of an already-checked point, one per tiling.
    pub(crate) fn tiles<'a>(&'a self, x: &'a [f64]) -> impl Iterator<Item = usize> + 'a {
        (0..self.tilings).map(move |k| self.tile_index(x, k))
    }

    /// Fill `out` (length `tilings`) with the active weight indices of `x`.
    pub fn active_tiles_into(&self, x: &[f64], out: &mut [usize]) -> Result<()> {
        if out.len() != self.tilings {
            return Err(TileCoderError::DimensionMismatch {
                what: "tile buffer",
                expected: self.tilings,
                actual: out.len(),
            });
        }
        self.check_point(x)?;
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.tile_index(x, k);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(tilings: usize) -> TileGeometry {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], tilings);
        TileGeometry::new(&cfg).unwrap()
    }

    fn tiles_of(geom: &TileGeometry, x: &[f64]) -> Vec<usize> {
        let mut out = vec![0; geom.tilings()];
        geom.active_tiles_into(x, &mut out).unwrap();
        out
    }

    #[test]
    fn test_derived_fields() {
        let geom = TileGeometry::new(&TileCoderConfig::sinusoid_surface()).unwrap();
        assert_eq!(geom.padded_dims(), &[9, 11]);
        assert_eq!(geom.hash_vec(), &[1, 8]);
        assert_eq!(geom.tiling_size(), 99);
        assert_eq!(geom.num_weights(), 792);
        assert_eq!(geom.offsets(0), &[0.0, 0.0]);
        assert!((geom.offsets(4)[0] - 0.5).abs() < 1e-12);
        assert!((geom.offsets(4)[1] - 1.5).abs() < 1e-12);
        assert!((geom.ranges()[0] - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_hash_vec_uses_unpadded_dims() {
        let cfg = TileCoderConfig::new(vec![3, 4, 5], vec![(0.0, 1.0); 3], 2);
        let geom = TileGeometry::new(&cfg).unwrap();
        assert_eq!(geom.hash_vec(), &[1, 3, 12]);
        assert_eq!(geom.padded_dims(), &[4, 5, 6]);
        assert_eq!(geom.tiling_size(), 120);
    }

    #[test]
    fn test_single_tiling_indices() {
        let geom = unit_square(1);
        assert_eq!(tiles_of(&geom, &[0.1, 0.1]), vec![0]);
        assert_eq!(tiles_of(&geom, &[0.9, 0.1]), vec![1]);
        assert_eq!(tiles_of(&geom, &[0.1, 0.9]), vec![2]);
        assert_eq!(tiles_of(&geom, &[0.9, 0.9]), vec![3]);
    }

    #[test]
    fn test_tilings_are_staggered() {
        let geom = unit_square(2);
        // Tiling 1 is shifted by half a tile: 0.3 → 0.6 + 0.5 = 1.1 → tile 1.
        assert_eq!(tiles_of(&geom, &[0.3, 0.0]), vec![0, 9 + 1]);
        assert_eq!(tiles_of(&geom, &[0.1, 0.0]), vec![0, 9]);
    }

    #[test]
    fn test_padded_row_aliases_next_row() {
        let geom = unit_square(2);
        // (2, 0) and (0, 1) flatten to the same slot of tiling 1.
        assert_eq!(tiles_of(&geom, &[0.99, 0.1])[1], 9 + 2);
        assert_eq!(tiles_of(&geom, &[0.1, 0.6])[1], 9 + 2);
    }

    #[test]
    fn test_fractional_offsets_pad_up() {
        let cfg = TileCoderConfig::new(vec![4], vec![(0.0, 1.0)], 3).with_offset_vec(vec![1.5]);
        let geom = TileGeometry::new(&cfg).unwrap();
        assert_eq!(geom.padded_dims(), &[6]);
        for (k, idx) in tiles_of(&geom, &[0.999]).into_iter().enumerate() {
            assert!(idx >= k * 6 && idx < (k + 1) * 6);
        }
    }

    #[test]
    fn test_zero_offset_keeps_top_edge_in_slice() {
        let cfg = TileCoderConfig::new(vec![3], vec![(0.0, 1.0)], 2).with_offset_vec(vec![0.0]);
        let geom = TileGeometry::new(&cfg).unwrap();
        assert_eq!(geom.padded_dims(), &[3]);
        let top = 1.0 - f64::EPSILON;
        assert_eq!(tiles_of(&geom, &[top]), vec![2, 3 + 2]);
    }

    #[test]
    fn test_reject_policy() {
        let geom = unit_square(2);
        assert!(geom.check_point(&[0.0, 0.5]).is_ok());
        assert_eq!(
            geom.check_point(&[1.0, 0.5]),
            Err(TileCoderError::OutOfRangeInput {
                dim: 0,
                value: 1.0,
                low: 0.0,
                high: 1.0
            })
        );
        assert!(geom.check_point(&[0.5, -0.1]).is_err());
        assert!(geom.check_point(&[f64::NAN, 0.5]).is_err());
    }

    #[test]
    fn test_clamp_policy() {
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 2)
            .with_boundary(BoundaryPolicy::Clamp);
        let geom = TileGeometry::new(&cfg).unwrap();

        assert_eq!(tiles_of(&geom, &[-5.0, -5.0]), tiles_of(&geom, &[0.0, 0.0]));
        assert_eq!(tiles_of(&geom, &[7.0, 0.2]), tiles_of(&geom, &[1.0, 0.2]));
        assert_eq!(tiles_of(&geom, &[f64::INFINITY, 0.2]), tiles_of(&geom, &[1.0, 0.2]));
        assert!(geom.check_point(&[f64::NAN, 0.2]).is_err());

        for (k, idx) in tiles_of(&geom, &[1.0, 1.0]).into_iter().enumerate() {
            assert!(idx >= k * 9 && idx < (k + 1) * 9);
        }
    }

    #[test]
    fn test_clamp_high_side_matches_edge_tile() {
        let below_high = 1.0 - 1e-9;
        for tilings in [1, 2, 3, 4] {
            let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], tilings)
                .with_boundary(BoundaryPolicy::Clamp);
            let geom = TileGeometry::new(&cfg).unwrap();
            assert_eq!(tiles_of(&geom, &[5.0, 0.1]), tiles_of(&geom, &[below_high, 0.1]));
            assert_eq!(tiles_of(&geom, &[1.0, 0.1]), tiles_of(&geom, &[below_high, 0.1]));
            assert_eq!(tiles_of(&geom, &[0.3, 9.0]), tiles_of(&geom, &[0.3, below_high]));
            assert_eq!(
                tiles_of(&geom, &[f64::INFINITY, f64::INFINITY]),
                tiles_of(&geom, &[below_high, below_high])
            );
        }

        // One tiling: the clamped point must not reach the (0, 1) tile.
        let cfg = TileCoderConfig::new(vec![2, 2], vec![(0.0, 1.0); 2], 1)
            .with_boundary(BoundaryPolicy::Clamp);
        let geom = TileGeometry::new(&cfg).unwrap();
        assert_eq!(tiles_of(&geom, &[5.0, 0.1]), vec![1]);
        assert_ne!(tiles_of(&geom, &[5.0, 0.1]), tiles_of(&geom, &[0.1, 0.6]));
    }

    #[test]
    fn test_dimension_checks() {
        let geom = unit_square(2);
        assert_eq!(
            geom.check_point(&[0.5]),
            Err(TileCoderError::DimensionMismatch {
                what: "point",
                expected: 2,
                actual: 1
            })
        );
        let mut short = vec![0; 1];
        assert!(matches!(
            geom.active_tiles_into(&[0.5, 0.5], &mut short),
            Err(TileCoderError::DimensionMismatch { what: "tile buffer", .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = TileCoderConfig::new(vec![2], vec![(1.0, 0.0)], 1);
        assert!(TileGeometry::new(&cfg).is_err());
    }
}
