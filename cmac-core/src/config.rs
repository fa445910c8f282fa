// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Configuration for a tile coder.
//!
//! Everything here is immutable once a [`crate::TileCoder`] is built from it.
//! The only post-construction knob is the step size, which the coder exposes
//! through `set_step_size`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, TileCoderError};
use crate::geometry::padding_for;

/// Default nominal learning rate, before division by the number of tilings.
pub const DEFAULT_STEP_SIZE: f64 = 0.1;

/// Valid input range for one dimension: `low <= x < high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Half-open membership test. NaN is never contained.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.low && x < self.high
    }
}

impl From<(f64, f64)> for Interval {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

/// What to do with a coordinate that falls outside its [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Fail with `OutOfRangeInput` before touching any weight.
    #[default]
    Reject,
    /// Clamp the coordinate into the box and use the edge tile: anything at or
    /// above `high` maps to the tile of the largest value below `high`.
    Clamp,
}

/// Full configuration for a [`crate::TileCoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileCoderConfig {
    /// Tile divisions per dimension, before offset padding
    pub dims: Vec<usize>,
    /// Valid input range per dimension
    pub limits: Vec<Interval>,
    /// Number of overlapping tiling layers
    pub tilings: usize,
    /// Nominal learning rate; each tiling uses `step_size / tilings`
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    /// Per-dimension tiling shift; `None` means all ones
    #[serde(default)]
    pub offset_vec: Option<Vec<f64>>,
    /// Out-of-range input handling
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}

impl TileCoderConfig {
    /// Configuration with the default step size, unit offsets and `Reject` boundaries.
    pub fn new<I>(dims: Vec<usize>, limits: Vec<I>, tilings: usize) -> Self
    where
        I: Into<Interval>,
    {
        Self {
            dims,
            limits: limits.into_iter().map(Into::into).collect(),
            tilings,
            step_size: DEFAULT_STEP_SIZE,
            offset_vec: None,
            boundary: BoundaryPolicy::Reject,
        }
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_offset_vec(mut self, offset_vec: Vec<f64>) -> Self {
        self.offset_vec = Some(offset_vec);
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// The two-dimensional sinusoid demo geometry.
    ///
    /// 8×8 tiles over `[0, 2π)²`, 8 tilings, step size 0.1, asymmetric
    /// offsets `[1, 3]` so the tilings stagger differently along each axis.
    pub fn sinusoid_surface() -> Self {
        let two_pi = 2.0 * std::f64::consts::PI;
        Self::new(vec![8, 8], vec![(0.0, two_pi); 2], 8)
            .with_step_size(0.1)
            .with_offset_vec(vec![1.0, 3.0])
    }

    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    /// The offset vector with the all-ones default applied.
    pub fn resolved_offset_vec(&self) -> Vec<f64> {
        match &self.offset_vec {
            Some(v) => v.clone(),
            None => vec![1.0; self.dims.len()],
        }
    }

    /// Total number of weights `tilings × product(padded_dims)`, or `None` on overflow.
    pub fn weight_count(&self) -> Option<usize> {
        let offsets = self.resolved_offset_vec();
        let mut tiling_size = 1usize;
        for (&d, &o) in self.dims.iter().zip(offsets.iter()) {
            tiling_size = tiling_size.checked_mul(d.checked_add(padding_for(o))?)?;
        }
        tiling_size.checked_mul(self.tilings)
    }

    /// Size of the weight buffer in bytes.
    pub fn estimated_memory_bytes(&self) -> usize {
        self.weight_count()
            .map(|n| n.saturating_mul(std::mem::size_of::<f64>()))
            .unwrap_or(usize::MAX)
    }

    /// Check every construction-time invariant, returning the first violation.
    ///
    /// # Validated invariants
    ///
    /// - at least one dimension, and every `dims[i] > 0`
    /// - `limits` and `offset_vec` have one entry per dimension
    /// - `tilings > 0`, `step_size` finite and `> 0`
    /// - limits finite with `high > low`
    /// - offsets finite and `>= 0`
    /// - the weight buffer, in bytes, fits in `usize` and stays within `isize::MAX`
    pub fn validate(&self) -> Result<()> {
        let n = self.dims.len();
        if n == 0 {
            return Err(TileCoderError::invalid("dims", "need at least one dimension"));
        }
        if let Some(i) = self.dims.iter().position(|&d| d == 0) {
            return Err(TileCoderError::invalid("dims", format!("dims[{i}] must be > 0")));
        }
        if self.limits.len() != n {
            return Err(TileCoderError::DimensionMismatch {
                what: "limits",
                expected: n,
                actual: self.limits.len(),
            });
        }
        if let Some(offsets) = &self.offset_vec {
            if offsets.len() != n {
                return Err(TileCoderError::DimensionMismatch {
                    what: "offset_vec",
                    expected: n,
                    actual: offsets.len(),
                });
            }
            if let Some(i) = offsets.iter().position(|o| !o.is_finite() || *o < 0.0) {
                return Err(TileCoderError::invalid(
                    "offset_vec",
                    format!("offset_vec[{i}] = {} must be finite and >= 0", offsets[i]),
                ));
            }
        }
        if self.tilings == 0 {
            return Err(TileCoderError::invalid("tilings", "must be > 0"));
        }
        validate_step_size(self.step_size)?;
        for (i, lim) in self.limits.iter().enumerate() {
            if !lim.low.is_finite() || !lim.high.is_finite() {
                return Err(TileCoderError::invalid(
                    "limits",
                    format!("limits[{i}] must be finite, got [{}, {})", lim.low, lim.high),
                ));
            }
            if lim.high <= lim.low {
                return Err(TileCoderError::invalid(
                    "limits",
                    format!("limits[{i}] needs high > low, got [{}, {})", lim.low, lim.high),
                ));
            }
        }
        let bytes = self
            .weight_count()
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()));
        match bytes {
            None => {
                return Err(TileCoderError::invalid(
                    "dims",
                    "weight buffer size overflows usize",
                ))
            }
            Some(b) if b > isize::MAX as usize => {
                return Err(TileCoderError::invalid(
                    "dims",
                    format!("weight buffer of {b} bytes exceeds the allocation limit"),
                ))
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json(path: &Path) -> std::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: TileCoderConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON, creating parent directories.
    pub fn to_json(&self, path: &Path) -> std::result::Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn validate_step_size(step_size: f64) -> Result<()> {
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(TileCoderError::invalid(
            "step_size",
            format!("must be finite and > 0, got {step_size}"),
        ));
    }
    Ok(())
}
