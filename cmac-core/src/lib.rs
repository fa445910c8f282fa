// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! # cmac-core
//!
//! CMAC-style tile coding: a linear function approximator over a bounded box
//! that maps each input to one active tile in each of several staggered
//! tilings and learns by online gradient descent on those tiles' weights.
//!
//! ```
//! use cmac_core::{TileCoder, TileCoderConfig};
//!
//! let config = TileCoderConfig::new(vec![8, 8], vec![(0.0, 1.0); 2], 8).with_step_size(0.5);
//! let mut coder = TileCoder::new(config)?;
//! for _ in 0..50 {
//!     coder.update(&[0.3, 0.6], 1.5)?;
//! }
//! assert!((coder.predict(&[0.3, 0.6])? - 1.5).abs() < 1e-6);
//! # Ok::<(), cmac_core::TileCoderError>(())
//! ```

pub mod coder;
pub mod config;
pub mod error;
pub mod geometry;
pub mod training;

pub use coder::{CoderState, TileCoder};
pub use config::{BoundaryPolicy, Interval, TileCoderConfig};
pub use error::{ConfigError, Result, TileCoderError};
pub use geometry::TileGeometry;
pub use training::{mse, nmse, train_batch, BatchReport, Sample, TrainingLog};
