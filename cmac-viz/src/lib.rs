// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Surface plots for two-dimensional tile coders.
//!
//! Sample a coder with [`SurfaceGrid::sample`], summarize it with
//! [`SurfaceStats::collect`], and hand both to [`render_surface`] to get a
//! standalone HTML page.

pub mod color;
pub mod grid;
pub mod renderers;
pub mod scene;
pub mod template;

pub use grid::SurfaceGrid;
pub use renderers::{render_surface, SurfaceStats};
pub use template::Theme;
