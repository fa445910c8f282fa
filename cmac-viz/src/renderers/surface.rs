// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Learned Surface Renderer
//!
//! Turns a [`SurfaceGrid`] into a colored height field: x and y span a
//! fixed 10×10 footprint, height and color both encode the normalized
//! prediction on the `hot` ramp. A stats panel summarizes the coder and
//! a small canvas chart traces the per-batch training MSE.

use std::fmt::Write;

use cmac_core::{TileCoder, TrainingLog};
use tracing::debug;

use crate::color::{hot_color, normalize, rgb_to_hex};
use crate::grid::SurfaceGrid;
use crate::scene::{HeightField, SceneBuilder};
use crate::template::{HtmlDocument, PanelPosition, Theme};

const HALF_EXTENT: f64 = 5.0;
const HEIGHT_SCALE: f64 = 4.0;
const LEGEND_STEPS: usize = 12;

/// Numbers shown next to the surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceStats {
    pub title: String,
    pub dims: Vec<usize>,
    pub tilings: usize,
    pub num_weights: usize,
    pub step_size: f64,
    pub samples_seen: u64,
    pub last_batch_mse: Option<f64>,
    /// Noiseless error of the swept grid against the true function
    pub grid_mse: Option<f64>,
    pub mse_history: Vec<f64>,
}

impl SurfaceStats {
    pub fn collect(coder: &TileCoder, log: &TrainingLog) -> Self {
        Self {
            title: "Tile Coder Surface".to_string(),
            dims: coder.config().dims.clone(),
            tilings: coder.num_tilings(),
            num_weights: coder.num_weights(),
            step_size: coder.step_size(),
            samples_seen: log.samples_seen(),
            last_batch_mse: log.last().map(|r| r.batch_mse),
            grid_mse: None,
            mse_history: log.reports().iter().map(|r| r.batch_mse).collect(),
        }
    }

    pub fn with_grid_mse(mut self, mse: f64) -> Self {
        self.grid_mse = Some(mse);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// Map grid column/row to the scene footprint `[-5, 5]`.
fn footprint(k: usize, n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        -HALF_EXTENT + 2.0 * HALF_EXTENT * k as f64 / (n - 1) as f64
    }
}

fn height_field(grid: &SurfaceGrid) -> HeightField {
    let (cols, rows) = grid.shape();
    let (lo, hi) = (grid.min(), grid.max());
    let mut positions = Vec::with_capacity(cols * rows);
    let mut colors = Vec::with_capacity(cols * rows);

    for (j, row) in grid.z.iter().enumerate() {
        for (i, &v) in row.iter().enumerate() {
            let t = normalize(v, lo, hi);
            // Three.js is y-up: grid y runs along scene z.
            positions.push([footprint(i, cols), t as f64 * HEIGHT_SCALE, footprint(j, rows)]);
            colors.push(hot_color(t));
        }
    }

    HeightField {
        cols,
        rows,
        positions,
        colors,
        wireframe: Some((0.6, 0.6, 0.6)),
    }
}

fn stat_row(html: &mut String, key: &str, val: impl std::fmt::Display) {
    let _ = write!(html, r#"<div class="stat-row"><span class="key">{}</span><span class="val">{}</span></div>"#, key, val);
}

fn stats_panel(grid: &SurfaceGrid, stats: &SurfaceStats) -> String {
    let dims = stats.dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" × ");
    let (cols, rows) = grid.shape();

    let mut html = String::new();
    let _ = write!(html, "<h3>Tile Coder</h3>");
    stat_row(&mut html, "Tiles / tiling", dims);
    stat_row(&mut html, "Tilings", stats.tilings);
    stat_row(&mut html, "Weights", stats.num_weights);
    stat_row(&mut html, "Step size", format!("{:.4}", stats.step_size));
    stat_row(&mut html, "Samples", stats.samples_seen);
    if let Some(mse) = stats.last_batch_mse {
        stat_row(&mut html, "Batch MSE", format!("{:.5}", mse));
    }
    if let Some(mse) = stats.grid_mse {
        stat_row(&mut html, "Grid MSE", format!("{:.5}", mse));
    }
    stat_row(&mut html, "Grid", format!("{} × {}", cols, rows));
    stat_row(&mut html, "z range", format!("[{:.3}, {:.3}]", grid.min(), grid.max()));
    html
}

fn legend_panel() -> String {
    let mut html = String::from(r#"<h3>Prediction</h3><div class="color-legend"><span>low</span>"#);
    for s in 0..LEGEND_STEPS {
        let (r, g, b) = hot_color(s as f32 / (LEGEND_STEPS - 1) as f32);
        let _ = write!(html, r#"<div class="swatch" style="background:{}"></div>"#, rgb_to_hex(r, g, b));
    }
    html.push_str("<span>high</span></div>");
    html
}

fn mse_chart_js(history: &[f64], theme: Theme) -> String {
    let mut data = String::new();
    for v in history {
        let _ = write!(data, "{:.6},", v);
    }
    format!(r#"(function() {{
    const data = [{data}];
    const c = document.getElementById('mse-chart');
    if (!c || data.length < 2) return;
    const ctx = c.getContext('2d');
    const w = c.width, h = c.height, pad = 4;
    const max = Math.max(...data), min = Math.min(...data);
    const span = (max - min) || 1;
    ctx.strokeStyle = '{accent}';
    ctx.lineWidth = 1.5;
    ctx.beginPath();
    data.forEach((v, i) => {{
        const x = pad + (w - 2 * pad) * i / (data.length - 1);
        const y = h - pad - (h - 2 * pad) * (v - min) / span;
        if (i === 0) ctx.moveTo(x, y); else ctx.lineTo(x, y);
    }});
    ctx.stroke();
}})();
"#, data = data, accent = theme.accent_color())
}

/// Render a learned 2-D surface as a self-contained HTML document.
pub fn render_surface(grid: &SurfaceGrid, stats: &SurfaceStats, theme: Theme) -> String {
    let (cols, rows) = grid.shape();
    debug!(cols, rows, samples = stats.samples_seen, "rendering surface");

    let mut scene = SceneBuilder::new();
    scene.set_camera([9.0, 8.0, 9.0], [0.0, HEIGHT_SCALE / 4.0, 0.0]);
    scene.add_point_light([6.0, 12.0, 6.0], 0xffffff, 0.8, 60.0);
    scene.add_point_light([-6.0, 6.0, -6.0], 0xffaa55, 0.4, 40.0);
    scene.set_grid_helper(true);
    scene.add_height_field(height_field(grid));

    let label_color = match theme {
        Theme::Dark => (0.9, 0.9, 0.9),
        Theme::Light => (0.1, 0.1, 0.2),
    };
    scene.add_label([HALF_EXTENT + 0.8, 0.0, 0.0], "x", label_color, 2.0);
    scene.add_label([0.0, 0.0, HALF_EXTENT + 0.8], "y", label_color, 2.0);

    let mut doc = HtmlDocument::new(&stats.title, theme);
    doc.add_panel_with_width("stats-panel", PanelPosition::TopLeft, &stats_panel(grid, stats), "240px");
    doc.add_panel("legend-panel", PanelPosition::BottomLeft, &legend_panel());
    doc.set_scene_js(&scene.build_js());

    if stats.mse_history.len() >= 2 {
        let chart = format!(
            r#"<h3>Batch MSE ({} batches)</h3><canvas id="mse-chart" width="260" height="90"></canvas>"#,
            stats.mse_history.len()
        );
        doc.add_panel("mse-panel", PanelPosition::TopRight, &chart);
        doc.set_chart_js(&mse_chart_js(&stats.mse_history, theme));
    }

    doc.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmac_core::{train_batch, Interval, Sample, TileCoderConfig};

    fn ramp(resolution: usize) -> SurfaceGrid {
        SurfaceGrid::from_fn(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), resolution, |x, y| x + y).unwrap()
    }

    #[test]
    fn test_height_field_spans_footprint() {
        let field = height_field(&ramp(5));
        assert_eq!(field.positions.len(), 25);
        assert_eq!(field.positions[0], [-5.0, 0.0, -5.0]);
        let last = field.positions[24];
        assert!((last[0] - 5.0).abs() < 1e-12 && (last[2] - 5.0).abs() < 1e-12);
        assert!((last[1] - HEIGHT_SCALE).abs() < 1e-6);
        assert_eq!(field.colors[24], (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_flat_grid_sits_mid_height() {
        let grid = SurfaceGrid::from_fn(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), 3, |_, _| 2.0).unwrap();
        let field = height_field(&grid);
        assert!(field.positions.iter().all(|p| (p[1] - HEIGHT_SCALE * 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_render_without_history() {
        let html = render_surface(&ramp(4), &SurfaceStats::default().with_title("Ramp"), Theme::Dark);
        assert!(html.contains("<title>Ramp</title>"));
        assert!(html.contains("surface_0"));
        assert!(html.contains("stats-panel"));
        assert!(!html.contains("mse-chart"));
    }

    #[test]
    fn test_render_trained_coder() {
        let mut coder = TileCoder::new(TileCoderConfig::sinusoid_surface()).unwrap();
        let mut log = TrainingLog::new();
        for b in 0..3 {
            let batch: Vec<Sample> = (0..10)
                .map(|i| {
                    let x = (b * 10 + i) as f64 * 0.2;
                    Sample::new(vec![x, 6.0 - x], x.sin())
                })
                .collect();
            let mse = train_batch(&mut coder, &batch).unwrap();
            log.record(batch.len(), mse);
        }
        let grid = SurfaceGrid::sample(&coder, 10).unwrap();
        let stats = SurfaceStats::collect(&coder, &log).with_grid_mse(0.25);
        assert_eq!(stats.samples_seen, 30);
        assert_eq!(stats.mse_history.len(), 3);

        let html = render_surface(&grid, &stats, Theme::Light);
        assert!(html.contains("mse-chart"));
        assert!(html.contains("Batch MSE (3 batches)"));
        assert!(html.contains("0.25000"));
        assert!(html.contains("8 × 8"));
    }
}
