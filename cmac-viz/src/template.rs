//! Self-contained HTML documents for surface plots.
//!
//! A document embeds Three.js with OrbitControls from a CDN, a full-window
//! canvas, HUD panels positioned over it, and optional 2D chart canvases
//! inside those panels.

use std::fmt::Write;

/// Position anchor for HUD panels.
#[derive(Debug, Clone, Copy)]
pub enum PanelPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PanelPosition {
    fn css(&self) -> &'static str {
        match self {
            Self::TopLeft => "top: 12px; left: 12px;",
            Self::TopRight => "top: 12px; right: 12px;",
            Self::BottomLeft => "bottom: 12px; left: 12px;",
            Self::BottomRight => "bottom: 12px; right: 12px;",
        }
    }
}

/// A HUD overlay panel.
#[derive(Debug, Clone)]
pub struct HudPanel {
    pub id: String,
    pub position: PanelPosition,
    pub content_html: String,
    pub width: Option<String>,
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn bg_color(&self) -> &'static str {
        match self {
            Self::Dark => "#0b0b10",
            Self::Light => "#f4f4f6",
        }
    }

    pub fn text_color(&self) -> &'static str {
        match self {
            Self::Dark => "#e0e0e0",
            Self::Light => "#1a1a2e",
        }
    }

    pub fn panel_bg(&self) -> &'static str {
        match self {
            Self::Dark => "rgba(12, 12, 20, 0.85)",
            Self::Light => "rgba(244, 244, 246, 0.9)",
        }
    }

    pub fn accent_color(&self) -> &'static str {
        match self {
            Self::Dark => "#ffb000",
            Self::Light => "#c04000",
        }
    }

    pub fn scene_bg_hex(&self) -> &'static str {
        match self {
            Self::Dark => "0x0b0b10",
            Self::Light => "0xf4f4f6",
        }
    }
}

/// Builder for a single-page visualization.
pub struct HtmlDocument {
    title: String,
    theme: Theme,
    panels: Vec<HudPanel>,
    scene_js: String,
    chart_js: String,
}

impl HtmlDocument {
    pub fn new(title: &str, theme: Theme) -> Self {
        Self {
            title: title.to_string(),
            theme,
            panels: Vec::new(),
            scene_js: String::new(),
            chart_js: String::new(),
        }
    }

    pub fn add_panel(&mut self, id: &str, position: PanelPosition, content: &str) {
        self.panels.push(HudPanel {
            id: id.to_string(),
            position,
            content_html: content.to_string(),
            width: None,
        });
    }

    pub fn add_panel_with_width(&mut self, id: &str, position: PanelPosition, content: &str, width: &str) {
        self.panels.push(HudPanel {
            id: id.to_string(),
            position,
            content_html: content.to_string(),
            width: Some(width.to_string()),
        });
    }

    pub fn set_scene_js(&mut self, js: &str) {
        self.scene_js = js.to_string();
    }

    /// JS run once after the scene is built; typically draws into panel canvases.
    pub fn set_chart_js(&mut self, js: &str) {
        self.chart_js = js.to_string();
    }

    /// Render the complete HTML document.
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(self.scene_js.len() + 8192);

        let _ = write!(html, r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/controls/OrbitControls.js"></script>
"#, title = html_escape(&self.title));

        let _ = write!(html, r#"<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
    background: {bg};
    color: {text};
    font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif;
    overflow: hidden;
}}
#canvas-container {{ position: fixed; top: 0; left: 0; width: 100%; height: 100%; }}
.hud-panel {{
    position: absolute;
    background: {panel_bg};
    border: 1px solid {accent}44;
    border-radius: 8px;
    padding: 12px 16px;
    font-size: 13px;
    line-height: 1.5;
    z-index: 10;
}}
.hud-panel h3 {{
    color: {accent};
    font-size: 11px;
    text-transform: uppercase;
    letter-spacing: 1.5px;
    margin-bottom: 6px;
}}
.stat-row {{ display: flex; justify-content: space-between; gap: 16px; padding: 2px 0; }}
.stat-row .key {{ color: {text}88; }}
.stat-row .val {{ color: {accent}; font-weight: 600; font-variant-numeric: tabular-nums; }}
.color-legend {{ display: flex; align-items: center; gap: 2px; margin-top: 6px; }}
.color-legend .swatch {{ width: 14px; height: 10px; }}
</style>
</head>
<body>
<div id="canvas-container"></div>
"#,
            bg = self.theme.bg_color(),
            text = self.theme.text_color(),
            panel_bg = self.theme.panel_bg(),
            accent = self.theme.accent_color(),
        );

        for panel in &self.panels {
            let width_css = panel.width.as_deref().map(|w| format!("width: {};", w)).unwrap_or_default();
            let _ = write!(html, r#"<div id="{id}" class="hud-panel" style="{pos} {width}">
{content}
</div>
"#,
                id = panel.id,
                pos = panel.position.css(),
                width = width_css,
                content = panel.content_html,
            );
        }

        let _ = write!(html, r#"<script>
const container = document.getElementById('canvas-container');
const scene = new THREE.Scene();
scene.background = new THREE.Color({scene_bg});

const camera = new THREE.PerspectiveCamera(50, container.clientWidth / container.clientHeight, 0.1, 1000);
const renderer = new THREE.WebGLRenderer({{ antialias: true }});
renderer.setSize(container.clientWidth, container.clientHeight);
renderer.setPixelRatio(window.devicePixelRatio);
container.appendChild(renderer.domElement);

const controls = new THREE.OrbitControls(camera, renderer.domElement);
controls.enableDamping = true;
controls.dampingFactor = 0.05;
controls.autoRotate = true;
controls.autoRotateSpeed = 0.6;

// === Scene Content ===
{scene_js}
"#,
            scene_bg = self.theme.scene_bg_hex(),
            scene_js = self.scene_js,
        );

        if !self.chart_js.is_empty() {
            html.push_str("\n// === Charts ===\n");
            html.push_str(&self.chart_js);
        }

        html.push_str(r#"
function animate() {
    requestAnimationFrame(animate);
    controls.update();
    renderer.render(scene, camera);
}

window.addEventListener('resize', () => {
    camera.aspect = container.clientWidth / container.clientHeight;
    camera.updateProjectionMatrix();
    renderer.setSize(container.clientWidth, container.clientHeight);
});

animate();
</script>
</body>
</html>"#);

        html
    }
}

/// Escape text for inclusion in HTML element content.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
