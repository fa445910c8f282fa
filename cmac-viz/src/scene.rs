// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Three.js scene builder for height-field plots.
//!
//! `SceneBuilder` accumulates lights, height-field meshes, axis labels and
//! raw JS snippets, then serializes them to JavaScript that populates the
//! `scene` and `camera` objects declared by [`crate::template::HtmlDocument`].

use std::fmt::Write;

use crate::color::rgb_to_threejs_hex;

const AMBIENT_COLOR: u32 = 0x606070;
const AMBIENT_INTENSITY: f64 = 0.6;

/// A regular grid of vertices with per-vertex colors, rendered as a triangle mesh.
///
/// `positions` and `colors` are row-major, `rows × cols` entries each.
#[derive(Debug, Clone)]
pub struct HeightField {
    pub cols: usize,
    pub rows: usize,
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<(f32, f32, f32)>,
    /// Overlay a wireframe of this color on the mesh
    pub wireframe: Option<(f32, f32, f32)>,
}

impl HeightField {
    /// Two triangles per grid cell, as flat vertex indices.
    pub fn triangle_indices(&self) -> Vec<usize> {
        if self.cols < 2 || self.rows < 2 {
            return Vec::new();
        }
        let mut idx = Vec::with_capacity((self.cols - 1) * (self.rows - 1) * 6);
        for j in 0..self.rows - 1 {
            for i in 0..self.cols - 1 {
                let a = j * self.cols + i;
                let b = a + 1;
                let c = a + self.cols;
                let d = c + 1;
                idx.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }
        idx
    }
}

/// A text label in 3D space (Sprite with a canvas texture).
#[derive(Debug, Clone)]
pub struct SceneLabel {
    pub position: [f64; 3],
    pub text: String,
    pub color: (f32, f32, f32),
    pub scale: f64,
}

/// A point light source.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: [f64; 3],
    pub color: u32,
    pub intensity: f64,
    pub distance: f64,
}

/// Camera configuration.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub look_at: [f64; 3],
    pub fov: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [9.0, 8.0, 9.0],
            look_at: [0.0, 1.0, 0.0],
            fov: 50.0,
        }
    }
}

/// Builder that accumulates Three.js scene objects and emits JavaScript.
pub struct SceneBuilder {
    camera: CameraConfig,
    point_lights: Vec<PointLight>,
    surfaces: Vec<HeightField>,
    labels: Vec<SceneLabel>,
    custom_js: Vec<String>,
    grid_helper: bool,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            camera: CameraConfig::default(),
            point_lights: Vec::new(),
            surfaces: Vec::new(),
            labels: Vec::new(),
            custom_js: Vec::new(),
            grid_helper: false,
        }
    }

    pub fn set_camera(&mut self, position: [f64; 3], look_at: [f64; 3]) {
        self.camera.position = position;
        self.camera.look_at = look_at;
    }

    pub fn add_point_light(&mut self, position: [f64; 3], color: u32, intensity: f64, distance: f64) {
        self.point_lights.push(PointLight { position, color, intensity, distance });
    }

    pub fn add_height_field(&mut self, field: HeightField) {
        self.surfaces.push(field);
    }

    pub fn add_label(&mut self, position: [f64; 3], text: &str, color: (f32, f32, f32), scale: f64) {
        self.labels.push(SceneLabel {
            position,
            text: text.to_string(),
            color,
            scale,
        });
    }

    pub fn set_grid_helper(&mut self, enabled: bool) {
        self.grid_helper = enabled;
    }

    pub fn add_custom_js(&mut self, js: &str) {
        self.custom_js.push(js.to_string());
    }

    /// Emit the complete scene construction as a JavaScript string.
    pub fn build_js(&self) -> String {
        let mut js = String::with_capacity(65536);

        let _ = write!(js, r#"
camera.fov = {fov};
camera.position.set({cx}, {cy}, {cz});
camera.lookAt({lx}, {ly}, {lz});
camera.updateProjectionMatrix();
"#,
            fov = self.camera.fov,
            cx = self.camera.position[0], cy = self.camera.position[1], cz = self.camera.position[2],
            lx = self.camera.look_at[0], ly = self.camera.look_at[1], lz = self.camera.look_at[2],
        );

        let _ = writeln!(js, "scene.add(new THREE.AmbientLight(0x{:06x}, {}));",
            AMBIENT_COLOR, AMBIENT_INTENSITY);

        for light in &self.point_lights {
            let _ = write!(js, r#"{{
    const l = new THREE.PointLight(0x{color:06x}, {intensity}, {distance});
    l.position.set({x}, {y}, {z});
    scene.add(l);
}}
"#,
                color = light.color, intensity = light.intensity, distance = light.distance,
                x = light.position[0], y = light.position[1], z = light.position[2],
            );
        }

        if self.grid_helper {
            js.push_str("scene.add(new THREE.GridHelper(12, 24, 0x334455, 0x1a1a2e));\n");
        }

        for (n, field) in self.surfaces.iter().enumerate() {
            self.build_height_field_js(&mut js, field, n);
        }

        for (i, label) in self.labels.iter().enumerate() {
            self.build_label_js(&mut js, label, i);
        }

        for chunk in &self.custom_js {
            js.push_str(chunk);
            js.push('\n');
        }

        js
    }

    fn build_height_field_js(&self, js: &mut String, field: &HeightField, n: usize) {
        let count = field.positions.len();
        let _ = write!(js, "{{\n    const pos = new Float32Array([");
        for p in &field.positions {
            let _ = write!(js, "{:.4},{:.4},{:.4},", p[0], p[1], p[2]);
        }
        js.push_str("]);\n    const col = new Float32Array([");
        for c in &field.colors {
            let _ = write!(js, "{:.3},{:.3},{:.3},", c.0, c.1, c.2);
        }
        js.push_str("]);\n    const idx = [");
        for i in field.triangle_indices() {
            let _ = write!(js, "{},", i);
        }
        let _ = write!(js, r#"];
    const geo = new THREE.BufferGeometry();
    geo.setAttribute('position', new THREE.BufferAttribute(pos, 3));
    geo.setAttribute('color', new THREE.BufferAttribute(col, 3));
    geo.setIndex(idx);
    geo.computeVertexNormals();
    const mat = new THREE.MeshPhongMaterial({{
        vertexColors: true, side: THREE.DoubleSide, shininess: 40
    }});
    const mesh = new THREE.Mesh(geo, mat);
    mesh.name = 'surface_{n}';
    mesh.userData.vertexCount = {count};
    scene.add(mesh);
"#);

        if let Some(color) = field.wireframe {
            let _ = write!(js, r#"    const wire = new THREE.LineSegments(
        new THREE.WireframeGeometry(geo),
        new THREE.LineBasicMaterial({{ color: {color}, transparent: true, opacity: 0.15 }})
    );
    wire.name = 'surface_{n}_wire';
    scene.add(wire);
"#,
                color = rgb_to_threejs_hex(color.0, color.1, color.2),
            );
        }
        js.push_str("}\n");
    }

    fn build_label_js(&self, js: &mut String, label: &SceneLabel, idx: usize) {
        let _ = write!(js, r#"{{
    const canvas = document.createElement('canvas');
    canvas.width = 256; canvas.height = 64;
    const ctx = canvas.getContext('2d');
    ctx.fillStyle = 'rgba({r},{g},{b},0.9)';
    ctx.font = 'bold 28px monospace';
    ctx.textAlign = 'center';
    ctx.fillText('{text}', 128, 40);
    const sprite = new THREE.Sprite(new THREE.SpriteMaterial({{
        map: new THREE.CanvasTexture(canvas), transparent: true, depthWrite: false
    }}));
    sprite.position.set({x}, {y}, {z});
    sprite.scale.set({scale}, {sh}, 1);
    sprite.name = 'label_{idx}';
    scene.add(sprite);
}}
"#,
            r = (label.color.0 * 255.0) as u8,
            g = (label.color.1 * 255.0) as u8,
            b = (label.color.2 * 255.0) as u8,
            text = label.text.replace('\\', "\\\\").replace('\'', "\\'"),
            x = label.position[0], y = label.position[1], z = label.position[2],
            scale = label.scale, sh = label.scale * 0.25,
            idx = idx,
        );
    }
}
