//! Color mapping for surface plots.
//!
//! Colors are `(r, g, b)` tuples in `[0.0, 1.0]`, or hex strings for
//! direct HTML/CSS and Three.js embedding.

/// Black → red → yellow → white heat ramp.
///
/// `t` in `[0, 1]`; the red, green and blue channels ramp up one after
/// another over roughly the first, second and last third of the range.
pub fn hot_color(t: f32) -> (f32, f32, f32) {
    const R_END: f32 = 0.365;
    const G_END: f32 = 0.746;
    let t = t.clamp(0.0, 1.0);
    if t < R_END {
        (t / R_END, 0.0, 0.0)
    } else if t < G_END {
        (1.0, (t - R_END) / (G_END - R_END), 0.0)
    } else {
        (1.0, 1.0, (t - G_END) / (1.0 - G_END))
    }
}

/// Normalize `value` into `[0, 1]` over `[min, max]`; a flat range maps to 0.5.
pub fn normalize(value: f64, min: f64, max: f64) -> f32 {
    let span = max - min;
    if span.abs() < 1e-12 {
        0.5
    } else {
        ((value - min) / span).clamp(0.0, 1.0) as f32
    }
}

/// Convert (r, g, b) in [0,1] to a CSS hex color string "#RRGGBB".
pub fn rgb_to_hex(r: f32, g: f32, b: f32) -> String {
    let ri = (r.clamp(0.0, 1.0) * 255.0) as u8;
    let gi = (g.clamp(0.0, 1.0) * 255.0) as u8;
    let bi = (b.clamp(0.0, 1.0) * 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", ri, gi, bi)
}

/// Convert (r, g, b) in [0,1] to a Three.js hex literal "0xRRGGBB".
pub fn rgb_to_threejs_hex(r: f32, g: f32, b: f32) -> String {
    let ri = (r.clamp(0.0, 1.0) * 255.0) as u32;
    let gi = (g.clamp(0.0, 1.0) * 255.0) as u32;
    let bi = (b.clamp(0.0, 1.0) * 255.0) as u32;
    format!("0x{:02x}{:02x}{:02x}", ri, gi, bi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_color_endpoints() {
        assert_eq!(hot_color(0.0), (0.0, 0.0, 0.0));
        assert_eq!(hot_color(1.0), (1.0, 1.0, 1.0));
        assert_eq!(hot_color(-3.0), hot_color(0.0));
    }

    #[test]
    fn test_hot_color_is_monotone() {
        let mut prev = hot_color(0.0);
        for i in 1..=100 {
            let c = hot_color(i as f32 / 100.0);
            assert!(c.0 >= prev.0 && c.1 >= prev.1 && c.2 >= prev.2);
            prev = c;
        }
        let (r, g, b) = hot_color(0.5);
        assert!((r - 1.0).abs() < 1e-6 && g > 0.0 && b == 0.0); // orange
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_hex_formats() {
        assert_eq!(rgb_to_hex(1.0, 0.0, 0.0), "#ff0000");
        assert_eq!(rgb_to_hex(0.0, 0.0, 1.0), "#0000ff");
        assert_eq!(rgb_to_threejs_hex(0.0, 1.0, 0.0), "0x00ff00");
    }
}
