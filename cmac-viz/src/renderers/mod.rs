//! Visualization renderers for trained tile coders.
//!
//! Each renderer produces a self-contained HTML document with an embedded
//! Three.js WebGL scene built procedurally from the sampled predictions.

pub mod surface;

pub use surface::{render_surface, SurfaceStats};
