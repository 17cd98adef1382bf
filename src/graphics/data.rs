//! Data types that can be send to the GPU.

use bytemuck::{Pod, Zeroable};

/// Screen information passed to the post-processing shader as the `screen` uniform.
///
/// Mirrors `ScreenInfo` in `shaders/prelude.wgsl`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct ScreenInfo {
    /// Size of the offscreen surface in pixels.
    pub(crate) resolution: [f32; 2],
    /// Size of the letterboxed area in window pixels.
    pub(crate) output_size: [f32; 2],
}

impl ScreenInfo {
    /// Describe the offscreen surface, before it's placed in the window.
    pub(crate) fn new(render_width: u32, render_height: u32) -> Self {
        let resolution = [render_width as f32, render_height as f32];

        Self {
            resolution,
            output_size: resolution,
        }
    }
}
