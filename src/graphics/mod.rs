//! Types and helpers for drawing on the GPU.

pub(crate) mod data;
pub(crate) mod gpu;
pub(crate) mod post_processing;
pub(crate) mod render_target;
pub(crate) mod shader;
pub(crate) mod state;
pub(crate) mod uniform;

use wgpu::Color;

/// Convert an `u32` color to a WGPU [`wgpu::Color`] taking in account sRGB.
fn u32_to_wgpu_color(argb: u32, is_srgb: bool) -> Color {
    let [a, r, g, b] = argb.to_be_bytes().map(|channel| f64::from(channel) / 255.0);

    if is_srgb {
        // Convert to linear space, the surface converts it back, alpha is already linear
        let r = r.powf(2.2);
        let g = g.powf(2.2);
        let b = b.powf(2.2);

        Color { r, g, b, a }
    } else {
        Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn color_channels() {
        let color = super::u32_to_wgpu_color(0xFF00_80FF, false);

        assert!((color.a - 1.0).abs() < f64::EPSILON);
        assert!(color.r.abs() < f64::EPSILON);
        assert!((color.g - 128.0 / 255.0).abs() < f64::EPSILON);
        assert!((color.b - 1.0).abs() < f64::EPSILON);

        // Linearized half intensity is darker
        let color = super::u32_to_wgpu_color(0xFF00_80FF, true);
        assert!(color.g < 128.0 / 255.0);
    }
}
