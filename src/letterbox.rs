//! Fit the offscreen surface inside the window while preserving its aspect ratio.

use crate::rectangle::Rectangle;

/// Uniformly scaled and centered placement of the offscreen surface inside the window.
///
/// The unused area on one of the axes forms the letterbox (horizontal bars) or pillarbox (vertical bars).
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Letterbox {
    /// Factor applied to both axes of the offscreen surface.
    pub scale: f32,
    /// Area of the window the offscreen surface is drawn to, in window pixels.
    pub dest: Rectangle,
}

impl Letterbox {
    /// Calculate the largest uniform scale at which the surface fits the screen and center it.
    ///
    /// When either size has no area the scale and destination are zero.
    ///
    /// # Arguments
    ///
    /// * `surface_size` - Width and height of the offscreen surface in pixels.
    /// * `screen_size` - Width and height of the drawable part of the window in pixels.
    ///
    /// # Example
    ///
    /// ```rust
    /// use letterbox::Letterbox;
    ///
    /// // A 16:9 surface in a 4:3 window gets bars at the top and bottom
    /// let letterbox = Letterbox::fit((320, 180), (640, 480));
    ///
    /// assert_eq!(letterbox.scale, 2.0);
    /// assert_eq!(letterbox.dest.y, 60.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn fit(surface_size: (u32, u32), screen_size: (u32, u32)) -> Self {
        let (surface_width, surface_height) = (surface_size.0 as f32, surface_size.1 as f32);
        let (screen_width, screen_height) = (screen_size.0 as f32, screen_size.1 as f32);

        if surface_width <= 0.0
            || surface_height <= 0.0
            || screen_width <= 0.0
            || screen_height <= 0.0
        {
            return Self {
                scale: 0.0,
                dest: Rectangle::default(),
            };
        }

        // The axis with the smallest ratio is the one that fits exactly
        let scale = (screen_width / surface_width).min(screen_height / surface_height);

        let width = surface_width * scale;
        let height = surface_height * scale;

        let dest = Rectangle::new(
            (screen_width - width) * 0.5,
            (screen_height - height) * 0.5,
            width,
            height,
        );

        Self { scale, dest }
    }

    /// Whether there's nothing to draw.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dest.width <= 0.0 || self.dest.height <= 0.0
    }
}
