//! Axis-aligned rectangle in pixel coordinates.

/// Rectangle with its origin at the top-left corner.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Rectangle {
    /// Horizontal position of the left edge.
    pub x: f32,
    /// Vertical position of the top edge.
    pub y: f32,
    /// Horizontal size.
    pub width: f32,
    /// Vertical size.
    pub height: f32,
}

impl Rectangle {
    /// Construct a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal position of the right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical position of the bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}
