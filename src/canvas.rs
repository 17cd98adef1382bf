//! Offscreen pixel surface the scene is drawn to.

use crate::{font::Font, rectangle::Rectangle};

/// Fixed-size pixel buffer which gets uploaded to the GPU every frame.
///
/// Colors are `0xAARRGGBB` values, the origin is the top-left corner and the Y axis points down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Horizontal amount of pixels.
    width: usize,
    /// Vertical amount of pixels.
    height: usize,
    /// Pixels row by row.
    buffer: Vec<u32>,
}

impl Canvas {
    /// Allocate a canvas filled with transparent black.
    #[inline]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width as usize;
        let height = height as usize;
        let buffer = vec![0; width * height];

        Self {
            width,
            height,
            buffer,
        }
    }

    /// Fill the canvas with a single color.
    #[inline]
    pub fn fill(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Set a pixel on the buffer at the coordinate passed.
    ///
    /// If the coordinate is out of bounds nothing will be done.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }

        self.buffer[x + y * self.width] = color;
    }

    /// Color of a pixel, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.buffer.get(x + y * self.width).copied()
    }

    /// Fill a rectangle, clipped to the canvas.
    ///
    /// A pixel is covered when its center lies inside the rectangle.
    #[inline]
    pub fn fill_rect(&mut self, rect: &Rectangle, color: u32) {
        profiling::scope!("Fill rectangle");

        let start_x = Self::first_covered_pixel(rect.x, self.width);
        let end_x = Self::first_covered_pixel(rect.right(), self.width);
        let start_y = Self::first_covered_pixel(rect.y, self.height);
        let end_y = Self::first_covered_pixel(rect.bottom(), self.height);

        if start_x >= end_x {
            return;
        }

        for y in start_y..end_y {
            let y_index = y * self.width;
            self.buffer[(y_index + start_x)..(y_index + end_x)].fill(color);
        }
    }

    /// Draw text with the top-left corner of the first glyph at the position.
    ///
    /// Pixels outside of the canvas are skipped.
    #[inline]
    pub fn draw_text(&mut self, font: &Font, x: i32, y: i32, text: &str, color: u32) {
        font.rasterize(text, |offset_x, offset_y| {
            // Texts longer than the canvas are clipped anyway
            let (Ok(offset_x), Ok(offset_y)) = (i32::try_from(offset_x), i32::try_from(offset_y))
            else {
                return;
            };

            self.set_pixel(x.saturating_add(offset_x), y.saturating_add(offset_y), color);
        });
    }

    /// Convert to tightly packed RGBA bytes as expected by the GPU texture.
    #[inline]
    pub fn write_rgba(&self, target: &mut Vec<u8>) {
        target.clear();
        target.extend(self.buffer.iter().flat_map(|argb| {
            let [a, r, g, b] = argb.to_be_bytes();

            [r, g, b, a]
        }));
    }

    /// Horizontal amount of pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Vertical amount of pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width and height in pixels.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (
            u32::try_from(self.width).unwrap_or(u32::MAX),
            u32::try_from(self.height).unwrap_or(u32::MAX),
        )
    }

    /// Index of the first pixel whose center lies past the edge, clamped to the size of the axis.
    fn first_covered_pixel(edge: f32, axis_size: usize) -> usize {
        let index = (edge - 0.5).ceil();
        if index.is_nan() || index <= 0.0 {
            0
        } else {
            (index as usize).min(axis_size)
        }
    }
}
