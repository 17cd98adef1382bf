//! Tiny built-in bitmap font, enough for debug text such as the FPS readout.

/// Width of a single glyph in pixels.
const GLYPH_WIDTH: usize = 5;

/// Height of a single glyph in pixels.
const GLYPH_HEIGHT: usize = 7;

/// Fixed-size bitmap font.
///
/// Every glyph is a 5x7 bitmap placed in a cell of [`Font::advance`]x[`Font::line_height`] pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// Horizontal distance between the starts of two consecutive glyphs.
    advance: usize,
    /// Vertical distance between two lines.
    line_height: usize,
}

impl Font {
    /// The font shipped with the crate, drawn at an 8 pixel line height.
    ///
    /// Contains the digits, upper-case letters and `: . -`, lower-case letters are drawn as upper-case.
    #[inline]
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            advance: GLYPH_WIDTH + 1,
            line_height: GLYPH_HEIGHT + 1,
        }
    }

    /// Horizontal distance between the starts of two consecutive glyphs.
    #[inline]
    #[must_use]
    pub const fn advance(&self) -> usize {
        self.advance
    }

    /// Vertical distance between two lines.
    #[inline]
    #[must_use]
    pub const fn line_height(&self) -> usize {
        self.line_height
    }

    /// Call `set_pixel` with the offset of every filled pixel of the text.
    ///
    /// Characters without a glyph only move the cursor, `\n` starts a new line.
    pub(crate) fn rasterize(&self, text: &str, mut set_pixel: impl FnMut(usize, usize)) {
        let mut cursor_x = 0;
        let mut cursor_y = 0;

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = 0;
                cursor_y += self.line_height;
                continue;
            }

            if let Some(rows) = glyph(ch) {
                for (y, row) in rows.iter().enumerate() {
                    for x in 0..GLYPH_WIDTH {
                        // Leftmost pixel is the highest of the five bits
                        if row & (1 << (GLYPH_WIDTH - 1 - x)) != 0 {
                            set_pixel(cursor_x + x, cursor_y + y);
                        }
                    }
                }
            }

            cursor_x += self.advance;
        }
    }
}

/// Bitmap rows of a character, `None` if it can't be drawn.
const fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        _ => return None,
    };

    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::Font;

    /// Collect all pixels of a text.
    fn pixels(text: &str) -> Vec<(usize, usize)> {
        let mut pixels = Vec::new();
        Font::builtin().rasterize(text, |x, y| pixels.push((x, y)));

        pixels
    }

    #[test]
    fn letter_f() {
        let pixels = pixels("F");

        // Top bar
        assert!((0..5).all(|x| pixels.contains(&(x, 0))));
        // Stem
        assert!((0..7).all(|y| pixels.contains(&(0, y))));
        // Open on the right below the top bar
        assert!(!pixels.contains(&(4, 1)));
    }

    #[test]
    fn unknown_characters_only_advance() {
        assert!(pixels(" ").is_empty());
        assert!(pixels("~").is_empty());

        let shifted = pixels(" 1");
        assert!(shifted.iter().all(|(x, _)| *x >= Font::builtin().advance()));
        assert_eq!(shifted.len(), pixels("1").len());
    }

    #[test]
    fn lower_case_uses_upper_case_glyphs() {
        assert_eq!(pixels("fps"), pixels("FPS"));
    }

    #[test]
    fn newline_moves_down() {
        let font = Font::builtin();
        let pixels = pixels("-\n-");

        assert!(pixels.contains(&(0, 3)));
        assert!(pixels.contains(&(0, 3 + font.line_height())));
    }
}
