//! Bitmap text metrics and rasterization.
//!
//! Tooltip layout needs the on-screen size of a text block before it is
//! drawn, the same way an immediate-mode GUI's `CalcTextSize` works. The
//! [`TextMetrics`] trait is that seam. [`GlyphFont`] implements it with a
//! fixed 5x7 pixel bitmap font, and can also rasterize text into pixel
//! rectangles for the wgpu backend.
//!
//! Layout rules:
//!
//! - Each character advances 6 font pixels (5 glyph columns + 1 gap).
//! - A tab advances to the next multiple of [`TAB_COLUMNS`] columns.
//! - Lines are 9 font pixels apart (7 glyph rows + 2 gap).
//! - Characters without a glyph advance but draw nothing.

use std::collections::HashMap;

use dobj_host::math::Vec2;

/// Columns per tab stop.
pub const TAB_COLUMNS: usize = 4;

const GLYPH_ADVANCE: f32 = 6.0;
const GLYPH_WIDTH: f32 = 5.0;
const GLYPH_HEIGHT: f32 = 7.0;
const LINE_ADVANCE: f32 = 9.0;

// ---------------------------------------------------------------------------
// TextMetrics
// ---------------------------------------------------------------------------

/// Measures text blocks in screen units.
pub trait TextMetrics {
    /// Size of the bounding box of `text`, which may contain newlines.
    fn calc_text_size(&self, text: &str) -> Vec2;
}

// ---------------------------------------------------------------------------
// Glyph table
// ---------------------------------------------------------------------------

/// Rows are top to bottom; bit 4 is the leftmost column.
const GLYPHS: &[(char, [u8; 7])] = &[
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    ('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('a', [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F]),
    ('b', [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E]),
    ('c', [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E]),
    ('d', [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F]),
    ('e', [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E]),
    ('f', [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08]),
    ('g', [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E]),
    ('h', [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11]),
    ('i', [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E]),
    ('j', [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C]),
    ('k', [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12]),
    ('l', [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('m', [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11]),
    ('n', [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11]),
    ('o', [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E]),
    ('p', [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10]),
    ('q', [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01]),
    ('r', [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10]),
    ('s', [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E]),
    ('t', [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06]),
    ('u', [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D]),
    ('v', [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('w', [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A]),
    ('x', [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11]),
    ('y', [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E]),
    ('z', [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F]),
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08]),
    (':', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
    (';', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08]),
    ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
    ('?', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('+', [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
    ('=', [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00]),
    ('/', [0x01, 0x02, 0x02, 0x04, 0x08, 0x08, 0x10]),
    ('(', [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
    (')', [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
    ('[', [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E]),
    (']', [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E]),
    ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F]),
    ('#', [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A]),
    ('%', [0x19, 0x1A, 0x02, 0x04, 0x08, 0x0B, 0x13]),
    ('<', [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02]),
    ('>', [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08]),
    ('\'', [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00]),
    ('*', [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00]),
];

// ---------------------------------------------------------------------------
// GlyphFont
// ---------------------------------------------------------------------------

/// One lit font pixel, scaled to screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub min: Vec2,
    pub max: Vec2,
}

/// A 5x7 bitmap font drawn at an integer-ish pixel scale.
#[derive(Debug, Clone)]
pub struct GlyphFont {
    glyphs: HashMap<char, [u8; 7]>,
    scale: f32,
}

impl GlyphFont {
    /// Font where each glyph pixel is `scale` screen units.
    pub fn new(scale: f32) -> Self {
        Self {
            glyphs: GLYPHS.iter().copied().collect(),
            scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Bitmap rows for `ch`, if the font has it.
    pub fn glyph(&self, ch: char) -> Option<&[u8; 7]> {
        self.glyphs.get(&ch)
    }

    /// Height of one line of text in screen units.
    pub fn line_height(&self) -> f32 {
        LINE_ADVANCE * self.scale
    }

    /// Visit every character with its column and line, expanding tabs.
    fn layout(text: &str, mut visit: impl FnMut(char, usize, usize)) {
        for (line, row) in text.split('\n').enumerate() {
            let mut column = 0;
            for ch in row.chars() {
                if ch == '\t' {
                    column = (column / TAB_COLUMNS + 1) * TAB_COLUMNS;
                    continue;
                }
                visit(ch, column, line);
                column += 1;
            }
        }
    }

    /// Columns taken by one line, tabs expanded.
    fn columns(line: &str) -> usize {
        line.chars().fold(0, |column, ch| {
            if ch == '\t' {
                (column / TAB_COLUMNS + 1) * TAB_COLUMNS
            } else {
                column + 1
            }
        })
    }

    /// Rasterize `text` with its top-left corner at `origin`.
    ///
    /// Returns one rectangle per lit glyph pixel.
    pub fn rasterize(&self, text: &str, origin: Vec2) -> Vec<PixelRect> {
        let s = self.scale;
        let mut pixels = Vec::new();
        Self::layout(text, |ch, column, line| {
            let Some(rows) = self.glyphs.get(&ch) else {
                return;
            };
            let x0 = origin.x + column as f32 * GLYPH_ADVANCE * s;
            let y0 = origin.y + line as f32 * LINE_ADVANCE * s;
            for (r, bits) in rows.iter().enumerate() {
                for c in 0..5 {
                    if (bits >> (4 - c)) & 1 == 1 {
                        let min = Vec2::new(x0 + c as f32 * s, y0 + r as f32 * s);
                        pixels.push(PixelRect {
                            min,
                            max: Vec2::new(min.x + s, min.y + s),
                        });
                    }
                }
            }
        });
        pixels
    }
}

impl Default for GlyphFont {
    /// Two screen units per font pixel.
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl TextMetrics for GlyphFont {
    fn calc_text_size(&self, text: &str) -> Vec2 {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for row in text.split('\n') {
            lines += 1;
            widest = widest.max(Self::columns(row));
        }

        let width = if widest == 0 {
            0.0
        } else {
            (widest as f32 - 1.0) * GLYPH_ADVANCE + GLYPH_WIDTH
        };
        let height = (lines as f32 - 1.0) * LINE_ADVANCE + GLYPH_HEIGHT;
        Vec2::new(width * self.scale, height * self.scale)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_tooltip_character_set() {
        let font = GlyphFont::new(1.0);
        for ch in ('0'..='9').chain('A'..='Z').chain('a'..='z') {
            assert!(font.glyph(ch).is_some(), "missing glyph for '{ch}'");
        }
        for ch in ":()[]<>.,-+%/_'".chars() {
            assert!(font.glyph(ch).is_some(), "missing glyph for '{ch}'");
        }
    }

    #[test]
    fn single_line_size() {
        let font = GlyphFont::new(1.0);
        assert_eq!(font.calc_text_size("A"), Vec2::new(5.0, 7.0));
        assert_eq!(font.calc_text_size("AB"), Vec2::new(11.0, 7.0));
        assert_eq!(font.calc_text_size(""), Vec2::new(0.0, 7.0));
    }

    #[test]
    fn multi_line_size_uses_widest_line() {
        let font = GlyphFont::new(2.0);
        let size = font.calc_text_size("AB\nABCD\nA");
        assert_eq!(size, Vec2::new((3.0 * 6.0 + 5.0) * 2.0, (2.0 * 9.0 + 7.0) * 2.0));
    }

    #[test]
    fn tabs_advance_to_tab_stops() {
        let font = GlyphFont::new(1.0);
        // "\tX" puts X in column 4.
        assert_eq!(font.calc_text_size("\tX"), Vec2::new(4.0 * 6.0 + 5.0, 7.0));
        assert_eq!(font.calc_text_size("ab\tX").x, font.calc_text_size("\tX").x);
    }

    #[test]
    fn space_rasterizes_to_nothing() {
        let font = GlyphFont::new(1.0);
        assert!(font.rasterize("   ", Vec2::ZERO).is_empty());
        assert!(!font.rasterize("A", Vec2::ZERO).is_empty());
    }

    #[test]
    fn rasterized_pixels_stay_inside_measured_box() {
        let font = GlyphFont::new(3.0);
        let text = "HP: 1,234/5,678\n\tType: Action";
        let origin = Vec2::new(10.0, 20.0);
        let size = font.calc_text_size(text);
        for px in font.rasterize(text, origin) {
            assert!(px.min.x >= origin.x && px.min.y >= origin.y);
            assert!(px.max.x <= origin.x + size.x + 1e-3, "{px:?}");
            assert!(px.max.y <= origin.y + size.y + 1e-3, "{px:?}");
        }
    }
}
