//! Glyph sheet metrics for the dialog's bitmap font.
//!
//! The font resource is a monospace glyph grid: 16 columns by 6 rows covering
//! ASCII 32..=127, cell size inferred from the image dimensions. The sheet is
//! composed below the skin image at load time, so glyph rectangles here carry
//! a vertical offset into the composed atlas.

use crate::atlas::SkinRect;

/// Glyph grid columns.
pub const GLYPH_COLUMNS: u32 = 16;

/// Glyph grid rows.
pub const GLYPH_ROWS: u32 = 6;

/// Code point of the first glyph cell (space).
pub const FIRST_GLYPH: u32 = 32;

/// Monospace glyph-grid metrics into the composed atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphSheet {
    /// Width of one glyph cell in pixels.
    pub cell_width: u32,
    /// Height of one glyph cell in pixels.
    pub cell_height: u32,
    /// Vertical offset of the sheet inside the composed atlas.
    pub offset_y: u32,
}

impl GlyphSheet {
    /// Derive cell metrics from the glyph sheet dimensions.
    pub fn from_dimensions(sheet_width: u32, sheet_height: u32, offset_y: u32) -> Self {
        Self {
            cell_width: (sheet_width / GLYPH_COLUMNS).max(1),
            cell_height: (sheet_height / GLYPH_ROWS).max(1),
            offset_y,
        }
    }

    /// Atlas rectangle for a character. Characters outside ASCII 32..=126
    /// render as `?`.
    pub fn glyph_rect(&self, ch: char) -> SkinRect {
        let code = ch as u32;
        let code = if (FIRST_GLYPH..127).contains(&code) {
            code
        } else {
            '?' as u32
        };
        let cell = code - FIRST_GLYPH;
        SkinRect {
            x: (cell % GLYPH_COLUMNS) * self.cell_width,
            y: self.offset_y + (cell / GLYPH_COLUMNS) * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Monospace width of a string in pixels.
    pub fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.cell_width
    }

    /// Height of one text line in pixels.
    pub fn line_height(&self) -> u32 {
        self.cell_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_metrics_from_dimensions() {
        let glyphs = GlyphSheet::from_dimensions(128, 48, 64);
        assert_eq!(glyphs.cell_width, 8);
        assert_eq!(glyphs.cell_height, 8);
        assert_eq!(glyphs.offset_y, 64);
    }

    #[test]
    fn test_glyph_rect_layout() {
        let glyphs = GlyphSheet::from_dimensions(128, 48, 64);

        // Space is the first cell.
        let space = glyphs.glyph_rect(' ');
        assert_eq!((space.x, space.y), (0, 64));

        // '0' is code 48: cell 16, second row.
        let zero = glyphs.glyph_rect('0');
        assert_eq!((zero.x, zero.y), (0, 72));

        // 'A' is code 65: cell 33, third row, second column.
        let a = glyphs.glyph_rect('A');
        assert_eq!((a.x, a.y), (8, 80));
    }

    #[test]
    fn test_unmapped_characters_fall_back() {
        let glyphs = GlyphSheet::from_dimensions(128, 48, 0);
        assert_eq!(glyphs.glyph_rect('é'), glyphs.glyph_rect('?'));
        assert_eq!(glyphs.glyph_rect('\u{7f}'), glyphs.glyph_rect('?'));
    }

    #[test]
    fn test_measure_is_monospace() {
        let glyphs = GlyphSheet::from_dimensions(128, 48, 0);
        assert_eq!(glyphs.measure(""), 0);
        assert_eq!(glyphs.measure("save1.dat"), 9 * 8);
    }
}
