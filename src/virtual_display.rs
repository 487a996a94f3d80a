//! An in-memory character LCD for host tests and simulations.

use heapless::String;
use smart_leds::RGB8;

use crate::{CharDisplay, Glyph};

/// Programmable glyph cells read back as this character.
pub const GLYPH_PLACEHOLDER: char = '*';

/// A `COLS` x `ROWS` character LCD that records what it was told to show.
///
/// Like real hardware, uploading a glyph leaves the cursor pointing into glyph memory:
/// text written before the next [`CharDisplay::set_cursor`] is lost.
pub struct VirtualLcd<const COLS: usize, const ROWS: usize> {
    cells: [[u8; COLS]; ROWS],
    cursor: Option<(usize, usize)>,
    glyphs: [Glyph; 8],
    backlight: RGB8,
    clear_count: usize,
    glyph_upload_count: usize,
}

impl<const COLS: usize, const ROWS: usize> Default for VirtualLcd<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize> VirtualLcd<COLS, ROWS> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
            cursor: Some((0, 0)),
            glyphs: [[0; 8]; 8],
            backlight: RGB8::new(0, 0, 0),
            clear_count: 0,
            glyph_upload_count: 0,
        }
    }

    /// The visible text of `row`; glyph cells read back as [`GLYPH_PLACEHOLDER`].
    #[must_use]
    pub fn row_text(&self, row: usize) -> String<COLS> {
        let mut text = String::new();
        if let Some(cells) = self.cells.get(row) {
            for &byte in cells {
                let ch = if byte < 8 {
                    GLYPH_PLACEHOLDER
                } else {
                    char::from(byte)
                };
                // Capacity is exactly COLS, one char per cell.
                let _ = text.push(ch);
            }
        }
        text
    }

    /// Raw character code at `(col, row)`.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<u8> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    /// Bitmap currently stored in `slot`.
    #[must_use]
    pub fn glyph(&self, slot: u8) -> Option<&Glyph> {
        self.glyphs.get(usize::from(slot))
    }

    #[must_use]
    pub const fn backlight(&self) -> RGB8 {
        self.backlight
    }

    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clear_count
    }

    #[must_use]
    pub const fn glyph_upload_count(&self) -> usize {
        self.glyph_upload_count
    }
}

impl<const COLS: usize, const ROWS: usize> CharDisplay for VirtualLcd<COLS, ROWS> {
    fn set_cursor(&mut self, col: u8, row: u8) {
        self.cursor = Some((usize::from(col), usize::from(row)));
    }

    fn write_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_byte(byte);
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let Some((col, row)) = self.cursor else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            *cell = byte;
        }
        self.cursor = Some((col.saturating_add(1), row));
    }

    fn create_glyph(&mut self, slot: u8, glyph: &Glyph) {
        if let Some(stored) = self.glyphs.get_mut(usize::from(slot & 0x07)) {
            *stored = *glyph;
        }
        self.glyph_upload_count = self.glyph_upload_count.saturating_add(1);
        self.cursor = None;
    }

    fn set_backlight(&mut self, color: RGB8) {
        self.backlight = color;
    }

    fn clear(&mut self) {
        self.cells = [[b' '; COLS]; ROWS];
        self.cursor = Some((0, 0));
        self.clear_count = self.clear_count.saturating_add(1);
    }
}
