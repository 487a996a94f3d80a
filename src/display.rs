//! The character-display collaborator and the line helpers every screen uses.

use core::fmt::Write as _;

use heapless::String;
use smart_leds::RGB8;

use crate::{Glyph, LINE_CAPACITY, Result};

/// One formatted screen line.
pub type Line = String<LINE_CAPACITY>;

/// A character LCD with programmable glyphs and an RGB backlight.
///
/// Every call is synchronous and idempotent under repetition, so screens are simply
/// redrawn on every tick.
pub trait CharDisplay {
    /// Move the write cursor to `(col, row)`.
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Write text at the cursor, advancing it.
    fn write_str(&mut self, text: &str);

    /// Write one character code at the cursor; codes `0..8` are the programmable glyphs.
    fn write_byte(&mut self, byte: u8);

    /// Upload a custom glyph into a programmable slot.
    ///
    /// The upload relocates the controller's address pointer, so callers must call
    /// [`CharDisplay::set_cursor`] before writing text again.
    fn create_glyph(&mut self, slot: u8, glyph: &Glyph);

    /// Set the backlight color.
    fn set_backlight(&mut self, color: RGB8);

    /// Blank the screen and home the cursor.
    fn clear(&mut self);
}

/// Write `text` on `row` starting at column 0, padding with spaces to `width`.
///
/// Padding overwrites whatever a previous, longer value left behind.
pub fn write_line<D: CharDisplay + ?Sized>(display: &mut D, row: usize, text: &str, width: usize) {
    let written = write_clipped(display, row, text, width);
    pad(display, written, width);
}

/// Write at most `width` characters of `text` on `row` from column 0, with no padding.
///
/// Returns the number of columns written; the cursor is left just after them.
#[expect(clippy::cast_possible_truncation, reason = "rows fit a u8")]
pub fn write_clipped<D: CharDisplay + ?Sized>(
    display: &mut D,
    row: usize,
    text: &str,
    width: usize,
) -> usize {
    display.set_cursor(0, row as u8);
    let mut written = 0usize;
    for ch in text.chars().take(width) {
        let mut buf = [0u8; 4];
        display.write_str(ch.encode_utf8(&mut buf));
        written = written.saturating_add(1);
    }
    written
}

/// Blank from the cursor, which sits at column `from`, up to `width`.
pub fn pad<D: CharDisplay + ?Sized>(display: &mut D, from: usize, width: usize) {
    for _ in from..width {
        display.write_byte(b' ');
    }
}

/// Format arguments into a [`Line`].
///
/// # Errors
///
/// Returns [`crate::Error::FormatError`] if the text does not fit in a line.
pub fn line(args: core::fmt::Arguments<'_>) -> Result<Line> {
    let mut text = Line::new();
    text.write_fmt(args)?;
    Ok(text)
}

/// Keep the first `keep` characters of `text`, marking a cut with "...".
///
/// Text of `keep` characters or fewer is returned unchanged.
///
/// # Errors
///
/// Returns [`crate::Error::FormatError`] if the result does not fit in a line.
pub fn truncate_with_ellipsis(text: &str, keep: usize) -> Result<Line> {
    let mut out = Line::new();
    if text.chars().count() <= keep {
        out.push_str(text)?;
        return Ok(out);
    }
    for ch in text.chars().take(keep) {
        out.push(ch)?;
    }
    out.push_str("...")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_left_alone() {
        assert_eq!(truncate_with_ellipsis("2.33", 13).unwrap().as_str(), "2.33");
        assert_eq!(
            truncate_with_ellipsis("1234567890123", 13).unwrap().as_str(),
            "1234567890123"
        );
    }

    #[test]
    fn long_text_is_cut_to_thirteen_plus_ellipsis() {
        let cut = truncate_with_ellipsis("12345678901234567", 13).unwrap();
        assert_eq!(cut.as_str(), "1234567890123...");
        assert_eq!(cut.len(), 16);
    }
}
