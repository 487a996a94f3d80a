//! A three-frame glyph animation shown next to finished results.

use embassy_time::{Duration, Instant};

use crate::{ANIMATION_SLOT, CELEBRATION_FRAMES, CharDisplay};

/// Cycles [`CELEBRATION_FRAMES`] through the display's animation glyph slot.
///
/// The animator remembers which state started it (its owner). Drawing for a different
/// owner, or for any owner after [`GlyphAnimator::release`], restarts the cycle at
/// frame 0, so every state entry begins its own pulse.
#[derive(Clone, Copy, Debug)]
pub struct GlyphAnimator<S> {
    frame: usize,
    next_tick_at: Instant,
    owner: Option<S>,
    interval: Duration,
}

impl<S: Copy + PartialEq> GlyphAnimator<S> {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            frame: 0,
            next_tick_at: Instant::from_ticks(0),
            owner: None,
            interval,
        }
    }

    /// Index of the frame currently in the glyph slot.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub const fn owner(&self) -> Option<S> {
        self.owner
    }

    /// Forget the owner so the next draw starts over at frame 0.
    pub fn release(&mut self) {
        self.owner = None;
    }

    /// Upload the next frame if one is due. Returns `true` if a glyph was uploaded.
    pub fn tick<D: CharDisplay + ?Sized>(&mut self, display: &mut D, owner: S, now: Instant) -> bool {
        if self.owner != Some(owner) {
            self.owner = Some(owner);
            self.frame = 0;
        } else if now >= self.next_tick_at {
            self.frame = self.frame.wrapping_add(1) % CELEBRATION_FRAMES.len();
        } else {
            return false;
        }
        self.next_tick_at = now.checked_add(self.interval).unwrap_or(Instant::MAX);
        if let Some(glyph) = CELEBRATION_FRAMES.get(self.frame) {
            display.create_glyph(ANIMATION_SLOT, glyph);
        }
        true
    }

    /// Tick, then draw the animated glyph at `(col, row)`.
    ///
    /// Uploading moves the cursor, so the cursor is re-homed before the glyph is written.
    pub fn draw<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        owner: S,
        col: u8,
        row: u8,
        now: Instant,
    ) {
        self.tick(display, owner, now);
        display.set_cursor(col, row);
        display.write_byte(ANIMATION_SLOT);
    }
}
