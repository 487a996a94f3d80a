//! Scrolling text wider than the display.

use core::iter;

use embassy_time::{Duration, Instant};

use crate::display::Line;
use crate::{Result, SCROLL_START_DELAY, SCROLL_STEP_INTERVAL, SCROLL_WRAP_GAP};

/// Scroll timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollConfig {
    /// How long the start of the text stays put after entering a state.
    pub start_delay: Duration,
    /// Time per one-character step.
    pub step: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            start_delay: SCROLL_START_DELAY,
            step: SCROLL_STEP_INTERVAL,
        }
    }
}

/// What happens when the end of the text reaches the right edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollMode {
    /// Wrap around, separating the end from the restart with `gap` blank columns.
    Looping { gap: usize },
    /// Stop with the tail of the text visible.
    Once,
}

impl Default for ScrollMode {
    fn default() -> Self {
        Self::Looping {
            gap: SCROLL_WRAP_GAP,
        }
    }
}

/// Scroll position of one screen line.
#[derive(Clone, Copy, Debug)]
pub struct ScrollState {
    offset: usize,
    tick_at: Instant,
}

impl ScrollState {
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self {
            offset: 0,
            tick_at: now,
        }
    }

    /// Back to the start of the text.
    pub fn reset(&mut self, now: Instant) {
        self.offset = 0;
        self.tick_at = now;
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Advance the offset for `now` and return it.
    ///
    /// Steps missed because the caller polled late are caught up, so the position
    /// depends only on the time since `entered_at`.
    pub fn tick(
        &mut self,
        now: Instant,
        config: &ScrollConfig,
        entered_at: Instant,
        text_len: usize,
        width: usize,
        mode: ScrollMode,
    ) -> usize {
        if text_len <= width {
            self.offset = 0;
            return 0;
        }
        let first_step_at = entered_at
            .checked_add(config.start_delay)
            .unwrap_or(Instant::MAX);
        if now < first_step_at {
            return self.offset;
        }
        if self.tick_at < first_step_at {
            self.tick_at = first_step_at;
            self.advance(text_len, width, mode);
        }
        if config.step == Duration::from_ticks(0) {
            return self.offset;
        }
        while let Some(next) = self.tick_at.checked_add(config.step) {
            if now < next {
                break;
            }
            self.tick_at = next;
            self.advance(text_len, width, mode);
        }
        self.offset
    }

    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "text_len > width here, so the period is non-zero"
    )]
    fn advance(&mut self, text_len: usize, width: usize, mode: ScrollMode) {
        self.offset = match mode {
            ScrollMode::Looping { gap } => (self.offset + 1) % (text_len + gap),
            ScrollMode::Once => (self.offset + 1).min(text_len - width),
        };
    }
}

/// The `width` characters of `text` visible at `offset`.
///
/// # Errors
///
/// Returns [`crate::Error::FormatError`] if `width` exceeds a line's capacity.
pub fn window(text: &str, offset: usize, width: usize, mode: ScrollMode) -> Result<Line> {
    let mut out = Line::new();
    let len = text.chars().count();
    if len <= width {
        out.push_str(text)?;
        return Ok(out);
    }
    match mode {
        ScrollMode::Looping { gap } => {
            let cycle = text.chars().chain(iter::repeat_n(' ', gap)).cycle();
            for ch in cycle.skip(offset).take(width) {
                out.push(ch)?;
            }
        }
        ScrollMode::Once => {
            for ch in text.chars().skip(offset).take(width) {
                out.push(ch)?;
            }
        }
    }
    Ok(out)
}
