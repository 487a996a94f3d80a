//! The timed state-machine engine every program runs on.
//!
//! A program is a closed state enum plus a [`StateContext`]. Each tick the program
//! redraws its current screen (drawing is idempotent) and checks one transition
//! predicate:
//!
//! - fixed dwell: [`StateContext::dwell_elapsed`]
//! - settle on input: [`Slider::settled`]
//! - immediate after computation: the handler does bounded work, then enters the next state
//!
//! [`StateContext::enter`] is the only place timers, scroll, the glyph animation, the
//! `computed` bit and the slider's moved flag are reset.

use core::fmt::Debug;

use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

use crate::animation::GlyphAnimator;
use crate::display::{pad, write_clipped, write_line};
use crate::scroll::{ScrollConfig, ScrollMode, ScrollState, window};
use crate::{
    ANIMATION_FRAME_INTERVAL, COLOR_BUSY, COLOR_IDLE, CharDisplay, DISPLAY_COLS, Error, Result,
    Slider, Timebase,
};

/// Whether a screen waits on the operator or is busy with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    Idle,
    Busy,
}

/// Backlight colors for each [`Backlight`] mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub idle: RGB8,
    pub busy: RGB8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle: COLOR_IDLE,
            busy: COLOR_BUSY,
        }
    }
}

impl Palette {
    #[must_use]
    pub const fn color(&self, backlight: Backlight) -> RGB8 {
        match backlight {
            Backlight::Idle => self.idle,
            Backlight::Busy => self.busy,
        }
    }
}

/// A program's closed set of screens.
pub trait ProgramState: Copy + Eq + Debug {
    /// The title screen a run starts on.
    const INITIAL: Self;

    /// Backlight mode while in this state.
    fn backlight(self) -> Backlight;
}

/// Engine settings shared by every program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub palette: Palette,
    pub scroll: ScrollConfig,
    pub animation_interval: Duration,
    /// Display columns available to a line.
    pub width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            scroll: ScrollConfig::default(),
            animation_interval: ANIMATION_FRAME_INTERVAL,
            width: DISPLAY_COLS,
        }
    }
}

/// The per-program engine state: current screen, when it was entered, and the
/// bookkeeping for scrolling, animation and one-shot computations.
#[derive(Clone, Copy, Debug)]
pub struct StateContext<S> {
    state: S,
    entered_at: Instant,
    computed: bool,
    scroll: ScrollState,
    animator: GlyphAnimator<S>,
    config: EngineConfig,
}

impl<S: ProgramState> StateContext<S> {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            state: S::INITIAL,
            entered_at: Instant::from_ticks(0),
            computed: false,
            scroll: ScrollState::new(Instant::from_ticks(0)),
            animator: GlyphAnimator::new(config.animation_interval),
            config,
        }
    }

    /// Move to `next`, resetting everything tied to the previous screen.
    pub fn enter<D: CharDisplay + ?Sized>(
        &mut self,
        next: S,
        now: Instant,
        display: &mut D,
        slider: &mut Slider,
    ) {
        #[cfg(feature = "defmt")]
        defmt::debug!("{} -> {}", defmt::Debug2Format(&self.state), defmt::Debug2Format(&next));
        self.state = next;
        self.entered_at = now;
        self.computed = false;
        self.scroll.reset(now);
        self.animator.release();
        slider.clear_moved();
        display.set_backlight(self.config.palette.color(next.backlight()));
        display.clear();
    }

    #[must_use]
    pub const fn state(&self) -> S {
        self.state
    }

    #[must_use]
    pub const fn entered_at(&self) -> Instant {
        self.entered_at
    }

    /// At least `dwell` has passed since the current state was entered.
    #[must_use]
    pub fn dwell_elapsed(&self, now: Instant, dwell: Duration) -> bool {
        now.saturating_duration_since(self.entered_at) >= dwell
    }

    /// The current state's one-shot work already ran.
    #[must_use]
    pub const fn computed(&self) -> bool {
        self.computed
    }

    pub fn mark_computed(&mut self) {
        self.computed = true;
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Draw `text` on `row`, padded to the display width.
    pub fn render_line<D: CharDisplay + ?Sized>(&self, display: &mut D, row: usize, text: &str) {
        write_line(display, row, text, self.config.width);
    }

    /// Draw `text` on `row`, scrolling it if it is wider than the display.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatError`] if the visible window does not fit in a line.
    pub fn render_scrolling<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        row: usize,
        text: &str,
        mode: ScrollMode,
        now: Instant,
    ) -> Result<()> {
        let width = self.config.width;
        let offset = self.scroll.tick(
            now,
            &self.config.scroll,
            self.entered_at,
            text.chars().count(),
            width,
            mode,
        );
        let visible = window(text, offset, width, mode)?;
        write_line(display, row, &visible, width);
        Ok(())
    }

    /// Draw `text` on `row` with the animated "done" glyph right after it.
    ///
    /// Only the cells after the glyph are padded, so the glyph cell is never blanked
    /// between frames. Text too long for the row gives up its last column to the glyph.
    #[expect(clippy::cast_possible_truncation, reason = "rows and columns fit a u8")]
    pub fn render_with_glyph<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        row: usize,
        text: &str,
        now: Instant,
    ) {
        let width = self.config.width;
        let col = write_clipped(display, row, text, width.saturating_sub(1));
        self.animator
            .draw(display, self.state, col as u8, row as u8, now);
        pad(display, col.saturating_add(1), width);
    }
}

/// A selection that is written once and then read back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Locked<T>(Option<T>);

impl<T: Copy> Locked<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(None)
    }

    /// Store `value` unless something is already locked in.
    pub fn lock(&mut self, value: T) {
        if self.0.is_none() {
            self.0 = Some(value);
        }
    }

    /// The locked value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelectionNotLocked`] if nothing was locked in yet.
    pub fn require(&self, name: &'static str) -> Result<T> {
        self.0.ok_or(Error::SelectionNotLocked { name })
    }
}

/// Outcome of one program tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Running,
    /// The program finished and gives control back to the shell.
    HandBack,
}

/// Everything a program touches while it runs, lent by the shell for one tick.
pub struct Devices<'a, D: ?Sized, T: ?Sized> {
    pub display: &'a mut D,
    pub slider: &'a mut Slider,
    pub timebase: &'a T,
}

/// One demo program.
pub trait Program {
    type State: ProgramState;

    fn state(&self) -> Self::State;

    /// Drop any previous run and show the title screen.
    fn start<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    );

    /// Redraw the current screen and take at most one transition.
    ///
    /// # Errors
    ///
    /// Returns an error if a screen line cannot be formatted.
    fn tick<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) -> Result<Step>;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::{ANIMATION_SLOT, CELEBRATION_FRAMES, VirtualLcd};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Screen {
        Title,
        Done,
    }

    impl ProgramState for Screen {
        const INITIAL: Self = Self::Title;

        fn backlight(self) -> Backlight {
            match self {
                Self::Title => Backlight::Idle,
                Self::Done => Backlight::Busy,
            }
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn enter_resets_everything_tied_to_the_old_screen() {
        let mut lcd = VirtualLcd::<16, 2>::new();
        let mut slider = Slider::new();
        let mut context = StateContext::<Screen>::new(EngineConfig::default());
        slider.record(0, at(0));
        slider.record(9, at(10));
        context.mark_computed();
        context
            .render_scrolling(&mut lcd, 0, "The 100000th prime", ScrollMode::default(), at(5000))
            .unwrap();
        assert_ne!(context.scroll_offset(), 0);

        context.enter(Screen::Done, at(6000), &mut lcd, &mut slider);

        assert_eq!(context.state(), Screen::Done);
        assert_eq!(context.entered_at(), at(6000));
        assert!(!context.computed());
        assert_eq!(context.scroll_offset(), 0);
        assert!(!slider.moved());
        assert_eq!(lcd.backlight(), COLOR_BUSY);
        assert_eq!(lcd.clear_count(), 1);
    }

    /// Logs every byte written with the cell it landed in.
    #[derive(Default)]
    struct WriteLog {
        cursor: (u8, u8),
        writes: Vec<((u8, u8), u8)>,
    }

    impl CharDisplay for WriteLog {
        fn set_cursor(&mut self, col: u8, row: u8) {
            self.cursor = (col, row);
        }

        fn write_str(&mut self, text: &str) {
            for byte in text.bytes() {
                self.write_byte(byte);
            }
        }

        fn write_byte(&mut self, byte: u8) {
            self.writes.push((self.cursor, byte));
            self.cursor.0 = self.cursor.0.wrapping_add(1);
        }

        fn create_glyph(&mut self, _slot: u8, _glyph: &crate::Glyph) {}

        fn set_backlight(&mut self, _color: RGB8) {}

        fn clear(&mut self) {}
    }

    #[test]
    fn glyph_cell_is_never_blanked() {
        let mut log = WriteLog::default();
        let mut slider = Slider::new();
        let mut context = StateContext::<Screen>::new(EngineConfig::default());
        context.enter(Screen::Done, at(0), &mut log, &mut slider);
        for ms in (0..1000).step_by(10) {
            context.render_with_glyph(&mut log, 1, "2.00 ", at(ms));
        }
        assert!(log.writes.iter().all(|&(cell, byte)| cell != (5, 1) || byte == ANIMATION_SLOT));
        assert!(log.writes.contains(&((15, 1), b' ')));
    }

    #[test]
    fn overlong_text_leaves_the_last_column_to_the_glyph() {
        let mut lcd = VirtualLcd::<16, 2>::new();
        let mut slider = Slider::new();
        let mut context = StateContext::<Screen>::new(EngineConfig::default());
        context.enter(Screen::Done, at(0), &mut lcd, &mut slider);
        context.render_with_glyph(&mut lcd, 1, "1234567890123... ", at(0));
        assert_eq!(lcd.cell(15, 1), Some(ANIMATION_SLOT));
        assert_eq!(lcd.cell(14, 1), Some(b'.'));
    }

    #[test]
    fn reentering_a_state_restarts_its_animation() {
        let mut lcd = VirtualLcd::<16, 2>::new();
        let mut slider = Slider::new();
        let mut context = StateContext::<Screen>::new(EngineConfig::default());
        context.enter(Screen::Done, at(0), &mut lcd, &mut slider);
        context.render_with_glyph(&mut lcd, 1, "done ", at(0));
        context.render_with_glyph(&mut lcd, 1, "done ", at(450));
        assert_ne!(lcd.glyph(ANIMATION_SLOT), Some(&CELEBRATION_FRAMES[0]));

        context.enter(Screen::Title, at(500), &mut lcd, &mut slider);
        context.enter(Screen::Done, at(10_000), &mut lcd, &mut slider);
        context.render_with_glyph(&mut lcd, 1, "done ", at(10_000));
        assert_eq!(lcd.glyph(ANIMATION_SLOT), Some(&CELEBRATION_FRAMES[0]));
    }

    #[test]
    fn dwell_counts_from_entry() {
        let mut lcd = VirtualLcd::<16, 2>::new();
        let mut slider = Slider::new();
        let mut context = StateContext::<Screen>::new(EngineConfig::default());
        context.enter(Screen::Title, at(100), &mut lcd, &mut slider);
        let dwell = Duration::from_millis(1000);
        assert!(!context.dwell_elapsed(at(1099), dwell));
        assert!(context.dwell_elapsed(at(1100), dwell));
    }

    #[test]
    fn locked_keeps_the_first_value() {
        let mut operand = Locked::new();
        assert!(matches!(
            operand.require("A"),
            Err(Error::SelectionNotLocked { name: "A" })
        ));
        operand.lock(7u32);
        operand.lock(9);
        assert_eq!(operand.require("A").unwrap(), 7);
    }
}
