//! The single analog slider, with movement tracking used to decide when a choice has settled.

use embassy_time::{Duration, Instant};

/// A source of raw `0..=ANALOG_MAX` readings.
pub trait AnalogChannel {
    fn read(&mut self) -> u16;
}

impl<F: FnMut() -> u16> AnalogChannel for F {
    fn read(&mut self) -> u16 {
        self()
    }
}

/// Debounced view of the slider.
///
/// There is no hysteresis: any change in the raw reading counts as movement. That is
/// why selections wait for a quiet period after the *last* movement.
#[derive(Clone, Copy, Debug)]
pub struct Slider {
    raw: Option<u16>,
    moved: bool,
    last_moved_at: Instant,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Slider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: None,
            moved: false,
            last_moved_at: Instant::from_ticks(0),
        }
    }

    /// Read the channel once and record any change.
    pub fn sample<C: AnalogChannel + ?Sized>(&mut self, channel: &mut C, now: Instant) {
        let raw = channel.read();
        self.record(raw, now);
    }

    /// Record a raw reading taken at `now`.
    ///
    /// The first reading after power-up only sets the baseline.
    pub fn record(&mut self, raw: u16, now: Instant) {
        if self.raw.is_some_and(|previous| previous != raw) {
            self.moved = true;
            self.last_moved_at = now;
        }
        self.raw = Some(raw);
    }

    /// Latest raw reading, or 0 before the first sample.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.raw.unwrap_or(0)
    }

    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    #[must_use]
    pub const fn last_moved_at(&self) -> Instant {
        self.last_moved_at
    }

    pub fn clear_moved(&mut self) {
        self.moved = false;
    }

    /// The operator moved the slider and then left it alone for at least `quiet`.
    #[must_use]
    pub fn settled(&self, now: Instant, quiet: Duration) -> bool {
        self.moved && now.saturating_duration_since(self.last_moved_at) >= quiet
    }
}
