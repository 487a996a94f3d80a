//! Bubble sort against merge sort on the same problem size, timed in microseconds.

use embassy_time::{Duration, Instant};
use rand::{Rng as _, RngCore};

use crate::config::{SortConfig, WinnerPolicy};
use crate::display::line;
use crate::state_machine::{
    Backlight, Devices, EngineConfig, Locked, Program, ProgramState, StateContext, Step,
};
use crate::{CharDisplay, MICRO_SLOT, Result, SORT_CAPACITY, SORT_VALUE_LIMIT, Timebase};

/// Sort race screens, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SortRaceState {
    Title,
    Question,
    SelectSize,
    ShowSize,
    Confirm,
    Running,
    Results,
    Winner,
}

impl ProgramState for SortRaceState {
    const INITIAL: Self = Self::Title;

    fn backlight(self) -> Backlight {
        match self {
            Self::Running => Backlight::Busy,
            _ => Backlight::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Algorithm {
    Bubble,
    Merge,
}

impl Algorithm {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble",
            Self::Merge => "Merge",
        }
    }
}

/// How long each algorithm took on its own freshly shuffled input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortTimings {
    pub bubble: Duration,
    pub merge: Duration,
}

impl SortTimings {
    /// The faster algorithm; a tie goes to merge sort.
    #[must_use]
    pub fn faster(&self) -> Algorithm {
        if self.bubble < self.merge {
            Algorithm::Bubble
        } else {
            Algorithm::Merge
        }
    }
}

impl WinnerPolicy {
    /// The algorithm to announce for `timings`.
    #[must_use]
    pub fn pick(self, timings: &SortTimings) -> Algorithm {
        match self {
            Self::Fixed(algorithm) => algorithm,
            Self::Measured => timings.faster(),
        }
    }
}

/// Classic in-place bubble sort.
#[expect(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "j + 1 <= end < len by the loop bounds"
)]
pub fn bubble_sort(values: &mut [u16]) {
    for end in (1..values.len()).rev() {
        for j in 0..end {
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
            }
        }
    }
}

/// Top-down merge sort using `scratch` as the merge buffer.
///
/// `scratch` must be at least as long as `values`; a shorter buffer leaves `values`
/// only partly sorted.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "halving a slice length"
)]
pub fn merge_sort(values: &mut [u16], scratch: &mut [u16]) {
    let len = values.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    let (left, right) = values.split_at_mut(mid);
    merge_sort(left, scratch);
    merge_sort(right, scratch);

    let Some(merged) = scratch.get_mut(..len) else {
        return;
    };
    let (left, right) = values.split_at(mid);
    let mut left = left.iter().copied().peekable();
    let mut right = right.iter().copied().peekable();
    for slot in merged.iter_mut() {
        let next = match (left.peek(), right.peek()) {
            (Some(&l), Some(&r)) if l <= r => left.next(),
            (Some(_), Some(_)) | (None, Some(_)) => right.next(),
            (Some(_), None) => left.next(),
            (None, None) => None,
        };
        if let Some(value) = next {
            *slot = value;
        }
    }
    values.copy_from_slice(merged);
}

pub struct SortRace<R> {
    context: StateContext<SortRaceState>,
    config: SortConfig,
    size: Locked<u32>,
    timings: Option<SortTimings>,
    work: [u16; SORT_CAPACITY],
    scratch: [u16; SORT_CAPACITY],
    rng: R,
}

impl<R: RngCore> SortRace<R> {
    #[must_use]
    pub const fn new(config: SortConfig, engine: EngineConfig, rng: R) -> Self {
        Self {
            context: StateContext::new(engine),
            config,
            size: Locked::new(),
            timings: None,
            work: [0; SORT_CAPACITY],
            scratch: [0; SORT_CAPACITY],
            rng,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &StateContext<SortRaceState> {
        &self.context
    }

    /// Measurements from the last completed race.
    #[must_use]
    pub const fn timings(&self) -> Option<SortTimings> {
        self.timings
    }

    /// The algorithm this run announces, once the race has been run.
    #[must_use]
    pub fn winner(&self) -> Option<Algorithm> {
        self.timings
            .map(|timings| self.config.winner_policy.pick(&timings))
    }

    fn refill(&mut self, len: usize) {
        for value in self.work.iter_mut().take(len) {
            *value = self.rng.gen_range(0..SORT_VALUE_LIMIT);
        }
    }

    /// Time both sorts on `len` fresh random values each.
    fn race<T: Timebase + ?Sized>(&mut self, len: usize, timebase: &T) -> SortTimings {
        let len = len.min(SORT_CAPACITY);

        self.refill(len);
        let started = timebase.now();
        bubble_sort(self.work.get_mut(..len).unwrap_or_default());
        let bubble = timebase.now().saturating_duration_since(started);

        self.refill(len);
        let started = timebase.now();
        merge_sort(
            self.work.get_mut(..len).unwrap_or_default(),
            &mut self.scratch,
        );
        let merge = timebase.now().saturating_duration_since(started);

        SortTimings { bubble, merge }
    }

    fn show<D: CharDisplay + ?Sized>(&self, display: &mut D, top: &str, bottom: &str) {
        self.context.render_line(display, 0, top);
        self.context.render_line(display, 1, bottom);
    }

    fn advance_after<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
        dwell: Duration,
        next: SortRaceState,
    ) {
        if self.context.dwell_elapsed(now, dwell) {
            self.context.enter(next, now, devices.display, devices.slider);
        }
    }
}

const MICRO: char = MICRO_SLOT as char;

impl<R: RngCore> Program for SortRace<R> {
    type State = SortRaceState;

    fn state(&self) -> SortRaceState {
        self.context.state()
    }

    fn start<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) {
        self.size = Locked::new();
        self.timings = None;
        self.context
            .enter(SortRaceState::INITIAL, now, devices.display, devices.slider);
    }

    fn tick<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) -> Result<Step> {
        let config = self.config;
        match self.context.state() {
            SortRaceState::Title => {
                self.show(devices.display, "Sort Test", "");
                self.advance_after(now, devices, config.title, SortRaceState::Question);
            }
            SortRaceState::Question => {
                self.show(devices.display, "Bubble or merge:", "which is faster?");
                self.advance_after(now, devices, config.intro, SortRaceState::SelectSize);
            }
            SortRaceState::SelectSize => {
                self.show(devices.display, "Move slider to", "select prob size");
                if devices.slider.moved() {
                    self.context
                        .enter(SortRaceState::ShowSize, now, devices.display, devices.slider);
                }
            }
            SortRaceState::ShowSize => {
                let size = config.size.map(devices.slider.value());
                self.context
                    .render_line(devices.display, 0, &line(format_args!("N = {size}"))?);
                if devices.slider.settled(now, config.settle) {
                    self.size.lock(size);
                    self.context
                        .enter(SortRaceState::Confirm, now, devices.display, devices.slider);
                }
            }
            SortRaceState::Confirm => {
                let size = self.size.require("sort size")?;
                self.show(
                    devices.display,
                    "Starting sort",
                    &line(format_args!("for N = {size}"))?,
                );
                self.advance_after(now, devices, config.confirm, SortRaceState::Running);
            }
            SortRaceState::Running => {
                self.show(
                    devices.display,
                    &line(format_args!("Bubble = X {MICRO}s..."))?,
                    &line(format_args!("Merge = Y {MICRO}s..."))?,
                );
                let size = self.size.require("sort size")?;
                let len = usize::try_from(size).unwrap_or(SORT_CAPACITY);
                let timings = self.race(len, devices.timebase);
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "N = {}: bubble {} us, merge {} us",
                    size,
                    timings.bubble.as_micros(),
                    timings.merge.as_micros()
                );
                self.timings = Some(timings);
                // Results dwell starts once the work is done.
                let finished = devices.timebase.now();
                self.context
                    .enter(SortRaceState::Results, finished, devices.display, devices.slider);
            }
            SortRaceState::Results => {
                let timings = self.timings.unwrap_or(SortTimings {
                    bubble: Duration::from_ticks(0),
                    merge: Duration::from_ticks(0),
                });
                self.show(
                    devices.display,
                    &line(format_args!("Bubble = {} {MICRO}s", timings.bubble.as_micros()))?,
                    &line(format_args!("Merge  = {} {MICRO}s", timings.merge.as_micros()))?,
                );
                self.advance_after(now, devices, config.results, SortRaceState::Winner);
            }
            SortRaceState::Winner => {
                let winner = self.winner().unwrap_or(Algorithm::Merge);
                self.context.render_line(
                    devices.display,
                    0,
                    &line(format_args!("{} sort is", winner.name()))?,
                );
                self.context
                    .render_with_glyph(devices.display, 1, "the winner! ", now);
                if self.context.dwell_elapsed(now, config.winner) {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Sort race done, {} announced", winner);
                    return Ok(Step::HandBack);
                }
            }
        }
        Ok(Step::Running)
    }
}
