//! Find the N-th prime by trial division.

use embassy_time::{Duration, Instant};

use crate::config::PrimesConfig;
use crate::display::line;
use crate::scroll::ScrollMode;
use crate::state_machine::{
    Backlight, Devices, EngineConfig, Locked, Program, ProgramState, StateContext, Step,
};
use crate::{CharDisplay, Error, Result, Timebase};

/// Primes screens, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrimesState {
    Title,
    Intro,
    Prompt,
    ShowCount,
    Calculating,
    Result,
}

impl ProgramState for PrimesState {
    const INITIAL: Self = Self::Title;

    fn backlight(self) -> Backlight {
        match self {
            Self::Calculating | Self::Result => Backlight::Busy,
            _ => Backlight::Idle,
        }
    }
}

/// Trial division by odd numbers up to the square root.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "divisor * divisor is checked before it can overflow"
)]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3u32;
    while divisor.checked_mul(divisor).is_some_and(|square| square <= n) {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// The `n`-th prime, counting 2 as the first. `n == 0` is treated as 1.
#[must_use]
pub fn nth_prime(n: u32) -> u32 {
    if n <= 1 {
        return 2;
    }
    let mut count = 1u32;
    let mut candidate = 1u32;
    while count < n {
        let Some(next) = candidate.checked_add(2) else {
            break;
        };
        candidate = next;
        if is_prime(candidate) {
            count = count.saturating_add(1);
        }
    }
    candidate
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, ...
#[must_use]
#[expect(clippy::integer_division_remainder_used, reason = "digit extraction")]
pub const fn ordinal_suffix(n: u32) -> &'static str {
    if matches!(n % 100, 11..=13) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

pub struct Primes {
    context: StateContext<PrimesState>,
    config: PrimesConfig,
    count: Locked<u32>,
    prime: Option<u32>,
}

impl Primes {
    #[must_use]
    pub const fn new(config: PrimesConfig, engine: EngineConfig) -> Self {
        Self {
            context: StateContext::new(engine),
            config,
            count: Locked::new(),
            prime: None,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &StateContext<PrimesState> {
        &self.context
    }

    /// The prime found by the last run.
    #[must_use]
    pub const fn prime(&self) -> Option<u32> {
        self.prime
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
        next: PrimesState,
    ) {
        if self.context.dwell_elapsed(now, dwell) {
            self.context.enter(next, now, devices.display, devices.slider);
        }
    }
}

impl Program for Primes {
    type State = PrimesState;

    fn state(&self) -> PrimesState {
        self.context.state()
    }

    fn start<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) {
        self.count = Locked::new();
        self.prime = None;
        self.context
            .enter(PrimesState::INITIAL, now, devices.display, devices.slider);
    }

    fn tick<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) -> Result<Step> {
        let config = self.config;
        match self.context.state() {
            PrimesState::Title => {
                self.show(devices.display, "Calculate Primes", "");
                self.advance_after(now, devices, config.title, PrimesState::Intro);
            }
            PrimesState::Intro => {
                self.show(devices.display, "Choose the # of", "primes calc'd");
                self.advance_after(now, devices, config.intro, PrimesState::Prompt);
            }
            PrimesState::Prompt => {
                self.show(devices.display, "Move slider to", "specify the #");
                self.advance_after(now, devices, config.prompt, PrimesState::ShowCount);
            }
            PrimesState::ShowCount => {
                let count = config.count.map(devices.slider.value());
                self.context
                    .render_line(devices.display, 0, &line(format_args!("N = {count}"))?);
                if devices.slider.settled(now, config.settle) {
                    self.count.lock(count);
                    self.context
                        .enter(PrimesState::Calculating, now, devices.display, devices.slider);
                }
            }
            PrimesState::Calculating => {
                let count = self.count.require("prime count")?;
                self.show(
                    devices.display,
                    "Calc'ing the 1st",
                    &line(format_args!("{count} primes"))?,
                );
                let prime = nth_prime(count);
                #[cfg(feature = "defmt")]
                defmt::info!("Prime #{} is {}", count, prime);
                self.prime = Some(prime);
                let finished = devices.timebase.now();
                self.context
                    .enter(PrimesState::Result, finished, devices.display, devices.slider);
            }
            PrimesState::Result => {
                let count = self.count.require("prime count")?;
                let prime = self.prime.ok_or(Error::SelectionNotLocked { name: "prime" })?;
                let top = line(format_args!("The {count}{} prime", ordinal_suffix(count)))?;
                self.context.render_scrolling(
                    devices.display,
                    0,
                    &top,
                    ScrollMode::default(),
                    now,
                )?;
                let bottom = line(format_args!("is {prime} "))?;
                self.context
                    .render_with_glyph(devices.display, 1, &bottom, now);
                if self.context.dwell_elapsed(now, config.result) {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Primes done");
                    return Ok(Step::HandBack);
                }
            }
        }
        Ok(Step::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Slider, VirtualLcd};

    struct StoppedClock;

    impl Timebase for StoppedClock {
        fn now(&self) -> Instant {
            Instant::from_millis(0)
        }
    }

    #[test]
    fn small_primes() {
        let primes: heapless::Vec<u32, 16> = (0..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes.as_slice(), &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn nth_prime_counts_two_as_first() {
        assert_eq!(nth_prime(1), 2);
        assert_eq!(nth_prime(2), 3);
        assert_eq!(nth_prime(10), 29);
        assert_eq!(nth_prime(10_000), 104_729);
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(30_002), "nd");
        assert_eq!(ordinal_suffix(100_011), "th");
    }

    #[test]
    fn result_without_a_search_is_an_error() {
        let mut lcd = VirtualLcd::<16, 2>::new();
        let mut slider = Slider::new();
        let mut devices = Devices {
            display: &mut lcd,
            slider: &mut slider,
            timebase: &StoppedClock,
        };
        let mut primes = Primes::new(PrimesConfig::default(), EngineConfig::default());
        let now = Instant::from_millis(0);
        primes.start(now, &mut devices);
        primes.count.lock(10);
        primes
            .context
            .enter(PrimesState::Result, now, devices.display, devices.slider);
        assert!(matches!(
            primes.tick(now, &mut devices),
            Err(Error::SelectionNotLocked { name: "prime" })
        ));
        assert_eq!(primes.prime(), None);
    }
}
