//! Owns the devices and every program, and switches between the menu and the
//! running program.

use embassy_time::Instant;
use rand::RngCore;

use crate::calculator::Calculator;
use crate::config::Config;
use crate::primes::Primes;
use crate::program_select::{ProgramKind, ProgramSelect};
use crate::slider::AnalogChannel;
use crate::sort_race::SortRace;
use crate::state_machine::{Devices, Program, Step};
use crate::{CharDisplay, MICRO_GLYPH, MICRO_SLOT, Result, Slider, Timebase};

/// What currently owns the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Active {
    Menu,
    Program(ProgramKind),
}

/// The kiosk: one display, one slider, a menu and three programs.
///
/// Call [`Shell::boot`] once, then [`Shell::poll`] in a loop.
pub struct Shell<D, T, R> {
    display: D,
    timebase: T,
    slider: Slider,
    menu: ProgramSelect,
    calculator: Calculator,
    primes: Primes,
    sort_race: SortRace<R>,
    active: Active,
}

impl<D: CharDisplay, T: Timebase, R: RngCore> Shell<D, T, R> {
    /// # Errors
    ///
    /// Returns the first problem [`Config::validate`] finds.
    pub fn new(config: Config, display: D, timebase: T, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            display,
            timebase,
            slider: Slider::new(),
            menu: ProgramSelect::new(config.menu, config.engine),
            calculator: Calculator::new(config.calculator, config.engine),
            primes: Primes::new(config.primes, config.engine),
            sort_race: SortRace::new(config.sort, config.engine, rng),
            active: Active::Menu,
        })
    }

    /// Upload the static glyphs and show the welcome screen.
    pub fn boot(&mut self, now: Instant) {
        self.display.create_glyph(MICRO_SLOT, &MICRO_GLYPH);
        let mut devices = Devices {
            display: &mut self.display,
            slider: &mut self.slider,
            timebase: &self.timebase,
        };
        self.menu.start(now, &mut devices);
        self.active = Active::Menu;
        #[cfg(feature = "defmt")]
        defmt::info!("Shell booted");
    }

    /// Sample the slider once and tick whatever owns the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the active screen cannot be formatted.
    pub fn poll<C: AnalogChannel + ?Sized>(&mut self, channel: &mut C, now: Instant) -> Result<()> {
        self.slider.sample(channel, now);
        let mut devices = Devices {
            display: &mut self.display,
            slider: &mut self.slider,
            timebase: &self.timebase,
        };
        let step = match self.active {
            Active::Menu => {
                if let Some(kind) = self.menu.tick(now, &mut devices)? {
                    match kind {
                        ProgramKind::Calculator => self.calculator.start(now, &mut devices),
                        ProgramKind::Primes => self.primes.start(now, &mut devices),
                        ProgramKind::SortRace => self.sort_race.start(now, &mut devices),
                    }
                    self.active = Active::Program(kind);
                }
                return Ok(());
            }
            Active::Program(ProgramKind::Calculator) => self.calculator.tick(now, &mut devices)?,
            Active::Program(ProgramKind::Primes) => self.primes.tick(now, &mut devices)?,
            Active::Program(ProgramKind::SortRace) => self.sort_race.tick(now, &mut devices)?,
        };
        if step == Step::HandBack {
            self.menu.choose(now, &mut devices);
            self.active = Active::Menu;
        }
        Ok(())
    }

    #[must_use]
    pub const fn active(&self) -> Active {
        self.active
    }

    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    #[must_use]
    pub const fn slider(&self) -> &Slider {
        &self.slider
    }

    #[must_use]
    pub const fn menu(&self) -> &ProgramSelect {
        &self.menu
    }

    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    #[must_use]
    pub const fn primes(&self) -> &Primes {
        &self.primes
    }

    #[must_use]
    pub const fn sort_race(&self) -> &SortRace<R> {
        &self.sort_race
    }
}
