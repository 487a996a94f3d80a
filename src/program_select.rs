//! The menu the shell shows between programs.

use embassy_time::Instant;

use crate::config::MenuConfig;
use crate::display::line;
use crate::mapping::quantize;
use crate::state_machine::{Backlight, Devices, EngineConfig, ProgramState, StateContext};
use crate::{CharDisplay, Result, Timebase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    /// Shown once after power-up.
    Welcome,
    Choose,
}

impl ProgramState for MenuState {
    const INITIAL: Self = Self::Welcome;

    fn backlight(self) -> Backlight {
        Backlight::Idle
    }
}

/// The programs the menu can launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramKind {
    Calculator,
    Primes,
    SortRace,
}

impl ProgramKind {
    /// The slider's thirds pick, left to right, calculator, primes and the sort race.
    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        match quantize(raw, 3) {
            0 => Self::Calculator,
            1 => Self::Primes,
            _ => Self::SortRace,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::Primes => "Primes",
            Self::SortRace => "Sort Test",
        }
    }
}

pub struct ProgramSelect {
    context: StateContext<MenuState>,
    config: MenuConfig,
}

impl ProgramSelect {
    #[must_use]
    pub const fn new(config: MenuConfig, engine: EngineConfig) -> Self {
        Self {
            context: StateContext::new(engine),
            config,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.context.state()
    }

    /// Show the welcome screen.
    pub fn start<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) {
        self.context
            .enter(MenuState::Welcome, now, devices.display, devices.slider);
    }

    /// Go straight to the choice screen, as after a program hands back.
    pub fn choose<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) {
        self.context
            .enter(MenuState::Choose, now, devices.display, devices.slider);
    }

    /// Redraw the menu. Returns the program to launch once a choice has settled.
    ///
    /// # Errors
    ///
    /// Returns an error if a screen line cannot be formatted.
    pub fn tick<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) -> Result<Option<ProgramKind>> {
        match self.context.state() {
            MenuState::Welcome => {
                self.context.render_line(devices.display, 0, "Classroom");
                self.context.render_line(devices.display, 1, "Computer");
                if self.context.dwell_elapsed(now, self.config.welcome) {
                    self.choose(now, devices);
                }
                Ok(None)
            }
            MenuState::Choose => {
                let kind = ProgramKind::from_raw(devices.slider.value());
                self.context.render_line(devices.display, 0, "Pick a program:");
                self.context
                    .render_line(devices.display, 1, &line(format_args!("> {}", kind.name()))?);
                if devices.slider.settled(now, self.config.settle) {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Launching {}", kind);
                    return Ok(Some(kind));
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirds_pick_programs() {
        assert_eq!(ProgramKind::from_raw(0), ProgramKind::Calculator);
        assert_eq!(ProgramKind::from_raw(341), ProgramKind::Calculator);
        assert_eq!(ProgramKind::from_raw(342), ProgramKind::Primes);
        assert_eq!(ProgramKind::from_raw(682), ProgramKind::Primes);
        assert_eq!(ProgramKind::from_raw(683), ProgramKind::SortRace);
        assert_eq!(ProgramKind::from_raw(1023), ProgramKind::SortRace);
    }
}
