//! Shared rig for driving a [`Shell`] on the host with a fake clock and a fake slider.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use core::cell::Cell;

use classroom_kit::program_select::ProgramKind;
use classroom_kit::{Active, Config, Shell, Timebase, VirtualLcd};
use embassy_time::Instant;
use rand::SeedableRng as _;
use rand::rngs::SmallRng;

pub type Lcd = VirtualLcd<16, 2>;
pub type TestShell<'a> = Shell<Lcd, &'a FakeClock, SmallRng>;

/// Time between polls, as in the firmware loop.
pub const POLL_MS: u64 = 10;

/// A clock the test moves by hand.
#[derive(Default)]
pub struct FakeClock {
    micros: Cell<u64>,
}

impl FakeClock {
    pub fn advance_ms(&self, ms: u64) {
        self.micros.set(self.micros.get() + ms * 1000);
    }

    pub fn ms(&self) -> u64 {
        self.micros.get() / 1000
    }
}

impl Timebase for FakeClock {
    // Each read ticks one microsecond, so timed work never measures zero.
    fn now(&self) -> Instant {
        let micros = self.micros.get();
        self.micros.set(micros + 1);
        Instant::from_micros(micros)
    }
}

/// A fake clock plus a knob standing in for the slider.
#[derive(Default)]
pub struct Rig {
    pub clock: FakeClock,
    knob: Cell<u16>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A booted shell on a fresh virtual LCD.
    pub fn shell(&self, config: Config) -> TestShell<'_> {
        let rng = SmallRng::seed_from_u64(0x5EED);
        let mut shell = Shell::new(config, Lcd::new(), &self.clock, rng).unwrap();
        shell.boot(self.clock.now());
        shell
    }

    pub fn knob(&self) -> u16 {
        self.knob.get()
    }

    pub fn set_knob(&self, raw: u16) {
        self.knob.set(raw);
    }

    pub fn poll(&self, shell: &mut TestShell<'_>) {
        self.clock.advance_ms(POLL_MS);
        let mut channel = || self.knob.get();
        shell.poll(&mut channel, self.clock.now()).unwrap();
    }

    pub fn run(&self, shell: &mut TestShell<'_>, ms: u64) {
        for _ in 0..ms / POLL_MS {
            self.poll(shell);
        }
    }

    /// Poll until `done` holds and return how long that took in milliseconds.
    pub fn run_until(
        &self,
        shell: &mut TestShell<'_>,
        mut done: impl FnMut(&TestShell<'_>) -> bool,
        limit_ms: u64,
    ) -> u64 {
        let start = self.clock.ms();
        while !done(shell) {
            let elapsed = self.clock.ms() - start;
            assert!(elapsed <= limit_ms, "condition not reached within {limit_ms} ms");
            self.poll(shell);
        }
        self.clock.ms() - start
    }

    /// Wait for the menu's choice screen, pick `kind` and wait for it to start.
    pub fn launch(&self, shell: &mut TestShell<'_>, kind: ProgramKind) {
        self.run_until(shell, |shell| shell.active() == Active::Menu, 10_000);
        self.run_until(
            shell,
            |shell| shell.menu().state() == classroom_kit::program_select::MenuState::Choose,
            5_000,
        );
        let raw = match kind {
            ProgramKind::Calculator => 100,
            ProgramKind::Primes => 500,
            ProgramKind::SortRace => 900,
        };
        let raw = if self.knob() == raw { raw + 1 } else { raw };
        self.set_knob(raw);
        self.run_until(shell, |shell| shell.active() == Active::Program(kind), 5_000);
    }
}

/// Visible text of `row` with trailing padding removed.
pub fn row(shell: &TestShell<'_>, row: usize) -> String {
    shell.display().row_text(row).trim_end().to_owned()
}
