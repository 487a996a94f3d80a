//! Runtime settings for the engine and each program.
//!
//! `Config::default()` reproduces the classroom timings. The one build-time knob,
//! the sort race's winner policy, comes from `CLASSROOM_WINNER` (see `build.rs`).

use embassy_time::Duration;

use crate::mapping::RangeMap;
use crate::sort_race::Algorithm;
use crate::state_machine::EngineConfig;
use crate::{Error, Result, SORT_CAPACITY};

/// How the sort race announces its winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WinnerPolicy {
    /// Always name the same algorithm, whatever was measured.
    Fixed(Algorithm),
    /// Name whichever finished faster; ties go to merge sort.
    Measured,
}

impl Default for WinnerPolicy {
    fn default() -> Self {
        Self::Fixed(Algorithm::Merge)
    }
}

impl WinnerPolicy {
    /// Parse `merge`, `bubble` or `measured` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownWinnerPolicy`] for anything else.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("merge") {
            Ok(Self::Fixed(Algorithm::Merge))
        } else if text.eq_ignore_ascii_case("bubble") {
            Ok(Self::Fixed(Algorithm::Bubble))
        } else if text.eq_ignore_ascii_case("measured") {
            Ok(Self::Measured)
        } else {
            Err(Error::UnknownWinnerPolicy)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub title: Duration,
    pub intro: Duration,
    /// Each "Move slider to ..." prompt.
    pub prompt: Duration,
    /// Quiet time that locks in an operand or the operator.
    pub settle: Duration,
    pub result: Duration,
    pub operand: RangeMap,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            title: Duration::from_millis(1000),
            intro: Duration::from_millis(2000),
            prompt: Duration::from_millis(1200),
            settle: Duration::from_millis(1300),
            result: Duration::from_millis(5000),
            operand: RangeMap::OPERAND,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimesConfig {
    pub title: Duration,
    pub intro: Duration,
    pub prompt: Duration,
    pub settle: Duration,
    pub result: Duration,
    pub count: RangeMap,
}

impl Default for PrimesConfig {
    fn default() -> Self {
        Self {
            title: Duration::from_millis(1000),
            intro: Duration::from_millis(1500),
            prompt: Duration::from_millis(1500),
            settle: Duration::from_millis(1500),
            result: Duration::from_millis(4500),
            count: RangeMap::PRIME_COUNT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub title: Duration,
    pub intro: Duration,
    pub settle: Duration,
    pub confirm: Duration,
    pub results: Duration,
    pub winner: Duration,
    pub size: RangeMap,
    pub winner_policy: WinnerPolicy,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            title: Duration::from_millis(1750),
            intro: Duration::from_millis(2000),
            settle: Duration::from_millis(1300),
            confirm: Duration::from_millis(1300),
            results: Duration::from_millis(3500),
            winner: Duration::from_millis(3600),
            size: RangeMap::SORT_SIZE,
            winner_policy: WinnerPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuConfig {
    pub welcome: Duration,
    pub settle: Duration,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            welcome: Duration::from_millis(1500),
            settle: Duration::from_millis(1500),
        }
    }
}

/// All settings, one section per program plus the shared engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub engine: EngineConfig,
    pub calculator: CalculatorConfig,
    pub primes: PrimesConfig,
    pub sort: SortConfig,
    pub menu: MenuConfig,
}

impl Config {
    /// Defaults, with the winner policy taken from `CLASSROOM_WINNER` at build time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownWinnerPolicy`] if the build-time value is not recognized.
    pub fn from_build_env() -> Result<Self> {
        let mut config = Self::default();
        config.sort.winner_policy = WinnerPolicy::parse(env!("CLASSROOM_WINNER"))?;
        Ok(config)
    }

    /// Check every range and duration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an empty range, a zero duration, or a sort
    /// size the buffers cannot hold.
    pub fn validate(&self) -> Result<()> {
        non_zero("animation interval", self.engine.animation_interval)?;
        non_zero("scroll step", self.engine.scroll.step)?;
        if self.engine.width == 0 {
            return Err(Error::EmptyRange {
                name: "display width",
            });
        }

        let calculator = &self.calculator;
        non_zero("calculator title", calculator.title)?;
        non_zero("calculator intro", calculator.intro)?;
        non_zero("calculator prompt", calculator.prompt)?;
        non_zero("calculator settle", calculator.settle)?;
        non_zero("calculator result", calculator.result)?;
        calculator.operand.validate("operand")?;
        // Division needs a non-zero divisor.
        if calculator.operand.low() == 0 {
            return Err(Error::EmptyRange { name: "operand" });
        }

        let primes = &self.primes;
        non_zero("primes title", primes.title)?;
        non_zero("primes intro", primes.intro)?;
        non_zero("primes prompt", primes.prompt)?;
        non_zero("primes settle", primes.settle)?;
        non_zero("primes result", primes.result)?;
        primes.count.validate("prime count")?;
        if primes.count.low() == 0 {
            return Err(Error::EmptyRange {
                name: "prime count",
            });
        }

        let sort = &self.sort;
        non_zero("sort title", sort.title)?;
        non_zero("sort intro", sort.intro)?;
        non_zero("sort settle", sort.settle)?;
        non_zero("sort confirm", sort.confirm)?;
        non_zero("sort results", sort.results)?;
        non_zero("sort winner", sort.winner)?;
        sort.size.validate("sort size")?;
        if sort.size.low() == 0 {
            return Err(Error::EmptyRange { name: "sort size" });
        }
        let fits = usize::try_from(sort.size.high()).is_ok_and(|max| max <= SORT_CAPACITY);
        if !fits {
            return Err(Error::SortSizeExceedsCapacity {
                max: sort.size.high(),
                capacity: SORT_CAPACITY,
            });
        }

        non_zero("menu welcome", self.menu.welcome)?;
        non_zero("menu settle", self.menu.settle)?;
        Ok(())
    }
}

fn non_zero(name: &'static str, duration: Duration) -> Result<()> {
    if duration.as_ticks() == 0 {
        Err(Error::ZeroDuration { name })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
        assert_eq!(
            Config::default().sort.winner_policy,
            WinnerPolicy::Fixed(Algorithm::Merge)
        );
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(
            WinnerPolicy::parse("Bubble").unwrap(),
            WinnerPolicy::Fixed(Algorithm::Bubble)
        );
        assert_eq!(WinnerPolicy::parse(" measured ").unwrap(), WinnerPolicy::Measured);
        assert!(matches!(
            WinnerPolicy::parse("quick"),
            Err(Error::UnknownWinnerPolicy)
        ));
    }

    #[test]
    fn oversized_sort_is_rejected() {
        let mut config = Config::default();
        config.sort.size = RangeMap::new(10, 501);
        assert!(matches!(
            config.validate(),
            Err(Error::SortSizeExceedsCapacity {
                max: 501,
                capacity: 500
            })
        ));
    }

    #[test]
    fn zero_dwell_and_empty_range_are_rejected() {
        let mut config = Config::default();
        config.primes.result = Duration::from_ticks(0);
        assert!(matches!(
            config.validate(),
            Err(Error::ZeroDuration {
                name: "primes result"
            })
        ));

        let mut config = Config::default();
        config.calculator.operand = RangeMap::new(5, 5);
        assert!(matches!(
            config.validate(),
            Err(Error::EmptyRange { name: "operand" })
        ));
    }

    #[test]
    fn zero_operand_is_rejected() {
        let mut config = Config::default();
        config.calculator.operand = RangeMap::new(0, 1000);
        assert!(matches!(
            config.validate(),
            Err(Error::EmptyRange { name: "operand" })
        ));
    }
}
