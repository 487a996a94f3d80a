//! A two-operand calculator driven entirely by the slider.

use embassy_time::{Duration, Instant};

use crate::config::CalculatorConfig;
use crate::display::{Line, line, truncate_with_ellipsis};
use crate::mapping::quantize;
use crate::state_machine::{
    Backlight, Devices, EngineConfig, Locked, Program, ProgramState, StateContext, Step,
};
use crate::{CharDisplay, RESULT_WIDTH, Result, Timebase};

/// Calculator screens, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalculatorState {
    Title,
    Intro,
    FirstPrompt,
    SelectFirst,
    SecondPrompt,
    SelectSecond,
    OperatorPrompt,
    SelectOperator,
    Result,
}

impl ProgramState for CalculatorState {
    const INITIAL: Self = Self::Title;

    fn backlight(self) -> Backlight {
        match self {
            Self::Result => Backlight::Busy,
            _ => Backlight::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The slider's four quarters select `+`, `-`, `*`, `/` from left to right.
    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        match quantize(raw, 4) {
            0 => Self::Add,
            1 => Self::Subtract,
            2 => Self::Multiply,
            _ => Self::Divide,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Evaluate `a op b` in single precision.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "operands are at most a few thousand")]
    pub fn apply(self, a: u32, b: u32) -> f32 {
        let (a, b) = (a as f32, b as f32);
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
        }
    }
}

/// Format a result with two decimals, cutting anything past [`RESULT_WIDTH`] characters.
///
/// # Errors
///
/// Returns [`crate::Error::FormatError`] if the value cannot be formatted.
pub fn format_result(value: f32) -> Result<Line> {
    use core::fmt::Write as _;

    // Wide enough for f32::MAX with two decimals.
    let mut full = heapless::String::<64>::new();
    write!(full, "{value:.2}")?;
    truncate_with_ellipsis(&full, RESULT_WIDTH)
}

/// Column of the centred operator symbol.
const OPERATOR_COLUMN: usize = 7;

pub struct Calculator {
    context: StateContext<CalculatorState>,
    config: CalculatorConfig,
    first: Locked<u32>,
    second: Locked<u32>,
    operator: Locked<Operator>,
    result: Option<f32>,
}

impl Calculator {
    #[must_use]
    pub const fn new(config: CalculatorConfig, engine: EngineConfig) -> Self {
        Self {
            context: StateContext::new(engine),
            config,
            first: Locked::new(),
            second: Locked::new(),
            operator: Locked::new(),
            result: None,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &StateContext<CalculatorState> {
        &self.context
    }

    /// The last computed result, if this run got that far.
    #[must_use]
    pub const fn result(&self) -> Option<f32> {
        self.result
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
        next: CalculatorState,
    ) {
        if self.context.dwell_elapsed(now, dwell) {
            self.context.enter(next, now, devices.display, devices.slider);
        }
    }

    fn compute(&mut self) -> Result<f32> {
        if let (true, Some(result)) = (self.context.computed(), self.result) {
            return Ok(result);
        }
        let a = self.first.require("first operand")?;
        let b = self.second.require("second operand")?;
        let operator = self.operator.require("operator")?;
        let result = operator.apply(a, b);
        self.result = Some(result);
        self.context.mark_computed();
        #[cfg(feature = "defmt")]
        defmt::info!("{} {} {} = {}", a, operator.symbol(), b, result);
        Ok(result)
    }
}

impl Program for Calculator {
    type State = CalculatorState;

    fn state(&self) -> CalculatorState {
        self.context.state()
    }

    fn start<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) {
        self.first = Locked::new();
        self.second = Locked::new();
        self.operator = Locked::new();
        self.result = None;
        self.context
            .enter(CalculatorState::INITIAL, now, devices.display, devices.slider);
    }

    fn tick<D: CharDisplay + ?Sized, T: Timebase + ?Sized>(
        &mut self,
        now: Instant,
        devices: &mut Devices<'_, D, T>,
    ) -> Result<Step> {
        let config = self.config;
        match self.context.state() {
            CalculatorState::Title => {
                self.show(devices.display, "Calculator", "Program");
                self.advance_after(now, devices, config.title, CalculatorState::Intro);
            }
            CalculatorState::Intro => {
                self.show(devices.display, "Select two #s to", "+, -, *, or /");
                self.advance_after(now, devices, config.intro, CalculatorState::FirstPrompt);
            }
            CalculatorState::FirstPrompt => {
                self.show(devices.display, "Move slider to", "select 1st #");
                self.advance_after(now, devices, config.prompt, CalculatorState::SelectFirst);
            }
            CalculatorState::SelectFirst => {
                let value = config.operand.map(devices.slider.value());
                self.context
                    .render_line(devices.display, 0, &line(format_args!("A = {value}"))?);
                if devices.slider.settled(now, config.settle) {
                    self.first.lock(value);
                    self.context.enter(
                        CalculatorState::SecondPrompt,
                        now,
                        devices.display,
                        devices.slider,
                    );
                }
            }
            CalculatorState::SecondPrompt => {
                self.show(devices.display, "Move slider to", "select 2nd #");
                self.advance_after(now, devices, config.prompt, CalculatorState::SelectSecond);
            }
            CalculatorState::SelectSecond => {
                let value = config.operand.map(devices.slider.value());
                self.context
                    .render_line(devices.display, 0, &line(format_args!("B = {value}"))?);
                if devices.slider.settled(now, config.settle) {
                    self.second.lock(value);
                    self.context.enter(
                        CalculatorState::OperatorPrompt,
                        now,
                        devices.display,
                        devices.slider,
                    );
                }
            }
            CalculatorState::OperatorPrompt => {
                self.show(devices.display, "Move slider to", "select operation");
                self.advance_after(now, devices, config.prompt, CalculatorState::SelectOperator);
            }
            CalculatorState::SelectOperator => {
                let operator = Operator::from_raw(devices.slider.value());
                let text = line(format_args!(
                    "{:>width$}",
                    operator.symbol(),
                    width = OPERATOR_COLUMN + 1
                ))?;
                self.context.render_line(devices.display, 0, &text);
                if devices.slider.settled(now, config.settle) {
                    self.operator.lock(operator);
                    self.context
                        .enter(CalculatorState::Result, now, devices.display, devices.slider);
                }
            }
            CalculatorState::Result => {
                let result = self.compute()?;
                let a = self.first.require("first operand")?;
                let b = self.second.require("second operand")?;
                let symbol = self.operator.require("operator")?.symbol();
                self.context
                    .render_line(devices.display, 0, &line(format_args!("{a} {symbol} {b} ="))?);
                let value = format_result(result)?;
                self.context.render_with_glyph(
                    devices.display,
                    1,
                    &line(format_args!("{value} "))?,
                    now,
                );
                if self.context.dwell_elapsed(now, config.result) {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Calculator done");
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

    #[test]
    fn quartiles_pick_operators() {
        assert_eq!(Operator::from_raw(0), Operator::Add);
        assert_eq!(Operator::from_raw(255), Operator::Add);
        assert_eq!(Operator::from_raw(256), Operator::Subtract);
        assert_eq!(Operator::from_raw(511), Operator::Subtract);
        assert_eq!(Operator::from_raw(512), Operator::Multiply);
        assert_eq!(Operator::from_raw(767), Operator::Multiply);
        assert_eq!(Operator::from_raw(768), Operator::Divide);
        assert_eq!(Operator::from_raw(1023), Operator::Divide);
    }

    #[test]
    fn results_have_two_decimals() {
        assert_eq!(format_result(Operator::Multiply.apply(7, 3)).unwrap().as_str(), "21.00");
        assert_eq!(format_result(Operator::Divide.apply(7, 3)).unwrap().as_str(), "2.33");
        assert_eq!(format_result(Operator::Subtract.apply(1, 1000)).unwrap().as_str(), "-999.00");
    }

    #[test]
    fn long_results_are_cut() {
        let text = format_result(123_456_789_012_345.0).unwrap();
        assert_eq!(text.len(), RESULT_WIDTH + 3);
        assert!(text.ends_with("..."));
    }
}
