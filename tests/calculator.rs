//! End-to-end calculator runs on a virtual LCD.

mod common;

use classroom_kit::calculator::CalculatorState;
use classroom_kit::program_select::{MenuState, ProgramKind};
use classroom_kit::mapping::RangeMap;
use classroom_kit::{
    ANIMATION_SLOT, Active, CELEBRATION_FRAMES, COLOR_BUSY, COLOR_IDLE, Config, GLYPH_PLACEHOLDER,
};
use common::{Rig, TestShell, row};

fn wait_for(rig: &Rig, shell: &mut TestShell<'_>, state: CalculatorState) -> u64 {
    rig.run_until(shell, |shell| shell.calculator().context().state() == state, 10_000)
}

/// Dial in both operands and the operator; stop on the result screen.
fn calculate(rig: &Rig, shell: &mut TestShell<'_>, first: u16, second: u16, operator: u16) {
    rig.launch(shell, ProgramKind::Calculator);
    wait_for(rig, shell, CalculatorState::SelectFirst);
    rig.set_knob(first);
    wait_for(rig, shell, CalculatorState::SecondPrompt);
    wait_for(rig, shell, CalculatorState::SelectSecond);
    rig.set_knob(second);
    wait_for(rig, shell, CalculatorState::OperatorPrompt);
    wait_for(rig, shell, CalculatorState::SelectOperator);
    rig.set_knob(operator);
    wait_for(rig, shell, CalculatorState::Result);
    rig.poll(shell);
}

#[test]
fn one_plus_one_then_back_to_menu() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    calculate(&rig, &mut shell, 0, 1, 0);

    assert_eq!(row(&shell, 0), "1 + 1 =");
    assert_eq!(row(&shell, 1), "2.00 *");
    assert_eq!(shell.display().backlight(), COLOR_BUSY);

    let waited = rig.run_until(&mut shell, |shell| shell.active() == Active::Menu, 6_000);
    assert!((4_900..=5_050).contains(&waited), "handed back after {waited} ms");
    assert_eq!(shell.menu().state(), MenuState::Choose);
    assert_eq!(shell.display().backlight(), COLOR_IDLE);
}

#[test]
fn seven_times_three() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    calculate(&rig, &mut shell, 7, 3, 600);
    assert_eq!(row(&shell, 0), "7 * 3 =");
    assert_eq!(row(&shell, 1), "21.00 *");
}

#[test]
fn seven_divided_by_three() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    calculate(&rig, &mut shell, 7, 3, 1000);
    assert_eq!(row(&shell, 0), "7 / 3 =");
    assert_eq!(row(&shell, 1), "2.33 *");
}

#[test]
fn selection_waits_for_the_slider_to_rest() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    rig.launch(&mut shell, ProgramKind::Calculator);
    wait_for(&rig, &mut shell, CalculatorState::SelectFirst);

    // Without movement nothing is ever locked in.
    rig.run(&mut shell, 3_000);
    assert_eq!(shell.calculator().context().state(), CalculatorState::SelectFirst);

    // Keep wiggling: each move restarts the quiet period.
    for raw in [200, 300, 400, 500] {
        rig.set_knob(raw);
        rig.run(&mut shell, 1_000);
        assert_eq!(shell.calculator().context().state(), CalculatorState::SelectFirst);
    }
    assert_eq!(row(&shell, 0), "A = 489");
    let waited = wait_for(&rig, &mut shell, CalculatorState::SecondPrompt);
    assert!(waited <= 400, "locked in {waited} ms after the last check");
}

#[test]
fn operator_symbol_sits_in_column_seven() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    rig.launch(&mut shell, ProgramKind::Calculator);
    wait_for(&rig, &mut shell, CalculatorState::SelectFirst);
    rig.set_knob(5);
    wait_for(&rig, &mut shell, CalculatorState::SelectSecond);
    rig.set_knob(9);
    wait_for(&rig, &mut shell, CalculatorState::SelectOperator);
    rig.set_knob(300);
    rig.poll(&mut shell);
    assert_eq!(shell.display().cell(7, 0), Some(b'-'));
    assert_eq!(row(&shell, 0), "       -");
}

#[test]
fn second_run_starts_the_glyph_on_frame_zero() {
    let rig = Rig::new();
    let mut shell = rig.shell(Config::default());
    calculate(&rig, &mut shell, 0, 1, 0);
    assert_eq!(shell.display().glyph(ANIMATION_SLOT), Some(&CELEBRATION_FRAMES[0]));
    // Let the animation cycle off frame 0 before handing back.
    rig.run(&mut shell, 250);
    assert_ne!(shell.display().glyph(ANIMATION_SLOT), Some(&CELEBRATION_FRAMES[0]));

    calculate(&rig, &mut shell, 0, 1, 0);
    assert_eq!(row(&shell, 1), "2.00 *");
    assert_eq!(shell.display().glyph(ANIMATION_SLOT), Some(&CELEBRATION_FRAMES[0]));
}

#[test]
fn overlong_result_keeps_the_glyph_on_screen() {
    let rig = Rig::new();
    let mut config = Config::default();
    config.calculator.operand = RangeMap::new(1, 4_000_000);
    let mut shell = rig.shell(config);
    calculate(&rig, &mut shell, 1023, 1022, 600);

    assert!(row(&shell, 0).starts_with("4000000 * 399"));
    let shown = row(&shell, 1);
    assert_eq!(shown.chars().count(), 16);
    assert!(shown.ends_with(&format!("..{GLYPH_PLACEHOLDER}")), "{shown}");
    assert_eq!(shell.display().cell(15, 1), Some(ANIMATION_SLOT));
}
