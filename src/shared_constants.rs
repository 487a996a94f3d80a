use embassy_time::Duration;
use smart_leds::RGB8;

/// A 5x8 custom character bitmap, one byte per pixel row (low five bits used).
pub type Glyph = [u8; 8];

/// Number of character columns on the display.
pub const DISPLAY_COLS: usize = 16;

/// Number of character rows on the display.
pub const DISPLAY_ROWS: usize = 2;

/// Largest reading the analog slider produces (10-bit converter).
pub const ANALOG_MAX: u16 = 1023;

/// Capacity of every formatted screen line.
///
/// Lines are at most one display row wide, but formatting happens before
/// truncation, so leave room for long numbers.
pub const LINE_CAPACITY: usize = 32;

/// How many characters of a numeric result fit before it is cut and marked with "...".
pub const RESULT_WIDTH: usize = 13;

/// Time between frames of the "done" animation.
pub const ANIMATION_FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// How long long text stays still before it starts to scroll.
pub const SCROLL_START_DELAY: Duration = Duration::from_millis(1000);

/// Time between one-character scroll steps.
pub const SCROLL_STEP_INTERVAL: Duration = Duration::from_millis(350);

/// Blank columns between the end of looping text and its restart.
pub const SCROLL_WRAP_GAP: usize = 4;

/// Backlight color for screens that wait on the operator.
pub const COLOR_IDLE: RGB8 = RGB8::new(255, 105, 180);

/// Backlight color for screens that compute or celebrate a result.
pub const COLOR_BUSY: RGB8 = RGB8::new(0, 255, 64);

/// Programmable character slot used by the animation.
pub const ANIMATION_SLOT: u8 = 0;

/// Programmable character slot holding the micro sign.
pub const MICRO_SLOT: u8 = 1;

/// The micro sign, uploaded once at boot.
pub const MICRO_GLYPH: Glyph = [
    0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b11101, 0b10000, 0b10000,
];

/// A pulsing diamond: small, medium, large.
pub const CELEBRATION_FRAMES: [Glyph; 3] = [
    [
        0b00000, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000,
    ],
    [
        0b00000, 0b00000, 0b00100, 0b01010, 0b00100, 0b00000, 0b00000, 0b00000,
    ],
    [
        0b00000, 0b00100, 0b01010, 0b10001, 0b01010, 0b00100, 0b00000, 0b00000,
    ],
];

/// Working and temporary buffer capacity for the sort race.
pub const SORT_CAPACITY: usize = 500;

/// Sort inputs are drawn from `0..SORT_VALUE_LIMIT`.
pub const SORT_VALUE_LIMIT: u16 = 10_000;
