//! Driver for Grove-style RGB backlit 16x2 LCD modules.
//!
//! The module carries two I2C devices: an HD44780-compatible text controller and a
//! PCA9633 LED driver for the backlight. Works with any blocking
//! [`embedded_hal::i2c::I2c`] bus.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use smart_leds::RGB8;

use crate::{CharDisplay, Error, Glyph, Result};

/// Default address of the text controller.
pub const LCD_ADDRESS: u8 = 0x3E;
/// Default address of the backlight driver (0x30 on v5 boards).
pub const RGB_ADDRESS: u8 = 0x62;

// Control bytes: next byte is a command / next bytes are data
const CONTROL_COMMAND: u8 = 0x80;
const CONTROL_DATA: u8 = 0x40;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_LEFT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_SET_2LINE: u8 = 0x28;
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;
const ROW1_OFFSET: u8 = 0x40;

// PCA9633 registers
const REG_MODE1: u8 = 0x00;
const REG_MODE2: u8 = 0x01;
const REG_BLUE: u8 = 0x02;
const REG_GREEN: u8 = 0x03;
const REG_RED: u8 = 0x04;
const REG_OUTPUT: u8 = 0x08;

/// An RGB-backlit character LCD on an I2C bus.
pub struct RgbLcd<I2C, D> {
    i2c: I2C,
    delay: D,
    lcd_address: u8,
    rgb_address: u8,
}

impl<I2C: I2c, D: DelayNs> RgbLcd<I2C, D> {
    /// Create and initialize an LCD at the default addresses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisplayBus`] if the controller does not acknowledge initialization.
    pub fn new(i2c: I2C, delay: D) -> Result<Self> {
        Self::new_with_addresses(i2c, delay, LCD_ADDRESS, RGB_ADDRESS)
    }

    /// Create and initialize an LCD at custom addresses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisplayBus`] if the controller does not acknowledge initialization.
    pub fn new_with_addresses(
        i2c: I2C,
        delay: D,
        lcd_address: u8,
        rgb_address: u8,
    ) -> Result<Self> {
        let mut lcd = Self {
            i2c,
            delay,
            lcd_address,
            rgb_address,
        };
        lcd.init()?;
        Ok(lcd)
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn init(&mut self) -> Result<()> {
        self.delay.delay_ms(50);

        // The controller needs the function set repeated while it wakes up.
        self.try_command(CMD_FUNCTION_SET_2LINE)?;
        self.delay.delay_us(4500);
        self.try_command(CMD_FUNCTION_SET_2LINE)?;
        self.delay.delay_us(150);
        self.try_command(CMD_FUNCTION_SET_2LINE)?;
        self.try_command(CMD_FUNCTION_SET_2LINE)?;

        self.try_command(CMD_DISPLAY_ON)?;
        self.try_command(CMD_CLEAR)?;
        self.delay.delay_us(2000);
        self.try_command(CMD_ENTRY_MODE_LEFT)?;

        // Backlight: normal mode, all LEDs under PWM control, blink group off
        self.try_register(REG_MODE1, 0x00)?;
        self.try_register(REG_OUTPUT, 0xFF)?;
        self.try_register(REG_MODE2, 0x20)?;
        Ok(())
    }

    fn try_command(&mut self, command: u8) -> Result<()> {
        self.i2c
            .write(self.lcd_address, &[CONTROL_COMMAND, command])
            .map_err(|err| Error::DisplayBus { kind: err.kind() })
    }

    fn try_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.rgb_address, &[register, value])
            .map_err(|err| Error::DisplayBus { kind: err.kind() })
    }

    fn command(&mut self, command: u8) {
        if let Err(_err) = self.try_command(command) {
            #[cfg(feature = "defmt")]
            defmt::warn!("LCD command {:#x} dropped: {}", command, defmt::Debug2Format(&_err));
        }
    }

    fn register(&mut self, register: u8, value: u8) {
        if let Err(_err) = self.try_register(register, value) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Backlight register {:#x} write dropped: {}", register, defmt::Debug2Format(&_err));
        }
    }

    fn data(&mut self, bytes: &[u8]) {
        // One control byte, then up to a glyph's worth of data per transfer
        let mut buf = [0u8; 9];
        for chunk in bytes.chunks(8) {
            let Some((control, payload)) = buf.split_first_mut() else {
                return;
            };
            *control = CONTROL_DATA;
            let Some(payload) = payload.get_mut(..chunk.len()) else {
                return;
            };
            payload.copy_from_slice(chunk);
            let Some(frame) = buf.get(..=chunk.len()) else {
                return;
            };
            if self.i2c.write(self.lcd_address, frame).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("LCD data write dropped");
            }
        }
    }
}

impl<I2C: I2c, D: DelayNs> CharDisplay for RgbLcd<I2C, D> {
    #[expect(clippy::arithmetic_side_effects, reason = "Row/col values are small")]
    fn set_cursor(&mut self, col: u8, row: u8) {
        let address = if row == 0 { col } else { ROW1_OFFSET + col };
        self.command(CMD_SET_DDRAM | address);
    }

    fn write_str(&mut self, text: &str) {
        self.data(text.as_bytes());
    }

    fn write_byte(&mut self, byte: u8) {
        self.data(&[byte]);
    }

    fn create_glyph(&mut self, slot: u8, glyph: &Glyph) {
        self.command(CMD_SET_CGRAM | ((slot & 0x07) << 3));
        self.data(glyph);
    }

    fn set_backlight(&mut self, color: RGB8) {
        self.register(REG_RED, color.r);
        self.register(REG_GREEN, color.g);
        self.register(REG_BLUE, color.b);
    }

    fn clear(&mut self) {
        self.command(CMD_CLEAR);
        self.delay.delay_us(2000);
    }
}
