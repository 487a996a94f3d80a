//! Classroom kiosk firmware for a Raspberry Pi Pico (RP2040).
//!
//! Wiring:
//! - Grove RGB LCD on I2C0: SDA = GP4, SCL = GP5
//! - Slide potentiometer wiper on GP26 (ADC0)
//!
//! Run with: cargo run --example kiosk --features pico1,arm --target thumbv6m-none-eabi

#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use classroom_kit::{Config, Result, RgbLcd, Shell, Timebase};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Instant, Timer};
use panic_probe as _;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

/// How often the shell is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The embassy time driver as the shell's clock.
struct EmbassyClock;

impl Timebase for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

type KioskShell = Shell<RgbLcd<I2c<'static, I2C0, Blocking>, Delay>, EmbassyClock, RoscRng>;

static SHELL: StaticCell<KioskShell> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let lcd = RgbLcd::new(bus, Delay)?;

    let mut adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let mut wiper = Channel::new_pin(p.PIN_26, Pull::None);
    let mut last_reading = 0u16;
    // 12-bit converter, 10-bit slider scale. A failed conversion repeats the last reading.
    let mut slider = move || {
        if let Ok(raw) = adc.blocking_read(&mut wiper) {
            last_reading = raw >> 2;
        }
        last_reading
    };

    let config = Config::from_build_env()?;
    info!("Winner policy: {}", config.sort.winner_policy);
    let shell = SHELL.init(Shell::new(config, lcd, EmbassyClock, RoscRng)?);
    shell.boot(Instant::now());

    loop {
        shell.poll(&mut slider, Instant::now())?;
        Timer::after(POLL_INTERVAL).await;
    }
}
