#![no_std]
#![no_main]
#![allow(clippy::type_complexity)]

mod logger;

use bme280_forced::{Error, IdentifyPolicy, Reading, Sensor, Settings, SpiTransport};
use core::fmt::Write;
use core::sync::atomic::{compiler_fence, Ordering::SeqCst};
use embedded_hal::digital::v2::OutputPin;
use heapless::String;
use log::LevelFilter;
use logger::{Logger, Usart1};
use stm32f0xx_hal::{
    gpio::{
        gpioa::{PA4, PA5, PA6, PA7},
        gpiob::PB1,
        Alternate, Output, PushPull, AF0,
    },
    pac::SPI1,
    prelude::*,
    serial::Serial,
    spi::{self, Spi},
};
use systick_monotonic::{ExtU64, Systick};

const SENSOR_SETTINGS: Settings =
    Settings::TEMPERATURE_HUMIDITY_PRESSURE.set_identify(IdentifyPolicy::Fatal);

/// `WouldBlock` polls per SPI byte before giving up, ~10 ms at 8 MHz.
const POLL_LIMIT: Option<u32> = Some(10_000);

const SAMPLE_PERIOD_SECS: u64 = 1;

static LOGGER: Logger = Logger::new(LevelFilter::Info);

type SensorSpi = Spi<
    SPI1,
    PA5<Alternate<AF0>>,
    PA6<Alternate<AF0>>,
    PA7<Alternate<AF0>>,
    spi::EightBit,
>;
type SensorCs = PA4<Output<PushPull>>;
type Bme280 = Sensor<SpiTransport<SensorSpi, SensorCs>>;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    cortex_m::interrupt::disable();

    loop {
        writeln!(&mut Usart1, "{}", info).ok();
        compiler_fence(SeqCst);
    }
}

#[cortex_m_rt::exception]
#[allow(non_snake_case)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    cortex_m::interrupt::disable();

    loop {
        writeln!(&mut Usart1, "HARD FAULT {:#?}", ef).ok();
        compiler_fence(SeqCst);
    }
}

/// Park the CPU with the error LED lit.
fn trap<P: OutputPin>(led: &mut P) -> ! {
    led.set_high().ok();
    loop {
        compiler_fence(SeqCst);
    }
}

/// Write one report line to the serial port.
fn report(reading: &Reading) {
    let mut line: String<80> = String::new();
    if writeln!(&mut line, "{}", reading).is_err() {
        log::warn!("[REPORT] line truncated");
    }
    Usart1.write_str(&line).ok();
}

#[rtic::app(device = stm32f0xx_hal::pac, dispatchers = [USART2])]
mod app {
    use super::*;

    // RTIC manual says not to use this in production.
    #[monotonic(binds = SysTick, default = true)]
    type MyMono = Systick<1>; // 1 Hz / 1 s granularity

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        sensor: Bme280,
        busy_led: PB1<Output<PushPull>>,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut dp = cx.device;
        let mut rcc = dp.RCC.configure().sysclk(8.mhz()).freeze(&mut dp.FLASH);
        let gpioa = dp.GPIOA.split(&mut rcc);
        let gpiob = dp.GPIOB.split(&mut rcc);

        let mono = Systick::new(cx.core.SYST, 8_000_000);

        // hardware declaration
        let ((mut cs, mut busy_led, mut fault_led), spi1_pins, uart_pins) =
            cortex_m::interrupt::free(move |cs| {
                (
                    (
                        gpioa.pa4.into_push_pull_output(cs), // BME280 CSB
                        gpiob.pb1.into_push_pull_output(cs), // green LED
                        gpiob.pb2.into_push_pull_output(cs), // red LED
                    ),
                    (
                        gpioa.pa5.into_alternate_af0(cs), // BME280 SCK
                        gpioa.pa6.into_alternate_af0(cs), // BME280 SDO
                        gpioa.pa7.into_alternate_af0(cs), // BME280 SDI
                    ),
                    (
                        gpioa.pa9.into_alternate_af1(cs),  // UART TX
                        gpioa.pa10.into_alternate_af1(cs), // UART RX
                    ),
                )
            });
        cs.set_high().ok();
        busy_led.set_low().ok();
        fault_led.set_low().ok();

        let spi1 = Spi::spi1(dp.SPI1, spi1_pins, embedded_hal::spi::MODE_0, 1.mhz(), &mut rcc);
        let mut serial = Serial::usart1(dp.USART1, uart_pins, 115_200.bps(), &mut rcc);
        writeln!(&mut serial, "Hello world!").ok();
        LOGGER.install();

        let transport = SpiTransport::new(spi1, cs).with_poll_limit(POLL_LIMIT);
        let mut sensor: Bme280 = Sensor::new(transport, SENSOR_SETTINGS);
        match sensor.start() {
            Ok(()) => log::info!("[INIT] BME280 ready {:?}", SENSOR_SETTINGS.variant),
            Err(Error::DeviceAbsent(id)) => {
                log::error!("[INIT] no BME280, chip ID 0x{:02X}", id);
                trap(&mut fault_led)
            }
            Err(e) => panic!("BME280 start failed: {:?}", e),
        }

        sample::spawn().unwrap();

        (
            Shared {},
            Local { sensor, busy_led },
            init::Monotonics(mono),
        )
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        log::trace!("[TASK] idle");
        loop {
            compiler_fence(SeqCst);
        }
    }

    /// Poll the sensor once and print the result.
    #[task(local = [sensor, busy_led])]
    fn sample(cx: sample::Context) {
        log::trace!("[TASK] sample");
        let sensor: &mut Bme280 = cx.local.sensor;
        cx.local.busy_led.set_high().ok();

        // transient bus errors skip this cycle
        if let Err(e) = sensor.measure() {
            log::warn!("[TASK] measurement failed {:?}", e);
        }
        if let Some(reading) = sensor.take_reading() {
            report(&reading);
        }

        cx.local.busy_led.set_low().ok();
        sample::spawn_after(SAMPLE_PERIOD_SECS.secs()).unwrap();
    }
}
