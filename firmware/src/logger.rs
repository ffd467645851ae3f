use core::fmt::Write;
use log::{LevelFilter, Metadata, Record};
use stm32f0xx_hal::pac::Peripherals;

/// Blocking byte write to USART1.
///
/// Steals the peripheral, usable from any context including the panic
/// handler.
pub fn write_byte(byte: u8) {
    let dp: Peripherals = unsafe { Peripherals::steal() };
    while dp.USART1.isr.read().txe().bit_is_clear() {}
    dp.USART1.tdr.write(|w| w.tdr().bits(byte as u16));
}

/// `core::fmt::Write` sink on USART1, `\n` is sent as `\r\n`.
pub struct Usart1;

impl Write for Usart1 {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        s.as_bytes().iter().for_each(|&x| {
            if x == b'\n' {
                write_byte(b'\r');
            }
            write_byte(x)
        });
        Ok(())
    }
}

/// `log` backend printing `[LEVEL] message` lines on USART1.
pub struct Logger {
    level_filter: LevelFilter,
}

impl Logger {
    pub const fn new(level_filter: LevelFilter) -> Self {
        Self { level_filter }
    }

    /// Install the logger.
    ///
    /// thumbv6m has no atomic compare and swap, this must run before
    /// interrupts that log are enabled.
    pub fn install(&'static self) {
        unsafe { log::set_logger_racy(self) }.ok();
        log::set_max_level(self.level_filter);
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.level_filter.ge(&metadata.level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            writeln!(&mut Usart1, "[{}] {}", record.level(), record.args()).ok();
        }
    }

    fn flush(&self) {}
}
