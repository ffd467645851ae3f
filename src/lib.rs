//! Bosch BME280 driver for forced mode polling over SPI.
//!
//! "Humidity sensor measuring relative humidity, barometric pressure, and
//! ambient temperature."
//!
//! This is built for one usecase: wake the sensor once per poll, read the
//! raw counts, and compensate them with the datasheet's fixed-point
//! formulas.  No floating point, no normal mode, no interrupts.
//!
//! # Example
//!
//! ```
//! # use embedded_hal_mock as hal;
//! # let spi = hal::spi::Mock::new(&[
//! #   hal::spi::Transaction::send(0xD0),
//! #   hal::spi::Transaction::read(0xFF),
//! #   hal::spi::Transaction::send(0xAA),
//! #   hal::spi::Transaction::read(0x60),
//! # ]);
//! # let pin = hal::pin::Mock::new(&[
//! #   hal::pin::Transaction::set(hal::pin::State::Low),
//! #   hal::pin::Transaction::set(hal::pin::State::High),
//! # ]);
//! use bme280_forced::{Sensor, Settings, SpiTransport};
//!
//! const SETTINGS: Settings = Settings::TEMPERATURE_HUMIDITY_PRESSURE;
//!
//! let transport = SpiTransport::new(spi, pin).with_poll_limit(Some(1000));
//! let mut sensor = Sensor::new(transport, SETTINGS);
//! sensor.identify()?;
//! assert!(sensor.state().is_identity_confirmed());
//! # let (mut spi, mut pin) = sensor.free().free();
//! # spi.done();
//! # pin.done();
//! # Ok::<(), bme280_forced::Error<bme280_forced::SpiError<hal::MockError, hal::MockError>>>(())
//! ```
#![no_std]

pub mod calibration;
pub mod compensation;
pub mod measurement;
pub mod protocol;
pub mod reg;
pub mod sensor;
pub mod settings;
pub mod transport;

pub use calibration::{
    Calibration, HumidityCalibration, PressureCalibration, TemperatureCalibration,
};
pub use compensation::{
    compensate, compensate_humidity, compensate_humidity_q10, compensate_pressure,
    compensate_temperature, Reading, TFine, PRESSURE_INVALID,
};
pub use measurement::RawMeasurement;
pub use protocol::Protocol;
pub use sensor::{Phase, Sensor, SessionState};
pub use settings::{CtrlMeas, IdentifyPolicy, Mode, Oversampling, Settings, Variant};
pub use transport::{SpiError, SpiTransport, Transport};

/// BME280 chip ID.
pub const CHIP_ID: u8 = 0x60;

/// Sensor session error type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error<E> {
    /// Bus transport error wrapper.
    Transport(E),
    /// The chip ID register did not read [`CHIP_ID`].
    ///
    /// Fatal for the session.
    DeviceAbsent(u8),
    /// The operation requires a confirmed chip ID.
    NotIdentified,
    /// The operation requires loaded calibration coefficients.
    NotCalibrated,
    /// The session faulted earlier and refuses further bus traffic.
    Faulted,
}
