//! Fixed-point compensation.
//!
//! These are the 32 bit integer formulas from the datasheet, reproduced
//! bit-for-bit.  The reference is C on a two's complement machine, every
//! intermediate wraps instead of panicking so arbitrary (including
//! garbage) inputs are safe with overflow checks enabled.
//!
//! The magical math and magical numbers come from the datasheet.
//! I am not to blame for this.

use core::fmt;

use crate::calibration::{
    Calibration, HumidityCalibration, PressureCalibration, TemperatureCalibration,
};
use crate::measurement::RawMeasurement;

/// Upper clamp of the humidity accumulator, 100 %RH in Q22.10 before `>> 12`.
const HUMIDITY_MAX: i32 = 419_430_400;

/// Pressure returned when the compensation would divide by zero.
pub const PRESSURE_INVALID: u32 = 0;

/// Fine resolution temperature, `t_fine` in the datasheet.
///
/// Only [`compensate_temperature`] creates one; humidity and pressure
/// compensation take it by value, so temperature has to be compensated
/// first in every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TFine(i32);

impl TFine {
    /// Raw `t_fine` value.
    pub const fn value(&self) -> i32 {
        self.0
    }
}

/// Compensate a raw temperature count.
///
/// Returns the temperature in hundredths of a degree Celsius and the
/// `t_fine` value for the humidity and pressure compensation of the same
/// cycle.
///
/// # Example
///
/// Worked example from the datasheet:
///
/// ```
/// use bme280_forced::{compensate_temperature, TemperatureCalibration};
///
/// let cal = TemperatureCalibration {
///     t1: 27504,
///     t2: 26435,
///     t3: -1000,
/// };
/// let (centi_celsius, t_fine) = compensate_temperature(519888, &cal);
/// assert_eq!(centi_celsius, 2508);
/// assert_eq!(t_fine.value(), 128422);
/// ```
pub fn compensate_temperature(raw: u32, cal: &TemperatureCalibration) -> (i32, TFine) {
    let adc: i32 = raw as i32;
    let t1: i32 = i32::from(cal.t1);
    let t2: i32 = i32::from(cal.t2);
    let t3: i32 = i32::from(cal.t3);

    let var1: i32 = ((adc >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
    let var2: i32 = (adc >> 4).wrapping_sub(t1);
    let var2: i32 = ((var2.wrapping_mul(var2) >> 12).wrapping_mul(t3)) >> 14;

    let t_fine: i32 = var1.wrapping_add(var2);
    let temperature: i32 = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    (temperature, TFine(t_fine))
}

/// Compensate a raw humidity count, vendor output format.
///
/// Returns relative humidity in Q22.10, `1024` is 1 %RH, range
/// `0..=102400`.  Out of range intermediates are clamped.
pub fn compensate_humidity_q10(raw: u16, t_fine: TFine, cal: &HumidityCalibration) -> u32 {
    let adc: i32 = i32::from(raw);
    let h1: i32 = i32::from(cal.h1);
    let h2: i32 = i32::from(cal.h2);
    let h3: i32 = i32::from(cal.h3);
    let h4: i32 = i32::from(cal.h4);
    let h5: i32 = i32::from(cal.h5);
    let h6: i32 = i32::from(cal.h6);

    let var1: i32 = t_fine.0.wrapping_sub(76800);
    let offset: i32 = ((adc << 14)
        .wrapping_sub(h4 << 20)
        .wrapping_sub(h5.wrapping_mul(var1))
        .wrapping_add(16384))
        >> 15;
    let scale: i32 = (((((var1.wrapping_mul(h6) >> 10)
        .wrapping_mul((var1.wrapping_mul(h3) >> 11).wrapping_add(32768)))
        >> 10)
        .wrapping_add(2_097_152))
    .wrapping_mul(h2)
    .wrapping_add(8192))
        >> 14;
    let var1: i32 = offset.wrapping_mul(scale);
    let var1: i32 =
        var1.wrapping_sub((((var1 >> 15).wrapping_mul(var1 >> 15) >> 7).wrapping_mul(h1)) >> 4);
    let var1: i32 = var1.clamp(0, HUMIDITY_MAX);
    (var1 >> 12) as u32
}

/// Compensate a raw humidity count.
///
/// Returns relative humidity in thousandths of a percent, always within
/// `0..=100000`.
pub fn compensate_humidity(raw: u16, t_fine: TFine, cal: &HumidityCalibration) -> u32 {
    (compensate_humidity_q10(raw, t_fine, cal) * 1000) >> 10
}

/// Compensate a raw pressure count.
///
/// Returns pressure in Pa, which is hundredths of a hPa.  Returns
/// [`PRESSURE_INVALID`] instead of dividing by zero, callers must not treat
/// it as a reading near 0 hPa.
///
/// # Example
///
/// ```
/// use bme280_forced::{compensate_pressure, compensate_temperature};
/// use bme280_forced::{PressureCalibration, TemperatureCalibration, PRESSURE_INVALID};
///
/// let (_, t_fine) = compensate_temperature(
///     519888,
///     &TemperatureCalibration {
///         t1: 27504,
///         t2: 26435,
///         t3: -1000,
///     },
/// );
/// let mut cal = PressureCalibration {
///     p1: 36477,
///     p2: -10685,
///     p3: 3024,
///     p4: 2855,
///     p5: 140,
///     p6: -7,
///     p7: 15500,
///     p8: -14600,
///     p9: 6000,
/// };
/// assert_eq!(compensate_pressure(415148, t_fine, &cal), 100656);
///
/// cal.p1 = 0;
/// assert_eq!(compensate_pressure(415148, t_fine, &cal), PRESSURE_INVALID);
/// ```
pub fn compensate_pressure(raw: u32, t_fine: TFine, cal: &PressureCalibration) -> u32 {
    let adc: i32 = raw as i32;
    let p1: i32 = i32::from(cal.p1);
    let p2: i32 = i32::from(cal.p2);
    let p3: i32 = i32::from(cal.p3);
    let p4: i32 = i32::from(cal.p4);
    let p5: i32 = i32::from(cal.p5);
    let p6: i32 = i32::from(cal.p6);
    let p7: i32 = i32::from(cal.p7);
    let p8: i32 = i32::from(cal.p8);
    let p9: i32 = i32::from(cal.p9);

    let var1: i32 = (t_fine.0 >> 1).wrapping_sub(64000);
    let square: i32 = (var1 >> 2).wrapping_mul(var1 >> 2);
    let var2: i32 = (square >> 11).wrapping_mul(p6);
    let var2: i32 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
    let var2: i32 = (var2 >> 2).wrapping_add(p4 << 16);
    let var1: i32 = (p3.wrapping_mul(square >> 13) >> 3).wrapping_add(p2.wrapping_mul(var1) >> 1);
    let var1: i32 = var1 >> 18;
    let var1: i32 = (32768i32.wrapping_add(var1)).wrapping_mul(p1) >> 15;

    if var1 == 0 {
        log::warn!("[COMP] pressure denominator is zero");
        return PRESSURE_INVALID;
    }
    let divisor: u32 = var1 as u32;

    let p: u32 = (1_048_576i32.wrapping_sub(adc) as u32)
        .wrapping_sub((var2 >> 12) as u32)
        .wrapping_mul(3125);
    // shift before dividing only while the shift cannot overflow
    let p: u32 = if p < 0x8000_0000 {
        (p << 1) / divisor
    } else {
        (p / divisor).wrapping_mul(2)
    };

    let var1: i32 = p9.wrapping_mul((((p >> 3).wrapping_mul(p >> 3)) >> 13) as i32) >> 12;
    let var2: i32 = ((p >> 2) as i32).wrapping_mul(p8) >> 13;
    (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(p7) >> 4) as u32
}

/// A compensated sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reading {
    /// Temperature in hundredths of a degree Celsius.
    pub temperature: i32,
    /// Relative humidity in thousandths of a percent, `0..=100000`.
    pub humidity: u32,
    /// Pressure in hundredths of a hPa.
    ///
    /// `None` when pressure is not measured, `Some(PRESSURE_INVALID)` when
    /// the compensation was short-circuited.
    pub pressure: Option<u32>,
}

impl Reading {
    /// Returns `true` if a pressure was measured and the compensation did
    /// not short-circuit.
    pub fn has_valid_pressure(&self) -> bool {
        matches!(self.pressure, Some(p) if p != PRESSURE_INVALID)
    }
}

/// Compensate one raw snapshot.
///
/// Runs temperature first and threads its `t_fine` into humidity and
/// pressure.  Pressure is compensated only if `cal` carries pressure
/// coefficients; a skipped pressure channel yields [`PRESSURE_INVALID`].
pub fn compensate(raw: &RawMeasurement, cal: &Calibration) -> (Reading, TFine) {
    let (temperature, t_fine) = compensate_temperature(raw.temperature, cal.temperature());
    let humidity: u32 = compensate_humidity(raw.humidity, t_fine, cal.humidity());
    let pressure: Option<u32> = cal.pressure().map(|pcal| {
        if raw.pressure_skipped() {
            log::warn!("[COMP] pressure channel skipped");
            PRESSURE_INVALID
        } else {
            compensate_pressure(raw.pressure, t_fine, pcal)
        }
    });
    (
        Reading {
            temperature,
            humidity,
            pressure,
        },
        t_fine,
    )
}

impl fmt::Display for Reading {
    /// Report line, for example
    /// `Temperature: 25.08C Rel Humidity: 39.624% Pressure: 1006.56 hPa`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign: &str = if self.temperature < 0 { "-" } else { "" };
        let temperature: u32 = self.temperature.unsigned_abs();
        write!(
            f,
            "Temperature: {}{}.{:02}C Rel Humidity: {}.{:03}%",
            sign,
            temperature / 100,
            temperature % 100,
            self.humidity / 1000,
            self.humidity % 1000,
        )?;
        match self.pressure {
            None => Ok(()),
            Some(PRESSURE_INVALID) => write!(f, " Pressure: unavailable"),
            Some(p) => write!(f, " Pressure: {}.{:02} hPa", p / 100, p % 100),
        }
    }
}
