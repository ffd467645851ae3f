//! Factory calibration coefficients.
//!
//! The coefficients live in two non-contiguous register blocks:
//!
//! * `0x88..=0xA1`: temperature, pressure, and `dig_H1`
//! * `0xE1..=0xE7`: the remaining humidity coefficients
//!
//! There is no checksum.  A decode error silently corrupts every reading,
//! the tests pin each field to its byte offsets.

use crate::reg::{CALIB_BLOCK_LEN, CALIB_TAIL_LEN};
use crate::settings::Variant;

/// Temperature coefficients, `dig_T1..dig_T3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemperatureCalibration {
    pub t1: u16, // 0x88..0x89 block[00:01]
    pub t2: i16, // 0x8A..0x8B block[02:03]
    pub t3: i16, // 0x8C..0x8D block[04:05]
}

/// Pressure coefficients, `dig_P1..dig_P9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PressureCalibration {
    pub p1: u16, // 0x8E..0x8F block[06:07]
    pub p2: i16, // 0x90..0x91 block[08:09]
    pub p3: i16, // 0x92..0x93 block[10:11]
    pub p4: i16, // 0x94..0x95 block[12:13]
    pub p5: i16, // 0x96..0x97 block[14:15]
    pub p6: i16, // 0x98..0x99 block[16:17]
    pub p7: i16, // 0x9A..0x9B block[18:19]
    pub p8: i16, // 0x9C..0x9D block[20:21]
    pub p9: i16, // 0x9E..0x9F block[22:23]
}

/// Humidity coefficients, `dig_H1..dig_H6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HumidityCalibration {
    pub h1: u8,  // 0xA1       block[25]
    pub h2: i16, // 0xE1..0xE2 tail[0:1]
    pub h3: u8,  // 0xE3       tail[2]
    pub h4: i16, // 0xE4..0xE5[3:0] = H4 [11:4]..[3:0]
    pub h5: i16, // 0xE5[7:4]..0xE6 = H5 [3:0]..[11:4]
    pub h6: i8,  // 0xE7       tail[6]
}

impl TemperatureCalibration {
    /// Decode from the primary calibration block.
    pub fn from_block(block: &[u8; CALIB_BLOCK_LEN]) -> Self {
        TemperatureCalibration {
            t1: u16::from_le_bytes([block[0], block[1]]),
            t2: i16::from_le_bytes([block[2], block[3]]),
            t3: i16::from_le_bytes([block[4], block[5]]),
        }
    }
}

impl PressureCalibration {
    /// Decode from the primary calibration block.
    pub fn from_block(block: &[u8; CALIB_BLOCK_LEN]) -> Self {
        PressureCalibration {
            p1: u16::from_le_bytes([block[6], block[7]]),
            p2: i16::from_le_bytes([block[8], block[9]]),
            p3: i16::from_le_bytes([block[10], block[11]]),
            p4: i16::from_le_bytes([block[12], block[13]]),
            p5: i16::from_le_bytes([block[14], block[15]]),
            p6: i16::from_le_bytes([block[16], block[17]]),
            p7: i16::from_le_bytes([block[18], block[19]]),
            p8: i16::from_le_bytes([block[20], block[21]]),
            p9: i16::from_le_bytes([block[22], block[23]]),
        }
    }
}

impl HumidityCalibration {
    /// Decode from the primary block (`dig_H1`) and the humidity tail.
    ///
    /// `dig_H4` and `dig_H5` are 12 bit values sharing register `0xE5`:
    /// H4 takes its low nibble, H5 its high nibble.  Neither is sign
    /// extended.
    pub fn from_blocks(block: &[u8; CALIB_BLOCK_LEN], tail: &[u8; CALIB_TAIL_LEN]) -> Self {
        HumidityCalibration {
            // INTENTIONAL ONE BYTE GAP at 0xA0 (see datasheet)
            h1: block[25],
            h2: i16::from_le_bytes([tail[0], tail[1]]),
            h3: tail[2],
            h4: (i16::from(tail[3]) << 4) | (i16::from(tail[4]) & 0x0F),
            h5: (i16::from(tail[5]) << 4) | (i16::from(tail[4]) >> 4),
            h6: tail[6] as i8,
        }
    }
}

/// All calibration coefficients of one sensor.
///
/// Only obtainable by decoding the raw calibration blocks, so a
/// compensation can never run on an unloaded calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calibration {
    temperature: TemperatureCalibration,
    pressure: Option<PressureCalibration>,
    humidity: HumidityCalibration,
}

impl Calibration {
    /// Decode the calibration blocks read from the sensor.
    ///
    /// Pressure coefficients are only decoded when `variant` measures
    /// pressure.
    ///
    /// # Example
    ///
    /// ```
    /// use bme280_forced::{Calibration, Variant};
    ///
    /// let mut block: [u8; 26] = [0; 26];
    /// block[0..2].copy_from_slice(&27504u16.to_le_bytes());
    /// block[25] = 75;
    /// let mut tail: [u8; 8] = [0; 8];
    /// tail[4] = 0x3D;
    ///
    /// let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidity);
    /// assert_eq!(cal.temperature().t1, 27504);
    /// assert_eq!(cal.humidity().h1, 75);
    /// assert_eq!(cal.humidity().h4, 0xD);
    /// assert_eq!(cal.humidity().h5, 0x3);
    /// assert!(cal.pressure().is_none());
    /// ```
    pub fn from_blocks(
        block: &[u8; CALIB_BLOCK_LEN],
        tail: &[u8; CALIB_TAIL_LEN],
        variant: Variant,
    ) -> Self {
        Calibration {
            temperature: TemperatureCalibration::from_block(block),
            pressure: if variant.has_pressure() {
                Some(PressureCalibration::from_block(block))
            } else {
                None
            },
            humidity: HumidityCalibration::from_blocks(block, tail),
        }
    }

    /// Temperature coefficients.
    pub fn temperature(&self) -> &TemperatureCalibration {
        &self.temperature
    }

    /// Pressure coefficients, `None` when pressure is not measured.
    pub fn pressure(&self) -> Option<&PressureCalibration> {
        self.pressure.as_ref()
    }

    /// Humidity coefficients.
    pub fn humidity(&self) -> &HumidityCalibration {
        &self.humidity
    }
}
