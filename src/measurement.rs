//! Raw measurement decoding.

use crate::reg::MEAS_BLOCK_LEN;

/// Raw pressure / temperature value when the channel is skipped.
pub const SKIPPED_20BIT: u32 = 0x80000;
/// Raw humidity value when the channel is skipped.
pub const SKIPPED_16BIT: u16 = 0x8000;

/// One raw ADC snapshot from the data registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawMeasurement {
    /// 20 bit pressure count.
    pub pressure: u32,
    /// 20 bit temperature count.
    pub temperature: u32,
    /// 16 bit humidity count.
    pub humidity: u16,
}

impl RawMeasurement {
    /// Returns `true` if the temperature channel was not converted.
    pub fn temperature_skipped(&self) -> bool {
        self.temperature == SKIPPED_20BIT
    }

    /// Returns `true` if the pressure channel was not converted.
    pub fn pressure_skipped(&self) -> bool {
        self.pressure == SKIPPED_20BIT
    }

    /// Returns `true` if the humidity channel was not converted.
    pub fn humidity_skipped(&self) -> bool {
        self.humidity == SKIPPED_16BIT
    }
}

/// 20 significant bits, left justified in three bytes.
#[inline(always)]
fn u20(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    (u32::from(msb) << 16 | u32::from(lsb) << 8 | u32::from(xlsb)) >> 4
}

impl From<[u8; MEAS_BLOCK_LEN]> for RawMeasurement {
    /// Decode the `0xF7..=0xFE` burst.
    ///
    /// # Example
    ///
    /// ```
    /// use bme280_forced::RawMeasurement;
    ///
    /// let raw = RawMeasurement::from([0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x6A, 0x6A]);
    /// assert_eq!(raw.pressure, 415148);
    /// assert_eq!(raw.temperature, 519888);
    /// assert_eq!(raw.humidity, 27242);
    /// ```
    fn from(buf: [u8; MEAS_BLOCK_LEN]) -> Self {
        // msb [7:0] = p[19:12]
        // lsb [7:0] = p[11:4]
        // xlsb[7:4] = p[3:0]
        let pressure: u32 = u20(buf[0], buf[1], buf[2]);
        // msb [7:0] = t[19:12]
        // lsb [7:0] = t[11:4]
        // xlsb[7:4] = t[3:0]
        let temperature: u32 = u20(buf[3], buf[4], buf[5]);
        // msb [7:0] = h[15:8]
        // lsb [7:0] = h[7:0]
        let humidity: u16 = u16::from_be_bytes([buf[6], buf[7]]);

        RawMeasurement {
            pressure,
            temperature,
            humidity,
        }
    }
}
