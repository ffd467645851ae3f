//! Register map.
//!
//! Addresses are the 8-bit values from Table 18 (Memory Map) of the BME280
//! datasheet.  On the SPI bus bit 7 of the address byte selects the
//! direction: set for reads, clear for writes.  Use [`read`] and [`write`]
//! to produce the byte that goes on the wire.

/// Chip ID, reads [`crate::CHIP_ID`].
pub const ID: u8 = 0xD0;
/// Humidity oversampling control.
///
/// Changes only become effective after a write to [`CTRL_MEAS`].
pub const CTRL_HUM: u8 = 0xF2;
/// Temperature / pressure oversampling and mode control.
pub const CTRL_MEAS: u8 = 0xF4;
/// Standby, IIR filter, and 3-wire SPI control.
pub const CONFIG: u8 = 0xF5;
/// First register of the primary calibration block.
pub const CALIB_00: u8 = 0x88;
/// `dig_H1`, the last register of the primary calibration block.
pub const CALIB_25: u8 = 0xA1;
/// First register of the humidity calibration tail.
pub const CALIB_26: u8 = 0xE1;
/// `dig_H6`, the last meaningful register of the humidity tail.
pub const CALIB_32: u8 = 0xE7;
/// First register of the measurement data block.
pub const PRESS_MSB: u8 = 0xF7;
/// Last register of the measurement data block.
pub const HUM_LSB: u8 = 0xFE;

/// Value written to [`CONFIG`]: no standby, filter off, 4-wire SPI.
pub const CONFIG_NEUTRAL: u8 = 0x00;

const RW_BIT: u8 = 1 << 7;

/// SPI address byte for reading `reg`.
///
/// # Example
///
/// ```
/// use bme280_forced::reg;
///
/// assert_eq!(reg::read(reg::ID), 0xD0);
/// assert_eq!(reg::read(reg::CALIB_26), 0xE1);
/// ```
#[inline(always)]
pub const fn read(reg: u8) -> u8 {
    reg | RW_BIT
}

/// SPI address byte for writing `reg`.
///
/// # Example
///
/// ```
/// use bme280_forced::reg;
///
/// assert_eq!(reg::write(reg::CTRL_HUM), 0x72);
/// assert_eq!(reg::write(reg::CTRL_MEAS), 0x74);
/// assert_eq!(reg::write(reg::CONFIG), 0x75);
/// ```
#[inline(always)]
pub const fn write(reg: u8) -> u8 {
    reg & !RW_BIT
}

/// Length of the primary calibration block, `0x88..=0xA1`.
pub const CALIB_BLOCK_LEN: usize = (CALIB_25 - CALIB_00 + 1) as usize;
/// Length of the humidity calibration tail read.
///
/// One byte longer than `0xE1..=0xE7`; the trailing byte is not used.
pub const CALIB_TAIL_LEN: usize = (CALIB_32 - CALIB_26 + 2) as usize;
/// Length of the measurement burst, `0xF7..=0xFE`.
pub const MEAS_BLOCK_LEN: usize = (HUM_LSB - PRESS_MSB + 1) as usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_lengths() {
        assert_eq!(CALIB_BLOCK_LEN, 26);
        assert_eq!(CALIB_TAIL_LEN, 8);
        assert_eq!(MEAS_BLOCK_LEN, 8);
    }

    #[test]
    fn read_addresses_on_the_wire() {
        assert_eq!(read(CALIB_00), 0x88);
        assert_eq!(read(PRESS_MSB), 0xF7);
    }
}
