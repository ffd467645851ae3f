//! Register protocol.
//!
//! Every public method here is exactly one chip select frame.  The sensor
//! clocks out garbage while it receives the address byte, that byte is
//! thrown away.
//!
//! ```text
//! SPI read (BME280 Datasheet Figure 13: SPI multiple byte read)
//! +-----+------------+------------+-----+------------+-----+
//! | CSB | RW|addr 7  | data byte  | ... | data byte  | CSB |
//! +-----+------------+------------+-----+------------+-----+
//! | low | 1 xxxxxxx  | auto-incr  |     |            | high|
//! +-----+------------+------------+-----+------------+-----+
//!
//! SPI write (BME280 Datasheet Figure 12: SPI multiple byte write)
//! +-----+------------+-----------+------------+-----------+-----+
//! | CSB | RW|addr 7  | data byte | RW|addr 7  | data byte | CSB |
//! +-----+------------+-----------+------------+-----------+-----+
//! | low | 0 xxxxxxx  | 76543210  | 0 xxxxxxx  | 76543210  | high|
//! +-----+------------+-----------+------------+-----------+-----+
//! ```

use crate::reg;
use crate::transport::Transport;

/// Byte clocked out while reading.
pub const DUMMY: u8 = 0xAA;

/// Register protocol over a [`Transport`].
#[derive(Debug)]
pub struct Protocol<T> {
    transport: T,
}

impl<T: Transport> Protocol<T> {
    /// Wrap a transport.
    pub fn new(transport: T) -> Self {
        Protocol { transport }
    }

    /// Free the transport.
    pub fn free(self) -> T {
        self.transport
    }

    /// Run `f` with chip select asserted.
    ///
    /// Chip select is released even when `f` fails; the first error wins.
    #[inline(always)]
    fn with_chip_select<R, F>(&mut self, f: F) -> Result<R, T::Error>
    where
        F: FnOnce(&mut T) -> Result<R, T::Error>,
    {
        self.transport.begin()?;
        let result = f(&mut self.transport);
        let end = self.transport.end();
        let ret = result?;
        end?;
        Ok(ret)
    }

    /// Read the chip ID register.
    ///
    /// The caller compares the value against [`crate::CHIP_ID`].
    pub fn identify(&mut self) -> Result<u8, T::Error> {
        let id = self.with_chip_select(|bus| {
            bus.transfer(reg::read(reg::ID))?;
            bus.transfer(DUMMY)
        })?;
        log::trace!("[PROTO] id 0x{:02X}", id);
        Ok(id)
    }

    /// Write the humidity control, measurement control, and config registers.
    ///
    /// `ctrl_hum` is always written first; the sensor latches it only on the
    /// following `ctrl_meas` write.
    pub fn configure_sensor(&mut self, ctrl_hum: u8, ctrl_meas: u8) -> Result<(), T::Error> {
        log::trace!(
            "[PROTO] configure ctrl_hum=0x{:02X} ctrl_meas=0x{:02X}",
            ctrl_hum,
            ctrl_meas
        );
        self.with_chip_select(|bus| {
            write_reg(bus, reg::CTRL_HUM, ctrl_hum)?;
            write_reg(bus, reg::CTRL_MEAS, ctrl_meas)?;
            write_reg(bus, reg::CONFIG, reg::CONFIG_NEUTRAL)
        })
    }

    /// Burst read of the primary calibration block, `0x88..=0xA1`.
    pub fn read_calibration_block(&mut self) -> Result<[u8; reg::CALIB_BLOCK_LEN], T::Error> {
        let mut buf: [u8; reg::CALIB_BLOCK_LEN] = [0; reg::CALIB_BLOCK_LEN];
        self.with_chip_select(|bus| burst_read(bus, reg::CALIB_00, &mut buf))?;
        log::trace!("[PROTO] calibration block {:02X?}", buf);
        Ok(buf)
    }

    /// Burst read of the humidity calibration tail starting at `0xE1`.
    ///
    /// The humidity coefficients are split from the primary block by the
    /// register map, so this is a second frame.
    pub fn read_humidity_calibration_tail(
        &mut self,
    ) -> Result<[u8; reg::CALIB_TAIL_LEN], T::Error> {
        let mut buf: [u8; reg::CALIB_TAIL_LEN] = [0; reg::CALIB_TAIL_LEN];
        self.with_chip_select(|bus| burst_read(bus, reg::CALIB_26, &mut buf))?;
        log::trace!("[PROTO] humidity tail {:02X?}", buf);
        Ok(buf)
    }

    /// Trigger a forced mode conversion and burst read the data registers.
    ///
    /// When `ctrl_hum` is `Some` it is written before `ctrl_meas`.
    ///
    /// The data registers are shadowed while a conversion runs, so the
    /// returned bytes are the result of the previous conversion.
    pub fn trigger_and_read_measurement(
        &mut self,
        ctrl_hum: Option<u8>,
        ctrl_meas: u8,
    ) -> Result<[u8; reg::MEAS_BLOCK_LEN], T::Error> {
        let mut buf: [u8; reg::MEAS_BLOCK_LEN] = [0; reg::MEAS_BLOCK_LEN];
        self.with_chip_select(|bus| {
            if let Some(ctrl_hum) = ctrl_hum {
                write_reg(bus, reg::CTRL_HUM, ctrl_hum)?;
            }
            write_reg(bus, reg::CTRL_MEAS, ctrl_meas)?;
            write_reg(bus, reg::CONFIG, reg::CONFIG_NEUTRAL)?;
            burst_read(bus, reg::PRESS_MSB, &mut buf)
        })?;
        log::trace!("[PROTO] data {:02X?}", buf);
        Ok(buf)
    }
}

fn write_reg<T: Transport>(bus: &mut T, addr: u8, data: u8) -> Result<(), T::Error> {
    bus.transfer(reg::write(addr))?;
    bus.transfer(data)?;
    Ok(())
}

fn burst_read<T: Transport>(bus: &mut T, addr: u8, buf: &mut [u8]) -> Result<(), T::Error> {
    bus.transfer(reg::read(addr))?;
    for byte in buf.iter_mut() {
        *byte = bus.transfer(DUMMY)?;
    }
    Ok(())
}
