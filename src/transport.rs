//! Byte level bus transport.
//!
//! The register protocol only needs three things from the bus: assert chip
//! select, swap one byte, release chip select.  [`Transport`] captures that,
//! and [`SpiTransport`] implements it for any `embedded-hal` full duplex SPI
//! peripheral plus a GPIO chip select.

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::spi::FullDuplex;

/// Synchronous full duplex byte transport with chip select framing.
pub trait Transport {
    /// Transport error type.
    type Error;

    /// Assert chip select, start of a frame.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Send one byte and return the byte clocked in at the same time.
    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Deassert chip select, end of a frame.
    fn end(&mut self) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn begin(&mut self) -> Result<(), Self::Error> {
        (**self).begin()
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        (**self).transfer(byte)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        (**self).end()
    }
}

/// [`SpiTransport`] error type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SpiError<S, P> {
    /// SPI bus error wrapper.
    Spi(S),
    /// GPIO pin error wrapper.
    Pin(P),
    /// The peripheral did not become ready within the poll limit.
    Timeout,
}

/// SPI transport over an `embedded-hal` full duplex peripheral.
///
/// The peripheral must already be configured for SPI mode 0 or 3, MSB
/// first.
pub struct SpiTransport<SPI, CS> {
    /// SPI bus.
    spi: SPI,
    /// GPIO for chip select.
    cs: CS,
    /// Maximum number of `WouldBlock` polls per byte half.
    poll_limit: Option<u32>,
}

impl<SPI, CS, E, PinError> SpiTransport<SPI, CS>
where
    SPI: FullDuplex<u8, Error = E>,
    CS: OutputPin<Error = PinError>,
{
    /// Creates a new transport from a SPI peripheral and a chip select
    /// digital I/O pin.
    ///
    /// Waiting on the peripheral is unbounded until
    /// [`with_poll_limit`](Self::with_poll_limit) is used.
    ///
    /// The chip select pin must be high before being passed to this function.
    ///
    /// # Example
    ///
    /// ```
    /// # use embedded_hal_mock as hal;
    /// # let spi = hal::spi::Mock::new(&[]);
    /// # let pin = hal::pin::Mock::new(&[]);
    /// use bme280_forced::SpiTransport;
    ///
    /// let transport = SpiTransport::new(spi, pin).with_poll_limit(Some(10_000));
    /// assert_eq!(transport.poll_limit(), Some(10_000));
    /// # let (mut spi, mut pin) = transport.free();
    /// # spi.done();
    /// # pin.done();
    /// ```
    pub fn new(spi: SPI, cs: CS) -> Self {
        SpiTransport {
            spi,
            cs,
            poll_limit: None,
        }
    }

    /// Bound the busy wait on the peripheral.
    ///
    /// `None` waits forever.
    #[must_use = "with_poll_limit returns a modified SpiTransport"]
    pub fn with_poll_limit(mut self, poll_limit: Option<u32>) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    /// Current poll limit.
    pub fn poll_limit(&self) -> Option<u32> {
        self.poll_limit
    }

    /// Free the SPI bus and CS pin.
    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn poll<T, F>(&mut self, mut f: F) -> Result<T, SpiError<E, PinError>>
    where
        F: FnMut(&mut SPI) -> nb::Result<T, E>,
    {
        let mut polls: u32 = 0;
        loop {
            match f(&mut self.spi) {
                Ok(x) => return Ok(x),
                Err(nb::Error::Other(e)) => return Err(SpiError::Spi(e)),
                Err(nb::Error::WouldBlock) => {
                    if let Some(limit) = self.poll_limit {
                        if polls >= limit {
                            return Err(SpiError::Timeout);
                        }
                    }
                    polls = polls.saturating_add(1);
                }
            }
        }
    }
}

impl<SPI, CS, E, PinError> Transport for SpiTransport<SPI, CS>
where
    SPI: FullDuplex<u8, Error = E>,
    CS: OutputPin<Error = PinError>,
{
    type Error = SpiError<E, PinError>;

    #[inline(always)]
    fn begin(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(SpiError::Pin)
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        self.poll(|spi| spi.send(byte))?;
        self.poll(|spi| spi.read())
    }

    #[inline(always)]
    fn end(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(SpiError::Pin)
    }
}
