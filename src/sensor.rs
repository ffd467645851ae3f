//! Sensor session.
//!
//! A [`Sensor`] owns the bus, the settings, the calibration coefficients,
//! and the `t_fine` of the latest cycle.
//!
//! ```text
//! Uninitialized -> IdentityConfirmed -> CalibrationLoaded
//!       |                                  |
//!       v                                  v
//!    Faulted                 Idle <-> MeasurementInFlight -> ResultReady
//! ```

use crate::calibration::Calibration;
use crate::compensation::{compensate, Reading, TFine};
use crate::measurement::RawMeasurement;
use crate::protocol::Protocol;
use crate::settings::Settings;
use crate::transport::Transport;
use crate::{Error, CHIP_ID};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state, nothing is known about the device.
    Uninitialized,
    /// The chip ID matched.
    IdentityConfirmed,
    /// Calibration coefficients are loaded, measurements are possible.
    CalibrationLoaded(Calibration),
    /// The chip ID did not match, terminal.
    Faulted,
}

impl SessionState {
    /// Returns `true` if the state is [`SessionState::Uninitialized`].
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// Returns `true` if the state is [`SessionState::IdentityConfirmed`].
    pub fn is_identity_confirmed(&self) -> bool {
        matches!(self, Self::IdentityConfirmed)
    }

    /// Returns `true` if the state is [`SessionState::CalibrationLoaded`].
    pub fn is_calibration_loaded(&self) -> bool {
        matches!(self, Self::CalibrationLoaded(_))
    }

    /// Returns `true` if the state is [`SessionState::Faulted`].
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted)
    }

    /// Returns `true` if the chip ID has been confirmed in this state.
    pub fn is_identified(&self) -> bool {
        matches!(self, Self::IdentityConfirmed | Self::CalibrationLoaded(_))
    }
}

/// Measurement cycle phase, meaningful once calibration is loaded.
///
/// [`Sensor::measure`] moves `Idle` or `ResultReady` to
/// `MeasurementInFlight`, then to `ResultReady` on success or back to
/// `Idle` on a bus error.  [`Sensor::take_reading`] moves `ResultReady`
/// back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No measurement in progress and no unconsumed result.
    Idle,
    /// A trigger and data read is on the bus.
    MeasurementInFlight,
    /// The latest cycle completed, see [`Sensor::last_reading`].
    ResultReady,
}

/// BME280 sensor session.
#[derive(Debug)]
pub struct Sensor<T> {
    protocol: Protocol<T>,
    settings: Settings,
    state: SessionState,
    phase: Phase,
    last: Option<(Reading, TFine)>,
}

impl<T: Transport> Sensor<T> {
    /// Creates a new session from a transport and settings.
    ///
    /// No bus traffic happens until [`identify`](Self::identify) or
    /// [`start`](Self::start).
    pub fn new(transport: T, settings: Settings) -> Self {
        Sensor {
            protocol: Protocol::new(transport),
            settings,
            state: SessionState::Uninitialized,
            phase: Phase::Idle,
            last: None,
        }
    }

    /// Session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Measurement cycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Calibration coefficients, once loaded.
    pub fn calibration(&self) -> Option<&Calibration> {
        match &self.state {
            SessionState::CalibrationLoaded(cal) => Some(cal),
            _ => None,
        }
    }

    /// Reading of the latest completed cycle.
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last.as_ref().map(|(reading, _)| reading)
    }

    /// `t_fine` of the latest completed cycle.
    pub fn last_t_fine(&self) -> Option<TFine> {
        self.last.map(|(_, t_fine)| t_fine)
    }

    /// Consume the result of the latest cycle.
    ///
    /// Returns `None` unless the phase is [`Phase::ResultReady`]; the phase
    /// is [`Phase::Idle`] afterwards.
    pub fn take_reading(&mut self) -> Option<Reading> {
        if self.phase != Phase::ResultReady {
            return None;
        }
        self.phase = Phase::Idle;
        self.last.map(|(reading, _)| reading)
    }

    /// Free the transport.
    pub fn free(self) -> T {
        self.protocol.free()
    }

    /// Confirm the chip ID.
    ///
    /// Mismatches are retried as allowed by [`Settings::identify`]; when
    /// the attempts run out the session becomes [`SessionState::Faulted`]
    /// and [`Error::DeviceAbsent`] carries the last ID read.
    pub fn identify(&mut self) -> Result<(), Error<T::Error>> {
        if self.state.is_faulted() {
            return Err(Error::Faulted);
        }

        let attempts: u8 = self.settings.identify.attempts();
        let mut last_id: u8 = 0;
        for attempt in 1..=attempts {
            let id: u8 = self.protocol.identify().map_err(Error::Transport)?;
            if id == CHIP_ID {
                log::debug!("[BME280] chip ID 0x{:02X}", id);
                if self.state.is_uninitialized() {
                    self.state = SessionState::IdentityConfirmed;
                }
                return Ok(());
            }
            log::warn!(
                "[BME280] chip ID 0x{:02X} != 0x{:02X} (attempt {}/{})",
                id,
                CHIP_ID,
                attempt,
                attempts
            );
            last_id = id;
        }

        log::error!("[BME280] device absent or faulty");
        self.state = SessionState::Faulted;
        Err(Error::DeviceAbsent(last_id))
    }

    fn require_identity(&self) -> Result<(), Error<T::Error>> {
        match self.state {
            SessionState::Faulted => Err(Error::Faulted),
            SessionState::Uninitialized => Err(Error::NotIdentified),
            _ => Ok(()),
        }
    }

    /// Write the oversampling and mode configuration.
    pub fn configure(&mut self) -> Result<(), Error<T::Error>> {
        self.require_identity()?;
        self.protocol
            .configure_sensor(self.settings.ctrl_hum.into(), self.settings.ctrl_meas.bits())
            .map_err(Error::Transport)
    }

    /// Read and decode the calibration coefficients.
    pub fn load_calibration(&mut self) -> Result<Calibration, Error<T::Error>> {
        self.require_identity()?;
        let block = self
            .protocol
            .read_calibration_block()
            .map_err(Error::Transport)?;
        let tail = self
            .protocol
            .read_humidity_calibration_tail()
            .map_err(Error::Transport)?;

        let cal: Calibration = Calibration::from_blocks(&block, &tail, self.settings.variant);
        log::debug!("[BME280] {:?}", cal);
        self.state = SessionState::CalibrationLoaded(cal);
        self.phase = Phase::Idle;
        self.last = None;
        Ok(cal)
    }

    /// Identify, configure, and load the calibration.
    pub fn start(&mut self) -> Result<(), Error<T::Error>> {
        self.identify()?;
        self.configure()?;
        self.load_calibration()?;
        Ok(())
    }

    /// Trigger a forced conversion, read, and compensate.
    ///
    /// The data registers hold the result of the previous trigger (the
    /// one issued by [`configure`](Self::configure) for the first call).
    pub fn measure(&mut self) -> Result<Reading, Error<T::Error>> {
        let cal: Calibration = match self.state {
            SessionState::CalibrationLoaded(cal) => cal,
            SessionState::Faulted => return Err(Error::Faulted),
            _ => return Err(Error::NotCalibrated),
        };

        let ctrl_hum: Option<u8> = if self.settings.reassert_ctrl_hum {
            Some(self.settings.ctrl_hum.into())
        } else {
            None
        };

        self.phase = Phase::MeasurementInFlight;
        self.last = None;
        let buf = match self
            .protocol
            .trigger_and_read_measurement(ctrl_hum, self.settings.ctrl_meas.bits())
        {
            Ok(buf) => buf,
            Err(e) => {
                self.phase = Phase::Idle;
                return Err(Error::Transport(e));
            }
        };

        let raw: RawMeasurement = RawMeasurement::from(buf);
        let pressure_skipped: bool = cal.pressure().is_some() && raw.pressure_skipped();
        if raw.temperature_skipped() || raw.humidity_skipped() || pressure_skipped {
            log::warn!("[BME280] output is held in reset {:?}", raw);
        }

        let (reading, t_fine) = compensate(&raw, &cal);
        log::debug!("[BME280] {:?} t_fine={}", reading, t_fine.value());
        self.last = Some((reading, t_fine));
        self.phase = Phase::ResultReady;
        Ok(reading)
    }
}
