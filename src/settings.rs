//! Sensor configuration.
//!
//! Everything in here is `const` constructible so a firmware image can bake
//! its configuration into flash:
//!
//! ```
//! use bme280_forced::{CtrlMeas, IdentifyPolicy, Mode, Oversampling, Settings, Variant};
//!
//! const SETTINGS: Settings = Settings::TEMPERATURE_HUMIDITY_PRESSURE
//!     .set_identify(IdentifyPolicy::Retry { attempts: 3 });
//!
//! assert_eq!(SETTINGS.variant, Variant::TemperatureHumidityPressure);
//! assert_eq!(SETTINGS.ctrl_meas.bits(), 0x25);
//! assert_eq!(SETTINGS.ctrl_meas.mode(), Mode::Forced);
//! assert_eq!(SETTINGS.ctrl_hum, Oversampling::X1);
//! ```

/// Oversampling settings for temperature, pressure, and humidity data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Oversampling {
    /// Skipped, output set to `0x80000` (`0x8000` for humidity).
    Skip = 0b000,
    /// Oversampling × 1
    X1 = 0b001,
    /// Oversampling × 2
    X2 = 0b010,
    /// Oversampling × 4
    X4 = 0b011,
    /// Oversampling × 8
    X8 = 0b100,
    /// Oversampling × 16
    X16 = 0b101,
}

impl From<Oversampling> for u8 {
    fn from(x: Oversampling) -> Self {
        x as u8
    }
}

impl Oversampling {
    const fn from_bits(bits: u8) -> Oversampling {
        match bits & 0b111 {
            0b000 => Oversampling::Skip,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }
}

/// Sensor power mode.
///
/// Only sleep and forced mode are supported, the driver always triggers
/// single conversions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Mode {
    /// No measurements are performed.
    Sleep = 0b00,
    /// Forced mode, one measurement then back to sleep.
    Forced = 0b01,
    /// The second encoding of forced mode.
    ///
    /// The datasheet accepts both `01` and `10`; they behave identically.
    ForcedAlias = 0b10,
}

/// `ctrl_meas` register value.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct CtrlMeas(u8);

impl CtrlMeas {
    /// Reset value, everything skipped and sleeping.
    ///
    /// # Example
    ///
    /// ```
    /// use bme280_forced::CtrlMeas;
    ///
    /// assert_eq!(CtrlMeas::reset().bits(), 0x00);
    /// ```
    pub const fn reset() -> CtrlMeas {
        CtrlMeas(0x00)
    }

    /// Raw register bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Set the oversampling for temperature data.
    ///
    /// # Example
    ///
    /// ```
    /// use bme280_forced::{CtrlMeas, Mode, Oversampling};
    ///
    /// const TEMPERATURE_ONLY: CtrlMeas = CtrlMeas::reset()
    ///     .set_osrs_t(Oversampling::X1)
    ///     .set_mode(Mode::Forced);
    /// assert_eq!(TEMPERATURE_ONLY.bits(), 0x21);
    /// assert_eq!(TEMPERATURE_ONLY.osrs_t(), Oversampling::X1);
    /// ```
    #[must_use = "set_osrs_t returns a modified CtrlMeas"]
    pub const fn set_osrs_t(self, os: Oversampling) -> CtrlMeas {
        CtrlMeas((self.0 & 0b0001_1111) | ((os as u8) << 5))
    }

    /// Get the temperature data oversampling.
    pub const fn osrs_t(&self) -> Oversampling {
        Oversampling::from_bits(self.0 >> 5)
    }

    /// Set the oversampling for pressure data.
    #[must_use = "set_osrs_p returns a modified CtrlMeas"]
    pub const fn set_osrs_p(self, os: Oversampling) -> CtrlMeas {
        CtrlMeas((self.0 & 0b1110_0011) | ((os as u8) << 2))
    }

    /// Get the pressure data oversampling.
    pub const fn osrs_p(&self) -> Oversampling {
        Oversampling::from_bits(self.0 >> 2)
    }

    /// Set the sensor mode.
    #[must_use = "set_mode returns a modified CtrlMeas"]
    pub const fn set_mode(self, m: Mode) -> CtrlMeas {
        CtrlMeas((self.0 & 0b1111_1100) | (m as u8))
    }

    /// Get the mode.
    pub const fn mode(&self) -> Mode {
        match self.0 & 0b11 {
            0b01 => Mode::Forced,
            0b10 => Mode::ForcedAlias,
            _ => Mode::Sleep,
        }
    }
}

impl Default for CtrlMeas {
    fn default() -> Self {
        CtrlMeas::reset()
    }
}

/// Which physical quantities are measured.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Variant {
    /// Temperature and humidity, pressure is neither measured nor compensated.
    TemperatureHumidity,
    /// Temperature, humidity, and pressure.
    TemperatureHumidityPressure,
}

impl Variant {
    /// Returns `true` if pressure is measured in this variant.
    pub const fn has_pressure(&self) -> bool {
        matches!(self, Variant::TemperatureHumidityPressure)
    }
}

/// What to do when the chip ID does not match.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum IdentifyPolicy {
    /// A single mismatch faults the session.
    Fatal,
    /// Read the chip ID up to `attempts` times before faulting.
    ///
    /// `attempts` of `0` or `1` behaves like [`IdentifyPolicy::Fatal`].
    Retry {
        /// Total number of chip ID reads.
        attempts: u8,
    },
}

impl IdentifyPolicy {
    /// Total number of chip ID reads permitted.
    pub const fn attempts(&self) -> u8 {
        match self {
            IdentifyPolicy::Fatal => 1,
            IdentifyPolicy::Retry { attempts } => {
                if *attempts == 0 {
                    1
                } else {
                    *attempts
                }
            }
        }
    }
}

/// Sensor session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Settings {
    /// Measured quantities.
    pub variant: Variant,
    /// `ctrl_hum` register value.
    pub ctrl_hum: Oversampling,
    /// `ctrl_meas` register value, written at setup and for every trigger.
    pub ctrl_meas: CtrlMeas,
    /// Write `ctrl_hum` again before every forced-mode trigger.
    pub reassert_ctrl_hum: bool,
    /// Chip ID mismatch handling.
    pub identify: IdentifyPolicy,
}

impl Settings {
    /// Temperature and humidity, 1× oversampling, forced mode.
    ///
    /// `ctrl_meas` is `0x22`, `ctrl_hum` is written once at setup.
    pub const TEMPERATURE_HUMIDITY: Settings = Settings {
        variant: Variant::TemperatureHumidity,
        ctrl_hum: Oversampling::X1,
        ctrl_meas: CtrlMeas::reset()
            .set_osrs_t(Oversampling::X1)
            .set_osrs_p(Oversampling::Skip)
            .set_mode(Mode::ForcedAlias),
        reassert_ctrl_hum: false,
        identify: IdentifyPolicy::Fatal,
    };

    /// Temperature, humidity, and pressure, 1× oversampling, forced mode.
    ///
    /// `ctrl_meas` is `0x25`, `ctrl_hum` is reasserted before every trigger.
    pub const TEMPERATURE_HUMIDITY_PRESSURE: Settings = Settings {
        variant: Variant::TemperatureHumidityPressure,
        ctrl_hum: Oversampling::X1,
        ctrl_meas: CtrlMeas::reset()
            .set_osrs_t(Oversampling::X1)
            .set_osrs_p(Oversampling::X1)
            .set_mode(Mode::Forced),
        reassert_ctrl_hum: true,
        identify: IdentifyPolicy::Fatal,
    };

    /// Replace the identify policy.
    #[must_use = "set_identify returns modified Settings"]
    pub const fn set_identify(mut self, identify: IdentifyPolicy) -> Settings {
        self.identify = identify;
        self
    }

    /// Replace the humidity oversampling.
    #[must_use = "set_ctrl_hum returns modified Settings"]
    pub const fn set_ctrl_hum(mut self, ctrl_hum: Oversampling) -> Settings {
        self.ctrl_hum = ctrl_hum;
        self
    }

    /// Replace the `ctrl_meas` register value.
    #[must_use = "set_ctrl_meas returns modified Settings"]
    pub const fn set_ctrl_meas(mut self, ctrl_meas: CtrlMeas) -> Settings {
        self.ctrl_meas = ctrl_meas;
        self
    }

    /// Choose whether `ctrl_hum` is written before every trigger.
    #[must_use = "set_reassert_ctrl_hum returns modified Settings"]
    pub const fn set_reassert_ctrl_hum(mut self, reassert: bool) -> Settings {
        self.reassert_ctrl_hum = reassert;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::TEMPERATURE_HUMIDITY_PRESSURE
    }
}
