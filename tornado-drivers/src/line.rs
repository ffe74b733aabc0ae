//! Digital output lines with configurable polarity

use embedded_hal::digital::OutputPin;
use tornado_core::traits::ActuatorError;

/// Electrical level that means "asserted"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Pin level for a logical state
    pub fn level(self, asserted: bool) -> bool {
        match self {
            Polarity::ActiveHigh => asserted,
            Polarity::ActiveLow => !asserted,
        }
    }
}

/// An output pin addressed by logical state
pub struct Line<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P: OutputPin> Line<P> {
    /// Wrap a pin and drive it to the de-asserted level
    pub fn new(pin: P, polarity: Polarity) -> Result<Self, ActuatorError> {
        let mut line = Self {
            pin,
            polarity,
            asserted: false,
        };
        line.set(false)?;
        Ok(line)
    }

    /// Drive the line, always writing the pin
    pub fn set(&mut self, asserted: bool) -> Result<(), ActuatorError> {
        let result = if self.polarity.level(asserted) {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::Pin)?;
        self.asserted = asserted;
        Ok(())
    }

    /// Last logical state written successfully
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Release the pin
    pub fn into_inner(self) -> P {
        self.pin
    }

    #[cfg(test)]
    pub(crate) fn pin(&self) -> &P {
        &self.pin
    }
}
