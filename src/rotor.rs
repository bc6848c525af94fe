//! Rotor: a stepping wheel of the rotor stack.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::config::WheelSpec;
use crate::error::Result;
use crate::wheel::{Rotation, Wheel};
use crate::wire::{RawWire, Wire};

/// A wheel of the rotor stack. Steps [`Rotation::Forward`] by default.
#[derive(Debug, Clone)]
pub struct Rotor(Wheel);

impl Rotor {
    /// Validates `wire` and builds a forward-stepping rotor at position 0.
    ///
    /// # Errors
    /// Any [`Wire::validate`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::Rotor;
    ///
    /// let mut rotor = Rotor::new(vec![1, 2, 3, 0]).unwrap();
    /// rotor.set_turnovers([0]).unwrap();
    /// assert!(rotor.step());
    /// assert_eq!(rotor.position(), 1);
    /// ```
    pub fn new(wire: impl Into<RawWire>) -> Result<Self> {
        Ok(Self::from_wire(Wire::validate(wire)?))
    }

    pub fn from_wire(wire: Wire) -> Self {
        Rotor(Wheel::new(wire, Rotation::Forward))
    }

    pub fn from_spec(spec: &WheelSpec) -> Result<Self> {
        Ok(Rotor(Wheel::from_spec(spec)?))
    }

    /// Builder: sets the turnover notches.
    pub fn with_turnovers<I>(mut self, turnovers: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        self.0.set_turnovers(turnovers)?;
        Ok(self)
    }

    /// Builder: sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.0.set_description(description);
        self
    }

    /// An independent rotor with the same wiring and settings.
    pub fn duplicate(&self) -> Self {
        Rotor(self.0.duplicate())
    }

    pub fn into_wheel(self) -> Wheel {
        self.0
    }
}

impl From<Wheel> for Rotor {
    fn from(wheel: Wheel) -> Self {
        Rotor(wheel)
    }
}

impl Deref for Rotor {
    type Target = Wheel;

    fn deref(&self) -> &Wheel {
        &self.0
    }
}

impl DerefMut for Rotor {
    fn deref_mut(&mut self) -> &mut Wheel {
        &mut self.0
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
