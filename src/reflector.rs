//! Reflector (UKW): the wheel that sends the signal back through the stack.
//!
//! A proper reflector wire is an involution, which is what makes the machine
//! self-inverse. [`Reflector::from_rotor`] accepts any wire so that a plain
//! rotor can stand in for a reflector; the machine must then be told whether
//! it is encoding or decoding.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::config::WheelSpec;
use crate::error::Result;
use crate::rotor::Rotor;
use crate::wheel::{Rotation, Wheel};
use crate::wire::{RawWire, Wire};

/// The reflecting wheel. Fixed by default.
#[derive(Debug, Clone)]
pub struct Reflector(Wheel);

impl Reflector {
    /// Validates `wire` as an involution and builds a fixed reflector.
    ///
    /// # Errors
    /// Any [`Wire::validate`] error, or
    /// [`EnigmaError::NonInvolutivePermutation`](crate::EnigmaError::NonInvolutivePermutation)
    /// if `wire[wire[k]] != k` for some `k`.
    pub fn new(wire: impl Into<RawWire>) -> Result<Self> {
        Self::from_wire(Wire::validate(wire)?)
    }

    /// Builds a fixed reflector from an already validated wire.
    pub fn from_wire(wire: Wire) -> Result<Self> {
        wire.check_involution()?;
        Ok(Reflector(Wheel::new(wire, Rotation::Fixed)))
    }

    /// Uses a rotor as a reflector without the involution check.
    ///
    /// The rotor keeps its rotation mode and settings.
    pub fn from_rotor(rotor: Rotor) -> Self {
        Reflector(rotor.into_wheel())
    }

    /// Rebuilds a reflector from a specification, enforcing the involution.
    pub fn from_spec(spec: &WheelSpec) -> Result<Self> {
        let wheel = Wheel::from_spec(spec)?;
        wheel.wire().check_involution()?;
        Ok(Reflector(wheel))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.0.set_description(description);
        self
    }

    /// True when the wire is symmetric, so encoding and decoding coincide.
    pub fn is_involutive(&self) -> bool {
        self.0.wire().is_involution()
    }

    pub fn duplicate(&self) -> Self {
        Reflector(self.0.duplicate())
    }

    pub fn into_wheel(self) -> Wheel {
        self.0
    }
}

impl Deref for Reflector {
    type Target = Wheel;

    fn deref(&self) -> &Wheel {
        &self.0
    }
}

impl DerefMut for Reflector {
    fn deref_mut(&mut self) -> &mut Wheel {
        &mut self.0
    }
}

impl fmt::Display for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
