//! Entry wheel (ETW): links the keyboard contacts to the rotor stack.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::config::WheelSpec;
use crate::error::Result;
use crate::rotor::Rotor;
use crate::wheel::{Rotation, Wheel};
use crate::wire::{RawWire, Wire};

/// The entry wheel. Fixed by default; any wiring is allowed.
#[derive(Debug, Clone)]
pub struct EntryWheel(Wheel);

impl EntryWheel {
    pub fn new(wire: impl Into<RawWire>) -> Result<Self> {
        Ok(Self::from_wire(Wire::validate(wire)?))
    }

    pub fn from_wire(wire: Wire) -> Self {
        EntryWheel(Wheel::new(wire, Rotation::Fixed))
    }

    /// The straight-through entry wheel used when none is configured.
    pub fn identity(length: usize) -> Result<Self> {
        Ok(Self::from_wire(Wire::identity(length)?))
    }

    /// Uses a rotor as the entry wheel. The rotor keeps its rotation mode,
    /// settings and identity.
    pub fn from_rotor(rotor: Rotor) -> Self {
        EntryWheel(rotor.into_wheel())
    }

    pub fn from_spec(spec: &WheelSpec) -> Result<Self> {
        Ok(EntryWheel(Wheel::from_spec(spec)?))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.0.set_description(description);
        self
    }

    pub fn duplicate(&self) -> Self {
        EntryWheel(self.0.duplicate())
    }
}

impl Deref for EntryWheel {
    type Target = Wheel;

    fn deref(&self) -> &Wheel {
        &self.0
    }
}

impl DerefMut for EntryWheel {
    fn deref_mut(&mut self) -> &mut Wheel {
        &mut self.0
    }
}

impl fmt::Display for EntryWheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
