//! Selectors naming a component loaded in a [`Machine`](crate::Machine).

use std::str::FromStr;

use crate::error::EnigmaError;
use crate::wheel::WheelId;

/// Names one loaded rotor: by position in the stack or by identity.
///
/// Negative indices count from the end of the stack, `-1` being the last
/// loaded rotor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotorRef {
    Index(isize),
    Id(WheelId),
}

impl From<isize> for RotorRef {
    fn from(index: isize) -> Self {
        RotorRef::Index(index)
    }
}

impl From<WheelId> for RotorRef {
    fn from(id: WheelId) -> Self {
        RotorRef::Id(id)
    }
}

/// Names any wheel of a machine: a rotor, the reflector or the entry wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Rotor(RotorRef),
    Reflector,
    EntryWheel,
}

impl From<isize> for Selector {
    fn from(index: isize) -> Self {
        Selector::Rotor(RotorRef::Index(index))
    }
}

impl From<WheelId> for Selector {
    fn from(id: WheelId) -> Self {
        Selector::Rotor(RotorRef::Id(id))
    }
}

impl From<RotorRef> for Selector {
    fn from(rotor: RotorRef) -> Self {
        Selector::Rotor(rotor)
    }
}

impl FromStr for Selector {
    type Err = EnigmaError;

    /// Accepts an integer index, `"reflector"`/`"ukw"` or
    /// `"entry_wheel"`/`"etw"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "reflector" | "ukw" => Ok(Selector::Reflector),
            "entry_wheel" | "entry wheel" | "etw" => Ok(Selector::EntryWheel),
            _ => name
                .parse::<isize>()
                .map(Selector::from)
                .map_err(|_| EnigmaError::UnknownSelector(s.to_string())),
        }
    }
}
