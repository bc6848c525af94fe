//! Wheel: the stateful permutation engine shared by rotors, reflectors and
//! entry wheels.
//!
//! A wheel wraps an immutable [`Wire`] with a rotational `position`, a
//! `ring_offset`, a set of turnover notches and a [`Rotation`] mode. The
//! position and offset shift the wire symmetrically on both reads, so
//! [`Wheel::backward_reading`] always undoes [`Wheel::forward_reading`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::{WheelSettings, WheelSpec};
use crate::error::{EnigmaError, Result};
use crate::wire::Wire;

static NEXT_WHEEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a physical wheel.
///
/// Clones share it; [`Wheel::duplicate`] allocates a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WheelId(pub u64);

impl WheelId {
    fn next() -> Self {
        WheelId(NEXT_WHEEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a wheel moves when stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Position increases by one on each step.
    Forward,
    /// Position decreases by one on each step.
    Reverse,
    /// Position never changes, but a step request still propagates.
    Fixed,
}

impl FromStr for Rotation {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "normal" => Ok(Rotation::Forward),
            "reverse" | "reversed" => Ok(Rotation::Reverse),
            "fixed" | "without" => Ok(Rotation::Fixed),
            _ => Err(EnigmaError::InvalidRotation(s.to_string())),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rotation::Forward => "forward",
            Rotation::Reverse => "reverse",
            Rotation::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

/// Stateful permutation engine.
///
/// Shape (`wire`, `length`) is fixed at construction; `position`,
/// `ring_offset`, `turnovers` and `rotation` stay mutable. Positions and
/// offsets are always kept in `0..length`.
#[derive(Debug, Clone)]
pub struct Wheel {
    id: WheelId,
    wire: Wire,
    position: usize,
    ring_offset: usize,
    turnovers: BTreeSet<usize>,
    rotation: Rotation,
    description: Option<String>,
}

impl Wheel {
    /// Creates a wheel at position 0, offset 0, with no turnovers.
    pub fn new(wire: Wire, rotation: Rotation) -> Self {
        Wheel {
            id: WheelId::next(),
            wire,
            position: 0,
            ring_offset: 0,
            turnovers: BTreeSet::new(),
            rotation,
            description: None,
        }
    }

    /// Builds a brand-new wheel from a full specification.
    ///
    /// # Errors
    /// Any wire validation error, or [`EnigmaError::OutOfRange`] for an
    /// offset or turnover outside the wire length.
    pub fn from_spec(spec: &WheelSpec) -> Result<Self> {
        let wire = Wire::validate(spec.wire.clone())?;
        let mut wheel = Wheel::new(wire, spec.settings.rotation);
        wheel.apply_settings(&spec.settings)?;
        wheel.description = spec.description.clone();
        Ok(wheel)
    }

    /// Returns an independent wheel with identical wiring and settings but a
    /// new identity.
    pub fn duplicate(&self) -> Self {
        Wheel {
            id: WheelId::next(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> WheelId {
        self.id
    }

    pub fn wire(&self) -> &Wire {
        &self.wire
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.wire.len()
    }

    /// True only for a wheel without contacts; validated wires have at least
    /// two.
    pub fn is_empty(&self) -> bool {
        self.wire.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Sets the position. Any value is accepted and reduced modulo the length.
    pub fn set_position(&mut self, position: usize) {
        self.position = position % self.len();
    }

    pub fn ring_offset(&self) -> usize {
        self.ring_offset
    }

    /// Sets the ring offset.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] if `offset >= self.len()`.
    pub fn set_ring_offset(&mut self, offset: usize) -> Result<()> {
        self.check_range(offset)?;
        self.ring_offset = offset;
        Ok(())
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn turnovers(&self) -> &BTreeSet<usize> {
        &self.turnovers
    }

    /// Replaces the turnover set.
    ///
    /// A turnover is the position the wheel *leaves* when it signals its
    /// neighbour.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] for the first value outside
    /// `0..len`; the current set is left untouched.
    pub fn set_turnovers<I>(&mut self, turnovers: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let set: BTreeSet<usize> = turnovers.into_iter().collect();
        for &value in &set {
            self.check_range(value)?;
        }
        self.turnovers = set;
        Ok(())
    }

    /// Overflow positions: the positions *reached* when a notch is left.
    pub fn overflows(&self) -> BTreeSet<usize> {
        let n = self.len();
        self.turnovers.iter().map(|&t| (t + 1) % n).collect()
    }

    /// Replaces the turnover set using overflow notation (`turnover = overflow - 1`).
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] for a value outside `0..len`.
    pub fn set_overflows<I>(&mut self, overflows: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let n = self.len();
        let overflows: Vec<usize> = overflows.into_iter().collect();
        for &value in &overflows {
            self.check_range(value)?;
        }
        self.set_turnovers(overflows.into_iter().map(|o| (o + n - 1) % n))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// True if the current position is a turnover notch.
    #[inline]
    pub fn is_at_turnover(&self) -> bool {
        self.turnovers.contains(&self.position)
    }

    /// True unless the rotation mode is [`Rotation::Fixed`].
    #[inline]
    pub fn can_step(&self) -> bool {
        self.rotation != Rotation::Fixed
    }

    /// Advances the wheel by one position.
    ///
    /// Returns whether the step should propagate to the next wheel: the
    /// turnover test is made before moving. A fixed wheel does not move and
    /// always propagates.
    #[inline]
    pub fn step(&mut self) -> bool {
        let was_at_turnover = self.is_at_turnover();
        let n = self.len();
        match self.rotation {
            Rotation::Fixed => return true,
            Rotation::Forward => self.position = (self.position + 1) % n,
            Rotation::Reverse => self.position = (self.position + n - 1) % n,
        }
        was_at_turnover
    }

    /// Combined shift of position and ring offset, in `0..len`.
    #[inline]
    pub fn modifier(&self) -> usize {
        let n = self.len();
        (self.position + n - self.ring_offset) % n
    }

    /// Scrambles `x` in the keyboard-to-reflector direction.
    ///
    /// `x` is taken modulo the wheel length.
    #[inline]
    pub fn forward_reading(&self, x: usize) -> usize {
        let n = self.len();
        let m = self.modifier();
        (self.wire.forward((x % n + m) % n) + n - m) % n
    }

    /// Scrambles `x` in the reflector-to-lamp direction; the exact inverse of
    /// [`forward_reading`](Self::forward_reading) for the same settings.
    #[inline]
    pub fn backward_reading(&self, x: usize) -> usize {
        let n = self.len();
        let m = self.modifier();
        (self.wire.backward((x % n + m) % n) + n - m) % n
    }

    /// Current settings (everything but the wire and description).
    pub fn settings(&self) -> WheelSettings {
        WheelSettings {
            position: self.position,
            ring_offset: self.ring_offset,
            turnovers: self.turnovers.iter().copied().collect(),
            rotation: self.rotation,
        }
    }

    /// Applies a settings snapshot.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] if the offset or any turnover is
    /// out of range; nothing is changed in that case.
    pub fn apply_settings(&mut self, settings: &WheelSettings) -> Result<()> {
        self.validate_settings(settings)?;
        self.position = settings.position % self.len();
        self.ring_offset = settings.ring_offset;
        self.turnovers = settings.turnovers.iter().copied().collect();
        self.rotation = settings.rotation;
        Ok(())
    }

    /// Checks a settings snapshot against this wheel without applying it.
    pub(crate) fn validate_settings(&self, settings: &WheelSettings) -> Result<()> {
        self.check_range(settings.ring_offset)?;
        for &turnover in &settings.turnovers {
            self.check_range(turnover)?;
        }
        Ok(())
    }

    /// Full specification, enough to rebuild an equivalent wheel.
    pub fn spec(&self) -> WheelSpec {
        WheelSpec {
            wire: self.wire.as_slice().to_vec(),
            settings: self.settings(),
            description: self.description.clone(),
        }
    }

    /// Zeroes the key-bearing state.
    pub(crate) fn clear_key(&mut self) {
        self.position = 0;
        self.ring_offset = 0;
    }

    fn check_range(&self, value: usize) -> Result<()> {
        if value < self.len() {
            Ok(())
        } else {
            Err(EnigmaError::OutOfRange {
                value,
                length: self.len(),
            })
        }
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => f.write_str(description),
            None => write!(f, "wheel {} ({} contacts)", self.id, self.len()),
        }
    }
}
