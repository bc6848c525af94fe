//! Machine: composes the rotor stack, reflector, entry wheel and plugboard.
//!
//! Drives the stepping cascade and the full signal path for each symbol.
//!
//! # Signal path
//!
//! ```text
//! key ─ plugboard ─ ETW ─ rotor[n-1] … rotor[0] ─ UKW
//!                                                  │
//! lamp ─ plugboard ─ ETW ─ rotor[n-1] … rotor[0] ──┘
//! ```
//!
//! Rotors are listed in load order, so the last loaded rotor is the one next
//! to the entry wheel (the "rightmost" rotor of a historical machine) and is
//! the first to step.

use std::fmt;

use tracing::{debug, trace};

use crate::config::MachineState;
use crate::entry_wheel::EntryWheel;
use crate::error::{EnigmaError, Result};
use crate::plugboard::Plugboard;
use crate::reflector::Reflector;
use crate::rotor::Rotor;
use crate::selector::{RotorRef, Selector};
use crate::wheel::{Wheel, WheelId};

/// Which wheel setting a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySetting {
    /// The visible rotor positions (Grundstellung).
    #[default]
    Position,
    /// The ring offsets (Ringstellung).
    RingOffset,
}

/// Components covered by [`Machine::key`] and [`Machine::set_key`].
///
/// Values are ordered `[reflector?, rotors in load order, entry wheel?]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyScope {
    pub reflector: bool,
    pub entry_wheel: bool,
    pub setting: KeySetting,
}

impl KeyScope {
    /// Rotor positions only.
    pub fn positions() -> Self {
        KeyScope::default()
    }

    /// Rotor ring offsets only.
    pub fn ring_offsets() -> Self {
        KeyScope {
            setting: KeySetting::RingOffset,
            ..KeyScope::default()
        }
    }

    pub fn with_reflector(mut self) -> Self {
        self.reflector = true;
        self
    }

    pub fn with_entry_wheel(mut self) -> Self {
        self.entry_wheel = true;
        self
    }
}

/// A complete rotor cipher machine over the integers `0..length`.
///
/// # Examples
///
/// ```
/// use enigma_engine::{Machine, Reflector, Rotor};
///
/// let mut machine = Machine::new(4).unwrap();
/// machine.load(Rotor::new(vec![1, 3, 0, 2]).unwrap()).unwrap();
/// machine.set_reflector(Reflector::new(vec![2, 3, 0, 1]).unwrap()).unwrap();
///
/// let start = machine.state();
/// let cipher = machine.encode(0).unwrap();
///
/// machine.restore(&start).unwrap();
/// assert_eq!(machine.encode(cipher).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    length: usize,
    rotors: Vec<Rotor>,
    reflector: Option<Reflector>,
    entry_wheel: EntryWheel,
    plugboard: Plugboard,
    description: Option<String>,
}

impl Machine {
    /// Creates an empty machine for `length` contacts with an identity entry
    /// wheel, no rotor, no reflector and an empty plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::TooFewContacts`] if `length < 2`.
    pub fn new(length: usize) -> Result<Self> {
        Ok(Machine {
            length,
            rotors: Vec::new(),
            reflector: None,
            entry_wheel: EntryWheel::identity(length)?,
            plugboard: Plugboard::new(length),
            description: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Number of contacts shared by every loaded component.
    pub fn len(&self) -> usize {
        self.length
    }

    /// True only for a machine without contacts, which [`Machine::new`]
    /// never builds.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    // ──────── Rotor stack ────────

    /// Appends a rotor to the stack.
    ///
    /// # Errors
    /// - [`EnigmaError::IncompatibleLength`] if the rotor length differs.
    /// - [`EnigmaError::DuplicateRotor`] if this wheel is already loaded.
    pub fn load(&mut self, rotor: Rotor) -> Result<()> {
        self.check_compatible(&rotor)?;
        if self.is_loaded(rotor.id()) {
            return Err(EnigmaError::DuplicateRotor { id: rotor.id() });
        }
        debug!(id = %rotor.id(), index = self.rotors.len(), "load rotor");
        self.rotors.push(rotor);
        Ok(())
    }

    /// Unloads every rotor.
    pub fn clear_rotors(&mut self) {
        debug!(count = self.rotors.len(), "clear rotors");
        self.rotors.clear();
    }

    /// Unloads and returns one rotor.
    ///
    /// # Errors
    /// [`EnigmaError::IndexOutOfRange`].
    pub fn remove(&mut self, rotor: impl Into<RotorRef>) -> Result<Rotor> {
        let index = self.resolve(rotor.into())?;
        let removed = self.rotors.remove(index);
        debug!(id = %removed.id(), index, "remove rotor");
        Ok(removed)
    }

    /// Exchanges the places of two loaded rotors.
    ///
    /// # Errors
    /// [`EnigmaError::IndexOutOfRange`]; both references are resolved before anything moves.
    pub fn swap_positions(&mut self, a: impl Into<RotorRef>, b: impl Into<RotorRef>) -> Result<()> {
        let a = self.resolve(a.into())?;
        let b = self.resolve(b.into())?;
        self.rotors.swap(a, b);
        debug!(a, b, "swap rotors");
        Ok(())
    }

    /// Loaded rotors in load order.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    pub fn rotor_count(&self) -> usize {
        self.rotors.len()
    }

    /// Stack index of the rotor with identity `id`.
    pub fn index_of(&self, id: WheelId) -> Option<usize> {
        self.rotors.iter().position(|rotor| rotor.id() == id)
    }

    /// Resolves a rotor reference to a stack index.
    ///
    /// Negative indices wrap from the end (`-1` is the last loaded rotor).
    ///
    /// # Errors
    /// [`EnigmaError::IndexOutOfRange`] for an index outside the stack, or
    /// with `index: -1` for an identity that is not loaded.
    pub fn resolve(&self, rotor: RotorRef) -> Result<usize> {
        let len = self.rotors.len();
        match rotor {
            RotorRef::Index(index) => {
                let resolved = if index < 0 {
                    len as isize + index
                } else {
                    index
                };
                if (0..len as isize).contains(&resolved) {
                    Ok(resolved as usize)
                } else {
                    Err(EnigmaError::IndexOutOfRange { index, len })
                }
            }
            RotorRef::Id(id) => self
                .index_of(id)
                .ok_or(EnigmaError::IndexOutOfRange { index: -1, len }),
        }
    }

    // ──────── Reflector and entry wheel ────────

    pub fn reflector(&self) -> Option<&Reflector> {
        self.reflector.as_ref()
    }

    /// Installs a reflector, returning the previous one.
    ///
    /// # Errors
    /// [`EnigmaError::IncompatibleLength`] or [`EnigmaError::DuplicateRotor`].
    pub fn set_reflector(&mut self, reflector: Reflector) -> Result<Option<Reflector>> {
        self.check_compatible(&reflector)?;
        if self.rotors.iter().any(|r| r.id() == reflector.id())
            || self.entry_wheel.id() == reflector.id()
        {
            return Err(EnigmaError::DuplicateRotor { id: reflector.id() });
        }
        debug!(id = %reflector.id(), involutive = reflector.is_involutive(), "set reflector");
        Ok(self.reflector.replace(reflector))
    }

    /// Removes and returns the reflector.
    pub fn take_reflector(&mut self) -> Option<Reflector> {
        self.reflector.take()
    }

    pub fn entry_wheel(&self) -> &EntryWheel {
        &self.entry_wheel
    }

    /// Installs an entry wheel; `None` restores the identity wheel.
    ///
    /// # Errors
    /// [`EnigmaError::IncompatibleLength`] or [`EnigmaError::DuplicateRotor`].
    pub fn set_entry_wheel(&mut self, entry_wheel: Option<EntryWheel>) -> Result<()> {
        let entry_wheel = match entry_wheel {
            Some(wheel) => {
                self.check_compatible(&wheel)?;
                if self.index_of(wheel.id()).is_some()
                    || self.reflector.as_ref().is_some_and(|r| r.id() == wheel.id())
                {
                    return Err(EnigmaError::DuplicateRotor { id: wheel.id() });
                }
                wheel
            }
            None => EntryWheel::identity(self.length)?,
        };
        debug!(id = %entry_wheel.id(), "set entry wheel");
        self.entry_wheel = entry_wheel;
        Ok(())
    }

    // ──────── Selection ────────

    /// Looks up any wheel.
    ///
    /// # Errors
    /// [`EnigmaError::NoReflectorLoaded`] when selecting a missing reflector,
    /// or a rotor resolution error.
    pub fn get(&self, selector: impl Into<Selector>) -> Result<&Wheel> {
        match selector.into() {
            Selector::Rotor(rotor) => {
                let index = self.resolve(rotor)?;
                Ok(&*self.rotors[index])
            }
            Selector::Reflector => self
                .reflector
                .as_deref()
                .ok_or(EnigmaError::NoReflectorLoaded),
            Selector::EntryWheel => Ok(&*self.entry_wheel),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, selector: impl Into<Selector>) -> Result<&mut Wheel> {
        match selector.into() {
            Selector::Rotor(rotor) => {
                let index = self.resolve(rotor)?;
                Ok(&mut *self.rotors[index])
            }
            Selector::Reflector => self
                .reflector
                .as_deref_mut()
                .ok_or(EnigmaError::NoReflectorLoaded),
            Selector::EntryWheel => Ok(&mut *self.entry_wheel),
        }
    }

    /// Wheels that may step, in stepping order:
    /// entry wheel, rotors from last loaded to first, reflector.
    pub fn moving_wheels(&self) -> Vec<&Wheel> {
        self.stepping_order().filter(|w| w.can_step()).collect()
    }

    /// Wheels that never step, in stepping order.
    pub fn stationary_wheels(&self) -> Vec<&Wheel> {
        self.stepping_order().filter(|w| !w.can_step()).collect()
    }

    // ──────── Plugboard ────────

    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    pub fn plugboard_mut(&mut self) -> &mut Plugboard {
        &mut self.plugboard
    }

    /// Connects two contacts on the plugboard.
    pub fn plug(&mut self, a: usize, b: usize) -> Result<()> {
        self.plugboard.connect(a, b)
    }

    /// Disconnects the cable plugged into `a`, if any.
    pub fn unplug(&mut self, a: usize) -> Result<()> {
        self.plugboard.disconnect(a)
    }

    pub fn is_plugged(&self, a: usize) -> bool {
        self.plugboard.is_connected(a)
    }

    // ──────── Stepping ────────

    /// Runs the stepping cascade once.
    ///
    /// The first wheel that can step always steps. Each following wheel steps
    /// if the previous one signalled a carry, or if it sits on one of its own
    /// turnover notches; the first wheel that does neither ends the cascade.
    /// Checking a wheel's own notch is what produces the double step of the
    /// middle rotor.
    pub fn turn(&mut self) {
        let Machine {
            rotors,
            reflector,
            entry_wheel,
            ..
        } = self;
        let order = std::iter::once(&mut **entry_wheel)
            .chain(rotors.iter_mut().rev().map(|rotor| &mut **rotor))
            .chain(reflector.as_mut().map(|reflector| &mut **reflector))
            .filter(|wheel| wheel.can_step());

        let mut allow_next = true;
        let mut stepped = 0usize;
        for wheel in order {
            if !(allow_next || wheel.is_at_turnover()) {
                break;
            }
            allow_next = wheel.step();
            stepped += 1;
        }
        trace!(stepped, "turn");
    }

    // ──────── Signal path ────────

    /// Encodes one symbol: plugboard, one stepping cascade, forward pass,
    /// reflection, backward pass, plugboard.
    ///
    /// With an involutive reflector `decoding` makes no difference. When a
    /// plain rotor stands in for the reflector, decoding reads it backwards.
    ///
    /// # Errors
    /// [`EnigmaError::NoRotorLoaded`], [`EnigmaError::NoReflectorLoaded`] or
    /// [`EnigmaError::OutOfRange`]; the machine does not step on error.
    pub fn encode_symbol(&mut self, x: usize, decoding: bool) -> Result<usize> {
        self.check_ready()?;
        self.check_symbol(x)?;

        let swapped = self.plugboard.swap(x);
        self.turn();
        let output = self.scramble(swapped, decoding)?;
        trace!(input = x, output, "encode symbol");
        Ok(output)
    }

    /// Encodes one symbol.
    pub fn encode(&mut self, x: usize) -> Result<usize> {
        self.encode_symbol(x, false)
    }

    /// Decodes one symbol.
    pub fn decode(&mut self, x: usize) -> Result<usize> {
        self.encode_symbol(x, true)
    }

    /// Encodes a sequence. Every symbol is range-checked before the first
    /// step, so an invalid symbol leaves the machine untouched.
    pub fn encode_sequence(&mut self, symbols: &[usize], decoding: bool) -> Result<Vec<usize>> {
        self.check_ready()?;
        for &x in symbols {
            self.check_symbol(x)?;
        }
        let mut output = Vec::with_capacity(symbols.len());
        for &x in symbols {
            output.push(self.encode_symbol(x, decoding)?);
        }
        Ok(output)
    }

    /// Sends one symbol through the whole signal path without stepping.
    pub fn read_value(&self, x: usize, decoding: bool) -> Result<usize> {
        self.check_ready()?;
        self.check_symbol(x)?;
        let swapped = self.plugboard.swap(x);
        self.scramble(swapped, decoding)
    }

    fn scramble(&self, x: usize, decoding: bool) -> Result<usize> {
        let reflector = self
            .reflector
            .as_ref()
            .ok_or(EnigmaError::NoReflectorLoaded)?;

        let mut x = self.read_forward(x);
        x = if decoding {
            reflector.backward_reading(x)
        } else {
            reflector.forward_reading(x)
        };
        x = self.read_backward(x);
        Ok(self.plugboard.swap(x))
    }

    /// Entry wheel, then rotors from last loaded to first.
    fn read_forward(&self, mut x: usize) -> usize {
        x = self.entry_wheel.forward_reading(x);
        for rotor in self.rotors.iter().rev() {
            x = rotor.forward_reading(x);
        }
        x
    }

    /// Rotors from first loaded to last, then entry wheel.
    fn read_backward(&self, mut x: usize) -> usize {
        for rotor in &self.rotors {
            x = rotor.backward_reading(x);
        }
        self.entry_wheel.backward_reading(x)
    }

    // ──────── Keys and state ────────

    /// Reads the key: positions (or ring offsets) of the selected wheels.
    ///
    /// # Errors
    /// [`EnigmaError::NoReflectorLoaded`] if the scope includes a missing
    /// reflector.
    pub fn key(&self, scope: KeyScope) -> Result<Vec<usize>> {
        let read = |wheel: &Wheel| match scope.setting {
            KeySetting::Position => wheel.position(),
            KeySetting::RingOffset => wheel.ring_offset(),
        };
        Ok(self.key_wheels(scope)?.into_iter().map(read).collect())
    }

    /// Sets the key of the selected wheels.
    ///
    /// Positions wrap modulo the machine length; ring offsets must be in
    /// range. Extra values are ignored.
    ///
    /// # Errors
    /// [`EnigmaError::KeyLengthMismatch`] if fewer values than wheels are
    /// given, [`EnigmaError::OutOfRange`] for a bad ring offset,
    /// [`EnigmaError::NoReflectorLoaded`]. Nothing changes on error.
    pub fn set_key(&mut self, scope: KeyScope, values: &[usize]) -> Result<()> {
        let expected = self.key_wheels(scope)?.len();
        if values.len() < expected {
            return Err(EnigmaError::KeyLengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        if scope.setting == KeySetting::RingOffset {
            if let Some(&value) = values[..expected].iter().find(|&&v| v >= self.length) {
                return Err(EnigmaError::OutOfRange {
                    value,
                    length: self.length,
                });
            }
        }

        let Machine {
            rotors,
            reflector,
            entry_wheel,
            ..
        } = self;
        let mut wheels: Vec<&mut Wheel> = Vec::with_capacity(expected);
        if scope.reflector {
            if let Some(reflector) = reflector.as_mut() {
                wheels.push(&mut **reflector);
            }
        }
        wheels.extend(rotors.iter_mut().map(|rotor| &mut **rotor));
        if scope.entry_wheel {
            wheels.push(&mut **entry_wheel);
        }

        for (wheel, &value) in wheels.into_iter().zip(values) {
            match scope.setting {
                KeySetting::Position => wheel.set_position(value),
                KeySetting::RingOffset => wheel.set_ring_offset(value)?,
            }
        }
        debug!(?scope, key = ?&values[..expected], "set key");
        Ok(())
    }

    /// Snapshot of every setting.
    pub fn state(&self) -> MachineState {
        MachineState {
            rotors: self.rotors.iter().map(|rotor| rotor.settings()).collect(),
            reflector: self.reflector.as_ref().map(|reflector| reflector.settings()),
            entry_wheel: self.entry_wheel.settings(),
            plugboard: self.plugboard.pairs(),
        }
    }

    /// Restores a snapshot taken with [`state`](Self::state).
    ///
    /// # Errors
    /// [`EnigmaError::KeyLengthMismatch`] if the rotor count differs,
    /// [`EnigmaError::NoReflectorLoaded`] if the snapshot has reflector
    /// settings but no reflector is loaded, or any settings/plugboard
    /// validation error. Everything is validated before anything is applied.
    pub fn restore(&mut self, state: &MachineState) -> Result<()> {
        if state.rotors.len() != self.rotors.len() {
            return Err(EnigmaError::KeyLengthMismatch {
                expected: self.rotors.len(),
                actual: state.rotors.len(),
            });
        }
        for (rotor, settings) in self.rotors.iter().zip(&state.rotors) {
            rotor.validate_settings(settings)?;
        }
        if let Some(settings) = &state.reflector {
            self.reflector
                .as_ref()
                .ok_or(EnigmaError::NoReflectorLoaded)?
                .validate_settings(settings)?;
        }
        self.entry_wheel.validate_settings(&state.entry_wheel)?;
        let mut plugboard = Plugboard::new(self.length);
        for &(a, b) in &state.plugboard {
            plugboard.connect(a, b)?;
        }

        for (rotor, settings) in self.rotors.iter_mut().zip(&state.rotors) {
            rotor.apply_settings(settings)?;
        }
        if let (Some(reflector), Some(settings)) = (self.reflector.as_mut(), &state.reflector) {
            reflector.apply_settings(settings)?;
        }
        self.entry_wheel.apply_settings(&state.entry_wheel)?;
        self.plugboard = plugboard;
        debug!(rotors = state.rotors.len(), cables = state.plugboard.len(), "restore state");
        Ok(())
    }

    // ──────── Helpers ────────

    fn stepping_order(&self) -> impl Iterator<Item = &Wheel> {
        std::iter::once(&*self.entry_wheel)
            .chain(self.rotors.iter().rev().map(|rotor| &**rotor))
            .chain(self.reflector.as_deref())
    }

    fn key_wheels(&self, scope: KeyScope) -> Result<Vec<&Wheel>> {
        let mut wheels = Vec::with_capacity(self.rotors.len() + 2);
        if scope.reflector {
            wheels.push(
                self.reflector
                    .as_deref()
                    .ok_or(EnigmaError::NoReflectorLoaded)?,
            );
        }
        wheels.extend(self.rotors.iter().map(|rotor| &**rotor));
        if scope.entry_wheel {
            wheels.push(&*self.entry_wheel);
        }
        Ok(wheels)
    }

    fn is_loaded(&self, id: WheelId) -> bool {
        self.index_of(id).is_some()
            || self.entry_wheel.id() == id
            || self.reflector.as_ref().is_some_and(|r| r.id() == id)
    }

    fn check_compatible(&self, wheel: &Wheel) -> Result<()> {
        if wheel.len() == self.length {
            Ok(())
        } else {
            Err(EnigmaError::IncompatibleLength {
                expected: self.length,
                actual: wheel.len(),
            })
        }
    }

    fn check_ready(&self) -> Result<()> {
        if self.rotors.is_empty() {
            return Err(EnigmaError::NoRotorLoaded);
        }
        if self.reflector.is_none() {
            return Err(EnigmaError::NoReflectorLoaded);
        }
        Ok(())
    }

    #[inline]
    fn check_symbol(&self, x: usize) -> Result<()> {
        if x < self.length {
            Ok(())
        } else {
            Err(EnigmaError::OutOfRange {
                value: x,
                length: self.length,
            })
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => f.write_str(description),
            None => write!(
                f,
                "machine ({} contacts, {} rotor(s))",
                self.length,
                self.rotors.len()
            ),
        }
    }
}

impl Drop for Machine {
    /// Clears the key material (positions, ring offsets, plugboard) on drop.
    fn drop(&mut self) {
        for rotor in self.rotors.iter_mut() {
            rotor.clear_key();
        }
        if let Some(reflector) = self.reflector.as_mut() {
            reflector.clear_key();
        }
        self.entry_wheel.clear_key();
        self.plugboard.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::Rotation;

    /// Rotor over 6 contacts with a single notch.
    fn rotor(wire: [usize; 6], notch: usize) -> Rotor {
        Rotor::new(wire).unwrap().with_turnovers([notch]).unwrap()
    }

    fn small_machine() -> Machine {
        let mut machine = Machine::new(6).unwrap();
        machine.load(rotor([2, 4, 1, 5, 0, 3], 5)).unwrap();
        machine.load(rotor([1, 3, 5, 0, 2, 4], 5)).unwrap();
        machine.load(rotor([4, 0, 3, 1, 5, 2], 5)).unwrap();
        machine
            .set_reflector(Reflector::new([3, 4, 5, 0, 1, 2]).unwrap())
            .unwrap();
        machine
    }

    fn positions(machine: &Machine) -> Vec<usize> {
        machine.key(KeyScope::positions()).unwrap()
    }

    #[test]
    fn test_new_machine() {
        let machine = Machine::new(26).unwrap();
        assert_eq!(machine.len(), 26);
        assert_eq!(machine.rotor_count(), 0);
        assert!(machine.reflector().is_none());
        assert_eq!(machine.entry_wheel().rotation(), Rotation::Fixed);
        assert_eq!(
            Machine::new(1).map(|m| m.len()),
            Err(EnigmaError::TooFewContacts { length: 1 })
        );
    }

    #[test]
    fn test_encode_requires_rotor_and_reflector() {
        let mut machine = Machine::new(6).unwrap();
        assert_eq!(machine.encode(0), Err(EnigmaError::NoRotorLoaded));
        machine.load(rotor([2, 4, 1, 5, 0, 3], 5)).unwrap();
        assert_eq!(machine.encode(0), Err(EnigmaError::NoReflectorLoaded));
        assert_eq!(positions(&machine), vec![0]);
    }

    #[test]
    fn test_out_of_range_symbol_does_not_step() {
        let mut machine = small_machine();
        assert_eq!(
            machine.encode(6),
            Err(EnigmaError::OutOfRange { value: 6, length: 6 })
        );
        assert_eq!(positions(&machine), vec![0, 0, 0]);
    }

    #[test]
    fn test_load_incompatible_length() {
        let mut machine = Machine::new(6).unwrap();
        let wrong = Rotor::new(vec![1, 0, 2]).unwrap();
        assert_eq!(
            machine.load(wrong),
            Err(EnigmaError::IncompatibleLength {
                expected: 6,
                actual: 3
            })
        );
    }

    #[test]
    fn test_load_same_wheel_twice() {
        let mut machine = Machine::new(6).unwrap();
        let r = rotor([2, 4, 1, 5, 0, 3], 5);
        let same = r.clone();
        let id = r.id();
        machine.load(r).unwrap();
        assert_eq!(machine.load(same), Err(EnigmaError::DuplicateRotor { id }));
        // An independent copy is another wheel.
        let copy = machine.rotors()[0].duplicate();
        machine.load(copy).unwrap();
        assert_eq!(machine.rotor_count(), 2);
    }

    #[test]
    fn test_resolve_negative_index() {
        let machine = small_machine();
        assert_eq!(machine.resolve(RotorRef::Index(-1)), Ok(2));
        assert_eq!(machine.resolve(RotorRef::Index(-3)), Ok(0));
        assert_eq!(
            machine.resolve(RotorRef::Index(-4)),
            Err(EnigmaError::IndexOutOfRange { index: -4, len: 3 })
        );
        assert_eq!(
            machine.resolve(RotorRef::Index(3)),
            Err(EnigmaError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_remove_and_swap() {
        let mut machine = small_machine();
        let ids: Vec<WheelId> = machine.rotors().iter().map(|r| r.id()).collect();

        machine.swap_positions(0isize, -1isize).unwrap();
        assert_eq!(machine.index_of(ids[0]), Some(2));
        assert_eq!(machine.index_of(ids[2]), Some(0));

        let removed = machine.remove(ids[1]).unwrap();
        assert_eq!(removed.id(), ids[1]);
        assert_eq!(machine.rotor_count(), 2);
        assert_eq!(
            machine.remove(ids[1]).map(|r| r.id()),
            Err(EnigmaError::IndexOutOfRange { index: -1, len: 2 })
        );
    }

    #[test]
    fn test_get_by_selector() {
        let mut machine = small_machine();
        assert_eq!(machine.get(Selector::EntryWheel).unwrap().len(), 6);
        assert_eq!(
            machine.get(Selector::Reflector).unwrap().rotation(),
            Rotation::Fixed
        );
        machine.get_mut(-1isize).unwrap().set_position(4);
        assert_eq!(positions(&machine), vec![0, 0, 4]);

        machine.take_reflector();
        assert_eq!(
            machine.get(Selector::Reflector).map(|w| w.len()),
            Err(EnigmaError::NoReflectorLoaded)
        );
    }

    #[test]
    fn test_first_moving_wheel_always_steps() {
        let mut machine = small_machine();
        machine.turn();
        assert_eq!(positions(&machine), vec![0, 0, 1]);
    }

    #[test]
    fn test_carry_and_double_step() {
        let mut machine = small_machine();
        machine.set_key(KeyScope::positions(), &[0, 4, 5]).unwrap();
        // Last rotor leaves its notch, middle steps onto its own notch.
        machine.turn();
        assert_eq!(positions(&machine), vec![0, 5, 0]);
        // Middle is on its notch: it steps again and carries into the first.
        machine.turn();
        assert_eq!(positions(&machine), vec![1, 0, 1]);
        machine.turn();
        assert_eq!(positions(&machine), vec![1, 0, 2]);
    }

    #[test]
    fn test_fixed_rotor_passes_carry_through() {
        let mut machine = small_machine();
        machine.get_mut(1isize).unwrap().set_rotation(Rotation::Fixed);
        machine.set_key(KeyScope::positions(), &[0, 3, 5]).unwrap();
        // The fixed middle rotor is skipped entirely: the carry goes to rotor 0.
        machine.turn();
        assert_eq!(positions(&machine), vec![1, 3, 0]);
    }

    #[test]
    fn test_stepping_entry_wheel_drives_cascade() {
        let mut machine = small_machine();
        machine.entry_wheel.set_rotation(Rotation::Forward);
        machine.turn();
        // The entry wheel has no notch, so the cascade stops after it.
        assert_eq!(machine.entry_wheel().position(), 1);
        assert_eq!(positions(&machine), vec![0, 0, 0]);
    }

    #[test]
    fn test_moving_and_stationary_wheels() {
        let machine = small_machine();
        assert_eq!(machine.moving_wheels().len(), 3);
        assert_eq!(machine.stationary_wheels().len(), 2);
        assert_eq!(
            machine.moving_wheels()[0].id(),
            machine.rotors()[2].id()
        );
    }

    #[test]
    fn test_self_inverse_roundtrip() {
        let mut machine = small_machine();
        machine.plug(0, 5).unwrap();
        let start = machine.state();
        let plain = [0, 1, 2, 3, 4, 5, 5, 4, 3, 2, 1, 0];
        let cipher = machine.encode_sequence(&plain, false).unwrap();
        machine.restore(&start).unwrap();
        let back = machine.encode_sequence(&cipher, false).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn test_never_encodes_to_itself_with_involutive_reflector() {
        let mut machine = small_machine();
        for _ in 0..50 {
            for x in 0..6 {
                assert_ne!(machine.read_value(x, false).unwrap(), x);
            }
            machine.turn();
        }
    }

    #[test]
    fn test_rotor_reflector_needs_decode_flag() {
        let mut machine = Machine::new(6).unwrap();
        machine.load(rotor([2, 4, 1, 5, 0, 3], 5)).unwrap();
        let stand_in = Rotor::new([1, 2, 3, 4, 5, 0]).unwrap();
        let mut stand_in = Reflector::from_rotor(stand_in);
        stand_in.set_rotation(Rotation::Fixed);
        machine.set_reflector(stand_in).unwrap();

        let start = machine.state();
        let cipher = machine.encode_sequence(&[0, 1, 2, 3], false).unwrap();
        machine.restore(&start).unwrap();
        let back = machine.encode_sequence(&cipher, true).unwrap();
        assert_eq!(back, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_encode_sequence_validates_first() {
        let mut machine = small_machine();
        assert!(machine.encode_sequence(&[0, 1, 9], false).is_err());
        assert_eq!(positions(&machine), vec![0, 0, 0]);
    }

    #[test]
    fn test_read_value_does_not_step() {
        let machine = small_machine();
        let a = machine.read_value(2, false).unwrap();
        let b = machine.read_value(2, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(positions(&machine), vec![0, 0, 0]);
    }

    #[test]
    fn test_key_scope_ordering() {
        let mut machine = small_machine();
        machine
            .set_key(KeyScope::positions().with_reflector().with_entry_wheel(), &[1, 2, 3, 4, 5])
            .unwrap();
        assert_eq!(machine.reflector().unwrap().position(), 1);
        assert_eq!(positions(&machine), vec![2, 3, 4]);
        assert_eq!(machine.entry_wheel().position(), 5);
        assert_eq!(
            machine
                .key(KeyScope::positions().with_reflector().with_entry_wheel())
                .unwrap(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_set_key_errors_leave_machine_untouched() {
        let mut machine = small_machine();
        assert_eq!(
            machine.set_key(KeyScope::positions(), &[1, 2]),
            Err(EnigmaError::KeyLengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            machine.set_key(KeyScope::ring_offsets(), &[1, 2, 6]),
            Err(EnigmaError::OutOfRange { value: 6, length: 6 })
        );
        assert_eq!(machine.key(KeyScope::ring_offsets()).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_restore_validates_everything_first() {
        let mut machine = small_machine();
        let mut state = machine.state();
        state.rotors[0].position = 3;
        state.plugboard = vec![(0, 1), (1, 2)];
        assert!(machine.restore(&state).is_err());
        assert_eq!(positions(&machine), vec![0, 0, 0]);

        state.plugboard = vec![(0, 1)];
        machine.restore(&state).unwrap();
        assert_eq!(positions(&machine), vec![3, 0, 0]);
        assert!(machine.is_plugged(1));
    }

    #[test]
    fn test_restore_rotor_count_mismatch() {
        let mut machine = small_machine();
        let mut state = machine.state();
        state.rotors.pop();
        assert_eq!(
            machine.restore(&state),
            Err(EnigmaError::KeyLengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_movable_reflector_steps_last() {
        let mut machine = small_machine();
        let turning = Reflector::from_rotor(Rotor::new([3, 4, 5, 0, 1, 2]).unwrap());
        assert_eq!(turning.rotation(), Rotation::Forward);
        let reflector_id = turning.id();
        machine.set_reflector(turning).unwrap();
        assert_eq!(machine.moving_wheels().last().unwrap().id(), reflector_id);

        // First rotor moves without carrying: the reflector stays put.
        machine.set_key(KeyScope::positions(), &[0, 5, 5]).unwrap();
        machine.turn();
        assert_eq!(positions(&machine), vec![1, 0, 0]);
        assert_eq!(machine.reflector().unwrap().position(), 0);

        // A carry out of the first rotor reaches the reflector.
        machine.set_key(KeyScope::positions(), &[5, 5, 5]).unwrap();
        machine.turn();
        assert_eq!(positions(&machine), vec![0, 0, 0]);
        assert_eq!(machine.reflector().unwrap().position(), 1);

        // No carry at all: only the last rotor moves.
        machine.turn();
        assert_eq!(positions(&machine), vec![0, 0, 1]);
        assert_eq!(machine.reflector().unwrap().position(), 1);
    }

    #[test]
    fn test_same_wheel_refused_in_every_slot() {
        let mut machine = small_machine();
        let loaded = machine.rotors()[0].clone();
        let id = loaded.id();

        assert_eq!(
            machine.set_entry_wheel(Some(EntryWheel::from_rotor(loaded.clone()))),
            Err(EnigmaError::DuplicateRotor { id })
        );
        assert_eq!(
            machine
                .set_reflector(Reflector::from_rotor(loaded))
                .map(|_| ()),
            Err(EnigmaError::DuplicateRotor { id })
        );

        let reflector = machine.reflector().unwrap().clone();
        let reflector_id = reflector.id();
        assert_eq!(
            machine.set_entry_wheel(Some(EntryWheel::from_rotor(Rotor::from(reflector.into_wheel())))),
            Err(EnigmaError::DuplicateRotor { id: reflector_id })
        );
        assert_eq!(machine.entry_wheel().forward_reading(0), 0);
    }

    #[test]
    fn test_set_entry_wheel_none_restores_identity() {
        let mut machine = small_machine();
        machine
            .set_entry_wheel(Some(EntryWheel::new([1, 0, 3, 2, 5, 4]).unwrap()))
            .unwrap();
        assert_eq!(machine.entry_wheel().forward_reading(0), 1);
        machine.set_entry_wheel(None).unwrap();
        assert_eq!(machine.entry_wheel().forward_reading(0), 0);
        assert!(machine
            .set_entry_wheel(Some(EntryWheel::new([1, 0]).unwrap()))
            .is_err());
    }

    #[test]
    fn test_display() {
        let machine = small_machine();
        assert_eq!(machine.to_string(), "machine (6 contacts, 3 rotor(s))");
        let machine = machine.with_description("six");
        assert_eq!(machine.to_string(), "six");
    }
}
