//! Wire: the validated permutation at the heart of every wheel.
//!
//! A wire maps each contact `k` in `0..n` to a contact `wire[k]` in `0..n`.
//! Validation guarantees a bijection, so the reverse table always exists and
//! a wheel can be read in both directions.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EnigmaError, Result};

/// Raw, unvalidated wiring as supplied by a caller or a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawWire {
    /// Ordered sequence, interpreted as `{i: seq[i]}`.
    Sequence(Vec<usize>),
    /// Explicit key -> value mapping.
    Mapping(BTreeMap<usize, usize>),
}

impl From<Vec<usize>> for RawWire {
    fn from(seq: Vec<usize>) -> Self {
        RawWire::Sequence(seq)
    }
}

impl From<&[usize]> for RawWire {
    fn from(seq: &[usize]) -> Self {
        RawWire::Sequence(seq.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for RawWire {
    fn from(seq: [usize; N]) -> Self {
        RawWire::Sequence(seq.to_vec())
    }
}

impl From<BTreeMap<usize, usize>> for RawWire {
    fn from(map: BTreeMap<usize, usize>) -> Self {
        RawWire::Mapping(map)
    }
}

/// A validated bijection over `0..n` with its precomputed inverse.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wire {
    forward: Vec<usize>,
    reverse: Vec<usize>,
}

impl Wire {
    /// Validates a raw wiring and builds the forward and reverse tables.
    ///
    /// # Errors
    /// - [`EnigmaError::TooFewContacts`] if fewer than two keys are given.
    /// - [`EnigmaError::MalformedPermutation`] if the keys are not exactly `0..n`.
    /// - [`EnigmaError::AsymmetricPermutation`] if the values are not exactly `0..n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::Wire;
    ///
    /// let wire = Wire::validate(vec![1, 2, 0]).unwrap();
    /// assert_eq!(wire.forward(0), 1);
    /// assert_eq!(wire.backward(1), 0);
    ///
    /// assert!(Wire::validate(vec![0, 0, 1]).is_err());
    /// ```
    pub fn validate(raw: impl Into<RawWire>) -> Result<Self> {
        let map: BTreeMap<usize, usize> = match raw.into() {
            RawWire::Sequence(seq) => seq.into_iter().enumerate().collect(),
            RawWire::Mapping(map) => map,
        };

        let length = map.len();
        if length < 2 {
            return Err(EnigmaError::TooFewContacts { length });
        }

        let keys: BTreeSet<usize> = map.keys().copied().collect();
        let (missing, unexpected) = range_difference(&keys, length);
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(EnigmaError::MalformedPermutation {
                missing,
                unexpected,
            });
        }

        let values: BTreeSet<usize> = map.values().copied().collect();
        let (missing, unexpected) = range_difference(&values, length);
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(EnigmaError::AsymmetricPermutation {
                missing,
                unexpected,
            });
        }

        // Keys are exactly 0..n, so BTreeMap order is index order.
        let forward: Vec<usize> = map.into_values().collect();
        let mut reverse = vec![0usize; length];
        for (key, &value) in forward.iter().enumerate() {
            reverse[value] = key;
        }
        Ok(Wire { forward, reverse })
    }

    /// The identity wiring over `0..length`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::TooFewContacts`] if `length < 2`.
    pub fn identity(length: usize) -> Result<Self> {
        Self::validate((0..length).collect::<Vec<_>>())
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True only for a wire without contacts; [`Wire::validate`] rejects
    /// fewer than two.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Contact reached from `key` in the keyboard-to-reflector direction.
    ///
    /// # Panics
    /// Panics if `key >= self.len()`.
    #[inline]
    pub fn forward(&self, key: usize) -> usize {
        self.forward[key]
    }

    /// Contact reached from `value` in the reflector-to-lamp direction.
    ///
    /// # Panics
    /// Panics if `value >= self.len()`.
    #[inline]
    pub fn backward(&self, value: usize) -> usize {
        self.reverse[value]
    }

    /// The forward table, `table[k] == wire[k]`.
    pub fn as_slice(&self) -> &[usize] {
        &self.forward
    }

    /// The reverse table.
    pub fn reverse_slice(&self) -> &[usize] {
        &self.reverse
    }

    /// Checks `wire[wire[k]] == k` for every contact.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NonInvolutivePermutation`] naming the first
    /// offending contact.
    pub fn check_involution(&self) -> Result<()> {
        for (key, &value) in self.forward.iter().enumerate() {
            let image = self.forward[value];
            if image != key {
                return Err(EnigmaError::NonInvolutivePermutation { key, value, image });
            }
        }
        Ok(())
    }

    /// True when the wire is its own inverse.
    pub fn is_involution(&self) -> bool {
        self.check_involution().is_ok()
    }
}

/// Returns `(missing, unexpected)` of `set` relative to `0..length`.
fn range_difference(set: &BTreeSet<usize>, length: usize) -> (Vec<usize>, Vec<usize>) {
    let missing = (0..length).filter(|k| !set.contains(k)).collect();
    let unexpected = set.iter().copied().filter(|&k| k >= length).collect();
    (missing, unexpected)
}
