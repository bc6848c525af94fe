//! Plugboard (Steckerbrett): a partial involution applied before and after
//! the rotor stack.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{EnigmaError, Result};

/// Symmetric swap table over `0..length`, at most one partner per contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugboard {
    length: usize,
    pairs: BTreeMap<usize, usize>,
}

impl Plugboard {
    /// An empty plugboard for `length` contacts.
    pub fn new(length: usize) -> Self {
        Plugboard {
            length,
            pairs: BTreeMap::new(),
        }
    }

    /// Number of contacts on the board.
    pub fn contacts(&self) -> usize {
        self.length
    }

    /// True when no cable is plugged.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of cables plugged.
    pub fn cable_count(&self) -> usize {
        self.pairs.len() / 2
    }

    /// Connects `a` and `b`.
    ///
    /// Re-connecting an existing pair is a no-op. Connecting a contact to
    /// itself is accepted and leaves the board unchanged.
    ///
    /// # Errors
    /// - [`EnigmaError::OutOfRange`] if either contact is outside `0..contacts`.
    /// - [`EnigmaError::AlreadyConnected`] if `a` or `b` has another partner.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::Plugboard;
    ///
    /// let mut board = Plugboard::new(26);
    /// board.connect(0, 1).unwrap();
    /// assert_eq!(board.swap(0), 1);
    /// assert_eq!(board.swap(1), 0);
    /// assert!(board.connect(1, 2).is_err());
    /// ```
    pub fn connect(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_range(a)?;
        self.check_range(b)?;

        if let Some(&partner) = self.pairs.get(&a) {
            if partner == b {
                return Ok(());
            }
            return Err(EnigmaError::AlreadyConnected { value: a, partner });
        }
        if let Some(&partner) = self.pairs.get(&b) {
            return Err(EnigmaError::AlreadyConnected { value: b, partner });
        }
        if a == b {
            return Ok(());
        }

        self.pairs.insert(a, b);
        self.pairs.insert(b, a);
        debug!(a, b, "plugboard connect");
        Ok(())
    }

    /// Removes the cable plugged into `a`, if any.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] if `a` is outside `0..contacts`.
    pub fn disconnect(&mut self, a: usize) -> Result<()> {
        self.check_range(a)?;
        if let Some(b) = self.pairs.remove(&a) {
            self.pairs.remove(&b);
            debug!(a, b, "plugboard disconnect");
        }
        Ok(())
    }

    /// Removes every cable.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Partner of `x`, or `x` itself when unplugged.
    #[inline]
    pub fn swap(&self, x: usize) -> usize {
        self.pairs.get(&x).copied().unwrap_or(x)
    }

    pub fn partner(&self, x: usize) -> Option<usize> {
        self.pairs.get(&x).copied()
    }

    pub fn is_connected(&self, x: usize) -> bool {
        self.pairs.contains_key(&x)
    }

    /// Each cable once, smaller contact first.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.pairs
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(&a, &b)| (a, b))
            .collect()
    }

    fn check_range(&self, value: usize) -> Result<()> {
        if value < self.length {
            Ok(())
        } else {
            Err(EnigmaError::OutOfRange {
                value,
                length: self.length,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_identity() {
        let board = Plugboard::new(26);
        assert!(board.is_empty());
        for x in 0..26 {
            assert_eq!(board.swap(x), x);
        }
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut board = Plugboard::new(26);
        board.connect(3, 7).unwrap();
        assert_eq!(board.partner(3), Some(7));
        assert_eq!(board.partner(7), Some(3));
        assert_eq!(board.cable_count(), 1);
        assert_eq!(board.pairs(), vec![(3, 7)]);
    }

    #[test]
    fn test_reconnect_same_pair_is_noop() {
        let mut board = Plugboard::new(26);
        board.connect(3, 7).unwrap();
        board.connect(3, 7).unwrap();
        board.connect(7, 3).unwrap();
        assert_eq!(board.cable_count(), 1);
    }

    #[test]
    fn test_conflict_leaves_board_unchanged() {
        let mut board = Plugboard::new(26);
        board.connect(0, 1).unwrap();
        let before = board.clone();
        assert_eq!(
            board.connect(2, 1),
            Err(EnigmaError::AlreadyConnected {
                value: 1,
                partner: 0
            })
        );
        assert_eq!(
            board.connect(0, 5),
            Err(EnigmaError::AlreadyConnected {
                value: 0,
                partner: 1
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_range() {
        let mut board = Plugboard::new(26);
        assert_eq!(
            board.connect(0, 26),
            Err(EnigmaError::OutOfRange {
                value: 26,
                length: 26
            })
        );
        assert!(board.is_empty());
    }

    #[test]
    fn test_disconnect() {
        let mut board = Plugboard::new(26);
        board.connect(4, 9).unwrap();
        board.disconnect(9).unwrap();
        assert!(!board.is_connected(4));
        assert!(!board.is_connected(9));
        // Unconnected contact: no-op.
        board.disconnect(12).unwrap();
    }

    #[test]
    fn test_swap_is_involution() {
        let mut board = Plugboard::new(10);
        board.connect(0, 9).unwrap();
        board.connect(2, 5).unwrap();
        for x in 0..10 {
            assert_eq!(board.swap(board.swap(x)), x);
        }
    }
}
