//! Symbol-to-index translation layer.
//!
//! The machine works on integers `0..n`. An [`Alphabet`] fixes which symbol
//! stands for which integer, and turns wiring strings such as
//! `"EKMFLGDQVZNTOWYHXUSPAIBRCJ"` into validated [`Wire`]s.

use std::collections::HashMap;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::wire::Wire;

/// The 26 letters of the Latin alphabet.
pub const LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of distinct symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from its symbols, in index order.
    ///
    /// # Errors
    /// - [`EnigmaError::TooFewContacts`] for fewer than two symbols.
    /// - [`EnigmaError::RepeatedSymbol`] for the first repeated symbol.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(EnigmaError::TooFewContacts {
                length: symbols.len(),
            });
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(EnigmaError::RepeatedSymbol(c));
            }
        }
        Ok(Alphabet { symbols, index })
    }

    /// The `A..Z` alphabet.
    pub fn latin() -> Self {
        let symbols: Vec<char> = LATIN.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True only for an alphabet without symbols; [`Alphabet::new`] rejects
    /// fewer than two.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::UnknownSymbol`] if `symbol` is not in the alphabet.
    pub fn index_of(&self, symbol: char) -> Result<usize> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::UnknownSymbol(symbol))
    }

    /// Symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] if `index >= len`.
    pub fn symbol_at(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                value: index,
                length: self.symbols.len(),
            })
    }

    /// Translates every symbol of `text` to its index.
    pub fn translate(&self, text: &str) -> Result<Vec<usize>> {
        text.chars().map(|c| self.index_of(c)).collect()
    }

    /// Translates indices back to text.
    pub fn render(&self, indices: &[usize]) -> Result<String> {
        indices.iter().map(|&i| self.symbol_at(i)).collect()
    }

    /// Builds a wire from a wiring string: the `i`-th letter is the contact
    /// that the `i`-th symbol of the alphabet is wired to.
    ///
    /// # Parameters
    /// - `letters`: a permutation of the alphabet.
    ///
    /// # Errors
    /// - [`EnigmaError::AlphabetLengthMismatch`] if the string has the wrong length.
    /// - [`EnigmaError::UnknownSymbol`] for a letter outside the alphabet.
    /// - [`EnigmaError::RepeatedSymbol`] for a letter used twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::utils::alphabet::Alphabet;
    ///
    /// let alphabet = Alphabet::latin();
    /// let wire = alphabet.wire("EKMFLGDQVZNTOWYHXUSPAIBRCJ").unwrap();
    /// assert_eq!(wire.forward(0), 4);
    /// ```
    pub fn wire(&self, letters: &str) -> Result<Wire> {
        let count = letters.chars().count();
        if count != self.len() {
            return Err(EnigmaError::AlphabetLengthMismatch {
                expected: self.len(),
                actual: count,
            });
        }
        let values = self.distinct_indices(letters)?;
        Wire::validate(values)
    }

    /// Parses cable notation such as `"AY BR CU"` into index pairs.
    ///
    /// Whitespace only separates pairs; every symbol may appear once.
    ///
    /// # Errors
    /// - [`EnigmaError::UnknownSymbol`] or [`EnigmaError::RepeatedSymbol`].
    /// - [`EnigmaError::Config`] if a symbol is left without a partner.
    pub fn pairs(&self, text: &str) -> Result<Vec<(usize, usize)>> {
        let letters: String = text.split_whitespace().collect();
        let indices = self.distinct_indices(&letters)?;
        if !indices.len().is_multiple_of(2) {
            let last = letters.chars().last().unwrap_or_default();
            return Err(EnigmaError::Config(format!("unpaired symbol {last:?}")));
        }
        Ok(indices.chunks_exact(2).map(|p| (p[0], p[1])).collect())
    }

    /// Builds an involutive wire from cable notation; unlisted symbols map
    /// to themselves.
    pub fn pair_wire(&self, text: &str) -> Result<Wire> {
        let mut values: Vec<usize> = (0..self.len()).collect();
        for (a, b) in self.pairs(text)? {
            values[a] = b;
            values[b] = a;
        }
        Wire::validate(values)
    }

    /// Indices of `letters`, for use as turnover notches.
    pub fn positions(&self, letters: &str) -> Result<Vec<usize>> {
        self.distinct_indices(letters)
    }

    /// Plugs every cable of `text` (cable notation) into the machine.
    ///
    /// The cables are connected on a copy of the board, which replaces the
    /// machine's board only if every cable fits. On error the machine's
    /// board is unchanged.
    ///
    /// # Errors
    /// Any [`pairs`](Self::pairs) error, [`EnigmaError::OutOfRange`] or
    /// [`EnigmaError::AlreadyConnected`].
    pub fn plug(&self, machine: &mut Machine, text: &str) -> Result<()> {
        let mut board = machine.plugboard().clone();
        for (a, b) in self.pairs(text)? {
            board.connect(a, b)?;
        }
        *machine.plugboard_mut() = board;
        Ok(())
    }

    /// Encodes text symbol by symbol.
    ///
    /// The whole text is translated first, so an unknown symbol leaves the
    /// machine untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::historical::ENIGMA_I;
    ///
    /// let mut machine = ENIGMA_I.machine(&["I", "II", "III"], "UKW-B").unwrap();
    /// let alphabet = ENIGMA_I.alphabet().unwrap();
    /// assert_eq!(alphabet.encode_text(&mut machine, "AAAAA").unwrap(), "BDZGO");
    /// ```
    pub fn encode_text(&self, machine: &mut Machine, text: &str) -> Result<String> {
        let input = self.translate(text)?;
        let output = machine.encode_sequence(&input, false)?;
        self.render(&output)
    }

    /// Decoding counterpart of [`encode_text`](Self::encode_text).
    pub fn decode_text(&self, machine: &mut Machine, text: &str) -> Result<String> {
        let input = self.translate(text)?;
        let output = machine.encode_sequence(&input, true)?;
        self.render(&output)
    }

    fn distinct_indices(&self, letters: &str) -> Result<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        letters
            .chars()
            .map(|c| {
                let i = self.index_of(c)?;
                if std::mem::replace(&mut seen[i], true) {
                    return Err(EnigmaError::RepeatedSymbol(c));
                }
                Ok(i)
            })
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::latin()
    }
}
