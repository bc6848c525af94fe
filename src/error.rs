//! Error types for the enigma-engine library.
//!
//! Every failure is a deterministic validation error raised before any state
//! is mutated. Nothing here is transient: callers fix the input and retry.

use thiserror::Error;

use crate::wheel::WheelId;

/// Errors produced by the enigma-engine library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Wire keys are not exactly `0..n`.
    #[error("wire keys must be a range 0..n: missing {missing:?}, unexpected {unexpected:?}")]
    MalformedPermutation {
        missing: Vec<usize>,
        unexpected: Vec<usize>,
    },

    /// Wire values are not exactly the key set (the mapping is not a bijection).
    #[error("wire values must match its keys: missing {missing:?}, unexpected {unexpected:?}")]
    AsymmetricPermutation {
        missing: Vec<usize>,
        unexpected: Vec<usize>,
    },

    /// A reflector wire where `wire[wire[k]] != k`.
    #[error("reflector wire is not symmetric: {key} -> {value} but {value} -> {image}")]
    NonInvolutivePermutation {
        key: usize,
        value: usize,
        image: usize,
    },

    /// A wire, alphabet or machine with fewer than two contacts.
    #[error("at least two contacts are required, got {length}")]
    TooFewContacts { length: usize },

    /// A component whose length differs from the machine length.
    #[error("incompatible wheel: length {actual} != machine length {expected}")]
    IncompatibleLength { expected: usize, actual: usize },

    /// The same wheel instance is already loaded.
    #[error("wheel {id} is already loaded")]
    DuplicateRotor { id: WheelId },

    /// A rotor index or reference that does not resolve to a loaded rotor.
    ///
    /// An identity that is not loaded is reported with `index: -1`.
    #[error("rotor index {index} out of range for {len} loaded rotor(s)")]
    IndexOutOfRange { index: isize, len: usize },

    /// Encoding requested with an empty rotor stack.
    #[error("no rotor loaded: load at least one rotor")]
    NoRotorLoaded,

    /// Encoding (or reflector lookup) requested without a reflector.
    #[error("no reflector loaded")]
    NoReflectorLoaded,

    /// A plugboard contact that already has a different partner.
    #[error("{value} is already connected to {partner}")]
    AlreadyConnected { value: usize, partner: usize },

    /// A symbol, position or offset outside `[0, length)`.
    #[error("value {value} out of range 0..{length}")]
    OutOfRange { value: usize, length: usize },

    /// A selector name that names no machine component.
    #[error("unknown selector {0:?}: expected an index, \"reflector\" or \"entry_wheel\"")]
    UnknownSelector(String),

    /// A rotation name that is not one of the supported modes.
    #[error("unknown rotation {0:?}: expected forward, reverse or fixed")]
    InvalidRotation(String),

    /// Fewer key values than components to configure.
    #[error("not enough key values: expected {expected}, got {actual}")]
    KeyLengthMismatch { expected: usize, actual: usize },

    /// A symbol that appears twice in an alphabet or wiring.
    #[error("symbol {0:?} is repeated")]
    RepeatedSymbol(char),

    /// A symbol that is not part of the alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    UnknownSymbol(char),

    /// A wiring whose length differs from its alphabet.
    #[error("wiring has {actual} symbols, alphabet has {expected}")]
    AlphabetLengthMismatch { expected: usize, actual: usize },

    /// A catalog lookup for a component the model does not have.
    #[error("unknown component {0:?}")]
    UnknownComponent(String),

    /// Settings (de)serialization failure.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with our error type.
pub type Result<T> = std::result::Result<T, EnigmaError>;

impl From<serde_json::Error> for EnigmaError {
    fn from(err: serde_json::Error) -> Self {
        EnigmaError::Config(err.to_string())
    }
}
