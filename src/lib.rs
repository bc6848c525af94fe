//! Rotor cipher engine emulating the Enigma family of machines.
//!
//! The core works on plain integers `0..n`: every wheel is a permutation of
//! that range, and a machine turns one integer into another while stepping
//! its wheels. Letters, alphabets and the historical wheel tables live in
//! the optional [`utils::alphabet`] and [`historical`] layers.
//!
//! # Architecture
//!
//! ```text
//! Wire       (validated bijection over 0..n, forward + reverse tables)
//!     ↕ wrapped by
//! Wheel      (position, ring offset, turnover notches, rotation mode)
//!     ↕ specialized as
//! Rotor / Reflector (involution) / EntryWheel (fixed)
//!     ↕ composed with a Plugboard
//! Machine    (stepping cascade + signal path per symbol)
//! ```
//!
//! # Examples
//!
//! Build a machine from integer wirings:
//!
//! ```
//! use enigma_engine::{Machine, Reflector, Rotor};
//!
//! let mut machine = Machine::new(6).unwrap();
//! machine.load(Rotor::new(vec![2, 4, 1, 5, 0, 3]).unwrap()).unwrap();
//! machine.load(Rotor::new(vec![1, 3, 5, 0, 2, 4]).unwrap()).unwrap();
//! machine.set_reflector(Reflector::new(vec![3, 4, 5, 0, 1, 2]).unwrap()).unwrap();
//! machine.plug(0, 5).unwrap();
//!
//! let start = machine.state();
//! let cipher = machine.encode_sequence(&[0, 1, 2, 3], false).unwrap();
//!
//! machine.restore(&start).unwrap();
//! assert_eq!(machine.encode_sequence(&cipher, false).unwrap(), vec![0, 1, 2, 3]);
//! ```
//!
//! Use the historical tables:
//!
//! ```
//! use enigma_engine::historical::ENIGMA_I;
//! use enigma_engine::KeyScope;
//!
//! let mut machine = ENIGMA_I.machine(&["I", "II", "III"], "UKW-B").unwrap();
//! let alphabet = ENIGMA_I.alphabet().unwrap();
//!
//! assert_eq!(
//!     alphabet.encode_text(&mut machine, "HELLOWORLD").unwrap(),
//!     "ILBDAAMTAZ"
//! );
//! assert_eq!(machine.key(KeyScope::positions()).unwrap(), vec![0, 0, 10]);
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod historical;
pub mod utils;

mod entry_wheel;
mod machine;
mod plugboard;
mod reflector;
mod rotor;
mod selector;
mod wheel;
mod wire;

pub use config::{MachineState, WheelSettings, WheelSpec};
pub use entry_wheel::EntryWheel;
pub use error::{EnigmaError, Result};
pub use machine::{KeyScope, KeySetting, Machine};
pub use plugboard::Plugboard;
pub use reflector::Reflector;
pub use rotor::Rotor;
pub use selector::{RotorRef, Selector};
pub use utils::alphabet::Alphabet;
pub use wheel::{Rotation, Wheel, WheelId};
pub use wire::{RawWire, Wire};
