//! Catalog of historical machine models.
//!
//! Wirings are written in each model's alphabet and go through the same
//! validation as caller input, so a typo in a table surfaces as an error
//! rather than as a silently broken wheel.
//!
//! ```text
//! HistoricalModel ── alphabet() ──► Alphabet
//!                 ├─ rotor(name) ──► Rotor       (turnovers from the notch letters)
//!                 ├─ reflector(name) ─► Reflector (involution checked)
//!                 ├─ entry_wheel() ──► EntryWheel
//!                 └─ machine(rotors, reflector) ─► Machine
//! ```

use crate::entry_wheel::EntryWheel;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::reflector::Reflector;
use crate::rotor::Rotor;
use crate::utils::alphabet::{Alphabet, LATIN};

/// A rotor as listed in the tables: wiring and turnover letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotorData {
    pub name: &'static str,
    pub wiring: &'static str,
    pub turnovers: &'static str,
}

/// A reflector as listed in the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectorData {
    pub name: &'static str,
    pub wiring: &'static str,
}

/// One machine model: alphabet, entry wheel and the wheels it shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalModel {
    pub name: &'static str,
    pub alphabet: &'static str,
    pub entry_wheel: &'static str,
    pub rotors: &'static [RotorData],
    pub reflectors: &'static [ReflectorData],
}

/// Enigma I (Wehrmacht, Luftwaffe).
pub const ENIGMA_I: HistoricalModel = HistoricalModel {
    name: "Enigma I",
    alphabet: LATIN,
    entry_wheel: LATIN,
    rotors: &[
        RotorData {
            name: "I",
            wiring: "EKMFLGDQVZNTOWYHXUSPAIBRCJ",
            turnovers: "Q",
        },
        RotorData {
            name: "II",
            wiring: "AJDKSIRUXBLHWTMCQGZNPYFVOE",
            turnovers: "E",
        },
        RotorData {
            name: "III",
            wiring: "BDFHJLCPRTXVZNYEIWGAKMUSQO",
            turnovers: "V",
        },
        RotorData {
            name: "IV",
            wiring: "ESOVPZJAYQUIRHXLNFTGKDCMWB",
            turnovers: "J",
        },
        RotorData {
            name: "V",
            wiring: "VZBRGITYUPSDNHLXAWMJQOFECK",
            turnovers: "V",
        },
    ],
    reflectors: &[
        ReflectorData {
            name: "UKW-A",
            wiring: "EJMZALYXVBWFCRQUONTSPIKHGD",
        },
        ReflectorData {
            name: "UKW-B",
            wiring: "YRUHQSLDPXNGOKMIEBFZCWVJAT",
        },
        ReflectorData {
            name: "UKW-C",
            wiring: "FVPJIAOYEDRZXWGCTKUQSBNMHL",
        },
    ],
};

/// Swiss K: commercial Enigma K with QWERTZ entry wheel.
pub const SWISS_K: HistoricalModel = HistoricalModel {
    name: "Swiss K",
    alphabet: LATIN,
    entry_wheel: "QWERTZUIOASDFGHJKPYXCVBNML",
    rotors: &[
        RotorData {
            name: "I",
            wiring: "PEZUOHXSCVFMTBGLRINQJWAYDK",
            turnovers: "Y",
        },
        RotorData {
            name: "II",
            wiring: "ZOUESYDKFWPCIQXHMVBLGNJRAT",
            turnovers: "E",
        },
        RotorData {
            name: "III",
            wiring: "EHRVXGAOBQUSIMZFLYNWKTPDJC",
            turnovers: "N",
        },
    ],
    reflectors: &[ReflectorData {
        name: "UKW",
        wiring: "IMETCGFRAYSQBZXWLHKDVUPOJN",
    }],
};

/// Railway Enigma (Reichsbahn).
pub const RAILWAY: HistoricalModel = HistoricalModel {
    name: "Railway",
    alphabet: LATIN,
    entry_wheel: "QWERTZUIOASDFGHJKPYXCVBNML",
    rotors: &[
        RotorData {
            name: "I",
            wiring: "JGDQOXUSCAMIFRVTPNEWKBLZYH",
            turnovers: "N",
        },
        RotorData {
            name: "II",
            wiring: "NTZPSFBOKMWRCJDIVLAEYUXHGQ",
            turnovers: "E",
        },
        RotorData {
            name: "III",
            wiring: "JVIUBHTCDYAKEQZPOSGXNRMWFL",
            turnovers: "Y",
        },
    ],
    reflectors: &[ReflectorData {
        name: "UKW",
        wiring: "QYHOGNECVPUZTFDJAXWMKISRBL",
    }],
};

/// Swedish A-133, a 28-letter machine.
pub const A133: HistoricalModel = HistoricalModel {
    name: "A-133",
    alphabet: "ABCDEFGHIJKLMNOPQRSTUVXYZÅÄÖ",
    entry_wheel: "ABCDEFGHIJKLMNOPQRSTUVXYZÅÄÖ",
    rotors: &[
        RotorData {
            name: "I",
            wiring: "PSBGÖXQJDHOÄUCFRTEZVÅINLYMKA",
            turnovers: "Ä",
        },
        RotorData {
            name: "II",
            wiring: "CHNSYÖADMOTRZXBÄIGÅEKQUPFLVJ",
            turnovers: "Ä",
        },
        RotorData {
            name: "III",
            wiring: "ÅVQIAÄXRJBÖZSPCFYUNTHDOMEKGL",
            turnovers: "Ä",
        },
    ],
    reflectors: &[ReflectorData {
        name: "UKW",
        wiring: "LDGBÄNCPSKJAVFZHXUIÅRMQÖOTEY",
    }],
};

/// Every model in the catalog.
pub const MODELS: &[HistoricalModel] = &[ENIGMA_I, SWISS_K, RAILWAY, A133];

/// Looks a model up by name (case-insensitive).
pub fn model(name: &str) -> Result<&'static HistoricalModel> {
    MODELS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EnigmaError::UnknownComponent(name.to_string()))
}

impl HistoricalModel {
    pub fn alphabet(&self) -> Result<Alphabet> {
        Alphabet::new(self.alphabet)
    }

    pub fn rotor_names(&self) -> impl Iterator<Item = &'static str> {
        self.rotors.iter().map(|r| r.name)
    }

    pub fn reflector_names(&self) -> impl Iterator<Item = &'static str> {
        self.reflectors.iter().map(|r| r.name)
    }

    /// Builds a fresh rotor at position 0 with its historical notches.
    ///
    /// # Errors
    /// [`EnigmaError::UnknownComponent`] if the model has no such rotor.
    pub fn rotor(&self, name: &str) -> Result<Rotor> {
        let data = self
            .rotors
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| self.unknown("rotor", name))?;
        let alphabet = self.alphabet()?;
        Rotor::from_wire(alphabet.wire(data.wiring)?)
            .with_turnovers(alphabet.positions(data.turnovers)?)
            .map(|rotor| rotor.with_description(format!("{} - Rotor {}", self.name, data.name)))
    }

    /// Builds a fresh reflector.
    ///
    /// # Errors
    /// [`EnigmaError::UnknownComponent`] if the model has no such reflector.
    pub fn reflector(&self, name: &str) -> Result<Reflector> {
        let data = self
            .reflectors
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| self.unknown("reflector", name))?;
        let wire = self.alphabet()?.wire(data.wiring)?;
        Ok(Reflector::from_wire(wire)?.with_description(format!("{} - {}", self.name, data.name)))
    }

    pub fn entry_wheel(&self) -> Result<EntryWheel> {
        let wire = self.alphabet()?.wire(self.entry_wheel)?;
        Ok(EntryWheel::from_wire(wire).with_description(format!("{} - ETW", self.name)))
    }

    /// Assembles a machine: entry wheel, the named rotors in load order
    /// (leftmost first) and the named reflector. All positions and ring
    /// offsets start at 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma_engine::historical::ENIGMA_I;
    ///
    /// let machine = ENIGMA_I.machine(&["I", "II", "III"], "UKW-B").unwrap();
    /// assert_eq!(machine.rotor_count(), 3);
    /// assert!(ENIGMA_I.machine(&["VI"], "UKW-B").is_err());
    /// ```
    pub fn machine(&self, rotors: &[&str], reflector: &str) -> Result<Machine> {
        let alphabet = self.alphabet()?;
        let mut machine = Machine::new(alphabet.len())?.with_description(self.name);
        machine.set_entry_wheel(Some(self.entry_wheel()?))?;
        for name in rotors {
            machine.load(self.rotor(name)?)?;
        }
        machine.set_reflector(self.reflector(reflector)?)?;
        Ok(machine)
    }

    fn unknown(&self, kind: &str, name: &str) -> EnigmaError {
        EnigmaError::UnknownComponent(format!("{} {} {}", self.name, kind, name))
    }
}
