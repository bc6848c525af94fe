//! Serializable settings snapshots.
//!
//! [`WheelSettings`] holds everything an operator may change on a wheel,
//! [`WheelSpec`] adds the wiring so a wheel can be rebuilt from scratch, and
//! [`MachineState`] captures a whole loaded machine. All three round-trip
//! through JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::wheel::Rotation;

/// Mutable settings of one wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSettings {
    pub position: usize,
    pub ring_offset: usize,
    /// Sorted turnover positions.
    pub turnovers: Vec<usize>,
    pub rotation: Rotation,
}

/// Full description of a wheel: wiring plus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSpec {
    /// Forward table, `wire[i]` is the contact reached from `i`.
    pub wire: Vec<usize>,
    pub settings: WheelSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WheelSpec {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings of every component of a loaded machine.
///
/// Rotors are listed in load order. Plugboard pairs are stored once each,
/// smaller contact first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub rotors: Vec<WheelSettings>,
    #[serde(default)]
    pub reflector: Option<WheelSettings>,
    pub entry_wheel: WheelSettings,
    #[serde(default)]
    pub plugboard: Vec<(usize, usize)>,
}

impl MachineState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
