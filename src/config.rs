//! Declarative machine descriptions.
//!
//! [`MachineConfig`] describes the alphabet, the slot/pawl shape and the
//! available rotors; [`MessageSettings`] describes one message group. Both
//! derive serde traits so a harness can load them from any serde format.

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{RotorRegistry, RotorSpec};

/// Everything needed to build a [`Machine`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Ordered symbols; the 26 upper-case letters when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    /// Rotor slots, reflector included.
    pub slots: usize,
    /// Driven slots; must equal the number of moving rotors inserted.
    pub pawls: usize,
    /// Every rotor available to message groups.
    pub rotors: Vec<RotorSpec>,
}

impl MachineConfig {
    /// Builds the alphabet described by this config.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedAlphabet`](crate::RotorError::MalformedAlphabet)
    /// for unusable symbol text.
    pub fn alphabet(&self) -> Result<Alphabet> {
        match &self.alphabet {
            Some(symbols) => Alphabet::new(symbols),
            None => Ok(Alphabet::default()),
        }
    }

    /// Builds the rotor registry and the machine.
    ///
    /// # Errors
    /// Any error from alphabet, rotor or machine construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{MachineConfig, RotorSpec};
    ///
    /// let config = MachineConfig {
    ///     alphabet: Some("ABCD".to_string()),
    ///     slots: 2,
    ///     pawls: 1,
    ///     rotors: vec![
    ///         RotorSpec::parse("R", "R", "(AC) (BD)").unwrap(),
    ///         RotorSpec::parse("M", "MA", "(ABCD)").unwrap(),
    ///     ],
    /// };
    /// let machine = config.build().unwrap();
    /// assert_eq!(machine.num_rotors(), 2);
    /// ```
    pub fn build(&self) -> Result<Machine> {
        let alphabet = self.alphabet()?;
        let registry = RotorRegistry::from_specs(&alphabet, &self.rotors)?;
        Machine::new(alphabet, self.slots, self.pawls, registry)
    }
}

/// Settings for one message group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial positions of the non-reflector rotors.
    pub setting: String,
    /// Plugboard in cycle notation; none means no plugboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugboard: Option<String>,
}

impl MessageSettings {
    /// Inserts the rotors, sets them and installs the plugboard, in that
    /// order.
    ///
    /// # Errors
    /// The first error from [`Machine::insert_rotors`],
    /// [`Machine::set_rotors`] or plugboard parsing.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.setting)?;
        match &self.plugboard {
            Some(cycles) => {
                let plugboard = Permutation::new(cycles, machine.alphabet())?;
                machine.set_plugboard(plugboard)?;
            }
            None => machine.clear_plugboard(),
        }
        Ok(())
    }
}
