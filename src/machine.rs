//! Machine: rotor stack orchestrator.
//!
//! Holds the slot list (reflector leftmost), the pawl count and an optional
//! plugboard. Each symbol first steps the rotors, then travels plugboard →
//! rotors right to left → reflector → rotors left to right → plugboard
//! inverse. Because the reflector is an involutive derangement, the same
//! settings decode what they encode.

use tracing::{debug, trace, warn};

use crate::alphabet::Alphabet;
use crate::error::{Result, RotorError};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorRegistry};

/// A complete rotor cipher machine.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{Alphabet, Machine, RotorRegistry, RotorSpec};
///
/// let alpha = Alphabet::default();
/// let specs = [
///     RotorSpec::parse("I", "MQ", "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)").unwrap(),
///     RotorSpec::parse("II", "ME", "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)").unwrap(),
///     RotorSpec::parse("III", "MV", "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)").unwrap(),
///     RotorSpec::parse(
///         "B",
///         "R",
///         "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
///     )
///     .unwrap(),
/// ];
/// let registry = RotorRegistry::from_specs(&alpha, &specs).unwrap();
///
/// let mut machine = Machine::new(alpha, 4, 3, registry).unwrap();
/// machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
/// machine.set_rotors("AAA").unwrap();
/// assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");
///
/// machine.set_rotors("AAA").unwrap();
/// assert_eq!(machine.convert("BDZGO").unwrap(), "AAAAA");
/// ```
#[derive(Clone, Debug)]
pub struct Machine {
    alphabet: Alphabet,
    num_rotors: usize,
    pawls: usize,
    all_rotors: RotorRegistry,
    slots: Vec<Rotor>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// A machine over `alphabet` with `num_rotors` slots, `pawls` of them
    /// driven, choosing its rotors from `all_rotors`.
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidMachineShape`] unless
    /// `1 < num_rotors` and `pawls < num_rotors`.
    pub fn new(
        alphabet: Alphabet,
        num_rotors: usize,
        pawls: usize,
        all_rotors: RotorRegistry,
    ) -> Result<Self> {
        if num_rotors < 2 || pawls >= num_rotors {
            return Err(RotorError::InvalidMachineShape {
                slots: num_rotors,
                pawls,
            });
        }
        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            all_rotors,
            slots: Vec::with_capacity(num_rotors),
            plugboard: None,
        })
    }

    /// Number of rotor slots, reflector included.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and so of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Alphabet shared by the machine, its rotors and its plugboard.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Rotor currently in `slot`, if rotors have been inserted.
    pub fn rotor(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot)
    }

    /// Installed plugboard; `None` behaves as the identity.
    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// Fills the slots with copies of the rotors named in `names`, leftmost
    /// (the reflector) first. Every rotor starts at setting 0.
    ///
    /// On error the previously inserted rotors stay in place.
    ///
    /// # Errors
    /// - [`RotorError::WrongRotorCount`] if `names` does not cover every slot.
    /// - [`RotorError::UnknownRotor`] if a name is not in the registry.
    /// - [`RotorError::RepeatedRotor`] if a name is used twice.
    /// - [`RotorError::MalformedRotor`] if a rotor is wired over a different
    ///   alphabet than the machine.
    /// - [`RotorError::MisconfiguredReflector`] if slot 0 does not reflect.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            warn!(
                target: "rotorcrypt",
                expected = self.num_rotors,
                actual = names.len(),
                "rotor list does not match slot count"
            );
            return Err(RotorError::WrongRotorCount {
                expected: self.num_rotors,
                actual: names.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        for name in names {
            let name = name.as_ref();
            if slots.iter().any(|r: &Rotor| r.name() == name) {
                return Err(RotorError::RepeatedRotor {
                    name: name.to_string(),
                });
            }
            let mut rotor = self
                .all_rotors
                .get(name)
                .cloned()
                .ok_or_else(|| RotorError::UnknownRotor {
                    name: name.to_string(),
                })?;
            if rotor.alphabet() != &self.alphabet {
                warn!(target: "rotorcrypt", rotor = name, "rotor alphabet differs from machine");
                return Err(RotorError::MalformedRotor {
                    name: name.to_string(),
                    reason: "alphabet differs from machine".to_string(),
                });
            }
            rotor.set(0);
            slots.push(rotor);
        }

        if !slots[0].reflecting() {
            warn!(target: "rotorcrypt", rotor = slots[0].name(), "leftmost rotor is not a reflector");
            return Err(RotorError::MisconfiguredReflector {
                name: slots[0].name().to_string(),
            });
        }

        debug!(
            target: "rotorcrypt",
            rotors = ?slots.iter().map(Rotor::name).collect::<Vec<_>>(),
            "rotors inserted"
        );
        self.slots = slots;
        Ok(())
    }

    /// Sets every non-reflector rotor from `setting`, leftmost first.
    ///
    /// # Errors
    /// - [`RotorError::WrongRotorCount`] if no rotors are inserted.
    /// - [`RotorError::WrongSettingLength`] unless `setting` has
    ///   `num_rotors() - 1` symbols.
    /// - [`RotorError::InvalidSymbol`] if a symbol is not in the alphabet; no
    ///   rotor is changed in that case.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        self.require_rotors()?;
        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(RotorError::WrongSettingLength { expected, actual });
        }

        let positions = setting
            .chars()
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<_>>>()?;
        for (rotor, position) in self.slots[1..].iter_mut().zip(positions) {
            rotor.set(position);
        }
        debug!(target: "rotorcrypt", setting, "rotors set");
        Ok(())
    }

    /// Installs `plugboard`, applied before and (inverted) after the rotors.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedCycle`] if `plugboard` permutes a
    /// different alphabet than the machine; the previous plugboard is kept.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if plugboard.alphabet() != &self.alphabet {
            return Err(RotorError::MalformedCycle {
                reason: "plugboard alphabet differs from machine".to_string(),
            });
        }
        debug!(target: "rotorcrypt", derangement = plugboard.derangement(), "plugboard set");
        self.plugboard = Some(plugboard);
        Ok(())
    }

    /// Removes the plugboard; the machine behaves as if it were the identity.
    pub fn clear_plugboard(&mut self) {
        self.plugboard = None;
    }

    /// Current settings of the non-reflector rotors, leftmost first.
    ///
    /// Empty until rotors are inserted.
    pub fn settings(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .filter_map(|r| self.alphabet.to_symbol(r.setting()).ok())
            .collect()
    }

    /// Steps the rotors, then converts the symbol index `c`.
    ///
    /// # Errors
    /// - [`RotorError::IndexOutOfRange`] if `c` is not a valid index.
    /// - [`RotorError::WrongRotorCount`] if no rotors are inserted.
    /// - [`RotorError::PawlCountMismatch`] if the inserted rotors disagree
    ///   with the pawl count. Nothing is stepped in that case.
    pub fn convert_index(&mut self, c: usize) -> Result<usize> {
        let size = self.alphabet.size();
        if c >= size {
            return Err(RotorError::IndexOutOfRange { index: c, size });
        }
        self.require_rotors()?;
        self.step()?;
        Ok(self.signal(c))
    }

    /// Converts `msg` symbol by symbol, carrying rotor state across it.
    ///
    /// Every symbol is checked against the alphabet before the rotors move.
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidSymbol`] for a symbol outside the
    /// alphabet, or any error of [`convert_index`](Self::convert_index).
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<_>>>()?;

        let mut out = String::with_capacity(msg.len());
        for index in indices {
            let converted = self.convert_index(index)?;
            out.push(self.alphabet.to_symbol(converted)?);
        }
        Ok(out)
    }

    fn require_rotors(&self) -> Result<()> {
        if self.slots.len() != self.num_rotors {
            return Err(RotorError::WrongRotorCount {
                expected: self.num_rotors,
                actual: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Stepping phase.
    ///
    /// Decisions are taken from the notch state before any rotor moves, then
    /// applied together, so one step never cascades into another.
    fn step(&mut self) -> Result<()> {
        let rotating = self.slots.iter().filter(|r| r.rotates()).count();
        if rotating != self.pawls {
            return Err(RotorError::PawlCountMismatch {
                expected: self.pawls,
                actual: rotating,
            });
        }

        let last = self.num_rotors - 1;
        let at_notch: Vec<bool> = self.slots.iter().map(Rotor::at_notch).collect();
        let advances: Vec<bool> = (0..self.num_rotors)
            .map(|i| {
                let rotor = &self.slots[i];
                if i == 0 || !rotor.rotates() {
                    false
                } else if i == last {
                    true
                } else {
                    // Carried by the right neighbour, or double-stepping
                    // on its own notch.
                    at_notch[i + 1] || (at_notch[i] && self.slots[i - 1].rotates())
                }
            })
            .collect();

        for (rotor, advance) in self.slots.iter_mut().zip(advances) {
            if advance {
                rotor.advance();
            }
        }
        trace!(target: "rotorcrypt", settings = %self.settings(), "stepped");
        Ok(())
    }

    /// Signal phase: the dual pass through the rotor stack.
    fn signal(&self, c: usize) -> usize {
        let mut p = match &self.plugboard {
            Some(plugboard) => plugboard.permute(c),
            None => c,
        };
        for rotor in self.slots.iter().rev() {
            p = rotor.convert_forward(p);
        }
        for rotor in &self.slots[1..] {
            p = rotor.convert_backward(p);
        }
        match &self.plugboard {
            Some(plugboard) => plugboard.invert(p),
            None => p,
        }
    }
}
