//! Rotors: permutations with a rotational offset.
//!
//! A [`Rotor`] is one record (name, wiring, offset) tagged with a
//! [`RotorKind`]. Only moving rotors advance or carry notches; the reflector
//! sits in the leftmost slot and turns the signal back through the stack.
//!
//! Rotor descriptions ([`RotorSpec`]) use the classic type tags: `M` followed
//! by the notch symbols, `N` for a fixed rotor and `R` for a reflector.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::{Result, RotorError};
use crate::permutation::Permutation;

/// Capability variant of a rotor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RotorKind {
    /// Driven by a pawl; notches are setting indices.
    Moving { notches: Vec<usize> },
    /// Never advances.
    Fixed,
    /// Never advances; must sit in slot 0.
    Reflector,
}

/// A permuting unit with a mutable offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    setting: usize,
}

impl Rotor {
    /// A moving rotor named `name` with notches at the symbols in `notches`.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedRotor`] if `notches` is empty or names a
    /// symbol outside the rotor's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Alphabet::default();
    /// let wiring = Permutation::new("(ABDHPEJT) (CFLVMZOYQIRWUKXSG)", &alpha).unwrap();
    /// let mut rotor = Rotor::moving("III", wiring, "V").unwrap();
    /// rotor.set_symbol('V').unwrap();
    /// assert!(rotor.at_notch());
    /// rotor.advance();
    /// assert!(!rotor.at_notch());
    /// ```
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self> {
        if notches.is_empty() {
            return Err(RotorError::MalformedRotor {
                name: name.to_string(),
                reason: "moving rotor needs at least one notch".to_string(),
            });
        }
        let mut positions = Vec::with_capacity(notches.len());
        for c in notches.chars() {
            let index = permutation.alphabet().to_index(c).map_err(|_| {
                RotorError::MalformedRotor {
                    name: name.to_string(),
                    reason: format!("notch '{}' is not in the alphabet", c),
                }
            })?;
            if !positions.contains(&index) {
                positions.push(index);
            }
        }
        Ok(Self::with_kind(
            name,
            permutation,
            RotorKind::Moving { notches: positions },
        ))
    }

    /// A rotor that never advances.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self::with_kind(name, permutation, RotorKind::Fixed)
    }

    /// A non-moving reflecting rotor.
    ///
    /// The permutation should be an involutive derangement for the machine to
    /// be reciprocal; that is a configuration requirement and is not checked
    /// here.
    pub fn reflector(name: &str, permutation: Permutation) -> Self {
        Self::with_kind(name, permutation, RotorKind::Reflector)
    }

    fn with_kind(name: &str, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name: name.to_string(),
            permutation,
            kind,
            setting: 0,
        }
    }

    /// Identity used by the registry and in slot lists.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capability variant.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Alphabet of the rotor's wiring.
    pub fn alphabet(&self) -> &Alphabet {
        self.permutation.alphabet()
    }

    /// Wiring at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Size of the rotor's alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True iff the rotor has a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True iff the rotor reflects.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Current offset in `0..size()`.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the offset to `position` modulo `size()`.
    pub fn set(&mut self, position: usize) {
        self.setting = position % self.size();
    }

    /// Sets the offset to the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidSymbol`] if `symbol` is not in the
    /// rotor's alphabet; the setting is left unchanged.
    pub fn set_symbol(&mut self, symbol: char) -> Result<()> {
        self.setting = self.alphabet().to_index(symbol)?;
        Ok(())
    }

    /// True iff the current setting is one of the notch positions.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Steps one position if the rotor moves; no-op otherwise.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Maps contact `p` through the wiring rotated by the current setting.
    pub fn convert_forward(&self, p: usize) -> usize {
        let n = self.size();
        let exiting = self.permutation.permute((self.setting + p) % n);
        (exiting + n - self.setting) % n
    }

    /// Maps contact `e` through the inverse wiring rotated by the current
    /// setting.
    pub fn convert_backward(&self, e: usize) -> usize {
        let n = self.size();
        let exiting = self.permutation.invert((self.setting + e) % n);
        (exiting + n - self.setting) % n
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}

/// Type tag of a rotor description: `M<notches>`, `N` or `R`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RotorType {
    /// `M` followed by the notch symbols.
    Moving(String),
    /// `N`.
    Fixed,
    /// `R`.
    Reflector,
}

impl FromStr for RotorType {
    type Err = String;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = tag.chars();
        let head = chars.next();
        let notches: String = chars.collect();
        match (head, notches.is_empty()) {
            (Some('M'), false) => Ok(RotorType::Moving(notches)),
            (Some('M'), true) => Err("moving rotor needs at least one notch".to_string()),
            (Some('N'), true) => Ok(RotorType::Fixed),
            (Some('R'), true) => Ok(RotorType::Reflector),
            (Some('N'), false) | (Some('R'), false) => {
                Err(format!("non-moving rotor tag '{}' takes no notches", tag))
            }
            _ => Err(format!("unknown rotor type tag '{}'", tag)),
        }
    }
}

impl TryFrom<String> for RotorType {
    type Error = String;

    fn try_from(tag: String) -> std::result::Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<RotorType> for String {
    fn from(kind: RotorType) -> String {
        match kind {
            RotorType::Moving(notches) => format!("M{}", notches),
            RotorType::Fixed => "N".to_string(),
            RotorType::Reflector => "R".to_string(),
        }
    }
}

/// Description of one available rotor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorSpec {
    /// Registry key.
    pub name: String,
    /// Type tag such as `"MQ"`.
    pub kind: RotorType,
    /// Wiring in cycle notation.
    #[serde(default)]
    pub cycles: String,
}

impl RotorSpec {
    /// Parses a tag such as `"MQ"` and builds the description.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedRotor`] if the tag is not understood.
    pub fn parse(name: &str, tag: &str, cycles: &str) -> Result<Self> {
        let kind = tag.parse().map_err(|reason| RotorError::MalformedRotor {
            name: name.to_string(),
            reason,
        })?;
        Ok(RotorSpec {
            name: name.to_string(),
            kind,
            cycles: cycles.to_string(),
        })
    }

    /// Builds the rotor over `alphabet`.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedCycle`] for bad wiring text, or
    /// [`RotorError::MalformedRotor`] for a notch outside the alphabet.
    pub fn build(&self, alphabet: &Alphabet) -> Result<Rotor> {
        let permutation = Permutation::new(&self.cycles, alphabet)?;
        match &self.kind {
            RotorType::Moving(notches) => Rotor::moving(&self.name, permutation, notches),
            RotorType::Fixed => Ok(Rotor::fixed(&self.name, permutation)),
            RotorType::Reflector => Ok(Rotor::reflector(&self.name, permutation)),
        }
    }
}

/// Available rotors keyed by name.
///
/// Machines clone rotors out of the registry, so stepping one machine never
/// disturbs the registry or another machine.
#[derive(Clone, Debug, Default)]
pub struct RotorRegistry {
    rotors: HashMap<String, Rotor>,
}

impl RotorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every rotor in `specs` over `alphabet`.
    ///
    /// # Errors
    /// Returns [`RotorError::DuplicateRotor`] if two specs share a name, or
    /// the first error from [`RotorSpec::build`].
    pub fn from_specs<'a, I>(alphabet: &Alphabet, specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RotorSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.insert(spec.build(alphabet)?)?;
        }
        Ok(registry)
    }

    /// Adds `rotor` under its own name.
    ///
    /// # Errors
    /// Returns [`RotorError::DuplicateRotor`] if the name is taken.
    pub fn insert(&mut self, rotor: Rotor) -> Result<()> {
        if self.rotors.contains_key(rotor.name()) {
            return Err(RotorError::DuplicateRotor {
                name: rotor.name().to_string(),
            });
        }
        self.rotors.insert(rotor.name().to_string(), rotor);
        Ok(())
    }

    /// Rotor registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Rotor> {
        self.rotors.get(name)
    }

    /// Number of registered rotors.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// True iff no rotor is registered.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Rotor names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rotors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTOR_I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)";
    const BETA: &str = "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)";
    const UKW_B: &str = "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";

    fn rotor_i() -> Rotor {
        let perm = Permutation::new(ROTOR_I, &Alphabet::default()).unwrap();
        Rotor::moving("I", perm, "Q").unwrap()
    }

    #[test]
    fn test_capabilities() {
        let alpha = Alphabet::default();
        let moving = rotor_i();
        let fixed = Rotor::fixed("Beta", Permutation::new(BETA, &alpha).unwrap());
        let reflector = Rotor::reflector("B", Permutation::new(UKW_B, &alpha).unwrap());

        assert!(moving.rotates() && !moving.reflecting());
        assert!(!fixed.rotates() && !fixed.reflecting());
        assert!(!reflector.rotates() && reflector.reflecting());
        assert_eq!(moving.size(), 26);
        assert_eq!(moving.name(), "I");
        assert_eq!(format!("{}", reflector), "Rotor B");
    }

    #[test]
    fn test_wraparound() {
        let mut rotor = rotor_i();
        rotor.set_symbol('K').unwrap();
        for _ in 0..26 {
            rotor.advance();
        }
        assert_eq!(rotor.setting(), 10);
        rotor.set(25);
        rotor.advance();
        assert_eq!(rotor.setting(), 0);
    }

    #[test]
    fn test_at_notch_only_at_notch_positions() {
        let perm = Permutation::new(ROTOR_I, &Alphabet::default()).unwrap();
        let mut rotor = Rotor::moving("VI", perm, "ZM").unwrap();
        for pos in 0..26 {
            rotor.set(pos);
            assert_eq!(rotor.at_notch(), pos == 12 || pos == 25, "position {}", pos);
        }
    }

    #[test]
    fn test_fixed_rotors_do_not_move() {
        let alpha = Alphabet::default();
        let mut fixed = Rotor::fixed("Beta", Permutation::new(BETA, &alpha).unwrap());
        fixed.set(4);
        fixed.advance();
        assert_eq!(fixed.setting(), 4);
        assert!(!fixed.at_notch());

        let mut reflector = Rotor::reflector("B", Permutation::new(UKW_B, &alpha).unwrap());
        reflector.advance();
        assert_eq!(reflector.setting(), 0);
    }

    #[test]
    fn test_convert_at_zero_is_wiring() {
        let rotor = rotor_i();
        // A -> E, and back.
        assert_eq!(rotor.convert_forward(0), 4);
        assert_eq!(rotor.convert_backward(4), 0);
    }

    #[test]
    fn test_convert_with_offset() {
        let mut rotor = rotor_i();
        rotor.set_symbol('B').unwrap();
        // Contact A enters wiring at B, B -> K, exits at K - 1 = J.
        assert_eq!(rotor.convert_forward(0), 9);
        for p in 0..26 {
            assert_eq!(rotor.convert_backward(rotor.convert_forward(p)), p);
        }
    }

    #[test]
    fn test_set_symbol_rejects_foreign_symbol() {
        let mut rotor = rotor_i();
        rotor.set(3);
        assert_eq!(
            rotor.set_symbol('a'),
            Err(RotorError::InvalidSymbol { symbol: 'a' })
        );
        assert_eq!(rotor.setting(), 3);
    }

    #[test]
    fn test_moving_requires_valid_notches() {
        let perm = Permutation::identity(&Alphabet::default());
        assert!(matches!(
            Rotor::moving("X", perm.clone(), ""),
            Err(RotorError::MalformedRotor { .. })
        ));
        assert!(matches!(
            Rotor::moving("X", perm, "Q1"),
            Err(RotorError::MalformedRotor { .. })
        ));
    }

    #[test]
    fn test_rotor_type_tags() {
        assert_eq!("MQ".parse::<RotorType>(), Ok(RotorType::Moving("Q".to_string())));
        assert_eq!("MZM".parse::<RotorType>(), Ok(RotorType::Moving("ZM".to_string())));
        assert_eq!("N".parse::<RotorType>(), Ok(RotorType::Fixed));
        assert_eq!("R".parse::<RotorType>(), Ok(RotorType::Reflector));
        assert!("M".parse::<RotorType>().is_err());
        assert!("NQ".parse::<RotorType>().is_err());
        assert!("RA".parse::<RotorType>().is_err());
        assert!("F".parse::<RotorType>().is_err());
        assert!("".parse::<RotorType>().is_err());
    }

    #[test]
    fn test_spec_build() {
        let alpha = Alphabet::default();
        let spec = RotorSpec::parse("I", "MQ", ROTOR_I).unwrap();
        assert_eq!(spec.build(&alpha).unwrap(), rotor_i());

        let bad = RotorSpec::parse("Beta", "NX", BETA);
        assert!(matches!(bad, Err(RotorError::MalformedRotor { .. })));

        let bad_wiring = RotorSpec::parse("B", "R", "(AB").unwrap();
        assert!(matches!(
            bad_wiring.build(&alpha),
            Err(RotorError::MalformedCycle { .. })
        ));
    }

    #[test]
    fn test_registry() {
        let alpha = Alphabet::default();
        let specs = vec![
            RotorSpec::parse("I", "MQ", ROTOR_I).unwrap(),
            RotorSpec::parse("Beta", "N", BETA).unwrap(),
            RotorSpec::parse("B", "R", UKW_B).unwrap(),
        ];
        let registry = RotorRegistry::from_specs(&alpha, &specs).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["B", "Beta", "I"]);
        assert!(registry.get("B").unwrap().reflecting());
        assert!(registry.get("II").is_none());

        let mut dup = specs.clone();
        dup.push(RotorSpec::parse("I", "MV", "").unwrap());
        assert_eq!(
            RotorRegistry::from_specs(&alpha, &dup).unwrap_err(),
            RotorError::DuplicateRotor {
                name: "I".to_string()
            }
        );
    }
}
