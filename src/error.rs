//! Error types for the rotorcrypt library.

use thiserror::Error;

/// Errors produced while building or running a rotor machine.
///
/// Every failure is raised where it is detected and returned to the caller
/// unchanged; nothing is retried or recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotorError {
    /// Symbol is not part of the alphabet.
    #[error("symbol '{symbol}' is not in the alphabet")]
    InvalidSymbol { symbol: char },

    /// Index lies outside `0..size`.
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Alphabet text is unusable (empty, or duplicate or reserved characters).
    #[error("malformed alphabet: {reason}")]
    MalformedAlphabet { reason: String },

    /// Cycle notation could not be parsed into a permutation.
    #[error("malformed cycle: {reason}")]
    MalformedCycle { reason: String },

    /// Rotor description carries a bad type tag or notch list, or the rotor
    /// is wired over another alphabet than its machine.
    #[error("malformed rotor '{name}': {reason}")]
    MalformedRotor { name: String, reason: String },

    /// Two rotor descriptions share one name.
    #[error("rotor '{name}' is described more than once")]
    DuplicateRotor { name: String },

    /// Rotor name is absent from the registry.
    #[error("unknown rotor '{name}'")]
    UnknownRotor { name: String },

    /// The same rotor was asked to fill two slots.
    #[error("rotor '{name}' is inserted more than once")]
    RepeatedRotor { name: String },

    /// Number of rotors does not match the slot count.
    #[error("expected {expected} rotors, got {actual}")]
    WrongRotorCount { expected: usize, actual: usize },

    /// Slot 0 holds a rotor that does not reflect.
    #[error("rotor '{name}' in the leftmost slot is not a reflector")]
    MisconfiguredReflector { name: String },

    /// Setting string does not cover every non-reflector slot.
    #[error("setting must have {expected} symbols, got {actual}")]
    WrongSettingLength { expected: usize, actual: usize },

    /// Rotating rotors in the slots disagree with the pawl count.
    #[error("machine has {expected} pawls but {actual} rotating rotors")]
    PawlCountMismatch { expected: usize, actual: usize },

    /// Slot/pawl counts cannot describe a machine.
    #[error("invalid machine shape: {slots} slots with {pawls} pawls")]
    InvalidMachineShape { slots: usize, pawls: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RotorError>;
