//! Rotor cipher machine core.
//!
//! Simulates the cryptographic heart of an electromechanical rotor machine:
//! a stack of wired rotors whose offsets advance between symbols, with a
//! plugboard on the input side and a reflector at the far end. The result is
//! a reciprocal substitution cipher: the same settings that encode a message
//! decode it.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbols <-> indices 0..N-1)
//!     ↓
//! Permutation  (bijection from cycle notation, with inverse)
//!     ↓ wrapped with an offset
//! Rotor        (Moving{notches} | Fixed | Reflector)
//!     ↓ ordered slots, reflector leftmost
//! Machine      (snapshot stepping + plugboard/rotors/reflector signal path)
//! ```
//!
//! # Examples
//!
//! Encode and decode with the same starting settings:
//!
//! ```
//! use rotorcrypt::{MachineConfig, MessageSettings, RotorSpec};
//!
//! let config = MachineConfig {
//!     alphabet: None,
//!     slots: 3,
//!     pawls: 2,
//!     rotors: vec![
//!         RotorSpec::parse("B", "R", "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)").unwrap(),
//!         RotorSpec::parse("I", "MQ", "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)").unwrap(),
//!         RotorSpec::parse("III", "MV", "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)").unwrap(),
//!     ],
//! };
//! let settings = MessageSettings {
//!     rotors: vec!["B".into(), "I".into(), "III".into()],
//!     setting: "MV".into(),
//!     plugboard: Some("(HQ) (EX)".into()),
//! };
//!
//! let mut machine = config.build().unwrap();
//! settings.apply(&mut machine).unwrap();
//! let cipher = machine.convert("ATTACKATDAWN").unwrap();
//!
//! settings.apply(&mut machine).unwrap();
//! assert_eq!(machine.convert(&cipher).unwrap(), "ATTACKATDAWN");
//! ```

#![deny(clippy::all)]

pub mod error;

mod alphabet;
mod config;
mod machine;
mod permutation;
mod rotor;

pub use alphabet::{Alphabet, DEFAULT_SYMBOLS};
pub use config::{MachineConfig, MessageSettings};
pub use error::{Result, RotorError};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind, RotorRegistry, RotorSpec, RotorType};
