//! Alphabet: ordered symbol set with a dense index space.
//!
//! Every permutation, rotor and machine works on indices `0..size`; the
//! alphabet is the only place where symbols and indices meet.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RotorError};

/// Symbols used when no explicit alphabet is given.
pub const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters with structural meaning in cycle text and setting lines.
const RESERVED: [char; 3] = ['(', ')', '*'];

struct Symbols {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

/// Finite ordered set of distinct symbols.
///
/// Cloning is cheap: the symbol table is shared and never mutated after
/// construction.
#[derive(Clone)]
pub struct Alphabet {
    inner: Arc<Symbols>,
}

impl Alphabet {
    /// Builds an alphabet from `symbols`, in order.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedAlphabet`] if `symbols` is empty, or a
    /// symbol repeats or is whitespace, `(`, `)` or `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCDEF").unwrap();
    /// assert_eq!(alpha.size(), 6);
    /// assert_eq!(alpha.to_index('C').unwrap(), 2);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(RotorError::MalformedAlphabet {
                reason: "no symbols".to_string(),
            });
        }
        let mut chars = Vec::with_capacity(symbols.len());
        let mut index = HashMap::with_capacity(symbols.len());
        for c in symbols.chars() {
            if c.is_whitespace() || RESERVED.contains(&c) {
                return Err(RotorError::MalformedAlphabet {
                    reason: format!("reserved character {:?}", c),
                });
            }
            if index.insert(c, chars.len()).is_some() {
                return Err(RotorError::MalformedAlphabet {
                    reason: format!("symbol '{}' appears more than once", c),
                });
            }
            chars.push(c);
        }
        Ok(Alphabet {
            inner: Arc::new(Symbols { chars, index }),
        })
    }

    /// Number of symbols.
    pub fn size(&self) -> usize {
        self.inner.chars.len()
    }

    /// Returns true iff `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.inner.index.contains_key(&symbol)
    }

    /// Index of `symbol`.
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidSymbol`] if `symbol` is not present.
    pub fn to_index(&self, symbol: char) -> Result<usize> {
        self.inner
            .index
            .get(&symbol)
            .copied()
            .ok_or(RotorError::InvalidSymbol { symbol })
    }

    /// Symbol at `index`.
    ///
    /// # Errors
    /// Returns [`RotorError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_symbol(&self, index: usize) -> Result<char> {
        self.inner
            .chars
            .get(index)
            .copied()
            .ok_or(RotorError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.inner.chars.iter().copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let chars: Vec<char> = DEFAULT_SYMBOLS.chars().collect();
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet {
            inner: Arc::new(Symbols { chars, index }),
        }
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.chars == other.inner.chars
    }
}

impl Eq for Alphabet {}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.symbols().collect();
        f.debug_tuple("Alphabet").field(&text).finish()
    }
}
