//! Permutation: bijection over alphabet indices, written in cycle notation.
//!
//! A cycle `(c0c1...cm)` sends `c0 → c1 → ... → cm → c0`. Symbols that do
//! not appear in any cycle are fixed points, so the empty string is the
//! identity.

use crate::alphabet::Alphabet;
use crate::error::{Result, RotorError};

/// Bijection over `0..alphabet.size()` with its inverse precomputed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Alphabet,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet`.
    ///
    /// Groups may be separated by any amount of whitespace (or none). Empty
    /// groups `()` are ignored.
    ///
    /// # Errors
    /// Returns [`RotorError::MalformedCycle`] for unbalanced or nested
    /// parentheses, stray text outside a group, whitespace inside a group, a
    /// symbol outside the alphabet, or a symbol listed twice anywhere in the
    /// text.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Alphabet, Permutation};
    ///
    /// let alpha = Alphabet::new("ABCDEF").unwrap();
    /// let perm = Permutation::new("(BACE) (D)", &alpha).unwrap();
    /// assert_eq!(perm.permute_symbol('B').unwrap(), 'A');
    /// assert_eq!(perm.permute_symbol('F').unwrap(), 'F');
    /// assert_eq!(perm.invert(2), 0);
    /// ```
    pub fn new(cycles: &str, alphabet: &Alphabet) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut mentioned = vec![false; size];

        for cycle in split_cycles(cycles)? {
            let mut members = Vec::with_capacity(cycle.len());
            for c in cycle.chars() {
                let index = alphabet.to_index(c).map_err(|_| RotorError::MalformedCycle {
                    reason: format!("symbol '{}' is not in the alphabet", c),
                })?;
                if mentioned[index] {
                    return Err(RotorError::MalformedCycle {
                        reason: format!("symbol '{}' appears more than once", c),
                    });
                }
                mentioned[index] = true;
                members.push(index);
            }
            for (i, &from) in members.iter().enumerate() {
                forward[from] = members[(i + 1) % members.len()];
            }
        }

        Ok(Self::from_forward(alphabet, forward))
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: &Alphabet) -> Self {
        Self::from_forward(alphabet, (0..alphabet.size()).collect())
    }

    fn from_forward(alphabet: &Alphabet, forward: Vec<usize>) -> Self {
        let mut inverse = vec![0; forward.len()];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }
        Permutation {
            alphabet: alphabet.clone(),
            forward,
            inverse,
        }
    }

    /// Size of the permuted alphabet.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// The alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Image of `p`, taken modulo the alphabet size.
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Preimage of `c`, taken modulo the alphabet size.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Symbol-level [`permute`](Self::permute).
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidSymbol`] if `p` is not in the alphabet.
    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_index(p)?;
        self.alphabet.to_symbol(self.forward[index])
    }

    /// Symbol-level [`invert`](Self::invert).
    ///
    /// # Errors
    /// Returns [`RotorError::InvalidSymbol`] if `c` is not in the alphabet.
    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_index(c)?;
        self.alphabet.to_symbol(self.inverse[index])
    }

    /// True iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }

    /// True iff applying the permutation twice is the identity.
    ///
    /// A reflector must be both an involution and a derangement for the
    /// machine to be reciprocal.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }
}

/// Splits cycle text into the bodies of its parenthesized groups.
fn split_cycles(text: &str) -> Result<Vec<&str>> {
    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for (pos, c) in text.char_indices() {
        match (c, open) {
            ('(', None) => open = Some(pos + c.len_utf8()),
            ('(', Some(_)) => {
                return Err(RotorError::MalformedCycle {
                    reason: format!("nested '(' at offset {}", pos),
                })
            }
            (')', Some(start)) => {
                let body = &text[start..pos];
                if !body.is_empty() {
                    groups.push(body);
                }
                open = None;
            }
            (')', None) => {
                return Err(RotorError::MalformedCycle {
                    reason: format!("unmatched ')' at offset {}", pos),
                })
            }
            (c, Some(_)) if c.is_whitespace() => {
                return Err(RotorError::MalformedCycle {
                    reason: format!("whitespace inside cycle at offset {}", pos),
                })
            }
            (_, Some(_)) => {}
            (c, None) if c.is_whitespace() => {}
            (c, None) => {
                return Err(RotorError::MalformedCycle {
                    reason: format!("'{}' outside a cycle at offset {}", c, pos),
                })
            }
        }
    }

    if open.is_some() {
        return Err(RotorError::MalformedCycle {
            reason: "unbalanced '('".to_string(),
        });
    }
    Ok(groups)
}
