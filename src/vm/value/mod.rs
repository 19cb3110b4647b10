//! This module contains the definition of the [`SymbolicValue`] that occupies
//! each stack cell, along with the concrete [`Word`] that backs folded
//! values.

pub mod word;

use std::fmt::{Display, Formatter};

pub use word::Word;

/// A single cell on the interpreter's stack.
///
/// Values are immutable once pushed. Operations that can fold produce a new
/// [`SymbolicValue::Known`], while those that cannot produce a new
/// [`SymbolicValue::Symbolic`] whose text refers to the operand texts
/// verbatim.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SymbolicValue {
    /// A value whose word is known.
    ///
    /// The `text` is how the value is rendered. For literals taken from the
    /// source this is the literal as written, while folded results are
    /// rendered as `0x`-prefixed hex.
    Known { word: Word, text: String },

    /// An opaque expression standing in for a value that is only known at
    /// runtime.
    Symbolic(String),
}

impl SymbolicValue {
    /// Constructs a known value from a folded `word`.
    #[must_use]
    pub fn known(word: Word) -> Self {
        let text = word.to_hex();
        Self::Known { word, text }
    }

    /// Constructs a value from literal source text.
    ///
    /// Text that parses as a number becomes a known value that keeps the text
    /// as written. Anything else stays symbolic.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.parse::<Word>() {
            Ok(word) => Self::Known { word, text },
            Err(_) => Self::Symbolic(text),
        }
    }

    /// Constructs an opaque symbolic value with the provided `text`.
    #[must_use]
    pub fn symbolic(text: impl Into<String>) -> Self {
        Self::Symbolic(text.into())
    }

    /// Gets the word behind this value if it is known.
    #[must_use]
    pub fn word(&self) -> Option<Word> {
        match self {
            Self::Known { word, .. } => Some(*word),
            Self::Symbolic(_) => None,
        }
    }

    /// Gets the text by which this value is rendered.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Known { text, .. } => text,
            Self::Symbolic(text) => text,
        }
    }

    /// Checks if the value is known.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }
}

impl Display for SymbolicValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<Word> for SymbolicValue {
    fn from(value: Word) -> Self {
        Self::known(value)
    }
}
