//! This module contains the error type for parsing numeric literals into
//! [`crate::vm::value::Word`]s.
//!
//! These errors never escape the interpreter. A literal that fails to parse is
//! pushed as symbolic text instead.

use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Cannot parse a word from an empty literal")]
    Empty,

    #[error("Invalid digit {character:?} at index {index}")]
    InvalidDigit { character: char, index: usize },

    #[error("Literal {text:?} does not fit in 256 bits")]
    Overflow { text: String },

    #[error("Expected 32 bytes but got {length}")]
    InvalidLength { length: usize },
}

/// The result type for word parsing.
pub type Result<T> = std::result::Result<T, Error>;
