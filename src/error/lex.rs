//! This module contains the error type that pertains to tokenizing Huff
//! source.

use thiserror::Error;

use crate::error::container;

/// Errors that occur while turning source text into a
/// [`crate::lexer::TokenStream`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Unrecognized input {text:?}")]
    UnrecognizedInput { text: String },
}

/// A lexing error with an associated source line.
pub type LocatedError = container::Located<Error>;

/// A container of lexing errors.
pub type Errors = container::Errors<LocatedError>;

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, line: u32) -> Self::Located {
        container::Located {
            location: line,
            payload:  self,
        }
    }
}
