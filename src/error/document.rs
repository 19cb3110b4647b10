//! This module contains the errors that occur while loading documents and
//! the documents that they include.

use thiserror::Error;

use crate::error::container;

/// Errors from loading a [`crate::document::Document`] and its includes.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Could not read {path:?}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Including {path:?} would create an include cycle")]
    IncludeCycle { path: String },
}

/// A document error with an associated source line.
///
/// The line is the one holding the `#include` directive, or `0` for the root
/// document itself.
pub type LocatedError = container::Located<Error>;

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
