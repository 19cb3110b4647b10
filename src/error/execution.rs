//! This module contains errors pertaining to the symbolic interpretation of
//! a Huff token stream.
//!
//! None of these errors abort an interpreter pass. They are recorded as
//! diagnostics against the line on which they occurred, and the interpreter
//! carries on with a best-effort stack.

use thiserror::Error;

use crate::error::container;

/// Errors that occur during the execution of the tokens by the
/// [`crate::vm::VM`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("No definition was found for the macro `{name}`")]
    UnresolvedMacro { name: String },

    #[error("Definition {text:?} is malformed: {reason}")]
    MalformedDefinition { text: String, reason: String },

    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Maximum stack depth exceeded with request for {requested:?} frames")]
    StackDepthExceeded { requested: usize },

    #[error("A stack frame at depth {depth:?} was requested but none was available")]
    NoSuchStackFrame { depth: usize },

    #[error("Macro `{name}` would exceed the maximum call depth of {limit}")]
    CallDepthExceeded { name: String, limit: usize },

    #[error("Interpretation stopped after {limit} steps")]
    StepLimitExceeded { limit: usize },

    #[error("Memory offset {offset} is too large to be tracked concretely")]
    UnsupportedMemoryOffset { offset: String },
}

/// An execution error with an associated source line.
pub type LocatedError = container::Located<Error>;

/// A container of execution errors used for aggregation of errors during
/// execution.
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
