//! This module contains the primary error type for the library's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod container;
pub mod document;
pub mod execution;
pub mod lex;
pub mod parse;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
pub type Result<T> = std::result::Result<T, Errors>;

/// Every diagnostic that the library reports.
///
/// Each stage of the analysis has its own error type, and they are gathered
/// here so that one [`Errors`] container can hold them all in line order.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Errors that come from tokenizing the source.
    #[error(transparent)]
    Lex(#[from] lex::Error),

    /// Errors from loading documents and their includes.
    #[error(transparent)]
    Document(#[from] document::Error),

    /// Errors from the symbolic interpreter.
    #[error(transparent)]
    Execution(#[from] execution::Error),
}

/// A library error with an associated source line.
pub type LocatedError = container::Located<Error>;

/// A container of errors that may occur in the library.
pub type Errors = container::Errors<LocatedError>;

/// Re-wraps a located subsystem error around the general payload.
fn relocate<E>(value: container::Located<E>) -> LocatedError
where
    E: Clone,
    Error: From<E>,
{
    LocatedError {
        location: value.location,
        payload:  Error::from(value.payload),
    }
}

impl From<lex::LocatedError> for LocatedError {
    fn from(value: lex::LocatedError) -> Self {
        relocate(value)
    }
}

impl From<document::LocatedError> for LocatedError {
    fn from(value: document::LocatedError) -> Self {
        relocate(value)
    }
}

impl From<execution::LocatedError> for LocatedError {
    fn from(value: execution::LocatedError) -> Self {
        relocate(value)
    }
}

/// Lets a document that cannot be read be returned with `?`.
impl From<document::LocatedError> for Errors {
    fn from(value: document::LocatedError) -> Self {
        let re_wrapped: LocatedError = value.into();
        re_wrapped.into()
    }
}

impl From<execution::LocatedError> for Errors {
    fn from(value: execution::LocatedError) -> Self {
        let re_wrapped: LocatedError = value.into();
        re_wrapped.into()
    }
}

impl From<lex::Errors> for Errors {
    fn from(value: lex::Errors) -> Self {
        gather(value.into())
    }
}

impl From<execution::Errors> for Errors {
    fn from(value: execution::Errors) -> Self {
        gather(value.into())
    }
}

/// Collects located subsystem errors into the general container.
fn gather<E>(errors: Vec<container::Located<E>>) -> Errors
where
    E: Clone,
    Error: From<E>,
{
    let mut gathered = Errors::new();
    gathered.add_many_located(errors.into_iter().map(relocate).collect::<Vec<_>>());
    gathered
}
