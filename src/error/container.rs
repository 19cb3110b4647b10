//! Containers that attach source lines to diagnostics and gather them up.

use std::fmt::Formatter;

use thiserror::Error;

/// A diagnostic that belongs to a particular line of a source document.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Located<E>
where
    E: Clone,
{
    /// The 1-based source line of the problem, or `0` when it concerns the
    /// document as a whole.
    pub location: u32,

    /// The error data
    pub payload: E,
}

/// Displays the error after the line it belongs to.
impl<E> std::fmt::Display for Located<E>
where
    E: std::fmt::Display + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}]: {}", self.location, self.payload)
    }
}

/// A trait for errors that can be pinned to a source line.
pub trait Locatable
where
    Self: Sized,
{
    /// The error type once the line is attached.
    type Located;

    /// Attach the 1-based source `line` to the error.
    fn locate(self, line: u32) -> Self::Located;
}

/// A collection of diagnostics.
///
/// Containers of [`Located`] diagnostics are kept in line order, and the
/// diagnostics on a single line stay in the order they were recorded.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Errors<E> {
    payloads: Vec<E>,
}

impl<E> Errors<E> {
    /// Creates a container that holds no diagnostics.
    #[must_use]
    pub fn new() -> Self {
        let payloads = vec![];
        Self { payloads }
    }

    /// Gets the diagnostics in the container.
    #[must_use]
    pub fn payloads(&self) -> &[E] {
        self.payloads.as_slice()
    }

    /// Gets the number of diagnostics in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Checks if the container holds no diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Errors<Located<E>>
where
    E: std::error::Error + Clone,
{
    /// Records `payload` as a problem on the source `line`.
    pub fn add_located(&mut self, line: u32, payload: E) {
        self.payloads.push(Located {
            location: line,
            payload,
        });
        self.sort();
    }

    /// Records many located diagnostics at once.
    pub fn add_many_located(&mut self, errors: impl Into<Vec<Located<E>>>) {
        self.payloads.extend(errors.into());
        self.sort();
    }

    /// Moves every diagnostic in `other` into this container.
    pub fn merge(&mut self, other: impl Into<Self>) {
        let other: Self = other.into();
        self.add_many_located(other.payloads);
    }

    /// Gets the line of each diagnostic, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<u32> {
        self.payloads.iter().map(|error| error.location).collect()
    }

    fn sort(&mut self) {
        self.payloads.sort_by_key(|item| item.location);
    }
}

/// The default container holds no diagnostics.
impl<E> Default for Errors<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A single diagnostic becomes a container of one.
impl<E> From<E> for Errors<E>
where
    E: std::error::Error,
{
    fn from(value: E) -> Self {
        Self {
            payloads: vec![value],
        }
    }
}

impl<E> From<Errors<E>> for Vec<E>
where
    E: std::error::Error,
{
    fn from(value: Errors<E>) -> Self {
        value.payloads
    }
}

/// Lists the diagnostics one per line, after a count.
impl<E> std::fmt::Display for Errors<E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.payloads.is_empty() {
            return write!(f, "No problems found");
        }

        writeln!(f, "Found {} problems:", self.payloads.len())?;
        for error in &self.payloads {
            writeln!(f, "{error}")?;
        }

        Ok(())
    }
}
