//! This module contains the state tracking functionality for the analyzer.

use std::fmt::Debug;

use crate::vm::{ExecutionResult, VM};

/// A marker trait that says that the type implementing it is an analyzer state.
pub trait State
where
    Self: Clone + Debug + Sized,
{
}

/// The initial state for the analyzer.
#[derive(Clone, Debug)]
pub struct HasDocument;
impl State for HasDocument {}

/// The analyzer has prepared the interpreter to execute the document's
/// tokens.
#[derive(Clone, Debug)]
pub struct VMReady {
    pub vm: VM,
}
impl State for VMReady {}

#[derive(Clone, Debug)]
pub struct ExecutionComplete {
    /// The results from executing the document.
    pub execution_result: ExecutionResult,
}
impl State for ExecutionComplete {}
