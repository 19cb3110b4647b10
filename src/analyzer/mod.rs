//! This module contains the definition of the analyzer itself.

pub mod report;
pub mod state;

use std::rc::Rc;

use crate::{
    analyzer::{report::Report, state::State},
    comment::{self, LineComment},
    document::Document,
    error,
    vm,
    vm::{resolver::DynResolver, VM},
};

/// Creates a new analyzer wrapping the provided `document`.
#[must_use]
pub fn new(document: Document) -> Analyzer<state::HasDocument> {
    let document = document.in_rc();
    let state = state::HasDocument;
    Analyzer { document, state }
}

/// The core of the stack comment generation, the `Analyzer` is responsible for
/// ingesting a document and producing the stack comments for its lines.
///
/// # Basic Usage
///
/// For the most basic usage of the library, it is sufficient to construct an
/// `Analyzer` and call the `.analyze` method, passing your configuration.
///
/// # Enforcing Valid State Transitions
///
/// The analyzer enforces that only correct state transitions can occur through
/// use of structs that implement the exact state required by it at any given
/// point.
///
/// There is the [`Self::state`] function that provides access to the state data
/// of whichever state it is in.
#[derive(Clone, Debug)]
pub struct Analyzer<S: State> {
    /// The document that is being analyzed.
    document: Rc<Document>,

    /// The internal state of the analyzer.
    state: S,
}

/// Safe operations available in all states.
impl<S: State> Analyzer<S> {
    /// Gets a reference to the document being analyzed.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Gets a reference to the current state of the analyzer.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }
}

/// Unsafe operations available in all states.
///
/// These operations are capable of **violating the state invariants** of the
/// analyzer, and must be used with the _utmost_ care.
impl<S: State> Analyzer<S> {
    /// Forces the analyzer into `new_state`, disregarding any safety with
    /// regards to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the analyzer unless you totally
    /// understand the state that the analyzer is in, and the implications
    /// of doing so.
    pub unsafe fn set_state<NS: State>(self, new_state: NS) -> Analyzer<NS> {
        Analyzer {
            document: self.document,
            state:    new_state,
        }
    }

    /// Forces the analyzer into the state `NS`, with the value of the state
    /// created by applying `transform` to the analyzer's current state and
    /// disregarding any safety with regard to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the analyzer unless you totally
    /// understand the state that the analyzer is in, and the implications
    /// of doing so.
    pub unsafe fn transform_state<NS: State>(self, transform: impl FnOnce(S) -> NS) -> Analyzer<NS> {
        let state = transform(self.state);
        let document = self.document;

        Analyzer { document, state }
    }
}

/// Operations available on a newly-created analyzer.
impl Analyzer<state::HasDocument> {
    /// Executes the analysis process from beginning to end, performing all
    /// the intermediate steps automatically.
    #[must_use]
    pub fn analyze(self, config: vm::Config) -> Analyzer<state::ExecutionComplete> {
        self.prepare_vm(config).execute()
    }

    /// Prepares the interpreter for execution of the document, using the
    /// provided `config` to control its behaviour.
    #[must_use]
    pub fn prepare_vm(self, config: vm::Config) -> Analyzer<state::VMReady> {
        let tokens = self.document.tokens().clone();
        let resolver: DynResolver = self.document.clone();
        let vm = VM::new(tokens, resolver, config);

        unsafe { self.set_state(state::VMReady { vm }) }
    }
}

/// Operations available on an analyzer that has an interpreter ready to
/// execute the document.
impl Analyzer<state::VMReady> {
    /// Executes the document's tokens on the [`VM`], recording the stack
    /// after each line.
    #[must_use]
    pub fn execute(self) -> Analyzer<state::ExecutionComplete> {
        unsafe {
            self.transform_state(|mut old_state| {
                old_state.vm.execute();
                let execution_result = old_state.vm.into_result();
                state::ExecutionComplete { execution_result }
            })
        }
    }
}

/// Operations available on an analyzer that has executed the document.
impl Analyzer<state::ExecutionComplete> {
    /// Gets every comment recorded during execution, in the order that they
    /// were recorded.
    #[must_use]
    pub fn comments(&self) -> &[LineComment] {
        &self.state.execution_result.comments
    }

    /// Gets the text of the document with the stack comments written in.
    #[must_use]
    pub fn annotated(&self) -> String {
        comment::annotate(self.document.text(), self.comments())
    }

    /// Gets all the diagnostics for the document, from lexing, loading its
    /// includes, and executing it, sorted by line.
    #[must_use]
    pub fn diagnostics(&self) -> error::Errors {
        let mut errors = self.document.errors().clone();
        errors.merge(self.state.execution_result.errors.clone());
        errors
    }

    /// Builds the serializable report of the analysis.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new(
            self.document.path(),
            self.comments(),
            &self.diagnostics(),
            self.state.execution_result.halted,
        )
    }
}
