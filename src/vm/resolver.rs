//! This module contains the type definitions that allow the interpreter to
//! find macros and signatures that are defined outside the token stream it is
//! executing.
//!
//! The interface is deliberately narrow. The [`crate::document::Document`]
//! implements it by searching the documents it includes, but the interpreter
//! itself knows nothing about files or include paths.

use std::{fmt::Debug, rc::Rc};

use crate::lexer::{
    index::{MacroLocation, SignatureKind},
    TokenStream,
};

/// A dynamically dispatched [`MacroResolver`] instance.
pub type DynResolver = Rc<dyn MacroResolver>;

/// A macro found in a token stream other than the one being executed.
#[derive(Clone, Debug)]
pub struct ExternalMacro {
    /// The tokens of the stream that defines the macro.
    pub tokens: TokenStream,

    /// Where the macro lives in `tokens`.
    pub location: MacroLocation,

    /// The resolver for names that the macro body itself leaves unresolved.
    pub resolver: DynResolver,
}

/// The interface to an object that can look up definitions that are not
/// present in the token stream being executed.
pub trait MacroResolver
where
    Self: Debug,
{
    /// Finds the definition of the macro called `name`.
    #[must_use]
    fn resolve_macro(&self, name: &str) -> Option<ExternalMacro>;

    /// Finds the canonical signature of the `kind` definition called `name`.
    #[must_use]
    fn resolve_signature(&self, kind: SignatureKind, name: &str) -> Option<String>;
}

/// An implementation of the [`MacroResolver`] trait for token streams that
/// include nothing, and so resolve no names.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NoIncludes;

impl NoIncludes {
    /// Wraps `self` into an [`Rc`].
    #[must_use]
    pub fn in_rc(self) -> DynResolver {
        Rc::new(self)
    }
}

impl MacroResolver for NoIncludes {
    fn resolve_macro(&self, _name: &str) -> Option<ExternalMacro> {
        None
    }

    fn resolve_signature(&self, _kind: SignatureKind, _name: &str) -> Option<String> {
        None
    }
}
