//! An index from names to the definitions that declare them, built once per
//! token stream.

use std::collections::HashMap;

use crate::lexer::{
    definition::{definition_name, definition_signature, MacroHeader},
    Token,
    TokenKind,
};

/// Where a macro lives in its token stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MacroLocation {
    /// The index of the `#define macro` token.
    pub definition: usize,

    /// The index of the `}` that closes the macro body, or the length of the
    /// stream if the body is never closed.
    pub end: usize,
}

/// The kinds of definition whose signatures are hashed into selectors.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureKind {
    Function,
    Event,
    Error,
}

/// The definitions found in a single token stream.
///
/// When a name is defined more than once, the first definition wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DefinitionIndex {
    macros:     HashMap<String, MacroLocation>,
    signatures: HashMap<(SignatureKind, String), String>,
}

impl DefinitionIndex {
    /// Builds the index for the provided `tokens`.
    #[must_use]
    pub fn build(tokens: &[Token]) -> Self {
        let mut index = Self::default();

        for (position, token) in tokens.iter().enumerate() {
            let kind = match token.kind {
                TokenKind::MacroDefinition => {
                    if let Some(header) = MacroHeader::parse(&token.text) {
                        let location = MacroLocation {
                            definition: position,
                            end:        block_end(tokens, position),
                        };
                        index.macros.entry(header.name).or_insert(location);
                    }
                    continue;
                }
                TokenKind::FunctionDefinition => SignatureKind::Function,
                TokenKind::EventDefinition => SignatureKind::Event,
                TokenKind::ErrorDefinition => SignatureKind::Error,
                _ => continue,
            };

            if let (Some(name), Some(signature)) = (
                definition_name(&token.text),
                definition_signature(&token.text),
            ) {
                index
                    .signatures
                    .entry((kind, name.to_string()))
                    .or_insert(signature);
            }
        }

        index
    }

    /// Gets the location of the macro called `name`, if it is defined.
    #[must_use]
    pub fn macro_location(&self, name: &str) -> Option<MacroLocation> {
        self.macros.get(name).copied()
    }

    /// Gets the canonical signature of the `kind` definition called `name`.
    #[must_use]
    pub fn signature(&self, kind: SignatureKind, name: &str) -> Option<&str> {
        self.signatures
            .get(&(kind, name.to_string()))
            .map(String::as_str)
    }
}

/// Finds the `}` that closes the block opened by the definition at `start`.
///
/// A new macro definition before the close means the body was never closed,
/// and the body is taken to end there.
pub(crate) fn block_end(tokens: &[Token], start: usize) -> usize {
    let mut depth = 1usize;
    for (position, token) in tokens.iter().enumerate().skip(start + 1) {
        match token.kind {
            TokenKind::BlockStart => depth += 1,
            TokenKind::BlockEnd => {
                depth -= 1;
                if depth == 0 {
                    return position;
                }
            }
            TokenKind::MacroDefinition => return position,
            _ => (),
        }
    }

    tokens.len()
}
