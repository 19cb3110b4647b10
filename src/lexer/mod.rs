//! This module contains the tokenizer that turns Huff source text into the
//! [`TokenStream`] consumed by the interpreter.
//!
//! Each `#define` directive is kept as a single token whose text is parsed on
//! demand by the [`definition`] module. Within macro bodies, every opcode,
//! literal, label, and invocation is its own token.

pub mod definition;
pub mod index;

use std::rc::Rc;

use logos::Logos;
use tracing::warn;

use crate::{
    error::lex,
    lexer::index::{DefinitionIndex, MacroLocation, SignatureKind},
    opcode::{builtin::Builtin, Opcode},
};

/// The raw lexical grammar of Huff.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
#[logos(skip r"#\[[^\]\n]*\]")]
enum Lexeme {
    #[regex(r"#define[ \t]+(macro|fn|test)[ \t]+[^{]*\{")]
    MacroDefinition,

    #[regex(r"#define[ \t]+function[^\n]*")]
    FunctionDefinition,

    #[regex(r"#define[ \t]+event[^\n]*")]
    EventDefinition,

    #[regex(r"#define[ \t]+error[^\n]*")]
    ErrorDefinition,

    #[regex(r"#define[ \t]+constant[^\n]*")]
    ConstantDefinition,

    #[regex(r"#define[ \t]+(jumptable__packed|jumptable|table)[^{]*\{[^}]*\}")]
    TableDefinition,

    #[regex(r#"#include[ \t]*("[^"\n]*"|'[^'\n]*')"#)]
    Include,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"\[[A-Za-z0-9_]+\]")]
    Constant,

    #[regex(r"<[A-Za-z0-9_]+>")]
    MacroArgument,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*\(([^()\n]|\([^()\n]*\))*\)")]
    Invocation,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*:")]
    Label,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[token("{")]
    BlockStart,

    #[token("}")]
    BlockEnd,
}

/// The kinds of token that the interpreter distinguishes between.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    MacroDefinition,
    FunctionDefinition,
    EventDefinition,
    ErrorDefinition,
    ConstantDefinition,
    TableDefinition,
    Include,

    /// A hex or decimal number.
    Literal,

    /// A constant reference such as `[OWNER_SLOT]`.
    Constant,

    /// A macro argument reference such as `<offset>`.
    MacroArgument,

    /// An invocation of a macro, such as `TRANSFER()`.
    MacroCall,

    /// An invocation of a compiler builtin, such as `__FUNC_SIG(...)`.
    Builtin(Builtin),

    /// A jump label definition such as `error:`.
    Label,

    Opcode(Opcode),

    /// Any other bare identifier, which can only be a reference to a jump
    /// label.
    LabelReference,

    BlockStart,
    BlockEnd,
}

/// A single token of Huff source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,

    /// The source text of the token, exactly as written.
    pub text: String,

    /// The 1-based line on which the token starts.
    pub line: u32,

    /// The 1-based line on which the token ends.
    pub end_line: u32,
}

impl Token {
    /// Gets the name that the token refers to.
    ///
    /// This is the callee of an invocation, the label of a label definition,
    /// and the constant inside a constant reference. For every other kind of
    /// token it is the token text.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.kind {
            TokenKind::MacroCall | TokenKind::Builtin(_) => {
                self.text.split('(').next().unwrap_or_default().trim()
            }
            TokenKind::Label => self.text.trim_end_matches(':'),
            TokenKind::Constant => self.text.trim_start_matches('[').trim_end_matches(']'),
            _ => &self.text,
        }
    }

    /// Gets the text between the outermost parentheses of an invocation.
    #[must_use]
    pub fn argument(&self) -> &str {
        match (self.text.find('('), self.text.rfind(')')) {
            (Some(open), Some(close)) if open < close => self.text[open + 1..close].trim(),
            _ => "",
        }
    }

    /// Gets the path named by an `#include` directive.
    #[must_use]
    pub fn include_path(&self) -> Option<&str> {
        let start = self.text.find(['"', '\''])?;
        let quote = self.text[start..].chars().next()?;
        let rest = &self.text[start + 1..];
        let end = rest.find(quote)?;
        Some(&rest[..end])
    }
}

/// An immutable, cheaply cloneable sequence of tokens along with the index of
/// the definitions they contain.
#[derive(Clone, Debug, Default)]
pub struct TokenStream {
    tokens: Rc<[Token]>,
    index:  Rc<DefinitionIndex>,
}

impl TokenStream {
    /// Constructs a stream from `tokens`, indexing their definitions.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let index = Rc::new(DefinitionIndex::build(&tokens));
        let tokens = tokens.into();
        Self { tokens, index }
    }

    /// Gets the token at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    /// Gets the number of tokens in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Checks if the stream has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the tokens in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Gets the definitions found in this stream.
    #[must_use]
    pub fn index(&self) -> &DefinitionIndex {
        &self.index
    }

    /// Gets the location of the macro called `name` in this stream.
    #[must_use]
    pub fn macro_location(&self, name: &str) -> Option<MacroLocation> {
        self.index.macro_location(name)
    }

    /// Gets the canonical signature of the `kind` definition called `name`.
    #[must_use]
    pub fn signature(&self, kind: SignatureKind, name: &str) -> Option<&str> {
        self.index.signature(kind, name)
    }

    /// Gets the index of the `}` that closes the body opened by the definition
    /// at `definition`, or the length of the stream if there is none.
    #[must_use]
    pub fn block_end(&self, definition: usize) -> usize {
        index::block_end(&self.tokens, definition)
    }

    /// Checks if no other token starts on the line where the token at
    /// `position` ends.
    #[must_use]
    pub fn is_last_on_line(&self, position: usize) -> bool {
        let Some(token) = self.tokens.get(position) else {
            return false;
        };
        self.tokens
            .get(position + 1)
            .map_or(true, |next| next.line > token.end_line)
    }
}

/// Tokenizes the Huff `source`.
///
/// Input that cannot be tokenized is skipped, with an error recorded for each
/// contiguous run of it.
#[must_use]
pub fn lex(source: &str) -> (TokenStream, lex::Errors) {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let line_of = |offset: usize| -> u32 {
        u32::try_from(line_starts.partition_point(|start| *start <= offset)).unwrap_or(u32::MAX)
    };

    let mut tokens = Vec::new();
    let mut errors = lex::Errors::new();
    let mut unrecognized: Option<std::ops::Range<usize>> = None;

    let flush = |range: Option<std::ops::Range<usize>>, errors: &mut lex::Errors| {
        if let Some(range) = range {
            let text = source[range.clone()].to_string();
            let line = line_of(range.start);
            warn!(line, text, "unrecognized input");
            errors.add_located(line, lex::Error::UnrecognizedInput { text });
        }
    };

    for (lexeme, span) in Lexeme::lexer(source).spanned() {
        let Ok(lexeme) = lexeme else {
            unrecognized = match unrecognized.take() {
                Some(range) if range.end == span.start => Some(range.start..span.end),
                previous => {
                    flush(previous, &mut errors);
                    Some(span)
                }
            };
            continue;
        };

        let text = &source[span.clone()];
        tokens.push(Token {
            kind:     classify(lexeme, text),
            text:     text.to_string(),
            line:     line_of(span.start),
            end_line: line_of(span.end.saturating_sub(1).max(span.start)),
        });
    }
    flush(unrecognized, &mut errors);

    (TokenStream::new(tokens), errors)
}

/// Refines the raw lexeme into the kind of token the interpreter sees.
fn classify(lexeme: Lexeme, text: &str) -> TokenKind {
    match lexeme {
        Lexeme::MacroDefinition => TokenKind::MacroDefinition,
        Lexeme::FunctionDefinition => TokenKind::FunctionDefinition,
        Lexeme::EventDefinition => TokenKind::EventDefinition,
        Lexeme::ErrorDefinition => TokenKind::ErrorDefinition,
        Lexeme::ConstantDefinition => TokenKind::ConstantDefinition,
        Lexeme::TableDefinition => TokenKind::TableDefinition,
        Lexeme::Include => TokenKind::Include,
        Lexeme::Hex | Lexeme::Integer => TokenKind::Literal,
        Lexeme::Constant => TokenKind::Constant,
        Lexeme::MacroArgument => TokenKind::MacroArgument,
        Lexeme::Invocation => {
            let name = text.split('(').next().unwrap_or_default().trim();
            Builtin::from_name(name).map_or(TokenKind::MacroCall, TokenKind::Builtin)
        }
        Lexeme::Label => TokenKind::Label,
        Lexeme::Identifier => {
            Opcode::from_mnemonic(text).map_or(TokenKind::LabelReference, TokenKind::Opcode)
        }
        Lexeme::BlockStart => TokenKind::BlockStart,
        Lexeme::BlockEnd => TokenKind::BlockEnd,
    }
}

#[cfg(test)]
mod test {
    use crate::{
        lexer::{lex, TokenKind},
        opcode::{builtin::Builtin, Opcode},
    };

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).0.iter().map(|token| token.kind).collect()
    }

    #[test]
    fn tokenizes_a_macro() {
        let source = "#define macro MAIN() = takes(0) returns(1) {\n\
                      0x20 [SLOT] sload // comment\n\
                      <arg> add TRANSFER() done jumpi\n\
                      done:\n\
                      }";
        let (stream, errors) = lex(source);
        assert!(errors.is_empty());

        let kinds: Vec<TokenKind> = stream.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::MacroDefinition,
                TokenKind::Literal,
                TokenKind::Constant,
                TokenKind::Opcode(Opcode::SLoad),
                TokenKind::MacroArgument,
                TokenKind::Opcode(Opcode::Add),
                TokenKind::MacroCall,
                TokenKind::LabelReference,
                TokenKind::Opcode(Opcode::JumpI),
                TokenKind::Label,
                TokenKind::BlockEnd,
            ]
        );

        let lines: Vec<u32> = stream.iter().map(|token| token.line).collect();
        assert_eq!(lines, vec![1, 2, 2, 2, 3, 3, 3, 3, 3, 4, 5]);
    }

    #[test]
    fn classifies_builtins_and_names() {
        let (stream, _) = lex("__FUNC_SIG(\"transfer(address,uint256)\") [OWNER] done: FOO(a, b)");
        let tokens: Vec<_> = stream.iter().collect();

        assert_eq!(tokens[0].kind, TokenKind::Builtin(Builtin::FunctionSignature));
        assert_eq!(tokens[0].name(), "__FUNC_SIG");
        assert_eq!(tokens[0].argument(), "\"transfer(address,uint256)\"");
        assert_eq!(tokens[1].name(), "OWNER");
        assert_eq!(tokens[2].name(), "done");
        assert_eq!(tokens[3].kind, TokenKind::MacroCall);
        assert_eq!(tokens[3].name(), "FOO");
        assert_eq!(tokens[3].argument(), "a, b");
    }

    #[test]
    fn directives_are_single_tokens() {
        assert_eq!(
            kinds(
                "#include \"./lib.huff\"\n\
                 #define function foo(uint256) view returns (uint256)\n\
                 #define constant X = 0x01\n\
                 #define jumptable TABLE {\n a b\n}"
            ),
            vec![
                TokenKind::Include,
                TokenKind::FunctionDefinition,
                TokenKind::ConstantDefinition,
                TokenKind::TableDefinition,
            ]
        );

        let (stream, _) = lex("#include './lib.huff'");
        let include = stream.get(0).expect("No include token");
        assert_eq!(include.include_path(), Some("./lib.huff"));
    }

    #[test]
    fn multi_line_tokens_track_their_end_line() {
        let (stream, _) = lex("#define macro A() =\n takes(0) returns(0) {\n}");
        let definition = stream.get(0).expect("No definition token");
        assert_eq!(definition.line, 1);
        assert_eq!(definition.end_line, 2);
        assert!(stream.is_last_on_line(0));
        assert!(stream.is_last_on_line(1));
    }

    #[test]
    fn finds_the_last_token_on_each_line() {
        let (stream, _) = lex("0x01 0x02\n/* comment */ add");
        assert!(!stream.is_last_on_line(0));
        assert!(stream.is_last_on_line(1));
        assert!(stream.is_last_on_line(2));
        assert!(!stream.is_last_on_line(3));
    }

    #[test]
    fn records_unrecognized_input() {
        let (stream, errors) = lex("0x01 $$ add\n@");
        assert_eq!(stream.len(), 2);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.payloads()[0].location, 1);
        assert_eq!(errors.payloads()[1].location, 2);
    }
}
