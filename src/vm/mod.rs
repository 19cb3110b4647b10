//! This module contains the symbolic interpreter that walks a Huff token
//! stream and records the shape of the stack after each line.

pub mod resolver;
pub mod state;
pub mod value;

use tracing::{debug, trace, warn};

use crate::{
    comment::LineComment,
    constant::{
        DEFAULT_MAXIMUM_CALL_DEPTH,
        DEFAULT_MAXIMUM_MEMORY_OFFSET,
        DEFAULT_MAXIMUM_STEPS,
        MAXIMUM_STACK_DEPTH,
        STACK_UNDERFLOW_PLACEHOLDER,
    },
    error::execution::{Error, Errors},
    lexer::{
        definition::{definition_signature, MacroHeader},
        index::{MacroLocation, SignatureKind},
        Token,
        TokenKind,
        TokenStream,
    },
    vm::{
        resolver::{DynResolver, ExternalMacro},
        state::{memory::Memory, VMState},
        value::SymbolicValue,
    },
};

/// The symbolic interpreter for Huff token streams.
///
/// The interpreter never branches. It steps through the tokens in order,
/// following macro calls into their definitions and returning from them at
/// the end of their bodies, and it takes a best-effort view of the stack
/// wherever the real program could go more than one way.
///
/// After each token that ends a source line, the rendered stack is recorded
/// as a [`LineComment`]. A line that executes more than once, such as the body
/// of a macro that is called and then also analyzed in its own right, gets one
/// comment per execution.
#[derive(Clone, Debug)]
pub struct VM {
    /// The tokens being executed.
    tokens: TokenStream,

    /// The resolver for macros and signatures that `tokens` does not define.
    resolver: DynResolver,

    /// The stack and memory.
    state: VMState,

    /// The macro calls that have not yet returned, innermost last.
    frames: Vec<Frame>,

    /// The outermost macro currently being analyzed, if any.
    entry: Option<Macro>,

    /// The index of the next token to execute.
    pointer: usize,

    /// The number of tokens executed so far, including those of nested
    /// interpreters.
    steps: usize,

    /// The call depth at which this interpreter starts, which is nonzero for
    /// interpreters that execute macros from other documents.
    depth_offset: usize,

    /// Whether comments should be recorded for the executed lines.
    record_comments: bool,

    /// The line of the token currently being executed.
    line: u32,

    /// Set when the step budget runs out.
    halted: bool,

    comments: Vec<LineComment>,
    errors:   Errors,
    config:   Config,
}

impl VM {
    /// Constructs a new interpreter over the provided `tokens`, looking up any
    /// names they do not define through `resolver`.
    #[must_use]
    pub fn new(tokens: TokenStream, resolver: DynResolver, config: Config) -> Self {
        Self {
            tokens,
            resolver,
            state: VMState::new(),
            frames: Vec::new(),
            entry: None,
            pointer: 0,
            steps: 0,
            depth_offset: 0,
            record_comments: true,
            line: 0,
            halted: false,
            comments: Vec::new(),
            errors: Errors::new(),
            config,
        }
    }

    /// Executes every token in the stream, from the first.
    ///
    /// Nothing that happens during execution stops the pass early except for
    /// the step budget running out. Everything else is recorded in
    /// [`Self::errors`] and execution continues with a best-effort stack.
    pub fn execute(&mut self) {
        self.pointer = 0;
        self.halted = false;
        self.run(self.tokens.len());
    }

    /// Gets the comments recorded so far, in the order that they were
    /// recorded.
    #[must_use]
    pub fn comments(&self) -> &[LineComment] {
        &self.comments
    }

    /// Gets the diagnostics recorded so far.
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Gets the configuration of the interpreter.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the stack and memory.
    #[must_use]
    pub fn state(&self) -> &VMState {
        &self.state
    }

    /// Gets the stack and memory for modification.
    pub fn state_mut(&mut self) -> &mut VMState {
        &mut self.state
    }

    /// Checks if execution stopped because the step budget ran out.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Consumes the interpreter, returning its comments and diagnostics.
    #[must_use]
    pub fn into_result(self) -> ExecutionResult {
        ExecutionResult {
            comments: self.comments,
            errors:   self.errors,
            halted:   self.halted,
        }
    }

    /// Pops the top value from the stack.
    ///
    /// An empty stack records [`Error::StackUnderflow`] and yields a
    /// placeholder so that the current operation can still complete.
    pub fn pop(&mut self) -> SymbolicValue {
        match self.state.stack_mut().pop() {
            Ok(value) => value,
            Err(error) => {
                self.record(error);
                SymbolicValue::symbolic(STACK_UNDERFLOW_PLACEHOLDER)
            }
        }
    }

    /// Pushes `value` onto the stack, recording an error if the stack is
    /// full.
    pub fn push(&mut self, value: SymbolicValue) {
        if let Err(error) = self.state.stack_mut().push(value) {
            self.record(error);
        }
    }

    /// Records `error` against the line currently being executed.
    pub fn record(&mut self, error: Error) {
        self.errors.add_located(self.line, error);
    }

    /// Makes the stack take on the shape recorded for `label`.
    pub fn jump_to(&mut self, label: &str) {
        let restored = self.state.stack_mut().jump_to(label);
        trace!(line = self.line, label, restored, "jump");
    }

    /// Looks up the canonical signature of the `kind` definition called
    /// `name`, first in the executing token stream and then through the
    /// resolver.
    #[must_use]
    pub fn signature(&self, kind: SignatureKind, name: &str) -> Option<String> {
        self.tokens
            .signature(kind, name)
            .map(ToString::to_string)
            .or_else(|| self.resolver.resolve_signature(kind, name))
    }

    /// Gets the current depth of macro calls.
    fn depth(&self) -> usize {
        self.depth_offset + self.frames.len()
    }

    /// Executes tokens until the pointer reaches `end` outside of any call,
    /// or runs off the end of the stream.
    fn run(&mut self, end: usize) {
        let tokens = self.tokens.clone();

        while let Some(token) = tokens.get(self.pointer) {
            if self.frames.is_empty() && self.pointer >= end {
                break;
            }
            if self.steps >= self.config.maximum_steps {
                let limit = self.config.maximum_steps;
                warn!(line = token.line, limit, "step limit exceeded");
                self.line = token.line;
                self.record(Error::StepLimitExceeded { limit });
                self.halted = true;
                break;
            }
            self.steps += 1;

            let position = self.pointer;
            self.pointer += 1;
            self.line = token.line;
            trace!(line = token.line, token = %token.text, "executing");

            if let Some(anchor) = self.step(position, token) {
                self.emit(anchor);
            }

            if self.halted {
                break;
            }
        }
    }

    /// Executes the `token` at `position`.
    ///
    /// Returns the position of the token that the resulting stack should be
    /// attributed to, or [`None`] if the token produces no comment.
    fn step(&mut self, position: usize, token: &Token) -> Option<usize> {
        match token.kind {
            TokenKind::MacroDefinition => self.enter_definition(position, token),
            TokenKind::MacroCall => self.call(position, token),
            TokenKind::BlockEnd => self.end_block(position),
            TokenKind::Label => {
                self.state.stack_mut().define_label(token.name());
                Some(position)
            }
            TokenKind::Literal => {
                self.push(SymbolicValue::literal(token.text.as_str()));
                Some(position)
            }
            TokenKind::Constant => {
                self.push(SymbolicValue::symbolic(token.name()));
                Some(position)
            }
            TokenKind::MacroArgument | TokenKind::LabelReference => {
                self.push(SymbolicValue::symbolic(token.text.as_str()));
                Some(position)
            }
            TokenKind::Builtin(builtin) => {
                builtin.execute(self, token);
                Some(position)
            }
            TokenKind::Opcode(opcode) => {
                opcode.execute(self);
                Some(position)
            }
            TokenKind::FunctionDefinition
            | TokenKind::EventDefinition
            | TokenKind::ErrorDefinition => {
                if definition_signature(&token.text).is_none() {
                    self.malformed(token, "missing parameter list");
                }
                None
            }
            TokenKind::ConstantDefinition
            | TokenKind::TableDefinition
            | TokenKind::Include
            | TokenKind::BlockStart => None,
        }
    }

    /// Handles the definition of a macro.
    ///
    /// Reached through a call, the definition opens the callee's frame. At the
    /// top level it starts the analysis of a new macro with a fresh stack of
    /// symbolic inputs.
    fn enter_definition(&mut self, position: usize, token: &Token) -> Option<usize> {
        let definition = self.parse_macro(position, token);

        if let Some(frame) = self.frames.last() {
            if frame.callee.is_some() {
                // The body of the current callee was never closed.
                return self.return_from_macro();
            }

            debug!(name = %definition.name, depth = self.depth(), "entering macro");
            self.state.stack_mut().cache(definition.takes);
            if let Some(frame) = self.frames.last_mut() {
                frame.callee = Some(definition);
            }
            return Some(position);
        }

        debug!(name = %definition.name, takes = definition.takes, "analyzing macro");
        let inputs = (0..definition.takes)
            .map(|i| SymbolicValue::symbolic(format!("takes[{i}]")))
            .collect::<Vec<_>>();
        let stack = self.state.stack_mut();
        stack.reset(inputs);
        stack.clear_labels();
        *self.state.memory_mut() = Memory::new();
        self.entry = Some(definition);

        Some(position)
    }

    /// Parses the macro defined by `token`, recording any problems with its
    /// header.
    fn parse_macro(&mut self, position: usize, token: &Token) -> Macro {
        let location = MacroLocation {
            definition: position,
            end:        self.tokens.block_end(position),
        };

        let Some(header) = MacroHeader::parse(&token.text) else {
            self.malformed(token, "missing macro name");
            return Macro {
                name: String::new(),
                takes: 0,
                returns: 0,
                location,
            };
        };

        if header.kind != "test" {
            if header.takes.is_none() {
                self.malformed(token, "missing `takes`");
            }
            if header.returns.is_none() {
                self.malformed(token, "missing `returns`");
            }
        }

        let takes = self.bounded_arity(token, header.takes, "`takes`");
        let returns = self.bounded_arity(token, header.returns, "`returns`");

        Macro {
            name: header.name,
            takes,
            returns,
            location,
        }
    }

    /// Limits a declared arity to what the stack can hold.
    fn bounded_arity(&mut self, token: &Token, arity: Option<usize>, keyword: &str) -> usize {
        let arity = arity.unwrap_or(0);
        if arity > MAXIMUM_STACK_DEPTH {
            let reason = format!("{keyword} exceeds the stack depth of {MAXIMUM_STACK_DEPTH}");
            self.malformed(token, &reason);
            return MAXIMUM_STACK_DEPTH;
        }
        arity
    }

    /// Calls the macro invoked by `token` at `position`.
    fn call(&mut self, position: usize, token: &Token) -> Option<usize> {
        let name = token.name();
        let limit = self.config.maximum_call_depth;
        if self.depth() >= limit {
            warn!(line = token.line, name, limit, "call depth exceeded");
            self.record(Error::CallDepthExceeded {
                name: name.to_string(),
                limit,
            });
            return Some(position);
        }

        if let Some(location) = self.tokens.macro_location(name) {
            self.frames.push(Frame {
                return_index: position,
                callee:       None,
            });
            self.pointer = location.definition;
            return None;
        }

        if let Some(external) = self.resolver.resolve_macro(name) {
            self.call_external(name, external);
            return Some(position);
        }

        warn!(line = token.line, name, "unresolved macro");
        self.record(Error::UnresolvedMacro {
            name: name.to_string(),
        });
        Some(position)
    }

    /// Executes a macro defined in another token stream with a nested
    /// interpreter that works on this interpreter's stack.
    fn call_external(&mut self, name: &str, external: ExternalMacro) {
        let ExternalMacro {
            tokens,
            location,
            resolver,
        } = external;
        let header = tokens
            .get(location.definition)
            .and_then(|token| MacroHeader::parse(&token.text));
        let (takes, returns) = header.map_or((0, 0), |header| {
            (header.takes.unwrap_or(0), header.returns.unwrap_or(0))
        });

        let depth = self.depth() + 1;
        debug!(name, depth, "entering external macro");

        let mut stack = std::mem::take(self.state.stack_mut());
        stack.cache(takes);

        let mut nested = VM::new(tokens, resolver, self.config.clone());
        nested.state = VMState::with_stack(stack);
        nested.depth_offset = depth;
        nested.steps = self.steps;
        nested.record_comments = false;
        nested.pointer = location.definition + 1;
        nested.run(location.end);

        self.steps = nested.steps;
        self.halted |= nested.halted;
        for error in Vec::from(nested.errors) {
            self.record(error.payload);
        }

        let mut stack = nested.state.into_stack();
        stack.uncache(returns);
        *self.state.stack_mut() = stack;
        debug!(name, depth, "leaving external macro");
    }

    /// Handles a `}` token at `position`.
    fn end_block(&mut self, position: usize) -> Option<usize> {
        match self.frames.last() {
            Some(Frame {
                callee: Some(callee),
                ..
            }) if callee.location.end == position => self.return_from_macro(),
            Some(_) => None,
            None => {
                let ends_entry = self
                    .entry
                    .as_ref()
                    .is_some_and(|entry| entry.location.end == position);
                if let Some(entry) = self.entry.take().filter(|_| ends_entry) {
                    self.state.stack_mut().uncache(entry.returns);
                    debug!(name = %entry.name, "finished macro");
                }
                None
            }
        }
    }

    /// Returns from the innermost macro call, resuming after the call token.
    fn return_from_macro(&mut self) -> Option<usize> {
        let frame = self.frames.pop()?;
        let returns = frame.callee.as_ref().map_or(0, |callee| callee.returns);
        self.state.stack_mut().uncache(returns);
        if let Some(callee) = &frame.callee {
            debug!(name = %callee.name, depth = self.depth(), "leaving macro");
        }

        self.pointer = frame.return_index + 1;
        self.line = self.tokens.get(frame.return_index).map_or(self.line, |token| token.line);
        Some(frame.return_index)
    }

    /// Records the current stack as the comment for the token at `anchor`, if
    /// that token ends its line.
    fn emit(&mut self, anchor: usize) {
        if !self.record_comments || !self.tokens.is_last_on_line(anchor) {
            return;
        }
        let Some(token) = self.tokens.get(anchor) else {
            return;
        };
        if token.kind == TokenKind::BlockEnd {
            return;
        }

        self.comments.push(LineComment {
            line:  token.end_line,
            stack: self.state.stack().display_string(),
        });
    }

    /// Records that the definition in `token` is malformed.
    fn malformed(&mut self, token: &Token, reason: &str) {
        warn!(line = token.line, reason, "malformed definition");
        self.record(Error::MalformedDefinition {
            text:   token.text.clone(),
            reason: reason.to_string(),
        });
    }
}

/// The outcome of a completed interpreter pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionResult {
    /// The stack comments in the order that they were recorded.
    pub comments: Vec<LineComment>,

    /// The diagnostics recorded during the pass.
    pub errors: Errors,

    /// Whether the pass stopped early because the step budget ran out.
    pub halted: bool,
}

/// A macro as the interpreter sees it.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Macro {
    name:     String,
    takes:    usize,
    returns:  usize,
    location: MacroLocation,
}

/// A macro call that has not yet returned.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Frame {
    /// The position of the call token.
    return_index: usize,

    /// The macro that was called, known once its definition has been
    /// executed.
    callee: Option<Macro>,
}

/// The configuration for the interpreter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The maximum depth of nested macro calls. Calls beyond it are skipped.
    pub maximum_call_depth: usize,

    /// The maximum number of tokens that a pass will execute before it halts.
    pub maximum_steps: usize,

    /// The largest byte offset that concrete memory operations may reach.
    /// Operations that would go beyond it are treated as symbolic.
    pub maximum_memory_offset: usize,
}

impl Config {
    /// Sets the `maximum_call_depth` config parameter to `value`.
    #[must_use]
    pub fn with_maximum_call_depth(mut self, value: usize) -> Self {
        self.maximum_call_depth = value;
        self
    }

    /// Sets the `maximum_steps` config parameter to `value`.
    #[must_use]
    pub fn with_maximum_steps(mut self, value: usize) -> Self {
        self.maximum_steps = value;
        self
    }

    /// Sets the `maximum_memory_offset` config parameter to `value`.
    #[must_use]
    pub fn with_maximum_memory_offset(mut self, value: usize) -> Self {
        self.maximum_memory_offset = value;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        let maximum_call_depth = DEFAULT_MAXIMUM_CALL_DEPTH;
        let maximum_steps = DEFAULT_MAXIMUM_STEPS;
        let maximum_memory_offset = DEFAULT_MAXIMUM_MEMORY_OFFSET;
        Self {
            maximum_call_depth,
            maximum_steps,
            maximum_memory_offset,
        }
    }
}
