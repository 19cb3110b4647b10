//! The state representation for the interpreter, and utilities for dealing
//! with said representation.

pub mod memory;
pub mod stack;

use crate::vm::state::{memory::Memory, stack::Stack};

/// The state representation for the [`super::VM`].
///
/// Each interpreter instance, including those nested for macros defined in
/// other documents, owns exactly one of these.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VMState {
    stack:  Stack,
    memory: Memory,
}

impl VMState {
    /// Constructs a new state with an empty stack and empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new state that starts from the provided `stack`.
    #[must_use]
    pub fn with_stack(stack: Stack) -> Self {
        let memory = Memory::new();
        Self { stack, memory }
    }

    /// Gets the stack.
    #[must_use]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Gets the stack for modification.
    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Gets the memory.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Gets the memory for modification.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Consumes the state, keeping only its stack.
    #[must_use]
    pub fn into_stack(self) -> Stack {
        self.stack
    }
}
