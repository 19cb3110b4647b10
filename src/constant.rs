//! This module contains constants that are needed throughout the codebase.

/// The maximum stack depth for the EVM.
pub const MAXIMUM_STACK_DEPTH: usize = 1024;

/// The width of word on the EVM in bits.
pub const WORD_SIZE_BITS: usize = 256;

/// The width of a byte on the EVM (and most other places) in bits.
pub const BYTE_SIZE_BITS: usize = 8;

/// The width of a word on the EVM in bytes.
pub const WORD_SIZE_BYTES: usize = WORD_SIZE_BITS / BYTE_SIZE_BITS;

/// The number of bytes in a function, event or error selector.
pub const SELECTOR_SIZE_BYTES: usize = 4;

/// The highest `N` for which the `DUPN` and `SWAPN` opcodes exist.
pub const MAXIMUM_DUP_SWAP_DEPTH: u8 = 16;

/// The highest number of topics accepted by a `LOGN` opcode.
pub const MAXIMUM_LOG_TOPICS: u8 = 4;

/// The length of a run of identical characters at which a rendered stack
/// value gets compressed to `first2...last1`.
pub const DIGIT_RUN_COMPRESSION_THRESHOLD: usize = 5;

/// Symbolic operands longer than this are clipped when used as the index of
/// a `mem[...]` or `storage[...]` expression.
pub const CLIPPED_OPERAND_MAX_LENGTH: usize = 10;

/// Symbolic operands longer than this are clipped when used as the argument
/// of a `balanceOf(...)` expression.
pub const CLIPPED_ACCOUNT_MAX_LENGTH: usize = 20;

/// The prefix written before every generated stack comment.
pub const STACK_COMMENT_PREFIX: &str = "// ";

/// The default maximum depth of nested macro invocations.
pub const DEFAULT_MAXIMUM_CALL_DEPTH: usize = 1024;

/// The default maximum number of tokens that a single interpreter pass will
/// step through before giving up.
pub const DEFAULT_MAXIMUM_STEPS: usize = 10_000_000;

/// The default largest byte offset that concrete memory operations may
/// address.
///
/// Anything beyond this is treated as symbolic.
pub const DEFAULT_MAXIMUM_MEMORY_OFFSET: usize = (1 << 31) - 1;

/// The text of the value that stands in for an operand popped from an empty
/// stack.
pub const STACK_UNDERFLOW_PLACEHOLDER: &str = "?";
