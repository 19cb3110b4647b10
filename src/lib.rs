//! This library generates stack comments for [Huff](https://huff.sh) source
//! code. For every line of a macro body, it works out what the EVM stack holds
//! after that line runs, and writes it as a trailing `// [top, ...]` comment.
//! It is a _best effort_ analysis.
//!
//! Note that this library never runs the code on a real EVM, and is not
//! intended to evolve into a full Huff compiler.
//!
//! # How it Works
//!
//! From a very high level, the comment generation process is performed as
//! follows:
//!
//! 1. Source text is loaded into a [`document::Document`], which lexes it into
//!    a [`lexer::TokenStream`] and recursively loads every `#include`d
//!    document.
//! 2. The tokens are executed symbolically on a [`vm::VM`]. Each stack cell
//!    is a [`vm::value::SymbolicValue`], which is either a concrete 256-bit
//!    [`vm::value::Word`] or the text of an expression standing in for a
//!    runtime value. Operations fold where all of their operands are known.
//! 3. Macro calls are followed into their definitions, including those in
//!    included documents, with the caller's stack hidden beneath the callee's
//!    inputs until it returns.
//! 4. After each line, the stack is recorded as a [`comment::LineComment`],
//!    and the comments are finally written into the source text.
//!
//! # Basic Usage
//!
//! For the most basic usage of the library, it is sufficient to construct an
//! `Analyzer` and call the `.analyze` method, passing your configuration.
//!
//! ```
//! use huff_stack_comments as hsc;
//! use huff_stack_comments::{
//!     document::{loader::MemoryLoader, Document},
//!     vm,
//! };
//!
//! let source = "#define macro MAIN() = takes(0) returns(0) {\n    0x01 0x02 add\n}";
//! let document = Document::from_source("main.huff", source, &MemoryLoader::new());
//!
//! let analyzer = hsc::new(document).analyze(vm::Config::default());
//!
//! assert_eq!(analyzer.comments().last().unwrap().stack, "[0x3]");
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod analyzer;
pub mod comment;
pub mod constant;
pub mod document;
pub mod error;
pub mod lexer;
pub mod opcode;
pub mod utility;
pub mod vm;

// Re-exports to provide the library interface.
pub use analyzer::new;
