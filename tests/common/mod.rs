//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use anyhow::anyhow;
use huff_stack_comments as hsc;
use huff_stack_comments::{
    analyzer::{state::ExecutionComplete, Analyzer},
    document::{loader::MemoryLoader, Document},
    vm,
};

/// The path at which test sources claim to live.
pub const MAIN_PATH: &str = "src/main.huff";

/// Analyzes the Huff `source` on its own, using the default configuration.
#[allow(unused)] // It is actually
pub fn analyze(source: &str) -> Analyzer<ExecutionComplete> {
    analyze_with(source, MemoryLoader::new(), vm::Config::default())
}

/// Analyzes the Huff `source`, loading any includes from `loader` and running
/// the interpreter with `config`.
#[allow(unused)] // It is actually
pub fn analyze_with(
    source: &str,
    loader: MemoryLoader,
    config: vm::Config,
) -> Analyzer<ExecutionComplete> {
    let document = Document::from_source(MAIN_PATH, source, &loader);
    hsc::new(document).analyze(config)
}

/// Gets every stack recorded while analyzing `source`, in the order that
/// they were recorded.
#[allow(unused)] // It is actually
pub fn all_comments(source: &str) -> Vec<String> {
    analyze(source)
        .comments()
        .iter()
        .map(|comment| comment.stack.clone())
        .collect()
}

/// Gets the last stack recorded while analyzing `source`.
#[allow(unused)] // It is actually
pub fn last_comment(source: &str) -> anyhow::Result<String> {
    all_comments(source)
        .pop()
        .ok_or_else(|| anyhow!("No comments were recorded"))
}
