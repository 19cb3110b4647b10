//! This module is an integration test that checks how the interpreter tracks
//! memory through stores, copies, and hashes.
#![cfg(test)]

use huff_stack_comments::{document::loader::MemoryLoader, vm};

mod common;

#[test]
fn loads_what_was_stored() -> anyhow::Result<()> {
    let source = "0x1234 0x00 mstore\n0x00 mload";
    assert_eq!(common::last_comment(source)?, "[0x1234]");

    Ok(())
}

#[test]
fn unaligned_loads_span_two_words() -> anyhow::Result<()> {
    let source = "
        0x20 0x00 mstore
        0x01 0x00 sub
        0x20 mstore

        0x00 mload
        0x20 mload
        0x00 mload
        0x02 mload
    ";
    assert_eq!(common::last_comment(source)?, "[0x20ffff, 0x20, 0xff...f, 0x20]");

    Ok(())
}

#[test]
fn symbolic_offsets_leave_memory_alone() -> anyhow::Result<()> {
    assert_eq!(common::last_comment("0x20 codesize mstore")?, "[]");
    assert_eq!(
        common::last_comment("0x20 codesize mstore\ncodesize mload")?,
        "[mem[codeSize]]"
    );

    Ok(())
}

#[test]
fn unknown_stores_make_memory_unknown() -> anyhow::Result<()> {
    let source = "0x07 0x00 mstore\ncaller 0x00 mstore\n0x00 mload";
    assert_eq!(common::last_comment(source)?, "[mem[0x00]]");

    Ok(())
}

#[test]
fn mstore8_zeroes_the_rest_of_the_word() -> anyhow::Result<()> {
    let source = "0xabcd 0x00 mstore8\n0x00 mload";
    assert_eq!(common::last_comment(source)?, "[0xcd00...0]");

    Ok(())
}

#[test]
fn reads_past_written_memory_are_unknown() -> anyhow::Result<()> {
    let source = "0x01 0x00 mstore\n0x10 mload";
    assert_eq!(common::last_comment(source)?, "[mem[0x10]]");

    Ok(())
}

#[test]
fn hashes_known_memory() -> anyhow::Result<()> {
    let source = "0x00 0x00 mstore\n0x20 0x00 sha3";
    assert_eq!(
        common::last_comment(source)?,
        "[0x290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563]"
    );

    let empty = "0x00 0x40 sha3";
    assert_eq!(
        common::last_comment(empty)?,
        "[0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470]"
    );

    let unknown = "0x20 0x00 keccak256";
    assert_eq!(common::last_comment(unknown)?, "[hash]");

    Ok(())
}

#[test]
fn mcopy_carries_known_bytes() -> anyhow::Result<()> {
    let source = "0x07 0x00 mstore\n0x20 0x00 0x20 mcopy\n0x20 mload";
    assert_eq!(common::last_comment(source)?, "[0x7]");

    Ok(())
}

#[test]
fn external_copies_forget_their_destination() -> anyhow::Result<()> {
    let source = "0x07 0x00 mstore\n0x20 0x00 0x00 calldatacopy\n0x00 mload";
    assert_eq!(common::last_comment(source)?, "[mem[0x00]]");

    Ok(())
}

#[test]
fn memory_is_fresh_for_each_macro() -> anyhow::Result<()> {
    let source = "
#define macro FIRST() = takes(0) returns(0) {
    0x07 0x00 mstore
}

#define macro SECOND() = takes(0) returns(0) {
    0x00 mload
}
";
    assert_eq!(common::last_comment(source)?, "[mem[0x00]]");

    Ok(())
}

#[test]
fn huge_offsets_are_reported() {
    let analyzer = common::analyze("0x01 0xffffffffff mstore\n0xffffffffff mload");
    let messages: Vec<String> = analyzer
        .diagnostics()
        .payloads()
        .iter()
        .map(|error| error.payload.to_string())
        .collect();

    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("0xffffffffff"));
    assert_eq!(analyzer.comments().last().map(|c| c.stack.as_str()), Some("[mem[0xff...ff]]"));
}

#[test]
fn the_memory_limit_is_configurable() {
    let config = vm::Config::default().with_maximum_memory_offset(0x40);

    let within = common::analyze_with("0x01 0x20 mstore", MemoryLoader::new(), config.clone());
    assert!(within.diagnostics().is_empty());

    let beyond = common::analyze_with("0x01 0x21 mstore", MemoryLoader::new(), config);
    assert_eq!(beyond.diagnostics().len(), 1);
}
