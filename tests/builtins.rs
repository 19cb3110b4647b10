//! This module is an integration test that checks the values pushed by the
//! Huff compiler builtins.
#![cfg(test)]

mod common;

#[test]
fn function_selectors_resolve_by_name_or_signature() -> anyhow::Result<()> {
    let by_name = "
        #define function testFunction(uint256, bytes32) view returns(bytes memory)
        __FUNC_SIG(testFunction)
    ";
    assert_eq!(common::last_comment(by_name)?, "[0xa458e8ac]");

    let by_signature = "__FUNC_SIG(testFunction(uint256,bytes32))";
    assert_eq!(common::last_comment(by_signature)?, "[0xa458e8ac]");

    let quoted = "__FUNC_SIG(\"testFunction(uint256, bytes32)\")";
    assert_eq!(common::last_comment(quoted)?, "[0xa458e8ac]");

    Ok(())
}

#[test]
fn definitions_after_their_use_still_resolve() -> anyhow::Result<()> {
    let source = "
        #define macro MAIN() = takes(0) returns(0) {
            __FUNC_SIG(testFunction)
        }
        #define function testFunction(uint256, bytes32) view returns(bytes memory)
    ";
    let comments = common::all_comments(source);
    assert_eq!(comments, vec!["[]", "[0xa458e8ac]"]);

    Ok(())
}

#[test]
fn error_selectors() -> anyhow::Result<()> {
    let by_name = "
        #define error InsufficientAllowance()
        __ERROR(InsufficientAllowance)
    ";
    assert_eq!(common::last_comment(by_name)?, "[0x13be252b]");
    assert_eq!(common::last_comment("__ERROR(InsufficientAllowance())")?, "[0x13be252b]");

    Ok(())
}

#[test]
fn event_hashes() -> anyhow::Result<()> {
    let by_name = "
        #define event Transfer(address indexed from, address indexed to, uint256 amount)
        __EVENT_HASH(Transfer)
    ";
    assert_eq!(common::last_comment(by_name)?, "[0xddf252ad]");
    assert_eq!(
        common::last_comment("__EVENT_HASH(Transfer(address,address,uint256))")?,
        "[0xddf252ad]"
    );

    Ok(())
}

#[test]
fn unknown_names_are_hashed_as_written() -> anyhow::Result<()> {
    let source = "__FUNC_SIG(transfer)";
    let expected = huff_stack_comments::opcode::builtin::selector("transfer");
    assert_eq!(common::last_comment(source)?, format!("[{}]", expected.text()));

    Ok(())
}

#[test]
fn right_padding() -> anyhow::Result<()> {
    assert_eq!(common::last_comment("__RIGHTPAD(10)")?, "[__RIGHTPAD(10)]");
    assert_eq!(common::last_comment("__RIGHTPAD(0xaa)")?, "[0xaa00...0]");

    Ok(())
}

#[test]
fn sizes_and_offsets_stay_symbolic() -> anyhow::Result<()> {
    assert_eq!(common::last_comment("__codesize(10)")?, "[__codesize(10)]");
    assert_eq!(common::last_comment("__codesize(MACRO1)")?, "[__codesize(MACRO1)]");
    assert_eq!(common::last_comment("__tablesize(TABLE)")?, "[__tablesize(TABLE)]");

    let table = "
        #define jumptable SWITCH_TABLE {
            jump_one jump_two jump_three jump_four
        }
        __tablestart(SWITCH_TABLE)
    ";
    assert_eq!(common::last_comment(table)?, "[__tablestart(SWITCH_TABLE)]");

    Ok(())
}

#[test]
fn verbatim_leaves_the_stack_alone() -> anyhow::Result<()> {
    assert_eq!(common::last_comment("0x01\n__VERBATIM(0x5f)")?, "[0x01]");

    Ok(())
}
