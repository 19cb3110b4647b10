//! This module is an integration test that checks the effect of each opcode on
//! the stack, with operands given as bare tokens outside of any macro.
#![cfg(test)]

mod common;

/// Asserts that the last stack recorded for `source` renders as `expected`.
fn assert_last(source: &str, expected: &str) -> anyhow::Result<()> {
    assert_eq!(common::last_comment(source)?, expected, "for source {source:?}");
    Ok(())
}

#[test]
fn environment_opcodes_push_named_values() -> anyhow::Result<()> {
    let cases = [
        ("address", "[currentAddress]"),
        ("origin", "[origin]"),
        ("caller", "[caller]"),
        ("callvalue", "[callValue]"),
        ("calldatasize", "[calldataSize]"),
        ("codesize", "[codeSize]"),
        ("gasprice", "[gasPrice]"),
        ("returndatasize", "[returndataSize]"),
        ("coinbase", "[minerAddress]"),
        ("timestamp", "[timestamp]"),
        ("number", "[blockNumber]"),
        ("prevrandao", "[prevRandao]"),
        ("difficulty", "[prevRandao]"),
        ("gaslimit", "[gasLimit]"),
        ("chainid", "[chainId]"),
        ("selfbalance", "[selfBalance]"),
        ("basefee", "[baseFee]"),
        ("blobbasefee", "[blobBaseFee]"),
        ("msize", "[msize]"),
        ("pc", "[PC]"),
        ("gas", "[gasLeft]"),
    ];

    for (source, expected) in cases {
        assert_last(source, expected)?;
    }

    Ok(())
}

#[test]
fn account_queries_replace_their_operand() -> anyhow::Result<()> {
    let address = "0x1234123412341234123412341234123412341234";
    assert_last(&format!("{address}\nextcodesize"), "[extCodeSize]")?;
    assert_last(&format!("{address}\nextcodehash"), "[extCodeHash]")?;
    assert_last("0xff blockhash", "[blockHash]")?;
    assert_last("0x00 blobhash", "[blobHash]")?;

    Ok(())
}

#[test]
fn balance_clips_long_accounts() -> anyhow::Result<()> {
    let source = "
        0x1234123412341234123412341234123412341234
        balance
        [CONST_ADDRESS]
        balance
        [CONST_ADDRESS_VERY_LONG_NAME]
        balance
    ";
    assert_last(
        source,
        "[balanceOf(CONS...ME), balanceOf(CONST_ADDRESS), balanceOf(0x12...34)]",
    )
}

#[test]
fn calls_and_creates_consume_their_operands() -> anyhow::Result<()> {
    let six = "0x00 0x20\n0x00 0x20\n0x00 0x00\n";
    assert_last(&format!("{six}delegatecall"), "[success?]")?;
    assert_last(&format!("{six}staticcall"), "[success?]")?;

    let seven = "0x00 0x00\n0x00 0x00\n0x00\n0x1234123412341234123412341234123412341234\ngas\n";
    assert_last(&format!("{seven}call"), "[success?]")?;
    assert_last(&format!("{seven}callcode"), "[success?]")?;

    assert_last("0xff 0x00 0x00\ncreate", "[newAddress]")?;
    assert_last("[SALT] 0xff 0x00 0x00\ncreate2", "[newAddress]")?;

    Ok(())
}

#[test]
fn halting_and_storing_opcodes_consume_their_operands() -> anyhow::Result<()> {
    let cases = [
        "0x00 0x00 0x00 returndatacopy",
        "0x00 0x00 0x00 calldatacopy",
        "0xf7 0x00 0x00 codecopy",
        "0x20 0x00 0x00 0x1234123412341234123412341234123412341234\nextcodecopy",
        "0x00 selfdestruct",
        "0x00 0x20 mstore",
        "0xff 0x00 mstore8",
        "0xfffff 0x20 sstore",
        "0xfffff 0x20 tstore",
        "0x00 0x20 return",
        "0x00 0x20 revert",
        "0x01 pop",
        "0x20 0x00\nlog0",
        "0x20 0x00\n0xaa\nlog1",
        "0x20 0x00\n0xaa\n0xbb\nlog2",
        "0x20 0x00\n0xaa\n0xbb\n0xcc\nlog3",
        "0x20 0x00\n0xaa\n0xbb\n0xcc\n0xdd\nlog4",
    ];

    for source in cases {
        assert_last(source, "[]")?;
    }

    Ok(())
}

#[test]
fn no_op_opcodes_leave_the_stack_alone() -> anyhow::Result<()> {
    for opcode in ["stop", "jumpdest", "invalid"] {
        assert_last(&format!("0x01 {opcode}"), "[0x01]")?;
    }
    assert_last("push0", "[0x0]")?;

    Ok(())
}

#[test]
fn loads_render_their_keys() -> anyhow::Result<()> {
    assert_last("0x00 calldataload", "[calldata[0x00]]")?;
    assert_last(
        "0x00 mload\n[CONST_VAR] mload\n[CONST_VAR_VERY_LONG_NAME] mload",
        "[mem[CONS...ME], mem[CONST_VAR], mem[0x00]]",
    )?;
    assert_last(
        "0x00 sload\n[CONST_VAR] sload\n\
         0x4242424242424242424242424242424242424242424242424242424242424242 sload",
        "[storage[0x42...42], storage[CONST_VAR], storage[0x00]]",
    )?;
    assert_last("0x00 tload", "[transient[0x00]]")?;

    Ok(())
}

#[test]
fn arithmetic_folds_known_operands() -> anyhow::Result<()> {
    assert_last("0x01 0x02 add", "[0x3]")?;
    assert_last("0x01 0x03 sub", "[0x2]")?;
    assert_last("0x03 0x04 mul", "[0xc]")?;
    assert_last("0x00 0x0a div", "[0x0]")?;
    assert_last("0x03 0x0a mod", "[0x1]")?;
    assert_last("0x02 0x03 exp", "[0x9]")?;
    assert_last("0xff 0x00 signextend", "[0xff...f]")?;
    assert_last("0x01 0x00 sub", "[0xff...f]")?;
    assert_last("0x00 0x01 sub", "[0x1]")?;

    Ok(())
}

#[test]
fn arithmetic_renders_unknown_operands() -> anyhow::Result<()> {
    assert_last("0x01 callvalue add", "[callValue + 0x01]")?;
    assert_last("0x01 callvalue sub", "[callValue - 0x01]")?;
    assert_last("caller 0x20 div", "[0x20 / caller]")?;
    assert_last("0x02 [BASE] exp", "[BASE ** 0x02]")?;

    Ok(())
}

#[test]
fn modular_arithmetic_does_not_overflow() -> anyhow::Result<()> {
    let max = format!("0x{}", "F".repeat(64));

    let addmod = format!("20\n0xa\n20\naddmod\n2\n2\n{max}\naddmod\n[CONST_VAR]\n0xa\ncodesize\naddmod");
    assert_last(&addmod, "[(codeSize + 0xa) % CONST_VAR, 0x1, 0xa]")?;

    let mulmod =
        format!("8\n10\n10\nmulmod\n12\n{max}\n{max}\nmulmod\n[CONST_VAR]\n0xa\ncodesize\nmulmod");
    assert_last(&mulmod, "[(codeSize * 0xa) % CONST_VAR, 0x9, 0x4]")?;

    Ok(())
}

#[test]
fn signed_division_uses_twos_complement() -> anyhow::Result<()> {
    let sdiv = format!(
        "10\n10\nsdiv\n0x{}\n0x{}E\nsdiv",
        "F".repeat(64),
        "F".repeat(63)
    );
    assert_last(&sdiv, "[0x2, 0x1]")?;

    let smod = format!(
        "3\n10\nsmod\n0x{}D\n0x{}8\nsmod",
        "F".repeat(63),
        "F".repeat(63)
    );
    assert_last(&smod, "[0xff...fe, 0x1]")?;

    Ok(())
}

#[test]
fn iszero_folds_or_renders() -> anyhow::Result<()> {
    let source = "0xa\niszero\n0x00\niszero\n0\niszero\n[CONST_VAR]\niszero\ncodesize\niszero";
    assert_last(source, "[codeSize == 0, CONST_VAR == 0, 0x1, 0x1, 0x0]")
}

#[test]
fn comparisons_and_bitwise_logic() -> anyhow::Result<()> {
    assert_last("0x02 0x01 lt", "[0x1]")?;
    assert_last("0x02 0x01 gt", "[0x0]")?;
    assert_last(&format!("0x01 0x{} slt", "f".repeat(64)), "[0x1]")?;
    assert_last("0x01 caller eq", "[caller == 0x01]")?;
    assert_last("0x0f 0xf0 and", "[0x0]")?;
    assert_last("0x0f 0xf0 or", "[0xff]")?;
    assert_last("0xff 0x0f xor", "[0xf0]")?;
    assert_last("0x00 not", "[0xff...f]")?;
    assert_last("callvalue not", "[~callValue]")?;
    assert_last("0xabcd 0x1e byte", "[0xab]")?;

    Ok(())
}

#[test]
fn shifts_fold_or_render() -> anyhow::Result<()> {
    assert_last("0x01 0x04 shl", "[0x10]")?;
    assert_last("0x10 0x04 shr", "[0x1]")?;
    assert_last(&format!("0x{}0 0x04 sar", "F".repeat(63)), "[0xff...f]")?;
    assert_last("0x00 calldataload 0xE0 shr", "[calldata[0x00] >> 0xE0]")?;
    assert_last("callvalue 0x04 shl", "[callValue << 0x04]")?;

    Ok(())
}

#[test]
fn dup_copies_the_nth_item() -> anyhow::Result<()> {
    for n in 1..=16usize {
        let pushes = (0..n).map(|i| format!("0x{i:02x}")).collect::<Vec<_>>().join(" ");
        let rest = (0..n).rev().map(|i| format!("0x{i:02x}")).collect::<Vec<_>>();
        let expected = format!("[0x{:02x}, {}]", 0, rest.join(", "));

        assert_last(&format!("{pushes}\ndup{n}"), &expected)?;
    }

    Ok(())
}

#[test]
fn swap_exchanges_the_top_with_the_nth_item_below() -> anyhow::Result<()> {
    for n in 1..=16usize {
        let pushes = (0..=n).map(|i| format!("0x{i:02x}")).collect::<Vec<_>>().join(" ");
        let middle = (1..n).rev().map(|i| format!("0x{i:02x}, "));
        let expected = format!("[0x00, {}0x{n:02x}]", middle.collect::<String>());

        assert_last(&format!("{pushes}\nswap{n}"), &expected)?;
    }

    Ok(())
}

#[test]
fn jumps_consume_their_operands() -> anyhow::Result<()> {
    assert_last("0xaa 0x01\ndest jumpi", "[0xaa]")?;
    assert_last("0xaa\ndest jump", "[0xaa]")?;

    Ok(())
}

#[test]
fn missing_operands_are_reported() {
    let analyzer = common::analyze("0x01 add");

    assert_eq!(analyzer.comments()[0].stack, "[0x01 + ?]");
    assert_eq!(analyzer.diagnostics().len(), 1);
}
