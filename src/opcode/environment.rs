//! Opcodes that query the execution environment and the chain.
//!
//! None of these values are known ahead of execution, so these opcodes only
//! ever produce symbolic results.

use crate::{
    constant::CLIPPED_ACCOUNT_MAX_LENGTH,
    opcode::{
        util::{discard, memory_range, replace},
        Opcode,
    },
    utility::clip,
    vm::{value::SymbolicValue, VM},
};

/// Executes an `opcode` whose result is an opaque named value, such as
/// `CALLER` (`caller`) or `CALL` (`success?`).
///
/// # Semantics
///
/// | Stack Index | Input                 | Output          |
/// | :---------: | :-------------------: | :-------------: |
/// | 1..=n       | the opcode's operands | the named value |
pub fn opaque(vm: &mut VM, opcode: Opcode) {
    let name = opcode.result_name().unwrap_or("?");
    replace(vm, opcode.arg_count(), name);
}

/// The `BALANCE` opcode gets the balance of an account.
///
/// # Semantics
///
/// | Stack Index | Input     | Output               |
/// | :---------: | :-------: | :------------------: |
/// | 1           | `address` | `balanceOf(address)` |
///
/// Long address texts are clipped.
pub fn balance(vm: &mut VM) {
    let address = vm.pop();
    let address = clip(address.text(), CLIPPED_ACCOUNT_MAX_LENGTH);
    vm.push(SymbolicValue::symbolic(format!("balanceOf({address})")));
}

/// The `CALLDATALOAD` opcode reads a word from the calldata.
///
/// # Semantics
///
/// | Stack Index | Input    | Output             |
/// | :---------: | :------: | :----------------: |
/// | 1           | `offset` | `calldata[offset]` |
pub fn calldataload(vm: &mut VM) {
    let offset = vm.pop();
    vm.push(SymbolicValue::symbolic(format!("calldata[{offset}]")));
}

/// Executes the opcodes that copy data from outside the interpreter into
/// memory: `CALLDATACOPY`, `CODECOPY`, `RETURNDATACOPY`, and, with a
/// `leading` address operand, `EXTCODECOPY`.
///
/// # Semantics
///
/// | Stack Index | Input        | Output |
/// | :---------: | :----------: | :----: |
/// | 1           | `destOffset` |        |
/// | 2           | `offset`     |        |
/// | 3           | `size`       |        |
///
/// The destination region is marked as unknown when both `destOffset` and
/// `size` are known. Otherwise memory is left as is.
pub fn copy_external(vm: &mut VM, leading: usize) {
    discard(vm, leading);
    let destination = vm.pop();
    let _offset = vm.pop();
    let size = vm.pop();

    if let Some((destination, size)) = memory_range(vm, &destination, &size) {
        vm.state_mut().memory_mut().forget(destination, size);
    }
}
