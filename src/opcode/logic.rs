//! Opcodes that perform comparisons and bitwise logic on the EVM.
//!
//! Comparisons fold to `0x1` when they hold and `0x0` otherwise.

use crate::{
    opcode::util::{binary, unary},
    vm::VM,
};

/// The `LT` opcode performs an unsigned less-than comparison.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a < b` |
/// | 2           | `b`   |         |
pub fn lt(vm: &mut VM) {
    binary(vm, |a, b| a.lt(b), |a, b| format!("{a} < {b}"));
}

/// The `GT` opcode performs an unsigned greater-than comparison.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a > b` |
/// | 2           | `b`   |         |
pub fn gt(vm: &mut VM) {
    binary(vm, |a, b| a.gt(b), |a, b| format!("{a} > {b}"));
}

/// The `SLT` opcode performs a signed less-than comparison.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a < b` |
/// | 2           | `b`   |         |
pub fn slt(vm: &mut VM) {
    binary(vm, |a, b| a.signed_lt(b), |a, b| format!("{a} < {b}"));
}

/// The `SGT` opcode performs a signed greater-than comparison.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a > b` |
/// | 2           | `b`   |         |
pub fn sgt(vm: &mut VM) {
    binary(vm, |a, b| a.signed_gt(b), |a, b| format!("{a} > {b}"));
}

/// The `EQ` opcode performs an equality comparison.
///
/// # Semantics
///
/// | Stack Index | Input | Output   |
/// | :---------: | :---: | :------: |
/// | 1           | `a`   | `a == b` |
/// | 2           | `b`   |          |
pub fn eq(vm: &mut VM) {
    binary(vm, |a, b| a.eq(b), |a, b| format!("{a} == {b}"));
}

/// The `ISZERO` opcode checks if its operand is zero.
///
/// # Semantics
///
/// | Stack Index | Input | Output   |
/// | :---------: | :---: | :------: |
/// | 1           | `a`   | `a == 0` |
pub fn iszero(vm: &mut VM) {
    unary(vm, |a| a.is_zero(), |a| format!("{a} == 0"));
}

/// The `AND` opcode performs bitwise conjunction.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a & b` |
/// | 2           | `b`   |         |
pub fn and(vm: &mut VM) {
    binary(vm, |a, b| a & b, |a, b| format!("{a} & {b}"));
}

/// The `OR` opcode performs bitwise disjunction.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a \| b` |
/// | 2           | `b`   |         |
pub fn or(vm: &mut VM) {
    binary(vm, |a, b| a | b, |a, b| format!("{a} | {b}"));
}

/// The `XOR` opcode performs bitwise exclusive disjunction.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a ^ b` |
/// | 2           | `b`   |         |
pub fn xor(vm: &mut VM) {
    binary(vm, |a, b| a ^ b, |a, b| format!("{a} ^ {b}"));
}

/// The `NOT` opcode performs bitwise negation.
///
/// # Semantics
///
/// | Stack Index | Input | Output |
/// | :---------: | :---: | :----: |
/// | 1           | `a`   | `~a`   |
pub fn not(vm: &mut VM) {
    unary(vm, |a| !a, |a| format!("~{a}"));
}

/// The `BYTE` opcode retrieves a single byte from a word, counting from the
/// most significant end.
///
/// # Semantics
///
/// | Stack Index | Input | Output       |
/// | :---------: | :---: | :----------: |
/// | 1           | `i`   | `byte(i, x)` |
/// | 2           | `x`   |              |
///
/// An index of 32 or more yields zero.
pub fn byte(vm: &mut VM) {
    binary(vm, |i, x| x.byte(i), |i, x| format!("byte({i}, {x})"));
}

/// The `SHL` opcode performs a left shift.
///
/// # Semantics
///
/// | Stack Index | Input   | Output           |
/// | :---------: | :-----: | :--------------: |
/// | 1           | `shift` | `value << shift` |
/// | 2           | `value` |                  |
pub fn shl(vm: &mut VM) {
    binary(
        vm,
        |shift, value| value << shift,
        |shift, value| format!("{value} << {shift}"),
    );
}

/// The `SHR` opcode performs a logical right shift.
///
/// # Semantics
///
/// | Stack Index | Input   | Output           |
/// | :---------: | :-----: | :--------------: |
/// | 1           | `shift` | `value >> shift` |
/// | 2           | `value` |                  |
pub fn shr(vm: &mut VM) {
    binary(
        vm,
        |shift, value| value >> shift,
        |shift, value| format!("{value} >> {shift}"),
    );
}

/// The `SAR` opcode performs an arithmetic (sign-preserving) right shift.
///
/// # Semantics
///
/// | Stack Index | Input   | Output           |
/// | :---------: | :-----: | :--------------: |
/// | 1           | `shift` | `value >> shift` |
/// | 2           | `value` |                  |
///
/// The sign of `value` is preserved when folding, but the rendered
/// expression does not distinguish this from `SHR`.
pub fn sar(vm: &mut VM) {
    binary(
        vm,
        |shift, value| value.sar(shift),
        |shift, value| format!("{value} >> {shift}"),
    );
}
