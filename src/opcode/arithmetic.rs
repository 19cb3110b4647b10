//! Opcodes that perform arithmetic operations on the EVM.
//!
//! Each of these folds to a known value when all of its operands are known,
//! and otherwise renders an expression over the texts of its operands.

use crate::{
    opcode::util::{binary, ternary},
    vm::VM,
};

/// The `ADD` opcode performs addition.
///
/// # Semantics
///
/// | Stack Index | Input | Output             |
/// | :---------: | :---: | :----------------: |
/// | 1           | `a`   | `(a + b) % 2**256` |
/// | 2           | `b`   |                    |
///
/// Renders as `a + b` when it cannot be folded.
pub fn add(vm: &mut VM) {
    binary(vm, |a, b| a + b, |a, b| format!("{a} + {b}"));
}

/// The `MUL` opcode performs multiplication.
///
/// # Semantics
///
/// | Stack Index | Input | Output             |
/// | :---------: | :---: | :----------------: |
/// | 1           | `a`   | `(a * b) % 2**256` |
/// | 2           | `b`   |                    |
///
/// Renders as `a * b` when it cannot be folded.
pub fn mul(vm: &mut VM) {
    binary(vm, |a, b| a * b, |a, b| format!("{a} * {b}"));
}

/// The `SUB` opcode performs subtraction.
///
/// # Semantics
///
/// | Stack Index | Input | Output             |
/// | :---------: | :---: | :----------------: |
/// | 1           | `a`   | `(a - b) % 2**256` |
/// | 2           | `b`   |                    |
///
/// Renders as `a - b` when it cannot be folded.
pub fn sub(vm: &mut VM) {
    binary(vm, |a, b| a - b, |a, b| format!("{a} - {b}"));
}

/// The `DIV` opcode performs unsigned integer division.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a / b` |
/// | 2           | `b`   |         |
///
/// Division by zero yields zero. Renders as `a / b` when it cannot be folded.
pub fn div(vm: &mut VM) {
    binary(vm, |a, b| a / b, |a, b| format!("{a} / {b}"));
}

/// The `SDIV` opcode performs signed integer division, where the operands are
/// interpreted as two's complement.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a / b` |
/// | 2           | `b`   |         |
///
/// Division by zero yields zero, and the quotient is negative exactly when
/// the operands disagree in sign. Renders as `a / b` when it cannot be folded.
pub fn sdiv(vm: &mut VM) {
    binary(vm, |a, b| a.signed_div(b), |a, b| format!("{a} / {b}"));
}

/// The `MOD` opcode computes the unsigned modulus.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a % b` |
/// | 2           | `b`   |         |
///
/// A modulus of zero yields zero. Renders as `a % b` when it cannot be
/// folded.
pub fn modulo(vm: &mut VM) {
    binary(vm, |a, b| a % b, |a, b| format!("{a} % {b}"));
}

/// The `SMOD` opcode computes the signed modulus, where the operands are
/// interpreted as two's complement.
///
/// # Semantics
///
/// | Stack Index | Input | Output  |
/// | :---------: | :---: | :-----: |
/// | 1           | `a`   | `a % b` |
/// | 2           | `b`   |         |
///
/// A modulus of zero yields zero, and the result takes the sign of `a`.
/// Renders as `a % b` when it cannot be folded.
pub fn smod(vm: &mut VM) {
    binary(vm, |a, b| a.signed_rem(b), |a, b| format!("{a} % {b}"));
}

/// The `ADDMOD` opcode adds two operands under a modulus, without the
/// intermediate sum wrapping at `2**256`.
///
/// # Semantics
///
/// | Stack Index | Input | Output        |
/// | :---------: | :---: | :-----------: |
/// | 1           | `a`   | `(a + b) % n` |
/// | 2           | `b`   |               |
/// | 3           | `n`   |               |
pub fn addmod(vm: &mut VM) {
    ternary(
        vm,
        |a, b, n| a.add_mod(b, n),
        |a, b, n| format!("({a} + {b}) % {n}"),
    );
}

/// The `MULMOD` opcode multiplies two operands under a modulus, without the
/// intermediate product wrapping at `2**256`.
///
/// # Semantics
///
/// | Stack Index | Input | Output        |
/// | :---------: | :---: | :-----------: |
/// | 1           | `a`   | `(a * b) % n` |
/// | 2           | `b`   |               |
/// | 3           | `n`   |               |
pub fn mulmod(vm: &mut VM) {
    ternary(
        vm,
        |a, b, n| a.mul_mod(b, n),
        |a, b, n| format!("({a} * {b}) % {n}"),
    );
}

/// The `EXP` opcode performs exponentiation.
///
/// # Semantics
///
/// | Stack Index | Input      | Output              |
/// | :---------: | :--------: | :-----------------: |
/// | 1           | `a`        | `(a ** b) % 2**256` |
/// | 2           | `exponent` |                     |
pub fn exp(vm: &mut VM) {
    binary(vm, |a, b| a.exp(b), |a, b| format!("{a} ** {b}"));
}

/// The `SIGNEXTEND` opcode extends the length of a two's complement signed
/// integer.
///
/// # Semantics
///
/// | Stack Index | Input | Output                            |
/// | :---------: | :---: | :-------------------------------: |
/// | 1           | `b`   | `x` sign-extended from byte `b`   |
/// | 2           | `x`   |                                   |
pub fn signextend(vm: &mut VM) {
    binary(
        vm,
        |b, x| x.sign_extend(b),
        |b, x| format!("signextend({b}, {x})"),
    );
}
