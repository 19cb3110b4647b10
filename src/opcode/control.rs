//! Opcodes that transfer control.
//!
//! The interpreter never actually branches. A jump instead makes the stack
//! take on the shape recorded for its destination label.

use crate::vm::VM;

/// The `JUMP` opcode jumps unconditionally.
///
/// # Semantics
///
/// | Stack Index | Input         | Output |
/// | :---------: | :-----------: | :----: |
/// | 1           | `destination` |        |
pub fn jump(vm: &mut VM) {
    let destination = vm.pop();
    vm.jump_to(destination.text());
}

/// The `JUMPI` opcode jumps if its condition is nonzero.
///
/// # Semantics
///
/// | Stack Index | Input         | Output |
/// | :---------: | :-----------: | :----: |
/// | 1           | `destination` |        |
/// | 2           | `condition`   |        |
///
/// This has the same effect on the stack as `JUMP`, whether or not the
/// condition holds.
pub fn jumpi(vm: &mut VM) {
    let destination = vm.pop();
    let _condition = vm.pop();
    vm.jump_to(destination.text());
}
