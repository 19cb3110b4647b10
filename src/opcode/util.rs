//! This file contains utilities for implementing the symbolic executable
//! semantics of the opcodes.

use crate::{
    constant::WORD_SIZE_BYTES,
    error::execution::Error,
    vm::{
        value::{SymbolicValue, Word},
        VM,
    },
};

/// Pops one operand and pushes its fold with `fold` if it is known, or the
/// text produced by `render` otherwise.
pub fn unary(vm: &mut VM, fold: impl FnOnce(Word) -> Word, render: impl FnOnce(&str) -> String) {
    let a = vm.pop();
    let result = match a.word() {
        Some(a) => SymbolicValue::known(fold(a)),
        None => SymbolicValue::symbolic(render(a.text())),
    };
    vm.push(result);
}

/// Pops the operands `a` (the top of the stack) and `b`, and pushes their fold
/// with `fold` if both are known, or the text produced by `render` otherwise.
pub fn binary(
    vm: &mut VM,
    fold: impl FnOnce(Word, Word) -> Word,
    render: impl FnOnce(&str, &str) -> String,
) {
    let a = vm.pop();
    let b = vm.pop();
    let result = match (a.word(), b.word()) {
        (Some(a), Some(b)) => SymbolicValue::known(fold(a, b)),
        _ => SymbolicValue::symbolic(render(a.text(), b.text())),
    };
    vm.push(result);
}

/// Pops the operands `a` (the top of the stack), `b`, and `c`, pushing their
/// fold with `fold` if all are known, or the text produced by `render`
/// otherwise.
pub fn ternary(
    vm: &mut VM,
    fold: impl FnOnce(Word, Word, Word) -> Word,
    render: impl FnOnce(&str, &str, &str) -> String,
) {
    let a = vm.pop();
    let b = vm.pop();
    let c = vm.pop();
    let result = match (a.word(), b.word(), c.word()) {
        (Some(a), Some(b), Some(c)) => SymbolicValue::known(fold(a, b, c)),
        _ => SymbolicValue::symbolic(render(a.text(), b.text(), c.text())),
    };
    vm.push(result);
}

/// Pops `count` operands and discards them.
pub fn discard(vm: &mut VM, count: usize) {
    for _ in 0..count {
        vm.pop();
    }
}

/// Pops `count` operands and pushes the opaque value `name` in their place.
pub fn replace(vm: &mut VM, count: usize, name: &str) {
    discard(vm, count);
    vm.push(SymbolicValue::symbolic(name));
}

/// Gets the concrete offset of the word in memory at `value`.
///
/// Returns [`None`] if `value` is not known, or if the word would extend
/// beyond the largest offset that the VM is configured to track, in which case
/// an error is also recorded.
pub fn word_offset(vm: &mut VM, value: &SymbolicValue) -> Option<usize> {
    let size = SymbolicValue::known(Word::from(WORD_SIZE_BYTES));
    memory_range(vm, value, &size).map(|(offset, _)| offset)
}

/// Gets the concrete `(offset, size)` region of memory described by the
/// provided values.
///
/// Returns [`None`] if either value is not known, or if the region extends
/// beyond the largest offset that the VM is configured to track, in which case
/// an error is also recorded.
pub fn memory_range(
    vm: &mut VM,
    offset: &SymbolicValue,
    size: &SymbolicValue,
) -> Option<(usize, usize)> {
    let (offset_word, size_word) = (offset.word()?, size.word()?);
    let maximum = vm.config().maximum_memory_offset;

    let region = offset_word
        .as_usize()
        .zip(size_word.as_usize())
        .filter(|(offset, size)| offset.checked_add(*size).is_some_and(|end| end <= maximum));

    if region.is_none() {
        vm.record(Error::UnsupportedMemoryOffset {
            offset: offset.text().to_string(),
        });
    }

    region
}
