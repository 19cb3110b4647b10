//! Opcodes that manipulate the stack, memory, and storage.

use sha3::{Digest, Keccak256};

use crate::{
    constant::{CLIPPED_OPERAND_MAX_LENGTH, WORD_SIZE_BYTES},
    opcode::util::{memory_range, word_offset},
    utility::clip,
    vm::{
        value::{SymbolicValue, Word},
        VM,
    },
};

/// The `PUSH0` opcode pushes the constant zero.
///
/// # Semantics
///
/// | Stack Index | Input | Output |
/// | :---------: | :---: | :----: |
/// | 1           |       | `0x0`  |
pub fn push0(vm: &mut VM) {
    vm.push(SymbolicValue::known(Word::zero()));
}

/// The `DUPN` opcodes duplicate the `n`th stack item onto the top of the
/// stack.
///
/// If there is no `n`th item, the stack is left as is.
pub fn dup(vm: &mut VM, n: u8) {
    if let Err(error) = vm.state_mut().stack_mut().dup(usize::from(n)) {
        vm.record(error);
    }
}

/// The `SWAPN` opcodes exchange the top stack item with the item `n` below
/// it.
///
/// If there is no such item, the stack is left as is.
pub fn swap(vm: &mut VM, n: u8) {
    if let Err(error) = vm.state_mut().stack_mut().swap(usize::from(n)) {
        vm.record(error);
    }
}

/// The `MLOAD` opcode loads a word from memory.
///
/// # Semantics
///
/// | Stack Index | Input    | Output                     |
/// | :---------: | :------: | :------------------------: |
/// | 1           | `offset` | `memory[offset:offset+32]` |
///
/// When `offset` is known and the 32 bytes at it are all known, the loaded
/// word is pushed. Otherwise this pushes `mem[offset]`, with a long offset
/// text clipped.
pub fn mload(vm: &mut VM) {
    let offset = vm.pop();
    let loaded = word_offset(vm, &offset).and_then(|offset| vm.state().memory().load(offset));

    let result = match loaded {
        Some(word) => SymbolicValue::known(word),
        None => {
            let offset = clip(offset.text(), CLIPPED_OPERAND_MAX_LENGTH);
            SymbolicValue::symbolic(format!("mem[{offset}]"))
        }
    };
    vm.push(result);
}

/// The `MSTORE` opcode stores a word in memory.
///
/// # Semantics
///
/// | Stack Index | Input    | Output |
/// | :---------: | :------: | :----: |
/// | 1           | `offset` |        |
/// | 2           | `value`  |        |
///
/// Only a known `offset` touches memory. If the `value` is not known, the 32
/// bytes at `offset` become unknown.
pub fn mstore(vm: &mut VM) {
    let offset = vm.pop();
    let value = vm.pop();
    let Some(offset) = word_offset(vm, &offset) else {
        return;
    };

    let memory = vm.state_mut().memory_mut();
    match value.word() {
        Some(word) => memory.store(offset, word),
        None => memory.forget(offset, WORD_SIZE_BYTES),
    }
}

/// The `MSTORE8` opcode stores a single byte in memory.
///
/// # Semantics
///
/// | Stack Index | Input    | Output |
/// | :---------: | :------: | :----: |
/// | 1           | `offset` |        |
/// | 2           | `value`  |        |
///
/// The low byte of `value` is written at `offset` as the most significant
/// byte of an otherwise zero word, so the 31 bytes after it are zeroed.
pub fn mstore8(vm: &mut VM) {
    let offset = vm.pop();
    let value = vm.pop();
    let Some(offset) = word_offset(vm, &offset) else {
        return;
    };

    let memory = vm.state_mut().memory_mut();
    match value.word() {
        Some(word) => memory.store_byte(offset, word.bytes_be()[WORD_SIZE_BYTES - 1]),
        None => {
            memory.store_byte(offset, 0);
            memory.forget(offset, 1);
        }
    }
}

/// The `SLOAD` opcode loads a word from storage.
///
/// # Semantics
///
/// | Stack Index | Input | Output         |
/// | :---------: | :---: | :------------: |
/// | 1           | `key` | `storage[key]` |
pub fn sload(vm: &mut VM) {
    let key = vm.pop();
    let key = clip(key.text(), CLIPPED_OPERAND_MAX_LENGTH);
    vm.push(SymbolicValue::symbolic(format!("storage[{key}]")));
}

/// The `TLOAD` opcode loads a word from transient storage.
///
/// # Semantics
///
/// | Stack Index | Input | Output           |
/// | :---------: | :---: | :--------------: |
/// | 1           | `key` | `transient[key]` |
pub fn tload(vm: &mut VM) {
    let key = vm.pop();
    let key = clip(key.text(), CLIPPED_OPERAND_MAX_LENGTH);
    vm.push(SymbolicValue::symbolic(format!("transient[{key}]")));
}

/// The `MCOPY` opcode copies a region of memory to another.
///
/// # Semantics
///
/// | Stack Index | Input        | Output |
/// | :---------: | :----------: | :----: |
/// | 1           | `destOffset` |        |
/// | 2           | `offset`     |        |
/// | 3           | `size`       |        |
///
/// When the source is not known but the destination is, the destination
/// region becomes unknown.
pub fn mcopy(vm: &mut VM) {
    let destination = vm.pop();
    let source = vm.pop();
    let size = vm.pop();

    let Some((destination, size_bytes)) = memory_range(vm, &destination, &size) else {
        return;
    };
    let source = memory_range(vm, &source, &size).map(|(source, _)| source);

    let memory = vm.state_mut().memory_mut();
    match source {
        Some(source) => memory.copy(destination, source, size_bytes),
        None => memory.forget(destination, size_bytes),
    }
}

/// The `SHA3` opcode computes the Keccak-256 hash of a region of memory.
///
/// # Semantics
///
/// | Stack Index | Input    | Output                                  |
/// | :---------: | :------: | :-------------------------------------: |
/// | 1           | `offset` | `keccak256(memory[offset:offset+size])` |
/// | 2           | `size`   |                                         |
///
/// The hash is only computed when every byte of the region is known.
/// Otherwise this pushes `hash`.
pub fn sha3(vm: &mut VM) {
    let offset = vm.pop();
    let size = vm.pop();

    let hashed = memory_range(vm, &offset, &size)
        .and_then(|(offset, size)| vm.state().memory().read(offset, size))
        .and_then(|bytes| Word::from_be_slice(&Keccak256::digest(bytes)).ok());

    let result = match hashed {
        Some(word) => SymbolicValue::known(word),
        None => SymbolicValue::symbolic("hash"),
    };
    vm.push(result);
}
