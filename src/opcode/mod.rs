//! This module contains the [`Opcode`] enum and the symbolic semantics of
//! each of the EVM's [opcodes](https://ethereum.org/en/developers/docs/evm/opcodes/)
//! as they apply to the interpreter's stack and memory.
//!
//! # Terminology
//!
//! When referring to stack slots, we treat index 1 as being the top of the
//! stack. In the semantics tables and in rendered expressions, `a` is the value
//! at index 1, `b` the value at index 2, and so on.

pub mod arithmetic;
pub mod builtin;
pub mod control;
pub mod environment;
pub mod logic;
pub mod memory;
mod util;

use std::fmt::{Display, Formatter};

use crate::{
    constant::{MAXIMUM_DUP_SWAP_DEPTH, MAXIMUM_LOG_TOPICS, WORD_SIZE_BYTES},
    vm::VM,
};

/// The opcodes understood by the interpreter.
///
/// The parametrised families carry their `N`, so `Dup(3)` is `DUP3` and
/// `Log(0)` is `LOG0`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode {
    // Arithmetic
    Add,
    Mul,
    Sub,
    Div,
    SDiv,
    Mod,
    SMod,
    AddMod,
    MulMod,
    Exp,
    SignExtend,

    // Comparison and bitwise logic
    Lt,
    Gt,
    SLt,
    SGt,
    Eq,
    IsZero,
    And,
    Or,
    Xor,
    Not,
    Byte,
    Shl,
    Shr,
    Sar,

    /// `SHA3`, also written `KECCAK256`.
    Sha3,

    // Environment and block information
    Address,
    Balance,
    Origin,
    Caller,
    CallValue,
    CallDataLoad,
    CallDataSize,
    CallDataCopy,
    CodeSize,
    CodeCopy,
    GasPrice,
    ExtCodeSize,
    ExtCodeCopy,
    ReturnDataSize,
    ReturnDataCopy,
    ExtCodeHash,
    BlockHash,
    Coinbase,
    Timestamp,
    Number,

    /// `PREVRANDAO`, formerly `DIFFICULTY`.
    PrevRandao,
    GasLimit,
    ChainId,
    SelfBalance,
    BaseFee,
    BlobHash,
    BlobBaseFee,

    // Stack, memory, and storage
    Pop,
    MLoad,
    MStore,
    MStore8,
    SLoad,
    SStore,
    TLoad,
    TStore,
    MCopy,
    MSize,
    Push0,
    Push(u8),
    Dup(u8),
    Swap(u8),

    // Control flow, logging, and calls
    Stop,
    Jump,
    JumpI,
    Pc,
    Gas,
    JumpDest,
    Log(u8),
    Create,
    Call,
    CallCode,
    Return,
    DelegateCall,
    Create2,
    StaticCall,
    Revert,
    Invalid,
    SelfDestruct,
}

/// The mnemonics of the opcodes that are not parametrised.
///
/// Where an opcode has more than one mnemonic, the first listed is the one it
/// is displayed with.
const MNEMONICS: &[(&str, Opcode)] = &[
    ("add", Opcode::Add),
    ("mul", Opcode::Mul),
    ("sub", Opcode::Sub),
    ("div", Opcode::Div),
    ("sdiv", Opcode::SDiv),
    ("mod", Opcode::Mod),
    ("smod", Opcode::SMod),
    ("addmod", Opcode::AddMod),
    ("mulmod", Opcode::MulMod),
    ("exp", Opcode::Exp),
    ("signextend", Opcode::SignExtend),
    ("lt", Opcode::Lt),
    ("gt", Opcode::Gt),
    ("slt", Opcode::SLt),
    ("sgt", Opcode::SGt),
    ("eq", Opcode::Eq),
    ("iszero", Opcode::IsZero),
    ("and", Opcode::And),
    ("or", Opcode::Or),
    ("xor", Opcode::Xor),
    ("not", Opcode::Not),
    ("byte", Opcode::Byte),
    ("shl", Opcode::Shl),
    ("shr", Opcode::Shr),
    ("sar", Opcode::Sar),
    ("sha3", Opcode::Sha3),
    ("keccak256", Opcode::Sha3),
    ("address", Opcode::Address),
    ("balance", Opcode::Balance),
    ("origin", Opcode::Origin),
    ("caller", Opcode::Caller),
    ("callvalue", Opcode::CallValue),
    ("calldataload", Opcode::CallDataLoad),
    ("calldatasize", Opcode::CallDataSize),
    ("calldatacopy", Opcode::CallDataCopy),
    ("codesize", Opcode::CodeSize),
    ("codecopy", Opcode::CodeCopy),
    ("gasprice", Opcode::GasPrice),
    ("extcodesize", Opcode::ExtCodeSize),
    ("extcodecopy", Opcode::ExtCodeCopy),
    ("returndatasize", Opcode::ReturnDataSize),
    ("returndatacopy", Opcode::ReturnDataCopy),
    ("extcodehash", Opcode::ExtCodeHash),
    ("blockhash", Opcode::BlockHash),
    ("coinbase", Opcode::Coinbase),
    ("timestamp", Opcode::Timestamp),
    ("number", Opcode::Number),
    ("prevrandao", Opcode::PrevRandao),
    ("difficulty", Opcode::PrevRandao),
    ("gaslimit", Opcode::GasLimit),
    ("chainid", Opcode::ChainId),
    ("selfbalance", Opcode::SelfBalance),
    ("basefee", Opcode::BaseFee),
    ("blobhash", Opcode::BlobHash),
    ("blobbasefee", Opcode::BlobBaseFee),
    ("pop", Opcode::Pop),
    ("mload", Opcode::MLoad),
    ("mstore", Opcode::MStore),
    ("mstore8", Opcode::MStore8),
    ("sload", Opcode::SLoad),
    ("sstore", Opcode::SStore),
    ("tload", Opcode::TLoad),
    ("tstore", Opcode::TStore),
    ("mcopy", Opcode::MCopy),
    ("msize", Opcode::MSize),
    ("push0", Opcode::Push0),
    ("stop", Opcode::Stop),
    ("jump", Opcode::Jump),
    ("jumpi", Opcode::JumpI),
    ("pc", Opcode::Pc),
    ("gas", Opcode::Gas),
    ("jumpdest", Opcode::JumpDest),
    ("create", Opcode::Create),
    ("call", Opcode::Call),
    ("callcode", Opcode::CallCode),
    ("return", Opcode::Return),
    ("delegatecall", Opcode::DelegateCall),
    ("create2", Opcode::Create2),
    ("staticcall", Opcode::StaticCall),
    ("revert", Opcode::Revert),
    ("invalid", Opcode::Invalid),
    ("selfdestruct", Opcode::SelfDestruct),
];

impl Opcode {
    /// Looks up the opcode with the provided lowercase `mnemonic`.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        if let Some((_, opcode)) = MNEMONICS.iter().find(|(text, _)| *text == mnemonic) {
            return Some(*opcode);
        }

        let numbered = |prefix: &str, range: std::ops::RangeInclusive<u8>| {
            mnemonic
                .strip_prefix(prefix)
                .filter(|n| !n.starts_with('0') || n.len() == 1)
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| range.contains(n))
        };

        #[allow(clippy::cast_possible_truncation)] // A word is 32 bytes
        let word_bytes = WORD_SIZE_BYTES as u8;

        numbered("push", 1..=word_bytes)
            .map(Self::Push)
            .or_else(|| numbered("dup", 1..=MAXIMUM_DUP_SWAP_DEPTH).map(Self::Dup))
            .or_else(|| numbered("swap", 1..=MAXIMUM_DUP_SWAP_DEPTH).map(Self::Swap))
            .or_else(|| numbered("log", 0..=MAXIMUM_LOG_TOPICS).map(Self::Log))
    }

    /// Gets the number of arguments that the opcode accepts from the
    /// interpreter's stack.
    #[must_use]
    pub fn arg_count(self) -> usize {
        match self {
            Self::Address
            | Self::Origin
            | Self::Caller
            | Self::CallValue
            | Self::CallDataSize
            | Self::CodeSize
            | Self::GasPrice
            | Self::ReturnDataSize
            | Self::Coinbase
            | Self::Timestamp
            | Self::Number
            | Self::PrevRandao
            | Self::GasLimit
            | Self::ChainId
            | Self::SelfBalance
            | Self::BaseFee
            | Self::BlobBaseFee
            | Self::MSize
            | Self::Push0
            | Self::Push(_)
            | Self::Stop
            | Self::Pc
            | Self::Gas
            | Self::JumpDest
            | Self::Invalid => 0,
            Self::IsZero
            | Self::Not
            | Self::Balance
            | Self::CallDataLoad
            | Self::ExtCodeSize
            | Self::ExtCodeHash
            | Self::BlockHash
            | Self::BlobHash
            | Self::Pop
            | Self::MLoad
            | Self::SLoad
            | Self::TLoad
            | Self::Jump
            | Self::SelfDestruct => 1,
            Self::Add
            | Self::Mul
            | Self::Sub
            | Self::Div
            | Self::SDiv
            | Self::Mod
            | Self::SMod
            | Self::Exp
            | Self::SignExtend
            | Self::Lt
            | Self::Gt
            | Self::SLt
            | Self::SGt
            | Self::Eq
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Byte
            | Self::Shl
            | Self::Shr
            | Self::Sar
            | Self::Sha3
            | Self::MStore
            | Self::MStore8
            | Self::SStore
            | Self::TStore
            | Self::JumpI
            | Self::Return
            | Self::Revert => 2,
            Self::AddMod
            | Self::MulMod
            | Self::CallDataCopy
            | Self::CodeCopy
            | Self::ReturnDataCopy
            | Self::MCopy
            | Self::Create => 3,
            Self::ExtCodeCopy | Self::Create2 => 4,
            Self::DelegateCall | Self::StaticCall => 6,
            Self::Call | Self::CallCode => 7,
            Self::Log(topics) => 2 + usize::from(topics),
            Self::Dup(n) => usize::from(n),
            Self::Swap(n) => usize::from(n) + 1,
        }
    }

    /// Gets the name of the opaque value that the opcode pushes in place of
    /// its arguments, if its result is never computed by the interpreter.
    #[must_use]
    pub fn result_name(self) -> Option<&'static str> {
        let name = match self {
            Self::Address => "currentAddress",
            Self::Origin => "origin",
            Self::Caller => "caller",
            Self::CallValue => "callValue",
            Self::CallDataSize => "calldataSize",
            Self::CodeSize => "codeSize",
            Self::GasPrice => "gasPrice",
            Self::ReturnDataSize => "returndataSize",
            Self::Coinbase => "minerAddress",
            Self::Timestamp => "timestamp",
            Self::Number => "blockNumber",
            Self::PrevRandao => "prevRandao",
            Self::GasLimit => "gasLimit",
            Self::ChainId => "chainId",
            Self::SelfBalance => "selfBalance",
            Self::BaseFee => "baseFee",
            Self::BlobBaseFee => "blobBaseFee",
            Self::MSize => "msize",
            Self::Pc => "PC",
            Self::Gas => "gasLeft",
            Self::ExtCodeSize => "extCodeSize",
            Self::ExtCodeHash => "extCodeHash",
            Self::BlockHash => "blockHash",
            Self::BlobHash => "blobHash",
            Self::Create | Self::Create2 => "newAddress",
            Self::Call | Self::CallCode | Self::DelegateCall | Self::StaticCall => "success?",
            _ => return None,
        };

        Some(name)
    }

    /// Executes the opcode, modifying the state of the [`VM`] appropriately.
    ///
    /// Execution never fails. Missing operands and other problems are recorded
    /// on the VM as diagnostics, and the stack is left in a best-effort state.
    pub fn execute(self, vm: &mut VM) {
        match self {
            Self::Add => arithmetic::add(vm),
            Self::Mul => arithmetic::mul(vm),
            Self::Sub => arithmetic::sub(vm),
            Self::Div => arithmetic::div(vm),
            Self::SDiv => arithmetic::sdiv(vm),
            Self::Mod => arithmetic::modulo(vm),
            Self::SMod => arithmetic::smod(vm),
            Self::AddMod => arithmetic::addmod(vm),
            Self::MulMod => arithmetic::mulmod(vm),
            Self::Exp => arithmetic::exp(vm),
            Self::SignExtend => arithmetic::signextend(vm),
            Self::Lt => logic::lt(vm),
            Self::Gt => logic::gt(vm),
            Self::SLt => logic::slt(vm),
            Self::SGt => logic::sgt(vm),
            Self::Eq => logic::eq(vm),
            Self::IsZero => logic::iszero(vm),
            Self::And => logic::and(vm),
            Self::Or => logic::or(vm),
            Self::Xor => logic::xor(vm),
            Self::Not => logic::not(vm),
            Self::Byte => logic::byte(vm),
            Self::Shl => logic::shl(vm),
            Self::Shr => logic::shr(vm),
            Self::Sar => logic::sar(vm),
            Self::Sha3 => memory::sha3(vm),
            Self::Balance => environment::balance(vm),
            Self::CallDataLoad => environment::calldataload(vm),
            Self::CallDataCopy | Self::CodeCopy | Self::ReturnDataCopy => {
                environment::copy_external(vm, 0);
            }
            Self::ExtCodeCopy => environment::copy_external(vm, 1),
            Self::MLoad => memory::mload(vm),
            Self::MStore => memory::mstore(vm),
            Self::MStore8 => memory::mstore8(vm),
            Self::SLoad => memory::sload(vm),
            Self::TLoad => memory::tload(vm),
            Self::MCopy => memory::mcopy(vm),
            Self::Push0 => memory::push0(vm),
            Self::Dup(n) => memory::dup(vm, n),
            Self::Swap(n) => memory::swap(vm, n),
            Self::Jump => control::jump(vm),
            Self::JumpI => control::jumpi(vm),
            Self::Pop
            | Self::SStore
            | Self::TStore
            | Self::Log(_)
            | Self::Return
            | Self::Revert
            | Self::SelfDestruct => util::discard(vm, self.arg_count()),
            Self::Push(_) | Self::Stop | Self::JumpDest | Self::Invalid => (),
            Self::Address
            | Self::Origin
            | Self::Caller
            | Self::CallValue
            | Self::CallDataSize
            | Self::CodeSize
            | Self::GasPrice
            | Self::ReturnDataSize
            | Self::Coinbase
            | Self::Timestamp
            | Self::Number
            | Self::PrevRandao
            | Self::GasLimit
            | Self::ChainId
            | Self::SelfBalance
            | Self::BaseFee
            | Self::BlobBaseFee
            | Self::MSize
            | Self::Pc
            | Self::Gas
            | Self::ExtCodeSize
            | Self::ExtCodeHash
            | Self::BlockHash
            | Self::BlobHash
            | Self::Create
            | Self::Create2
            | Self::Call
            | Self::CallCode
            | Self::DelegateCall
            | Self::StaticCall => environment::opaque(vm, self),
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(n) => write!(f, "push{n}"),
            Self::Dup(n) => write!(f, "dup{n}"),
            Self::Swap(n) => write!(f, "swap{n}"),
            Self::Log(n) => write!(f, "log{n}"),
            _ => {
                let mnemonic = MNEMONICS
                    .iter()
                    .find(|(_, opcode)| opcode == self)
                    .map_or("unknown", |(text, _)| text);
                write!(f, "{mnemonic}")
            }
        }
    }
}
