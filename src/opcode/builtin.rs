//! The compiler builtin functions that can appear in Huff macro bodies.

use sha3::{Digest, Keccak256};

use crate::{
    constant::{SELECTOR_SIZE_BYTES, WORD_SIZE_BYTES},
    lexer::{definition::canonical_signature, index::SignatureKind, Token},
    vm::{
        value::{SymbolicValue, Word},
        VM,
    },
};

/// The builtin functions understood by the interpreter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Builtin {
    /// `__FUNC_SIG`, the selector of a function.
    FunctionSignature,

    /// `__EVENT_HASH`, the selector of an event.
    EventHash,

    /// `__ERROR`, the selector of a custom error.
    ErrorSelector,

    /// `__RIGHTPAD`, a literal padded on the right to a full word.
    RightPad,

    /// `__codesize`, the size of a macro's bytecode.
    CodeSize,

    /// `__tablestart`, the offset of a jump table.
    TableStart,

    /// `__tablesize`, the size of a jump table.
    TableSize,

    /// `__VERBATIM`, raw bytecode with no effect on the stack.
    Verbatim,
}

impl Builtin {
    /// Looks up the builtin invoked as `name`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "__FUNC_SIG" => Self::FunctionSignature,
            "__EVENT_HASH" => Self::EventHash,
            "__ERROR" => Self::ErrorSelector,
            "__RIGHTPAD" => Self::RightPad,
            "__codesize" => Self::CodeSize,
            "__tablestart" => Self::TableStart,
            "__tablesize" => Self::TableSize,
            "__VERBATIM" => Self::Verbatim,
            _ => return None,
        };

        Some(builtin)
    }

    /// Executes the invocation of the builtin in `token`, pushing its result.
    pub fn execute(self, vm: &mut VM, token: &Token) {
        let kind = match self {
            Self::FunctionSignature => SignatureKind::Function,
            Self::EventHash => SignatureKind::Event,
            Self::ErrorSelector => SignatureKind::Error,
            Self::RightPad => {
                vm.push(right_pad(token.argument()).unwrap_or_else(|| {
                    SymbolicValue::symbolic(token.text.as_str())
                }));
                return;
            }
            Self::CodeSize | Self::TableStart | Self::TableSize => {
                vm.push(SymbolicValue::symbolic(token.text.as_str()));
                return;
            }
            Self::Verbatim => return,
        };

        let argument = token.argument().trim_matches(|c| c == '"' || c == '\'');
        let signature = if argument.contains('(') {
            canonical_signature(argument)
        } else {
            vm.signature(kind, argument)
        }
        .unwrap_or_else(|| argument.to_string());

        vm.push(selector(&signature));
    }
}

/// Computes the selector of the canonical `signature`, which is the first four
/// bytes of its Keccak-256 hash.
///
/// ```
/// use huff_stack_comments::opcode::builtin::selector;
///
/// assert_eq!(selector("transfer(address,uint256)").text(), "0xa9059cbb");
/// ```
#[must_use]
pub fn selector(signature: &str) -> SymbolicValue {
    let hash = Keccak256::digest(signature.as_bytes());
    let bytes = &hash[..SELECTOR_SIZE_BYTES];

    let mut padded = [0u8; WORD_SIZE_BYTES];
    padded[WORD_SIZE_BYTES - SELECTOR_SIZE_BYTES..].copy_from_slice(bytes);

    SymbolicValue::Known {
        word: Word::from_be_bytes(padded),
        text: format!("0x{}", hex::encode(bytes)),
    }
}

/// Pads the hex literal `argument` on the right with zeroes to a full word.
///
/// Returns [`None`] if `argument` is not a hex literal of at most 32 bytes.
fn right_pad(argument: &str) -> Option<SymbolicValue> {
    let digits = argument
        .strip_prefix("0x")
        .or_else(|| argument.strip_prefix("0X"))?;
    if digits.is_empty() || digits.len() > 2 * WORD_SIZE_BYTES {
        return None;
    }

    let text = format!("0x{digits:0<width$}", width = 2 * WORD_SIZE_BYTES);
    let word = Word::from_hex(&text).ok()?;
    Some(SymbolicValue::Known { word, text })
}

#[cfg(test)]
mod test {
    use crate::{
        opcode::builtin::{right_pad, selector, Builtin},
        vm::value::Word,
    };

    #[test]
    fn computes_known_selectors() {
        assert_eq!(selector("transfer(address,uint256)").text(), "0xa9059cbb");
        assert_eq!(
            selector("testFunction(uint256,bytes32)").text(),
            "0xa458e8ac"
        );
        assert_eq!(
            selector("Transfer(address,address,uint256)").text(),
            "0xddf252ad"
        );
        assert_eq!(
            selector("transfer(address,uint256)").word(),
            Some(Word::from(0xa905_9cbb_u32))
        );
    }

    #[test]
    fn pads_literals_on_the_right() {
        let padded = right_pad("0xab").expect("Literal was not padded");
        assert_eq!(padded.text(), format!("0xab{}", "0".repeat(62)));

        assert_eq!(right_pad("OWNER"), None);
        assert_eq!(right_pad(&format!("0x{}", "1".repeat(65))), None);
    }

    #[test]
    fn looks_up_builtins_by_name() {
        assert_eq!(Builtin::from_name("__FUNC_SIG"), Some(Builtin::FunctionSignature));
        assert_eq!(Builtin::from_name("__tablesize"), Some(Builtin::TableSize));
        assert_eq!(Builtin::from_name("__func_sig"), None);
    }
}
