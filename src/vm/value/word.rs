//! This module contains a representation of concrete word values for the EVM
//! that can be known and manipulated statically.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use ethnum::{I256, U256};

use crate::{
    constant::{BYTE_SIZE_BITS, WORD_SIZE_BITS, WORD_SIZE_BYTES},
    error::parse::{Error, Result},
};

/// A 256-bit word whose value is concretely known during interpretation.
///
/// # Representation
///
/// All values on the EVM are just bags of bits in a 256-bit word. Operations on
/// a `Word` may treat this word numerically in a signed or unsigned fashion.
/// Unsigned operations wrap modulo `2^256`, while signed operations reinterpret
/// the bit pattern as a two's complement number. Such numeric operations are,
/// where possible, implemented in terms of standard operators to provide a
/// natural usage experience.
///
/// Degenerate operations (division or modulo by zero, over-wide shifts) resolve
/// to the value the EVM defines for them rather than failing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Word {
    value: U256,
}

impl Word {
    /// Creates a word representing zero.
    #[must_use]
    pub fn zero() -> Self {
        Self { value: U256::ZERO }
    }

    /// Creates a word representing one.
    #[must_use]
    pub fn one() -> Self {
        Self { value: U256::ONE }
    }

    /// Creates a word with every bit set.
    #[must_use]
    pub fn max() -> Self {
        Self { value: U256::MAX }
    }

    /// Constructs a new word from an unsigned `value`.
    #[must_use]
    pub fn new(value: impl Into<U256>) -> Self {
        let value = value.into();
        Self { value }
    }

    /// Constructs a new word by reinterpreting the bits of a signed `value`.
    #[must_use]
    pub fn from_signed(value: impl Into<I256>) -> Self {
        let value = U256::from_ne_bytes(value.into().to_ne_bytes());
        Self { value }
    }

    /// Constructs a new word from `bytes` in big-endian ordering.
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; WORD_SIZE_BYTES]) -> Self {
        let value = U256::from_be_bytes(bytes);
        Self { value }
    }

    /// Constructs a new word from a raw big-endian buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `bytes` is not exactly [`WORD_SIZE_BYTES`] long.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        let buffer: [u8; WORD_SIZE_BYTES] = bytes
            .try_into()
            .map_err(|_| Error::InvalidLength {
                length: bytes.len(),
            })?;
        Ok(Self::from_be_bytes(buffer))
    }

    /// Parses a word from hexadecimal text, with or without the `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the text is empty, contains a non-hex digit, or
    /// describes a value wider than 256 bits.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let offset = text.len() - digits.len();
        if digits.is_empty() {
            return Err(Error::Empty);
        }

        let mut value = U256::ZERO;
        for (index, character) in digits.char_indices() {
            let digit = character.to_digit(16).ok_or(Error::InvalidDigit {
                character,
                index: index + offset,
            })?;
            if value.leading_zeros() < 4 {
                return Err(Error::Overflow {
                    text: text.to_string(),
                });
            }
            value = (value << 4u32) | U256::from(digit);
        }

        Ok(Self { value })
    }

    /// Parses a word from decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the text is empty, contains a non-decimal digit, or
    /// describes a value wider than 256 bits.
    pub fn from_decimal(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::Empty);
        }

        let ten = U256::from(10u8);
        let mut value = U256::ZERO;
        for (index, character) in text.char_indices() {
            let digit = character
                .to_digit(10)
                .ok_or(Error::InvalidDigit { character, index })?;
            value = value
                .checked_mul(ten)
                .and_then(|v| v.checked_add(U256::from(digit)))
                .ok_or_else(|| Error::Overflow {
                    text: text.to_string(),
                })?;
        }

        Ok(Self { value })
    }

    /// Gets the value of the word, interpreting the bit pattern as a two's
    /// complement signed number.
    #[must_use]
    pub fn value_signed(&self) -> I256 {
        I256::from_ne_bytes(self.value.to_ne_bytes())
    }

    /// Gets the bytes of this word in big endian ordering.
    #[must_use]
    pub fn bytes_be(&self) -> [u8; WORD_SIZE_BYTES] {
        self.value.to_be_bytes()
    }

    /// Checks whether the word is negative under a signed interpretation.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value.leading_zeros() == 0
    }

    /// Converts the word to a [`usize`] if it fits.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        let (high, low) = self.value.into_words();
        if high == 0 {
            usize::try_from(low).ok()
        } else {
            None
        }
    }

    /// Renders the word as `0x`-prefixed hex with leading zeros stripped.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let encoded = hex::encode(self.bytes_be());
        let trimmed = encoded.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }

    /// Renders the word in base ten.
    #[must_use]
    pub fn to_decimal(&self) -> String {
        self.value.to_string()
    }

    /// Performs signed division of two words.
    ///
    /// The result is negative exactly when the operands disagree in sign, and
    /// dividing the most negative value by `-1` wraps back around to it.
    #[must_use]
    pub fn signed_div(self, rhs: Self) -> Self {
        let left = self.value_signed();
        let right = rhs.value_signed();

        if right == I256::ZERO {
            Self::zero()
        } else {
            Self::from_signed(left.wrapping_div(right))
        }
    }

    /// Performs signed modulo of two words.
    ///
    /// The result takes the sign of the dividend.
    #[must_use]
    pub fn signed_rem(self, rhs: Self) -> Self {
        let left = self.value_signed();
        let right = rhs.value_signed();

        if right == I256::ZERO {
            Self::zero()
        } else {
            Self::from_signed(left.wrapping_rem(right))
        }
    }

    /// Computes `(self + rhs) % modulus` without intermediate overflow.
    #[must_use]
    pub fn add_mod(self, rhs: Self, modulus: Self) -> Self {
        if modulus.value == U256::ZERO {
            return Self::zero();
        }
        let n = modulus.value;
        let a = self.value % n;
        let b = rhs.value % n;

        // `n - b` cannot underflow as `b < n`
        let gap = n - b;
        let value = if a >= gap { a - gap } else { a + b };
        Self { value }
    }

    /// Computes `(self * rhs) % modulus` without intermediate overflow.
    #[must_use]
    pub fn mul_mod(self, rhs: Self, modulus: Self) -> Self {
        if modulus.value == U256::ZERO {
            return Self::zero();
        }
        let a = Self {
            value: self.value % modulus.value,
        };
        let b = rhs.value % modulus.value;

        let mut result = Self::zero();
        for bit in (0..=255u32).rev() {
            result = result.add_mod(result, modulus);
            if (b >> bit) & U256::ONE == U256::ONE {
                result = result.add_mod(a, modulus);
            }
        }
        result
    }

    /// Performs exponentiation of two words, wrapping modulo `2^256`.
    #[must_use]
    pub fn exp(self, rhs: Self) -> Self {
        let mut base = self.value;
        let mut exponent = rhs.value;
        let mut result = U256::ONE;

        while exponent != U256::ZERO {
            if exponent & U256::ONE == U256::ONE {
                result = result.wrapping_mul(base);
            }
            base = base.wrapping_mul(base);
            exponent = exponent >> 1u32;
        }

        Self { value: result }
    }

    /// Computes less-than of two words.
    #[must_use]
    pub fn lt(self, rhs: Self) -> Self {
        Self::from(self.value < rhs.value)
    }

    /// Computes greater-than of two words.
    #[must_use]
    pub fn gt(self, rhs: Self) -> Self {
        Self::from(self.value > rhs.value)
    }

    /// Computes signed less-than of two words.
    #[must_use]
    pub fn signed_lt(self, rhs: Self) -> Self {
        Self::from(self.value_signed() < rhs.value_signed())
    }

    /// Computes signed greater-than of two words.
    #[must_use]
    pub fn signed_gt(self, rhs: Self) -> Self {
        Self::from(self.value_signed() > rhs.value_signed())
    }

    /// Computes equality of two words.
    #[must_use]
    pub fn eq(self, rhs: Self) -> Self {
        Self::from(self.value == rhs.value)
    }

    /// Checks if `self` is zero.
    #[must_use]
    pub fn is_zero(self) -> Self {
        Self::from(self.value == U256::ZERO)
    }

    /// Computes the arithmetic right shift of `self` by `rhs`.
    ///
    /// Shifting by 256 or more yields zero for non-negative values and all
    /// ones for negative values.
    #[must_use]
    pub fn sar(self, rhs: Self) -> Self {
        match Self::shift_amount(rhs) {
            Some(shift) => Self::from_signed(self.value_signed() >> shift),
            None if self.is_negative() => Self::max(),
            None => Self::zero(),
        }
    }

    /// Extends the sign of the low `index + 1` bytes of `self` to the whole
    /// word.
    #[must_use]
    pub fn sign_extend(self, index: Self) -> Self {
        let Some(index) = index.as_usize().filter(|i| *i < WORD_SIZE_BYTES - 1) else {
            return self;
        };
        let sign_bit = u32::try_from(index * BYTE_SIZE_BITS + 7).unwrap_or(0);
        let mask = (U256::ONE << (sign_bit + 1)) - U256::ONE;

        let value = if (self.value >> sign_bit) & U256::ONE == U256::ONE {
            self.value | !mask
        } else {
            self.value & mask
        };
        Self { value }
    }

    /// Extracts the byte at `index` (counted from the most significant end) of
    /// `self`.
    #[must_use]
    pub fn byte(self, index: Self) -> Self {
        match index.as_usize().filter(|i| *i < WORD_SIZE_BYTES) {
            Some(i) => Self::from(self.bytes_be()[i]),
            None => Self::zero(),
        }
    }

    /// Gets a shift amount usable on the underlying integer, or [`None`] if
    /// the shift moves every bit out of the word.
    fn shift_amount(rhs: Self) -> Option<u32> {
        rhs.as_usize()
            .filter(|shift| *shift < WORD_SIZE_BITS)
            .and_then(|shift| u32::try_from(shift).ok())
    }
}

impl std::ops::Add<Word> for Word {
    type Output = Word;

    /// Performs addition of two words.
    fn add(self, rhs: Word) -> Self::Output {
        Word::new(self.value.wrapping_add(rhs.value))
    }
}

impl std::ops::Mul<Word> for Word {
    type Output = Word;

    /// Performs multiplication of two words.
    fn mul(self, rhs: Word) -> Self::Output {
        Word::new(self.value.wrapping_mul(rhs.value))
    }
}

impl std::ops::Sub<Word> for Word {
    type Output = Word;

    /// Performs subtraction of two words.
    fn sub(self, rhs: Word) -> Self::Output {
        Word::new(self.value.wrapping_sub(rhs.value))
    }
}

impl std::ops::Div<Word> for Word {
    type Output = Word;

    /// Performs unsigned division of two words.
    fn div(self, rhs: Word) -> Self::Output {
        if rhs.value == U256::ZERO {
            Word::zero()
        } else {
            Word::new(self.value / rhs.value)
        }
    }
}

impl std::ops::Rem<Word> for Word {
    type Output = Word;

    /// Performs unsigned modulo of two words.
    fn rem(self, rhs: Word) -> Self::Output {
        if rhs.value == U256::ZERO {
            Word::zero()
        } else {
            Word::new(self.value % rhs.value)
        }
    }
}

impl std::ops::BitAnd<Word> for Word {
    type Output = Word;

    fn bitand(self, rhs: Word) -> Self::Output {
        Word::new(self.value & rhs.value)
    }
}

impl std::ops::BitOr<Word> for Word {
    type Output = Word;

    fn bitor(self, rhs: Word) -> Self::Output {
        Word::new(self.value | rhs.value)
    }
}

impl std::ops::BitXor<Word> for Word {
    type Output = Word;

    fn bitxor(self, rhs: Word) -> Self::Output {
        Word::new(self.value ^ rhs.value)
    }
}

impl std::ops::Not for Word {
    type Output = Word;

    fn not(self) -> Self::Output {
        Word::new(!self.value)
    }
}

impl std::ops::Shl<Word> for Word {
    type Output = Word;

    /// Computes the left shift of `self` by `rhs`, yielding zero for shifts of
    /// 256 or more.
    fn shl(self, rhs: Word) -> Self::Output {
        match Word::shift_amount(rhs) {
            Some(shift) => Word::new(self.value << shift),
            None => Word::zero(),
        }
    }
}

impl std::ops::Shr<Word> for Word {
    type Output = Word;

    /// Computes the unsigned right shift of `self` by `rhs`, yielding zero for
    /// shifts of 256 or more.
    fn shr(self, rhs: Word) -> Self::Output {
        match Word::shift_amount(rhs) {
            Some(shift) => Word::new(self.value >> shift),
            None => Word::zero(),
        }
    }
}

impl From<bool> for Word {
    fn from(value: bool) -> Self {
        if value {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl From<u8> for Word {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Word {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Word {
    fn from(value: usize) -> Self {
        Self::new(value as u128)
    }
}

/// Parses either `0x`-prefixed hexadecimal or plain decimal text.
impl FromStr for Word {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if text.starts_with("0x") || text.starts_with("0X") {
            Self::from_hex(text)
        } else {
            Self::from_decimal(text)
        }
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
