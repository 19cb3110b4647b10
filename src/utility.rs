//! Utility functions for rendering stack values as text.

use itertools::Itertools;

use crate::constant::DIGIT_RUN_COMPRESSION_THRESHOLD;

/// Compresses every run of identical hex or decimal digits in `text` that is
/// at least [`DIGIT_RUN_COMPRESSION_THRESHOLD`] long into its first two
/// characters, an ellipsis, and its last character.
///
/// The case of the digits is preserved, and runs of any other character are
/// left alone.
///
/// ```
/// use huff_stack_comments::utility::compress_digit_runs;
///
/// assert_eq!(compress_digit_runs("0xaaaaaaaaaa"), "0xaa...a");
/// assert_eq!(compress_digit_runs("0xaaaa"), "0xaaaa");
/// ```
#[must_use]
pub fn compress_digit_runs(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let runs = text.chars().group_by(|c| *c);

    for (character, run) in &runs {
        let length = run.count();
        if character.is_ascii_hexdigit() && length >= DIGIT_RUN_COMPRESSION_THRESHOLD {
            output.push(character);
            output.push(character);
            output.push_str("...");
            output.push(character);
        } else {
            output.extend(std::iter::repeat(character).take(length));
        }
    }

    output
}

/// Clips `text` to its first four and last two characters if it is longer
/// than `max_length` characters.
#[must_use]
pub fn clip(text: &str, max_length: usize) -> String {
    let length = text.chars().count();
    if length <= max_length {
        return text.to_string();
    }

    let head: String = text.chars().take(4).collect();
    let tail: String = text.chars().skip(length - 2).collect();
    format!("{head}...{tail}")
}
