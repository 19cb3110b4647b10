//! This module turns the stacks recorded by the interpreter into trailing
//! comments on the lines of the source text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constant::STACK_COMMENT_PREFIX;

/// The stack recorded after executing the last token on a source line.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LineComment {
    /// The 1-based line that the comment belongs to.
    pub line: u32,

    /// The rendered stack, such as `[0x01, caller]`.
    pub stack: String,
}

/// Gets the comment that ends up on each line.
///
/// When a line was recorded more than once, the last recording wins.
#[must_use]
pub fn latest(comments: &[LineComment]) -> BTreeMap<u32, &str> {
    comments
        .iter()
        .map(|comment| (comment.line, comment.stack.as_str()))
        .collect()
}

/// Rewrites `source` with a `// [stack]` comment at the end of every line that
/// has one in `comments`.
///
/// Any comment already trailing such a line is replaced. The new comments all
/// start in the same column, one past the longest line of code in the
/// document. Lines without a comment are left exactly as they were.
///
/// ```
/// use huff_stack_comments::comment::{annotate, LineComment};
///
/// let comments = vec![LineComment { line: 2, stack: "[0x01]".into() }];
/// let annotated = annotate("#define macro A() = takes(0) returns(0) {\n 0x01\n}", &comments);
///
/// assert!(annotated.lines().nth(1).is_some_and(|l| l.ends_with("// [0x01]")));
/// ```
#[must_use]
pub fn annotate(source: &str, comments: &[LineComment]) -> String {
    let latest = latest(comments);
    let column = source
        .split('\n')
        .map(|line| code_of(line).chars().count())
        .max()
        .unwrap_or(0)
        + 1;

    source
        .split('\n')
        .zip(1u32..)
        .map(|(line, number)| match latest.get(&number) {
            Some(stack) => {
                let ending = if line.ends_with('\r') { "\r" } else { "" };
                format!(
                    "{:<column$}{STACK_COMMENT_PREFIX}{stack}{ending}",
                    code_of(line)
                )
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Gets the code on `line`, without any trailing comment or whitespace.
fn code_of(line: &str) -> &str {
    let code = line.find("//").map_or(line, |start| &line[..start]);
    code.trim_end()
}

#[cfg(test)]
mod test {
    use crate::comment::{annotate, latest, LineComment};

    fn comment(line: u32, stack: &str) -> LineComment {
        LineComment {
            line,
            stack: stack.to_string(),
        }
    }

    #[test]
    fn later_comments_replace_earlier_ones() {
        let comments = vec![comment(2, "[0x01]"), comment(3, "[]"), comment(2, "[0x02]")];
        let latest = latest(&comments);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&2], "[0x02]");
        assert_eq!(latest[&3], "[]");
    }

    #[test]
    fn aligns_comments_past_the_longest_line() {
        let source = "0x01\n0x02 0x03 add // old\n\nlonger line here";
        let comments = vec![comment(1, "[0x01]"), comment(2, "[0x5, 0x01]")];

        let annotated = annotate(source, &comments);
        let lines: Vec<&str> = annotated.split('\n').collect();

        assert_eq!(lines[0], format!("{:<17}// [0x01]", "0x01"));
        assert_eq!(lines[1], format!("{:<17}// [0x5, 0x01]", "0x02 0x03 add"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "longer line here");
    }

    #[test]
    fn aligns_by_characters_rather_than_bytes() {
        let source = "\"héllo wörld\"\n0x01";
        let comments = vec![comment(1, "[]"), comment(2, "[0x01]")];

        let annotated = annotate(source, &comments);
        let columns: Vec<usize> = annotated
            .split('\n')
            .filter_map(|line| line.find("// ").map(|at| line[..at].chars().count()))
            .collect();

        assert_eq!(columns, vec![14, 14]);
    }

    #[test]
    fn annotating_twice_is_stable() {
        let source = "0x01\r\nadd\r\n";
        let comments = vec![comment(1, "[0x01]"), comment(2, "[?]")];

        let once = annotate(source, &comments);
        let twice = annotate(&once, &comments);

        assert_eq!(once, twice);
        assert!(once.starts_with("0x01 // [0x01]\r\n"));
    }
}
