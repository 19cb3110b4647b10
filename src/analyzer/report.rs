//! The serializable summary of an analysis.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    comment::{latest, LineComment},
    error,
};

/// The outcome of analyzing one document, in a form that can be written out
/// as JSON.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Report {
    /// The path of the analyzed document.
    pub path: String,

    /// The comment that ends up on each line, in line order.
    pub comments: Vec<LineComment>,

    /// Everything that went wrong, in line order.
    pub diagnostics: Vec<Diagnostic>,

    /// Whether the analysis stopped early because it ran out of steps.
    pub halted: bool,
}

/// A single problem found during the analysis.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The 1-based line of the problem, or `0` if it concerns the whole
    /// document.
    pub line: u32,

    pub message: String,
}

impl Report {
    /// Builds the report for the document at `path`.
    #[must_use]
    pub fn new(
        path: &Path,
        comments: &[LineComment],
        diagnostics: &error::Errors,
        halted: bool,
    ) -> Self {
        let comments = latest(comments)
            .into_iter()
            .map(|(line, stack)| LineComment {
                line,
                stack: stack.to_string(),
            })
            .collect();
        let diagnostics = diagnostics
            .payloads()
            .iter()
            .map(|error| Diagnostic {
                line:    error.location,
                message: error.payload.to_string(),
            })
            .collect();

        Self {
            path: path.display().to_string(),
            comments,
            diagnostics,
            halted,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::{
        analyzer::report::Report,
        comment::LineComment,
        error::{container::Locatable, execution, Errors},
    };

    #[test]
    fn keeps_the_final_comment_for_each_line() -> anyhow::Result<()> {
        let comments = vec![
            LineComment {
                line:  3,
                stack: "[0x01]".into(),
            },
            LineComment {
                line:  1,
                stack: "[]".into(),
            },
            LineComment {
                line:  3,
                stack: "[0x02]".into(),
            },
        ];
        let diagnostics: Errors = execution::Error::StackUnderflow.locate(3).into();

        let report = Report::new(Path::new("main.huff"), &comments, &diagnostics, false);
        assert_eq!(report.comments.len(), 2);
        assert_eq!(report.comments[1].stack, "[0x02]");
        assert_eq!(report.diagnostics[0].message, "Stack underflow");

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["comments"][0]["line"], 1);
        assert_eq!(json["diagnostics"][0]["line"], 3);

        Ok(())
    }
}
