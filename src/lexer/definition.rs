//! Parsing of the headers of `#define` directives.
//!
//! The lexer keeps each directive as a single token, and the functions here
//! pull the interesting pieces back out of its text.

/// The name and declared stack arity of a `#define macro`, `#define fn`, or
/// `#define test`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacroHeader {
    /// The keyword that introduced the definition, such as `macro`.
    pub kind: String,

    /// The name of the macro.
    pub name: String,

    /// The number of stack items the macro consumes, if it was declared.
    pub takes: Option<usize>,

    /// The number of stack items the macro produces, if it was declared.
    pub returns: Option<usize>,
}

impl MacroHeader {
    /// Parses the header of a macro definition from the text of its token.
    ///
    /// Returns [`None`] if the text does not name a macro.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let kind = definition_kind(text)?;
        let name = definition_name(text)?;
        let after_name = &text[text.find(name)? + name.len()..];

        // Skip the parameter list so that parameter names cannot be mistaken
        // for the arity keywords.
        let rest = match balanced_group(after_name) {
            Some((_, end)) => &after_name[end..],
            None => after_name,
        };

        Some(Self {
            kind:    kind.to_string(),
            name:    name.to_string(),
            takes:   keyword_arity(rest, "takes"),
            returns: keyword_arity(rest, "returns"),
        })
    }
}

/// Gets the keyword of a `#define <kind> <name>` directive.
#[must_use]
pub fn definition_kind(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix("#define")?.trim_start();
    let kind_end = rest.find(|c: char| c.is_whitespace())?;
    Some(&rest[..kind_end])
}

/// Gets the name declared by a `#define <kind> <name>` directive.
#[must_use]
pub fn definition_name(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix("#define")?.trim_start();
    let kind_end = rest.find(|c: char| c.is_whitespace())?;
    let rest = rest[kind_end..].trim_start();

    let name_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..name_end];

    (!name.is_empty()).then_some(name)
}

/// Gets the canonical `name(type,type,...)` signature from the text of a
/// `#define function|event|error` directive.
#[must_use]
pub fn definition_signature(text: &str) -> Option<String> {
    let name = definition_name(text)?;
    let from_name = &text[text.find(name)?..];
    canonical_signature(from_name)
}

/// Canonicalises a signature such as `Transfer(address indexed from, uint256)`
/// into the form that is hashed for selectors, `Transfer(address,uint256)`.
///
/// Surrounding quotes are ignored, parameter names and modifiers are dropped,
/// and all whitespace is removed. Returns [`None`] if there is no
/// parenthesised parameter list.
#[must_use]
pub fn canonical_signature(text: &str) -> Option<String> {
    let text = text.trim().trim_matches(|c| c == '"' || c == '\'');
    let open = text.find('(')?;
    let name = text[..open].trim();
    let (params, _) = balanced_group(&text[open..])?;

    let types: Vec<String> = split_top_level(params, ',')
        .into_iter()
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(|param| {
            let type_part = split_top_level(param, ' ')
                .into_iter()
                .find(|part| !part.is_empty())
                .unwrap_or(param);
            type_part.split_whitespace().collect::<String>()
        })
        .collect();

    Some(format!("{name}({})", types.join(",")))
}

/// Finds the first parenthesised group in `text`, returning its contents and
/// the index just past its closing parenthesis.
fn balanced_group(text: &str) -> Option<(&str, usize)> {
    let open = text.find('(')?;
    let mut depth = 0usize;

    for (index, character) in text[open..].char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + index;
                    return Some((&text[open + 1..close], close + 1));
                }
            }
            _ => (),
        }
    }

    None
}

/// Splits `text` on `separator`, ignoring separators nested in parentheses.
///
/// Any whitespace counts as a match when `separator` is a space.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let matches = |c: char| {
        if separator == ' ' {
            c.is_whitespace()
        } else {
            c == separator
        }
    };

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, character) in text.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && matches(c) => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => (),
        }
    }
    parts.push(&text[start..]);

    parts
}

/// Reads the number in `keyword(n)` from `text`.
fn keyword_arity(text: &str, keyword: &str) -> Option<usize> {
    let start = text.find(keyword)? + keyword.len();
    let rest = text[start..].trim_start().strip_prefix('(')?;
    let close = rest.find(')')?;
    rest[..close].trim().parse().ok()
}
