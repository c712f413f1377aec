//! Collecting the text of a declaration from the lines following the cursor

use regex::Regex;
use std::sync::LazyLock;

use super::languages::LanguageProfile;

/// Never read more than this many lines looking for the end of a declaration
pub const MAX_DEFINITION_LINES: usize = 25;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("Invalid line comment regex"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*.*\*/").expect("Invalid block comment regex"));

static TRAILING_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[;{]\s*$").expect("Invalid terminator regex"));

/// Read access to the buffer holding the declaration
pub trait LineSource {
    /// The line at `index`, or `None` past the end of the buffer
    fn line_at(&self, index: usize) -> Option<&str>;
}

impl LineSource for Vec<&str> {
    fn line_at(&self, index: usize) -> Option<&str> {
        self.get(index).copied()
    }
}

impl LineSource for Vec<String> {
    fn line_at(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

/// Lines of an in-memory text buffer
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LineSource for SourceLines<'_> {
    fn line_at(&self, index: usize) -> Option<&str> {
        self.lines.get(index).copied()
    }
}

/// Remove `//` comments from a line
pub fn strip_line_comment(line: &str) -> String {
    LINE_COMMENT.replace(line, "").into_owned()
}

/// Remove `//` and single-line `/* */` comments from a line
pub fn strip_comments(line: &str) -> String {
    let line = LINE_COMMENT.replace(line, "");
    BLOCK_COMMENT.replace(&line, "").into_owned()
}

/// Drop the `;` or `{` that ends a statement-style declaration
pub fn strip_terminator(definition: &str) -> String {
    TRAILING_TERMINATOR.replace(definition, "").into_owned()
}

fn paren_balance(text: &str) -> i32 {
    text.chars().fold(0, |total, ch| match ch {
        '(' => total + 1,
        ')' => total - 1,
        _ => total,
    })
}

/// Concatenate lines until the parentheses opened by the declaration close.
///
/// On the first line, counting starts where the language's function opener
/// matches so that wrapping parentheses such as `(function (a) { ... })`
/// are ignored.
pub fn collect_balanced(profile: &LanguageProfile, source: &dyn LineSource, start: usize) -> String {
    let mut definition = String::new();
    let mut open_brackets = 0;

    for index in start..start.saturating_add(MAX_DEFINITION_LINES) {
        let Some(raw) = source.line_at(index) else {
            break;
        };

        let line = strip_comments(raw);

        let counted: &str = if definition.is_empty() {
            profile
                .fn_opener
                .as_ref()
                .and_then(|opener| opener.find(&line))
                .map(|found| &line[found.start()..])
                .unwrap_or(line.as_str())
        } else {
            &line
        };

        open_brackets += paren_balance(counted);
        definition.push_str(&line);

        if open_brackets == 0 {
            break;
        }
    }

    definition
}

/// Concatenate lines until one contains `;` or `{`.
///
/// A first line that does not look like a function is taken on its own.
pub fn collect_until_terminator(
    profile: &LanguageProfile,
    source: &dyn LineSource,
    start: usize,
) -> String {
    let mut definition = String::new();

    for index in start..start.saturating_add(MAX_DEFINITION_LINES) {
        let Some(raw) = source.line_at(index) else {
            break;
        };

        let line = strip_line_comment(raw);

        if definition.is_empty() {
            let is_function = profile
                .fn_opener
                .as_ref()
                .is_some_and(|opener| opener.is_match(&line));
            if !is_function {
                return line;
            }
        }

        definition.push_str(&line);

        if line.contains(';') || line.contains('{') {
            return strip_terminator(&definition);
        }
    }

    definition
}
