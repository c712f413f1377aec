//! Re-flowing the text of an existing comment block
//!
//! The block body is split into paragraphs at blank `*` lines and at lines
//! starting with a `@tag`. Each paragraph is re-wrapped greedily to the first
//! ruler column, less the indentation of the block.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::config::{Settings, SpacerMode};
use crate::error::{DocblockError, Result};
use super::snippet::escape;

static LEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*?\s*").expect("Invalid comment leader regex"));

static LEADING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*").expect("Invalid leading space regex"));

/// A `/* ... */` block located in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock<'a> {
    /// Index of the line holding the opener
    pub start: usize,

    /// Index of the line holding the closer
    pub end: usize,

    lines: Vec<&'a str>,
}

impl<'a> CommentBlock<'a> {
    fn opener(&self) -> &'a str {
        self.lines[0]
    }

    fn closer(&self) -> &'a str {
        self.lines[self.lines.len() - 1]
    }

    fn body(&self) -> &[&'a str] {
        &self.lines[1..self.lines.len() - 1]
    }
}

/// Find the block whose opener is on line `start` (0-based)
pub fn locate_block<'a>(lines: &[&'a str], start: usize) -> Result<CommentBlock<'a>> {
    let opener = lines.get(start).ok_or(DocblockError::LineOutOfRange {
        line: start + 1,
        total: lines.len(),
    })?;

    let Some(open_at) = opener.find("/*") else {
        return Err(DocblockError::NoCommentBlock { line: start + 1 });
    };
    if opener[open_at + 2..].contains("*/") {
        return Err(DocblockError::NoCommentBlock { line: start + 1 });
    }

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.contains("*/"))
        .map(|(index, _)| index)
        .ok_or(DocblockError::NoCommentBlock { line: start + 1 })?;

    Ok(CommentBlock {
        start,
        end,
        lines: lines[start..=end].to_vec(),
    })
}

/// Display width of leading whitespace, with tabs expanded
fn indentation_width(leader: &str, tab_size: usize) -> usize {
    leader
        .chars()
        .map(|ch| if ch == '\t' { tab_size } else { 1 })
        .sum()
}

#[derive(Debug, Clone, Default)]
struct WrappedParagraph {
    lines: Vec<String>,
    /// The last output line started with a tag
    line_tagged: bool,
    /// The paragraph started with a tag
    tagged: bool,
    tag: Option<String>,
}

pub struct DescriptionWrapper<'a> {
    settings: &'a Settings,
}

impl<'a> DescriptionWrapper<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Rewrapped text of the whole block, opener and closer lines included.
    /// Body text is escaped for insertion as a snippet.
    pub fn rewrap(&self, block: &CommentBlock<'_>) -> String {
        let body = block.body();
        let Some(first) = body.first() else {
            return block.lines.join("\n");
        };

        let base = LEADING_SPACE
            .find(first)
            .map_or("", |m| m.as_str())
            .to_string();
        let indentation = indentation_width(&base, self.settings.tab_size) + 1;
        let budget = self.settings.wrap_column().saturating_sub(indentation);
        debug!(
            "Wrapping {} body lines at {} columns (indentation {})",
            body.len(),
            budget,
            indentation
        );

        let paragraphs: Vec<WrappedParagraph> = split_paragraphs(body)
            .iter()
            .map(|text| self.wrap_paragraph(text, budget))
            .collect();

        let mut out = vec![block.opener().to_string()];
        for (index, paragraph) in paragraphs.iter().enumerate() {
            for line in &paragraph.lines {
                out.push(format!("{}*{}", base, escape(line)));
            }
            if needs_separator(self.settings.spacer_between_sections, paragraph, paragraphs.get(index + 1)) {
                out.push(format!("{}*", base));
            }
        }
        out.push(block.closer().to_string());

        out.join("\n")
    }

    /// Greedy fill: a word goes on the current line unless the line would
    /// reach the budget, in which case it starts the next one.
    fn wrap_paragraph(&self, text: &str, budget: usize) -> WrappedParagraph {
        let indent = self.settings.indent();
        let continuation = self.settings.same_para_indent();
        let limit = budget.saturating_sub(1);

        let mut wrapped = WrappedParagraph::default();
        let mut line = indent.clone();

        for (position, word) in text.trim().split(' ').enumerate() {
            // runs of spaces only survive on tag lines, where they align columns
            if word.is_empty() && !wrapped.line_tagged {
                continue;
            }

            if position == 0 && word.starts_with('@') {
                wrapped.line_tagged = true;
                wrapped.tagged = true;
                wrapped.tag = Some(word.to_string());
            }

            let has_words = !line.trim().is_empty();
            if has_words && line.width() + word.width() >= limit {
                wrapped.lines.push(line.trim_end().to_string());
                line = format!("{}{} ", continuation, word);
                wrapped.line_tagged = false;
            } else {
                line.push_str(word);
                line.push(' ');
            }
        }

        wrapped.lines.push(line.trim_end().to_string());
        wrapped
    }
}

/// Paragraph texts of a block body, leaders removed and lines joined
fn split_paragraphs(body: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in body {
        let content = LEADER.replace(line, "");
        let content = content.trim_end();

        if content.is_empty() || content.starts_with('@') {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            if content.is_empty() {
                continue;
            }
        }
        current.push(content.to_string());
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Whether a blank `*` line follows `paragraph`
fn needs_separator(
    mode: SpacerMode,
    paragraph: &WrappedParagraph,
    next: Option<&WrappedParagraph>,
) -> bool {
    let Some(next) = next else {
        return false;
    };

    let plain_text = !(paragraph.line_tagged || next.tagged);
    match mode {
        SpacerMode::Off => plain_text,
        SpacerMode::BetweenSections => {
            let same_tag = next.tagged && paragraph.tag == next.tag;
            plain_text || !same_tag
        }
        SpacerMode::AfterDescription => plain_text || (!paragraph.tagged && next.tagged),
    }
}
