//! Smaller edits on existing comments: reparse, decorate and join

use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

use crate::error::{DocblockError, Result};
use super::snippet::{bracketed_to_tab_stops, escape};

static CONTINUATION_LEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s+\*").expect("Invalid continuation leader regex"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)(//.*)$").expect("Invalid line comment regex"));

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*\n[ \t]*(?:(?:\*|//[!/]?|#)[ \t]*)?").expect("Invalid line break regex")
});

/// Turn every `[bracketed]` field of a written block back into a tab-stop.
///
/// Everything else is escaped, and continuation lines are re-indented to
/// ` *` since the host re-applies the block's indentation on insert.
pub fn reparse(block: &str) -> String {
    let escaped = escape(block);
    let normalized = CONTINUATION_LEADER.replace_all(&escaped, "\n *");
    bracketed_to_tab_stops(&normalized)
}

/// Box a run of `//` comment lines in a `/` banner.
///
/// `first_line` is the 0-based index of `lines[0]` in the buffer and only
/// feeds error messages.
pub fn decorate(lines: &[&str], first_line: usize) -> Result<String> {
    let mut comments = Vec::with_capacity(lines.len());
    for (offset, line) in lines.iter().enumerate() {
        let caps = LINE_COMMENT
            .captures(line)
            .ok_or(DocblockError::NotLineComment {
                line: first_line + offset + 1,
            })?;
        comments.push((caps.get(1).map_or("", |m| m.as_str()), caps.get(2).map_or("", |m| m.as_str())));
    }

    let Some((leading, _)) = comments.first().copied() else {
        return Ok(String::new());
    };

    let width = comments
        .iter()
        .map(|(_, text)| text.trim_end().width())
        .max()
        .unwrap_or(0);
    let border = format!("{}{}", leading, "/".repeat(width + 3));

    let mut out = Vec::with_capacity(comments.len() + 2);
    out.push(border.clone());
    for (_, text) in &comments {
        let text = text.trim_end();
        let padding = 1 + width - text.width();
        out.push(format!("{}{}{}//", leading, text, " ".repeat(padding)));
    }
    out.push(border);

    Ok(out.join("\n"))
}

/// Join lines into one, dropping the comment leader of each joined line
pub fn join_lines(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}
