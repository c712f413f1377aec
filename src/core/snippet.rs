//! Snippet text helpers
//!
//! Output lines carry editor placeholders of the form `${index:default}`.
//! Literal `$`, `{` and `}` taken from source code are backslash-escaped so
//! the host does not mistake them for placeholder syntax.

use chrono::{DateTime, FixedOffset};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\d+):((?:\\.|[^\\}])+)\}").expect("Invalid placeholder regex")
});

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Invalid variable regex"));

static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@([a-zA-Z]+)").expect("Invalid tag regex"));

/// Backslash-escape the characters that have meaning in snippet syntax
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '{' | '}') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("\\$", "$")
        .replace("\\{", "{")
        .replace("\\}", "}")
}

/// A tab-stop with default text; the index is provisional until renumbering
pub fn placeholder(default: &str) -> String {
    format!("${{1:{}}}", default)
}

/// Wrap a type in braces when the language style asks for it
pub fn curly(text: &str, curly_types: bool) -> String {
    if curly_types {
        format!("{{{}}}", text)
    } else {
        text.to_string()
    }
}

/// Width of `text` once the editor resolves every placeholder to its default
pub fn output_width(text: &str) -> usize {
    let resolved = PLACEHOLDER.replace_all(text, "$2");
    unescape(&resolved).width()
}

/// Split a tag line on the spaces between its columns.
///
/// Spaces inside a `${index:default}` placeholder, or inside the braces
/// wrapping one, stay part of their column. Escaped braces do not nest.
pub fn split_columns(line: &str) -> Vec<&str> {
    let mut columns = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut escaped = false;

    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => {
                columns.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    columns.push(&line[start..]);
    columns
}

/// Tag name of a `@tag` line, without the `@`
pub fn tag_name(line: &str) -> Option<&str> {
    TAG_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrite placeholder indices into a consecutive sequence starting at 1,
/// one new index per occurrence, top to bottom and left to right
pub fn renumber_tab_stops(lines: Vec<String>) -> Vec<String> {
    let mut next_index = 0usize;

    lines
        .into_iter()
        .map(|line| {
            PLACEHOLDER
                .replace_all(&line, |caps: &Captures| {
                    next_index += 1;
                    format!("${{{}:{}}}", next_index, &caps[2])
                })
                .into_owned()
        })
        .collect()
}

/// Replace `{{date}}` and `{{datetime}}` with one timestamp for the whole block
pub fn substitute_variables(lines: Vec<String>, now: &DateTime<FixedOffset>) -> Vec<String> {
    let date = now.format("%Y-%m-%d").to_string();
    let datetime = now.format("%Y-%m-%dT%H:%M:%S%z").to_string();

    lines
        .into_iter()
        .map(|line| {
            VARIABLE
                .replace_all(&line, |caps: &Captures| match &caps[1] {
                    "date" => date.clone(),
                    "datetime" => datetime.clone(),
                    _ => caps[0].to_string(),
                })
                .into_owned()
        })
        .collect()
}

/// Convert every `[bracketed]` run into a consecutive tab-stop
pub fn bracketed_to_tab_stops(text: &str) -> String {
    static BRACKETED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\[.+?\])").expect("Invalid bracket regex"));

    let mut next_index = 0usize;
    BRACKETED
        .replace_all(text, |caps: &Captures| {
            next_index += 1;
            format!("${{{}:{}}}", next_index, &caps[1])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_escape_marks_each_occurrence_once() {
        assert_eq!(escape("$foo"), "\\$foo");
        assert_eq!(escape("{a}"), "\\{a\\}");
        assert_eq!(escape("${x}$"), "\\$\\{x\\}\\$");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_output_width_counts_default_text() {
        assert_eq!(output_width("${1:foo}"), 3);
        assert_eq!(output_width("{${1:[type]}}"), 8);
        assert_eq!(output_width("\\$a1"), 3);
        assert_eq!(output_width("${4:[\\$a description]}"), 16);
    }

    #[test]
    fn test_output_width_counts_display_cells() {
        assert_eq!(output_width("{${1:名前}}"), 6);
        assert_eq!(output_width("${2:漢字 description}"), 16);
    }

    #[test]
    fn test_split_columns_keeps_placeholders_whole() {
        assert_eq!(
            split_columns("@param {${2:(x: number) => void}} cb ${3:[description]}"),
            vec!["@param", "{${2:(x: number) => void}}", "cb", "${3:[description]}"]
        );
        assert_eq!(split_columns("@return {${6:[type]}}  ${7:x}"), vec!["@return", "{${6:[type]}}", "", "${7:x}"]);
        assert_eq!(split_columns("@param \\{ a"), vec!["@param", "\\{", "a"]);
    }

    #[test]
    fn test_renumber_assigns_one_index_per_occurrence() {
        let out = renumber_tab_stops(lines(&[
            "${1:[foo description]}",
            "@param {${1:[type]}} bar ${1:[description]}",
            "@return {${7:[type]}}",
        ]));

        assert_eq!(
            out,
            lines(&[
                "${1:[foo description]}",
                "@param {${2:[type]}} bar ${3:[description]}",
                "@return {${4:[type]}}",
            ])
        );
    }

    #[test]
    fn test_renumber_is_stable_on_consecutive_input() {
        let input = lines(&["${1:a}", "@param ${2:b} ${3:c}"]);
        assert_eq!(renumber_tab_stops(input.clone()), input);
    }

    #[test]
    fn test_renumber_skips_escaped_braces_inside_defaults() {
        let out = renumber_tab_stops(lines(&["${9:[\\{a\\} description]} ${3:x}"]));
        assert_eq!(out, lines(&["${1:[\\{a\\} description]} ${2:x}"]));
    }

    #[test]
    fn test_substitute_variables() {
        let now = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap();

        let out = substitute_variables(
            lines(&["@since {{date}}", "@at {{datetime}} {{datetime}}", "@keep {{other}}"]),
            &now,
        );

        assert_eq!(out[0], "@since 2024-03-09");
        assert_eq!(out[1], "@at 2024-03-09T14:05:07+0200 2024-03-09T14:05:07+0200");
        assert_eq!(out[2], "@keep {{other}}");
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("@param foo"), Some("param"));
        assert_eq!(tag_name("  @return"), Some("return"));
        assert_eq!(tag_name("description"), None);
    }

    #[test]
    fn test_bracketed_to_tab_stops() {
        assert_eq!(
            bracketed_to_tab_stops("@param {[type]} a [description]"),
            "@param {${1:[type]}} a ${2:[description]}"
        );
    }
}
