use regex::Regex;
use std::sync::LazyLock;

use super::{pattern, return_type_from_name, LanguageProfile, LanguageRules, JS_IDENTIFIER};
use crate::core::definition::{strip_comments, strip_terminator, LineSource, MAX_DEFINITION_LINES};
use crate::core::inference::NotationTable;
use crate::core::parser::{ArgList, Argument, FunctionDecl, ReturnType};
use crate::core::tokenizer::split_top_level;

const MODIFIERS: [&str; 10] = [
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "transient",
    "synchronized",
    "native",
    "strictfp",
];

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*$").expect("Invalid blank line regex"));

static ANNOTATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@").expect("Invalid annotation regex"));

static LEADING_ANNOTATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:@[\w.$]+(?:\s*\([^()]*\))?\s*)+").expect("Invalid annotation prefix regex")
});

/// Opened minus closed `(` and `{` on a line
fn bracket_balance(line: &str) -> i32 {
    line.chars().fold(0, |total, ch| match ch {
        '(' | '{' => total + 1,
        ')' | '}' => total - 1,
        _ => total,
    })
}

/// Last whitespace-separated word of a slot, which is the declared name
fn last_word(slot: &str) -> &str {
    slot.split_whitespace().last().unwrap_or("")
}

/// Java and Groovy: modifiers, generic return types, `throws` clauses
pub struct JavaRules {
    profile: LanguageProfile,
    function_re: Regex,
}

impl JavaRules {
    pub fn new() -> Self {
        let id = JS_IDENTIFIER;
        let modifiers = MODIFIERS.join("|");

        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"{id}(?:\s+{id})?\s*\("))),
            comment_closer: " */".to_string(),
            bool_type: "Boolean".to_string(),
            function_type: "Function".to_string(),
            curly_types: false,
            type_info: false,
            type_tag: "type".to_string(),
        };

        Self {
            function_re: pattern(&format!(
                r"(?:(?:{modifiers})\s+)*(?P<retval>[a-zA-Z_$][<>., a-zA-Z_$0-9\[\]]+)\s+(?P<name>{id})\s*\((?P<args>.*)\)\s*(?:throws)?\s*(?P<throws>[a-zA-Z_$0-9.,\s]*)"
            )),
            profile,
        }
    }
}

impl Default for JavaRules {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRules for JavaRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text.trim())?;

        let args = split_top_level(&caps["args"])
            .iter()
            .map(|slot| last_word(slot))
            .filter(|name| !name.is_empty())
            .map(|name| Argument::new(None, name))
            .collect();

        let throws = caps["throws"]
            .split(',')
            .map(last_word)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let mut function =
            FunctionDecl::new(&caps["name"], "").with_retval(Some(caps["retval"].trim().to_string()));
        function.args = ArgList::Resolved(args);
        function.throws = throws;
        Some(function)
    }

    /// A return type that is really a modifier means a constructor
    fn function_return_type(
        &self,
        name: &str,
        declared: Option<&str>,
        notations: &NotationTable,
    ) -> ReturnType {
        match declared {
            Some("void") => ReturnType::Suppressed,
            Some(declared) if !MODIFIERS.contains(&declared) => ReturnType::Known(declared.to_string()),
            _ => return_type_from_name(&self.profile, name, notations),
        }
    }

    /// Skips blank lines and annotations (including ones spanning several
    /// lines) before reading up to the first `;` or `{`
    fn collect_definition(&self, source: &dyn LineSource, start: usize) -> String {
        let is_function = |line: &str| {
            self.profile
                .fn_opener
                .as_ref()
                .is_some_and(|opener| opener.is_match(line))
        };
        let mut definition = String::new();
        let mut annotation_depth = 0;

        for index in start..start.saturating_add(MAX_DEFINITION_LINES) {
            let Some(raw) = source.line_at(index) else {
                break;
            };
            let mut line = strip_comments(raw);

            if definition.is_empty() {
                if annotation_depth > 0 {
                    annotation_depth += bracket_balance(&line);
                    continue;
                }
                if BLANK_LINE.is_match(&line) {
                    continue;
                }
                if ANNOTATION_LINE.is_match(&line) {
                    let rest = LEADING_ANNOTATIONS.replace(&line, "").into_owned();
                    if !is_function(&rest) {
                        annotation_depth = bracket_balance(&line).max(0);
                        continue;
                    }
                    line = rest;
                } else if !is_function(&line) {
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
}
