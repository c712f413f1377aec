//! Name-based type inference
//!
//! Literal-value guessing is language specific and lives with each language;
//! this module covers the rules shared by all of them: the configured
//! notation table, `is`/`has` predicates and conventional callback names.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::NotationRule;
use crate::error::{DocblockError, Result};
use super::languages::LanguageProfile;

static PREDICATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:is|has)[A-Z_]").expect("Invalid predicate regex"));

static CALLBACK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:cb|callback|done|next|fn)$").expect("Invalid callback regex")
});

/// A notation rule with its matcher compiled
#[derive(Debug, Clone)]
pub struct Notation {
    matcher: Regex,
    pub type_name: Option<String>,
    pub tags: Vec<String>,
}

impl Notation {
    fn compile(rule: &NotationRule) -> Result<Option<Self>> {
        let pattern = if let Some(prefix) = &rule.prefix {
            let mut pattern = format!("^{}", regex::escape(prefix));
            // lowercase prefixes must end at a camelCase or snake_case boundary
            if prefix.chars().any(|c| c.is_ascii_lowercase()) {
                pattern.push_str("(?:[A-Z_]|$)");
            }
            pattern
        } else if let Some(regex) = &rule.regex {
            regex.clone()
        } else {
            return Ok(None);
        };

        let matcher = Regex::new(&pattern).map_err(|source| DocblockError::InvalidNotation {
            rule: pattern.clone(),
            source,
        })?;

        Ok(Some(Self {
            matcher,
            type_name: rule.type_name.clone(),
            tags: rule.tags.clone(),
        }))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// The ordered notation rules from configuration
#[derive(Debug, Clone, Default)]
pub struct NotationTable {
    rules: Vec<Notation>,
}

impl NotationTable {
    /// Compile the configured rules; rules with neither `prefix` nor `regex` are ignored
    pub fn compile(rules: &[NotationRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            if let Some(notation) = Notation::compile(rule)? {
                compiled.push(notation);
            }
        }
        Ok(Self { rules: compiled })
    }

    /// Every rule matching `name`, in configured order
    pub fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Notation> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(name))
    }

    /// Tag lines contributed by every rule matching `name`
    pub fn tags_for(&self, name: &str) -> Vec<String> {
        self.matching(name)
            .flat_map(|rule| rule.tags.iter().cloned())
            .collect()
    }
}

/// Guess a type from a variable or function name
///
/// The first matching notation rule with a type wins; `bool` and `function`
/// resolve to the language's own spelling.
pub fn guess_type_from_name(
    name: &str,
    profile: &LanguageProfile,
    notations: &NotationTable,
) -> Option<String> {
    if let Some(rule) = notations.matching(name).next() {
        if let Some(type_name) = &rule.type_name {
            return Some(profile.resolve_type_alias(type_name));
        }
    }

    if PREDICATE_NAME.is_match(name) {
        return Some(profile.bool_type.clone());
    }

    if CALLBACK_NAME.is_match(name) {
        return Some(profile.function_type.clone());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::languages::Language;

    fn js_profile() -> LanguageProfile {
        Language::JavaScript.rules(&Settings::default()).profile().clone()
    }

    fn table(rules: Vec<NotationRule>) -> NotationTable {
        NotationTable::compile(&rules).unwrap()
    }

    #[test]
    fn test_predicates_and_callbacks() {
        let profile = js_profile();
        let empty = NotationTable::default();

        assert_eq!(guess_type_from_name("isOpen", &profile, &empty).as_deref(), Some("Boolean"));
        assert_eq!(guess_type_from_name("has_items", &profile, &empty).as_deref(), Some("Boolean"));
        assert_eq!(guess_type_from_name("island", &profile, &empty), None);
        assert_eq!(guess_type_from_name("callback", &profile, &empty).as_deref(), Some("Function"));
        assert_eq!(guess_type_from_name("nextItem", &profile, &empty), None);
    }

    #[test]
    fn test_prefix_rules_respect_boundaries() {
        let profile = js_profile();
        let notations = table(vec![NotationRule {
            prefix: Some("str".to_string()),
            type_name: Some("String".to_string()),
            ..Default::default()
        }]);

        assert_eq!(guess_type_from_name("strName", &profile, &notations).as_deref(), Some("String"));
        assert_eq!(guess_type_from_name("str_name", &profile, &notations).as_deref(), Some("String"));
        assert_eq!(guess_type_from_name("str", &profile, &notations).as_deref(), Some("String"));
        assert_eq!(guess_type_from_name("stream", &profile, &notations), None);
    }

    #[test]
    fn test_first_matching_rule_wins_and_aliases_resolve() {
        let profile = js_profile();
        let notations = table(vec![
            NotationRule {
                regex: Some("Flag$".to_string()),
                type_name: Some("bool".to_string()),
                ..Default::default()
            },
            NotationRule {
                regex: Some("Flag".to_string()),
                type_name: Some("Number".to_string()),
                ..Default::default()
            },
        ]);

        assert_eq!(guess_type_from_name("dirtyFlag", &profile, &notations).as_deref(), Some("Boolean"));
        assert_eq!(guess_type_from_name("FlagCount", &profile, &notations).as_deref(), Some("Number"));
    }

    #[test]
    fn test_tags_collected_from_every_match() {
        let notations = table(vec![
            NotationRule {
                regex: Some("^_".to_string()),
                tags: vec!["@private".to_string()],
                ..Default::default()
            },
            NotationRule {
                prefix: Some("_get".to_string()),
                tags: vec!["@internal".to_string()],
                ..Default::default()
            },
        ]);

        assert_eq!(notations.tags_for("_getThing"), vec!["@private", "@internal"]);
        assert!(notations.tags_for("public").is_empty());
    }

    #[test]
    fn test_invalid_regex_is_a_config_error() {
        let result = NotationTable::compile(&[NotationRule {
            regex: Some("(".to_string()),
            ..Default::default()
        }]);
        assert!(matches!(result, Err(DocblockError::InvalidNotation { .. })));
    }
}
