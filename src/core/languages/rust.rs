use regex::Regex;

use super::{pattern, LanguageProfile, LanguageRules};
use crate::core::inference::NotationTable;
use crate::core::parser::{Argument, FunctionDecl, ReturnType};
use crate::core::tokenizer::split_top_level;

const NAME_TOKEN: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";

/// Rust: `fn` items with their qualifiers; parameters are documented by name only
pub struct RustRules {
    profile: LanguageProfile,
    function_re: Regex,
    lifetime_re: Regex,
    receiver_re: Regex,
}

impl RustRules {
    pub fn new() -> Self {
        let qualifiers = r#"(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe|extern(?:\s+"[^"]*")?)\s+)*"#;

        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"^\s*{qualifiers}fn\b"))),
            comment_closer: " */".to_string(),
            bool_type: "bool".to_string(),
            function_type: "fn".to_string(),
            curly_types: false,
            type_info: false,
            type_tag: "type".to_string(),
        };

        Self {
            function_re: pattern(&format!(
                r"^\s*{qualifiers}fn\s+(?P<name>{NAME_TOKEN})\s*(?:<.*?>)?\s*\((?P<args>.*)\)(?:\s*->\s*(?P<retval>[^{{;]+?))?\s*(?:where\b[^{{;]*)?(?:[{{;].*)?$"
            )),
            lifetime_re: pattern(r"'[a-zA-Z_][a-zA-Z0-9_]*"),
            receiver_re: pattern(r"^&?\s*(?:mut\s+)?self\b"),
            profile,
        }
    }
}

impl Default for RustRules {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRules for RustRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let retval = caps.name("retval").map(|m| m.as_str().trim().to_string());
        Some(FunctionDecl::new(&caps["name"], &caps["args"]).with_retval(retval))
    }

    /// The pattern before the first `:`, without `mut`
    fn arg_name(&self, arg: &str) -> String {
        let pattern = arg.split(':').next().unwrap_or(arg).trim();
        pattern
            .strip_prefix("mut ")
            .unwrap_or(pattern)
            .trim()
            .to_string()
    }

    /// `self` receivers are not documented
    fn arg_info(&self, arg: &str) -> Vec<Argument> {
        if self.receiver_re.is_match(arg) {
            return Vec::new();
        }
        vec![Argument::new(self.arg_type(arg), self.arg_name(arg))]
    }

    /// Lifetimes are removed first so their quote does not open a region
    fn parse_args(&self, args: &str) -> Vec<Argument> {
        let args = self.lifetime_re.replace_all(args, "");
        split_top_level(&args)
            .iter()
            .flat_map(|arg| self.arg_info(arg))
            .collect()
    }

    fn function_return_type(
        &self,
        _name: &str,
        declared: Option<&str>,
        _notations: &NotationTable,
    ) -> ReturnType {
        match declared {
            None | Some("()") => ReturnType::Suppressed,
            Some(declared) => ReturnType::Known(declared.to_string()),
        }
    }
}
