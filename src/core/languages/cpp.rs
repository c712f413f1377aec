use regex::Regex;

use super::{pattern, LanguageProfile, LanguageRules};
use crate::core::inference::NotationTable;
use crate::core::parser::{Argument, FunctionDecl, ReturnType};
use crate::core::tokenizer::split_top_level;

const NAME_TOKEN: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";

/// `name` or `Scope::name`
fn identifier() -> String {
    format!(r"{NAME_TOKEN}(?:::{NAME_TOKEN})?")
}

/// An identifier optionally followed by `[]`/`[N]` or a short parenthesised qualifier
fn var_identifier() -> String {
    let id = identifier();
    format!(r"{id}\s*(?:\[(?:{id})?\]|\((?:(?:\s*,\s*)?[a-z]+)+\s*\))?")
}

/// C and C++: declared return types, `void` argument lists
pub struct CppRules {
    profile: LanguageProfile,
    function_re: Regex,
    name_re: Regex,
}

impl CppRules {
    pub fn new() -> Self {
        let id = identifier();
        let var_id = var_identifier();

        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"{id}\s+{id}\s*\("))),
            comment_closer: " */".to_string(),
            bool_type: "bool".to_string(),
            function_type: "function".to_string(),
            curly_types: false,
            type_info: false,
            type_tag: "param".to_string(),
        };

        Self {
            function_re: pattern(&format!(
                r"(?P<retval>{var_id})[&*\s]+(?P<name>{var_id});?\s*\(\s*(?P<args>.*)\)"
            )),
            name_re: pattern(&format!(
                r"(?P<name>{id})\s*(?:\[(?:{id})?\]|\((?:(?:\s*,\s*)?[a-z]+)+\s*\))?(?:\s*=.*)?$"
            )),
            profile,
        }
    }
}

impl Default for CppRules {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRules for CppRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let retval = caps["retval"].trim().to_string();
        Some(FunctionDecl::new(caps["name"].trim(), &caps["args"]).with_retval(Some(retval)))
    }

    fn arg_name(&self, arg: &str) -> String {
        match self.name_re.captures(arg) {
            Some(caps) => caps["name"].to_string(),
            None => arg.trim().to_string(),
        }
    }

    fn parse_args(&self, args: &str) -> Vec<Argument> {
        if args.trim() == "void" {
            return Vec::new();
        }
        split_top_level(args)
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
            Some("void") => ReturnType::Suppressed,
            Some(declared) => ReturnType::Known(declared.to_string()),
            None => ReturnType::Unknown,
        }
    }
}
