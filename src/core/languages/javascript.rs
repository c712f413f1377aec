use regex::Regex;

use crate::config::Settings;
use super::{is_numeric, pattern, LanguageProfile, LanguageRules, JS_IDENTIFIER};
use crate::core::parser::{Argument, FunctionDecl, FunctionFlags, VarDecl};
use crate::core::tokenizer::split_top_level;

/// Words that look like method shorthand when followed by `(...) {`
const CONTROL_KEYWORDS: [&str; 9] = [
    "if", "for", "while", "switch", "catch", "with", "function", "return", "typeof",
];

/// How primitive type names are spelled
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PrimitiveStyle {
    pub lower_case: bool,
    pub short: bool,
}

impl PrimitiveStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lower_case: settings.lower_case_primitives,
            short: settings.short_primitives,
        }
    }

    fn name(&self, capitalised: &str) -> String {
        if self.lower_case {
            capitalised.to_lowercase()
        } else {
            capitalised.to_string()
        }
    }
}

/// Literal-value patterns shared by the JavaScript family
pub(crate) struct JsValueGuesser {
    style: PrimitiveStyle,
    function_type: String,
    regexp: Regex,
    constructed: Regex,
    function_literal: Regex,
}

impl JsValueGuesser {
    pub fn new(style: PrimitiveStyle, function_type: &str) -> Self {
        Self {
            style,
            function_type: function_type.to_string(),
            regexp: pattern(r"^(?:RegExp\b|/[^/])"),
            constructed: pattern(&format!(r"^new\s+({})", JS_IDENTIFIER)),
            function_literal: pattern(&format!(
                r"^(?:async\s+)?(?:function\b|\([^()]*\)\s*=>|{}\s*=>)",
                JS_IDENTIFIER
            )),
        }
    }

    pub fn guess(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let first = value.chars().next()?;

        if is_numeric(value) {
            return Some(self.style.name("Number"));
        }
        if matches!(first, '"' | '\'' | '`') {
            return Some(self.style.name("String"));
        }
        if first == '[' {
            return Some("Array".to_string());
        }
        if first == '{' {
            return Some("Object".to_string());
        }
        if value == "true" || value == "false" {
            let name = if self.style.short { "Bool" } else { "Boolean" };
            return Some(self.style.name(name));
        }
        if self.regexp.is_match(value) {
            return Some("RegExp".to_string());
        }
        if let Some(caps) = self.constructed.captures(value) {
            return Some(caps[1].to_string());
        }
        if self.function_literal.is_match(value) {
            return Some(self.function_type.clone());
        }
        None
    }
}

/// JavaScript: `function` declarations, arrow functions and method shorthand
pub struct JavaScriptRules {
    profile: LanguageProfile,
    values: JsValueGuesser,
    function_re: Regex,
    arrow_re: Regex,
    method_re: Regex,
    var_re: Regex,
    destructured_re: Regex,
    default_re: Regex,
}

impl JavaScriptRules {
    pub fn new(settings: &Settings) -> Self {
        let id = JS_IDENTIFIER;
        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"\bfunction(?:\s*\*)?\s*(?:{})?\s*\(", id))),
            comment_closer: " */".to_string(),
            bool_type: "Boolean".to_string(),
            function_type: "Function".to_string(),
            curly_types: true,
            type_info: true,
            type_tag: settings
                .override_js_var
                .clone()
                .unwrap_or_else(|| "type".to_string()),
        };

        Self {
            values: JsValueGuesser::new(PrimitiveStyle::from_settings(settings), &profile.function_type),
            function_re: pattern(&format!(
                r"(?:(?P<name1>{id})\s*[:=]\s*)?(?:async\s+)?\bfunction(?:\s*(?P<generator>\*))?\s*(?P<name2>{id})?\s*\(\s*(?P<args>.*)\)"
            )),
            arrow_re: pattern(&format!(
                r"^\s*(?:(?:export|default|const|let|var|static)\s+)*(?:(?:{id}\.)*(?P<name>{id})\s*[:=]\s*)?(?:async\s+)?(?:\((?P<args>[^()]*)\)|(?P<arg>{id}))\s*=>"
            )),
            method_re: pattern(&format!(
                r"^\s*(?:(?:static|async|get|set|public|private|protected)\s+)*(?P<generator>\*)?\s*(?P<name>{id})\s*\((?P<args>.*)\)\s*\{{"
            )),
            var_re: pattern(&format!(r"(?P<name>{id})\s*[=:]\s*(?P<val>.*?)(?:[;,]|$)")),
            destructured_re: pattern(r"^\{(?P<fields>.*)\}$"),
            default_re: pattern(r"^(?P<name>[^=]+?)\s*=\s*(?P<val>.*)$"),
            profile,
        }
    }
}

impl LanguageRules for JavaScriptRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        if let Some(caps) = self.function_re.captures(text) {
            let name = caps
                .name("name1")
                .or_else(|| caps.name("name2"))
                .map_or("", |m| m.as_str());
            let flags = FunctionFlags {
                generator: caps.name("generator").is_some(),
                ..Default::default()
            };
            return Some(FunctionDecl::new(name, &caps["args"]).with_flags(flags));
        }

        if let Some(caps) = self.arrow_re.captures(text) {
            let name = caps.name("name").map_or("", |m| m.as_str());
            let args = caps
                .name("args")
                .or_else(|| caps.name("arg"))
                .map_or("", |m| m.as_str());
            return Some(FunctionDecl::new(name, args));
        }

        let caps = self.method_re.captures(text)?;
        let name = &caps["name"];
        if CONTROL_KEYWORDS.contains(&name) {
            return None;
        }
        let flags = FunctionFlags {
            generator: caps.name("generator").is_some(),
            ..Default::default()
        };
        Some(FunctionDecl::new(name, &caps["args"]).with_flags(flags))
    }

    fn parse_var(&self, text: &str) -> Option<VarDecl> {
        let caps = self.var_re.captures(text)?;
        Some(VarDecl::new(&caps["name"], Some(caps["val"].trim().to_string())))
    }

    fn arg_type(&self, arg: &str) -> Option<String> {
        let caps = self.default_re.captures(arg)?;
        self.guess_type_from_value(&caps["val"])
    }

    fn arg_name(&self, arg: &str) -> String {
        match self.default_re.captures(arg) {
            Some(caps) => caps["name"].trim().to_string(),
            None => arg.trim().to_string(),
        }
    }

    fn arg_info(&self, arg: &str) -> Vec<Argument> {
        match self.destructured_re.captures(arg) {
            Some(caps) => split_top_level(&caps["fields"])
                .iter()
                .map(|field| {
                    Argument::new(self.arg_type(field), format!("options.{}", self.arg_name(field)))
                })
                .collect(),
            None => vec![Argument::new(self.arg_type(arg), self.arg_name(arg))],
        }
    }

    fn guess_type_from_value(&self, value: &str) -> Option<String> {
        self.values.guess(value)
    }
}
