use regex::Regex;

use crate::config::Settings;
use super::{is_numeric, pattern, return_type_from_name, LanguageProfile, LanguageRules};
use crate::core::inference::NotationTable;
use crate::core::parser::{FunctionDecl, ReturnType, VarDecl};

const NAME_TOKEN: &str = r"[a-zA-Z_\x7f-\xff][a-zA-Z0-9_\x7f-\xff]*";

pub struct PhpRules {
    profile: LanguageProfile,
    short_primitives: bool,
    function_re: Regex,
    default_re: Regex,
    hint_re: Regex,
    name_re: Regex,
    assignment_re: Regex,
    property_re: Regex,
    constructed_re: Regex,
}

impl PhpRules {
    pub fn new(settings: &Settings) -> Self {
        let var_identifier = format!(r"[$]{NAME_TOKEN}(?:->{NAME_TOKEN})*");
        let type_token = r"\??[\\a-zA-Z_\x7f-\xff][\\a-zA-Z0-9_\x7f-\xff|]*";

        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"function(?:\s+&?\s*{NAME_TOKEN})?\s*\("))),
            comment_closer: " */".to_string(),
            bool_type: if settings.short_primitives { "bool" } else { "boolean" }.to_string(),
            function_type: "function".to_string(),
            curly_types: false,
            type_info: true,
            type_tag: "var".to_string(),
        };

        Self {
            short_primitives: settings.short_primitives,
            function_re: pattern(&format!(
                r"function\s+&?\s*(?P<name>{NAME_TOKEN})\s*\(\s*(?P<args>.*)\)(?:\s*:\s*(?P<retval>{type_token}))?"
            )),
            default_re: pattern(&format!(r"(?P<name>{var_identifier})\s*=\s*(?P<val>.*)")),
            hint_re: pattern(r"^(?P<hint>[^\s$&]\S*)\s+&?[$]"),
            name_re: pattern(&format!(r"(?P<name>&?{var_identifier})(?:\s*=.*)?$")),
            assignment_re: pattern(&format!(
                r"(?P<name>{var_identifier})\s*=>?\s*(?P<val>.*?)(?:[;,]|$)"
            )),
            property_re: pattern(&format!(
                r"\b(?:var|public|private|protected|static|readonly)\s+(?:(?P<type>{type_token})\s+)?(?P<name>{var_identifier})"
            )),
            constructed_re: pattern(&format!(r"^new\s+(?P<class>[\\]?{NAME_TOKEN}(?:\\{NAME_TOKEN})*)")),
            profile,
        }
    }
}

impl LanguageRules for PhpRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let retval = caps.name("retval").map(|m| m.as_str().to_string());
        Some(FunctionDecl::new(&caps["name"], &caps["args"]).with_retval(retval))
    }

    fn parse_var(&self, text: &str) -> Option<VarDecl> {
        let property = self.property_re.captures(text);
        let declared_type = property
            .as_ref()
            .and_then(|caps| caps.name("type"))
            .map(|m| m.as_str().to_string());

        let mut var = if let Some(caps) = self.assignment_re.captures(text) {
            VarDecl::new(&caps["name"], Some(caps["val"].trim().to_string()))
        } else {
            let caps = property?;
            VarDecl::new(&caps["name"], None)
        };
        var.declared_type = declared_type;
        Some(var)
    }

    /// A type hint and a default value are reconciled: when both give a type
    /// and they differ, the result is the union `hint|value`.
    fn arg_type(&self, arg: &str) -> Option<String> {
        let hinted = self
            .hint_re
            .captures(arg)
            .map(|caps| caps["hint"].to_string());
        let implied = self
            .default_re
            .captures(arg)
            .and_then(|caps| self.guess_type_from_value(&caps["val"]));

        match (hinted, implied) {
            (Some(hint), Some(value)) if hint.eq_ignore_ascii_case(&value) => Some(hint),
            (Some(hint), Some(value)) => Some(format!("{}|{}", hint, value)),
            (Some(hint), None) => Some(hint),
            (None, Some(value)) if value == "null" => None,
            (None, value) => value,
        }
    }

    fn arg_name(&self, arg: &str) -> String {
        match self.name_re.captures(arg) {
            Some(caps) => caps["name"].to_string(),
            None => arg.trim().to_string(),
        }
    }

    fn guess_type_from_value(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let first = value.chars().next()?;

        if is_numeric(value) {
            let name = if value.contains('.') {
                "float"
            } else if self.short_primitives {
                "int"
            } else {
                "integer"
            };
            return Some(name.to_string());
        }
        if first == '"' || first == '\'' {
            return Some("string".to_string());
        }
        if value.starts_with("array") || first == '[' {
            return Some("array".to_string());
        }
        let lowered = value.to_ascii_lowercase();
        if lowered == "true" || lowered == "false" {
            return Some(self.profile.bool_type.clone());
        }
        if lowered == "null" {
            return Some("null".to_string());
        }
        self.constructed_re
            .captures(value)
            .map(|caps| caps["class"].to_string())
    }

    fn function_return_type(
        &self,
        name: &str,
        declared: Option<&str>,
        notations: &NotationTable,
    ) -> ReturnType {
        match name {
            "__construct" | "__destruct" | "__set" | "__unset" | "__wakeup" => {
                return ReturnType::Suppressed
            }
            "__sleep" => return ReturnType::Known("array".to_string()),
            "__toString" => return ReturnType::Known("string".to_string()),
            "__isset" => return ReturnType::Known(self.profile.bool_type.clone()),
            _ => {}
        }

        match declared {
            Some("void") => ReturnType::Suppressed,
            Some(declared) => ReturnType::Known(declared.to_string()),
            None => return_type_from_name(&self.profile, name, notations),
        }
    }
}
