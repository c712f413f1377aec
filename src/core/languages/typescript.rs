use regex::Regex;

use crate::config::Settings;
use super::javascript::{JsValueGuesser, PrimitiveStyle};
use super::{pattern, return_type_from_name, LanguageProfile, LanguageRules, JS_IDENTIFIER};
use crate::core::inference::NotationTable;
use crate::core::parser::{Argument, FunctionDecl, FunctionFlags, ReturnType, VarDecl};
use crate::core::tokenizer::split_top_level;

const CONTROL_KEYWORDS: [&str; 9] = [
    "if", "for", "while", "switch", "catch", "with", "function", "return", "typeof",
];

/// TypeScript: the JavaScript forms plus type annotations and access modifiers
pub struct TypeScriptRules {
    profile: LanguageProfile,
    values: JsValueGuesser,
    function_re: Regex,
    arrow_re: Regex,
    method_re: Regex,
    typed_var_re: Regex,
    var_re: Regex,
    modifiers_re: Regex,
    destructured_re: Regex,
}

impl TypeScriptRules {
    pub fn new(settings: &Settings) -> Self {
        let id = JS_IDENTIFIER;
        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(r"\bfunction(?:\s*\*)?\s*(?:{})?\s*(?:<[^>]*>)?\s*\(", id))),
            comment_closer: " */".to_string(),
            bool_type: "boolean".to_string(),
            function_type: "Function".to_string(),
            curly_types: true,
            type_info: true,
            type_tag: settings
                .override_js_var
                .clone()
                .unwrap_or_else(|| "type".to_string()),
        };

        let style = PrimitiveStyle {
            lower_case: true,
            short: settings.short_primitives,
        };

        Self {
            values: JsValueGuesser::new(style, &profile.function_type),
            function_re: pattern(&format!(
                r"(?:(?P<name1>{id})\s*[:=]\s*)?(?:async\s+)?\bfunction(?:\s*(?P<generator>\*))?\s*(?P<name2>{id})?\s*(?:<[^>]*>)?\s*\((?P<args>.*)\)(?:\s*:\s*(?P<retval>[^{{;]+?))?\s*(?:[{{;].*)?$"
            )),
            arrow_re: pattern(&format!(
                r"^\s*(?:(?:export|default|declare|const|let|var|public|private|protected|static|readonly)\s+)*(?:(?:{id}\.)*(?P<name>{id})\s*(?::\s*[^=]+?)?\s*[:=]\s*)?(?:async\s+)?(?:<[^>]*>\s*)?(?:\((?P<args>.*)\)(?:\s*:\s*(?P<retval>[^=]+?))?|(?P<arg>{id}))\s*=>"
            )),
            method_re: pattern(&format!(
                r"^\s*(?:(?:export|default|declare|public|private|protected|static|abstract|readonly|async|override)\s+)*(?P<generator>\*)?\s*(?P<name>{id})\??\s*(?:<[^>]*>)?\s*\((?P<args>.*)\)(?:\s*:\s*(?P<retval>[^{{;]+?))?\s*(?:[{{;].*)?$"
            )),
            typed_var_re: pattern(&format!(
                r"^\s*(?:(?:export|declare|const|let|var|public|private|protected|static|readonly)\s+)*(?P<name>{id})[?!]?\s*:\s*(?P<type>[^=;]+?)\s*(?:=\s*(?P<val>[^;]*?))?\s*[;,]?\s*$"
            )),
            var_re: pattern(&format!(r"(?P<name>{id})\s*[=:]\s*(?P<val>.*?)(?:[;,]|$)")),
            modifiers_re: pattern(r"^(?:(?:public|private|protected|readonly|override)\s+)+"),
            destructured_re: pattern(r"^\{(?P<fields>.*)\}\s*(?::.*)?$"),
            profile,
        }
    }

    /// Split `name: Type = value` into its parts; `=>` inside a type is not a default
    fn split_slot<'a>(&self, arg: &'a str) -> (&'a str, Option<&'a str>, Option<&'a str>) {
        let default_at = arg
            .char_indices()
            .find(|&(i, ch)| ch == '=' && !arg[i + 1..].starts_with('>'))
            .map(|(i, _)| i);

        let (declaration, default) = match default_at {
            Some(i) => (&arg[..i], Some(arg[i + 1..].trim())),
            None => (arg, None),
        };

        match declaration.find(':') {
            Some(i) => (
                declaration[..i].trim(),
                Some(declaration[i + 1..].trim()).filter(|t| !t.is_empty()),
                default,
            ),
            None => (declaration.trim(), None, default),
        }
    }
}

impl LanguageRules for TypeScriptRules {
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
            let retval = caps.name("retval").map(|m| m.as_str().trim().to_string());
            return Some(
                FunctionDecl::new(name, &caps["args"])
                    .with_retval(retval)
                    .with_flags(flags),
            );
        }

        if let Some(caps) = self.arrow_re.captures(text) {
            let name = caps.name("name").map_or("", |m| m.as_str());
            let args = caps
                .name("args")
                .or_else(|| caps.name("arg"))
                .map_or("", |m| m.as_str());
            let retval = caps.name("retval").map(|m| m.as_str().trim().to_string());
            return Some(FunctionDecl::new(name, args).with_retval(retval));
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
        let retval = caps.name("retval").map(|m| m.as_str().trim().to_string());
        Some(
            FunctionDecl::new(name, &caps["args"])
                .with_retval(retval)
                .with_flags(flags),
        )
    }

    fn parse_var(&self, text: &str) -> Option<VarDecl> {
        if let Some(caps) = self.typed_var_re.captures(text) {
            let value = caps.name("val").map(|m| m.as_str().trim().to_string());
            let mut var = VarDecl::new(&caps["name"], value);
            var.declared_type = Some(caps["type"].trim().to_string());
            return Some(var);
        }

        let caps = self.var_re.captures(text)?;
        Some(VarDecl::new(&caps["name"], Some(caps["val"].trim().to_string())))
    }

    fn arg_type(&self, arg: &str) -> Option<String> {
        let (_, declared, default) = self.split_slot(arg);
        match declared {
            Some(declared) => Some(declared.to_string()),
            None => default.and_then(|value| self.guess_type_from_value(value)),
        }
    }

    fn arg_name(&self, arg: &str) -> String {
        let (name, _, _) = self.split_slot(arg);
        let name = self.modifiers_re.replace(name, "");
        name.trim_end_matches('?').to_string()
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

    fn function_return_type(
        &self,
        name: &str,
        declared: Option<&str>,
        notations: &NotationTable,
    ) -> ReturnType {
        if name == "constructor" {
            return ReturnType::Suppressed;
        }
        match declared {
            Some("void") | Some("never") => ReturnType::Suppressed,
            Some(declared) => ReturnType::Known(declared.to_string()),
            None => return_type_from_name(&self.profile, name, notations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::ArgList;

    fn rules() -> TypeScriptRules {
        TypeScriptRules::new(&Settings::default())
    }

    #[test]
    fn test_function_with_return_annotation() {
        let ts = rules();

        let function = ts
            .parse_function("export function greet(name: string, times = 2): string {")
            .unwrap();
        assert_eq!(function.name, "greet");
        assert_eq!(function.retval.as_deref(), Some("string"));
        assert_eq!(
            ts.parse_args("name: string, times = 2"),
            vec![
                Argument::new(Some("string".to_string()), "name"),
                Argument::new(Some("number".to_string()), "times"),
            ]
        );
    }

    #[test]
    fn test_methods_with_modifiers() {
        let ts = rules();

        let method = ts
            .parse_function("  private async load<T>(id: number): Promise<T> {")
            .unwrap();
        assert_eq!(method.name, "load");
        assert_eq!(method.retval.as_deref(), Some("Promise<T>"));

        let method = ts.parse_function("  constructor(private readonly db: Db) {").unwrap();
        assert_eq!(method.name, "constructor");
        assert_eq!(ts.arg_name("private readonly db: Db"), "db");

        assert!(ts.parse_function("if (x) {").is_none());
    }

    #[test]
    fn test_arrow_with_types() {
        let ts = rules();

        let function = ts
            .parse_function("const handle = (event: Event, cb: (x: number) => void): void => {")
            .unwrap();
        assert_eq!(function.name, "handle");
        assert_eq!(function.retval.as_deref(), Some("void"));
        assert_eq!(
            function.args,
            ArgList::Text("event: Event, cb: (x: number) => void".to_string())
        );
    }

    #[test]
    fn test_arrow_callbacks_inside_values_are_variables() {
        let ts = rules();

        let text = "const total = items.reduce((a, b) => a + b, 0);";
        assert!(ts.parse_function(text).is_none());
        assert_eq!(ts.parse_var(text).unwrap().name, "total");

        let function = ts.parse_function("private onClick = (event: MouseEvent): void => {").unwrap();
        assert_eq!(function.name, "onClick");
        assert_eq!(function.args, ArgList::Text("event: MouseEvent".to_string()));
    }

    #[test]
    fn test_optional_and_callback_arguments() {
        let ts = rules();

        assert_eq!(ts.arg_name("label?: string"), "label");
        assert_eq!(ts.arg_type("label?: string").as_deref(), Some("string"));
        assert_eq!(ts.arg_type("cb: (x: number) => void").as_deref(), Some("(x: number) => void"));
        assert_eq!(ts.arg_name("cb: (x: number) => void"), "cb");
        assert_eq!(ts.arg_type("flag = true").as_deref(), Some("boolean"));
        assert_eq!(ts.arg_type("plain"), None);
    }

    #[test]
    fn test_typed_variables() {
        let ts = rules();

        let var = ts.parse_var("let count: number = 0;").unwrap();
        assert_eq!(var.name, "count");
        assert_eq!(var.declared_type.as_deref(), Some("number"));
        assert_eq!(var.value.as_deref(), Some("0"));

        let var = ts.parse_var("  private cache: Map<string, number>;").unwrap();
        assert_eq!(var.name, "cache");
        assert_eq!(var.declared_type.as_deref(), Some("Map<string, number>"));
        assert_eq!(var.value, None);

        let var = ts.parse_var("var foo = 'x';").unwrap();
        assert_eq!(var.declared_type, None);
    }

    #[test]
    fn test_return_types() {
        let ts = rules();
        let empty = NotationTable::default();

        assert_eq!(ts.function_return_type("run", Some("void"), &empty), ReturnType::Suppressed);
        assert_eq!(
            ts.function_return_type("run", Some("number"), &empty),
            ReturnType::Known("number".to_string())
        );
        assert_eq!(ts.function_return_type("constructor", None, &empty), ReturnType::Suppressed);
        assert_eq!(
            ts.function_return_type("isDone", None, &empty),
            ReturnType::Known("boolean".to_string())
        );
    }
}
