use regex::Regex;

use crate::config::Settings;
use super::javascript::{JsValueGuesser, PrimitiveStyle};
use super::{pattern, LanguageProfile, LanguageRules, JS_IDENTIFIER};
use crate::core::parser::{FunctionDecl, VarDecl};

/// CoffeeScript: `name = (args) ->` and `###` block comments
pub struct CoffeeScriptRules {
    profile: LanguageProfile,
    values: JsValueGuesser,
    function_re: Regex,
    var_re: Regex,
}

impl CoffeeScriptRules {
    pub fn new(settings: &Settings) -> Self {
        let id = JS_IDENTIFIER;
        let profile = LanguageProfile {
            fn_opener: None,
            comment_closer: "###".to_string(),
            bool_type: "Boolean".to_string(),
            function_type: "Function".to_string(),
            curly_types: true,
            type_info: true,
            type_tag: settings
                .override_js_var
                .clone()
                .unwrap_or_else(|| "type".to_string()),
        };

        let style = PrimitiveStyle {
            lower_case: settings.lower_case_primitives,
            short: false,
        };

        Self {
            values: JsValueGuesser::new(style, &profile.function_type),
            function_re: pattern(&format!(
                r"(?:(?P<name>{id})\s*[:=]\s*)?(?:\((?P<args>[^()]*?)\))?\s*[=-]>"
            )),
            var_re: pattern(&format!(r"(?P<name>{id})\s*[=:]\s*(?P<val>.*?)(?:[;,]|$)")),
            profile,
        }
    }
}

impl LanguageRules for CoffeeScriptRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let name = caps.name("name").map_or("", |m| m.as_str());
        let args = caps.name("args").map_or("", |m| m.as_str());
        Some(FunctionDecl::new(name, args))
    }

    fn parse_var(&self, text: &str) -> Option<VarDecl> {
        let caps = self.var_re.captures(text)?;
        Some(VarDecl::new(&caps["name"], Some(caps["val"].trim().to_string())))
    }

    fn guess_type_from_value(&self, value: &str) -> Option<String> {
        self.values.guess(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::ArgList;

    fn rules() -> CoffeeScriptRules {
        CoffeeScriptRules::new(&Settings::default())
    }

    #[test]
    fn test_arrow_functions() {
        let coffee = rules();

        let function = coffee.parse_function("greet = (name, greeting) ->").unwrap();
        assert_eq!(function.name, "greet");
        assert_eq!(function.args, ArgList::Text("name, greeting".to_string()));

        let function = coffee.parse_function("  render: =>").unwrap();
        assert_eq!(function.name, "render");
        assert_eq!(function.args, ArgList::Text(String::new()));
    }

    #[test]
    fn test_variables() {
        let coffee = rules();

        let var = coffee.parse_var("count = 42").unwrap();
        assert_eq!(var.name, "count");
        assert_eq!(coffee.guess_type_from_value("42").as_deref(), Some("Number"));
        assert!(coffee.parse_function("count = 42").is_none());
    }

    #[test]
    fn test_closer_and_no_short_booleans() {
        let coffee = CoffeeScriptRules::new(&Settings {
            short_primitives: true,
            ..Settings::default()
        });

        assert_eq!(coffee.profile().comment_closer, "###");
        assert_eq!(coffee.guess_type_from_value("true").as_deref(), Some("Boolean"));
    }

    #[test]
    fn test_definition_counts_parens_from_line_start() {
        let coffee = rules();
        let source = vec!["fn = (a,", "  b) ->", "  a + b"];
        assert_eq!(coffee.collect_definition(&source, 0), "fn = (a,  b) ->");
    }
}
