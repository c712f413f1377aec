use regex::Regex;

use super::{pattern, LanguageProfile, LanguageRules};
use crate::core::parser::{FunctionDecl, FunctionFlags};

const NAME_TOKEN: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";

/// ActionScript and Haxe: untyped documentation, `get`/`set` accessors
pub struct ActionScriptRules {
    profile: LanguageProfile,
    function_re: Regex,
    name_re: Regex,
}

impl ActionScriptRules {
    pub fn new() -> Self {
        let profile = LanguageProfile {
            fn_opener: Some(pattern(&format!(
                r"function(?:\s+[gs]et)?(?:\s+{NAME_TOKEN})?\s*\("
            ))),
            comment_closer: " */".to_string(),
            bool_type: "bool".to_string(),
            function_type: "function".to_string(),
            curly_types: false,
            type_info: false,
            type_tag: String::new(),
        };

        Self {
            function_re: pattern(&format!(
                r"(?:(?P<name1>{NAME_TOKEN})(?::{NAME_TOKEN})?\s*[:=]\s*)?function(?:\s+(?P<getset>[gs]et))?(?:\s+(?P<name2>{NAME_TOKEN}))?\s*\(\s*(?P<args>.*)\)"
            )),
            name_re: pattern(&format!(r"(?P<name>{NAME_TOKEN})(?::[\w.<>*]+)?(?:\s*=.*)?")),
            profile,
        }
    }
}

impl Default for ActionScriptRules {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRules for ActionScriptRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let name = caps
            .name("name1")
            .or_else(|| caps.name("name2"))
            .map_or("", |m| m.as_str());
        let flags = FunctionFlags {
            setter: caps.name("getset").is_some_and(|m| m.as_str() == "set"),
            ..Default::default()
        };
        Some(FunctionDecl::new(name, &caps["args"]).with_flags(flags))
    }

    /// Drop the `:Type` annotation and any default value
    fn arg_name(&self, arg: &str) -> String {
        self.name_re.replace(arg.trim(), "$name").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::ArgList;

    #[test]
    fn test_functions_and_accessors() {
        let rules = ActionScriptRules::new();

        let function = rules
            .parse_function("public function play(track:Track, loop:Boolean = false):void {")
            .unwrap();
        assert_eq!(function.name, "play");
        assert!(!function.flags.setter);
        assert_eq!(
            function.args,
            ArgList::Text("track:Track, loop:Boolean = false".to_string())
        );

        let setter = rules.parse_function("public function set volume(value:Number):void").unwrap();
        assert_eq!(setter.name, "volume");
        assert!(setter.flags.setter);

        let getter = rules.parse_function("public function get volume():Number").unwrap();
        assert!(!getter.flags.setter);

        let function = rules.parse_function("getThing():Thing").map(|f| f.name);
        assert_eq!(function, None);
        assert_eq!(rules.parse_function("function getThing()").unwrap().name, "getThing");
    }

    #[test]
    fn test_assigned_functions() {
        let rules = ActionScriptRules::new();
        let function = rules.parse_function("var onTick:Function = function(e:Event) {").unwrap();
        assert_eq!(function.name, "onTick");
    }

    #[test]
    fn test_argument_names_drop_types() {
        let rules = ActionScriptRules::new();
        assert_eq!(rules.arg_name("loop:Boolean = false"), "loop");
        assert_eq!(rules.arg_name("items:Vector.<int>"), "items");
        assert_eq!(rules.arg_name("plain"), "plain");
        assert_eq!(rules.parse_var("var x:int = 1;"), None);
    }
}
