use regex::Regex;

use super::{pattern, LanguageProfile, LanguageRules};
use crate::core::definition::{collect_until_terminator, LineSource};
use crate::core::inference::NotationTable;
use crate::core::parser::{ArgList, Argument, FunctionDecl, ReturnType};

/// Objective-C: `- (Type)name:(Type)arg label:(Type)arg` selectors
pub struct ObjCRules {
    profile: LanguageProfile,
    function_re: Regex,
    selector_split_re: Regex,
    label_re: Regex,
}

impl ObjCRules {
    pub fn new() -> Self {
        let profile = LanguageProfile {
            fn_opener: Some(pattern(r"^\s*[-+]")),
            comment_closer: " */".to_string(),
            bool_type: "Boolean".to_string(),
            function_type: "Function".to_string(),
            curly_types: true,
            type_info: true,
            type_tag: "type".to_string(),
        };

        Self {
            function_re: pattern(
                r"[-+]\s+\(\s*(?P<retval>[a-zA-Z_$][a-zA-Z0-9_$]*\s*\**)\s*\)\s*(?P<name>[a-zA-Z_$][a-zA-Z0-9_$]*)\s*(?::(?P<args>.*))?",
            ),
            selector_split_re: pattern(r"\s*:\s*"),
            label_re: pattern(r"\s+(\S*)$"),
            profile,
        }
    }

    /// `(Type)name` into an argument
    fn selector_argument(part: &str) -> Argument {
        let part = part.trim();
        match (part.strip_prefix('('), part.rfind(')')) {
            (Some(_), Some(close)) => {
                let type_hint = part[1..close].trim();
                Argument::new(
                    Some(type_hint.to_string()).filter(|t| !t.is_empty()),
                    part[close + 1..].trim(),
                )
            }
            _ => Argument::new(None, part),
        }
    }
}

impl Default for ObjCRules {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRules for ObjCRules {
    fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Each selector label after the first is appended to the method name,
    /// so `- (void)move:(int)x to:(int)y` is documented as `move:to:`.
    fn parse_function(&self, text: &str) -> Option<FunctionDecl> {
        let caps = self.function_re.captures(text)?;
        let mut name = caps["name"].to_string();
        let retval = caps["retval"].trim().to_string();
        let mut args = Vec::new();

        if let Some(arg_text) = caps.name("args").map(|m| m.as_str()) {
            let groups: Vec<&str> = self.selector_split_re.split(arg_text).collect();
            let last = groups.len().saturating_sub(1);

            for (index, group) in groups.iter().enumerate() {
                let mut group = *group;
                if index < last {
                    if let Some(label) = self.label_re.captures(group) {
                        name.push(':');
                        name.push_str(&label[1]);
                        let start = label.get(0).map_or(group.len(), |m| m.start());
                        group = &group[..start];
                    }
                }
                args.push(Self::selector_argument(group));
            }
            name.push(':');
        }

        let mut function = FunctionDecl::new(name, "").with_retval(Some(retval));
        function.args = ArgList::Resolved(args);
        Some(function)
    }

    fn function_return_type(
        &self,
        _name: &str,
        declared: Option<&str>,
        _notations: &NotationTable,
    ) -> ReturnType {
        match declared {
            Some("void") | Some("IBAction") => ReturnType::Suppressed,
            Some(declared) => ReturnType::Known(declared.to_string()),
            None => ReturnType::Unknown,
        }
    }

    fn collect_definition(&self, source: &dyn LineSource, start: usize) -> String {
        collect_until_terminator(&self.profile, source, start)
    }
}
