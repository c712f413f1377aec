//! Language-specific declaration rules
//!
//! Each language gets its own module implementing [`LanguageRules`]. Most of
//! them override only the handful of operations where they differ from the
//! C-like defaults provided by the trait.

mod actionscript;
mod coffee;
mod cpp;
mod java;
mod javascript;
mod objc;
mod php;
mod rust;
mod typescript;

pub use actionscript::ActionScriptRules;
pub use coffee::CoffeeScriptRules;
pub use cpp::CppRules;
pub use java::JavaRules;
pub use javascript::JavaScriptRules;
pub use objc::ObjCRules;
pub use php::PhpRules;
pub use rust::RustRules;
pub use typescript::TypeScriptRules;

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::config::Settings;
use crate::error::DocblockError;
use super::definition::{collect_balanced, LineSource};
use super::inference::{guess_type_from_name, NotationTable};
use super::parser::{Argument, FunctionDecl, ReturnType, VarDecl};
use super::tokenizer::split_top_level;

/// Identifier shared by the JavaScript family
pub(crate) const JS_IDENTIFIER: &str = r"[a-zA-Z_$][a-zA-Z_$0-9]*";

static CONSTRUCTOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]").expect("Invalid constructor regex"));

static MUTATOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$_]?(?:set|add)(?:$|[A-Z_])").expect("Invalid mutator regex"));

static PREDICATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$_]?(?:is|has)(?:$|[A-Z_])").expect("Invalid predicate regex"));

/// Immutable per-invocation configuration of a language
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    /// Where a function declaration starts, for bracket counting
    pub fn_opener: Option<Regex>,

    /// Token closing the comment block
    pub comment_closer: String,

    /// Spelling of the boolean type
    pub bool_type: String,

    /// Spelling of the function type
    pub function_type: String,

    /// Wrap types in `{}`
    pub curly_types: bool,

    /// Emit type annotations at all
    pub type_info: bool,

    /// Tag used for variable types (`type`, `var`, ...)
    pub type_tag: String,
}

impl LanguageProfile {
    /// Map the aliases usable in notation rules onto this language's type names
    pub fn resolve_type_alias(&self, name: &str) -> String {
        match name {
            "bool" => self.bool_type.clone(),
            "function" => self.function_type.clone(),
            other => other.to_string(),
        }
    }
}

/// Compile a pattern built from this crate's own constant fragments
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("Invalid built-in language pattern")
}

/// Operations every supported language provides
pub trait LanguageRules {
    /// The language's fixed configuration
    fn profile(&self) -> &LanguageProfile;

    /// Recognise a function or method declaration
    fn parse_function(&self, text: &str) -> Option<FunctionDecl>;

    /// Recognise a variable assignment
    fn parse_var(&self, _text: &str) -> Option<VarDecl> {
        None
    }

    /// Type hint carried by a single argument slot
    fn arg_type(&self, _arg: &str) -> Option<String> {
        None
    }

    /// Name of a single argument slot
    fn arg_name(&self, arg: &str) -> String {
        arg.to_string()
    }

    /// Expand one argument slot into documented arguments
    fn arg_info(&self, arg: &str) -> Vec<Argument> {
        vec![Argument::new(self.arg_type(arg), self.arg_name(arg))]
    }

    /// Split and expand a whole argument list
    fn parse_args(&self, args: &str) -> Vec<Argument> {
        split_top_level(args)
            .iter()
            .flat_map(|arg| self.arg_info(arg))
            .collect()
    }

    /// Guess a type from the lexical form of a literal
    fn guess_type_from_value(&self, _value: &str) -> Option<String> {
        None
    }

    /// Decide what the `@return` line should say
    fn function_return_type(
        &self,
        name: &str,
        _declared: Option<&str>,
        notations: &NotationTable,
    ) -> ReturnType {
        return_type_from_name(self.profile(), name, notations)
    }

    /// Gather the declaration text starting at line `start`
    fn collect_definition(&self, source: &dyn LineSource, start: usize) -> String {
        collect_balanced(self.profile(), source, start)
    }
}

/// Name conventions used when a language has no declared return type
pub fn return_type_from_name(
    profile: &LanguageProfile,
    name: &str,
    notations: &NotationTable,
) -> ReturnType {
    if CONSTRUCTOR_NAME.is_match(name) || MUTATOR_NAME.is_match(name) {
        return ReturnType::Suppressed;
    }

    if PREDICATE_NAME.is_match(name) {
        return ReturnType::Known(profile.bool_type.clone());
    }

    match guess_type_from_name(name, profile, notations) {
        Some(guessed) => ReturnType::Known(guessed),
        None => ReturnType::Unknown,
    }
}

/// Whether a string parses as a number the way a loosely-typed language would
pub(crate) fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    let starts_like_number = value
        .trim_start_matches(['-', '+'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    starts_like_number && value.parse::<f64>().is_ok()
}

/// Languages with their own declaration rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    Php,
    CoffeeScript,
    ActionScript,
    Cpp,
    ObjectiveC,
    Java,
    Rust,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Php,
        Language::CoffeeScript,
        Language::ActionScript,
        Language::Cpp,
        Language::ObjectiveC,
        Language::Java,
        Language::Rust,
    ];

    /// Canonical tag of the language
    pub fn tag(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Php => "php",
            Language::CoffeeScript => "coffee",
            Language::ActionScript => "actionscript",
            Language::Cpp => "c++",
            Language::ObjectiveC => "objc",
            Language::Java => "java",
            Language::Rust => "rust",
        }
    }

    /// Guess the language from a file extension, defaulting to JavaScript
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "php" | "phtml" | "inc" => Language::Php,
            "coffee" | "litcoffee" => Language::CoffeeScript,
            "as" | "hx" => Language::ActionScript,
            "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" | "cu" => Language::Cpp,
            "m" | "mm" => Language::ObjectiveC,
            "java" | "groovy" | "gvy" => Language::Java,
            "rs" => Language::Rust,
            _ => Language::JavaScript,
        }
    }

    /// Build the rules for this language under the given settings
    pub fn rules(&self, settings: &Settings) -> Box<dyn LanguageRules> {
        match self {
            Language::JavaScript => Box::new(JavaScriptRules::new(settings)),
            Language::TypeScript => Box::new(TypeScriptRules::new(settings)),
            Language::Php => Box::new(PhpRules::new(settings)),
            Language::CoffeeScript => Box::new(CoffeeScriptRules::new(settings)),
            Language::ActionScript => Box::new(ActionScriptRules::new()),
            Language::Cpp => Box::new(CppRules::new()),
            Language::ObjectiveC => Box::new(ObjCRules::new()),
            Language::Java => Box::new(JavaRules::new()),
            Language::Rust => Box::new(RustRules::new()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = DocblockError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "js" | "javascript" | "jsx" => Ok(Language::JavaScript),
            "ts" | "typescript" | "tsx" => Ok(Language::TypeScript),
            "php" => Ok(Language::Php),
            "coffee" | "coffeescript" => Ok(Language::CoffeeScript),
            "actionscript" | "haxe" => Ok(Language::ActionScript),
            "c" | "c++" | "cpp" | "cuda-c++" => Ok(Language::Cpp),
            "objc" | "objc++" | "objective-c" => Ok(Language::ObjectiveC),
            "java" | "groovy" => Ok(Language::Java),
            "rust" | "rs" => Ok(Language::Rust),
            other => Err(DocblockError::UnknownLanguage(other.to_string())),
        }
    }
}
