use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::languages::LanguageRules;

static EXISTING_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*").expect("Invalid existing comment regex"));

static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*.*?\*/").expect("Invalid inline comment regex"));

/// One documented argument: an optional type hint and a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub type_hint: Option<String>,
    pub name: String,
}

impl Argument {
    pub fn new(type_hint: Option<String>, name: impl Into<String>) -> Self {
        Self {
            type_hint,
            name: name.into(),
        }
    }
}

/// Arguments of a function as the language parser produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgList {
    /// Raw argument-list text, split later by the language
    Text(String),

    /// Already split by a parser whose syntax is not comma separated
    Resolved(Vec<Argument>),
}

/// Options a language attaches to a recognised function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFlags {
    /// Property setter; documented as `@private` only
    pub setter: bool,

    /// Generator; documents `@yield` instead of `@return`
    pub generator: bool,
}

/// A recognised function or method declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name, empty for anonymous functions
    pub name: String,

    pub args: ArgList,

    /// Return type written in the source, if the language has one
    pub retval: Option<String>,

    pub flags: FunctionFlags,

    /// Exceptions declared by a `throws` clause
    pub throws: Vec<String>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: ArgList::Text(args.into()),
            retval: None,
            flags: FunctionFlags::default(),
            throws: Vec::new(),
        }
    }

    pub fn with_retval(mut self, retval: Option<String>) -> Self {
        self.retval = retval;
        self
    }

    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A recognised variable assignment or property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,

    /// Initializer text, if any
    pub value: Option<String>,

    /// Type written in the source, if the language has one
    pub declared_type: Option<String>,
}

impl VarDecl {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            declared_type: None,
        }
    }
}

/// Parsed shape of the code under the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declaration {
    Function(FunctionDecl),
    Variable(VarDecl),
}

/// What the `@return` line should say
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    /// No `@return` line at all
    Suppressed,

    /// A return value of unknown type
    Unknown,

    /// A return value of this type
    Known(String),
}

/// Whether the collected text continues an existing comment block
pub fn is_existing_comment(text: &str) -> bool {
    EXISTING_COMMENT.is_match(text)
}

/// Turns declaration text into a [`Declaration`] using one language's rules
pub struct DeclarationParser<'a> {
    rules: &'a dyn LanguageRules,
}

impl<'a> DeclarationParser<'a> {
    pub fn new(rules: &'a dyn LanguageRules) -> Self {
        Self { rules }
    }

    /// Try the function parser, then the variable parser
    pub fn extract(&self, text: &str) -> Option<Declaration> {
        if let Some(function) = self.rules.parse_function(text) {
            debug!("Recognised function `{}`", function.name);
            return Some(Declaration::Function(function));
        }

        if let Some(variable) = self.rules.parse_var(text) {
            debug!("Recognised variable `{}`", variable.name);
            return Some(Declaration::Variable(variable));
        }

        debug!("No declaration recognised in {:?}", text);
        None
    }

    /// Documented arguments of a function, inline comments removed
    pub fn arguments(&self, function: &FunctionDecl) -> Vec<Argument> {
        match &function.args {
            ArgList::Resolved(args) => args.clone(),
            ArgList::Text(text) => {
                let cleaned = INLINE_COMMENT.replace_all(text, "");
                self.rules.parse_args(&cleaned)
            }
        }
    }
}
