use thiserror::Error;

/// Main error type for docblock operations
///
/// The comment engine itself never fails: an unrecognised declaration is a
/// normal outcome. These variants cover the edges around it (configuration,
/// files, and commands pointed at text that is not a comment).
#[derive(Error, Debug)]
pub enum DocblockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid notation rule {rule:?}: {source}")]
    InvalidNotation {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown language tag: {0}")]
    UnknownLanguage(String),

    #[error("Line {line} is out of range (buffer has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },

    #[error("No comment block opens at line {line}")]
    NoCommentBlock { line: usize },

    #[error("Line {line} is not a `//` comment")]
    NotLineComment { line: usize },
}

pub type Result<T> = std::result::Result<T, DocblockError>;
