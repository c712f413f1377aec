// src/core/mod.rs
mod definition;
mod engine;
mod inference;
mod parser;
mod snippet;
mod synthesizer;
mod tokenizer;
mod transforms;
mod wrapper;

// Language-specific declaration rules
pub mod languages;

pub use definition::{LineSource, SourceLines, MAX_DEFINITION_LINES};
pub use inference::{guess_type_from_name, Notation, NotationTable};
pub use languages::{Language, LanguageProfile, LanguageRules};
pub use parser::{
    is_existing_comment, ArgList, Argument, Declaration, DeclarationParser, FunctionDecl,
    FunctionFlags, ReturnType, VarDecl,
};
pub use snippet::{bracketed_to_tab_stops, escape, output_width, renumber_tab_stops};
pub use synthesizer::{align_tags, insert_spacers, Synthesizer};
pub use tokenizer::split_top_level;
pub use transforms::{decorate, join_lines, reparse};
pub use wrapper::{locate_block, CommentBlock, DescriptionWrapper};

// Export the main engine
pub use engine::{Engine, GenerateRequest, Outcome};
