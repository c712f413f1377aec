// src/core/engine.rs
use chrono::{DateTime, FixedOffset, Local};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{DocblockError, Result};
use super::definition::LineSource;
use super::inference::NotationTable;
use super::languages::Language;
use super::parser::{is_existing_comment, Declaration, DeclarationParser};
use super::snippet::escape;
use super::synthesizer::Synthesizer;
use super::transforms;
use super::wrapper::{locate_block, DescriptionWrapper};

static TRAILING_CLOSER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*/\s*$").expect("Invalid trailing closer regex"));

/// What the user asked for when typing the block opener
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub language: Language,

    /// Text typed after `/**` on the same line
    pub trailing: String,

    /// Single-line `/** ... */` comment
    pub inline: bool,
}

impl GenerateRequest {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = trailing.into();
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

/// Text to insert at the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Outcome {
    /// The cursor is already inside a block: continue it with a new `*` line
    ContinueComment(String),

    /// A complete doc block body and closer
    Snippet(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::ContinueComment(text) | Outcome::Snippet(text) => text,
        }
    }
}

/// Entry point for every comment command
pub struct Engine {
    settings: Settings,
    notations: NotationTable,
}

impl Engine {
    /// Create an engine; fails only when a notation rule does not compile
    pub fn new(settings: Settings) -> Result<Self> {
        let notations = NotationTable::compile(&settings.notation_map)?;
        debug!("Loaded settings: {:?}", settings);

        Ok(Self {
            settings,
            notations,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the doc block for the declaration starting at `line` (0-based)
    pub fn generate(&self, request: &GenerateRequest, source: &dyn LineSource, line: usize) -> Outcome {
        let now = Local::now().fixed_offset();
        self.generate_at(request, source, line, &now)
    }

    /// [`Engine::generate`] with a fixed clock for `{{date}}` variables
    pub fn generate_at(
        &self,
        request: &GenerateRequest,
        source: &dyn LineSource,
        line: usize,
        now: &DateTime<FixedOffset>,
    ) -> Outcome {
        let rules = request.language.rules(&self.settings);

        let definition = rules.collect_definition(source, line);
        debug!("Collected {} definition: {:?}", request.language, definition);

        if is_existing_comment(&definition) {
            info!("Continuing an existing comment block");
            return Outcome::ContinueComment(format!("\n *{}", self.settings.indent()));
        }

        let declaration = if self.settings.simple_mode {
            debug!("Simple mode, skipping declaration parsing");
            None
        } else {
            DeclarationParser::new(rules.as_ref()).extract(&definition)
        };

        let trailing = escape(TRAILING_CLOSER.replace(&request.trailing, "").trim());
        let description = Some(trailing.as_str()).filter(|text| !text.is_empty());

        let synthesizer = Synthesizer::new(&self.settings, rules.as_ref(), &self.notations);
        let body = declaration
            .as_ref()
            .map(|declaration| synthesizer.body(declaration, description, request.inline))
            .unwrap_or_default();

        info!(
            "Generated {} comment for {}",
            if request.inline { "inline" } else { "block" },
            match &declaration {
                Some(Declaration::Function(function)) => format!("function `{}`", function.name),
                Some(Declaration::Variable(variable)) => format!("variable `{}`", variable.name),
                None => "unrecognised code".to_string(),
            }
        );

        Outcome::Snippet(synthesizer.render(body, request.inline, &trailing, now))
    }

    /// Rewrap the descriptions of the block opening on `line` (0-based)
    pub fn wrap(&self, lines: &[&str], line: usize) -> Result<String> {
        let block = locate_block(lines, line)?;
        info!("Rewrapping comment block on lines {}-{}", block.start + 1, block.end + 1);
        Ok(DescriptionWrapper::new(&self.settings).rewrap(&block))
    }

    /// Turn the `[bracketed]` fields of the block opening on `line` back into tab-stops
    pub fn reparse(&self, lines: &[&str], line: usize) -> Result<String> {
        let block = locate_block(lines, line)?;
        info!("Reparsing comment block on lines {}-{}", block.start + 1, block.end + 1);
        Ok(transforms::reparse(&lines[block.start..=block.end].join("\n")))
    }

    /// Box the `//` comments on lines `start..=end` (0-based)
    pub fn decorate(&self, lines: &[&str], start: usize, end: usize) -> Result<String> {
        let range = line_range(lines, start, end)?;
        info!("Decorating {} comment lines", range.len());
        transforms::decorate(range, start)
    }

    /// Join lines `start..=end` (0-based); a single line joins with the next one
    pub fn join(&self, lines: &[&str], start: usize, end: usize) -> Result<String> {
        let end = if start == end && end + 1 < lines.len() {
            end + 1
        } else {
            end
        };
        let range = line_range(lines, start, end)?;
        info!("Joining {} lines", range.len());
        Ok(transforms::join_lines(&range.join("\n")))
    }
}

/// Lines `start..=end`, checked against the buffer
fn line_range<'a, 'b>(lines: &'a [&'b str], start: usize, end: usize) -> Result<&'a [&'b str]> {
    let total = lines.len();
    if end >= total {
        return Err(DocblockError::LineOutOfRange { line: end + 1, total });
    }
    if start > end {
        return Err(DocblockError::LineOutOfRange { line: start + 1, total });
    }
    Ok(&lines[start..=end])
}
