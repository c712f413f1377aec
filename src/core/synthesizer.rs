//! Comment synthesis
//!
//! A recognised declaration becomes a list of body lines (description,
//! `@param`, `@return`, extra tags). [`Synthesizer::render`] then resolves
//! template variables, aligns tag columns, renumbers tab-stops, inserts
//! section spacers and wraps everything in the language's delimiters.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::config::{AlignMode, Settings, SpacerMode};
use super::inference::{guess_type_from_name, NotationTable};
use super::languages::LanguageRules;
use super::parser::{Declaration, DeclarationParser, FunctionDecl, ReturnType, VarDecl};
use super::snippet::{
    curly, escape, output_width, placeholder, renumber_tab_stops, split_columns,
    substitute_variables, tag_name,
};

const DESCRIPTION: &str = "[description]";
const UNKNOWN_TYPE: &str = "[type]";

/// Builds and renders doc blocks for one language under one configuration
pub struct Synthesizer<'a> {
    settings: &'a Settings,
    rules: &'a dyn LanguageRules,
    notations: &'a NotationTable,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        settings: &'a Settings,
        rules: &'a dyn LanguageRules,
        notations: &'a NotationTable,
    ) -> Self {
        Self {
            settings,
            rules,
            notations,
        }
    }

    /// Body lines for a declaration.
    ///
    /// `description` replaces the generated function description; it must
    /// already be escaped. `inline` selects the one-line variable form.
    pub fn body(&self, declaration: &Declaration, description: Option<&str>, inline: bool) -> Vec<String> {
        match declaration {
            Declaration::Function(function) => self.format_function(function, description),
            Declaration::Variable(variable) => self.format_var(variable, inline),
        }
    }

    fn format_function(&self, function: &FunctionDecl, description: Option<&str>) -> Vec<String> {
        if function.flags.setter {
            return vec!["@private".to_string()];
        }

        let settings = self.settings;
        let name = escape(&function.name);
        let mut out = Vec::new();

        if settings.function_description {
            let text = match description.filter(|d| !d.is_empty()) {
                Some(description) => description.to_string(),
                None if name.is_empty() => DESCRIPTION.to_string(),
                None => format!("[{} description]", name),
            };
            out.push(placeholder(&text));
        }

        if settings.autoadd_method_tag {
            out.push(format!("@method {}", name));
        }

        if !settings.extra_tags_go_after {
            out.extend(settings.extra_tags.iter().cloned());
        }

        let args = DeclarationParser::new(self.rules).arguments(function);
        for arg in &args {
            let mut line = format!(
                "@param {}{}",
                self.type_info(arg.type_hint.as_deref(), &arg.name),
                escape(&arg.name)
            );
            if settings.param_description {
                line.push(' ');
                line.push_str(&placeholder(DESCRIPTION));
            }
            out.push(line);
        }

        let has_args = !args.is_empty();
        if function.flags.generator {
            out.push(self.return_line("@yield", UNKNOWN_TYPE, has_args));
        } else {
            let return_type = self.rules.function_return_type(
                &function.name,
                function.retval.as_deref(),
                self.notations,
            );
            debug!("Return type for `{}`: {:?}", function.name, return_type);
            match return_type {
                ReturnType::Suppressed => {}
                ReturnType::Unknown => {
                    out.push(self.return_line(&settings.return_tag, UNKNOWN_TYPE, has_args))
                }
                ReturnType::Known(type_name) => {
                    out.push(self.return_line(&settings.return_tag, &escape(&type_name), has_args))
                }
            }
        }

        out.extend(self.notations.tags_for(&function.name));

        if settings.extra_tags_go_after {
            out.extend(settings.extra_tags.iter().cloned());
        }

        for exception in &function.throws {
            out.push(format!("@throws {} {}", escape(exception), placeholder(DESCRIPTION)));
        }

        out
    }

    fn format_var(&self, variable: &VarDecl, inline: bool) -> Vec<String> {
        let profile = self.rules.profile();

        let type_name = variable
            .declared_type
            .clone()
            .or_else(|| {
                variable
                    .value
                    .as_deref()
                    .filter(|value| !value.trim().is_empty())
                    .and_then(|value| self.rules.guess_type_from_value(value))
            })
            .or_else(|| guess_type_from_name(&variable.name, profile, self.notations))
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

        let tag = format!(
            "@{} {}",
            profile.type_tag,
            curly(&placeholder(&escape(&type_name)), profile.curly_types)
        );

        if inline {
            vec![format!("{} {}", tag, placeholder(DESCRIPTION))]
        } else {
            vec![
                placeholder(&format!("[{} description]", escape(&variable.name))),
                tag,
            ]
        }
    }

    /// `{Type} ` ahead of a parameter name, or nothing for untyped languages
    fn type_info(&self, type_hint: Option<&str>, name: &str) -> String {
        let profile = self.rules.profile();
        if !profile.type_info {
            return String::new();
        }

        let type_name = type_hint
            .map(str::to_string)
            .or_else(|| guess_type_from_name(name, profile, self.notations))
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

        format!("{} ", curly(&placeholder(&escape(&type_name)), profile.curly_types))
    }

    /// With deep alignment an empty column is left where parameters have
    /// their name, so return and parameter descriptions line up.
    fn return_line(&self, tag: &str, type_name: &str, has_args: bool) -> String {
        let profile = self.rules.profile();
        let settings = self.settings;

        let type_info = if profile.type_info {
            format!(" {}", curly(&placeholder(type_name), profile.curly_types))
        } else {
            String::new()
        };

        if !settings.return_description {
            return format!("{}{}", tag, type_info);
        }

        let name_column = if has_args
            && settings.align_tags == AlignMode::Deep
            && !settings.per_section_indent
        {
            " "
        } else {
            ""
        };

        format!("{}{} {}{}", tag, type_info, name_column, placeholder(DESCRIPTION))
    }

    /// Turn body lines into the text inserted after the opening `/**`.
    ///
    /// An empty body renders as a single placeholder holding `trailing`.
    pub fn render(
        &self,
        body: Vec<String>,
        inline: bool,
        trailing: &str,
        now: &DateTime<FixedOffset>,
    ) -> String {
        let settings = self.settings;

        let mut lines = substitute_variables(body, now);
        if !inline {
            lines = align_tags(lines, settings);
        }
        let lines = renumber_tab_stops(lines);

        if inline {
            return match lines.first() {
                Some(first) => format!(" {} */", first),
                None => " $0 */".to_string(),
            };
        }

        let indent = settings.indent();
        let mut snippet = String::new();

        if lines.is_empty() {
            snippet.push_str(&format!("\n *{}${{0:{}}}", indent, trailing));
        } else {
            for line in insert_spacers(lines, settings.spacer_between_sections) {
                snippet.push_str("\n *");
                if !line.is_empty() {
                    snippet.push_str(&indent);
                    snippet.push_str(&line);
                }
            }
        }

        snippet.push('\n');
        snippet.push_str(&self.rules.profile().comment_closer);

        if settings.newline_after_block {
            snippet.push('\n');
        }

        snippet
    }
}

/// Pad the space-separated columns of every `@tag` line to common widths.
///
/// A placeholder is one column however many spaces its default holds.
/// Widths are measured in display cells once tab-stops resolve. `@author` lines
/// count only their tag and are left untouched. With per-section indent the
/// return tag does not widen any column.
pub fn align_tags(lines: Vec<String>, settings: &Settings) -> Vec<String> {
    if settings.align_tags == AlignMode::Off {
        return lines;
    }

    let skipped_tag = settings
        .per_section_indent
        .then_some(settings.return_tag.as_str());

    let widths: Vec<Vec<usize>> = lines
        .iter()
        .filter(|line| line.starts_with('@'))
        .filter(|line| !skipped_tag.is_some_and(|tag| line.starts_with(tag)))
        .map(|line| {
            if line.starts_with("@author") {
                vec![output_width("@author")]
            } else {
                split_columns(line).into_iter().map(output_width).collect()
            }
        })
        .collect();

    let columns = match settings.align_tags {
        AlignMode::Shallow => 1,
        _ => widths.iter().map(Vec::len).max().unwrap_or(0),
    };

    let mut max_widths = vec![0usize; columns];
    for row in &widths {
        for (column, width) in row.iter().take(columns).enumerate() {
            max_widths[column] = max_widths[column].max(*width);
        }
    }

    let gap = " ".repeat(settings.min_spaces_between_columns);

    lines
        .into_iter()
        .map(|line| {
            if !line.starts_with('@') || line.starts_with("@author") {
                return line;
            }

            let mut aligned = String::with_capacity(line.len() + 16);
            for (column, part) in split_columns(&line).into_iter().enumerate() {
                let target = max_widths.get(column).copied().unwrap_or(0);
                aligned.push_str(part);
                aligned.push_str(&gap);
                aligned.push_str(&" ".repeat(target.saturating_sub(output_width(part))));
            }
            aligned.trim().to_string()
        })
        .collect()
}

/// Insert blank lines between the description and tag groups
pub fn insert_spacers(lines: Vec<String>, mode: SpacerMode) -> Vec<String> {
    match mode {
        SpacerMode::Off => lines,

        SpacerMode::BetweenSections => {
            let mut out = Vec::with_capacity(lines.len() + 4);
            let mut last_tag: Option<String> = None;

            for line in lines {
                if let Some(tag) = tag_name(&line).map(str::to_string) {
                    if last_tag.as_deref() != Some(tag.as_str()) {
                        if !out.is_empty() {
                            out.push(String::new());
                        }
                        last_tag = Some(tag);
                    }
                }
                out.push(line);
            }
            out
        }

        SpacerMode::AfterDescription => {
            let mut lines = lines;
            if let Some(first_tag) = lines.iter().position(|line| tag_name(line).is_some()) {
                if first_tag > 0 {
                    lines.insert(first_tag, String::new());
                }
            }
            lines
        }
    }
}
