use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{DocblockError, Result};

/// How `@tag` lines are column-aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawAlign")]
pub enum AlignMode {
    /// Leave tag lines as synthesized
    Off,
    /// Align only the column following the tag name
    Shallow,
    /// Align every column independently
    Deep,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAlign {
    Flag(bool),
    Mode(String),
}

impl TryFrom<RawAlign> for AlignMode {
    type Error = String;

    fn try_from(raw: RawAlign) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawAlign::Flag(true) => Ok(AlignMode::Shallow),
            RawAlign::Flag(false) => Ok(AlignMode::Off),
            RawAlign::Mode(mode) => match mode.as_str() {
                "off" | "none" => Ok(AlignMode::Off),
                "shallow" => Ok(AlignMode::Shallow),
                "deep" => Ok(AlignMode::Deep),
                other => Err(format!("unknown align_tags mode `{}`", other)),
            },
        }
    }
}

/// Where blank `*` lines are inserted between sections of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpacer", into = "RawSpacer")]
pub enum SpacerMode {
    Off,
    /// Before every new group of tags
    BetweenSections,
    /// Once, between the description and the first tag
    AfterDescription,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSpacer {
    Flag(bool),
    Mode(String),
}

impl TryFrom<RawSpacer> for SpacerMode {
    type Error = String;

    fn try_from(raw: RawSpacer) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSpacer::Flag(true) => Ok(SpacerMode::BetweenSections),
            RawSpacer::Flag(false) => Ok(SpacerMode::Off),
            RawSpacer::Mode(mode) if mode == "after_description" => Ok(SpacerMode::AfterDescription),
            RawSpacer::Mode(mode) => Err(format!("unknown spacer_between_sections value `{}`", mode)),
        }
    }
}

impl From<SpacerMode> for RawSpacer {
    fn from(mode: SpacerMode) -> Self {
        match mode {
            SpacerMode::Off => RawSpacer::Flag(false),
            SpacerMode::BetweenSections => RawSpacer::Flag(true),
            SpacerMode::AfterDescription => RawSpacer::Mode("after_description".to_string()),
        }
    }
}

/// A name-matching rule used to infer types (Hungarian-notation tables)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotationRule {
    /// Literal identifier prefix, matched at a camelCase/snake_case boundary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Arbitrary pattern searched anywhere in the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Type to infer; `bool` and `function` map to the language's own names
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Extra tag lines appended to function comments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spaces between the `*` leader and the line content
    pub indentation_spaces: usize,

    /// Indentation for continuation lines when wrapping descriptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indentation_spaces_same_para: Option<usize>,

    /// Column alignment of `@tag` lines
    pub align_tags: AlignMode,

    /// Minimum gap between aligned columns
    pub min_spaces_between_columns: usize,

    /// Leave the return tag out of the width computation
    pub per_section_indent: bool,

    /// Add a `[description]` placeholder to `@param` lines
    pub param_description: bool,

    /// Add a `[description]` placeholder to `@return` lines
    pub return_description: bool,

    /// Start function comments with a description placeholder
    pub function_description: bool,

    /// Blank lines between tag sections
    pub spacer_between_sections: SpacerMode,

    /// Fixed tag lines added to every function comment
    pub extra_tags: Vec<String>,

    /// Put `extra_tags` after the params instead of before them
    pub extra_tags_go_after: bool,

    /// Ordered name-to-type inference rules
    pub notation_map: Vec<NotationRule>,

    /// Replacement for the `@type` tag in JavaScript-like languages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_js_var: Option<String>,

    /// Tag used for return values
    pub return_tag: String,

    /// `number`/`string`/`boolean` instead of `Number`/`String`/`Boolean`
    pub lower_case_primitives: bool,

    /// `Bool`/`int`/`bool` instead of `Boolean`/`integer`/`boolean`
    pub short_primitives: bool,

    /// Add `@method name` to function comments
    pub autoadd_method_tag: bool,

    /// Skip declaration parsing and emit an empty block
    pub simple_mode: bool,

    /// Emit a newline after the comment closer
    pub newline_after_block: bool,

    /// Editor rulers; the first one is the wrap column
    pub rulers: Vec<usize>,

    /// Width of a tab when measuring indentation
    pub tab_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indentation_spaces: 1,
            indentation_spaces_same_para: None,
            align_tags: AlignMode::Deep,
            min_spaces_between_columns: 1,
            per_section_indent: false,
            param_description: true,
            return_description: true,
            function_description: true,
            spacer_between_sections: SpacerMode::Off,
            extra_tags: Vec::new(),
            extra_tags_go_after: false,
            notation_map: Vec::new(),
            override_js_var: None,
            return_tag: "@return".to_string(),
            lower_case_primitives: false,
            short_primitives: false,
            autoadd_method_tag: false,
            simple_mode: false,
            newline_after_block: false,
            rulers: vec![80],
            tab_size: 4,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocblockError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load settings with fallback to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    debug!("No settings at {}, using defaults", p.as_ref().display());
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["docblock.toml", ".docblock.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The `" "`-run placed between the `*` leader and line content
    pub fn indent(&self) -> String {
        " ".repeat(self.indentation_spaces)
    }

    /// Indentation for wrapped continuation lines
    pub fn same_para_indent(&self) -> String {
        " ".repeat(
            self.indentation_spaces_same_para
                .unwrap_or(self.indentation_spaces),
        )
    }

    /// Column descriptions are wrapped at
    pub fn wrap_column(&self) -> usize {
        self.rulers.first().copied().filter(|c| *c > 0).unwrap_or(80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_is_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.indentation_spaces, 1);
        assert_eq!(settings.align_tags, AlignMode::Deep);
        assert_eq!(settings.spacer_between_sections, SpacerMode::Off);
        assert_eq!(settings.return_tag, "@return");
        assert_eq!(settings.wrap_column(), 80);
    }

    #[test]
    fn test_align_tags_accepts_bool_and_mode() {
        let settings: Settings = toml::from_str("align_tags = true").unwrap();
        assert_eq!(settings.align_tags, AlignMode::Shallow);

        let settings: Settings = toml::from_str("align_tags = \"off\"").unwrap();
        assert_eq!(settings.align_tags, AlignMode::Off);

        assert!(toml::from_str::<Settings>("align_tags = \"sideways\"").is_err());
    }

    #[test]
    fn test_spacer_modes() {
        let settings: Settings = toml::from_str("spacer_between_sections = true").unwrap();
        assert_eq!(settings.spacer_between_sections, SpacerMode::BetweenSections);

        let settings: Settings =
            toml::from_str("spacer_between_sections = \"after_description\"").unwrap();
        assert_eq!(settings.spacer_between_sections, SpacerMode::AfterDescription);
    }

    #[test]
    fn test_notation_map_parses() {
        let settings: Settings = toml::from_str(
            r#"
            [[notation_map]]
            prefix = "str"
            type = "String"

            [[notation_map]]
            regex = "^_"
            tags = ["@private"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.notation_map.len(), 2);
        assert_eq!(settings.notation_map[0].prefix.as_deref(), Some("str"));
        assert_eq!(settings.notation_map[0].type_name.as_deref(), Some("String"));
        assert_eq!(settings.notation_map[1].tags, vec!["@private".to_string()]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docblock.toml");

        let mut settings = Settings::default();
        settings.spacer_between_sections = SpacerMode::AfterDescription;
        settings.rulers = vec![100];
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.spacer_between_sections, SpacerMode::AfterDescription);
        assert_eq!(loaded.wrap_column(), 100);
    }
}
