use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use docblock::core::SourceLines;
use docblock::{DocblockError, Engine, GenerateRequest, Language};

#[derive(Parser)]
#[command(name = "docblock")]
#[command(about = "Generate documentation comments for the declaration under the cursor")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the doc block for the declaration starting at a line
    Generate {
        /// Source file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// 1-based line the declaration starts on
        #[arg(short, long)]
        line: usize,

        /// Language tag (defaults to the file extension)
        #[arg(long)]
        language: Option<String>,

        /// Text typed after the opening `/**`
        #[arg(long, default_value = "")]
        trailing: String,

        /// Emit a single-line `/** ... */` comment
        #[arg(long)]
        inline: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrap the description text of a comment block
    Wrap {
        /// Source file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// 1-based line holding the `/**` opener
        #[arg(short, long)]
        line: usize,
    },

    /// Turn the `[bracketed]` fields of a comment block back into tab-stops
    Reparse {
        /// Source file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// 1-based line holding the `/**` opener
        #[arg(short, long)]
        line: usize,
    },

    /// Box a run of `//` comments in a banner
    Decorate {
        /// Source file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// First line (1-based)
        #[arg(long)]
        start: usize,

        /// Last line (1-based, inclusive)
        #[arg(long)]
        end: usize,
    },

    /// Join comment lines into one
    Join {
        /// Source file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// First line (1-based)
        #[arg(long)]
        start: usize,

        /// Last line (1-based, inclusive)
        #[arg(long)]
        end: usize,
    },

    /// List supported language tags
    Languages,
}

impl Cli {
    pub fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Generate {
                file,
                line,
                language,
                trailing,
                inline,
                json,
            } => {
                let language = match language {
                    Some(tag) => tag.parse::<Language>()?,
                    None => language_for(&file),
                };
                let text = read_source(&file)?;
                let source = SourceLines::new(&text);
                let index = to_index(line)?;
                if index >= source.len() {
                    return Err(DocblockError::LineOutOfRange {
                        line,
                        total: source.len(),
                    }
                    .into());
                }

                let request = GenerateRequest::new(language)
                    .with_trailing(trailing)
                    .inline(inline);
                let outcome = engine.generate(&request, &source, index);

                if json {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                } else {
                    println!("{}", outcome.text());
                }
                Ok(())
            }
            Commands::Wrap { file, line } => {
                let text = read_source(&file)?;
                let lines: Vec<&str> = text.lines().collect();
                println!("{}", engine.wrap(&lines, to_index(line)?)?);
                Ok(())
            }
            Commands::Reparse { file, line } => {
                let text = read_source(&file)?;
                let lines: Vec<&str> = text.lines().collect();
                println!("{}", engine.reparse(&lines, to_index(line)?)?);
                Ok(())
            }
            Commands::Decorate { file, start, end } => {
                let text = read_source(&file)?;
                let lines: Vec<&str> = text.lines().collect();
                println!("{}", engine.decorate(&lines, to_index(start)?, to_index(end)?)?);
                Ok(())
            }
            Commands::Join { file, start, end } => {
                let text = read_source(&file)?;
                let lines: Vec<&str> = text.lines().collect();
                println!("{}", engine.join(&lines, to_index(start)?, to_index(end)?)?);
                Ok(())
            }
            Commands::Languages => {
                for language in Language::ALL {
                    println!("{}", language);
                }
                Ok(())
            }
        }
    }
}

/// Read a file, or stdin for `-`
fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn language_for(path: &Path) -> Language {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(Language::from_extension)
        .unwrap_or_default()
}

fn to_index(line: usize) -> Result<usize> {
    if line == 0 {
        bail!("Line numbers start at 1");
    }
    Ok(line - 1)
}
