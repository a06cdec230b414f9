// src/config.rs
use crate::constants::{
    MAX_BLOCKS_PER_REQUEST, MAX_EQUATION_LENGTH, MAX_RICH_TEXT_LENGTH,
};
use crate::error::ParseError;
use crate::types::ContentType;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// How the pipeline decides which parser handles the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeOverride {
    /// Run the content detector and dispatch on its best guess.
    #[default]
    Auto,
    /// Skip detection entirely and use the given type.
    Explicit(ContentType),
}

/// What the converter does with heading levels 4–6, which the block
/// schema cannot express directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingOverflow {
    /// Collapse h4–h6 into `heading_3`.
    #[default]
    Clamp,
    /// Render h4–h6 as a paragraph of bold text.
    BoldParagraph,
}

/// Configuration for one pipeline invocation.
///
/// The limit fields default to the platform's hard limits; callers may
/// tighten them but `validate` rejects zeroes, the only caller error the
/// pipeline ever surfaces.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub content_type: TypeOverride,
    pub max_blocks: usize,
    pub max_rich_text_length: usize,
    pub max_equation_length: usize,
    pub preserve_formatting: bool,
    pub convert_links: bool,
    pub convert_images: bool,
    pub convert_tables: bool,
    pub convert_code: bool,
    pub strict_validation: bool,
    pub remove_empty_blocks: bool,
    pub normalize_whitespace: bool,
    pub heading_overflow: HeadingOverflow,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            content_type: TypeOverride::Auto,
            max_blocks: MAX_BLOCKS_PER_REQUEST,
            max_rich_text_length: MAX_RICH_TEXT_LENGTH,
            max_equation_length: MAX_EQUATION_LENGTH,
            preserve_formatting: true,
            convert_links: true,
            convert_images: true,
            convert_tables: true,
            convert_code: true,
            strict_validation: false,
            remove_empty_blocks: true,
            normalize_whitespace: false,
            heading_overflow: HeadingOverflow::Clamp,
        }
    }
}

impl ParseOptions {
    /// Reject configurations no stage could honor.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.max_blocks == 0 {
            return Err(ParseError::InvalidOptions(
                "max_blocks must be at least 1".to_string(),
            ));
        }
        if self.max_rich_text_length == 0 {
            return Err(ParseError::InvalidOptions(
                "max_rich_text_length must be at least 1".to_string(),
            ));
        }
        if self.max_equation_length == 0 {
            return Err(ParseError::InvalidOptions(
                "max_equation_length must be at least 1".to_string(),
            ));
        }
        if self.max_rich_text_length > MAX_RICH_TEXT_LENGTH {
            return Err(ParseError::InvalidOptions(format!(
                "max_rich_text_length {} exceeds the platform limit of {}",
                self.max_rich_text_length, MAX_RICH_TEXT_LENGTH
            )));
        }
        if self.max_blocks > MAX_BLOCKS_PER_REQUEST {
            return Err(ParseError::InvalidOptions(format!(
                "max_blocks {} exceeds the platform limit of {}",
                self.max_blocks, MAX_BLOCKS_PER_REQUEST
            )));
        }
        Ok(())
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = TypeOverride::Explicit(content_type);
        self
    }

    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn with_heading_overflow(mut self, policy: HeadingOverflow) -> Self {
        self.heading_overflow = policy;
        self
    }
}

/// Parsed command-line input for the binary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Input files to parse ('-' for stdin); omit when using --clipboard
    pub inputs: Vec<String>,

    /// Read input from the system clipboard
    #[arg(short = 'b', long, default_value_t = false)]
    pub clipboard: bool,

    /// Poll the clipboard and re-parse whenever its content changes
    #[arg(short = 'w', long, default_value_t = false)]
    pub watch: bool,

    /// Force a content type instead of auto-detecting (e.g. 'markdown', 'csv')
    #[arg(short = 't', long)]
    pub content_type: Option<String>,

    /// Maximum number of blocks to emit (platform limit: 100)
    #[arg(long, default_value_t = MAX_BLOCKS_PER_REQUEST)]
    pub max_blocks: usize,

    /// Maximum characters per rich-text segment (platform limit: 2000)
    #[arg(long, default_value_t = MAX_RICH_TEXT_LENGTH)]
    pub max_rich_text_length: usize,

    /// Treat validation findings as fatal errors
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Render tables as plain paragraphs instead of table blocks
    #[arg(long, default_value_t = false)]
    pub no_tables: bool,

    /// Render code as plain paragraphs instead of code blocks
    #[arg(long, default_value_t = false)]
    pub no_code: bool,

    /// Strip links down to their visible text
    #[arg(long, default_value_t = false)]
    pub no_links: bool,

    /// Render images as their alt text instead of image blocks
    #[arg(long, default_value_t = false)]
    pub no_images: bool,

    /// Keep whitespace-only blocks instead of dropping them
    #[arg(long, default_value_t = false)]
    pub keep_empty_blocks: bool,

    /// Collapse runs of whitespace inside text spans
    #[arg(long, default_value_t = false)]
    pub normalize_whitespace: bool,

    /// Render headings 4-6 as bold paragraphs instead of heading_3
    #[arg(long, default_value_t = false)]
    pub headings_as_bold: bool,

    /// Emit the full result envelope (metadata + validation) instead of
    /// the bare {"children": [...]} payload
    #[arg(short = 'r', long, default_value_t = false)]
    pub report: bool,

    /// Output file for the JSON payload (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short = 'p', long, default_value_t = false)]
    pub pretty: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CommandLineInput {
    /// Resolve the CLI flags into validated pipeline options.
    pub fn to_parse_options(&self) -> Result<ParseOptions, ParseError> {
        let content_type = match &self.content_type {
            Some(name) => TypeOverride::Explicit(ContentType::from_str(name).map_err(|_| {
                ParseError::InvalidOptions(format!("unknown content type '{}'", name))
            })?),
            None => TypeOverride::Auto,
        };

        let options = ParseOptions {
            content_type,
            max_blocks: self.max_blocks,
            max_rich_text_length: self.max_rich_text_length,
            convert_tables: !self.no_tables,
            convert_code: !self.no_code,
            convert_links: !self.no_links,
            convert_images: !self.no_images,
            strict_validation: self.strict,
            remove_empty_blocks: !self.keep_empty_blocks,
            normalize_whitespace: self.normalize_whitespace,
            heading_overflow: if self.headings_as_bold {
                HeadingOverflow::BoldParagraph
            } else {
                HeadingOverflow::Clamp
            },
            ..ParseOptions::default()
        };
        options.validate()?;
        Ok(options)
    }
}
