//! Markdown to HTML conversion using pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, html};
use thiserror::Error;

use super::anchor::assign_heading_ids;
use crate::config::section::RenderConfig;

/// Options for markdown conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Give every heading without an explicit id a slug id
    pub heading_ids: bool,
    /// Inputs larger than this are refused
    pub max_bytes: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl MarkdownOptions {
    /// Default input size limit (16 MiB).
    pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;

    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            heading_ids: true,
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    /// Build options from the `[render]` config section.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            tables: config.tables,
            footnotes: config.footnotes,
            strikethrough: config.strikethrough,
            task_lists: config.task_lists,
            heading_attributes: config.heading_attributes,
            heading_ids: config.heading_ids,
            max_bytes: config.max_bytes,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// Why a document could not be converted.
///
/// Markdown itself has no syntax errors; these are input-level failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("input is {size} bytes, refusing to render more than {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Render markdown bytes to an HTML fragment.
///
/// Pure: the same bytes and options always give the same HTML.
pub fn render(bytes: &[u8], options: &MarkdownOptions) -> Result<String, RenderError> {
    if bytes.len() > options.max_bytes {
        return Err(RenderError::TooLarge {
            size: bytes.len(),
            limit: options.max_bytes,
        });
    }

    let source = std::str::from_utf8(bytes)?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let parser = Parser::new_ext(source, options.to_pulldown_options());

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    if options.heading_ids {
        let mut events: Vec<Event<'_>> = parser.collect();
        assign_heading_ids(&mut events);
        html::push_html(&mut out, events.into_iter());
    } else {
        html::push_html(&mut out, parser);
    }
    Ok(out)
}
