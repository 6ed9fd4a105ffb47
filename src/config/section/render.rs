//! `[render]` section configuration.
//!
//! ```toml
//! [render]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! task_lists = true
//! heading_attributes = true   # `# Title {#id .class}`
//! heading_ids = true          # slug ids for headings without one
//! max_bytes = 16777216        # refuse larger documents
//! ```

use serde::{Deserialize, Serialize};

use crate::compiler::markdown::MarkdownOptions;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Markdown extensions and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    pub heading_attributes: bool,
    pub heading_ids: bool,
    pub max_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            heading_ids: true,
            max_bytes: MarkdownOptions::DEFAULT_MAX_BYTES,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_bytes == 0 {
            diag.error(
                FieldPath::new("render.max_bytes"),
                "max_bytes must be greater than 0",
            );
        }
    }
}
