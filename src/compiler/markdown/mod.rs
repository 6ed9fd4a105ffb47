//! Markdown rendering.
//!
//! - `convert`: bytes to HTML fragment via pulldown-cmark
//! - `anchor`: automatic heading ids

mod anchor;
mod convert;

pub use convert::{MarkdownOptions, RenderError, render};
