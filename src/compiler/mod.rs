//! Document compilation.

pub mod markdown;

pub use markdown::MarkdownOptions;
