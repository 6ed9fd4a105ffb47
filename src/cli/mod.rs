//! Command-line interface module.

mod args;
pub mod serve;
mod target;

pub use args::Cli;
pub use target::{StartupError, validate_target};
