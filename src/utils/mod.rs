//! Utility modules shared across mdserve.

pub mod browser;
pub mod exec;
pub mod html;
pub mod mime;
pub mod path;
