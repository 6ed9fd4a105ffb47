//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `display_name`)

pub mod fs;

pub use fs::{display_name, normalize_path};
