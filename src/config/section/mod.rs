//! Configuration section definitions.
//!
//! Each module corresponds to a section in `mdserve.toml`:
//!
//! | Module   | TOML Section | Purpose                          |
//! |----------|--------------|----------------------------------|
//! | `render` | `[render]`   | Markdown extensions and limits   |
//! | `serve`  | `[serve]`    | Preview server and browser page  |
//! | `watch`  | `[watch]`    | File watcher debounce            |

mod render;
mod serve;
mod watch;

pub use render::RenderConfig;
pub use serve::ServeConfig;
pub use watch::WatchConfig;
