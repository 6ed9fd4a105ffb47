//! Reload Module
//!
//! Keeps the served rendering in step with the file on disk.
//!
//! # Architecture
//!
//! ```text
//! FsActor -> ReloadActor -> Orchestrator -> RenderSlot <- HTTP handlers
//!  (watch)    (schedule)    (read+render)    (publish)     (snapshot)
//! ```
//!
//! # Modules
//!
//! - `orchestrator` - re-render pipeline and outcome reporting
//! - `state` - `RenderState` and the generation-guarded `RenderSlot`
//! - `version` - content fingerprints served on `/ping`

mod orchestrator;
mod state;
mod version;

pub use orchestrator::{Orchestrator, Outcome};
pub use state::{Published, RenderSlot, RenderState};
pub use version::Version;
