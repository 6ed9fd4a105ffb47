//! Actor System for Live Reload
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --> ReloadActor --> Orchestrator
//! (watch)     (schedule)      (render + publish)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File watcher with debouncing
//! - `reload` - Runs re-renders off the async threads
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod reload;

pub use coordinator::Coordinator;
pub use fs::FsActor;
pub use messages::reload_channel;
