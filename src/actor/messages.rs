//! Actor Message Definitions
//!
//! ```text
//! FsActor --FileChanged--> ReloadActor
//! ```

use tokio::sync::mpsc;

/// Buffer of the reload channel. Requests beyond this coalesce anyway.
pub const CHANNEL_BUFFER: usize = 32;

/// Messages to Reload Actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMsg {
    /// The document settled after a burst of changes
    FileChanged,
    /// Shutdown
    Shutdown,
}

/// Channel from the watcher to the reload actor.
///
/// Created before the watcher so the sender can be handed to it while the
/// first render runs.
pub fn reload_channel() -> (mpsc::Sender<ReloadMsg>, mpsc::Receiver<ReloadMsg>) {
    mpsc::channel(CHANNEL_BUFFER)
}
