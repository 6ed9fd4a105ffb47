//! Process state for serve mode.
//!
//! Two orthogonal states:
//! - `PHASE`: lifecycle `Uninitialized → Initializing → Serving`, never regresses
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Lifecycle phase of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Phase {
    /// Arguments not yet validated
    Uninitialized = 0,
    /// Watcher armed, first render in progress
    Initializing = 1,
    /// First render installed, HTTP front answering
    Serving = 2,
}

impl Phase {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Initializing,
            _ => Self::Serving,
        }
    }
}

static PHASE: AtomicU8 = AtomicU8::new(Phase::Uninitialized as u8);

/// Exit status after Ctrl+C, as shells report SIGINT.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

// =============================================================================
// PHASE state
// =============================================================================

/// Current lifecycle phase
pub fn phase() -> Phase {
    Phase::from_u8(PHASE.load(Ordering::SeqCst))
}

/// Move forward to `next`. Earlier phases are ignored.
fn advance(next: Phase) {
    PHASE.fetch_max(next as u8, Ordering::SeqCst);
}

/// Mark startup as in progress (after argument validation)
pub fn set_initializing() {
    advance(Phase::Initializing);
}

/// Mark the document as ready to serve (after the first render is installed)
pub fn set_serving() {
    advance(Phase::Serving);
}

/// Check if the document is ready to serve requests
pub fn is_serving() -> bool {
    phase() == Phase::Serving
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a server has been registered:
/// - Before `register_server()`: exit immediately, nothing to shut down
/// - After `register_server()`: Graceful shutdown (unblock server, notify actors)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Exit status once the request loop has returned.
pub fn exit_status() -> u8 {
    status_after_loop(is_shutdown())
}

const fn status_after_loop(interrupted: bool) -> u8 {
    if interrupted { INTERRUPTED_EXIT_CODE } else { 0 }
}

// =============================================================================
// Tests
// =============================================================================
