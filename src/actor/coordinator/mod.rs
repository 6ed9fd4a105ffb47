//! Actor Coordinator - Wires up the Live Reload Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Takes the already-armed FsActor (watcher-first)
//! - Wires it to a ReloadActor over the reload channel
//! - Runs them until shutdown

mod runtime;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::ReloadMsg;
use super::reload::ReloadActor;
use crate::reload::Orchestrator;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    fs: FsActor,
    reload_tx: mpsc::Sender<ReloadMsg>,
    reload_rx: mpsc::Receiver<ReloadMsg>,
    orchestrator: Arc<Orchestrator>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// `reload_tx`/`reload_rx` must be the pair whose sender `fs` was built with.
    pub fn new(
        fs: FsActor,
        reload_tx: mpsc::Sender<ReloadMsg>,
        reload_rx: mpsc::Receiver<ReloadMsg>,
        orchestrator: Arc<Orchestrator>,
    ) -> Self {
        Self {
            fs,
            reload_tx,
            reload_rx,
            orchestrator,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) {
        let reload_actor = ReloadActor::new(self.reload_rx, self.orchestrator);

        crate::debug!("actor"; "start");
        runtime::run_actors(self.fs, reload_actor, self.reload_tx, self.shutdown_rx).await;
        crate::debug!("actor"; "stopped");
    }
}
