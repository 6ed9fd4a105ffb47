//! Reload Actor
//!
//! Runs re-renders requested by the FsActor. Renders execute on the
//! blocking pool; requests queued while one runs are folded into the next.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::ReloadMsg;
use crate::reload::Orchestrator;

pub struct ReloadActor {
    rx: mpsc::Receiver<ReloadMsg>,
    orchestrator: Arc<Orchestrator>,
}

impl ReloadActor {
    pub fn new(rx: mpsc::Receiver<ReloadMsg>, orchestrator: Arc<Orchestrator>) -> Self {
        Self { rx, orchestrator }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            if msg == ReloadMsg::Shutdown {
                break;
            }

            let shutdown = self.drain_pending();
            self.rerender().await;
            if shutdown {
                break;
            }
        }
        crate::debug!("render"; "reload actor stopped");
    }

    /// Fold queued requests into the render about to start.
    ///
    /// Returns `true` if a shutdown was queued among them.
    fn drain_pending(&mut self) -> bool {
        let mut folded = 0usize;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ReloadMsg::FileChanged => folded += 1,
                ReloadMsg::Shutdown => return true,
            }
        }
        if folded > 0 {
            crate::debug!("render"; "folded {} queued change(s)", folded);
        }
        false
    }

    async fn rerender(&self) {
        let orchestrator = Arc::clone(&self.orchestrator);
        // Outcomes are reported by the orchestrator itself
        if let Err(e) = tokio::task::spawn_blocking(move || orchestrator.on_file_changed()).await {
            crate::log!("error"; "render task failed: {}", e);
        }
    }
}
