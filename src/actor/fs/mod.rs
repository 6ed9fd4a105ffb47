//! FileSystem Actor
//!
//! Watches the served document and sends one debounced `FileChanged` per
//! burst of writes to the ReloadActor.
//! Implements the "Watcher-First" pattern: the watch is armed before the
//! first render, so no edit made during startup is lost.
//!
//! Architecture:
//! ```text
//! Watcher → WatchTarget (name filter) → Debouncer (pure timing) → ReloadMsg
//! ```

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::messages::ReloadMsg;
use crate::utils::path::display_name;

// Pure timing and deduplication.
mod debouncer;
// Shared fs event types.
mod types;
// Parent-directory watch attach/re-arm lifecycle.
mod watch_target;


use debouncer::Debouncer;
use types::ChangeKind;
use watch_target::WatchTarget;

/// Retry interval for re-attaching a lost directory watch.
const REATTACH_INTERVAL: Duration = Duration::from_millis(500);

/// FileSystem Actor - watches the document for changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// The watched document
    target: WatchTarget,
    /// Channel to send messages to ReloadActor
    reload_tx: mpsc::Sender<ReloadMsg>,
    /// Debouncer state
    debouncer: Debouncer,
}

impl FsActor {
    /// Create a new FsActor with Watcher-First pattern
    ///
    /// The watcher starts immediately, buffering events while the caller
    /// performs the initial render.
    pub fn new(
        path: PathBuf,
        reload_tx: mpsc::Sender<ReloadMsg>,
        debounce: Duration,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut target = WatchTarget::new(path);
        target.attach(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            target,
            reload_tx,
            debouncer: Debouncer::new(debounce),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let reload_tx = self.reload_tx;
        let mut debouncer = self.debouncer;
        let mut watcher = self.watcher;
        let mut target = self.target;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            let wait = if target.is_attached() {
                debouncer.sleep_duration()
            } else {
                debouncer.sleep_duration().min(REATTACH_INTERVAL)
            };

            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event, |p| target.matches(p)),
                _ = tokio::time::sleep(wait) => {
                    let batch = debouncer.take_if_ready();
                    if batch.is_none() && target.is_attached() {
                        continue;
                    }
                    let reattached = target.maintain(&mut watcher);
                    if dispatch(batch, reattached, &target, &reload_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Turn a debounced batch into at most one reload request.
///
/// Returns `Err(())` if the ReloadActor shut down
async fn dispatch(
    batch: Option<FxHashMap<PathBuf, ChangeKind>>,
    reattached: bool,
    target: &WatchTarget,
    reload_tx: &mpsc::Sender<ReloadMsg>,
) -> Result<(), ()> {
    if let Some(changes) = &batch {
        for (path, kind) in changes {
            crate::debug!("watch"; "{}: {}", kind.label(), path.display());
        }
    }

    if target.file().is_file() {
        if batch.is_some() || reattached {
            reload_tx
                .send(ReloadMsg::FileChanged)
                .await
                .map_err(|_| ())?;
        }
    } else if batch.is_some() {
        crate::logger::status_warning(&format!(
            "{} removed, serving the last render until it comes back",
            display_name(target.file())
        ));
    }

    Ok(())
}
