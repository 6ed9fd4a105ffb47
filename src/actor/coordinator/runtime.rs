use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::ReloadMsg;
use crate::actor::reload::ReloadActor;

/// Run both actors until shutdown is signalled or one of them stops.
pub(super) async fn run_actors(
    fs: FsActor,
    reload: ReloadActor,
    reload_tx: mpsc::Sender<ReloadMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let reload_handle = tokio::spawn(async move { reload.run().await });
    let mut fs_handle = tokio::spawn(async move { fs.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if fs_handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        let _ = (&mut fs_handle).await;
    }

    fs_handle.abort();
    crate::debug!("actor"; "sending shutdown to reload");
    let _ = reload_tx.send(ReloadMsg::Shutdown).await;

    let _ = tokio::time::timeout(Duration::from_millis(500), reload_handle).await;
}
