use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

use super::Coordinator;
use crate::actor::{FsActor, reload_channel};
use crate::compiler::MarkdownOptions;
use crate::reload::{Orchestrator, RenderSlot, RenderState};
use crate::utils::path::normalize_path;

const WINDOW: Duration = Duration::from_millis(300);

/// Wait until the slot holds `generation`, then make sure nothing follows it.
async fn settle_at(slot: &RenderSlot, generation: u64) -> Arc<RenderState> {
    timeout(Duration::from_secs(5), async {
        while slot.snapshot().generation < generation {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("generation {generation} not installed within 5s"));

    sleep(WINDOW * 2).await;
    let state = slot.snapshot();
    assert_eq!(state.generation, generation, "unexpected extra render");
    state
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_edits_reach_the_slot_until_shutdown() {
    let temp = TempDir::new().unwrap();
    let dir = normalize_path(temp.path());
    let file = dir.join("doc.md");
    write(&file, "# Hello");

    let orchestrator =
        Arc::new(Orchestrator::initialize(file.clone(), MarkdownOptions::all()).unwrap());
    let slot = orchestrator.slot();
    let v0 = slot.version();

    let (reload_tx, reload_rx) = reload_channel();
    let fs_actor = FsActor::new(file.clone(), reload_tx.clone(), WINDOW).unwrap();
    let (shutdown_tx, shutdown_rx) = channel::unbounded();
    let handle = tokio::spawn(
        Coordinator::new(fs_actor, reload_tx, reload_rx, orchestrator)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    );

    // A burst of saves within the window renders once, with the last content
    for i in 0..5 {
        write(&file, &format!("# Goodbye {i}"));
        sleep(Duration::from_millis(20)).await;
    }
    let state = settle_at(&slot, 1).await;
    assert!(state.html.contains("Goodbye 4"));
    assert!(!state.html.contains("Hello"));
    assert_ne!(state.version, v0);

    // Atomic save: write a sibling, rename it over the document
    let tmp = dir.join("doc.md.tmp");
    write(&tmp, "# Renamed");
    fs::rename(&tmp, &file).unwrap();
    let state = settle_at(&slot, 2).await;
    assert!(state.html.contains("Renamed"));

    // The watch survived the rename
    write(&file, "# After");
    let state = settle_at(&slot, 3).await;
    assert!(state.html.contains("After"));

    shutdown_tx.send(()).unwrap();
    timeout(Duration::from_secs(3), handle)
        .await
        .expect("actors did not stop after shutdown")
        .unwrap();

    // Nothing renders once the actors are gone
    write(&file, "# Ignored");
    sleep(WINDOW * 2).await;
    assert_eq!(slot.snapshot().generation, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_before_any_edit() {
    let temp = TempDir::new().unwrap();
    let file = normalize_path(temp.path()).join("doc.md");
    write(&file, "# Idle");

    let orchestrator =
        Arc::new(Orchestrator::initialize(file.clone(), MarkdownOptions::all()).unwrap());
    let slot = orchestrator.slot();

    let (reload_tx, reload_rx) = reload_channel();
    let fs_actor = FsActor::new(file, reload_tx.clone(), WINDOW).unwrap();
    let (shutdown_tx, shutdown_rx) = channel::unbounded();
    let handle = tokio::spawn(
        Coordinator::new(fs_actor, reload_tx, reload_rx, orchestrator)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    );

    shutdown_tx.send(()).unwrap();
    timeout(Duration::from_secs(3), handle)
        .await
        .expect("actors did not stop after shutdown")
        .unwrap();
    assert_eq!(slot.snapshot().generation, 0);
}
