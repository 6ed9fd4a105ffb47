use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;
use rustc_hash::FxHashMap;

use super::types::ChangeKind;

/// Sleep used when nothing is pending.
const IDLE: Duration = Duration::from_secs(86400);

/// Pure debouncer: only handles timing and event deduplication.
/// No business logic, no global state access.
pub(super) struct Debouncer {
    /// Quiet time required after the last event
    pub(super) window: Duration,
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            changes: FxHashMap::default(),
            last_event: None,
        }
    }

    /// Add a notify event for the paths `accept` lets through, applying dedup rules:
    /// - Remove + Create/Modify → Create/Modify (file was restored)
    /// - Modify + Remove → Remove (file was deleted)
    /// - Create + Remove → nothing (appeared then vanished)
    /// - otherwise: first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event, accept: impl Fn(&Path) -> bool) {
        for (index, path) in event.paths.iter().enumerate() {
            let Some(kind) = change_kind(&event.kind, index) else {
                continue;
            };
            if !accept(path) {
                continue;
            }

            crate::debug!("watch"; "raw notify: {:?} {}", event.kind, path.display());

            if let Some(&existing) = self.changes.get(path) {
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        crate::debug!("watch"; "restore {}->{}: {}", existing.label(), kind.label(), path.display());
                        self.changes.insert(path.clone(), kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                        self.changes.insert(path.clone(), ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        crate::debug!("watch"; "discard created+removed: {}", path.display());
                        self.changes.remove(path);
                    }
                    _ => continue,
                }
                self.last_event = Some(Instant::now());
                continue;
            }

            self.changes.insert(path.clone(), kind);
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the pending changes once the window has passed quietly.
    /// A window whose events cancelled out is closed without a batch.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        let last_event = self.last_event?;
        if last_event.elapsed() < self.window {
            return None;
        }

        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);
        (!changes.is_empty()).then_some(changes)
    }

    #[cfg(test)]
    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= self.window && !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return IDLE;
        };

        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Classify the `index`-th path of an event. Access and metadata-only
/// events are ignored.
fn change_kind(kind: &EventKind, index: usize) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(ModifyKind::Name(mode)) => Some(match (mode, index) {
            (RenameMode::From, _) | (RenameMode::Both, 0) => ChangeKind::Removed,
            (RenameMode::To, _) | (RenameMode::Both, _) => ChangeKind::Created,
            // Platforms that do not tell the direction
            _ => ChangeKind::Modified,
        }),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        _ => None,
    }
}
