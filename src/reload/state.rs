//! The published render state and its slot.
//!
//! Readers take one atomic snapshot and never block. Writers are serialized
//! by a write gate and only install a state whose generation is newer than
//! the installed one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::Version;

/// One complete rendering of the document. Immutable once built.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Rendered HTML fragment
    pub html: String,
    /// Fingerprint of `html`
    pub version: Version,
    /// Order in which the render was requested
    pub generation: u64,
    /// When the render finished
    pub rendered_at: SystemTime,
}

impl RenderState {
    pub fn new(html: String, generation: u64) -> Self {
        let version = Version::of(&html);
        Self {
            html,
            version,
            generation,
            rendered_at: SystemTime::now(),
        }
    }
}

/// Result of [`RenderSlot::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    /// Installed with a new version
    Updated,
    /// Installed, version identical to the previous one
    Unchanged,
    /// Discarded: a newer generation is already installed
    Stale { installed: u64 },
}

/// Shared holder of the current [`RenderState`].
pub struct RenderSlot {
    current: ArcSwap<RenderState>,
    write_gate: Mutex<()>,
    next_generation: AtomicU64,
}

impl RenderSlot {
    pub fn new(initial: RenderState) -> Self {
        let next = initial.generation + 1;
        Self {
            current: ArcSwap::from_pointee(initial),
            write_gate: Mutex::new(()),
            next_generation: AtomicU64::new(next),
        }
    }

    /// Consistent view of the installed state.
    #[inline]
    pub fn snapshot(&self) -> Arc<RenderState> {
        self.current.load_full()
    }

    /// Version of the installed state.
    #[inline]
    pub fn version(&self) -> Version {
        self.current.load().version
    }

    /// Reserve the generation number for a render about to start.
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// Install `state` unless a newer generation already won.
    pub fn publish(&self, state: RenderState) -> Published {
        let _gate = self.write_gate.lock();
        let current = self.current.load();

        if state.generation <= current.generation {
            return Published::Stale {
                installed: current.generation,
            };
        }

        let changed = state.version != current.version;
        self.current.store(Arc::new(state));
        if changed {
            Published::Updated
        } else {
            Published::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn slot_with(html: &str) -> RenderSlot {
        RenderSlot::new(RenderState::new(html.to_string(), 0))
    }

    #[test]
    fn test_generations_start_after_initial() {
        let slot = slot_with("<p>a</p>");
        assert_eq!(slot.next_generation(), 1);
        assert_eq!(slot.next_generation(), 2);
    }

    #[test]
    fn test_publish_new_version() {
        let slot = slot_with("<p>a</p>");
        let before = slot.version();

        let generation = slot.next_generation();
        let result = slot.publish(RenderState::new("<p>b</p>".into(), generation));

        assert_eq!(result, Published::Updated);
        assert_ne!(slot.version(), before);
        assert_eq!(slot.snapshot().html, "<p>b</p>");
    }

    #[test]
    fn test_publish_same_content_unchanged_but_advances() {
        let slot = slot_with("<p>a</p>");
        let before = slot.version();

        let generation = slot.next_generation();
        let result = slot.publish(RenderState::new("<p>a</p>".into(), generation));

        assert_eq!(result, Published::Unchanged);
        assert_eq!(slot.version(), before);
        assert_eq!(slot.snapshot().generation, generation);
    }

    #[test]
    fn test_stale_completion_discarded() {
        let slot = slot_with("<p>a</p>");
        let older = slot.next_generation();
        let newer = slot.next_generation();

        assert_eq!(
            slot.publish(RenderState::new("<p>new</p>".into(), newer)),
            Published::Updated
        );
        assert_eq!(
            slot.publish(RenderState::new("<p>old</p>".into(), older)),
            Published::Stale { installed: newer }
        );
        assert_eq!(slot.snapshot().html, "<p>new</p>");
    }

    #[test]
    fn test_snapshot_is_stable_across_publish() {
        let slot = slot_with("<p>a</p>");
        let held = slot.snapshot();

        let generation = slot.next_generation();
        slot.publish(RenderState::new("<p>b</p>".into(), generation));

        assert_eq!(held.html, "<p>a</p>");
        assert_eq!(held.version, Version::of("<p>a</p>"));
    }

    #[test]
    fn test_concurrent_publishers_highest_generation_wins() {
        let slot = Arc::new(slot_with("<p>0</p>"));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for j in 0..50 {
                        let generation = slot.next_generation();
                        slot.publish(RenderState::new(format!("<p>{i}-{j}</p>"), generation));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 400 generations were handed out after the initial one
        assert_eq!(slot.snapshot().generation, 400);
        let state = slot.snapshot();
        assert_eq!(state.version, Version::of(&state.html));
    }
}
