//! Re-render pipeline: read, render, fingerprint, publish.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use super::{Published, RenderSlot, RenderState, Version};
use crate::compiler::markdown::{MarkdownOptions, RenderError, render};
use crate::utils::path::display_name;
use crate::{debug, logger};

/// Why a render could not be produced.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to read `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result of one re-render.
#[derive(Debug)]
pub enum Outcome {
    /// New content installed
    Updated(Version),
    /// Content installed, identical to the previous render
    Unchanged(Version),
    /// A newer render was installed first; this one was dropped
    Stale { generation: u64 },
    /// Read or render failed; the previous state is still served
    Failed(ReloadError),
}

/// Owns the document path and the slot shared with the HTTP front.
pub struct Orchestrator {
    path: PathBuf,
    options: MarkdownOptions,
    slot: Arc<RenderSlot>,
}

impl Orchestrator {
    /// Perform the first render and install it.
    ///
    /// Fails if the document cannot be read or rendered; there is nothing to
    /// serve in that case.
    pub fn initialize(path: PathBuf, options: MarkdownOptions) -> Result<Self, ReloadError> {
        let state = render_file(&path, &options, 0)?;
        debug!("render"; "initial render of {} ({})", path.display(), state.version);
        Ok(Self {
            path,
            options,
            slot: Arc::new(RenderSlot::new(state)),
        })
    }

    /// Slot shared with readers.
    pub fn slot(&self) -> Arc<RenderSlot> {
        Arc::clone(&self.slot)
    }

    /// Re-read and re-render the document, then publish the result.
    ///
    /// On failure the previously published state stays in place.
    pub fn on_file_changed(&self) -> Outcome {
        let generation = self.slot.next_generation();
        let started = Instant::now();

        let outcome = match render_file(&self.path, &self.options, generation) {
            Ok(state) => {
                let version = state.version;
                match self.slot.publish(state) {
                    Published::Updated => Outcome::Updated(version),
                    Published::Unchanged => Outcome::Unchanged(version),
                    Published::Stale { installed } => {
                        let age = self.slot.snapshot().rendered_at.elapsed().unwrap_or_default();
                        debug!("render"; "dropped generation {generation}, {installed} installed {age:?} ago");
                        Outcome::Stale { generation }
                    }
                }
            }
            Err(err) => Outcome::Failed(err),
        };

        debug!("render"; "generation {generation} took {:?}", started.elapsed());
        self.report(&outcome);
        outcome
    }

    fn report(&self, outcome: &Outcome) {
        let name = display_name(&self.path);
        match outcome {
            Outcome::Updated(version) => {
                logger::status_success(&format!("rendered {name} ({version})"));
            }
            Outcome::Unchanged(_) => logger::status_unchanged(&format!("{name} unchanged")),
            Outcome::Stale { .. } => {}
            Outcome::Failed(err) => {
                logger::status_error(&format!("render failed: {name}"), &error_chain(err));
            }
        }
    }
}

/// Read and render `path` into a fresh state for `generation`.
fn render_file(
    path: &Path,
    options: &MarkdownOptions,
    generation: u64,
) -> Result<RenderState, ReloadError> {
    let bytes = fs::read(path).map_err(|err| ReloadError::Read(path.to_path_buf(), err))?;
    let html = render(&bytes, options)?;
    Ok(RenderState::new(html, generation))
}

/// Error message with its sources, one per line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push('\n');
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    fn setup(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_initialize_renders_document() {
        let (_dir, path) = setup("# Hello");
        let orchestrator = Orchestrator::initialize(path, MarkdownOptions::all()).unwrap();

        let state = orchestrator.slot().snapshot();
        assert!(state.html.contains(">Hello</h1>"));
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_initialize_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Orchestrator::initialize(dir.path().join("gone.md"), MarkdownOptions::all());
        assert!(matches!(result, Err(ReloadError::Read(..))));
    }

    #[test]
    fn test_initialize_invalid_utf8_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        let result = Orchestrator::initialize(path, MarkdownOptions::all());
        assert!(matches!(
            result,
            Err(ReloadError::Render(RenderError::Encoding(_)))
        ));
    }

    #[test]
    fn test_hello_then_goodbye() {
        let (_dir, path) = setup("# Hello");
        let orchestrator = Orchestrator::initialize(path.clone(), MarkdownOptions::all()).unwrap();
        let slot = orchestrator.slot();
        let v0 = slot.version();

        fs::write(&path, "# Goodbye").unwrap();
        let outcome = orchestrator.on_file_changed();

        let Outcome::Updated(v1) = outcome else {
            panic!("expected update, got {outcome:?}");
        };
        assert_ne!(v0, v1);
        assert_eq!(slot.version(), v1);

        let html = &slot.snapshot().html;
        assert!(html.contains("Goodbye"));
        assert!(!html.contains("Hello"));
    }

    #[test]
    fn test_same_content_keeps_version() {
        let (_dir, path) = setup("# Same");
        let orchestrator = Orchestrator::initialize(path.clone(), MarkdownOptions::all()).unwrap();
        let v0 = orchestrator.slot().version();

        fs::write(&path, "# Same").unwrap();
        let outcome = orchestrator.on_file_changed();

        assert!(matches!(outcome, Outcome::Unchanged(v) if v == v0));
        assert_eq!(orchestrator.slot().snapshot().generation, 1);
    }

    #[test]
    fn test_failed_rerender_keeps_previous_state() {
        let (_dir, path) = setup("# Kept");
        let orchestrator = Orchestrator::initialize(path.clone(), MarkdownOptions::all()).unwrap();
        let v0 = orchestrator.slot().version();

        fs::write(&path, [b'#', b' ', 0xff]).unwrap();
        assert!(matches!(orchestrator.on_file_changed(), Outcome::Failed(_)));

        fs::remove_file(&path).unwrap();
        assert!(matches!(
            orchestrator.on_file_changed(),
            Outcome::Failed(ReloadError::Read(..))
        ));

        let state = orchestrator.slot().snapshot();
        assert_eq!(state.version, v0);
        assert!(state.html.contains("Kept"));
    }

    #[test]
    fn test_recovers_after_failure() {
        let (_dir, path) = setup("# One");
        let orchestrator = Orchestrator::initialize(path.clone(), MarkdownOptions::all()).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(matches!(orchestrator.on_file_changed(), Outcome::Failed(_)));

        fs::write(&path, "# Two").unwrap();
        assert!(matches!(orchestrator.on_file_changed(), Outcome::Updated(_)));
        assert!(orchestrator.slot().snapshot().html.contains("Two"));
    }

    #[test]
    fn test_concurrent_rerenders_converge() {
        let (_dir, path) = setup("# Stable");
        let orchestrator = Arc::new(
            Orchestrator::initialize(path, MarkdownOptions::all()).unwrap(),
        );
        let v0 = orchestrator.slot().version();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let orchestrator = Arc::clone(&orchestrator);
                thread::spawn(move || {
                    (0..10)
                        .map(|_| orchestrator.on_file_changed())
                        .all(|o| matches!(o, Outcome::Unchanged(_) | Outcome::Stale { .. }))
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let state = orchestrator.slot().snapshot();
        assert_eq!(state.version, v0);
        assert_eq!(state.generation, 40);
    }

    #[test]
    fn test_error_chain_includes_source() {
        let err = ReloadError::Read(
            PathBuf::from("doc.md"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = error_chain(&err);
        assert!(message.contains("doc.md"));
        assert!(message.contains("no such file"));
    }
}
