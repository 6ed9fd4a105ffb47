use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{RecursiveMode, Watcher};

/// Path-addressed watch on a single file.
///
/// The parent directory is watched (non-recursive) and events are filtered
/// by file name, so replacing the file by rename or delete+recreate keeps
/// working. The directory watch is re-armed after every batch and attached
/// again if the directory itself was recreated.
pub(super) struct WatchTarget {
    file: PathBuf,
    dir: PathBuf,
    name: OsString,
    attached: bool,
}

impl WatchTarget {
    pub(super) fn new(file: PathBuf) -> Self {
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let name = file.file_name().map(OsString::from).unwrap_or_default();
        Self {
            file,
            dir,
            name,
            attached: false,
        }
    }

    pub(super) fn file(&self) -> &Path {
        &self.file
    }

    pub(super) fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether an event path refers to the watched file.
    pub(super) fn matches(&self, path: &Path) -> bool {
        path.file_name() == Some(self.name.as_os_str())
    }

    /// Initial attach; errors go to the caller.
    pub(super) fn attach<W: Watcher>(&mut self, watcher: &mut W) -> notify::Result<()> {
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;
        self.attached = true;
        Ok(())
    }

    /// Re-arm the directory watch.
    ///
    /// Returns `true` when a lost watch was attached again.
    pub(super) fn maintain<W: Watcher>(&mut self, watcher: &mut W) -> bool {
        if !self.dir.is_dir() {
            if self.attached {
                crate::log!("watch"; "{} disappeared, waiting for it", self.dir.display());
                let _ = watcher.unwatch(&self.dir);
                self.attached = false;
            }
            return false;
        }

        match watcher.watch(&self.dir, RecursiveMode::NonRecursive) {
            Ok(()) if !self.attached => {
                self.attached = true;
                crate::debug!("watch"; "re-attached watch: {}", self.dir.display());
                true
            }
            Ok(()) => false,
            Err(e) => {
                crate::debug!("watch"; "re-arm {}: {}", self.dir.display(), e);
                false
            }
        }
    }
}
