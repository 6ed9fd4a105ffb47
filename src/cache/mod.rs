//! Per-user cache directory holding the page shell.
//!
//! The shell template is written to `<cache dir>/mdserve/index.html` at every
//! startup and read back from there, so the file on disk always matches the
//! running version.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::StartupError;
use crate::embed::Template;
use crate::embed::serve::{PAGE_HTML, PageVars};
use crate::log;

/// Directory name inside the user cache dir
pub const APP_DIR: &str = "mdserve";

/// Page shell file name
pub const SHELL_FILE: &str = "index.html";

/// Page shell as loaded for serving.
pub type Shell = Template<PageVars<'static>>;

/// Location of mdserve's cache files.
#[derive(Debug, Clone)]
pub struct ShellCache {
    dir: PathBuf,
}

impl ShellCache {
    /// The cache under the platform's user cache directory.
    pub fn locate() -> Result<Self, StartupError> {
        dirs::cache_dir()
            .map(|base| Self::in_dir(&base))
            .ok_or(StartupError::NoCacheDir)
    }

    /// The cache under an explicit base directory.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            dir: base.join(APP_DIR),
        }
    }

    pub fn shell_path(&self) -> PathBuf {
        self.dir.join(SHELL_FILE)
    }

    /// Create the directory and (over)write the shell template.
    pub fn init(&self) -> Result<PathBuf, StartupError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| StartupError::CacheDir(self.dir.clone(), err))?;

        let path = self.shell_path();
        fs::write(&path, PAGE_HTML.content())
            .map_err(|err| StartupError::CacheDir(path.clone(), err))?;
        Ok(path)
    }

    /// Read the shell back, falling back to the embedded one.
    pub fn load_shell(&self) -> Shell {
        let path = self.shell_path();
        match fs::read_to_string(&path) {
            Ok(content) => Template::from_string(content),
            Err(err) => {
                log!("warning"; "can't read {}: {}, using built-in page", path.display(), err);
                PAGE_HTML
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_shell() {
        let base = TempDir::new().unwrap();
        let cache = ShellCache::in_dir(base.path());

        let path = cache.init().unwrap();
        assert_eq!(path, base.path().join("mdserve").join("index.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), PAGE_HTML.content());
    }

    #[test]
    fn test_init_overwrites_stale_shell() {
        let base = TempDir::new().unwrap();
        let cache = ShellCache::in_dir(base.path());
        fs::create_dir_all(base.path().join("mdserve")).unwrap();
        fs::write(cache.shell_path(), "old shell").unwrap();

        cache.init().unwrap();
        assert_eq!(cache.load_shell().content(), PAGE_HTML.content());
    }

    #[test]
    fn test_load_shell_falls_back() {
        let base = TempDir::new().unwrap();
        let cache = ShellCache::in_dir(&base.path().join("missing"));
        assert_eq!(cache.load_shell().content(), PAGE_HTML.content());
    }

    #[test]
    fn test_init_unwritable_is_cache_error() {
        let base = TempDir::new().unwrap();
        // A file where the directory should be
        let blocker = base.path().join("blocked");
        fs::write(&blocker, "").unwrap();

        let err = ShellCache::in_dir(&blocker).init().unwrap_err();
        assert!(matches!(err, StartupError::CacheDir(..)));
    }
}
