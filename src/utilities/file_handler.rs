//! Output sink for task artifacts.
//!
//! Writes are whole-file: content goes to a sibling temporary file that is
//! then renamed over the target, so readers never observe a partial artifact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes task outputs to disk, resolving relative paths against an
/// optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FileHandler {
    /// Directory relative output paths are resolved against. `None` means the
    /// process working directory.
    pub base_dir: Option<PathBuf>,
}

impl FileHandler {
    /// Create a new `FileHandler` rooted at `base_dir`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Absolute or base-relative location of `path`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match self.base_dir {
            Some(ref base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Write `content` as UTF-8 to `path`, replacing any prior content.
    ///
    /// Returns the resolved path that was written.
    pub fn save(&self, path: &Path, content: &str, create_directory: bool) -> io::Result<PathBuf> {
        let target = self.resolve(path);
        let file_name = target.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' does not name a file", target.display()),
            )
        })?;

        let parent = target.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = parent {
            if create_directory {
                fs::create_dir_all(dir)?;
            }
        }

        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(".tmp");
        let tmp = target.with_file_name(tmp_name);

        if let Err(e) = fs::write(&tmp, content) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(Some(dir.path().to_path_buf()));

        let written = handler
            .save(Path::new("out/resume.md"), "first", true)
            .unwrap();
        assert_eq!(written, dir.path().join("out/resume.md"));

        handler
            .save(Path::new("out/resume.md"), "second", true)
            .unwrap();
        assert_eq!(fs::read_to_string(&written).unwrap(), "second");

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_save_without_create_directory_fails_on_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(Some(dir.path().to_path_buf()));
        assert!(handler
            .save(Path::new("missing/resume.md"), "x", false)
            .is_err());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_absolute_path_ignores_base_dir() {
        let base = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(Some(base.path().to_path_buf()));
        let target = other.path().join("a.md");
        assert_eq!(handler.resolve(&target), target);
    }
}
