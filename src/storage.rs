//! Storage root resolution
//!
//! Decides where persistent data lives. First match wins:
//! explicit user path, then the executable directory when it carries a
//! `portable.txt` marker, then the per-user data directory joined with
//! the application name.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::constants::storage::{APP_DIR, PORTABLE_MARKER};

/// Which rule produced the storage root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    UserOverride,
    Portable,
    Installed,
}

#[derive(Debug, Clone)]
pub struct StorageRootResolver {
    executable_dir: PathBuf,
    user_dir: PathBuf,
    force_portable: bool,
}

impl StorageRootResolver {
    pub fn new(executable_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable_dir: executable_dir.into(),
            user_dir: user_dir.into(),
            force_portable: false,
        }
    }

    /// Resolver for the running process: directory of the current executable
    /// and the platform data directory (home as a fallback).
    pub fn from_env() -> Self {
        let executable_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| {
                warn!("Cannot determine executable directory, using current directory");
                PathBuf::from(".")
            });

        let user_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| {
                warn!("Cannot determine user directory, using current directory");
                PathBuf::from(".")
            });

        Self::new(executable_dir, user_dir)
    }

    /// Treat the executable directory as portable even without the marker file
    pub fn force_portable(mut self, force: bool) -> Self {
        self.force_portable = force;
        self
    }

    pub fn is_portable(&self) -> bool {
        self.force_portable || self.executable_dir.join(PORTABLE_MARKER).exists()
    }

    #[cfg(test)]
    pub fn resolve(&self, user_path: Option<&Path>) -> PathBuf {
        self.resolve_with_mode(user_path).0
    }

    pub fn resolve_with_mode(&self, user_path: Option<&Path>) -> (PathBuf, StorageMode) {
        let (chosen, mode) = match user_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => (path.to_path_buf(), StorageMode::UserOverride),
            None if self.is_portable() => (self.executable_dir.clone(), StorageMode::Portable),
            None => (self.user_dir.join(APP_DIR), StorageMode::Installed),
        };
        debug!(path = %chosen.display(), mode = ?mode, "Storage root candidate");
        (absolutize(&chosen), mode)
    }
}

/// Make `path` absolute against the working directory without rewriting its segments
fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "Failed to absolutize storage root");
        path.to_path_buf()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let exe_dir = tmp.path().join("bin");
        let home = tmp.path().join("home");
        fs::create_dir_all(&exe_dir).unwrap();
        fs::create_dir_all(&home).unwrap();
        (tmp, exe_dir, home)
    }

    #[test]
    fn test_installed_mode_without_marker() {
        let (_tmp, exe_dir, home) = fixture();
        let resolver = StorageRootResolver::new(&exe_dir, &home);

        let (root, mode) = resolver.resolve_with_mode(None);
        assert_eq!(mode, StorageMode::Installed);
        assert_eq!(root, home.join("Xenia"));
        assert!(root.is_absolute());
    }

    #[test]
    fn test_portable_mode_with_marker() {
        let (_tmp, exe_dir, home) = fixture();
        fs::write(exe_dir.join("portable.txt"), b"").unwrap();
        let resolver = StorageRootResolver::new(&exe_dir, &home);

        let (root, mode) = resolver.resolve_with_mode(None);
        assert_eq!(mode, StorageMode::Portable);
        assert_eq!(root, exe_dir);
    }

    #[test]
    fn test_marker_content_is_irrelevant() {
        let (_tmp, exe_dir, home) = fixture();
        fs::write(exe_dir.join("portable.txt"), b"anything at all").unwrap();
        let resolver = StorageRootResolver::new(&exe_dir, &home);

        assert_eq!(resolver.resolve(None), exe_dir);
    }

    #[test]
    fn test_force_portable_without_marker() {
        let (_tmp, exe_dir, home) = fixture();
        let resolver = StorageRootResolver::new(&exe_dir, &home).force_portable(true);

        assert_eq!(resolver.resolve_with_mode(None), (exe_dir, StorageMode::Portable));
    }

    #[test]
    fn test_user_path_wins_over_marker() {
        let (_tmp, exe_dir, home) = fixture();
        let resolver = StorageRootResolver::new(&exe_dir, &home);
        let custom = Path::new("/custom/path");

        assert_eq!(resolver.resolve(Some(custom)), PathBuf::from("/custom/path"));

        fs::write(exe_dir.join("portable.txt"), b"").unwrap();
        let (root, mode) = resolver.resolve_with_mode(Some(custom));
        assert_eq!(root, PathBuf::from("/custom/path"));
        assert_eq!(mode, StorageMode::UserOverride);
    }

    #[test]
    fn test_relative_user_path_is_absolutized_verbatim() {
        let (_tmp, exe_dir, home) = fixture();
        let resolver = StorageRootResolver::new(&exe_dir, &home);

        let root = resolver.resolve(Some(Path::new("data/../root")));
        let cwd = std::env::current_dir().unwrap();
        assert!(root.is_absolute());
        // Segments are kept as given, including `..`
        assert_eq!(root, cwd.join("data/../root"));
    }

    #[test]
    fn test_empty_user_path_treated_as_absent() {
        let (_tmp, exe_dir, home) = fixture();
        let resolver = StorageRootResolver::new(&exe_dir, &home);

        let (root, mode) = resolver.resolve_with_mode(Some(Path::new("")));
        assert_eq!(mode, StorageMode::Installed);
        assert_eq!(root, home.join("Xenia"));
    }

    #[test]
    fn test_relative_user_dir_still_absolute() {
        let resolver = StorageRootResolver::new("missing-bin", "relative-home");
        let root = resolver.resolve(None);
        assert!(root.is_absolute());
        assert!(root.ends_with("relative-home/Xenia"));
    }
}
