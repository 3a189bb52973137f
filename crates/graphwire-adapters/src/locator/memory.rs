//! In-memory locator for testing.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::{Arc, RwLock},
};

use graphwire_core::{
    application::{ApplicationError, ports::ResourceLocator},
    error::{GraphError, GraphResult},
};

use tracing::warn;

use super::local_resource;

/// In-memory file tree for testing.
///
/// Paths are absolute and normalized lexically (`.` and `..` are folded), so
/// `/conf/a/../b.json` and `/conf/b.json` are the same file. Relative
/// resources without a current directory resolve against `/`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocator {
    inner: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryLocator {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryLocator::insert`].
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file. A lock poisoned by a panicking writer is
    /// cleared; the map itself is always left consistent by `insert`.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = normalize(Path::new("/"), path.as_ref());
        let mut files = match self.inner.write() {
            Ok(files) => files,
            Err(poisoned) => {
                warn!(path = %path.display(), "Memory locator lock was poisoned, recovering");
                self.inner.clear_poison();
                poisoned.into_inner()
            }
        };
        files.insert(path, content.into());
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ResourceLocator for MemoryLocator {
    fn locate(&self, resource: &str, current_dir: Option<&Path>) -> GraphResult<PathBuf> {
        let base = current_dir.unwrap_or(Path::new("/"));
        let path = normalize(base, Path::new(local_resource(resource)?));

        let files = self.inner.read().map_err(|_| lock_error())?;
        if files.contains_key(&path) {
            Ok(path)
        } else {
            Err(ApplicationError::ResourceNotFound {
                resource: resource.to_string(),
                searched: path.display().to_string(),
            }
            .into())
        }
    }

    fn read(&self, path: &Path) -> GraphResult<String> {
        let files = self.inner.read().map_err(|_| lock_error())?;
        files.get(path).cloned().ok_or_else(|| {
            ApplicationError::Unreadable {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }
            .into()
        })
    }
}

fn lock_error() -> GraphError {
    GraphError::Internal {
        message: "memory locator lock poisoned".into(),
    }
}

/// Join `path` onto `base` and fold `.` and `..` without touching a disk.
fn normalize(base: &Path, path: &Path) -> PathBuf {
    let mut out = PathBuf::from("/");
    for component in base.join(path).components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwire_core::domain::ErrorKind;

    #[test]
    fn relative_resources_normalize() {
        let locator = MemoryLocator::new()
            .with_file("/conf/services.json", "{}")
            .with_file("conf/packages/bus.json", "");

        assert_eq!(
            locator
                .locate("../services.json", Some(Path::new("/conf/packages")))
                .unwrap(),
            PathBuf::from("/conf/services.json")
        );
        assert_eq!(
            locator.locate("conf/./packages/bus.json", None).unwrap(),
            PathBuf::from("/conf/packages/bus.json")
        );
        assert_eq!(locator.list_files().len(), 2);
    }

    #[test]
    fn read_returns_content() {
        let locator = MemoryLocator::new().with_file("/a.json", r#"{"services": {}}"#);
        let path = locator.locate("a.json", None).unwrap();
        assert_eq!(locator.read(&path).unwrap(), r#"{"services": {}}"#);
    }

    #[test]
    fn missing_and_remote_resources_are_import_errors() {
        let locator = MemoryLocator::new();
        assert_eq!(
            locator.locate("a.json", None).unwrap_err().kind(),
            ErrorKind::Import
        );
        assert_eq!(
            locator.locate("ftp://x/a.json", None).unwrap_err().kind(),
            ErrorKind::Import
        );
        assert_eq!(
            locator.read(Path::new("/a.json")).unwrap_err().kind(),
            ErrorKind::Import
        );
    }

    #[test]
    fn clones_share_files() {
        let locator = MemoryLocator::new();
        let handle = locator.clone();
        handle.insert("/late.json", "{}");
        assert!(locator.locate("/late.json", None).is_ok());
    }

    #[test]
    fn insert_recovers_from_poisoned_lock() {
        let locator = MemoryLocator::new().with_file("/a.json", "{}");
        let handle = locator.clone();
        let _ = std::thread::spawn(move || {
            let _guard = handle.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(locator.inner.is_poisoned());

        locator.insert("/b.json", "{}");
        assert!(!locator.inner.is_poisoned());
        assert!(locator.locate("/a.json", None).is_ok());
        assert!(locator.locate("/b.json", None).is_ok());
    }
}
