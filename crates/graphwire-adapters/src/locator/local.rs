//! Local filesystem locator using std::fs.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use graphwire_core::{
    application::{ApplicationError, ports::ResourceLocator},
    error::{GraphError, GraphResult},
};

use super::local_resource;

/// Production locator reading from the local filesystem.
///
/// A relative resource is tried against the importing document's directory
/// (the working directory for entry documents) first, then against each
/// search path in order. Located paths are canonicalized.
#[derive(Debug, Clone, Default)]
pub struct LocalFileLocator {
    search_paths: Vec<PathBuf>,
}

impl LocalFileLocator {
    /// Create a locator with no extra search paths.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn candidates(&self, resource: &Path, current_dir: Option<&Path>) -> Vec<PathBuf> {
        if resource.is_absolute() {
            return vec![resource.to_path_buf()];
        }

        let mut candidates = Vec::with_capacity(self.search_paths.len() + 1);
        match current_dir {
            Some(dir) => candidates.push(dir.join(resource)),
            None => candidates.push(resource.to_path_buf()),
        }
        candidates.extend(self.search_paths.iter().map(|root| root.join(resource)));
        candidates
    }
}

impl ResourceLocator for LocalFileLocator {
    fn locate(&self, resource: &str, current_dir: Option<&Path>) -> GraphResult<PathBuf> {
        let local = Path::new(local_resource(resource)?);
        let candidates = self.candidates(local, current_dir);

        for candidate in &candidates {
            if candidate.is_file() {
                let canonical = candidate
                    .canonicalize()
                    .map_err(|e| map_io_error(candidate, e, "resolve"))?;
                debug!(resource = %resource, path = %canonical.display(), "Located");
                return Ok(canonical);
            }
        }

        Err(ApplicationError::ResourceNotFound {
            resource: resource.to_string(),
            searched: candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
        .into())
    }

    fn read(&self, path: &Path) -> GraphResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GraphError {
    ApplicationError::Unreadable {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwire_core::domain::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("conf/packages")).unwrap();
        fs::create_dir_all(dir.path().join("shared")).unwrap();
        fs::write(dir.path().join("conf/services.json"), "{}").unwrap();
        fs::write(dir.path().join("conf/packages/bus.json"), r#"{"services": {}}"#).unwrap();
        fs::write(dir.path().join("shared/common.json"), "").unwrap();
        dir
    }

    #[test]
    fn relative_to_current_dir() {
        let dir = tree();
        let locator = LocalFileLocator::new();
        let conf = dir.path().join("conf");

        let path = locator.locate("packages/bus.json", Some(&conf)).unwrap();
        assert_eq!(path, conf.join("packages/bus.json").canonicalize().unwrap());
        assert_eq!(locator.read(&path).unwrap(), r#"{"services": {}}"#);
    }

    #[test]
    fn parent_segments_canonicalize_to_one_path() {
        let dir = tree();
        let locator = LocalFileLocator::new();
        let packages = dir.path().join("conf/packages");

        let via_parent = locator.locate("../services.json", Some(&packages)).unwrap();
        let direct = locator
            .locate("services.json", Some(&dir.path().join("conf")))
            .unwrap();
        assert_eq!(via_parent, direct);
    }

    #[test]
    fn search_paths_are_tried_in_order() {
        let dir = tree();
        let locator = LocalFileLocator::with_search_paths([dir.path().join("shared")]);
        let conf = dir.path().join("conf");

        let path = locator.locate("common.json", Some(&conf)).unwrap();
        assert!(path.ends_with("shared/common.json"));
        assert_eq!(locator.search_paths().len(), 1);
    }

    #[test]
    fn absolute_paths_ignore_current_dir() {
        let dir = tree();
        let absolute = dir.path().join("conf/services.json");
        let path = LocalFileLocator::new()
            .locate(absolute.to_str().unwrap(), Some(Path::new("/nowhere")))
            .unwrap();
        assert_eq!(path, absolute.canonicalize().unwrap());
    }

    #[test]
    fn missing_file_lists_candidates() {
        let dir = tree();
        let locator = LocalFileLocator::with_search_paths([dir.path().join("shared")]);
        let err = locator
            .locate("ghost.json", Some(&dir.path().join("conf")))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Import);
        let message = err.to_string();
        assert!(message.contains("ghost.json"));
        assert!(message.contains("shared"));
    }

    #[test]
    fn directories_are_not_resources() {
        let dir = tree();
        let err = LocalFileLocator::new()
            .locate("packages", Some(&dir.path().join("conf")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Import);
    }

    #[test]
    fn remote_resources_are_rejected() {
        let err = LocalFileLocator::new()
            .locate("https://example.com/services.json", None)
            .unwrap_err();
        assert!(err.to_string().contains("not a local file"));
    }

    #[test]
    fn unreadable_path_is_import_error() {
        let err = LocalFileLocator::new()
            .read(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Import);
    }
}
