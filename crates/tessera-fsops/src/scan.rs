//! Directory scanning backed by `walkdir`.

use std::path::{Component, Path, PathBuf};

use tessera_config::FilterSet;
use tracing::debug;
use walkdir::WalkDir;

use crate::FileEnumerator;
use crate::error::{FsOpsError, FsOpsResult};
use crate::rules::{RuleDecision, RuleSet};

/// Stateless enumerator matching directory-relative paths against Ant-style globs.
///
/// Symlinks are followed; only regular files are returned, ordered by their
/// path relative to the filter directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobEnumerator;

impl GlobEnumerator {
    /// Create an enumerator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileEnumerator for GlobEnumerator {
    fn enumerate(&self, filter_set: &FilterSet) -> FsOpsResult<Vec<PathBuf>> {
        let root = filter_set.directory.as_path();
        if !root.is_dir() {
            return Err(FsOpsError::DirectoryMissing {
                path: root.to_path_buf(),
            });
        }

        let rules = RuleSet::from_filter_set(filter_set)?;
        let mut selected = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|source| FsOpsError::walkdir(root, source))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = relative_key(entry.path(), root) else {
                continue;
            };
            if rules.evaluate(&relative) == RuleDecision::Include {
                selected.push((relative, entry.into_path()));
            }
        }

        selected.sort_by(|(a, _), (b, _)| a.cmp(b));
        debug!(
            directory = %root.display(),
            files = selected.len(),
            "enumerated filter files"
        );
        Ok(selected.into_iter().map(|(_, path)| path).collect())
    }
}

/// `/`-joined path of `path` below `root`.
fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_key_uses_forward_slashes() {
        let root = Path::new("filters");
        assert_eq!(
            relative_key(&root.join("nested").join("en.properties"), root),
            Some("nested/en.properties".to_string())
        );
        assert_eq!(relative_key(root, root), None);
        assert_eq!(relative_key(Path::new("elsewhere/x"), root), None);
    }
}
