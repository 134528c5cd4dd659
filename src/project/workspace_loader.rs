//! Workspace loading: collect source files under a directory, parse them in
//! parallel and index them into an [`AnalysisHost`](crate::ide::AnalysisHost).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ide::AnalysisHost;
use crate::syntax::LuaSyntaxTree;

use super::LoadError;

/// Loads workspace files from disk into an [`AnalysisHost`].
///
/// Files are read and parsed in parallel, then indexed serially under a
/// single write section of the host.
#[derive(Clone, Debug)]
pub struct WorkspaceLoader {
    extensions: Vec<String>,
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self {
            extensions: vec!["lua".to_string()],
        }
    }

    /// Only files with one of these extensions are loaded
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Every matching file under `dir`, sorted
    pub fn collect_file_paths(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_path_buf()));
        }
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load every matching file under `dir`. Unreadable files are skipped
    /// with a warning; returns the number of documents loaded.
    pub fn load_directory_into_host(
        &self,
        dir: impl AsRef<Path>,
        host: &AnalysisHost,
    ) -> Result<usize, LoadError> {
        let dir = dir.as_ref();
        let paths = self.collect_file_paths(dir)?;

        let parsed: Vec<(PathBuf, Arc<str>, LuaSyntaxTree)> = paths
            .par_iter()
            .filter_map(|path| match std::fs::read_to_string(path) {
                Ok(text) => {
                    let tree = LuaSyntaxTree::parse(&text);
                    Some((path.clone(), Arc::from(text), tree))
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable file");
                    None
                }
            })
            .collect();

        let loaded = parsed.len();
        host.apply(|compilation| {
            for (path, text, tree) in parsed {
                compilation.update_parsed(path, text, tree);
            }
        });
        debug!(root = %dir.display(), loaded, skipped = paths.len() - loaded, "loaded workspace");
        Ok(loaded)
    }

    /// Load a single file
    pub fn load_file_into_host(
        &self,
        path: impl Into<PathBuf>,
        host: &AnalysisHost,
    ) -> Result<(), LoadError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        host.update_document(path, &text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_an_error() {
        let loader = WorkspaceLoader::new();
        let host = AnalysisHost::default();
        let result = loader.load_directory_into_host("/definitely/not/here", &host);
        assert!(matches!(result, Err(LoadError::NotADirectory(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let loader = WorkspaceLoader::new();
        let host = AnalysisHost::default();
        let result = loader.load_file_into_host("/definitely/not/here.lua", &host);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_extension_filter() {
        let loader = WorkspaceLoader::with_extensions(["lua", "luau"]);
        assert!(loader.accepts(Path::new("a/b.luau")));
        assert!(!loader.accepts(Path::new("a/b.txt")));
        assert!(!loader.accepts(Path::new("a/lua")));
    }
}
