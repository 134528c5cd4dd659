//! Module path trie for `require` resolution.
//!
//! Module names are split at `.` and `/` into segments; each trie node may
//! carry the document that provides the module ending there.

use std::path::{Component, Path};

use rustc_hash::FxHashMap;

use crate::base::DocumentId;

#[derive(Clone, Debug, Default)]
struct ModuleNode {
    children: FxHashMap<String, ModuleNode>,
    document: Option<DocumentId>,
}

#[derive(Clone, Debug, Default)]
pub struct ModuleIndex {
    root: ModuleNode,
    /// Module name registered per document, for removal
    names: FxHashMap<DocumentId, String>,
}

fn segments(module: &str) -> impl Iterator<Item = &str> {
    module.split(['.', '/']).filter(|s| !s.is_empty())
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` as the provider of `module`, replacing any module
    /// it provided before.
    pub fn insert(&mut self, module: &str, document: DocumentId) {
        self.remove_document(document);
        let mut node = &mut self.root;
        for segment in segments(module) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.document = Some(document);
        self.names.insert(document, module.to_string());
    }

    pub fn find(&self, module: &str) -> Option<DocumentId> {
        let mut node = &self.root;
        for segment in segments(module) {
            node = node.children.get(segment)?;
        }
        node.document
    }

    pub fn module_of(&self, document: DocumentId) -> Option<&str> {
        self.names.get(&document).map(String::as_str)
    }

    /// Names of the modules directly below `prefix`
    pub fn children(&self, prefix: &str) -> Vec<String> {
        let mut node = &self.root;
        for segment in segments(prefix) {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut names: Vec<String> = node.children.keys().cloned().collect();
        names.sort();
        names
    }

    /// Forget the module `document` provides, pruning empty trie nodes
    pub fn remove_document(&mut self, document: DocumentId) {
        let Some(module) = self.names.remove(&document) else {
            return;
        };
        let path: Vec<&str> = segments(&module).collect();
        Self::remove_path(&mut self.root, &path, document);
    }

    /// Returns whether `node` became empty
    fn remove_path(node: &mut ModuleNode, path: &[&str], document: DocumentId) -> bool {
        match path.split_first() {
            None => {
                if node.document == Some(document) {
                    node.document = None;
                }
            }
            Some((first, rest)) => {
                let prune = node
                    .children
                    .get_mut(*first)
                    .is_some_and(|child| Self::remove_path(child, rest, document));
                if prune {
                    node.children.remove(*first);
                }
            }
        }
        node.children.is_empty() && node.document.is_none()
    }
}

/// Module name of `path` under one of `roots`, given `?`-patterns such as
/// `?.lua` and `?/init.lua`. The first root containing the path and the first
/// matching pattern win.
pub fn module_name(path: &Path, roots: &[impl AsRef<Path>], patterns: &[String]) -> Option<String> {
    let relative = roots
        .iter()
        .find_map(|root| path.strip_prefix(root.as_ref()).ok())
        .unwrap_or(path);
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => continue,
        }
    }
    let relative = parts.join("/");
    patterns.iter().find_map(|pattern| {
        let (head, tail) = pattern.split_once('?')?;
        let stem = relative.strip_prefix(head)?.strip_suffix(tail)?;
        (!stem.is_empty()).then(|| stem.replace('/', "."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn patterns() -> Vec<String> {
        vec!["?.lua".to_string(), "?/init.lua".to_string()]
    }

    #[test]
    fn test_insert_and_find() {
        let mut index = ModuleIndex::new();
        index.insert("a.b", DocumentId::new(1));
        assert_eq!(index.find("a.b"), Some(DocumentId::new(1)));
        assert_eq!(index.find("a/b"), Some(DocumentId::new(1)));
        assert_eq!(index.find("a"), None);
        assert_eq!(index.children("a"), vec!["b".to_string()]);
    }

    #[test]
    fn test_remove_prunes_nodes() {
        let mut index = ModuleIndex::new();
        index.insert("a.b.c", DocumentId::new(1));
        index.insert("a.d", DocumentId::new(2));
        index.remove_document(DocumentId::new(1));
        assert_eq!(index.find("a.b.c"), None);
        assert_eq!(index.children("a"), vec!["d".to_string()]);
        assert_eq!(index.find("a.d"), Some(DocumentId::new(2)));
    }

    #[test]
    fn test_module_name_patterns() {
        let roots = vec![PathBuf::from("/ws")];
        assert_eq!(
            module_name(Path::new("/ws/net/http.lua"), &roots, &patterns()),
            Some("net.http".to_string())
        );
        assert_eq!(
            module_name(Path::new("/ws/net/init.lua"), &roots, &patterns()),
            Some("net.init".to_string())
        );
        let init_first = vec!["?/init.lua".to_string(), "?.lua".to_string()];
        assert_eq!(
            module_name(Path::new("/ws/net/init.lua"), &roots, &init_first),
            Some("net".to_string())
        );
        assert_eq!(module_name(Path::new("/ws/readme.md"), &roots, &patterns()), None);
    }
}
