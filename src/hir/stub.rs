//! The Stub: workspace-wide multi-indices with per-document removal.
//!
//! Every entry remembers the document that contributed it. When a document
//! changes, its entries are dropped from every index and the freshly indexed
//! document appends new ones; nothing else is rescanned.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::trace;

use crate::base::DocumentId;
use crate::syntax::ElementId;

use super::declaration::DeclId;
use super::types::{LuaMethod, LuaType};

/// How many entries a lookup yields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match {
    /// At most one entry, the earliest inserted
    First,
    All,
}

/// Multi-map from `K` to `V` where each value is tagged with its document.
#[derive(Clone, Debug)]
pub struct StubIndex<K, V> {
    entries: FxHashMap<K, Vec<(DocumentId, V)>>,
    keys_by_document: FxHashMap<DocumentId, FxHashSet<K>>,
}

impl<K, V> Default for StubIndex<K, V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            keys_by_document: FxHashMap::default(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> StubIndex<K, V> {
    pub fn add(&mut self, document: DocumentId, key: K, value: V) {
        self.keys_by_document.entry(document).or_default().insert(key.clone());
        self.entries.entry(key).or_default().push((document, value));
    }

    /// Values under `key` in insertion order
    pub fn get<Q>(&self, key: &Q, mode: Match) -> impl Iterator<Item = &V> + '_
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_with_document(key, mode).map(|(_, value)| value)
    }

    pub fn get_with_document<Q>(
        &self,
        key: &Q,
        mode: Match,
    ) -> impl Iterator<Item = (DocumentId, &V)> + '_
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let limit = match mode {
            Match::First => 1,
            Match::All => usize::MAX,
        };
        self.entries
            .get(key)
            .into_iter()
            .flatten()
            .map(|(document, value)| (*document, value))
            .take(limit)
    }

    pub fn first<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key, Match::First).next()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Every entry as `(key, document, value)`, in no particular key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, DocumentId, &V)> + '_ {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |(doc, value)| (key, *doc, value)))
    }

    /// Number of entries across all keys
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry contributed by `document`
    pub fn remove_document(&mut self, document: DocumentId) -> usize {
        let Some(keys) = self.keys_by_document.remove(&document) else {
            return 0;
        };
        let mut removed = 0;
        for key in keys {
            if let Some(values) = self.entries.get_mut(&key) {
                let before = values.len();
                values.retain(|(doc, _)| *doc != document);
                removed += before - values.len();
                if values.is_empty() {
                    self.entries.remove(&key);
                }
            }
        }
        removed
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// The thing members hang off
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberOwner {
    /// A named class, interface or enum
    Type(SmolStr),
    /// A table constructor or doc table type
    Element(ElementId),
    /// A global table assigned without a local binding
    Global(SmolStr),
}

impl fmt::Display for MemberOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberOwner::Type(name) => write!(f, "type {name}"),
            MemberOwner::Element(id) => write!(f, "table {id}"),
            MemberOwner::Global(name) => write!(f, "global {name}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedTypeKind {
    Class,
    Interface,
    Alias,
    Enum,
}

impl NamedTypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NamedTypeKind::Class => "class",
            NamedTypeKind::Interface => "interface",
            NamedTypeKind::Alias => "alias",
            NamedTypeKind::Enum => "enum",
        }
    }
}

/// A `---@class`, `---@interface`, `---@alias` or `---@enum` definition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedTypeDef {
    pub name: SmolStr,
    pub kind: NamedTypeKind,
    pub decl: DeclId,
    pub generics: Vec<SmolStr>,
    /// Target of an alias
    pub target: Option<LuaType>,
}

/// A `---@operator add(Vec): Vec` overload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeOperator {
    pub op: SmolStr,
    pub operand: Option<LuaType>,
    pub result: LuaType,
}

// ============================================================================
// Stub
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct Stub {
    pub members: StubIndex<MemberOwner, DeclId>,
    pub named_types: StubIndex<SmolStr, NamedTypeDef>,
    pub globals: StubIndex<SmolStr, DeclId>,
    pub type_operators: StubIndex<SmolStr, TypeOperator>,
    pub supers: StubIndex<SmolStr, LuaType>,
    pub generic_params: StubIndex<SmolStr, DeclId>,
    pub methods: StubIndex<ElementId, Arc<LuaMethod>>,
    pub main_block_returns: StubIndex<DocumentId, Vec<ElementId>>,
    pub type_from_id: StubIndex<ElementId, SmolStr>,
    pub global_owners: StubIndex<MemberOwner, SmolStr>,
    pub names: StubIndex<SmolStr, ElementId>,
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything `document` contributed, from every index
    pub fn remove_document(&mut self, document: DocumentId) {
        let removed = self.members.remove_document(document)
            + self.named_types.remove_document(document)
            + self.globals.remove_document(document)
            + self.type_operators.remove_document(document)
            + self.supers.remove_document(document)
            + self.generic_params.remove_document(document)
            + self.methods.remove_document(document)
            + self.main_block_returns.remove_document(document)
            + self.type_from_id.remove_document(document)
            + self.global_owners.remove_document(document)
            + self.names.remove_document(document);
        trace!(%document, removed, "removed stub entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(n: u32) -> DocumentId {
        DocumentId::new(n)
    }

    #[test]
    fn test_get_preserves_insertion_order() {
        let mut index: StubIndex<SmolStr, u32> = StubIndex::default();
        index.add(doc(0), "a".into(), 1);
        index.add(doc(1), "a".into(), 2);
        index.add(doc(0), "a".into(), 3);
        assert_eq!(index.get("a", Match::All).copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(index.get("a", Match::First).copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(index.get("missing", Match::All).count(), 0);
    }

    #[test]
    fn test_remove_document_only_touches_its_entries() {
        let mut index: StubIndex<SmolStr, u32> = StubIndex::default();
        index.add(doc(0), "a".into(), 1);
        index.add(doc(1), "a".into(), 2);
        index.add(doc(0), "b".into(), 3);

        assert_eq!(index.remove_document(doc(0)), 2);
        assert_eq!(index.get("a", Match::All).copied().collect::<Vec<_>>(), vec![2]);
        assert!(!index.contains_key("b"));
        assert_eq!(index.remove_document(doc(0)), 0);
    }

    #[test]
    fn test_stub_remove_document_clears_all_indices() {
        let mut stub = Stub::new();
        let decl = DeclId::new(doc(3), 0);
        stub.globals.add(doc(3), "g".into(), decl);
        stub.members.add(doc(3), MemberOwner::Global("g".into()), decl);
        stub.supers.add(doc(3), "A".into(), LuaType::named("B"));
        stub.remove_document(doc(3));
        assert!(stub.globals.is_empty());
        assert!(stub.members.is_empty());
        assert!(stub.supers.is_empty());
    }
}
